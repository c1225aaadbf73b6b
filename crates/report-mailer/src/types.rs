//! Outgoing mail and its validation

use serde::{Deserialize, Serialize};

/// Largest attachment accepted by the transports
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Plain-text mail with optional attachments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    /// Sender, either `addr@domain` or `Name <addr@domain>`
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl OutgoingMail {
    pub fn new(from: &str, to: &[String], subject: &str, text: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_vec(),
            subject: subject.to_string(),
            text: text.to_string(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn validate(&self) -> Result<(), MailValidationError> {
        if self.from.trim().is_empty() {
            return Err(MailValidationError::MissingField("from"));
        }
        if !is_valid_email(&self.from) {
            return Err(MailValidationError::InvalidEmail(self.from.clone()));
        }

        if self.to.is_empty() {
            return Err(MailValidationError::MissingField("to"));
        }
        for email in &self.to {
            if !is_valid_email(email) {
                return Err(MailValidationError::InvalidEmail(email.clone()));
            }
        }

        if self.subject.trim().is_empty() {
            return Err(MailValidationError::MissingField("subject"));
        }
        if self.text.trim().is_empty() {
            return Err(MailValidationError::MissingContent);
        }

        for attachment in &self.attachments {
            if attachment.content.len() > MAX_ATTACHMENT_BYTES {
                return Err(MailValidationError::AttachmentTooLarge(
                    attachment.content.len(),
                    MAX_ATTACHMENT_BYTES,
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    /// Raw bytes; transports encode as they need
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    pub content_type: String,
}

impl Attachment {
    pub fn pdf(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            content_type: "application/pdf".to_string(),
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Email must have text content")]
    MissingContent,

    #[error("Attachment too large: {0} bytes (max {1})")]
    AttachmentTooLarge(usize, usize),
}

/// Check an address, accepting the `Name <addr@domain>` form
pub fn is_valid_email(email: &str) -> bool {
    let email = match (email.find('<'), email.rfind('>')) {
        (Some(start), Some(end)) if start < end => &email[start + 1..end],
        _ => email.trim(),
    };
    email_address::EmailAddress::is_valid(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mail() -> OutgoingMail {
        OutgoingMail::new(
            "Reports <reports@example.com>",
            &["claims@example.com".to_string()],
            "New Incident Report - Dana Reyes",
            "Please find the attached incident report.",
        )
    }

    #[test]
    fn test_valid_mail() {
        assert_eq!(mail().validate(), Ok(()));
    }

    #[test]
    fn test_named_sender_is_accepted() {
        assert!(is_valid_email("Reports <reports@example.com>"));
        assert!(is_valid_email("reports@example.com"));
        assert!(!is_valid_email("Reports <not-an-address>"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_missing_recipients() {
        let mut m = mail();
        m.to.clear();
        assert_eq!(m.validate(), Err(MailValidationError::MissingField("to")));
    }

    #[test]
    fn test_invalid_recipient() {
        let mut m = mail();
        m.to.push("nobody".into());
        assert_eq!(
            m.validate(),
            Err(MailValidationError::InvalidEmail("nobody".into()))
        );
    }

    #[test]
    fn test_blank_subject_and_body() {
        let mut m = mail();
        m.subject = "  ".into();
        assert_eq!(m.validate(), Err(MailValidationError::MissingField("subject")));
        let mut m = mail();
        m.text.clear();
        assert_eq!(m.validate(), Err(MailValidationError::MissingContent));
    }

    #[test]
    fn test_attachment_size_cap() {
        let m = mail().with_attachment(Attachment::pdf("big.pdf", vec![0; MAX_ATTACHMENT_BYTES + 1]));
        assert_eq!(
            m.validate(),
            Err(MailValidationError::AttachmentTooLarge(
                MAX_ATTACHMENT_BYTES + 1,
                MAX_ATTACHMENT_BYTES
            ))
        );
    }

    #[test]
    fn test_attachment_serializes_as_base64() {
        let value = serde_json::to_value(Attachment::pdf("r.pdf", b"%PDF".to_vec())).unwrap();
        assert_eq!(value["content"], "JVBERg==");
        assert_eq!(value["content_type"], "application/pdf");
    }
}
