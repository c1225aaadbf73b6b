//! Mail transports
//!
//! [`ResendTransport`] posts to a Resend-compatible HTTP API.
//! [`OutboxTransport`] writes each mail as a JSON file instead, for dry runs
//! and local development.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::MailerConfig;
use crate::error::MailError;
use crate::types::OutgoingMail;

/// Identifier the transport assigned to an accepted mail
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, MailError>;
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment<'a>>,
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

impl<'a> ResendPayload<'a> {
    fn from_mail(mail: &'a OutgoingMail) -> Self {
        Self {
            from: &mail.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.text,
            attachments: mail
                .attachments
                .iter()
                .map(|a| ResendAttachment {
                    filename: &a.filename,
                    content: STANDARD.encode(&a.content),
                    content_type: &a.content_type,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResendSuccessResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP transport for the Resend `/emails` endpoint
#[derive(Debug, Clone)]
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ResendTransport {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &MailerConfig) -> Result<Self, MailError> {
        let api_key = config
            .resend_api_key
            .clone()
            .ok_or(MailError::MissingApiKey)?;
        Ok(Self::new(api_key, config.resend_api_url.clone()))
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    #[instrument(skip(self, mail), fields(to = ?mail.to, subject = %mail.subject))]
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, MailError> {
        mail.validate()?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ResendPayload::from_mail(mail))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return match response.json::<ResendSuccessResponse>().await {
                Ok(body) => {
                    info!(message_id = %body.id, "Email sent via Resend");
                    Ok(MessageId(body.id))
                }
                Err(e) => {
                    warn!(error = %e, "Resend accepted the mail but the response did not parse");
                    Ok(MessageId("resend:unknown".to_string()))
                }
            };
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ResendErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message.or(e.name))
            .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body));
        warn!(status = status.as_u16(), %message, "Resend rejected the mail");
        Err(MailError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// One mail as written by [`OutboxTransport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub id: MessageId,
    pub queued_at: DateTime<Utc>,
    pub mail: OutgoingMail,
}

/// Writes `<message id>.json` files into a directory
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl MailTransport for OutboxTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, MailError> {
        mail.validate()?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| MailError::io(&self.dir, e))?;

        let entry = OutboxEntry {
            id: MessageId(uuid::Uuid::new_v4().to_string()),
            queued_at: Utc::now(),
            mail: mail.clone(),
        };
        let path = self.dir.join(format!("{}.json", entry.id));
        let body = serde_json::to_vec_pretty(&entry)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| MailError::io(&path, e))?;

        debug!(path = %path.display(), "Mail written to outbox");
        Ok(entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attachment;

    fn mail() -> OutgoingMail {
        OutgoingMail::new(
            "reports@example.com",
            &["claims@example.com".to_string()],
            "New Incident Report - Dana Reyes",
            "Please find the attached incident report.",
        )
    }

    #[test]
    fn test_resend_payload_serialization() {
        let m = mail().with_attachment(Attachment::pdf("incident_report_1.pdf", b"%PDF".to_vec()));
        let json = serde_json::to_value(ResendPayload::from_mail(&m)).unwrap();
        assert_eq!(json["from"], "reports@example.com");
        assert_eq!(json["to"][0], "claims@example.com");
        assert_eq!(json["attachments"][0]["filename"], "incident_report_1.pdf");
        assert_eq!(json["attachments"][0]["content"], "JVBERg==");
    }

    #[test]
    fn test_resend_payload_omits_empty_attachments() {
        let m = mail();
        let json = serde_json::to_string(&ResendPayload::from_mail(&m)).unwrap();
        assert!(!json.contains("attachments"));
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = ResendTransport::from_config(&MailerConfig::default()).unwrap_err();
        assert!(matches!(err, MailError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_outbox_writes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = OutboxTransport::new(dir.path().join("outbox"));
        let id = outbox.send(&mail()).await.unwrap();

        let path = outbox.dir().join(format!("{id}.json"));
        let entry: OutboxEntry = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.mail, mail());
    }

    #[tokio::test]
    async fn test_outbox_rejects_invalid_mail() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = OutboxTransport::new(dir.path());
        let mut m = mail();
        m.to.clear();
        assert!(matches!(
            outbox.send(&m).await,
            Err(MailError::Validation(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
