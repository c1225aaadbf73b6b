use std::path::PathBuf;

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq)]
pub struct MailerConfig {
    /// Sender address
    pub from: String,
    /// Recipients of every report mail
    pub to: Vec<String>,
    /// Where rendered artifacts live until they are sent
    pub temp_dir: PathBuf,
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            from: "Incident Reports <reports@localhost.localdomain>".to_string(),
            to: Vec::new(),
            temp_dir: std::env::temp_dir().join("incident-reports"),
            resend_api_key: None,
            resend_api_url: DEFAULT_RESEND_API_URL.to_string(),
        }
    }
}

impl MailerConfig {
    /// Load from environment variables, falling back to the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            from: lookup("EMAIL_FROM").unwrap_or(defaults.from),
            to: lookup("EMAIL_TO")
                .map(|v| split_recipients(&v))
                .unwrap_or(defaults.to),
            temp_dir: lookup("REPORT_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            resend_api_key: lookup("RESEND_API_KEY").filter(|k| !k.trim().is_empty()),
            resend_api_url: lookup("RESEND_API_URL").unwrap_or(defaults.resend_api_url),
        }
    }
}

fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
