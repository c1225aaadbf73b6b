//! Email collaborator for incident reports
//!
//! [`ReportMailer`] renders a stored report to a temporary PDF, attaches it
//! and hands the mail to a [`MailTransport`]. The temporary file is removed
//! once it exists, whether or not the send succeeds. [`dispatch_reports`]
//! re-sends a selection of stored reports.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod mailer;
pub mod transport;
pub mod types;

pub use config::MailerConfig;
pub use dispatch::{dispatch_reports, BatchFailure, BatchRequest, BatchSummary};
pub use error::MailError;
pub use mailer::ReportMailer;
pub use transport::{MailTransport, MessageId, OutboxEntry, OutboxTransport, ResendTransport};
pub use types::{Attachment, MailValidationError, OutgoingMail};
