//! Report mailing against recording transports

use std::sync::Mutex;

use async_trait::async_trait;
use incident_types::IncidentReport;
use pretty_assertions::assert_eq;
use report_mailer::{
    dispatch_reports, BatchRequest, MailError, MailTransport, MailerConfig, MessageId,
    OutboxEntry, OutboxTransport, OutgoingMail, ReportMailer,
};
use report_render::PaginatedRenderer;
use report_store::{MemoryStore, ReportQuery, ReportStore};

fn sample_report() -> IncidentReport {
    serde_json::from_str(include_str!("fixtures/sample_report.json")).unwrap()
}

/// Records every mail; fails when the subject contains `fail_on`
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    fail_on: Option<String>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, MailError> {
        mail.validate()?;
        if let Some(needle) = &self.fail_on {
            if mail.subject.contains(needle.as_str()) {
                return Err(MailError::Transport("connection reset".into()));
            }
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(mail.clone());
        Ok(MessageId(format!("msg-{}", sent.len())))
    }
}

fn config(temp: &std::path::Path) -> MailerConfig {
    MailerConfig {
        from: "Incident Reports <reports@example.com>".into(),
        to: vec!["claims@example.com".into()],
        temp_dir: temp.to_path_buf(),
        ..MailerConfig::default()
    }
}

fn mailer(temp: &std::path::Path, transport: RecordingTransport) -> ReportMailer<RecordingTransport> {
    ReportMailer::new(config(temp), PaginatedRenderer::default(), transport)
}

fn temp_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_send_attaches_rendered_pdf() {
    let temp = tempfile::tempdir().unwrap();
    let mailer = mailer(temp.path(), RecordingTransport::default());
    let report = sample_report();

    let id = mailer.send(&report).await.unwrap();
    assert_eq!(id, MessageId("msg-1".into()));

    let sent = mailer.transport().sent.lock().unwrap();
    let mail = &sent[0];
    assert_eq!(mail.subject, "New Incident Report - Dana Reyes");
    assert_eq!(mail.text, "Please find the attached incident report.");
    assert_eq!(mail.to, vec!["claims@example.com"]);
    let attachment = &mail.attachments[0];
    assert_eq!(
        attachment.filename,
        "incident_report_0b7f4c2e-5d1a-4a57-9a52-6c3f0e1d2a10.pdf"
    );
    assert_eq!(attachment.content_type, "application/pdf");
    assert!(attachment.content.starts_with(b"%PDF"));

    assert_eq!(temp_files(temp.path()), 0, "temporary PDF must be removed");
}

#[tokio::test]
async fn test_send_creates_missing_temp_dir() {
    let temp = tempfile::tempdir().unwrap();
    let nested = temp.path().join("spool").join("reports");
    let mailer = mailer(&nested, RecordingTransport::default());
    let report = sample_report();

    mailer.send(&report).await.unwrap();

    let expected = PaginatedRenderer::default().render_bytes(&report).unwrap();
    let sent = mailer.transport().sent.lock().unwrap();
    assert!(sent[0].attachments[0].content == expected);
    assert!(nested.is_dir());
    assert_eq!(temp_files(&nested), 0);
}

#[tokio::test]
async fn test_temp_file_removed_when_send_fails() {
    let temp = tempfile::tempdir().unwrap();
    let transport = RecordingTransport {
        fail_on: Some("Dana".into()),
        ..Default::default()
    };
    let mailer = mailer(temp.path(), transport);

    let err = mailer.send(&sample_report()).await.unwrap_err();
    assert!(matches!(err, MailError::Transport(_)));
    assert_eq!(temp_files(temp.path()), 0);
}

#[tokio::test]
async fn test_invalid_recipient_list_fails_and_cleans_up() {
    let temp = tempfile::tempdir().unwrap();
    let mut cfg = config(temp.path());
    cfg.to.clear();
    let mailer = ReportMailer::new(cfg, PaginatedRenderer::default(), RecordingTransport::default());

    let err = mailer.send(&sample_report()).await.unwrap_err();
    assert!(matches!(err, MailError::Validation(_)));
    assert_eq!(temp_files(temp.path()), 0);
}

#[tokio::test]
async fn test_unsaved_report_is_refused() {
    let temp = tempfile::tempdir().unwrap();
    let mailer = mailer(temp.path(), RecordingTransport::default());
    let mut report = sample_report();
    report.id = None;
    assert!(matches!(
        mailer.send(&report).await,
        Err(MailError::MissingReportId)
    ));
}

fn seeded_store(names: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    for name in names {
        let mut report = sample_report();
        report.personal_info.first_name = name.to_string();
        store.create(report).unwrap();
    }
    store
}

#[tokio::test]
async fn test_dispatch_continues_past_failures() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let temp = tempfile::tempdir().unwrap();
    let store = seeded_store(&["Ana", "Ben", "Cy"]);
    let transport = RecordingTransport {
        fail_on: Some("Ben".into()),
        ..Default::default()
    };
    let mailer = mailer(temp.path(), transport);

    let summary = dispatch_reports(&store, &mailer, &BatchRequest::default())
        .await
        .unwrap();
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.sent, 2);
    assert_eq!(summary.skipped_dry_run, 0);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].name, "Ben Reyes");
    assert!(summary.failures[0].error.contains("connection reset"));
    assert_eq!(temp_files(temp.path()), 0);
}

#[tokio::test]
async fn test_dispatch_dry_run_sends_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let store = seeded_store(&["Ana", "Ben"]);
    let mailer = mailer(temp.path(), RecordingTransport::default());

    let request = BatchRequest {
        query: ReportQuery::all().limit(1),
        dry_run: true,
    };
    let summary = dispatch_reports(&store, &mailer, &request).await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped_dry_run, 1);
    assert_eq!(summary.sent, 0);
    assert!(mailer.transport().sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_outbox_end_to_end() {
    let temp = tempfile::tempdir().unwrap();
    let outbox_dir = temp.path().join("outbox");
    let mailer = ReportMailer::new(
        config(&temp.path().join("tmp")),
        PaginatedRenderer::default(),
        OutboxTransport::new(&outbox_dir),
    );

    let id = mailer.send(&sample_report()).await.unwrap();
    let entry: OutboxEntry =
        serde_json::from_slice(&std::fs::read(outbox_dir.join(format!("{id}.json"))).unwrap())
            .unwrap();
    assert_eq!(entry.mail.subject, "New Incident Report - Dana Reyes");
    assert!(entry.mail.attachments[0].content.starts_with(b"%PDF"));
    assert_eq!(temp_files(&temp.path().join("tmp")), 0);
}
