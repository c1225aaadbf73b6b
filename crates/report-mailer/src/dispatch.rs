//! Re-sending stored reports in bulk

use report_store::{ReportQuery, ReportStore, StoreError};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::mailer::ReportMailer;
use crate::transport::MailTransport;

#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub query: ReportQuery,
    /// Select and count reports without sending anything
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub report_id: String,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub sent: usize,
    pub skipped_dry_run: usize,
    pub failures: Vec<BatchFailure>,
}

/// Mail every report the query selects, continuing past individual failures
///
/// Only a failing store query aborts the batch.
#[instrument(skip_all, fields(dry_run = request.dry_run))]
pub async fn dispatch_reports<S, T>(
    store: &S,
    mailer: &ReportMailer<T>,
    request: &BatchRequest,
) -> Result<BatchSummary, StoreError>
where
    S: ReportStore + ?Sized,
    T: MailTransport,
{
    let reports = store.find(&request.query)?;
    let mut summary = BatchSummary::default();

    for report in &reports {
        summary.processed += 1;
        let report_id = report
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();

        if request.dry_run {
            info!(%report_id, name = %report.reporter_name(), "Dry run: would send report");
            summary.skipped_dry_run += 1;
            continue;
        }

        match mailer.send(report).await {
            Ok(_) => summary.sent += 1,
            Err(e) => {
                warn!(%report_id, error = %e, "Report dispatch failed");
                summary.failures.push(BatchFailure {
                    report_id,
                    name: report.reporter_name(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        processed = summary.processed,
        sent = summary.sent,
        skipped = summary.skipped_dry_run,
        failed = summary.failures.len(),
        "Batch dispatch finished"
    );
    Ok(summary)
}
