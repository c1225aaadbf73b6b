//! Incident form intake
//!
//! Turns the flat field set posted by the multi-page form into a validated
//! [`IncidentReport`] and hands it to a [`ReportStore`].
//!
//! ```ignore
//! let fields = FlatSubmission::from_json(&body)?;
//! match submit(&store, &fields) {
//!     Ok(id) => println!("stored {id}"),
//!     Err(SubmitError::Validation(failure)) => println!("{:?}", failure.messages()),
//!     Err(other) => return Err(other.into()),
//! }
//! ```

pub mod error;
pub mod fields;
pub mod markers;
pub mod normalize;
pub mod schema;
pub mod witnesses;

pub use error::{SubmitError, ValidationFailure, ValidationIssue};
pub use fields::{FieldValue, FieldsError, FlatSubmission};
pub use normalize::{normalize, normalize_at};

use chrono::{DateTime, Utc};
use incident_types::{IncidentReport, ReportId};
use report_store::ReportStore;
use tracing::{info, instrument, warn};

/// Normalize a submission and persist it
pub fn submit(store: &dyn ReportStore, fields: &FlatSubmission) -> Result<ReportId, SubmitError> {
    submit_at(store, fields, Utc::now())
}

#[instrument(skip_all, fields(field_count = fields.len()))]
pub fn submit_at(
    store: &dyn ReportStore,
    fields: &FlatSubmission,
    now: DateTime<Utc>,
) -> Result<ReportId, SubmitError> {
    let report: IncidentReport = match normalize_at(fields, now) {
        Ok(report) => report,
        Err(failure) => {
            info!(issues = failure.issues.len(), "Submission rejected");
            return Err(failure.into());
        }
    };

    let markers = report.vehicle_damage.rental_vehicle_damage.len();
    let witnesses = report.witnesses.len();

    let id = store.create(report).map_err(|e| {
        warn!(error = %e, "Store refused report");
        SubmitError::from(e)
    })?;

    info!(report_id = %id, markers, witnesses, "Submission accepted");
    Ok(id)
}
