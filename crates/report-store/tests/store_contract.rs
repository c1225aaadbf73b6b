//! Behaviour shared by every `ReportStore` implementation

use chrono::{DateTime, Duration, TimeZone, Utc};
use incident_types::{IncidentReport, ReportId, ReportStatus};
use pretty_assertions::assert_eq;
use report_store::{JsonDirStore, MemoryStore, ReportQuery, ReportStore, SortOrder, StoreError};
use serde_json::json;

fn report_created_at(first_name: &str, created_at: DateTime<Utc>) -> IncidentReport {
    serde_json::from_value(json!({
        "status": "submitted",
        "termsAgreement": true,
        "privacyAgreement": true,
        "esignatureAgreement": true,
        "personalInfo": {
            "firstName": first_name, "lastName": "Reyes", "address": "12 Elm St",
            "city": "Springfield", "state": "IL", "zip": "62701",
            "homePhone": "555-0100", "email": "dana@example.com", "ownsVehicle": "yes",
            "insuranceCompany": "Acme Mutual", "policyNumber": "P-1"
        },
        "vehicleInfo": {
            "vehicleNumber": "V-42", "licensePlate": "ABC123", "licenseState": "IL",
            "vehicleMake": "Ford", "vehicleModel": "Transit", "odometer": 12000
        },
        "incidentDetails": {
            "renterOperating": "yes", "vehicleUse": "work",
            "creditCardCoverage": "no", "description": "Backed into a post"
        },
        "incidentLocation": { "knowsLocation": "no" },
        "vehicleDamage": { "otherVehicleInvolved": "no", "rentalVehicleDamage": [] },
        "witnesses": [],
        "accidentDescription": { "description": "Low speed", "trafficControls": [] },
        "signature": {
            "accuracyConfirmation": true,
            "signatureData": "data:image/png;base64,AAAA",
            "signedAt": created_at
        },
        "createdAt": created_at,
        "updatedAt": created_at
    }))
    .unwrap()
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

fn exercise_store(store: &dyn ReportStore) {
    let t0 = base_time();
    let ids: Vec<ReportId> = ["Ann", "Ben", "Cal"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            store
                .create(report_created_at(name, t0 + Duration::days(i as i64)))
                .unwrap()
        })
        .collect();

    let found = store.find_by_id(&ids[1]).unwrap().unwrap();
    assert_eq!(found.personal_info.first_name, "Ben");
    assert_eq!(found.id.as_ref(), Some(&ids[1]));

    assert!(store.find_by_id(&ReportId::from("missing")).unwrap().is_none());

    let newest_first: Vec<String> = store
        .find_summaries(&ReportQuery::all())
        .unwrap()
        .into_iter()
        .map(|s| s.first_name)
        .collect();
    assert_eq!(newest_first, vec!["Cal", "Ben", "Ann"]);

    let oldest_two: Vec<String> = store
        .find(&ReportQuery::all().sorted(SortOrder::OldestFirst).limit(2))
        .unwrap()
        .into_iter()
        .map(|r| r.personal_info.first_name)
        .collect();
    assert_eq!(oldest_two, vec!["Ann", "Ben"]);

    let window = ReportQuery::all().created_between(t0 + Duration::hours(1), t0 + Duration::days(1));
    let in_window = store.find(&window).unwrap();
    assert_eq!(in_window.len(), 1);
    assert_eq!(in_window[0].personal_info.first_name, "Ben");

    let by_id = store
        .find(&ReportQuery::all().with_ids([ids[0].clone(), ids[2].clone()]))
        .unwrap();
    assert_eq!(by_id.len(), 2);

    let drafts = store
        .find(&ReportQuery::all().with_status(ReportStatus::Draft))
        .unwrap();
    assert!(drafts.is_empty());
}

fn rejects_invalid(store: &dyn ReportStore) {
    let mut report = report_created_at("Ann", base_time());
    report.personal_info.email = "nope".into();
    report.vehicle_info.vehicle_make.clear();

    match store.create(report) {
        Err(StoreError::ConstraintViolation(messages)) => {
            assert_eq!(messages.len(), 2);
            assert!(messages.iter().any(|m| m.starts_with("personalInfo.email")));
            assert!(messages.iter().any(|m| m.starts_with("vehicleInfo.vehicleMake")));
        }
        other => panic!("expected constraint violation, got {other:?}"),
    }
    assert!(store.find(&ReportQuery::all()).unwrap().is_empty());
}

#[test]
fn test_memory_store_contract() {
    exercise_store(&MemoryStore::new());
}

#[test]
fn test_memory_store_rejects_invalid_documents() {
    rejects_invalid(&MemoryStore::new());
}

#[test]
fn test_json_dir_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    exercise_store(&JsonDirStore::open(dir.path().join("reports")).unwrap());
}

#[test]
fn test_json_dir_store_rejects_invalid_documents() {
    let dir = tempfile::tempdir().unwrap();
    rejects_invalid(&JsonDirStore::open(dir.path()).unwrap());
}

#[test]
fn test_json_dir_store_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let id = JsonDirStore::open(dir.path())
        .unwrap()
        .create(report_created_at("Ann", base_time()))
        .unwrap();

    let reopened = JsonDirStore::open(dir.path()).unwrap();
    let report = reopened.find_by_id(&id).unwrap().unwrap();
    assert_eq!(report.personal_info.first_name, "Ann");

    let raw = std::fs::read_to_string(dir.path().join(format!("{id}.json"))).unwrap();
    assert!(raw.contains("\"firstName\": \"Ann\""));
}

#[test]
fn test_json_dir_store_skips_foreign_files_and_unsafe_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonDirStore::open(dir.path()).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();

    assert!(store.find(&ReportQuery::all()).unwrap().is_empty());
    assert!(store
        .find_by_id(&ReportId::from("../escape"))
        .unwrap()
        .is_none());
}

#[test]
fn test_open_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    JsonDirStore::open(dir.path().join("a")).unwrap();
    JsonDirStore::open(dir.path().join("a")).unwrap();
}
