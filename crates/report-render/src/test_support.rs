use incident_types::IncidentReport;

pub fn sample_report() -> IncidentReport {
    serde_json::from_str(include_str!("../tests/fixtures/sample_report.json"))
        .expect("fixture parses")
}
