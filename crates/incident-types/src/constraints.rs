//! Document-level constraints a store enforces before accepting a report
//!
//! These are the checks a document database schema would run. The intake
//! normalizer already guarantees most of them; stores re-check so that a
//! report built by other means cannot slip in malformed.

use email_address::EmailAddress;
use std::str::FromStr;

use crate::types::IncidentReport;

/// One failed constraint, addressed by its dotted document path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub path: String,
    pub message: String,
}

impl ConstraintViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Run every constraint and collect the failures
pub fn check(report: &IncidentReport) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    let personal = &report.personal_info;
    let vehicle = &report.vehicle_info;
    let required = [
        ("personalInfo.firstName", &personal.first_name),
        ("personalInfo.lastName", &personal.last_name),
        ("personalInfo.address", &personal.address),
        ("personalInfo.city", &personal.city),
        ("personalInfo.state", &personal.state),
        ("personalInfo.zip", &personal.zip),
        ("personalInfo.homePhone", &personal.home_phone),
        ("personalInfo.email", &personal.email),
        ("personalInfo.insuranceCompany", &personal.insurance_company),
        ("personalInfo.policyNumber", &personal.policy_number),
        ("vehicleInfo.vehicleNumber", &vehicle.vehicle_number),
        ("vehicleInfo.licensePlate", &vehicle.license_plate),
        ("vehicleInfo.licenseState", &vehicle.license_state),
        ("vehicleInfo.vehicleMake", &vehicle.vehicle_make),
        ("vehicleInfo.vehicleModel", &vehicle.vehicle_model),
        (
            "incidentDetails.description",
            &report.incident_details.description,
        ),
        (
            "accidentDescription.description",
            &report.accident_description.description,
        ),
        ("signature.signatureData", &report.signature.signature_data),
    ];
    for (path, value) in required {
        if value.trim().is_empty() {
            violations.push(ConstraintViolation::new(path, "is required"));
        }
    }

    if !personal.email.trim().is_empty() && EmailAddress::from_str(&personal.email).is_err() {
        violations.push(ConstraintViolation::new(
            "personalInfo.email",
            format!("'{}' is not a valid email address", personal.email),
        ));
    }

    if !report.agreements_accepted() {
        violations.push(ConstraintViolation::new(
            "agreements",
            "all agreements must be accepted",
        ));
    }

    let details = &report.incident_details;
    if details.renter_operating.is_yes() == details.operator_info.is_some() {
        violations.push(ConstraintViolation::new(
            "incidentDetails.operatorInfo",
            "must be present exactly when renterOperating is 'no'",
        ));
    }

    let damage = &report.vehicle_damage;
    if damage.other_vehicle_involved.is_yes() != damage.other_vehicle_info.is_some() {
        violations.push(ConstraintViolation::new(
            "vehicleDamage.otherVehicleInfo",
            "must be present exactly when otherVehicleInvolved is 'yes'",
        ));
    }
    if let Some(other) = &damage.other_vehicle_info {
        if other.owner_operating.is_yes() == other.operator.is_some() {
            violations.push(ConstraintViolation::new(
                "vehicleDamage.otherVehicleInfo.operator",
                "must be present exactly when ownerOperating is 'no'",
            ));
        }
    }

    for (index, marker) in damage.rental_vehicle_damage.iter().enumerate() {
        if !marker.coordinates.in_range() {
            violations.push(ConstraintViolation::new(
                format!("vehicleDamage.rentalVehicleDamage.{index}.coordinates"),
                format!(
                    "({}, {}) is outside 0..=100",
                    marker.coordinates.x, marker.coordinates.y
                ),
            ));
        }
    }

    violations
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_report;
    use super::*;
    use crate::choices::YesNo;
    use crate::damage::MarkerPoint;
    use crate::types::{OperatorInfo, OtherVehicle, OtherVehicleInfo};

    fn paths(report: &IncidentReport) -> Vec<String> {
        check(report).into_iter().map(|v| v.path).collect()
    }

    #[test]
    fn test_valid_report_has_no_violations() {
        assert!(check(&sample_report()).is_empty());
    }

    #[test]
    fn test_blank_required_strings_are_reported() {
        let mut report = sample_report();
        report.personal_info.first_name = "  ".into();
        report.vehicle_info.license_plate.clear();
        assert_eq!(
            paths(&report),
            vec!["personalInfo.firstName", "vehicleInfo.licensePlate"]
        );
    }

    #[test]
    fn test_invalid_email() {
        let mut report = sample_report();
        report.personal_info.email = "not-an-email".into();
        assert_eq!(paths(&report), vec!["personalInfo.email"]);
    }

    #[test]
    fn test_operator_presence_must_match_flag() {
        let mut report = sample_report();
        report.incident_details.operator_info = Some(OperatorInfo::default());
        assert_eq!(paths(&report), vec!["incidentDetails.operatorInfo"]);

        report.incident_details.renter_operating = YesNo::No;
        assert!(check(&report).is_empty());
    }

    #[test]
    fn test_other_vehicle_operator_presence() {
        let mut report = sample_report();
        report.vehicle_damage.other_vehicle_involved = YesNo::Yes;
        report.vehicle_damage.other_vehicle_info = Some(OtherVehicleInfo {
            owner: Default::default(),
            owner_operating: YesNo::No,
            operator: None,
            vehicle: OtherVehicle::default(),
        });
        assert_eq!(
            paths(&report),
            vec!["vehicleDamage.otherVehicleInfo.operator"]
        );
    }

    #[test]
    fn test_marker_out_of_range() {
        let mut report = sample_report();
        report.vehicle_damage.rental_vehicle_damage[0].coordinates = MarkerPoint::new(120.0, 5.0);
        let violations = check(&report);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "vehicleDamage.rentalVehicleDamage.0.coordinates: (120, 5) is outside 0..=100"
        );
    }

    #[test]
    fn test_agreements_required() {
        let mut report = sample_report();
        report.privacy_agreement = false;
        assert_eq!(paths(&report), vec!["agreements"]);
    }
}
