//! Flat submission to `IncidentReport`
//!
//! Validation runs in two phases. Required fields, agreements and required
//! choices are all checked and collected together; the odometer is parsed
//! only once that first phase is clean.

use chrono::{DateTime, NaiveDate, Utc};
use incident_types::{
    AccidentDescription, Contact, Direction, IncidentDetails, IncidentLocation, IncidentReport,
    Lighting, OperatorInfo, OtherOperator, OtherVehicle, OtherVehicleInfo, PersonalInfo,
    ReportStatus, RoadCondition, Signature, TrafficControl, TrafficControlStatus, VehicleDamage,
    VehicleInfo, VehicleUse, Weather, YesNo,
};
use tracing::debug;

use crate::error::{ValidationFailure, ValidationIssue};
use crate::fields::FlatSubmission;
use crate::markers::parse_markers;
use crate::schema::{ContactKeys, AGREEMENT_FIELDS, DAMAGE_MARKERS, OTHER_OPERATOR, OTHER_OWNER, REQUIRED_FIELDS};
use crate::witnesses;

/// Any closed value set the form can post
trait Choice: Sized + Copy {
    fn parse_choice(value: &str) -> Option<Self>;
}

macro_rules! impl_choice {
    ($($ty:ty),+ $(,)?) => {
        $(impl Choice for $ty {
            fn parse_choice(value: &str) -> Option<Self> {
                <$ty>::parse_choice(value)
            }
        })+
    };
}

impl_choice!(
    YesNo,
    VehicleUse,
    Weather,
    Direction,
    TrafficControl,
    TrafficControlStatus,
    RoadCondition,
    Lighting,
);

/// Normalize using the current time
pub fn normalize(fields: &FlatSubmission) -> Result<IncidentReport, ValidationFailure> {
    normalize_at(fields, Utc::now())
}

/// Normalize with an explicit clock for `signedAt`, `createdAt` and `updatedAt`
pub fn normalize_at(
    fields: &FlatSubmission,
    now: DateTime<Utc>,
) -> Result<IncidentReport, ValidationFailure> {
    let mut issues: Vec<ValidationIssue> = REQUIRED_FIELDS
        .iter()
        .filter(|key| !fields.has_value(key))
        .map(|key| ValidationIssue::MissingField(key.to_string()))
        .collect();

    if !AGREEMENT_FIELDS.iter().all(|key| fields.is_truthy(key)) {
        issues.push(ValidationIssue::AgreementsNotAccepted);
    }

    let owns_vehicle = required_choice::<YesNo>(fields, "ownsVehicle", &mut issues);
    let renter_operating = required_choice::<YesNo>(fields, "renterOperating", &mut issues);
    let vehicle_use = required_choice::<VehicleUse>(fields, "vehicleUse", &mut issues);
    let credit_card_coverage = required_choice::<YesNo>(fields, "creditCardCoverage", &mut issues);
    let knows_location = required_choice::<YesNo>(fields, "knowsLocation", &mut issues);
    let other_vehicle_involved = required_choice::<YesNo>(fields, "otherVehicleInvolved", &mut issues);

    // A None here always has a matching issue (missing or invalid)
    let (
        Some(owns_vehicle),
        Some(renter_operating),
        Some(vehicle_use),
        Some(credit_card_coverage),
        Some(knows_location),
        Some(other_vehicle_involved),
    ) = (
        owns_vehicle,
        renter_operating,
        vehicle_use,
        credit_card_coverage,
        knows_location,
        other_vehicle_involved,
    )
    else {
        return Err(ValidationFailure::new(issues));
    };
    if !issues.is_empty() {
        return Err(ValidationFailure::new(issues));
    }

    let odometer_raw = fields.text_or_empty("odometer");
    let Some(odometer) = parse_count(&odometer_raw) else {
        return Err(ValidationFailure::new(vec![ValidationIssue::InvalidOdometer(
            odometer_raw,
        )]));
    };

    let personal_info = PersonalInfo {
        first_name: fields.text_or_empty("firstName"),
        last_name: fields.text_or_empty("lastName"),
        address: fields.text_or_empty("address"),
        city: fields.text_or_empty("city"),
        state: fields.text_or_empty("state"),
        zip: fields.text_or_empty("zip"),
        home_phone: fields.text_or_empty("homePhone"),
        work_phone: optional_text(fields, "workPhone"),
        email: fields.text_or_empty("email").to_lowercase(),
        owns_vehicle,
        insurance_company: fields.text_or_empty("insuranceCompany"),
        policy_number: fields.text_or_empty("policyNumber"),
    };

    let vehicle_info = VehicleInfo {
        vehicle_number: fields.text_or_empty("vehicleNumber"),
        license_plate: fields.text_or_empty("licensePlate"),
        license_state: fields.text_or_empty("licenseState"),
        vehicle_make: fields.text_or_empty("vehicleMake"),
        vehicle_model: fields.text_or_empty("vehicleModel"),
        odometer,
    };

    let incident_details = IncidentDetails {
        renter_operating,
        operator_info: (!renter_operating.is_yes()).then(|| operator_info(fields)),
        vehicle_use,
        credit_card_coverage,
        description: fields.text_or_empty("description"),
    };

    let incident_location = if knows_location.is_yes() {
        IncidentLocation {
            knows_location,
            date: optional_date(fields, "incidentDate"),
            time: optional_text(fields, "incidentTime"),
            weather: optional_choice(fields, "weather"),
            address: optional_text(fields, "incidentAddress"),
            city: optional_text(fields, "incidentCity"),
            state: optional_text(fields, "incidentState"),
            zip: optional_text(fields, "incidentZip"),
            police_department: optional_text(fields, "policeDepartment"),
            police_report_number: optional_text(fields, "policeReportNumber"),
        }
    } else {
        IncidentLocation::unknown()
    };

    let vehicle_damage = VehicleDamage {
        other_vehicle_involved,
        other_vehicle_info: other_vehicle_involved
            .is_yes()
            .then(|| other_vehicle_info(fields)),
        rental_vehicle_damage: parse_markers(fields.text(DAMAGE_MARKERS), now),
        additional_damage_description: optional_text(fields, "damageDescription"),
    };

    let mut traffic_controls: Vec<TrafficControl> = Vec::new();
    for control in fields
        .values("trafficControls")
        .into_iter()
        .filter_map(TrafficControl::parse_choice)
    {
        if !traffic_controls.contains(&control) {
            traffic_controls.push(control);
        }
    }

    let accident_description = AccidentDescription {
        direction_of_travel: optional_choice(fields, "directionOfTravel"),
        traffic_controls,
        traffic_control_status: optional_choice(fields, "trafficControlStatus"),
        description: fields.text_or_empty("accidentDescription"),
        road_conditions: optional_choice(fields, "roadConditions"),
        lighting_conditions: optional_choice(fields, "lightingConditions"),
    };

    let report = IncidentReport {
        id: None,
        status: ReportStatus::Submitted,
        terms_agreement: true,
        privacy_agreement: true,
        esignature_agreement: true,
        personal_info,
        vehicle_info,
        incident_details,
        incident_location,
        vehicle_damage,
        witnesses: witnesses::reconstruct(fields),
        accident_description,
        signature: Signature {
            accuracy_confirmation: fields.is_truthy("accuracyConfirmation"),
            signature_data: fields.text_or_empty("signatureData"),
            signed_at: now,
        },
        created_at: now,
        updated_at: now,
    };

    debug!(
        markers = report.vehicle_damage.rental_vehicle_damage.len(),
        witnesses = report.witnesses.len(),
        operator = report.incident_details.operator_info.is_some(),
        other_vehicle = report.vehicle_damage.other_vehicle_info.is_some(),
        "Normalized submission"
    );
    Ok(report)
}

/// A required choice: missing is already reported, so only flag bad values
fn required_choice<T: Choice>(
    fields: &FlatSubmission,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    let raw = fields.text(key)?;
    let parsed = T::parse_choice(raw);
    if parsed.is_none() {
        issues.push(ValidationIssue::InvalidChoice {
            field: key.to_string(),
            value: raw.to_string(),
        });
    }
    parsed
}

/// An optional choice: values outside the set are stored as absent
fn optional_choice<T: Choice>(fields: &FlatSubmission, key: &str) -> Option<T> {
    fields.text(key).and_then(T::parse_choice)
}

fn optional_text(fields: &FlatSubmission, key: &str) -> Option<String> {
    fields.text(key).map(str::to_string)
}

fn optional_date(fields: &FlatSubmission, key: &str) -> Option<NaiveDate> {
    fields
        .text(key)
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

/// Non-negative whole number, digits only
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn operator_info(fields: &FlatSubmission) -> OperatorInfo {
    OperatorInfo {
        first_name: fields.text_or_empty("operatorFirstName"),
        last_name: fields.text_or_empty("operatorLastName"),
        dob: optional_date(fields, "operatorDOB"),
        phone: fields.text_or_empty("operatorPhone"),
        address: fields.text_or_empty("operatorAddress"),
        city: fields.text_or_empty("operatorCity"),
        state: fields.text_or_empty("operatorState"),
        zip: fields.text_or_empty("operatorZip"),
        license_number: fields.text_or_empty("operatorLicense"),
        license_state: fields.text_or_empty("operatorLicenseState"),
        owns_vehicle: optional_choice(fields, "operatorOwnsVehicle"),
        employer: fields.text_or_empty("operatorEmployer"),
        work_phone: fields.text_or_empty("operatorWorkPhone"),
        work_address: fields.text_or_empty("operatorWorkAddress"),
        work_city: fields.text_or_empty("operatorWorkCity"),
        work_state: fields.text_or_empty("operatorWorkState"),
        work_zip: fields.text_or_empty("operatorWorkZip"),
        insurance_company: fields.text_or_empty("operatorInsuranceCompany"),
        policy_number: fields.text_or_empty("operatorPolicyNumber"),
    }
}

fn contact(fields: &FlatSubmission, keys: &ContactKeys) -> Contact {
    Contact {
        first_name: fields.text_or_empty(keys.first_name),
        last_name: fields.text_or_empty(keys.last_name),
        address: fields.text_or_empty(keys.address),
        city: fields.text_or_empty(keys.city),
        state: fields.text_or_empty(keys.state),
        zip: fields.text_or_empty(keys.zip),
        phone: fields.text_or_empty(keys.phone),
    }
}

fn other_vehicle_info(fields: &FlatSubmission) -> OtherVehicleInfo {
    // An unanswered ownerOperating means nobody else was driving
    let owner_operating = optional_choice(fields, "ownerOperating").unwrap_or(YesNo::Yes);

    let operator = (!owner_operating.is_yes()).then(|| OtherOperator {
        contact: contact(fields, &OTHER_OPERATOR),
        license_number: fields.text_or_empty("otherOperatorLicense"),
        license_state: fields.text_or_empty("otherOperatorLicenseState"),
        insurance_company: fields.text_or_empty("otherOperatorInsurance"),
        policy_number: fields.text_or_empty("otherOperatorPolicy"),
    });

    OtherVehicleInfo {
        owner: contact(fields, &OTHER_OWNER),
        owner_operating,
        operator,
        vehicle: OtherVehicle {
            make: fields.text_or_empty("otherVehicleMake"),
            model: fields.text_or_empty("otherVehicleModel"),
            odometer: fields.text("otherVehicleOdometer").and_then(parse_count),
            license_plate: fields.text_or_empty("otherVehicleLicense"),
            license_state: fields.text_or_empty("otherVehicleLicenseState"),
            damage_description: fields.text_or_empty("otherVehicleDamage"),
            driveable: optional_choice(fields, "otherVehicleDriveable"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12000"), Some(12000));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count("-5"), None);
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("99999999999999999999999"), None);
    }

    #[test]
    fn test_required_choice_flags_invalid_value_only() {
        let fields = FlatSubmission::new().with("vehicleUse", "leisure");
        let mut issues = Vec::new();
        assert_eq!(required_choice::<VehicleUse>(&fields, "vehicleUse", &mut issues), None);
        assert_eq!(
            issues,
            vec![ValidationIssue::InvalidChoice {
                field: "vehicleUse".into(),
                value: "leisure".into()
            }]
        );

        let mut issues = Vec::new();
        assert_eq!(required_choice::<YesNo>(&fields, "renterOperating", &mut issues), None);
        assert!(issues.is_empty());
    }
}
