//! The incident report aggregate
//!
//! One `IncidentReport` is built per accepted submission and is read-only
//! afterwards. Conditional groups (`operator_info`, `other_vehicle_info`,
//! `OtherVehicleInfo::operator`) are `Option`s: `None` means the branch was
//! never collected, which is different from a collected group whose fields
//! happen to be empty.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::choices::{
    Direction, Lighting, ReportStatus, RoadCondition, TrafficControl, TrafficControlStatus,
    VehicleUse, Weather, YesNo,
};
use crate::damage::DamageMarker;

/// Identifier assigned by the store when a report is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl ReportId {
    pub fn new_v4() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReportId>,
    #[serde(default)]
    pub status: ReportStatus,

    pub terms_agreement: bool,
    pub privacy_agreement: bool,
    pub esignature_agreement: bool,

    pub personal_info: PersonalInfo,
    pub vehicle_info: VehicleInfo,
    pub incident_details: IncidentDetails,
    pub incident_location: IncidentLocation,
    pub vehicle_damage: VehicleDamage,
    #[serde(default)]
    pub witnesses: Vec<Contact>,
    pub accident_description: AccidentDescription,
    pub signature: Signature,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IncidentReport {
    /// All three policy agreements accepted
    pub fn agreements_accepted(&self) -> bool {
        self.terms_agreement && self.privacy_agreement && self.esignature_agreement
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn set_status(&mut self, status: ReportStatus, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    /// "First Last" of the reporting renter
    pub fn reporter_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_info.first_name, self.personal_info.last_name
        )
        .trim()
        .to_string()
    }

    /// The persisted JSON document (camelCase keys)
    pub fn to_document(&self) -> serde_json::Value {
        // Every field is a plain string, number, bool, date or nested struct
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub home_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_phone: Option<String>,
    pub email: String,
    pub owns_vehicle: YesNo,
    pub insurance_company: String,
    pub policy_number: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub vehicle_number: String,
    pub license_plate: String,
    pub license_state: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub odometer: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetails {
    pub renter_operating: YesNo,
    /// Present iff `renter_operating == No`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_info: Option<OperatorInfo>,
    pub vehicle_use: VehicleUse,
    pub credit_card_coverage: YesNo,
    pub description: String,
}

/// Person driving the rental when it was not the renter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorInfo {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub license_number: String,
    pub license_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owns_vehicle: Option<YesNo>,
    pub employer: String,
    pub work_phone: String,
    pub work_address: String,
    pub work_city: String,
    pub work_state: String,
    pub work_zip: String,
    pub insurance_company: String,
    pub policy_number: String,
}

/// Where and when the incident happened
///
/// Every field except `knows_location` is `None` when the renter does not
/// know the location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentLocation {
    pub knows_location: YesNo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub police_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub police_report_number: Option<String>,
}

impl IncidentLocation {
    /// Location the renter could not provide
    pub fn unknown() -> Self {
        Self {
            knows_location: YesNo::No,
            date: None,
            time: None,
            weather: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            police_department: None,
            police_report_number: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDamage {
    pub other_vehicle_involved: YesNo,
    /// Present iff `other_vehicle_involved == Yes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_vehicle_info: Option<OtherVehicleInfo>,
    #[serde(default)]
    pub rental_vehicle_damage: Vec<DamageMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_damage_description: Option<String>,
}

/// Name, address and phone of a person (other-vehicle owner, witness)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherVehicleInfo {
    pub owner: Contact,
    pub owner_operating: YesNo,
    /// Present iff `owner_operating == No`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OtherOperator>,
    pub vehicle: OtherVehicle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherOperator {
    #[serde(flatten)]
    pub contact: Contact,
    pub license_number: String,
    pub license_state: String,
    pub insurance_company: String,
    pub policy_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherVehicle {
    pub make: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer: Option<u64>,
    pub license_plate: String,
    pub license_state: String,
    pub damage_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driveable: Option<YesNo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction_of_travel: Option<Direction>,
    #[serde(default)]
    pub traffic_controls: Vec<TrafficControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_control_status: Option<TrafficControlStatus>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_conditions: Option<RoadCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting_conditions: Option<Lighting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub accuracy_confirmation: bool,
    /// Opaque signature capture, usually a `data:image/png;base64,...` URL
    pub signature_data: String,
    pub signed_at: DateTime<Utc>,
}
