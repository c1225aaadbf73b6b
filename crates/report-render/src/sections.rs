//! Renderer-neutral view of a report
//!
//! Both renderers walk the same [`ReportView`]: sections in print order, each
//! row already formatted with missing values replaced by the placeholder.
//! Conditional groups carry a [`Presence`] so the PDF can omit them while the
//! HTML shows them collapsed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use incident_types::{humanize, DamageMarker, IncidentReport, ReportStatus};
use serde_json::Value;

use crate::lookup::{display, safe_get};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKey {
    PolicyAgreements,
    PersonalInfo,
    VehicleInfo,
    IncidentDetails,
    OperatorInfo,
    IncidentLocation,
    VehicleDamage,
    OtherVehicleOwner,
    OtherVehicleOperator,
    OtherVehicleDetails,
    Witnesses,
    Witness,
    AccidentDescription,
    Signature,
    Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Always,
    /// Conditional group that was collected
    Collected,
    /// Conditional group that was not collected, with the reason shown to readers
    NotCollected(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: SectionKey,
    pub title: String,
    pub presence: Presence,
    pub rows: Vec<Row>,
    pub children: Vec<Section>,
}

impl Section {
    fn new(key: SectionKey, title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            key,
            title: title.into(),
            presence: Presence::Always,
            rows,
            children: Vec::new(),
        }
    }

    fn conditional(
        key: SectionKey,
        title: impl Into<String>,
        collected: bool,
        reason: &'static str,
        rows: impl FnOnce() -> Vec<Row>,
    ) -> Self {
        let (presence, rows) = if collected {
            (Presence::Collected, rows())
        } else {
            (Presence::NotCollected(reason), Vec::new())
        };
        Self {
            key,
            title: title.into(),
            presence,
            rows,
            children: Vec::new(),
        }
    }

    pub fn is_collected(&self) -> bool {
        !matches!(self.presence, Presence::NotCollected(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub report_id: String,
    pub status: ReportStatus,
    pub reporter: String,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Clone)]
pub struct ReportView {
    pub header: Header,
    pub sections: Vec<Section>,
    pub document: Value,
}

impl ReportView {
    pub fn build(report: &IncidentReport, placeholder: &str) -> Self {
        let doc = report.to_document();
        let header = Header {
            report_id: report
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| placeholder.to_string()),
            status: report.status,
            reporter: report.reporter_name(),
            created: format_timestamp(&report.created_at),
            updated: format_timestamp(&report.updated_at),
        };

        let sections = vec![
            policy_agreements(&doc, placeholder),
            personal_info(&doc, placeholder),
            vehicle_info(&doc, placeholder),
            incident_details(&doc, placeholder),
            incident_location(&doc, placeholder),
            vehicle_damage(&doc, report, placeholder),
            witnesses(&doc, report, placeholder),
            accident_description(&doc, placeholder),
            signature(&doc, report, placeholder),
            metadata(&doc, placeholder),
        ];

        Self {
            header,
            sections,
            document: doc,
        }
    }
}

/// Detail rows for one damage marker
pub fn marker_rows(marker: &DamageMarker, placeholder: &str) -> Vec<Row> {
    vec![
        row("Type", marker.kind.label()),
        row("Location", marker.zone()),
        row("Severity", marker.severity.label()),
        row(
            "Description",
            marker.description.as_deref().unwrap_or(placeholder),
        ),
        row("Recorded", format_timestamp(&marker.timestamp)),
    ]
}

/// Short description of the captured signature image
pub fn signature_summary(data: &str, placeholder: &str) -> String {
    let data = data.trim();
    if data.is_empty() {
        return placeholder.to_string();
    }
    match parse_data_url(data) {
        Some((media_type, payload)) => match STANDARD.decode(payload) {
            Ok(bytes) => format!("Captured ({media_type}, {} bytes)", bytes.len()),
            Err(_) => format!("Captured ({media_type}, undecodable)"),
        },
        None => format!("Captured ({} characters)", data.chars().count()),
    }
}

/// `data:<media type>;base64,<payload>` split into its parts
pub fn parse_data_url(data: &str) -> Option<(&str, &str)> {
    let rest = data.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let media_type = meta.strip_suffix(";base64")?;
    Some((media_type, payload))
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn row(label: impl Into<String>, value: impl Into<String>) -> Row {
    Row {
        label: label.into(),
        value: value.into(),
    }
}

/// Row builder over one object of the document
struct Fields<'a> {
    doc: &'a Value,
    base: &'a str,
    placeholder: &'a str,
    rows: Vec<Row>,
}

impl<'a> Fields<'a> {
    fn new(doc: &'a Value, base: &'a str, placeholder: &'a str) -> Self {
        Self {
            doc,
            base,
            placeholder,
            rows: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        if self.base.is_empty() {
            safe_get(self.doc, key)
        } else {
            safe_get(self.doc, &format!("{}.{key}", self.base))
        }
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.get(key).and_then(display)
    }

    fn push(mut self, label: &str, value: Option<String>) -> Self {
        let value = value.unwrap_or_else(|| self.placeholder.to_string());
        self.rows.push(row(label, value));
        self
    }

    fn text(self, label: &str, key: &str) -> Self {
        let value = self.raw(key);
        self.push(label, value)
    }

    /// Wire value of a closed set, shown as words
    fn choice(self, label: &str, key: &str) -> Self {
        let value = match self.get(key) {
            Some(Value::String(s)) => Some(humanize(s)),
            Some(Value::Array(items)) if !items.is_empty() => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(humanize)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        };
        self.push(label, value)
    }

    fn flag(self, label: &str, key: &str, yes: &str, no: &str) -> Self {
        let value = self
            .get(key)
            .and_then(Value::as_bool)
            .map(|b| (if b { yes } else { no }).to_string());
        self.push(label, value)
    }

    fn date(self, label: &str, key: &str) -> Self {
        let value = self.raw(key).map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or(raw)
        });
        self.push(label, value)
    }

    fn timestamp(self, label: &str, key: &str) -> Self {
        let value = self.raw(key).map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|t| format_timestamp(&t.with_timezone(&Utc)))
                .unwrap_or(raw)
        });
        self.push(label, value)
    }

    /// Parts joined with `sep`; placeholder when every part is blank
    fn joined(self, label: &str, keys: &[&str], sep: &str) -> Self {
        let parts: Vec<String> = keys
            .iter()
            .filter_map(|k| self.raw(k))
            .filter(|p| !p.trim().is_empty())
            .collect();
        let value = (!parts.is_empty()).then(|| parts.join(sep));
        self.push(label, value)
    }

    fn name(self, label: &str, first: &str, last: &str) -> Self {
        self.joined(label, &[first, last], " ")
    }

    /// `street, city, state zip`
    fn address(self, label: &str, street: &str, city: &str, state: &str, zip: &str) -> Self {
        let state_zip: Vec<String> = [state, zip]
            .iter()
            .filter_map(|k| self.raw(k))
            .filter(|p| !p.trim().is_empty())
            .collect();
        let mut parts: Vec<String> = [street, city]
            .iter()
            .filter_map(|k| self.raw(k))
            .filter(|p| !p.trim().is_empty())
            .collect();
        if !state_zip.is_empty() {
            parts.push(state_zip.join(" "));
        }
        let value = (!parts.is_empty()).then(|| parts.join(", "));
        self.push(label, value)
    }

    /// `main (qualifier)`, e.g. a plate with its issuing state
    fn qualified(self, label: &str, main: &str, qualifier: &str) -> Self {
        let value = match (self.raw(main), self.raw(qualifier)) {
            (Some(m), Some(q)) if !q.is_empty() => Some(format!("{m} ({q})")),
            (Some(m), _) => Some(m),
            (None, _) => None,
        };
        self.push(label, value)
    }

    fn finish(self) -> Vec<Row> {
        self.rows
    }
}

fn policy_agreements(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "", placeholder)
        .flag("Terms Agreement", "termsAgreement", "Accepted", "Not Accepted")
        .flag("Privacy Agreement", "privacyAgreement", "Accepted", "Not Accepted")
        .flag(
            "E-Signature Agreement",
            "esignatureAgreement",
            "Accepted",
            "Not Accepted",
        )
        .finish();
    Section::new(SectionKey::PolicyAgreements, "Policy Agreements", rows)
}

fn personal_info(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "personalInfo", placeholder)
        .name("Name", "firstName", "lastName")
        .address("Address", "address", "city", "state", "zip")
        .text("Home Phone", "homePhone")
        .text("Work Phone", "workPhone")
        .text("Email", "email")
        .choice("Owns Vehicle", "ownsVehicle")
        .text("Insurance Company", "insuranceCompany")
        .text("Policy Number", "policyNumber")
        .finish();
    Section::new(SectionKey::PersonalInfo, "Personal Information", rows)
}

fn vehicle_info(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "vehicleInfo", placeholder)
        .text("Vehicle Number", "vehicleNumber")
        .qualified("License Plate", "licensePlate", "licenseState")
        .joined("Make/Model", &["vehicleMake", "vehicleModel"], " ")
        .text("Odometer", "odometer")
        .finish();
    Section::new(SectionKey::VehicleInfo, "Vehicle Information", rows)
}

fn incident_details(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "incidentDetails", placeholder)
        .choice("Renter Operating", "renterOperating")
        .choice("Vehicle Use", "vehicleUse")
        .choice("Credit Card Coverage", "creditCardCoverage")
        .text("Description", "description")
        .finish();

    let collected = safe_get(doc, "incidentDetails.operatorInfo").is_some();
    let operator = Section::conditional(
        SectionKey::OperatorInfo,
        "Operator Information",
        collected,
        "The renter was operating the vehicle",
        || {
            Fields::new(doc, "incidentDetails.operatorInfo", placeholder)
                .name("Name", "firstName", "lastName")
                .date("Date of Birth", "dob")
                .text("Phone", "phone")
                .address("Address", "address", "city", "state", "zip")
                .qualified("License Number", "licenseNumber", "licenseState")
                .choice("Owns Vehicle", "ownsVehicle")
                .text("Employer", "employer")
                .text("Work Phone", "workPhone")
                .address("Work Address", "workAddress", "workCity", "workState", "workZip")
                .text("Insurance Company", "insuranceCompany")
                .text("Policy Number", "policyNumber")
                .finish()
        },
    );

    let mut section = Section::new(SectionKey::IncidentDetails, "Incident Details", rows);
    section.children.push(operator);
    section
}

fn incident_location(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "incidentLocation", placeholder)
        .choice("Knows Location", "knowsLocation")
        .date("Date", "date")
        .text("Time", "time")
        .choice("Weather", "weather")
        .address("Address", "address", "city", "state", "zip")
        .text("Police Department", "policeDepartment")
        .text("Police Report Number", "policeReportNumber")
        .finish();
    Section::new(SectionKey::IncidentLocation, "Incident Location", rows)
}

fn vehicle_damage(doc: &Value, report: &IncidentReport, placeholder: &str) -> Section {
    let marker_count = report.vehicle_damage.rental_vehicle_damage.len();
    let rows = Fields::new(doc, "vehicleDamage", placeholder)
        .choice("Other Vehicle Involved", "otherVehicleInvolved")
        .push("Damage Markers", Some(marker_count.to_string()))
        .text("Additional Damage Description", "additionalDamageDescription")
        .finish();

    let base = "vehicleDamage.otherVehicleInfo";
    let other_collected = safe_get(doc, base).is_some();
    let not_involved = "No other vehicle was involved";

    let owner = Section::conditional(
        SectionKey::OtherVehicleOwner,
        "Other Vehicle Owner",
        other_collected,
        not_involved,
        || {
            Fields::new(doc, "vehicleDamage.otherVehicleInfo.owner", placeholder)
                .name("Name", "firstName", "lastName")
                .address("Address", "address", "city", "state", "zip")
                .text("Phone", "phone")
                .finish()
        },
    );

    let operator_collected = safe_get(doc, "vehicleDamage.otherVehicleInfo.operator").is_some();
    let operator_reason = if other_collected {
        "The owner was operating the other vehicle"
    } else {
        not_involved
    };
    let operator = Section::conditional(
        SectionKey::OtherVehicleOperator,
        "Other Vehicle Operator",
        operator_collected,
        operator_reason,
        || {
            Fields::new(doc, "vehicleDamage.otherVehicleInfo.operator", placeholder)
                .name("Name", "firstName", "lastName")
                .address("Address", "address", "city", "state", "zip")
                .text("Phone", "phone")
                .qualified("License Number", "licenseNumber", "licenseState")
                .text("Insurance Company", "insuranceCompany")
                .text("Policy Number", "policyNumber")
                .finish()
        },
    );

    let details = Section::conditional(
        SectionKey::OtherVehicleDetails,
        "Other Vehicle Details",
        other_collected,
        not_involved,
        || {
            Fields::new(doc, "vehicleDamage.otherVehicleInfo.vehicle", placeholder)
                .joined("Make/Model", &["make", "model"], " ")
                .text("Odometer", "odometer")
                .qualified("License Plate", "licensePlate", "licenseState")
                .text("Damage Description", "damageDescription")
                .choice("Driveable", "driveable")
                .finish()
        },
    );

    let mut section = Section::new(SectionKey::VehicleDamage, "Vehicle Damage", rows);
    section.children = vec![owner, operator, details];
    section
}

fn witnesses(doc: &Value, report: &IncidentReport, placeholder: &str) -> Section {
    let count = report.witnesses.len();
    let mut section = Section::conditional(
        SectionKey::Witnesses,
        "Witnesses",
        count > 0,
        "No witnesses were reported",
        Vec::new,
    );
    section.children = (0..count)
        .map(|i| {
            let base = format!("witnesses.{i}");
            let rows = Fields::new(doc, &base, placeholder)
                .name("Name", "firstName", "lastName")
                .address("Address", "address", "city", "state", "zip")
                .text("Phone", "phone")
                .finish();
            Section::new(SectionKey::Witness, format!("Witness {}", i + 1), rows)
        })
        .collect();
    section
}

fn accident_description(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "accidentDescription", placeholder)
        .choice("Direction of Travel", "directionOfTravel")
        .choice("Traffic Controls", "trafficControls")
        .choice("Traffic Control Status", "trafficControlStatus")
        .choice("Road Conditions", "roadConditions")
        .choice("Lighting Conditions", "lightingConditions")
        .text("Description", "description")
        .finish();
    Section::new(SectionKey::AccidentDescription, "Accident Description", rows)
}

fn signature(doc: &Value, report: &IncidentReport, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "signature", placeholder)
        .flag(
            "Accuracy Confirmation",
            "accuracyConfirmation",
            "Confirmed",
            "Not Confirmed",
        )
        .timestamp("Signed At", "signedAt")
        .push(
            "Signature",
            Some(signature_summary(&report.signature.signature_data, placeholder)),
        )
        .finish();
    Section::new(SectionKey::Signature, "Signature and Confirmation", rows)
}

fn metadata(doc: &Value, placeholder: &str) -> Section {
    let rows = Fields::new(doc, "", placeholder)
        .text("Report ID", "id")
        .choice("Status", "status")
        .timestamp("Created At", "createdAt")
        .timestamp("Updated At", "updatedAt")
        .finish();
    Section::new(SectionKey::Metadata, "Metadata", rows)
}
