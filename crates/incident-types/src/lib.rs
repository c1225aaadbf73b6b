//! Incident report aggregate and its value sets
//!
//! Shared by the intake normalizer, the stores, the renderers and the mailer.

pub mod choices;
pub mod constraints;
pub mod damage;
pub mod types;

pub use choices::{
    humanize, DamageKind, DamageSeverity, Direction, Lighting, ReportStatus, RoadCondition,
    TrafficControl, TrafficControlStatus, VehicleUse, Weather, YesNo,
};
pub use constraints::ConstraintViolation;
pub use damage::{location_zone, DamageMarker, MarkerPoint, COORDINATE_MAX};
pub use types::{
    AccidentDescription, Contact, IncidentDetails, IncidentLocation, IncidentReport,
    OperatorInfo, OtherOperator, OtherVehicle, OtherVehicleInfo, PersonalInfo, ReportId,
    Signature, VehicleDamage, VehicleInfo,
};
