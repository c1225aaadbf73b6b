//! Flat field names the intake form posts

/// Must be present and non-blank for a submission to be accepted
pub const REQUIRED_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "address",
    "city",
    "state",
    "zip",
    "homePhone",
    "email",
    "ownsVehicle",
    "insuranceCompany",
    "policyNumber",
    "vehicleNumber",
    "licensePlate",
    "licenseState",
    "vehicleMake",
    "vehicleModel",
    "odometer",
    "renterOperating",
    "vehicleUse",
    "creditCardCoverage",
    "description",
    "knowsLocation",
    "otherVehicleInvolved",
    "accidentDescription",
    "signatureData",
];

pub const AGREEMENT_FIELDS: [&str; 3] = ["termsAgreement", "privacyAgreement", "esignatureAgreement"];

pub const DAMAGE_MARKERS: &str = "damageMarkers";

/// Gate and count for the indexed witness group
pub const HAS_WITNESSES: &str = "hasWitnesses";
pub const WITNESS_COUNT: &str = "witnessCount";

/// Per-witness field templates, expanded as `<template>[<index>]`
#[derive(Debug, Clone, Copy)]
pub struct WitnessKeys {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub zip: &'static str,
    pub phone: &'static str,
}

pub const WITNESS: WitnessKeys = WitnessKeys {
    first_name: "witnessFirstName",
    last_name: "witnessLastName",
    address: "witnessAddress",
    city: "witnessCity",
    state: "witnessState",
    zip: "witnessZip",
    phone: "witnessPhone",
};

/// `witnessFirstName` + 2 gives `witnessFirstName[2]`
pub fn indexed_key(template: &str, index: usize) -> String {
    format!("{template}[{index}]")
}

/// Contact block keys shared by the other-vehicle owner and operator groups
#[derive(Debug, Clone, Copy)]
pub struct ContactKeys {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub zip: &'static str,
    pub phone: &'static str,
}

pub const OTHER_OWNER: ContactKeys = ContactKeys {
    first_name: "otherOwnerFirstName",
    last_name: "otherOwnerLastName",
    address: "otherOwnerAddress",
    city: "otherOwnerCity",
    state: "otherOwnerState",
    zip: "otherOwnerZip",
    phone: "otherOwnerPhone",
};

pub const OTHER_OPERATOR: ContactKeys = ContactKeys {
    first_name: "otherOperatorFirstName",
    last_name: "otherOperatorLastName",
    address: "otherOperatorAddress",
    city: "otherOperatorCity",
    state: "otherOperatorState",
    zip: "otherOperatorZip",
    phone: "otherOperatorPhone",
};
