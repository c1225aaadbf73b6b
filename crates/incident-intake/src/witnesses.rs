//! Rebuild the witness list from indexed flat keys

use incident_types::Contact;
use tracing::warn;

use crate::fields::FlatSubmission;
use crate::schema::{indexed_key, HAS_WITNESSES, WITNESS, WITNESS_COUNT};

/// Largest witness count accepted from a submission
pub const MAX_WITNESSES: usize = u16::MAX as usize;

/// Number of witnesses the submission declares
///
/// `hasWitnesses == "no"` wins over any count; an absent or unparsable count,
/// or one above [`MAX_WITNESSES`], means zero.
pub fn declared_count(fields: &FlatSubmission) -> usize {
    if fields
        .text(HAS_WITNESSES)
        .is_some_and(|v| v.eq_ignore_ascii_case("no"))
    {
        return 0;
    }
    let Some(raw) = fields.text(WITNESS_COUNT).filter(|v| !v.trim().is_empty()) else {
        return 0;
    };
    match raw.trim().parse::<usize>() {
        Ok(count) if count <= MAX_WITNESSES => count,
        _ => {
            warn!(witness_count = raw, "Ignoring unusable witness count");
            0
        }
    }
}

/// Exactly `declared_count` witnesses, in index order
///
/// A field missing for an index becomes an empty string. Each field is read
/// from `<template>[i]` first, then from the i-th entry of a repeated bare
/// `<template>` key.
pub fn reconstruct(fields: &FlatSubmission) -> Vec<Contact> {
    (0..declared_count(fields))
        .map(|i| {
            let field = |template: &str| witness_field(fields, template, i);
            Contact {
                first_name: field(WITNESS.first_name),
                last_name: field(WITNESS.last_name),
                address: field(WITNESS.address),
                city: field(WITNESS.city),
                state: field(WITNESS.state),
                zip: field(WITNESS.zip),
                phone: field(WITNESS.phone),
            }
        })
        .collect()
}

fn witness_field(fields: &FlatSubmission, template: &str, index: usize) -> String {
    if let Some(value) = fields.text(&indexed_key(template, index)) {
        return value.to_string();
    }
    fields
        .nth(template, index)
        .map(str::to_string)
        .unwrap_or_default()
}
