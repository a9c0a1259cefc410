//! Field constraints for a submittable vendor request.
//!
//! Every field has exactly one entry in [`FIELD_CONSTRAINTS`]. Validation is a pure
//! function of the draft, so the wizard can gate each step and the intake store can
//! re-check the whole request before anything is persisted.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::form::{is_present, FieldPath, VendorRequestDraft};

/// Minimum lengths are exclusive: the value must be strictly longer.
pub const NAME_MIN_EXCLUSIVE: usize = 2;
pub const JUSTIFICATION_MIN_EXCLUSIVE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldConstraint {
    Optional,
    /// Character count of the trimmed value must exceed the bound.
    LongerThan(usize),
    /// Required as soon as any primary-contact sub-field is filled in.
    RequiredInPrimaryContact,
}

pub const FIELD_CONSTRAINTS: [(FieldPath, FieldConstraint); 16] = [
    (FieldPath::Name, FieldConstraint::LongerThan(NAME_MIN_EXCLUSIVE)),
    (FieldPath::VatNumber, FieldConstraint::Optional),
    (FieldPath::Website, FieldConstraint::Optional),
    (FieldPath::Industry, FieldConstraint::Optional),
    (FieldPath::Categories, FieldConstraint::Optional),
    (FieldPath::HeadquartersAddressLine1, FieldConstraint::Optional),
    (FieldPath::HeadquartersAddressLine2, FieldConstraint::Optional),
    (FieldPath::HeadquartersCity, FieldConstraint::Optional),
    (FieldPath::HeadquartersRegion, FieldConstraint::Optional),
    (FieldPath::HeadquartersPostalCode, FieldConstraint::Optional),
    (FieldPath::HeadquartersCountry, FieldConstraint::Optional),
    (FieldPath::PrimaryContactName, FieldConstraint::RequiredInPrimaryContact),
    (FieldPath::PrimaryContactRole, FieldConstraint::Optional),
    (FieldPath::PrimaryContactEmail, FieldConstraint::Optional),
    (FieldPath::PrimaryContactPhone, FieldConstraint::Optional),
    (
        FieldPath::Justification,
        FieldConstraint::LongerThan(JUSTIFICATION_MIN_EXCLUSIVE),
    ),
];

pub fn constraint_for(path: FieldPath) -> FieldConstraint {
    FIELD_CONSTRAINTS
        .iter()
        .find(|(candidate, _)| *candidate == path)
        .map(|(_, constraint)| *constraint)
        .unwrap_or(FieldConstraint::Optional)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    TooShort,
    Required,
}

impl ValidationReason {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationReason::TooShort => "too_short",
            ValidationReason::Required => "required",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: FieldPath,
    pub reason: ValidationReason,
}

/// Structured set of field failures, one reason per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("invalid vendor request: {}", describe(.0))]
pub struct ValidationErrors(BTreeMap<FieldPath, ValidationReason>);

fn describe(errors: &BTreeMap<FieldPath, ValidationReason>) -> String {
    errors
        .iter()
        .map(|(field, reason)| format!("{field} ({reason})"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FieldPath) -> Option<ValidationReason> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.0
            .iter()
            .map(|(field, reason)| ValidationError {
                field: *field,
                reason: *reason,
            })
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.insert(error.field, error.reason);
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::default();
        errors.push(error);
        errors
    }
}

/// Check a single field against its constraint.
pub fn validate_field(draft: &VendorRequestDraft, path: FieldPath) -> Result<(), ValidationError> {
    let value = draft.get(path);
    let failure = match constraint_for(path) {
        FieldConstraint::Optional => None,
        FieldConstraint::LongerThan(bound) => {
            let length = value.map(|raw| raw.trim().chars().count()).unwrap_or(0);
            (length <= bound).then_some(ValidationReason::TooShort)
        }
        FieldConstraint::RequiredInPrimaryContact => {
            let contact_supplied = draft
                .primary_contact
                .as_ref()
                .is_some_and(|contact| contact.is_supplied());
            (contact_supplied && !is_present(value)).then_some(ValidationReason::Required)
        }
    };

    match failure {
        Some(reason) => Err(ValidationError {
            field: path,
            reason,
        }),
        None => Ok(()),
    }
}

/// Validate a subset of fields, collecting every failure.
pub fn validate_fields(
    draft: &VendorRequestDraft,
    fields: &[FieldPath],
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for path in fields {
        if let Err(error) = validate_field(draft, *path) {
            errors.push(error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the whole request.
pub fn validate(draft: &VendorRequestDraft) -> Result<(), ValidationErrors> {
    validate_fields(draft, &FieldPath::ALL)
}
