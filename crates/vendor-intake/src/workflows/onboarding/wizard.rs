//! Multi-step intake form.
//!
//! The wizard is a plain state machine over a [`VendorRequestDraft`]: a step index, a
//! per-field error map, and a submitting flag. Field edits and navigation are
//! synchronous; the only suspension point is the final [`FormWizard::submit`] call,
//! which holds the wizard mutably until its handler settles.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use tracing::warn;

use super::form::{FieldPath, VendorRequestDraft};
use super::schema::{validate, validate_field, ValidationReason};

/// One page of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldPath],
}

pub static VENDOR_REQUEST_STEPS: [WizardStep; 4] = [
    WizardStep {
        id: "company-data",
        title: "Company data",
        description: "Core information about the vendor.",
        fields: &[
            FieldPath::Name,
            FieldPath::VatNumber,
            FieldPath::Website,
            FieldPath::Industry,
            FieldPath::Categories,
        ],
    },
    WizardStep {
        id: "headquarters",
        title: "Headquarters",
        description: "The main operating location.",
        fields: &[
            FieldPath::HeadquartersAddressLine1,
            FieldPath::HeadquartersAddressLine2,
            FieldPath::HeadquartersCity,
            FieldPath::HeadquartersRegion,
            FieldPath::HeadquartersPostalCode,
            FieldPath::HeadquartersCountry,
        ],
    },
    WizardStep {
        id: "contacts",
        title: "Contacts",
        description: "Points of contact for onboarding and operations.",
        fields: &[
            FieldPath::PrimaryContactName,
            FieldPath::PrimaryContactRole,
            FieldPath::PrimaryContactEmail,
            FieldPath::PrimaryContactPhone,
        ],
    },
    WizardStep {
        id: "request-context",
        title: "Request context",
        description: "Why the vendor should be added and how it relates to your projects.",
        fields: &[FieldPath::Justification],
    },
];

pub const SUBMIT_FAILED_NOTICE: &str = "We cannot create the request right now. Please try again.";
pub const REVIEW_FIELDS_NOTICE: &str = "Some fields need attention before the request can be sent.";

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// Persisted; the wizard has been reset and the hosting dialog should close.
    Submitted(T),
    /// A field failed validation; errors are on the wizard.
    Invalid,
    /// The handler failed; the draft and step are untouched so the user can retry.
    Failed(String),
    /// Submit is only available from the last step.
    NotOnLastStep,
}

/// Clears the submitting flag when dropped, including when the submit future is cancelled.
struct SubmittingGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> SubmittingGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Multi-step intake form.
///
/// Navigation and `submit` take `&mut self`, so no step change can happen while a
/// submit is awaiting its handler.
#[derive(Debug, Clone)]
pub struct FormWizard {
    steps: &'static [WizardStep],
    active: usize,
    draft: VendorRequestDraft,
    errors: BTreeMap<FieldPath, ValidationReason>,
    submitting: bool,
    notice: Option<String>,
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWizard {
    pub fn new() -> Self {
        Self::with_steps(&VENDOR_REQUEST_STEPS)
    }

    /// Build a wizard over custom steps. An empty step list falls back to the default one.
    pub fn with_steps(steps: &'static [WizardStep]) -> Self {
        let steps = if steps.is_empty() {
            &VENDOR_REQUEST_STEPS[..]
        } else {
            steps
        };
        Self {
            steps,
            active: 0,
            draft: VendorRequestDraft::default(),
            errors: BTreeMap::new(),
            submitting: false,
            notice: None,
        }
    }

    pub fn steps(&self) -> &'static [WizardStep] {
        self.steps
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn current_step(&self) -> &'static WizardStep {
        let steps = self.steps;
        &steps[self.active.min(steps.len() - 1)]
    }

    pub fn is_first_step(&self) -> bool {
        self.active == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.active + 1 == self.steps.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn draft(&self) -> &VendorRequestDraft {
        &self.draft
    }

    pub fn field_error(&self, path: FieldPath) -> Option<ValidationReason> {
        self.errors.get(&path).copied()
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, ValidationReason> {
        &self.errors
    }

    /// User-facing message from the last failed submit, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Update a field and re-validate it. Returns the field's error, if any.
    pub fn set_field(&mut self, path: FieldPath, value: impl Into<String>) -> Option<ValidationReason> {
        self.draft.set(path, value);
        if path.is_primary_contact() {
            // Whether the contact name is required depends on its siblings.
            self.revalidate(FieldPath::PrimaryContactName);
        }
        self.revalidate(path)
    }

    /// Advance one step if every field on the current step is valid.
    pub fn go_next(&mut self) -> bool {
        if !self.validate_current_step() {
            return false;
        }
        if self.is_last_step() {
            return false;
        }
        self.active += 1;
        true
    }

    pub fn go_back(&mut self) -> bool {
        if self.active == 0 {
            return false;
        }
        self.active -= 1;
        true
    }

    /// Back to the first step with an empty draft.
    pub fn reset(&mut self) {
        self.active = 0;
        self.draft = VendorRequestDraft::default();
        self.errors.clear();
        self.notice = None;
    }

    /// Validate the last step and the whole draft, then hand the draft to `handler`.
    ///
    /// `is_submitting` is set while the handler runs and cleared on every exit path.
    pub async fn submit<F, Fut, T, E>(&mut self, handler: F) -> SubmitOutcome<T>
    where
        F: FnOnce(VendorRequestDraft) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if !self.is_last_step() {
            return SubmitOutcome::NotOnLastStep;
        }
        if !self.validate_current_step() {
            return SubmitOutcome::Invalid;
        }
        if let Err(errors) = validate(&self.draft) {
            for error in errors.iter() {
                self.errors.insert(error.field, error.reason);
            }
            self.notice = Some(REVIEW_FIELDS_NOTICE.to_string());
            return SubmitOutcome::Invalid;
        }

        let payload = self.draft.clone();
        let result = {
            let _guard = SubmittingGuard::engage(&mut self.submitting);
            handler(payload).await
        };

        match result {
            Ok(value) => {
                self.reset();
                SubmitOutcome::Submitted(value)
            }
            Err(err) => {
                warn!(error = %err, "vendor request submission failed");
                self.notice = Some(SUBMIT_FAILED_NOTICE.to_string());
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    fn validate_current_step(&mut self) -> bool {
        let fields = self.current_step().fields;
        let mut valid = true;
        for path in fields {
            if self.revalidate(*path).is_some() {
                valid = false;
            }
        }
        valid
    }

    fn revalidate(&mut self, path: FieldPath) -> Option<ValidationReason> {
        match validate_field(&self.draft, path) {
            Ok(()) => {
                self.errors.remove(&path);
                None
            }
            Err(error) => {
                self.errors.insert(path, error.reason);
                Some(error.reason)
            }
        }
    }
}
