//! Vendor onboarding workflow.
//!
//! Buyers submit vendor requests through a multi-step form, admins approve or reject
//! them, and approved requests are promoted into the shared vendor catalog.

pub mod catalog;
pub mod domain;
pub mod form;
mod intake;
pub mod memory;
pub mod normalize;
pub mod repository;
pub mod review;
pub mod router;
pub mod schema;
pub mod seed;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use catalog::{RequestCounts, VendorCatalogEntry};
pub use domain::{
    Decision, Headquarters, Principal, PrimaryContact, RequestId, RequestPatch, RequestStatus,
    ReviewStamp, SecondaryContact, UnknownStatus, User, UserId, UserRole, Vendor, VendorId,
    VendorProfile, VendorRequest,
};
pub use form::{AddressDraft, ContactDraft, FieldPath, VendorRequestDraft};
pub use memory::InMemoryStore;
pub use repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};
pub use review::decision_allowed;
pub use router::{onboarding_router, USER_HEADER};
pub use schema::{validate, validate_field, ValidationError, ValidationErrors, ValidationReason};
pub use seed::{seed, SeedOutcome};
pub use service::{OnboardingError, ResolutionError, VendorOnboardingService};
pub use wizard::{FormWizard, SubmitOutcome, WizardStep, VENDOR_REQUEST_STEPS};
