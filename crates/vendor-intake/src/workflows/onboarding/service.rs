use std::sync::Arc;

use super::domain::{Principal, RequestStatus, User, UserId, UserRole};
use super::repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};
use super::schema::ValidationErrors;

/// Generic message shown to callers when an operation fails for reasons they cannot fix.
pub const UNAVAILABLE_MESSAGE: &str = "we cannot process the request right now";

/// Service composing the request store, vendor catalog, and user directory.
///
/// Intake operations live in `intake.rs`, catalog listings in `catalog.rs`, and admin
/// decisions in `review.rs`.
pub struct VendorOnboardingService<R, V, U> {
    pub(crate) requests: Arc<R>,
    pub(crate) vendors: Arc<V>,
    pub(crate) users: Arc<U>,
}

impl<R, V, U> Clone for VendorOnboardingService<R, V, U> {
    fn clone(&self) -> Self {
        Self {
            requests: Arc::clone(&self.requests),
            vendors: Arc::clone(&self.vendors),
            users: Arc::clone(&self.users),
        }
    }
}

impl<R, V, U> VendorOnboardingService<R, V, U>
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    pub fn new(requests: Arc<R>, vendors: Arc<V>, users: Arc<U>) -> Self {
        Self {
            requests,
            vendors,
            users,
        }
    }

    /// Resolve the caller to a directory user.
    pub fn resolve(&self, principal: &Principal) -> Result<User, OnboardingError> {
        self.users
            .fetch(&principal.user_id)
            .map_err(OnboardingError::Persistence)?
            .ok_or_else(|| ResolutionError::UnknownUser(principal.user_id.clone()).into())
    }

    pub(crate) fn resolve_with_role(
        &self,
        principal: &Principal,
        required: UserRole,
    ) -> Result<User, OnboardingError> {
        let user = self.resolve(principal)?;
        if user.role != required {
            return Err(ResolutionError::RoleMismatch {
                user: user.id,
                required,
                actual: user.role,
            }
            .into());
        }
        Ok(user)
    }
}

/// The caller's identity could not be established for the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no principal supplied")]
    MissingPrincipal,
    #[error("user '{0}' is not known")]
    UnknownUser(UserId),
    #[error("user '{user}' has role {actual}, {required} required")]
    RoleMismatch {
        user: UserId,
        required: UserRole,
        actual: UserRole,
    },
}

/// Error raised by the onboarding service.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("request '{id}' is {found} and cannot become {requested}")]
    Conflict {
        id: String,
        found: RequestStatus,
        requested: RequestStatus,
    },
    #[error("persistence failure: {0}")]
    Persistence(#[source] RepositoryError),
}

impl OnboardingError {
    pub(crate) fn request_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "vendor request",
            id: id.into(),
        }
    }

    pub(crate) fn vendor_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "vendor",
            id: id.into(),
        }
    }

    /// Message safe to show to end users; details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            OnboardingError::Validation(errors) => errors.to_string(),
            OnboardingError::Conflict { .. } => self.to_string(),
            OnboardingError::Resolution(_)
            | OnboardingError::NotFound { .. }
            | OnboardingError::Persistence(_) => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}
