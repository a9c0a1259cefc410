use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Principal, RequestId, RequestStatus, UserRole, VendorRequest};
use super::form::VendorRequestDraft;
use super::normalize::normalize;
use super::repository::{RequestRepository, UserDirectory, VendorRepository};
use super::schema::{validate, ValidationErrors};
use super::service::{OnboardingError, VendorOnboardingService};

impl<R, V, U> VendorOnboardingService<R, V, U>
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    /// Validate, normalize, and persist a new request as `pending`.
    ///
    /// Nothing is written when validation fails.
    pub fn submit(
        &self,
        principal: &Principal,
        draft: VendorRequestDraft,
    ) -> Result<VendorRequest, OnboardingError> {
        validate(&draft)?;
        let requester = self.resolve(principal).inspect_err(|err| {
            warn!(user = %principal.user_id, error = %err, "unable to resolve requester");
        })?;

        let normalized = normalize(draft).map_err(ValidationErrors::from)?;
        let request = VendorRequest {
            id: RequestId::next(),
            profile: normalized.profile,
            justification: normalized.justification,
            project_name: normalized.project_name,
            requested_by: requester.id,
            requested_at: Utc::now(),
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            decision_notes: None,
            linked_vendor_id: None,
        };

        let stored = self
            .requests
            .insert(request)
            .map_err(OnboardingError::Persistence)?;
        info!(
            request_id = %stored.id,
            requester = %stored.requested_by,
            vendor = %stored.profile.name,
            "vendor request submitted"
        );
        Ok(stored)
    }

    /// Requests submitted by the calling user.
    pub fn list_mine(&self, principal: &Principal) -> Result<Vec<VendorRequest>, OnboardingError> {
        let user = self.resolve(principal)?;
        self.requests
            .list_by_requester(&user.id)
            .map_err(OnboardingError::Persistence)
    }

    /// Admin queue filtered by status.
    pub fn list_by_status(
        &self,
        principal: &Principal,
        status: RequestStatus,
    ) -> Result<Vec<VendorRequest>, OnboardingError> {
        self.resolve_with_role(principal, UserRole::Admin)?;
        self.requests
            .list_by_status(status)
            .map_err(OnboardingError::Persistence)
    }

    /// Every request, unfiltered.
    pub fn list_all(&self, principal: &Principal) -> Result<Vec<VendorRequest>, OnboardingError> {
        self.resolve_with_role(principal, UserRole::Admin)?;
        self.requests.list_all().map_err(OnboardingError::Persistence)
    }

    /// Single request, visible to its requester and to admins.
    pub fn get(
        &self,
        principal: &Principal,
        id: &RequestId,
    ) -> Result<VendorRequest, OnboardingError> {
        let user = self.resolve(principal)?;
        let request = self
            .requests
            .fetch(id)
            .map_err(OnboardingError::Persistence)?
            .ok_or_else(|| OnboardingError::request_not_found(id.0.clone()))?;

        if user.role != UserRole::Admin && request.requested_by != user.id {
            return Err(OnboardingError::request_not_found(id.0.clone()));
        }
        Ok(request)
    }

    /// Requests already filed for a VAT number, for duplicate checks before submitting.
    pub fn requests_with_vat(
        &self,
        principal: &Principal,
        vat_number: &str,
    ) -> Result<Vec<VendorRequest>, OnboardingError> {
        self.resolve(principal)?;
        self.requests
            .find_by_vat(vat_number.trim())
            .map_err(OnboardingError::Persistence)
    }
}
