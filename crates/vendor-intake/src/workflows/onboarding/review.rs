//! Admin decisions on vendor requests and the catalog promotion they trigger.
//!
//! The vendor write always happens before the request is patched, and the request
//! patch is a compare-and-set against the status observed when the request was loaded.
//! A vendor failure therefore leaves the request untouched, and a concurrent decision
//! on the same request surfaces as [`OnboardingError::Conflict`]. When the patch fails
//! after a fresh promotion, the promoted vendor is removed again.

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Decision, Principal, RequestId, RequestPatch, RequestStatus, ReviewStamp, UserRole,
    VendorRequest,
};
use super::repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};
use super::service::{OnboardingError, VendorOnboardingService};

/// Whether `decision` may be applied to a request currently in `from`.
///
/// Open requests accept either decision. An approved request may be approved again,
/// which only refreshes the linked vendor's audit stamp. Everything else is final.
pub fn decision_allowed(from: RequestStatus, decision: Decision) -> bool {
    match (from, decision) {
        (RequestStatus::Pending | RequestStatus::Reviewing, _) => true,
        (RequestStatus::Approved, Decision::Approved) => true,
        (RequestStatus::Approved, Decision::Rejected) | (RequestStatus::Rejected, _) => false,
    }
}

impl<R, V, U> VendorOnboardingService<R, V, U>
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    /// Record an admin decision, promoting the request into the catalog on approval.
    ///
    /// `decision_notes` of `Some("")` clears the notes; `None` keeps whatever is stored.
    pub fn decide(
        &self,
        principal: &Principal,
        request_id: &RequestId,
        decision: Decision,
        decision_notes: Option<String>,
    ) -> Result<VendorRequest, OnboardingError> {
        let request = self.load_request(request_id)?;
        let reviewer = self
            .resolve_with_role(principal, UserRole::Admin)
            .inspect_err(|err| {
                warn!(user = %principal.user_id, error = %err, "unable to resolve reviewer");
            })?;

        let requested = decision.status();
        if !decision_allowed(request.status, decision) {
            return Err(OnboardingError::Conflict {
                id: request.id.0.clone(),
                found: request.status,
                requested,
            });
        }

        let now = Utc::now();
        let linked_vendor_id = match decision {
            Decision::Approved => match &request.linked_vendor_id {
                Some(vendor_id) => {
                    self.touch_vendor(vendor_id, &reviewer, now)?;
                    None
                }
                None => Some(self.promote(&request, &reviewer, now)?.id),
            },
            Decision::Rejected => None,
        };
        let promoted = linked_vendor_id.clone();

        let patch = RequestPatch {
            status: requested,
            review: Some(ReviewStamp {
                reviewed_by: reviewer.id.clone(),
                reviewed_at: now,
            }),
            linked_vendor_id,
            decision_notes,
        };

        let updated = self
            .requests
            .apply_patch(&request.id, request.status, patch)
            .map_err(|err| {
                if let Some(vendor_id) = &promoted {
                    warn!(
                        request_id = %request.id,
                        vendor_id = %vendor_id,
                        error = %err,
                        "request update failed after promotion"
                    );
                    self.withdraw_promotion(vendor_id, &request.id);
                }
                patch_error(&request, requested, err)
            })?;

        info!(
            request_id = %updated.id,
            reviewer = %reviewer.id,
            status = %updated.status,
            linked_vendor = ?updated.linked_vendor_id.as_ref().map(|id| id.0.as_str()),
            "vendor request decided"
        );
        Ok(updated)
    }

    /// Move a pending request into the `reviewing` queue.
    pub fn start_review(
        &self,
        principal: &Principal,
        request_id: &RequestId,
    ) -> Result<VendorRequest, OnboardingError> {
        let request = self.load_request(request_id)?;
        let reviewer = self.resolve_with_role(principal, UserRole::Admin)?;

        if request.status != RequestStatus::Pending {
            return Err(OnboardingError::Conflict {
                id: request.id.0.clone(),
                found: request.status,
                requested: RequestStatus::Reviewing,
            });
        }

        let updated = self
            .requests
            .apply_patch(
                &request.id,
                RequestStatus::Pending,
                RequestPatch::status_only(RequestStatus::Reviewing),
            )
            .map_err(|err| patch_error(&request, RequestStatus::Reviewing, err))?;

        info!(request_id = %updated.id, reviewer = %reviewer.id, "vendor request under review");
        Ok(updated)
    }

    fn load_request(&self, request_id: &RequestId) -> Result<VendorRequest, OnboardingError> {
        self.requests
            .fetch(request_id)
            .map_err(OnboardingError::Persistence)?
            .ok_or_else(|| OnboardingError::request_not_found(request_id.0.clone()))
    }
}

fn patch_error(
    request: &VendorRequest,
    requested: RequestStatus,
    err: RepositoryError,
) -> OnboardingError {
    match err {
        RepositoryError::StatusMismatch { found, .. } => OnboardingError::Conflict {
            id: request.id.0.clone(),
            found,
            requested,
        },
        RepositoryError::NotFound => OnboardingError::request_not_found(request.id.0.clone()),
        other => OnboardingError::Persistence(other),
    }
}
