use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::domain::{
    Principal, RequestId, RequestStatus, User, Vendor, VendorId, VendorRequest,
};
use super::repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};
use super::service::{OnboardingError, VendorOnboardingService};

/// How many requests point at a vendor, by lifecycle bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestCounts {
    pub total: u32,
    /// Pending or reviewing.
    pub pending: u32,
    pub approved: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCatalogEntry {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub request_counts: RequestCounts,
}

pub(crate) fn count_linked_requests(requests: &[VendorRequest]) -> HashMap<VendorId, RequestCounts> {
    let mut counts: HashMap<VendorId, RequestCounts> = HashMap::new();
    for request in requests {
        let Some(vendor_id) = &request.linked_vendor_id else {
            continue;
        };
        let entry = counts.entry(vendor_id.clone()).or_default();
        entry.total += 1;
        if request.status.is_open() {
            entry.pending += 1;
        }
        if request.status == RequestStatus::Approved {
            entry.approved += 1;
        }
    }
    counts
}

impl<R, V, U> VendorOnboardingService<R, V, U>
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    /// Whole catalog with request counts; unfiltered and unpaginated.
    pub fn list_vendors(
        &self,
        principal: &Principal,
    ) -> Result<Vec<VendorCatalogEntry>, OnboardingError> {
        self.resolve(principal)?;
        let vendors = self.vendors.list().map_err(OnboardingError::Persistence)?;
        let requests = self.requests.list_all().map_err(OnboardingError::Persistence)?;
        let counts = count_linked_requests(&requests);

        Ok(vendors
            .into_iter()
            .map(|vendor| {
                let request_counts = counts.get(&vendor.id).copied().unwrap_or_default();
                VendorCatalogEntry {
                    vendor,
                    request_counts,
                }
            })
            .collect())
    }

    /// Catalog vendors already registered under a VAT number.
    pub fn vendors_with_vat(
        &self,
        principal: &Principal,
        vat_number: &str,
    ) -> Result<Vec<Vendor>, OnboardingError> {
        self.resolve(principal)?;
        self.vendors
            .find_by_vat(vat_number.trim())
            .map_err(OnboardingError::Persistence)
    }

    /// Insert a catalog vendor built from an approved request.
    pub(crate) fn promote(
        &self,
        request: &VendorRequest,
        reviewer: &User,
        now: DateTime<Utc>,
    ) -> Result<Vendor, OnboardingError> {
        let vendor = Vendor {
            id: VendorId::next(),
            profile: request.profile.clone(),
            notes: Some(request.justification.clone()),
            created_by: reviewer.id.clone(),
            created_at: now,
            updated_at: Some(now),
            updated_by: Some(reviewer.id.clone()),
        };

        let stored = self
            .vendors
            .insert(vendor)
            .map_err(OnboardingError::Persistence)?;
        info!(
            vendor_id = %stored.id,
            request_id = %request.id,
            reviewer = %reviewer.id,
            "vendor promoted into catalog"
        );
        Ok(stored)
    }

    /// Refresh audit fields on an already linked vendor.
    pub(crate) fn touch_vendor(
        &self,
        vendor_id: &VendorId,
        reviewer: &User,
        now: DateTime<Utc>,
    ) -> Result<Vendor, OnboardingError> {
        self.vendors
            .touch(vendor_id, now, &reviewer.id)
            .map_err(|err| match err {
                RepositoryError::NotFound => OnboardingError::vendor_not_found(vendor_id.0.clone()),
                other => OnboardingError::Persistence(other),
            })
    }

    /// Take back a vendor promoted for a request whose update did not land.
    pub(crate) fn withdraw_promotion(&self, vendor_id: &VendorId, request_id: &RequestId) {
        match self.vendors.remove(vendor_id) {
            Ok(_) => info!(
                vendor_id = %vendor_id,
                request_id = %request_id,
                "promotion withdrawn after failed request update"
            ),
            Err(err) => error!(
                vendor_id = %vendor_id,
                request_id = %request_id,
                error = %err,
                "orphaned vendor left in catalog"
            ),
        }
    }
}
