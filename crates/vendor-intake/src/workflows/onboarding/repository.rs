use chrono::{DateTime, Utc};

use super::domain::{
    RequestId, RequestPatch, RequestStatus, User, UserId, Vendor, VendorId, VendorRequest,
};

/// Vendor request collection. Listings are ordered newest first by `requested_at`.
pub trait RequestRepository: Send + Sync {
    fn insert(&self, request: VendorRequest) -> Result<VendorRequest, RepositoryError>;
    fn fetch(&self, id: &RequestId) -> Result<Option<VendorRequest>, RepositoryError>;
    fn list_all(&self) -> Result<Vec<VendorRequest>, RepositoryError>;
    fn list_by_status(&self, status: RequestStatus) -> Result<Vec<VendorRequest>, RepositoryError>;
    fn list_by_requester(&self, requester: &UserId)
        -> Result<Vec<VendorRequest>, RepositoryError>;
    fn find_by_vat(&self, vat_number: &str) -> Result<Vec<VendorRequest>, RepositoryError>;

    /// Apply `patch` only if the stored status still equals `expected`.
    fn apply_patch(
        &self,
        id: &RequestId,
        expected: RequestStatus,
        patch: RequestPatch,
    ) -> Result<VendorRequest, RepositoryError>;
}

/// Vendor catalog collection.
pub trait VendorRepository: Send + Sync {
    fn insert(&self, vendor: Vendor) -> Result<Vendor, RepositoryError>;
    fn fetch(&self, id: &VendorId) -> Result<Option<Vendor>, RepositoryError>;
    fn list(&self) -> Result<Vec<Vendor>, RepositoryError>;
    fn find_by_vat(&self, vat_number: &str) -> Result<Vec<Vendor>, RepositoryError>;

    /// Stamp `updated_at`/`updated_by` without touching business fields.
    fn touch(
        &self,
        id: &VendorId,
        updated_at: DateTime<Utc>,
        updated_by: &UserId,
    ) -> Result<Vendor, RepositoryError>;

    /// Drop a vendor, returning what was stored.
    fn remove(&self, id: &VendorId) -> Result<Vendor, RepositoryError>;
}

/// Users known to the service.
pub trait UserDirectory: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Duplicate,
    #[error("record not found")]
    NotFound,
    #[error("record changed concurrently (expected status {expected}, found {found})")]
    StatusMismatch {
        expected: RequestStatus,
        found: RequestStatus,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
