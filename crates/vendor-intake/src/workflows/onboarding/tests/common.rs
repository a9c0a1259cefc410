use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::workflows::onboarding::domain::{
    Principal, RequestId, RequestPatch, RequestStatus, User, UserId, UserRole, Vendor, VendorId,
    VendorRequest,
};
use crate::workflows::onboarding::form::{ContactDraft, VendorRequestDraft};
use crate::workflows::onboarding::memory::InMemoryStore;
use crate::workflows::onboarding::repository::{
    RepositoryError, RequestRepository, UserDirectory, VendorRepository,
};
use crate::workflows::onboarding::router::USER_HEADER;
use crate::workflows::onboarding::{onboarding_router, VendorOnboardingService};

pub(super) type MemoryService = VendorOnboardingService<InMemoryStore, InMemoryStore, InMemoryStore>;

pub(super) struct Fixture {
    pub(super) service: MemoryService,
    pub(super) store: InMemoryStore,
    pub(super) buyer: User,
    pub(super) manager: User,
    pub(super) admin: User,
}

impl Fixture {
    pub(super) fn as_buyer(&self) -> Principal {
        Principal::from(&self.buyer)
    }

    pub(super) fn as_manager(&self) -> Principal {
        Principal::from(&self.manager)
    }

    pub(super) fn as_admin(&self) -> Principal {
        Principal::from(&self.admin)
    }

    pub(super) fn submit_valid(&self) -> VendorRequest {
        self.service
            .submit(&self.as_buyer(), valid_draft())
            .expect("valid draft submits")
    }

    pub(super) fn stored_request(&self, id: &RequestId) -> VendorRequest {
        RequestRepository::fetch(&self.store, id)
            .expect("fetch succeeds")
            .expect("request present")
    }

    pub(super) fn vendors(&self) -> Vec<Vendor> {
        VendorRepository::list(&self.store).expect("vendor list")
    }

    pub(super) fn router(&self) -> axum::Router {
        onboarding_router(Arc::new(self.service.clone()))
    }
}

pub(super) fn user(name: &str, email: &str, role: UserRole) -> User {
    User {
        id: UserId::next(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar_url: None,
    }
}

pub(super) fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let buyer = UserDirectory::insert(
        &store,
        user("Priya Natarajan", "priya@site.example", UserRole::Buyer),
    )
    .expect("insert buyer");
    let manager = UserDirectory::insert(
        &store,
        user("Marek Kowal", "marek@site.example", UserRole::Manager),
    )
    .expect("insert manager");
    let admin = UserDirectory::insert(
        &store,
        user("Greta Holm", "greta@site.example", UserRole::Admin),
    )
    .expect("insert admin");

    let service = VendorOnboardingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );
    Fixture {
        service,
        store,
        buyer,
        manager,
        admin,
    }
}

pub(super) fn valid_draft() -> VendorRequestDraft {
    VendorRequestDraft {
        name: "Acme Corp".to_string(),
        vat_number: Some("IT01234567890".to_string()),
        website: Some("https://acme.example".to_string()),
        industry: Some("Construction".to_string()),
        categories: Some("Concrete, Aggregates, ".to_string()),
        justification: "We urgently need Acme for the downtown project build".to_string(),
        project_name: Some("Downtown Tower".to_string()),
        ..VendorRequestDraft::default()
    }
}

pub(super) fn draft_with_contact(name: Option<&str>, email: &str) -> VendorRequestDraft {
    VendorRequestDraft {
        primary_contact: Some(ContactDraft {
            name: name.map(str::to_string),
            email: Some(email.to_string()),
            ..ContactDraft::default()
        }),
        ..valid_draft()
    }
}

/// Store that never answers.
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl RequestRepository for UnavailableStore {
    fn insert(&self, _request: VendorRequest) -> Result<VendorRequest, RepositoryError> {
        offline()
    }

    fn fetch(&self, _id: &RequestId) -> Result<Option<VendorRequest>, RepositoryError> {
        offline()
    }

    fn list_all(&self) -> Result<Vec<VendorRequest>, RepositoryError> {
        offline()
    }

    fn list_by_status(&self, _status: RequestStatus) -> Result<Vec<VendorRequest>, RepositoryError> {
        offline()
    }

    fn list_by_requester(
        &self,
        _requester: &UserId,
    ) -> Result<Vec<VendorRequest>, RepositoryError> {
        offline()
    }

    fn find_by_vat(&self, _vat_number: &str) -> Result<Vec<VendorRequest>, RepositoryError> {
        offline()
    }

    fn apply_patch(
        &self,
        _id: &RequestId,
        _expected: RequestStatus,
        _patch: RequestPatch,
    ) -> Result<VendorRequest, RepositoryError> {
        offline()
    }
}

/// Catalog whose writes always fail; reads see an empty catalog.
pub(super) struct ReadOnlyVendors;

impl VendorRepository for ReadOnlyVendors {
    fn insert(&self, _vendor: Vendor) -> Result<Vendor, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog is read only".to_string()))
    }

    fn fetch(&self, _id: &VendorId) -> Result<Option<Vendor>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<Vendor>, RepositoryError> {
        Ok(Vec::new())
    }

    fn find_by_vat(&self, _vat_number: &str) -> Result<Vec<Vendor>, RepositoryError> {
        Ok(Vec::new())
    }

    fn touch(
        &self,
        _id: &VendorId,
        _updated_at: DateTime<Utc>,
        _updated_by: &UserId,
    ) -> Result<Vendor, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog is read only".to_string()))
    }

    fn remove(&self, _id: &VendorId) -> Result<Vendor, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog is read only".to_string()))
    }
}

/// Request store that keeps serving one request as it looked before a decision landed.
/// Patches still go to the live store, like a second admin acting on a stale read.
pub(super) struct StaleRequests {
    pub(super) store: InMemoryStore,
    pub(super) snapshot: VendorRequest,
    pub(super) patches_fail: bool,
}

impl RequestRepository for StaleRequests {
    fn insert(&self, request: VendorRequest) -> Result<VendorRequest, RepositoryError> {
        RequestRepository::insert(&self.store, request)
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<VendorRequest>, RepositoryError> {
        if id == &self.snapshot.id {
            return Ok(Some(self.snapshot.clone()));
        }
        RequestRepository::fetch(&self.store, id)
    }

    fn list_all(&self) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.store.list_all()
    }

    fn list_by_status(&self, status: RequestStatus) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.store.list_by_status(status)
    }

    fn list_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.store.list_by_requester(requester)
    }

    fn find_by_vat(&self, vat_number: &str) -> Result<Vec<VendorRequest>, RepositoryError> {
        RequestRepository::find_by_vat(&self.store, vat_number)
    }

    fn apply_patch(
        &self,
        id: &RequestId,
        expected: RequestStatus,
        patch: RequestPatch,
    ) -> Result<VendorRequest, RepositoryError> {
        if self.patches_fail {
            return offline();
        }
        self.store.apply_patch(id, expected, patch)
    }
}

impl Fixture {
    /// Service sharing this fixture's vendors and users but reading `snapshot` for its request.
    pub(super) fn stale_service(
        &self,
        snapshot: VendorRequest,
        patches_fail: bool,
    ) -> VendorOnboardingService<StaleRequests, InMemoryStore, InMemoryStore> {
        VendorOnboardingService::new(
            Arc::new(StaleRequests {
                store: self.store.clone(),
                snapshot,
                patches_fail,
            }),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
        )
    }
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    user: Option<&UserId>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user.0.as_str());
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).expect("serialize body"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
