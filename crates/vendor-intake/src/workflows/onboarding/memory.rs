use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    RequestId, RequestPatch, RequestStatus, User, UserId, Vendor, VendorId, VendorRequest,
};
use super::repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    vendors: HashMap<VendorId, Vendor>,
    requests: HashMap<RequestId, VendorRequest>,
}

/// Process-local document store backing all three collections.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    fn select_requests<F>(&self, predicate: F) -> Result<Vec<VendorRequest>, RepositoryError>
    where
        F: Fn(&VendorRequest) -> bool,
    {
        let guard = self.lock()?;
        let mut requests: Vec<VendorRequest> = guard
            .requests
            .values()
            .filter(|request| predicate(request))
            .cloned()
            .collect();
        requests.sort_by(|a, b| {
            b.requested_at
                .cmp(&a.requested_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(requests)
    }
}

impl RequestRepository for InMemoryStore {
    fn insert(&self, request: VendorRequest) -> Result<VendorRequest, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.requests.contains_key(&request.id) {
            return Err(RepositoryError::Duplicate);
        }
        guard.requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<VendorRequest>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.requests.get(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.select_requests(|_| true)
    }

    fn list_by_status(&self, status: RequestStatus) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.select_requests(|request| request.status == status)
    }

    fn list_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.select_requests(|request| &request.requested_by == requester)
    }

    fn find_by_vat(&self, vat_number: &str) -> Result<Vec<VendorRequest>, RepositoryError> {
        self.select_requests(|request| request.profile.vat_number.as_deref() == Some(vat_number))
    }

    fn apply_patch(
        &self,
        id: &RequestId,
        expected: RequestStatus,
        patch: RequestPatch,
    ) -> Result<VendorRequest, RepositoryError> {
        let mut guard = self.lock()?;
        let request = guard.requests.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if request.status != expected {
            return Err(RepositoryError::StatusMismatch {
                expected,
                found: request.status,
            });
        }
        patch.apply_to(request);
        Ok(request.clone())
    }
}

impl VendorRepository for InMemoryStore {
    fn insert(&self, vendor: Vendor) -> Result<Vendor, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.vendors.contains_key(&vendor.id) {
            return Err(RepositoryError::Duplicate);
        }
        guard.vendors.insert(vendor.id.clone(), vendor.clone());
        Ok(vendor)
    }

    fn fetch(&self, id: &VendorId) -> Result<Option<Vendor>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.vendors.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Vendor>, RepositoryError> {
        let guard = self.lock()?;
        let mut vendors: Vec<Vendor> = guard.vendors.values().cloned().collect();
        vendors.sort_by(|a, b| a.profile.name.cmp(&b.profile.name));
        Ok(vendors)
    }

    fn find_by_vat(&self, vat_number: &str) -> Result<Vec<Vendor>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .vendors
            .values()
            .filter(|vendor| vendor.profile.vat_number.as_deref() == Some(vat_number))
            .cloned()
            .collect())
    }

    fn touch(
        &self,
        id: &VendorId,
        updated_at: DateTime<Utc>,
        updated_by: &UserId,
    ) -> Result<Vendor, RepositoryError> {
        let mut guard = self.lock()?;
        let vendor = guard.vendors.get_mut(id).ok_or(RepositoryError::NotFound)?;
        vendor.updated_at = Some(updated_at);
        vendor.updated_by = Some(updated_by.clone());
        Ok(vendor.clone())
    }

    fn remove(&self, id: &VendorId) -> Result<Vendor, RepositoryError> {
        let mut guard = self.lock()?;
        guard.vendors.remove(id).ok_or(RepositoryError::NotFound)
    }
}

impl UserDirectory for InMemoryStore {
    fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.lock()?;
        let taken = guard
            .users
            .iter()
            .any(|existing| existing.id == user.id || existing.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(RepositoryError::Duplicate);
        }
        guard.users.push(user.clone());
        Ok(user)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.users.iter().find(|user| &user.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::onboarding::domain::{ReviewStamp, UserRole, VendorProfile};
    use chrono::Duration;

    fn request(name: &str, requested_by: &UserId, requested_at: DateTime<Utc>) -> VendorRequest {
        VendorRequest {
            id: RequestId::next(),
            profile: VendorProfile::named(name),
            justification: "Needed for the quarterly steel tender".to_string(),
            project_name: None,
            requested_by: requested_by.clone(),
            requested_at,
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            decision_notes: None,
            linked_vendor_id: None,
        }
    }

    #[test]
    fn listings_are_newest_first() {
        let store = InMemoryStore::new();
        let buyer = UserId("usr-buyer".to_string());
        let now = Utc::now();
        RequestRepository::insert(&store, request("Older Ltd", &buyer, now - Duration::days(2)))
            .expect("insert");
        RequestRepository::insert(&store, request("Newer Ltd", &buyer, now)).expect("insert");

        let names: Vec<String> = store
            .list_by_requester(&buyer)
            .expect("list")
            .into_iter()
            .map(|request| request.profile.name)
            .collect();
        assert_eq!(names, vec!["Newer Ltd".to_string(), "Older Ltd".to_string()]);
    }

    #[test]
    fn apply_patch_rejects_stale_status() {
        let store = InMemoryStore::new();
        let buyer = UserId("usr-buyer".to_string());
        let stored =
            RequestRepository::insert(&store, request("Stale Ltd", &buyer, Utc::now())).expect("insert");

        let patch = RequestPatch {
            status: RequestStatus::Rejected,
            review: Some(ReviewStamp {
                reviewed_by: UserId("usr-admin".to_string()),
                reviewed_at: Utc::now(),
            }),
            linked_vendor_id: None,
            decision_notes: None,
        };
        store
            .apply_patch(&stored.id, RequestStatus::Pending, patch.clone())
            .expect("first patch applies");

        match store.apply_patch(&stored.id, RequestStatus::Pending, patch) {
            Err(RepositoryError::StatusMismatch { expected, found }) => {
                assert_eq!(expected, RequestStatus::Pending);
                assert_eq!(found, RequestStatus::Rejected);
            }
            other => panic!("expected status mismatch, got {other:?}"),
        }
    }

    #[test]
    fn user_emails_are_unique_and_case_insensitive() {
        let store = InMemoryStore::new();
        let user = User {
            id: UserId::next(),
            name: "Noor Haddad".to_string(),
            email: "noor@buildco.example".to_string(),
            role: UserRole::Buyer,
            avatar_url: None,
        };
        UserDirectory::insert(&store, user.clone()).expect("insert");

        let found = store
            .find_by_email("NOOR@buildco.example")
            .expect("lookup")
            .expect("user present");
        assert_eq!(found.id, user.id);

        let duplicate = User {
            id: UserId::next(),
            ..user
        };
        assert_eq!(
            UserDirectory::insert(&store, duplicate),
            Err(RepositoryError::Duplicate)
        );
    }

    #[test]
    fn touch_requires_existing_vendor() {
        let store = InMemoryStore::new();
        let missing = VendorId("ven-missing".to_string());
        assert_eq!(
            store.touch(&missing, Utc::now(), &UserId("usr-admin".to_string())),
            Err(RepositoryError::NotFound)
        );
    }

    #[test]
    fn removed_vendors_leave_the_catalog() {
        let store = InMemoryStore::new();
        let vendor = Vendor {
            id: VendorId::next(),
            profile: VendorProfile::named("Quarry Works"),
            notes: None,
            created_by: UserId("usr-admin".to_string()),
            created_at: Utc::now(),
            updated_at: None,
            updated_by: None,
        };
        VendorRepository::insert(&store, vendor.clone()).expect("insert");

        assert_eq!(store.remove(&vendor.id), Ok(vendor.clone()));
        assert!(VendorRepository::list(&store).expect("list").is_empty());
        assert_eq!(store.remove(&vendor.id), Err(RepositoryError::NotFound));
    }
}
