use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static VENDOR_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identifier wrapper for directory users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn next() -> Self {
        let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("usr-{id:06}"))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for vendor requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn next() -> Self {
        let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("req-{id:06}"))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for catalog vendors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub String);

impl VendorId {
    pub fn next() -> Self {
        let id = VENDOR_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("ven-{id:06}"))
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Buyer,
    Manager,
    Admin,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Authenticated caller threaded through every intake and review call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

impl Principal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
        }
    }
}

/// Headquarters address. Every line is optional; a fully empty address is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headquarters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Headquarters {
    pub fn is_empty(&self) -> bool {
        self.address_line1.is_none()
            && self.address_line2.is_none()
            && self.city.is_none()
            && self.region.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryContact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl SecondaryContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Identity, business, and contact fields shared by vendors and vendor requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<Headquarters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_founded: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_contact: Option<PrimaryContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_contact: Option<SecondaryContact>,
}

impl VendorProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vat_number: None,
            registration_id: None,
            website: None,
            headquarters: None,
            industry: None,
            categories: None,
            year_founded: None,
            primary_contact: None,
            secondary_contact: None,
        }
    }
}

/// Catalog entry for an approved supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    #[serde(flatten)]
    pub profile: VendorProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserId>,
}

/// Lifecycle of a vendor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Reviewing,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Reviewing,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Reviewing => "reviewing",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    /// Still waiting on an admin decision.
    pub const fn is_open(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Reviewing)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or(UnknownStatus(raw.to_string()))
    }
}

/// Admin verdict on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub const fn status(self) -> RequestStatus {
        match self {
            Decision::Approved => RequestStatus::Approved,
            Decision::Rejected => RequestStatus::Rejected,
        }
    }
}

/// Persisted vendor request document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRequest {
    pub id: RequestId,
    #[serde(flatten)]
    pub profile: VendorProfile,
    pub justification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub requested_by: UserId,
    pub requested_at: DateTime<Utc>,
    pub status: RequestStatus,
    #[serde(default)]
    pub reviewed_by: Option<UserId>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_notes: Option<String>,
    #[serde(default)]
    pub linked_vendor_id: Option<VendorId>,
}

impl VendorRequest {
    pub fn has_decision(&self) -> bool {
        self.reviewed_by.is_some() && self.reviewed_at.is_some()
    }

    /// Linked vendor present iff approved; reviewer stamp present iff decided.
    pub fn is_consistent(&self) -> bool {
        let link_matches = self.linked_vendor_id.is_some() == (self.status == RequestStatus::Approved);
        let stamp_matches = self.has_decision() == self.status.is_terminal()
            && self.reviewed_by.is_some() == self.reviewed_at.is_some();
        link_matches && stamp_matches
    }
}

/// Review stamp written alongside every admin decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewStamp {
    pub reviewed_by: UserId,
    pub reviewed_at: DateTime<Utc>,
}

/// Single atomic update applied to a request by the review workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPatch {
    pub status: RequestStatus,
    pub review: Option<ReviewStamp>,
    pub linked_vendor_id: Option<VendorId>,
    /// `Some` overwrites the stored notes, including with an empty string.
    pub decision_notes: Option<String>,
}

impl RequestPatch {
    pub fn status_only(status: RequestStatus) -> Self {
        Self {
            status,
            review: None,
            linked_vendor_id: None,
            decision_notes: None,
        }
    }

    pub fn apply_to(self, request: &mut VendorRequest) {
        request.status = self.status;
        if let Some(stamp) = self.review {
            request.reviewed_by = Some(stamp.reviewed_by);
            request.reviewed_at = Some(stamp.reviewed_at);
        }
        if let Some(vendor_id) = self.linked_vendor_id {
            request.linked_vendor_id = Some(vendor_id);
        }
        if let Some(notes) = self.decision_notes {
            request.decision_notes = Some(notes);
        }
    }
}
