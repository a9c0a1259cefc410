use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{
    Headquarters, PrimaryContact, RequestId, RequestStatus, SecondaryContact, User, UserId,
    UserRole, Vendor, VendorId, VendorProfile, VendorRequest,
};
use super::repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Seeded {
        users: usize,
        vendors: usize,
        requests: usize,
    },
    AlreadyPresent,
}

fn user(name: &str, email: &str, role: UserRole) -> User {
    User {
        id: UserId::next(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar_url: None,
    }
}

fn headquarters(line1: &str, city: &str, region: &str, postal_code: &str) -> Headquarters {
    Headquarters {
        address_line1: Some(line1.to_string()),
        address_line2: None,
        city: Some(city.to_string()),
        region: Some(region.to_string()),
        postal_code: Some(postal_code.to_string()),
        country: Some("United Kingdom".to_string()),
    }
}

fn contact(name: &str, role: &str, email: &str) -> PrimaryContact {
    PrimaryContact {
        name: name.to_string(),
        role: Some(role.to_string()),
        email: Some(email.to_string()),
        phone: None,
    }
}

/// Populate an empty store with a buyer, a manager, an admin, two catalog vendors, and
/// one request in each of the pending, reviewing, and approved states.
pub fn seed<S>(store: &S) -> Result<SeedOutcome, RepositoryError>
where
    S: UserDirectory + VendorRepository + RequestRepository,
{
    if !UserDirectory::list(store)?.is_empty() {
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let now = Utc::now();
    let buyer = UserDirectory::insert(
        store,
        user("Hana Okafor", "hana@northbuild.example", UserRole::Buyer),
    )?;
    let manager = UserDirectory::insert(
        store,
        user("Tomas Lind", "tomas@northbuild.example", UserRole::Manager),
    )?;
    let admin = UserDirectory::insert(
        store,
        user("Ines Duarte", "ines@northbuild.example", UserRole::Admin),
    )?;

    let ready_mix = VendorProfile {
        vat_number: Some("GB310552871".to_string()),
        registration_id: Some("RMX-44102".to_string()),
        website: Some("https://harbourreadymix.example".to_string()),
        headquarters: Some(headquarters("7 Dockside Road", "Leeds", "West Yorkshire", "LS1 4AP")),
        industry: Some("Concrete Supply".to_string()),
        categories: Some(vec!["Concrete".to_string(), "Ready Mix".to_string()]),
        year_founded: Some(1998),
        primary_contact: Some(contact(
            "Owen Price",
            "Account Manager",
            "owen.price@harbourreadymix.example",
        )),
        secondary_contact: Some(SecondaryContact {
            name: Some("Leah Moss".to_string()),
            role: Some("Dispatch".to_string()),
            ..SecondaryContact::default()
        }),
        ..VendorProfile::named("Harbour Ready Mix")
    };
    let ready_mix = VendorRepository::insert(
        store,
        Vendor {
            id: VendorId::next(),
            profile: ready_mix,
            notes: Some("Preferred supplier for slab pours in the north region.".to_string()),
            created_by: admin.id.clone(),
            created_at: now - Duration::days(120),
            updated_at: Some(now - Duration::days(10)),
            updated_by: Some(manager.id.clone()),
        },
    )?;

    let electrical = VendorProfile {
        vat_number: Some("GB778120394".to_string()),
        website: Some("https://voltline.example".to_string()),
        industry: Some("Electrical".to_string()),
        categories: Some(vec!["Electrical".to_string(), "Lighting".to_string()]),
        year_founded: Some(2009),
        ..VendorProfile::named("Voltline Electrical")
    };
    VendorRepository::insert(
        store,
        Vendor {
            id: VendorId::next(),
            profile: electrical,
            notes: Some("Awaiting renewed insurance certificate.".to_string()),
            created_by: buyer.id.clone(),
            created_at: now - Duration::days(45),
            updated_at: None,
            updated_by: None,
        },
    )?;

    let pending = VendorRequest {
        id: RequestId::next(),
        profile: VendorProfile {
            vat_number: Some("GB590223118".to_string()),
            industry: Some("Scaffolding".to_string()),
            categories: Some(vec!["Scaffolding".to_string(), "Site Safety".to_string()]),
            headquarters: Some(headquarters("19 Quay Street", "Newcastle", "Tyne and Wear", "NE1 3DX")),
            ..VendorProfile::named("Tyne Access Scaffolding")
        },
        justification: "Site supervisor needs rapid tower deployments for the riverside refurb."
            .to_string(),
        project_name: Some("Riverside Refurbishment".to_string()),
        requested_by: buyer.id.clone(),
        requested_at: now - Duration::days(3),
        status: RequestStatus::Pending,
        reviewed_by: None,
        reviewed_at: None,
        decision_notes: None,
        linked_vendor_id: None,
    };

    let reviewing = VendorRequest {
        id: RequestId::next(),
        profile: VendorProfile {
            industry: Some("Renewable Energy".to_string()),
            categories: Some(vec!["Solar".to_string()]),
            ..VendorProfile::named("Brightfield Solar")
        },
        justification: "Required to hit the sustainability targets on the warehouse programme."
            .to_string(),
        project_name: Some("Warehouse Decarbonisation".to_string()),
        requested_by: manager.id.clone(),
        requested_at: now - Duration::days(12),
        status: RequestStatus::Reviewing,
        reviewed_by: None,
        reviewed_at: None,
        decision_notes: None,
        linked_vendor_id: None,
    };

    let approved = VendorRequest {
        id: RequestId::next(),
        profile: ready_mix.profile.clone(),
        justification: "Needed for continuous pours on the north depot foundations.".to_string(),
        project_name: Some("North Depot".to_string()),
        requested_by: buyer.id.clone(),
        requested_at: now - Duration::days(30),
        status: RequestStatus::Approved,
        reviewed_by: Some(admin.id.clone()),
        reviewed_at: Some(now - Duration::days(25)),
        decision_notes: Some("Approved after compliance review.".to_string()),
        linked_vendor_id: Some(ready_mix.id.clone()),
    };

    for request in [pending, reviewing, approved] {
        RequestRepository::insert(store, request)?;
    }

    info!(users = 3, vendors = 2, requests = 3, "seeded onboarding store");
    Ok(SeedOutcome::Seeded {
        users: 3,
        vendors: 2,
        requests: 3,
    })
}
