use super::domain::{Headquarters, PrimaryContact, SecondaryContact, VendorProfile};
use super::form::{AddressDraft, ContactDraft, FieldPath, VendorRequestDraft};
use super::schema::{ValidationError, ValidationReason};

/// Request fields after blanks are dropped and categories are split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub profile: VendorProfile,
    pub justification: String,
    pub project_name: Option<String>,
}

/// Trim a value and drop it when nothing is left.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// `"Concrete, Aggregates, "` becomes `["Concrete", "Aggregates"]`; no entries means no list.
pub fn split_categories(raw: Option<&str>) -> Option<Vec<String>> {
    let entries: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();

    (!entries.is_empty()).then_some(entries)
}

pub fn normalize_headquarters(draft: Option<AddressDraft>) -> Option<Headquarters> {
    let draft = draft?;
    let address = Headquarters {
        address_line1: clean(draft.address_line1),
        address_line2: clean(draft.address_line2),
        city: clean(draft.city),
        region: clean(draft.region),
        postal_code: clean(draft.postal_code),
        country: clean(draft.country),
    };
    (!address.is_empty()).then_some(address)
}

/// A contact with surviving sub-fields must carry a name.
pub fn normalize_primary_contact(
    draft: Option<ContactDraft>,
) -> Result<Option<PrimaryContact>, ValidationError> {
    let Some(draft) = draft else {
        return Ok(None);
    };
    let role = clean(draft.role);
    let email = clean(draft.email);
    let phone = clean(draft.phone);

    match clean(draft.name) {
        Some(name) => Ok(Some(PrimaryContact {
            name,
            role,
            email,
            phone,
        })),
        None if role.is_none() && email.is_none() && phone.is_none() => Ok(None),
        None => Err(ValidationError {
            field: FieldPath::PrimaryContactName,
            reason: ValidationReason::Required,
        }),
    }
}

pub fn normalize_secondary_contact(draft: Option<ContactDraft>) -> Option<SecondaryContact> {
    let draft = draft?;
    let contact = SecondaryContact {
        name: clean(draft.name),
        role: clean(draft.role),
        email: clean(draft.email),
        phone: clean(draft.phone),
    };
    (!contact.is_empty()).then_some(contact)
}

/// Turn a validated draft into the shape that gets persisted.
pub fn normalize(draft: VendorRequestDraft) -> Result<NormalizedRequest, ValidationError> {
    let categories = split_categories(draft.categories.as_deref());
    let primary_contact = normalize_primary_contact(draft.primary_contact)?;

    let profile = VendorProfile {
        name: draft.name.trim().to_string(),
        vat_number: clean(draft.vat_number),
        registration_id: clean(draft.registration_id),
        website: clean(draft.website),
        headquarters: normalize_headquarters(draft.headquarters),
        industry: clean(draft.industry),
        categories,
        year_founded: draft.year_founded,
        primary_contact,
        secondary_contact: normalize_secondary_contact(draft.secondary_contact),
    };

    Ok(NormalizedRequest {
        profile,
        justification: draft.justification.trim().to_string(),
        project_name: clean(draft.project_name),
    })
}
