use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Raw vendor request as typed into the intake form. Every text value is kept verbatim
/// until submission, where blanks are dropped and categories are split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorRequestDraft {
    pub name: String,
    pub vat_number: Option<String>,
    pub registration_id: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    /// Comma separated list, e.g. `"Concrete, Aggregates"`.
    pub categories: Option<String>,
    pub year_founded: Option<u16>,
    pub headquarters: Option<AddressDraft>,
    pub primary_contact: Option<ContactDraft>,
    pub secondary_contact: Option<ContactDraft>,
    pub justification: String,
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDraft {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactDraft {
    /// True when at least one sub-field carries a non-blank value.
    pub fn is_supplied(&self) -> bool {
        [&self.name, &self.role, &self.email, &self.phone]
            .into_iter()
            .any(|value| is_present(value.as_deref()))
    }
}

pub(crate) fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|raw| !raw.trim().is_empty())
}

/// Addressable form fields, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Name,
    VatNumber,
    Website,
    Industry,
    Categories,
    HeadquartersAddressLine1,
    HeadquartersAddressLine2,
    HeadquartersCity,
    HeadquartersRegion,
    HeadquartersPostalCode,
    HeadquartersCountry,
    PrimaryContactName,
    PrimaryContactRole,
    PrimaryContactEmail,
    PrimaryContactPhone,
    Justification,
}

impl FieldPath {
    pub const ALL: [FieldPath; 16] = [
        FieldPath::Name,
        FieldPath::VatNumber,
        FieldPath::Website,
        FieldPath::Industry,
        FieldPath::Categories,
        FieldPath::HeadquartersAddressLine1,
        FieldPath::HeadquartersAddressLine2,
        FieldPath::HeadquartersCity,
        FieldPath::HeadquartersRegion,
        FieldPath::HeadquartersPostalCode,
        FieldPath::HeadquartersCountry,
        FieldPath::PrimaryContactName,
        FieldPath::PrimaryContactRole,
        FieldPath::PrimaryContactEmail,
        FieldPath::PrimaryContactPhone,
        FieldPath::Justification,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldPath::Name => "name",
            FieldPath::VatNumber => "vatNumber",
            FieldPath::Website => "website",
            FieldPath::Industry => "industry",
            FieldPath::Categories => "categories",
            FieldPath::HeadquartersAddressLine1 => "headquarters.addressLine1",
            FieldPath::HeadquartersAddressLine2 => "headquarters.addressLine2",
            FieldPath::HeadquartersCity => "headquarters.city",
            FieldPath::HeadquartersRegion => "headquarters.region",
            FieldPath::HeadquartersPostalCode => "headquarters.postalCode",
            FieldPath::HeadquartersCountry => "headquarters.country",
            FieldPath::PrimaryContactName => "primaryContact.name",
            FieldPath::PrimaryContactRole => "primaryContact.role",
            FieldPath::PrimaryContactEmail => "primaryContact.email",
            FieldPath::PrimaryContactPhone => "primaryContact.phone",
            FieldPath::Justification => "justification",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        FieldPath::ALL.into_iter().find(|path| path.as_str() == raw)
    }

    pub const fn is_primary_contact(self) -> bool {
        matches!(
            self,
            FieldPath::PrimaryContactName
                | FieldPath::PrimaryContactRole
                | FieldPath::PrimaryContactEmail
                | FieldPath::PrimaryContactPhone
        )
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl VendorRequestDraft {
    /// Current value of a field; absent nested objects read as unset.
    pub fn get(&self, path: FieldPath) -> Option<&str> {
        let address = self.headquarters.as_ref();
        let contact = self.primary_contact.as_ref();
        match path {
            FieldPath::Name => Some(self.name.as_str()),
            FieldPath::VatNumber => self.vat_number.as_deref(),
            FieldPath::Website => self.website.as_deref(),
            FieldPath::Industry => self.industry.as_deref(),
            FieldPath::Categories => self.categories.as_deref(),
            FieldPath::HeadquartersAddressLine1 => address.and_then(|a| a.address_line1.as_deref()),
            FieldPath::HeadquartersAddressLine2 => address.and_then(|a| a.address_line2.as_deref()),
            FieldPath::HeadquartersCity => address.and_then(|a| a.city.as_deref()),
            FieldPath::HeadquartersRegion => address.and_then(|a| a.region.as_deref()),
            FieldPath::HeadquartersPostalCode => address.and_then(|a| a.postal_code.as_deref()),
            FieldPath::HeadquartersCountry => address.and_then(|a| a.country.as_deref()),
            FieldPath::PrimaryContactName => contact.and_then(|c| c.name.as_deref()),
            FieldPath::PrimaryContactRole => contact.and_then(|c| c.role.as_deref()),
            FieldPath::PrimaryContactEmail => contact.and_then(|c| c.email.as_deref()),
            FieldPath::PrimaryContactPhone => contact.and_then(|c| c.phone.as_deref()),
            FieldPath::Justification => Some(self.justification.as_str()),
        }
    }

    pub fn set(&mut self, path: FieldPath, value: impl Into<String>) {
        let value = value.into();
        match path {
            FieldPath::Name => self.name = value,
            FieldPath::VatNumber => self.vat_number = Some(value),
            FieldPath::Website => self.website = Some(value),
            FieldPath::Industry => self.industry = Some(value),
            FieldPath::Categories => self.categories = Some(value),
            FieldPath::HeadquartersAddressLine1 => self.address_mut().address_line1 = Some(value),
            FieldPath::HeadquartersAddressLine2 => self.address_mut().address_line2 = Some(value),
            FieldPath::HeadquartersCity => self.address_mut().city = Some(value),
            FieldPath::HeadquartersRegion => self.address_mut().region = Some(value),
            FieldPath::HeadquartersPostalCode => self.address_mut().postal_code = Some(value),
            FieldPath::HeadquartersCountry => self.address_mut().country = Some(value),
            FieldPath::PrimaryContactName => self.contact_mut().name = Some(value),
            FieldPath::PrimaryContactRole => self.contact_mut().role = Some(value),
            FieldPath::PrimaryContactEmail => self.contact_mut().email = Some(value),
            FieldPath::PrimaryContactPhone => self.contact_mut().phone = Some(value),
            FieldPath::Justification => self.justification = value,
        }
    }

    fn address_mut(&mut self) -> &mut AddressDraft {
        self.headquarters.get_or_insert_with(AddressDraft::default)
    }

    fn contact_mut(&mut self) -> &mut ContactDraft {
        self.primary_contact.get_or_insert_with(ContactDraft::default)
    }
}
