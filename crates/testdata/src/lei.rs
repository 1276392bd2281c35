//! Legal-entity registry records and the filter that projects them.
//!
//! Input records mirror the parts of the LEI Common Data File 2.1 schema the
//! projection needs. Decoding the XML itself happens outside this crate; the
//! types derive `Deserialize` with the schema's element names so a
//! serde-based reader can target them directly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::PostalAddress;

/// Maximum number of characters kept from a registry legal name.
pub const MAX_NAME_CHARS: usize = 250;

/// Jurisdiction selected when none is configured.
pub const DEFAULT_JURISDICTION: &str = "DE";

/// Registration status of a legal entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityStatus {
    /// `ACTIVE` in the source enumeration.
    #[serde(rename = "ACTIVE")]
    Active,
    /// `INACTIVE` in the source enumeration.
    #[serde(rename = "INACTIVE")]
    Inactive,
    /// Any other value, including `NULL`.
    #[serde(other)]
    Other,
}

/// An address block as it appears in a registry record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordAddress {
    /// First free-text address line.
    pub first_address_line: Option<String>,
    /// Further address lines.
    #[serde(default)]
    pub additional_address_line: Vec<String>,
    /// City.
    pub city: Option<String>,
    /// Region code.
    pub region: Option<String>,
    /// Country code.
    pub country: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
}

impl RecordAddress {
    /// Projects the block onto the canonical address shape.
    ///
    /// Registry addresses carry no separate house number.
    #[must_use]
    pub fn to_postal_address(&self) -> PostalAddress {
        PostalAddress {
            country: self.country.clone(),
            locality: self.city.clone(),
            postal_code: self.postal_code.clone(),
            street_address: self.first_address_line.clone(),
            house_number: None,
        }
    }
}

/// Legal form block of a registry record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegalForm {
    /// ISO 20275 entity legal form code.
    pub entity_legal_form_code: Option<String>,
    /// Free-text legal form when no code applies.
    pub other_legal_form: Option<String>,
}

/// Entity block of a registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityRecord {
    /// Registered legal name.
    pub legal_name: String,
    /// Legal address.
    pub legal_address: RecordAddress,
    /// Headquarters address.
    pub headquarters_address: RecordAddress,
    /// Jurisdiction code, if recorded.
    pub legal_jurisdiction: Option<String>,
    /// Legal form.
    #[serde(default)]
    pub legal_form: LegalForm,
    /// Registration status.
    pub entity_status: EntityStatus,
}

/// One record of the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeiRecord {
    /// Registry-assigned identifier.
    #[serde(rename = "LEI")]
    pub lei: String,
    /// Entity details.
    #[serde(rename = "Entity")]
    pub entity: EntityRecord,
}

/// A legal entity in canonical shape.
///
/// Created once per qualifying record and never modified. Both addresses are
/// owned by the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntity {
    identifier: String,
    name: String,
    legal_form: Option<String>,
    legal_address: PostalAddress,
    headquarter_address: PostalAddress,
}

impl LegalEntity {
    /// Builds an entity, silently truncating `name` to
    /// [`MAX_NAME_CHARS`] characters.
    #[must_use]
    pub fn new(
        identifier: String,
        name: &str,
        legal_form: Option<String>,
        legal_address: PostalAddress,
        headquarter_address: PostalAddress,
    ) -> Self {
        Self {
            identifier,
            name: name.chars().take(MAX_NAME_CHARS).collect(),
            legal_form,
            legal_address,
            headquarter_address,
        }
    }

    /// Returns the registry identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the (possibly truncated) legal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the legal form code.
    #[must_use]
    pub fn legal_form(&self) -> Option<&str> {
        self.legal_form.as_deref()
    }

    /// Returns the legal address.
    #[must_use]
    pub const fn legal_address(&self) -> &PostalAddress {
        &self.legal_address
    }

    /// Returns the headquarters address.
    #[must_use]
    pub const fn headquarter_address(&self) -> &PostalAddress {
        &self.headquarter_address
    }
}

/// Selects active entities of one jurisdiction and projects them.
///
/// # Example
///
/// ```
/// use testdata::EntityRegistryFilter;
///
/// let filter = EntityRegistryFilter::default();
/// assert_eq!(filter.jurisdiction(), "DE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRegistryFilter {
    jurisdiction: String,
}

impl Default for EntityRegistryFilter {
    fn default() -> Self {
        Self::new(DEFAULT_JURISDICTION)
    }
}

impl EntityRegistryFilter {
    /// Creates a filter for the given jurisdiction code.
    #[must_use]
    pub fn new(jurisdiction: impl Into<String>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
        }
    }

    /// Returns the target jurisdiction code.
    #[must_use]
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// Returns `true` for active records whose jurisdiction matches exactly.
    ///
    /// A record without a jurisdiction never qualifies.
    #[must_use]
    pub fn qualifies(&self, record: &LeiRecord) -> bool {
        record.entity.entity_status == EntityStatus::Active
            && record.entity.legal_jurisdiction.as_deref() == Some(self.jurisdiction.as_str())
    }

    /// Projects a record onto the canonical entity shape.
    ///
    /// Missing address parts are carried over as absent fields.
    #[must_use]
    pub fn project(record: LeiRecord) -> LegalEntity {
        let LeiRecord { lei, entity } = record;
        LegalEntity::new(
            lei,
            &entity.legal_name,
            entity.legal_form.entity_legal_form_code,
            entity.legal_address.to_postal_address(),
            entity.headquarters_address.to_postal_address(),
        )
    }

    /// Lazily filters and projects `records`.
    ///
    /// Non-qualifying records are skipped without error.
    pub fn filter<I>(&self, records: I) -> impl Iterator<Item = LegalEntity>
    where
        I: IntoIterator<Item = LeiRecord>,
    {
        records.into_iter().filter_map(move |record| {
            if self.qualifies(&record) {
                Some(Self::project(record))
            } else {
                debug!(lei = %record.lei, "registry record skipped");
                None
            }
        })
    }
}
