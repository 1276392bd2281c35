//! Canonical postal address and its deduplication key.
//!
//! Both extraction pipelines terminate in [`PostalAddress`]. Identity for
//! deduplication is not structural equality: two addresses are the same when
//! their field-concatenation keys are character-equal, and the set orders
//! them lexicographically by that key.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Text written into a key for an absent field.
const ABSENT_FIELD: &str = "null";

/// Separator used by [`KeyStyle::Separated`].
const FIELD_SEPARATOR: char = '\u{1f}';

/// A postal address with every field optional.
///
/// # Example
///
/// ```
/// use testdata::PostalAddress;
///
/// let address = PostalAddress::new("DE", "Berlin", "10115", "Invalidenstraße", "117");
/// assert_eq!(address.locality.as_deref(), Some("Berlin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// Country code.
    pub country: Option<String>,
    /// City or other locality.
    pub locality: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Street name or first address line.
    pub street_address: Option<String>,
    /// House number.
    pub house_number: Option<String>,
}

impl PostalAddress {
    /// Builds an address with all five fields present.
    #[must_use]
    pub fn new(
        country: &str,
        locality: &str,
        postal_code: &str,
        street_address: &str,
        house_number: &str,
    ) -> Self {
        Self {
            country: Some(country.to_owned()),
            locality: Some(locality.to_owned()),
            postal_code: Some(postal_code.to_owned()),
            street_address: Some(street_address.to_owned()),
            house_number: Some(house_number.to_owned()),
        }
    }

    /// Returns the deduplication key for this address.
    ///
    /// Fields are taken in the fixed order country, locality, postal code,
    /// street, house number. Absent fields contribute the text `null`.
    ///
    /// # Example
    ///
    /// ```
    /// use testdata::{KeyStyle, PostalAddress};
    ///
    /// let a = PostalAddress::new("DE", "Köln", "50667", "A1", "23");
    /// let b = PostalAddress::new("DE", "Köln", "50667", "A12", "3");
    ///
    /// // Field boundaries are not part of the concatenated key.
    /// assert_eq!(a.key(KeyStyle::Concatenated), b.key(KeyStyle::Concatenated));
    /// assert_ne!(a.key(KeyStyle::Separated), b.key(KeyStyle::Separated));
    /// ```
    #[must_use]
    pub fn key(&self, style: KeyStyle) -> AddressKey {
        let mut key = String::new();
        for (index, field) in self.fields().into_iter().enumerate() {
            if index > 0 && style == KeyStyle::Separated {
                key.push(FIELD_SEPARATOR);
            }
            key.push_str(field.unwrap_or(ABSENT_FIELD));
        }
        AddressKey(key)
    }

    fn fields(&self) -> [Option<&str>; 5] {
        [
            self.country.as_deref(),
            self.locality.as_deref(),
            self.postal_code.as_deref(),
            self.street_address.as_deref(),
            self.house_number.as_deref(),
        ]
    }
}

/// How address fields are joined into a deduplication key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KeyStyle {
    /// Fields are concatenated without separators.
    ///
    /// Distinct field tuples can collide, e.g. street `A1` with number `23`
    /// and street `A12` with number `3`. Colliding addresses count as
    /// duplicates.
    #[default]
    Concatenated,
    /// Fields are joined with an ASCII unit separator.
    Separated,
}

/// Deduplication identity and sort key of a [`PostalAddress`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressKey(String);

impl AddressKey {
    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An address paired with the key it is ordered and deduplicated by.
///
/// Equality and ordering consider the key only.
#[derive(Debug, Clone)]
pub struct KeyedAddress {
    key: AddressKey,
    address: PostalAddress,
}

impl KeyedAddress {
    /// Computes the key for `address` using `style`.
    #[must_use]
    pub fn new(address: PostalAddress, style: KeyStyle) -> Self {
        Self {
            key: address.key(style),
            address,
        }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &AddressKey {
        &self.key
    }

    /// Returns the address.
    #[must_use]
    pub const fn address(&self) -> &PostalAddress {
        &self.address
    }
}

impl PartialEq for KeyedAddress {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for KeyedAddress {}

impl PartialOrd for KeyedAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyedAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
