//! Address extraction from tagged geographic point features.
//!
//! Each feature carries its tags in delivery order. A [`TagAccumulator`]
//! collects the five `addr:*` tags of one feature and checks for a
//! qualifying address after every tag it sees, not only after the last one.
//! Tag order therefore decides how often, and with which content, a feature
//! emits: a feature whose address tags are followed by other tags emits the
//! same address again, and a repeated address key lets a partly filled
//! record qualify before the remaining slot is set.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::PostalAddress;
use crate::dedup::AddressSet;

/// Tag key holding the country code.
pub const ADDR_COUNTRY: &str = "addr:country";
/// Tag key holding the city.
pub const ADDR_CITY: &str = "addr:city";
/// Tag key holding the street name.
pub const ADDR_STREET: &str = "addr:street";
/// Tag key holding the house number.
pub const ADDR_HOUSENUMBER: &str = "addr:housenumber";
/// Tag key holding the postal code.
pub const ADDR_POSTCODE: &str = "addr:postcode";

/// Number of address-tag matches a feature must exceed to qualify.
const MATCH_THRESHOLD: usize = 4;

/// A key/value tag on a point feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key, such as `addr:city`.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A geographic point feature with its tags in delivery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointFeature {
    /// Source identifier of the feature.
    pub id: i64,
    /// Tags in the order the reader delivered them.
    pub tags: Vec<Tag>,
}

impl PointFeature {
    /// Creates a feature from `(key, value)` pairs.
    #[must_use]
    pub fn new<K, V>(id: i64, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id,
            tags: tags.into_iter().map(|(key, value)| Tag::new(key, value)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressField {
    Country,
    City,
    Street,
    HouseNumber,
    PostCode,
}

impl AddressField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            ADDR_COUNTRY => Some(Self::Country),
            ADDR_CITY => Some(Self::City),
            ADDR_STREET => Some(Self::Street),
            ADDR_HOUSENUMBER => Some(Self::HouseNumber),
            ADDR_POSTCODE => Some(Self::PostCode),
            _ => None,
        }
    }
}

/// Observable state of a [`TagAccumulator`] after the last tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// No address tag matched since the last reset.
    Empty,
    /// The given number of address tags matched without qualifying.
    Partial(usize),
    /// The last check passed and an address was emitted.
    Qualified,
}

/// Per-feature slots for the five address tags.
///
/// Call [`TagAccumulator::reset`] at the start of every feature, then feed
/// each tag to [`TagAccumulator::accept`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAccumulator {
    jurisdiction: String,
    country: Option<String>,
    city: Option<String>,
    street: Option<String>,
    house_number: Option<String>,
    postcode: Option<String>,
    matches: usize,
    state: AccumulatorState,
}

impl TagAccumulator {
    /// Creates an empty accumulator for the given country code.
    #[must_use]
    pub fn new(jurisdiction: impl Into<String>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            country: None,
            city: None,
            street: None,
            house_number: None,
            postcode: None,
            matches: 0,
            state: AccumulatorState::Empty,
        }
    }

    /// Clears all slots and the match counter.
    pub fn reset(&mut self) {
        self.country = None;
        self.city = None;
        self.street = None;
        self.house_number = None;
        self.postcode = None;
        self.matches = 0;
        self.state = AccumulatorState::Empty;
    }

    /// Returns the state reached after the last accepted tag.
    #[must_use]
    pub const fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Returns how many address tags matched since the last reset.
    #[must_use]
    pub const fn matches(&self) -> usize {
        self.matches
    }

    /// Feeds one tag and runs the qualification check.
    ///
    /// Returns the address built from the current slots whenever more than
    /// four address tags have matched and the country slot equals the target
    /// code. The check runs for every tag, including non-address tags.
    pub fn accept(&mut self, tag: &Tag) -> Option<PostalAddress> {
        if let Some(field) = AddressField::from_key(&tag.key) {
            let value = Some(tag.value.clone());
            match field {
                AddressField::Country => self.country = value,
                AddressField::City => self.city = value,
                AddressField::Street => self.street = value,
                AddressField::HouseNumber => self.house_number = value,
                AddressField::PostCode => self.postcode = value,
            }
            self.matches = self.matches.saturating_add(1);
        }

        if self.matches > MATCH_THRESHOLD
            && self.country.as_deref() == Some(self.jurisdiction.as_str())
        {
            self.state = AccumulatorState::Qualified;
            return Some(self.snapshot());
        }

        self.state = if self.matches == 0 {
            AccumulatorState::Empty
        } else {
            AccumulatorState::Partial(self.matches)
        };
        None
    }

    fn snapshot(&self) -> PostalAddress {
        PostalAddress {
            country: self.country.clone(),
            locality: self.city.clone(),
            postal_code: self.postcode.clone(),
            street_address: self.street.clone(),
            house_number: self.house_number.clone(),
        }
    }
}

/// Feeds point features through a [`TagAccumulator`] into an [`AddressSet`].
///
/// # Example
///
/// ```
/// use testdata::{AddressSet, GeoTagAccumulator, PointFeature};
///
/// let extractor = GeoTagAccumulator::new("DE");
/// let set = AddressSet::new();
/// let feature = PointFeature::new(1, [
///     ("addr:country", "DE"),
///     ("addr:city", "Köln"),
///     ("addr:street", "Domkloster"),
///     ("addr:housenumber", "4"),
///     ("addr:postcode", "50667"),
/// ]);
///
/// extractor.process_feature(&feature, &set);
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoTagAccumulator {
    jurisdiction: String,
}

impl GeoTagAccumulator {
    /// Creates an extractor for the given country code.
    #[must_use]
    pub fn new(jurisdiction: impl Into<String>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
        }
    }

    /// Returns the target country code.
    #[must_use]
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// Returns every address the feature emits, in emission order.
    #[must_use]
    pub fn emissions(&self, feature: &PointFeature) -> Vec<PostalAddress> {
        let mut accumulator = TagAccumulator::new(self.jurisdiction.as_str());
        accumulator.reset();
        feature
            .tags
            .iter()
            .filter_map(|tag| accumulator.accept(tag))
            .collect()
    }

    /// Inserts the feature's emissions into `set`.
    ///
    /// The set absorbs repeated emissions of the same address.
    pub fn process_feature(&self, feature: &PointFeature, set: &AddressSet) {
        let emitted = self.emissions(feature);
        if !emitted.is_empty() {
            debug!(feature = feature.id, count = emitted.len(), "feature qualified");
        }
        for address in emitted {
            set.add(address);
        }
    }

    /// Processes features one after another into a fresh set.
    #[must_use]
    pub fn extract<'a, I>(&self, features: I) -> AddressSet
    where
        I: IntoIterator<Item = &'a PointFeature>,
    {
        let set = AddressSet::new();
        for feature in features {
            self.process_feature(feature, &set);
        }
        set
    }

    /// Processes features on the rayon pool into a fresh set.
    #[must_use]
    pub fn par_extract(&self, features: &[PointFeature]) -> AddressSet {
        let set = AddressSet::new();
        features.par_iter().for_each(|feature| {
            self.process_feature(feature, &set);
        });
        set
    }
}
