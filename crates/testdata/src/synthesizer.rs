//! Composition of sampled values into one synthetic person.
//!
//! The synthesizer owns the random source, so the same seed, pools and
//! address list always yield the same sequence of persons.

use std::sync::Arc;

use chrono::Datelike;
use rand::Rng;
use rand::seq::IndexedRandom;
use unicode_normalization::UnicodeNormalization;

use crate::address::PostalAddress;
use crate::error::{ConfigurationError, PoolKind};
use crate::person::{Gender, Person};
use crate::sampler::ConstrainedSampler;
use crate::value_lists::ValuePools;

/// Suffix of every generated email address. The `.test` top-level domain is
/// reserved and never routed.
pub const DEFAULT_EMAIL_DOMAIN: &str = "@email.test";

/// Builds synthetic persons from value pools and an address pool.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use testdata::{PersonSynthesizer, PostalAddress, ValuePools};
///
/// let addresses = vec![Arc::new(PostalAddress::new("DE", "Kiel", "24103", "Holstenstraße", "1"))];
/// let mut synthesizer = PersonSynthesizer::new(
///     ChaCha8Rng::seed_from_u64(42),
///     ValuePools::bundled(),
///     addresses,
///     2024,
/// )
/// .expect("pools are populated");
///
/// let person = synthesizer.create_random_person().expect("person");
/// assert!(person.email.ends_with("@email.test"));
/// ```
#[derive(Debug, Clone)]
pub struct PersonSynthesizer<R> {
    sampler: ConstrainedSampler<R>,
    pools: ValuePools,
    addresses: Vec<Arc<PostalAddress>>,
    reference_year: i32,
    email_domain: String,
}

impl<R: Rng> PersonSynthesizer<R> {
    /// Creates a synthesizer around an already-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyPool`] or
    /// [`ConfigurationError::EmptyAddressPool`] if any pool is empty.
    pub fn new(
        rng: R,
        pools: ValuePools,
        addresses: Vec<Arc<PostalAddress>>,
        reference_year: i32,
    ) -> Result<Self, ConfigurationError> {
        pools.validate()?;
        if addresses.is_empty() {
            return Err(ConfigurationError::EmptyAddressPool);
        }
        Ok(Self {
            sampler: ConstrainedSampler::new(rng),
            pools,
            addresses,
            reference_year,
            email_domain: DEFAULT_EMAIL_DOMAIN.to_owned(),
        })
    }

    /// Replaces the email suffix appended after the birth year.
    #[must_use]
    pub fn with_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = domain.into();
        self
    }

    /// Returns the year birth dates are counted back from.
    #[must_use]
    pub const fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Creates one synthetic person.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if a pool is empty or the reference year
    /// cannot produce a calendar date.
    pub fn create_random_person(&mut self) -> Result<Person, ConfigurationError> {
        let gender = if self.sampler.rng().random_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let given_pool = match gender {
            Gender::Male => PoolKind::MaleNames,
            Gender::Female => PoolKind::FemaleNames,
        };
        let given_name = self.draw(given_pool)?;
        let family_name = self.draw(PoolKind::Surnames)?;
        let eye_color = self.draw(PoolKind::EyeColors)?;

        let birth_date = self.sampler.random_birth_date(self.reference_year)?;
        let height = self.sampler.random_height(gender);
        let email = derive_email(
            &given_name,
            &family_name,
            birth_date.year(),
            &self.email_domain,
        );
        let address = self
            .addresses
            .choose(self.sampler.rng())
            .map(Arc::clone)
            .ok_or(ConfigurationError::EmptyAddressPool)?;

        Ok(Person {
            given_name,
            family_name,
            gender,
            birth_date,
            height,
            eye_color,
            email,
            address,
        })
    }

    fn draw(&mut self, kind: PoolKind) -> Result<String, ConfigurationError> {
        self.pools
            .pool(kind)
            .choose(self.sampler.rng())
            .map(str::to_owned)
            .ok_or(ConfigurationError::EmptyPool { pool: kind })
    }
}

/// Derives an ASCII email address from name parts and the birth year.
///
/// The parts are concatenated, normalised to NFKC, and every non-ASCII
/// character is dropped. The result is not guaranteed to be unique.
///
/// # Example
///
/// ```
/// use testdata::derive_email;
///
/// let email = derive_email("José", "Müller", 1990, "@email.test");
/// assert!(email.is_ascii());
/// assert!(email.ends_with("@email.test"));
/// ```
#[must_use]
pub fn derive_email(given_name: &str, family_name: &str, birth_year: i32, domain: &str) -> String {
    format!("{given_name}{family_name}{birth_year}{domain}")
        .nfkc()
        .filter(char::is_ascii)
        .collect()
}
