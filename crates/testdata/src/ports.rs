//! Boundaries between the generation core and its collaborators.
//!
//! Sources decode external inputs into typed records; sinks accept finished
//! records one at a time. The core never performs I/O itself. Each port has
//! an in-memory fixture used by tests and examples.

use std::path::Path;

use rayon::prelude::*;

use crate::address::PostalAddress;
use crate::error::{ConfigurationError, SinkError, SourceParseError, SourceReadError};
use crate::geo::PointFeature;
use crate::lei::LeiRecord;

/// Supplies the pre-existing addresses persons are attached to.
pub trait AddressPool {
    /// Loads every address in the pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::AddressPoolRead`] if the backing store
    /// cannot be read or decoded.
    fn load_addresses(&self) -> Result<Vec<PostalAddress>, ConfigurationError>;
}

/// Accepts finished records one at a time.
pub trait RecordSink<T> {
    /// Saves one record.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the record cannot be stored.
    fn save(&mut self, record: &T) -> Result<(), SinkError>;
}

/// Decodes a registry file into records.
pub trait LeiRecordSource {
    /// Reads every record in `path`, or none at all.
    ///
    /// # Errors
    ///
    /// Returns [`SourceParseError`] if any part of the file fails to decode.
    fn read_records(&self, path: &Path) -> Result<Vec<LeiRecord>, SourceParseError>;
}

/// Streams point features from a geographic extract.
pub trait FeatureSource {
    /// Calls `handler` once per feature.
    ///
    /// Implementations may call the handler from several threads at once.
    ///
    /// # Errors
    ///
    /// Returns [`SourceReadError`] if the stream fails before the end.
    fn for_each_feature(
        &self,
        path: &Path,
        handler: &(dyn Fn(PointFeature) + Sync),
    ) -> Result<(), SourceReadError>;
}

/// Address pool backed by a vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryAddressPool {
    addresses: Vec<PostalAddress>,
}

impl InMemoryAddressPool {
    /// Creates a pool holding `addresses`.
    #[must_use]
    pub const fn new(addresses: Vec<PostalAddress>) -> Self {
        Self { addresses }
    }
}

impl AddressPool for InMemoryAddressPool {
    fn load_addresses(&self) -> Result<Vec<PostalAddress>, ConfigurationError> {
        Ok(self.addresses.clone())
    }
}

/// Sink that keeps every saved record, optionally failing after a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectingSink<T> {
    records: Vec<T>,
    capacity: Option<usize>,
}

impl<T> Default for CollectingSink<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            capacity: None,
        }
    }
}

impl<T> CollectingSink<T> {
    /// Creates an unbounded sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects every record after the first `capacity`.
    #[must_use]
    pub const fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Returns the saved records in save order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Consumes the sink and returns its records.
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T: Clone> RecordSink<T> for CollectingSink<T> {
    fn save(&mut self, record: &T) -> Result<(), SinkError> {
        if self
            .capacity
            .is_some_and(|capacity| self.records.len() >= capacity)
        {
            return Err(SinkError::new("sink capacity exhausted"));
        }
        self.records.push(record.clone());
        Ok(())
    }
}

/// Registry source returning canned records or a canned parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureLeiSource {
    outcome: Result<Vec<LeiRecord>, String>,
}

impl FixtureLeiSource {
    /// Returns `records` for every path.
    #[must_use]
    pub const fn with_records(records: Vec<LeiRecord>) -> Self {
        Self {
            outcome: Ok(records),
        }
    }

    /// Fails every read with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl LeiRecordSource for FixtureLeiSource {
    fn read_records(&self, path: &Path) -> Result<Vec<LeiRecord>, SourceParseError> {
        self.outcome.clone().map_err(|message| SourceParseError {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Feature source that delivers canned features from the rayon pool.
///
/// When a failure is configured, every feature is delivered first and the
/// error is returned afterwards, simulating a stream that breaks at its end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureFeatureSource {
    features: Vec<PointFeature>,
    failure: Option<String>,
}

impl FixtureFeatureSource {
    /// Delivers `features` and succeeds.
    #[must_use]
    pub const fn new(features: Vec<PointFeature>) -> Self {
        Self {
            features,
            failure: None,
        }
    }

    /// Delivers the features, then fails with `message`.
    #[must_use]
    pub fn failing_after(features: Vec<PointFeature>, message: impl Into<String>) -> Self {
        Self {
            features,
            failure: Some(message.into()),
        }
    }
}

impl FeatureSource for FixtureFeatureSource {
    fn for_each_feature(
        &self,
        _path: &Path,
        handler: &(dyn Fn(PointFeature) + Sync),
    ) -> Result<(), SourceReadError> {
        self.features.par_iter().cloned().for_each(handler);
        self.failure.as_ref().map_or(Ok(()), |message| {
            Err(SourceReadError {
                message: message.clone(),
            })
        })
    }
}
