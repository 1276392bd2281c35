//! Error types for the testdata crate.
//!
//! This module defines the error taxonomy shared by the three pipelines.
//! Every variant carries plain `String` messages so the enums stay `Clone`
//! and `Eq` and can be compared directly in tests.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Names one of the categorical value pools used by person synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Given names for male persons.
    MaleNames,
    /// Given names for female persons.
    FemaleNames,
    /// Family names.
    Surnames,
    /// Eye colours.
    EyeColors,
}

impl PoolKind {
    /// Returns the resource file name that backs this pool.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::MaleNames => "male.txt",
            Self::FemaleNames => "female.txt",
            Self::Surnames => "surnames.txt",
            Self::EyeColors => "eyecolors.txt",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaleNames => "male names",
            Self::FemaleNames => "female names",
            Self::Surnames => "surnames",
            Self::EyeColors => "eye colors",
        };
        f.write_str(name)
    }
}

/// Errors that make a run impossible before any output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A categorical value pool contains no entries.
    #[error("value pool '{pool}' is empty")]
    EmptyPool {
        /// The pool that was empty.
        pool: PoolKind,
    },

    /// The address pool supplied by the persistence boundary is empty.
    #[error("address pool is empty")]
    EmptyAddressPool,

    /// A required configuration value was not supplied.
    #[error("missing required configuration value '{key}'")]
    MissingValue {
        /// Name of the missing key.
        key: &'static str,
    },

    /// Configuration sources could not be merged or parsed.
    #[error("invalid configuration: {message}")]
    InvalidSettings {
        /// Description of the failure.
        message: String,
    },

    /// Distribution parameters cannot produce an accepted draw.
    #[error("invalid distribution parameters: {message}")]
    InvalidDistribution {
        /// Description of the rejected parameters.
        message: String,
    },

    /// A value list resource could not be read.
    #[error("failed to read value list at '{path}': {message}")]
    ValueListRead {
        /// Path to the value list.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The address pool could not be read or decoded.
    #[error("failed to load address pool from '{path}': {message}")]
    AddressPoolRead {
        /// Path of the address pool file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The reference year leaves the representable calendar range.
    #[error("reference year {year} cannot produce a valid birth date")]
    InvalidReferenceYear {
        /// The rejected reference year.
        year: i32,
    },
}

/// The entity source could not be decoded into records.
///
/// Fatal for the whole run; no partial results are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse entity source '{path}': {message}")]
pub struct SourceParseError {
    /// Path of the input that failed to decode.
    pub path: PathBuf,
    /// Description of the decode failure.
    pub message: String,
}

/// The geographic feature stream failed mid-read.
///
/// Fatal; addresses accumulated so far are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to read feature stream: {message}")]
pub struct SourceReadError {
    /// Description of the read failure.
    pub message: String,
}

/// The persistence boundary rejected a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to save record: {message}")]
pub struct SinkError {
    /// Description of the save failure.
    pub message: String,
}

impl SinkError {
    /// Builds a sink error from any displayable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors returned by the pipeline entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The run could not start.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The entity source could not be decoded.
    #[error(transparent)]
    SourceParse(#[from] SourceParseError),
    /// The feature stream failed.
    #[error(transparent)]
    SourceRead(#[from] SourceReadError),
    /// A record could not be handed to the persistence boundary.
    #[error(transparent)]
    Sink(#[from] SinkError),
}
