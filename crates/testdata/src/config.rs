//! Generator configuration loaded via OrthoConfig.
//!
//! Values can come from CLI flags, `TESTDATA_*` environment variables, or a
//! configuration file. Accessors apply defaults; values a run cannot do
//! without are reported as [`ConfigurationError::MissingValue`].

use std::ffi::OsString;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use chrono::Datelike;
use mockable::Clock;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::address::KeyStyle;
use crate::error::ConfigurationError;
use crate::lei::DEFAULT_JURISDICTION;
use crate::synthesizer::DEFAULT_EMAIL_DOMAIN;

/// Configuration values for the generation pipelines.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TESTDATA")]
pub struct GeneratorSettings {
    /// Number of synthetic persons to generate.
    pub count: Option<usize>,
    /// Seed for the random generator; derived from the clock when absent.
    pub seed: Option<u64>,
    /// Target jurisdiction code.
    pub jurisdiction: Option<String>,
    /// Email suffix appended to generated addresses.
    pub email_domain: Option<String>,
    /// Directory holding `male.txt`, `female.txt`, `surnames.txt` and
    /// `eyecolors.txt`; the bundled lists are used when absent.
    pub value_list_dir: Option<PathBuf>,
    /// JSON file holding the address pool.
    pub address_pool_path: Option<PathBuf>,
    /// JSON-lines input read by the export binaries.
    pub input_path: Option<PathBuf>,
    /// Join address key fields with a unit separator instead of
    /// concatenating them.
    #[ortho_config(default = false)]
    pub separated_keys: bool,
    /// JSON-lines output file; standard output when absent.
    pub output_path: Option<PathBuf>,
}

impl GeneratorSettings {
    /// Loads settings from `args`, the environment and configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSettings`] when a source cannot
    /// be parsed or merged.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::load_from_iter(args).map_err(|err| ConfigurationError::InvalidSettings {
            message: err.to_string(),
        })
    }

    /// Returns the requested person count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingValue`] when no count was given.
    pub fn person_count(&self) -> Result<usize, ConfigurationError> {
        self.count
            .ok_or(ConfigurationError::MissingValue { key: "count" })
    }

    /// Returns the configured seed, or one derived from `clock`.
    #[must_use]
    pub fn seed_or_from(&self, clock: &impl Clock) -> u64 {
        self.seed
            .unwrap_or_else(|| clock.utc().timestamp_micros().unsigned_abs())
    }

    /// Returns the target jurisdiction, falling back to `DE`.
    #[must_use]
    pub fn jurisdiction(&self) -> &str {
        self.jurisdiction.as_deref().unwrap_or(DEFAULT_JURISDICTION)
    }

    /// Returns the email suffix, falling back to `@email.test`.
    #[must_use]
    pub fn email_domain(&self) -> &str {
        self.email_domain.as_deref().unwrap_or(DEFAULT_EMAIL_DOMAIN)
    }

    /// Returns the value list directory, if one was configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSettings`] for non-UTF-8 paths.
    pub fn value_list_dir(&self) -> Result<Option<Utf8PathBuf>, ConfigurationError> {
        self.value_list_dir
            .clone()
            .map(|path| utf8_path("value_list_dir", path))
            .transpose()
    }

    /// Returns the address pool file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingValue`] when absent, or
    /// [`ConfigurationError::InvalidSettings`] for non-UTF-8 paths.
    pub fn address_pool_path(&self) -> Result<Utf8PathBuf, ConfigurationError> {
        let path = self
            .address_pool_path
            .clone()
            .ok_or(ConfigurationError::MissingValue {
                key: "address_pool_path",
            })?;
        utf8_path("address_pool_path", path)
    }

    /// Returns the export input file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingValue`] when absent, or
    /// [`ConfigurationError::InvalidSettings`] for non-UTF-8 paths.
    pub fn input_path(&self) -> Result<Utf8PathBuf, ConfigurationError> {
        let path = self
            .input_path
            .clone()
            .ok_or(ConfigurationError::MissingValue { key: "input_path" })?;
        utf8_path("input_path", path)
    }

    /// Returns the key style used to deduplicate extracted addresses.
    #[must_use]
    pub const fn key_style(&self) -> KeyStyle {
        if self.separated_keys {
            KeyStyle::Separated
        } else {
            KeyStyle::Concatenated
        }
    }

    /// Returns the output file, if one was configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSettings`] for non-UTF-8 paths.
    pub fn output_path(&self) -> Result<Option<Utf8PathBuf>, ConfigurationError> {
        self.output_path
            .clone()
            .map(|path| utf8_path("output_path", path))
            .transpose()
    }
}

/// Returns the calendar year birth dates are counted back from.
#[must_use]
pub fn reference_year(clock: &impl Clock) -> i32 {
    clock.local().year()
}

fn utf8_path(key: &str, path: PathBuf) -> Result<Utf8PathBuf, ConfigurationError> {
    Utf8PathBuf::from_path_buf(path).map_err(|raw| ConfigurationError::InvalidSettings {
        message: format!("{key} is not valid UTF-8: {}", raw.display()),
    })
}
