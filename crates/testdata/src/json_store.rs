//! JSON adapters for the address pool, source and sink ports.
//!
//! Registry records and point features are read as JSON lines, one record
//! per line. Blank lines are skipped.

use std::io::{self, Write};
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::address::PostalAddress;
use crate::atomic_io::open_parent;
use crate::error::{ConfigurationError, SinkError, SourceParseError, SourceReadError};
use crate::geo::PointFeature;
use crate::lei::LeiRecord;
use crate::ports::{AddressPool, FeatureSource, LeiRecordSource, RecordSink};

/// Address pool stored as a JSON array of addresses.
///
/// Fields use the camel-case names of [`PostalAddress`]; absent fields may be
/// omitted or `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonAddressPool {
    path: Utf8PathBuf,
}

impl JsonAddressPool {
    /// Creates a pool reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses a JSON array of addresses.
    ///
    /// # Errors
    ///
    /// Returns the decode error if `json` is not an array of addresses.
    pub fn parse(json: &str) -> serde_json::Result<Vec<PostalAddress>> {
        serde_json::from_str(json)
    }

    fn read_failed(&self, message: String) -> ConfigurationError {
        ConfigurationError::AddressPoolRead {
            path: self.path.as_std_path().to_path_buf(),
            message,
        }
    }
}

impl AddressPool for JsonAddressPool {
    fn load_addresses(&self) -> Result<Vec<PostalAddress>, ConfigurationError> {
        let json = read_utf8(&self.path).map_err(|err| self.read_failed(err.to_string()))?;
        Self::parse(&json).map_err(|err| self.read_failed(err.to_string()))
    }
}

/// Registry source reading one JSON-encoded [`LeiRecord`] per line.
///
/// The whole file is decoded before any record is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonLinesLeiSource;

impl JsonLinesLeiSource {
    /// Decodes every non-blank line of `text`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first line that fails to decode.
    pub fn parse(text: &str) -> Result<Vec<LeiRecord>, String> {
        numbered_lines(text)
            .into_iter()
            .map(|(number, line)| decode_line(number, line))
            .collect()
    }
}

impl LeiRecordSource for JsonLinesLeiSource {
    fn read_records(&self, path: &Path) -> Result<Vec<LeiRecord>, SourceParseError> {
        let parse_failed = |message: String| SourceParseError {
            path: path.to_path_buf(),
            message,
        };
        let text = read_std(path).map_err(|err| parse_failed(err.to_string()))?;
        Self::parse(&text).map_err(parse_failed)
    }
}

/// Feature source reading one JSON-encoded [`PointFeature`] per line.
///
/// Lines are decoded and handed to the handler from the rayon pool. A line
/// that fails to decode ends the stream with an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonLinesFeatureSource;

impl FeatureSource for JsonLinesFeatureSource {
    fn for_each_feature(
        &self,
        path: &Path,
        handler: &(dyn Fn(PointFeature) + Sync),
    ) -> Result<(), SourceReadError> {
        let text = read_std(path).map_err(|err| SourceReadError {
            message: format!("failed to read '{}': {err}", path.display()),
        })?;
        numbered_lines(&text)
            .into_par_iter()
            .try_for_each(|(number, line)| decode_line(number, line).map(handler))
            .map_err(|message| SourceReadError { message })
    }
}

/// Sink writing one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns how many records were written.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if flushing fails.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.writer
            .flush()
            .map_err(|err| SinkError::new(format!("failed to flush output: {err}")))?;
        Ok(self.writer)
    }
}

impl<W: Write, T: Serialize> RecordSink<T> for JsonLinesSink<W> {
    fn save(&mut self, record: &T) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|err| SinkError::new(format!("failed to encode record: {err}")))?;
        self.writer
            .write_all(b"\n")
            .map_err(|err| SinkError::new(format!("failed to write record: {err}")))?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }
}

fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let (dir, file_name) = open_parent(path)?;
    dir.read_to_string(file_name)
}

fn read_std(path: &Path) -> io::Result<String> {
    let utf8 = Utf8Path::from_path(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not valid UTF-8", path.display()),
        )
    })?;
    read_utf8(utf8)
}

fn numbered_lines(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index.saturating_add(1), line))
        .collect()
}

fn decode_line<T: DeserializeOwned>(number: usize, line: &str) -> Result<T, String> {
    serde_json::from_str(line).map_err(|err| format!("line {number}: {err}"))
}
