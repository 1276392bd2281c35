//! Run orchestration for the three generation pipelines.
//!
//! Each entry point wires a source or synthesizer to a sink and either runs
//! to completion or fails as a whole. Progress is reported through
//! `tracing` events.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::address::{KeyStyle, PostalAddress};
use crate::dedup::AddressSet;
use crate::error::{ConfigurationError, PipelineError};
use crate::geo::{GeoTagAccumulator, PointFeature};
use crate::lei::{EntityRegistryFilter, LegalEntity};
use crate::person::Person;
use crate::ports::{AddressPool, FeatureSource, LeiRecordSource, RecordSink};
use crate::synthesizer::PersonSynthesizer;

/// Counts reported by the export pipelines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Input records or features looked at.
    pub examined: usize,
    /// Records handed to the sink.
    pub emitted: usize,
}

/// Loads the address pool and shares each address for attachment.
///
/// # Errors
///
/// Returns [`ConfigurationError::AddressPoolRead`] if the pool cannot be
/// read, or [`ConfigurationError::EmptyAddressPool`] if it holds no
/// addresses.
pub fn load_address_pool(
    pool: &impl AddressPool,
) -> Result<Vec<Arc<PostalAddress>>, PipelineError> {
    let addresses = pool.load_addresses()?;
    if addresses.is_empty() {
        return Err(ConfigurationError::EmptyAddressPool.into());
    }
    debug!(addresses = addresses.len(), "address pool loaded");
    Ok(addresses.into_iter().map(Arc::new).collect())
}

/// Generates `count` persons and saves each one as soon as it exists.
///
/// # Errors
///
/// Returns [`PipelineError`] if synthesis or saving fails. Persons saved
/// before the failure stay saved.
pub fn generate_persons<R, S>(
    synthesizer: &mut PersonSynthesizer<R>,
    count: usize,
    sink: &mut S,
) -> Result<usize, PipelineError>
where
    R: Rng,
    S: RecordSink<Person> + ?Sized,
{
    info!(requested = count, "generating persons");
    for generated in 0..count {
        let outcome = synthesizer
            .create_random_person()
            .map_err(PipelineError::from)
            .and_then(|person| sink.save(&person).map_err(PipelineError::from));
        if let Err(err) = outcome {
            warn!(generated, error = %err, "person generation aborted");
            return Err(err);
        }
    }
    info!(emitted = count, "persons generated");
    Ok(count)
}

/// Exports the active entities of `jurisdiction` from a registry file.
///
/// The whole file is decoded before anything is saved, so a parse failure
/// emits nothing.
///
/// # Errors
///
/// Returns [`PipelineError::SourceParse`] if decoding fails, or
/// [`PipelineError::Sink`] if saving fails.
pub fn export_legal_entities<L, S>(
    source: &L,
    path: &Path,
    jurisdiction: &str,
    sink: &mut S,
) -> Result<ExportSummary, PipelineError>
where
    L: LeiRecordSource + ?Sized,
    S: RecordSink<LegalEntity> + ?Sized,
{
    info!(path = %path.display(), jurisdiction, "exporting legal entities");
    let records = source.read_records(path).inspect_err(|err| {
        warn!(error = %err, "entity source could not be decoded");
    })?;

    let examined = records.len();
    let filter = EntityRegistryFilter::new(jurisdiction);
    let mut emitted = 0_usize;
    for entity in filter.filter(records) {
        sink.save(&entity)?;
        emitted = emitted.saturating_add(1);
    }

    info!(
        examined,
        emitted,
        skipped = examined.saturating_sub(emitted),
        "legal entities exported"
    );
    Ok(ExportSummary { examined, emitted })
}

/// Exports the unique addresses of `jurisdiction` from a feature stream.
///
/// Features may arrive on several threads; they all feed one
/// [`AddressSet`] keyed with `key_style`. Addresses are saved in key order
/// after the stream ends.
/// If the stream fails, everything accumulated is discarded.
///
/// # Errors
///
/// Returns [`PipelineError::SourceRead`] if the stream fails, or
/// [`PipelineError::Sink`] if saving fails.
pub fn export_addresses<F, S>(
    source: &F,
    path: &Path,
    jurisdiction: &str,
    key_style: KeyStyle,
    sink: &mut S,
) -> Result<ExportSummary, PipelineError>
where
    F: FeatureSource + ?Sized,
    S: RecordSink<PostalAddress> + ?Sized,
{
    info!(path = %path.display(), jurisdiction, "extracting addresses");
    let extractor = GeoTagAccumulator::new(jurisdiction);
    let set = AddressSet::with_key_style(key_style);
    let seen = AtomicUsize::new(0);

    let handler = |feature: PointFeature| {
        seen.fetch_add(1, Ordering::Relaxed);
        extractor.process_feature(&feature, &set);
    };
    if let Err(err) = source.for_each_feature(path, &handler) {
        warn!(
            error = %err,
            discarded = set.len(),
            "feature stream failed; accumulated addresses discarded"
        );
        return Err(err.into());
    }

    let examined = seen.into_inner();
    let unique = set.to_sorted_vec();
    for address in &unique {
        sink.save(address)?;
    }

    info!(
        examined,
        key_style = ?set.key_style(),
        offered = set.offered(),
        unique = unique.len(),
        "addresses exported"
    );
    Ok(ExportSummary {
        examined,
        emitted: unique.len(),
    })
}
