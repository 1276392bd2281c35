//! Synthetic test data for people, legal entities and postal addresses.
//!
//! The crate has three pipelines that share one canonical address shape:
//!
//! - person synthesis draws names, eye colours, birth dates and heights from
//!   seeded random sources and attaches an address from a pre-loaded pool
//! - legal-entity export filters registry records to the active entities of
//!   one jurisdiction and projects them onto a reduced shape
//! - address extraction accumulates `addr:*` tags of geographic point
//!   features into a concurrent, key-ordered, duplicate-free set
//!
//! Decoding registry files and geographic extracts, and persisting results,
//! happen behind the traits in [`ports`]. The core never performs I/O itself.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use testdata::{CollectingSink, PersonSynthesizer, PostalAddress, ValuePools, generate_persons};
//!
//! let addresses = vec![Arc::new(PostalAddress::new("DE", "Bremen", "28195", "Am Markt", "21"))];
//! let mut synthesizer =
//!     PersonSynthesizer::new(ChaCha8Rng::seed_from_u64(42), ValuePools::bundled(), addresses, 2024)
//!         .expect("pools are populated");
//! let mut sink = CollectingSink::new();
//!
//! let generated = generate_persons(&mut synthesizer, 5, &mut sink).expect("generation succeeds");
//!
//! assert_eq!(generated, 5);
//! assert!(sink.records().iter().all(|person| person.email.is_ascii()));
//! ```

mod address;
mod atomic_io;
mod config;
mod dedup;
mod error;
mod geo;
mod json_store;
mod lei;
mod person;
mod pipeline;
pub mod ports;
mod sampler;
mod synthesizer;
mod value_lists;

pub use address::{AddressKey, KeyStyle, KeyedAddress, PostalAddress};
pub use atomic_io::{write_atomic, write_output};
pub use config::{GeneratorSettings, reference_year};
pub use dedup::AddressSet;
pub use error::{
    ConfigurationError, PipelineError, PoolKind, SinkError, SourceParseError, SourceReadError,
};
pub use geo::{
    ADDR_CITY, ADDR_COUNTRY, ADDR_HOUSENUMBER, ADDR_POSTCODE, ADDR_STREET, AccumulatorState,
    GeoTagAccumulator, PointFeature, Tag, TagAccumulator,
};
pub use json_store::{
    JsonAddressPool, JsonLinesFeatureSource, JsonLinesLeiSource, JsonLinesSink,
};
pub use lei::{
    DEFAULT_JURISDICTION, EntityRecord, EntityRegistryFilter, EntityStatus, LegalEntity,
    LegalForm, LeiRecord, MAX_NAME_CHARS, RecordAddress,
};
pub use person::{Gender, Person};
pub use pipeline::{
    ExportSummary, export_addresses, export_legal_entities, generate_persons, load_address_pool,
};
pub use ports::{
    AddressPool, CollectingSink, FeatureSource, FixtureFeatureSource, FixtureLeiSource,
    InMemoryAddressPool, LeiRecordSource, RecordSink,
};
pub use sampler::{BoundedGaussian, ConstrainedSampler};
pub use synthesizer::{DEFAULT_EMAIL_DOMAIN, PersonSynthesizer, derive_email};
pub use value_lists::{ValueList, ValuePools};
