//! End-to-end tests for the person pipeline.
//!
//! These tests load the address pool from a JSON file, generate persons into
//! a JSON-lines buffer, and write the result atomically.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use std::collections::HashSet;
use std::sync::Arc;

use camino::Utf8Path;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};
use fs_support::{open_dir, unique_temp_dir};
use testdata::{
    CollectingSink, ConfigurationError, Gender, JsonAddressPool, JsonLinesSink, Person,
    PersonSynthesizer, PipelineError, PostalAddress, ValuePools, generate_persons,
    load_address_pool, write_atomic,
};
use test_support::{single_address, small_pools};

#[fixture]
fn synthesizer() -> PersonSynthesizer<ChaCha8Rng> {
    PersonSynthesizer::new(
        ChaCha8Rng::seed_from_u64(42),
        small_pools(),
        vec![Arc::new(single_address())],
        2024,
    )
    .expect("valid pools")
}

#[rstest]
fn hundred_persons_share_the_single_address(mut synthesizer: PersonSynthesizer<ChaCha8Rng>) {
    let mut sink = CollectingSink::new();
    let generated = generate_persons(&mut synthesizer, 100, &mut sink).expect("generation");

    assert_eq!(generated, 100);
    let persons = sink.into_records();
    assert_eq!(persons.len(), 100);
    let expected = single_address();
    assert!(persons.iter().all(|person| *person.address == expected));
    assert!(
        persons
            .iter()
            .all(|person| matches!(person.gender, Gender::Male | Gender::Female))
    );
}

#[rstest]
fn persons_stay_within_sampled_ranges(mut synthesizer: PersonSynthesizer<ChaCha8Rng>) {
    let mut sink = CollectingSink::new();
    generate_persons(&mut synthesizer, 500, &mut sink).expect("generation");

    for person in sink.records() {
        let range = match person.gender {
            Gender::Male => 160..=200,
            Gender::Female => 150..=190,
        };
        assert!(range.contains(&person.height), "{person:?}");
        assert!((1924..=2023).contains(&chrono::Datelike::year(&person.birth_date)));
    }
}

#[rstest]
fn name_pools_are_all_used(mut synthesizer: PersonSynthesizer<ChaCha8Rng>) {
    let mut sink = CollectingSink::new();
    generate_persons(&mut synthesizer, 500, &mut sink).expect("generation");

    let surnames: HashSet<_> = sink
        .records()
        .iter()
        .map(|person| person.family_name.as_str())
        .collect();
    assert_eq!(surnames.len(), 4);
}

#[test]
fn addresses_load_from_json_and_output_is_written_atomically() {
    let dir_path = unique_temp_dir("persons").expect("temp dir");
    let dir = open_dir(&dir_path).expect("open temp dir");
    let pool_json = serde_json::to_string(&vec![single_address()]).expect("encode pool");
    dir.write("addresses.json", pool_json).expect("write pool");

    let addresses = load_address_pool(&JsonAddressPool::new(dir_path.join("addresses.json")))
        .expect("load pool");
    let mut synthesizer = PersonSynthesizer::new(
        ChaCha8Rng::seed_from_u64(5),
        ValuePools::bundled(),
        addresses,
        2024,
    )
    .expect("valid pools");

    let mut sink = JsonLinesSink::new(Vec::new());
    generate_persons(&mut synthesizer, 10, &mut sink).expect("generation");
    let output = sink.finish().expect("flush");
    write_atomic(&dir, Utf8Path::new("persons.jsonl"), &output).expect("write output");

    let written = dir.read_to_string("persons.jsonl").expect("read output");
    let persons: Vec<Person> = written
        .lines()
        .map(|line| serde_json::from_str(line).expect("decode person"))
        .collect();
    assert_eq!(persons.len(), 10);
    assert!(
        persons
            .iter()
            .all(|person| *person.address == single_address())
    );
}

#[test]
fn missing_address_pool_file_fails() {
    let result = load_address_pool(&JsonAddressPool::new("target/testdata-tests/missing.json"));
    assert!(matches!(
        result,
        Err(PipelineError::Configuration(
            ConfigurationError::AddressPoolRead { .. }
        ))
    ));
}

#[test]
fn malformed_address_pool_is_a_configuration_error() {
    let dir_path = unique_temp_dir("bad-pool").expect("temp dir");
    let dir = open_dir(&dir_path).expect("open temp dir");
    dir.write("addresses.json", r#"{"country": "DE"}"#)
        .expect("write pool");

    let result = load_address_pool(&JsonAddressPool::new(dir_path.join("addresses.json")));

    assert!(matches!(
        result,
        Err(PipelineError::Configuration(
            ConfigurationError::AddressPoolRead { ref path, .. }
        )) if path.ends_with("addresses.json")
    ));
}

#[test]
fn shared_addresses_are_not_copied_per_person() {
    let address = Arc::new(PostalAddress::new("DE", "Rostock", "18055", "Neuer Markt", "1"));
    let mut synthesizer = PersonSynthesizer::new(
        ChaCha8Rng::seed_from_u64(3),
        small_pools(),
        vec![Arc::clone(&address)],
        2024,
    )
    .expect("valid pools");
    let mut sink = CollectingSink::new();
    generate_persons(&mut synthesizer, 5, &mut sink).expect("generation");

    assert!(
        sink.records()
            .iter()
            .all(|person| Arc::ptr_eq(&person.address, &address))
    );
}
