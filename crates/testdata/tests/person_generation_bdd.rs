//! Behavioural tests for synthetic person generation.
//!
//! These scenarios drive the person pipeline end to end through an
//! in-memory sink.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use testdata::{
    CollectingSink, ConfigurationError, DEFAULT_EMAIL_DOMAIN, Gender, Person, PersonSynthesizer,
    PipelineError, PostalAddress, ValueList, ValuePools, generate_persons,
};
use test_support::{single_address, small_pools};

const REFERENCE_YEAR: i32 = 2024;

/// Scenario state shared between steps.
#[derive(Default, ScenarioState)]
struct World {
    pools: Slot<ValuePools>,
    addresses: Slot<Vec<Arc<PostalAddress>>>,
    outcome: Slot<Result<Vec<Person>, PipelineError>>,
    second_run: Slot<Vec<Person>>,
}

impl World {
    fn run(&self, count: usize, seed: u64) -> Result<Vec<Person>, PipelineError> {
        let pools = self.pools.get().expect("pools should be set");
        let addresses = self.addresses.get().expect("addresses should be set");
        let mut synthesizer =
            PersonSynthesizer::new(ChaCha8Rng::seed_from_u64(seed), pools, addresses, REFERENCE_YEAR)?;
        let mut sink = CollectingSink::new();
        generate_persons(&mut synthesizer, count, &mut sink)?;
        Ok(sink.into_records())
    }

    fn persons(&self) -> Vec<Person> {
        self.outcome
            .get()
            .expect("generation should have run")
            .expect("generation should succeed")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("value pools of 3 male names, 2 female names, 4 surnames and 2 eye colours")]
fn small_value_pools(world: &World) {
    world.pools.set(small_pools());
}

#[given("value pools with accented names")]
fn accented_value_pools(world: &World) {
    world.pools.set(ValuePools::new(
        ValueList::from_iter(["José", "Ömer", "Björn"]),
        ValueList::from_iter(["Zoë", "Élise", "Anaïs"]),
        ValueList::from_iter(["Müller", "Groß", "Şahin"]),
        ValueList::from_iter(["grün", "braun"]),
    ));
}

#[given("an address pool holding one address")]
fn one_address(world: &World) {
    world.addresses.set(vec![Arc::new(single_address())]);
}

#[given("an empty address pool")]
fn empty_address_pool(world: &World) {
    world.addresses.set(Vec::new());
}

// ============================================================================
// When steps
// ============================================================================

#[when("{count:usize} persons are generated with seed {seed:u64}")]
fn persons_are_generated(world: &World, count: usize, seed: u64) {
    world.outcome.set(world.run(count, seed));
}

#[when("{count:usize} persons are generated twice with seed {seed:u64}")]
fn persons_are_generated_twice(world: &World, count: usize, seed: u64) {
    world.outcome.set(world.run(count, seed));
    world
        .second_run
        .set(world.run(count, seed).expect("second run should succeed"));
}

// ============================================================================
// Then steps
// ============================================================================

#[then("{count:usize} persons are produced")]
fn persons_are_produced(world: &World, count: usize) {
    assert_eq!(world.persons().len(), count);
}

#[then("every person references the supplied address")]
fn every_person_references_the_address(world: &World) {
    let expected = single_address();
    for person in world.persons() {
        assert_eq!(*person.address, expected);
    }
}

#[then("every person is male or female")]
fn every_person_is_male_or_female(world: &World) {
    for person in world.persons() {
        assert!(matches!(person.gender, Gender::Male | Gender::Female));
    }
}

#[then("every email is ASCII and ends with the reserved test domain")]
fn every_email_is_ascii(world: &World) {
    for person in world.persons() {
        assert!(person.email.is_ascii(), "non-ASCII email: {}", person.email);
        assert!(person.email.ends_with(DEFAULT_EMAIL_DOMAIN));
    }
}

#[then("both runs produce identical persons")]
fn both_runs_are_identical(world: &World) {
    let second = world.second_run.get().expect("second run should be set");
    assert_eq!(world.persons(), second);
}

#[then("generation fails with an empty address pool error")]
fn generation_fails_with_empty_address_pool(world: &World) {
    let outcome = world.outcome.get().expect("generation should have run");
    assert_eq!(
        outcome,
        Err(PipelineError::Configuration(
            ConfigurationError::EmptyAddressPool
        ))
    );
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/person_generation.feature",
    name = "Generated persons reference the single supplied address"
)]
fn generated_persons_reference_the_single_address(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/person_generation.feature",
    name = "Generated emails are ASCII at the reserved test domain"
)]
fn generated_emails_are_ascii(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/person_generation.feature",
    name = "The same seed reproduces the same persons"
)]
fn same_seed_reproduces_persons(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/person_generation.feature",
    name = "An empty address pool aborts the run"
)]
fn empty_address_pool_aborts_the_run(world: World) {
    let _ = world;
}
