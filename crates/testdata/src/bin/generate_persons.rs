//! Generates synthetic persons and writes them as JSON lines.
//!
//! Settings come from `TESTDATA_*` environment variables, CLI flags or a
//! configuration file. Output goes to `output_path` when set, replacing the
//! file atomically, and to standard output otherwise.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use mockable::DefaultClock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use testdata::{
    GeneratorSettings, JsonAddressPool, JsonLinesSink, PersonSynthesizer, PipelineError,
    ValuePools, generate_persons, load_address_pool, reference_year, write_output,
};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "person generation failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), PipelineError> {
    let settings = GeneratorSettings::load_from_args(env::args_os())?;
    let count = settings.person_count()?;
    let pools = settings
        .value_list_dir()?
        .map_or_else(|| Ok(ValuePools::bundled()), |dir| ValuePools::open(&dir))?;
    let addresses = load_address_pool(&JsonAddressPool::new(settings.address_pool_path()?))?;

    let clock = DefaultClock;
    let seed = settings.seed_or_from(&clock);
    let mut synthesizer = PersonSynthesizer::new(
        ChaCha8Rng::seed_from_u64(seed),
        pools,
        addresses,
        reference_year(&clock),
    )?
    .with_email_domain(settings.email_domain());
    info!(
        seed,
        count,
        reference_year = synthesizer.reference_year(),
        "generator seeded"
    );

    let mut sink = JsonLinesSink::new(Vec::new());
    generate_persons(&mut synthesizer, count, &mut sink)?;
    let records = sink.written();
    let output = sink.finish()?;

    let target = settings.output_path()?;
    write_output(target.as_deref(), &output)?;
    info!(records, bytes = output.len(), "persons written");
    Ok(())
}
