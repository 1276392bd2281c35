//! Extracts unique postal addresses from tagged point features.
//!
//! Reads `input_path`, one point feature per line, and keeps addresses whose
//! country tag matches `jurisdiction`. `separated_keys` switches the
//! deduplication key to unit-separated fields.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use testdata::{
    GeneratorSettings, JsonLinesFeatureSource, JsonLinesSink, PipelineError, export_addresses,
    write_output,
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
            error!(error = %err, "address export failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), PipelineError> {
    let settings = GeneratorSettings::load_from_args(env::args_os())?;
    let input = settings.input_path()?;

    let mut sink = JsonLinesSink::new(Vec::new());
    let summary = export_addresses(
        &JsonLinesFeatureSource,
        input.as_std_path(),
        settings.jurisdiction(),
        settings.key_style(),
        &mut sink,
    )?;
    let output = sink.finish()?;

    let target = settings.output_path()?;
    write_output(target.as_deref(), &output)?;
    info!(emitted = summary.emitted, "addresses written");
    Ok(())
}
