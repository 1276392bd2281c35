//! Exports the active legal entities of one jurisdiction as JSON lines.
//!
//! Reads `input_path`, one registry record per line, and keeps the active
//! entities whose legal jurisdiction matches `jurisdiction` (default `DE`).
//! Output goes to `output_path` when set and to standard output otherwise.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use testdata::{
    GeneratorSettings, JsonLinesLeiSource, JsonLinesSink, PipelineError, export_legal_entities,
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
            error!(error = %err, "legal entity export failed");
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
    let summary = export_legal_entities(
        &JsonLinesLeiSource,
        input.as_std_path(),
        settings.jurisdiction(),
        &mut sink,
    )?;
    let output = sink.finish()?;

    let target = settings.output_path()?;
    write_output(target.as_deref(), &output)?;
    info!(emitted = summary.emitted, "legal entities written");
    Ok(())
}
