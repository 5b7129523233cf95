//! One end-to-end run: build the frame, drive the service, print the report

use crate::cli::RunConfig;
use crate::orchestrator::{Orchestrator, RunOutcome};
use crate::report::{OutputFormat, ReportFormatter, RunReport};
use crate::ArgumentError;
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use sdls_client::SecurityService;
use sdls_frame::Frame;
use std::io::Write;
use std::process::ExitCode;
use tracing::info;

/// Help and version requests, which clap prints and exits on by itself
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

/// One-line message for a failed run, tagged by error class
pub fn error_report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ArgumentError>() {
        Some(arg_err) => format!("Command Line Argument Error: {}", arg_err),
        None => format!("Encountered an unexpected error: {:#}", err),
    }
}

/// Print the report to stderr; every failure exits 1
pub fn failure(err: &anyhow::Error) -> ExitCode {
    eprintln!("{}", error_report(err));
    ExitCode::FAILURE
}

pub fn run<S, W>(config: &RunConfig, service: &mut S, out: &mut W) -> Result<RunOutcome>
where
    S: SecurityService + ?Sized,
    W: Write,
{
    let frame_type = config.frame_type;
    let frame = Frame::build(frame_type, &config.overrides)
        .with_context(|| format!("Failed to build {} frame", frame_type))?;
    let frame_hex = frame.to_hex();
    let bytes = frame
        .to_bytes()
        .with_context(|| format!("Frame hex is not valid: {}", frame_hex))?;

    info!(
        frame_type = %frame_type,
        override_state = ?frame.override_state(),
        len = bytes.len(),
        "Frame ready"
    );

    if config.output == OutputFormat::Text {
        writeln!(out, "Using {} transfer frame:\n{}\n", frame_type, frame_hex)?;
    }

    let outcome = Orchestrator::new(service, frame_type, config.plan())
        .run(bytes)
        .with_context(|| format!("SDLS {} security run failed", frame_type))?;

    match config.output {
        OutputFormat::Text => {
            if let Some(applied) = &outcome.applied {
                writeln!(
                    out,
                    "SDLS {} Apply Security Result:\n{}\n",
                    frame_type,
                    hex::encode(applied)
                )?;
            }
            if let Some(processed) = &outcome.processed {
                ReportFormatter::for_frame_type(frame_type).write_text(out, processed)?;
            }
        }
        OutputFormat::Json => {
            let json = RunReport::new(frame_type, &outcome).to_json()?;
            writeln!(out, "{}", json)?;
        }
    }

    Ok(outcome)
}
