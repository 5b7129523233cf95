//! SDLS Test Application CLI
//!
//! Applies and processes SDLS security on a TC, TM or AOS transfer frame.
//!
//! Usage:
//!   kmc-sdls-test-app -t TM -s 12 -V 3
//!   kmc-sdls-test-app -f 202c0408000001bd37 --processOnly
//!   kmc-sdls-test-app -p etc/kmc_sdls_test_app.properties --json

use anyhow::{Context, Result};
use clap::Parser;
use sdls_client::LoopbackService;
use sdls_test_app::{app, ArgumentError, CliArgs};
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if app::is_informational(&err) => err.exit(),
        Err(err) => return app::failure(&ArgumentError::from(err).into()),
    };

    match try_main(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => app::failure(&err),
    }
}

fn try_main(args: &CliArgs) -> Result<()> {
    // Initialize logging; stdout carries only the report
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("SDLS Test Application");
    info!("{}", "=".repeat(60));

    let config = args.resolve()?;

    let mut service = LoopbackService::from_properties(&config.properties).with_context(|| {
        format!(
            "Failed to configure security service from {:?}",
            config.properties_path
        )
    })?;
    debug!(sa = ?service.sa(), "Security association");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(&config, &mut service, &mut out)?;

    info!("Done");
    Ok(())
}
