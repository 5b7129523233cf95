//! SDLS Test Application
//!
//! Builds a TC, TM or AOS transfer frame from defaults and command-line
//! overrides, then applies and/or processes SDLS security on it through a
//! [`SecurityService`](sdls_client::SecurityService) and reports the
//! recovered security header and trailer.
//!
//! # Apply / process selection
//!
//! | `--applyOnly` | `--processOnly` | Apply | Process |
//! |---------------|-----------------|-------|---------|
//! | no            | no              | yes   | yes     |
//! | yes           | no              | yes   | no      |
//! | no            | yes             | no    | yes     |
//! | yes           | yes             | yes   | yes     |

use sdls_frame::FrameType;
use std::path::PathBuf;
use thiserror::Error;

pub mod app;
pub mod cli;
pub mod orchestrator;
pub mod properties;
pub mod report;

pub use cli::{CliArgs, RunConfig};
pub use orchestrator::{Orchestrator, RunOutcome, RunPlan};
pub use report::{OutputFormat, ReportFormatter};

/// Properties file name looked up next to the install tree
pub const DEFAULT_PROPERTIES_FILE: &str = "kmc_sdls_test_app.properties";

/// Invalid or conflicting command-line input
#[derive(Error, Debug)]
pub enum ArgumentError {
    #[error("{0}")]
    Usage(String),
    #[error("Frame type must be either 'TC', 'TM', or 'AOS' (got '{0}')")]
    InvalidFrameType(String),
    #[error("SC ID must be a number between 0 and 1023 inclusive (got '{0}')")]
    InvalidScid(String),
    #[error("VC ID must be a number between 0 and 63 inclusive (got '{0}')")]
    InvalidVcid(String),
    #[error("{field} {value} does not fit the {width}-bit {frame_type} field")]
    IdTooWide {
        field: &'static str,
        value: u16,
        frame_type: FrameType,
        width: u32,
    },
    #[error("Can't have both Custom Frame override and (SC_ID or VC_ID) overrides specified at the same time.")]
    ConflictingOverrides,
    #[error("Frame override is not a valid hex string: {0}")]
    InvalidFrameHex(String),
    #[error("Can't read properties file {path:?}: {source}")]
    Properties {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<clap::Error> for ArgumentError {
    /// Keeps the first line of clap's message, without its `error: ` tag
    fn from(err: clap::Error) -> Self {
        let text = err.to_string();
        let first = text.lines().next().unwrap_or_default();
        ArgumentError::Usage(first.trim_start_matches("error: ").trim().to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArgumentError>;
