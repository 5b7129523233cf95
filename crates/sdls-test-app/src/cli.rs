//! Command-line options and their resolution into a run configuration

use crate::orchestrator::RunPlan;
use crate::properties::{default_properties_path, load_properties};
use crate::report::OutputFormat;
use crate::{ArgumentError, Result};
use clap::Parser;
use sdls_frame::{FrameOverrides, FrameType, MAX_SCID, MAX_VCID};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug, Default)]
#[command(
    name = "kmc-sdls-test-app",
    about = "Simple SDLS test application that will Apply and Process Security on a given frame"
)]
pub struct CliArgs {
    /// Hex frame string of the transfer frame to apply & process SDLS layering on
    #[arg(short = 'f', long = "frame")]
    pub frame: Option<String>,

    /// Properties file with the security service configuration
    #[arg(short = 'p', long = "properties")]
    pub properties: Option<PathBuf>,

    /// Only process security on the frame (default is to apply & process)
    #[arg(short = 'P', long = "processOnly")]
    pub process_only: bool,

    /// Only apply security on the frame (default is to apply & process)
    #[arg(short = 'A', long = "applyOnly")]
    pub apply_only: bool,

    /// Override the default frame SC ID field
    #[arg(short = 's', long = "scid")]
    pub scid: Option<String>,

    /// Override the default frame VC ID field
    #[arg(short = 'V', long = "vcid")]
    pub vcid: Option<String>,

    /// Frame type, choice between TC (default), TM, and AOS
    #[arg(short = 't', long = "type")]
    pub frame_type: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated, immutable configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub frame_type: FrameType,
    pub overrides: FrameOverrides,
    pub apply_only: bool,
    pub process_only: bool,
    pub properties_path: PathBuf,
    pub properties: Vec<String>,
    pub output: OutputFormat,
}

impl RunConfig {
    pub fn plan(&self) -> RunPlan {
        RunPlan::from_flags(self.apply_only, self.process_only)
    }
}

impl CliArgs {
    /// Validate options in order: frame type, id ranges, override conflicts,
    /// frame hex, then read the properties source.
    pub fn resolve(&self) -> Result<RunConfig> {
        let frame_type = match &self.frame_type {
            Some(token) => token
                .parse::<FrameType>()
                .map_err(|_| ArgumentError::InvalidFrameType(token.clone()))?,
            None => FrameType::Tc,
        };

        let scid = self
            .scid
            .as_deref()
            .map(|raw| {
                parse_id(raw, MAX_SCID).ok_or_else(|| ArgumentError::InvalidScid(raw.into()))
            })
            .transpose()?;
        let vcid = self
            .vcid
            .as_deref()
            .map(|raw| {
                parse_id(raw, u16::from(MAX_VCID))
                    .map(|v| v as u8)
                    .ok_or_else(|| ArgumentError::InvalidVcid(raw.into()))
            })
            .transpose()?;

        if let Some(value) = scid {
            check_width("SC ID", value, frame_type, frame_type.scid_width())?;
        }
        if let Some(value) = vcid {
            check_width("VC ID", u16::from(value), frame_type, frame_type.vcid_width())?;
        }

        if self.frame.is_some() && (scid.is_some() || vcid.is_some()) {
            return Err(ArgumentError::ConflictingOverrides);
        }

        if let Some(hex_frame) = &self.frame {
            hex::decode(hex_frame).map_err(|e| ArgumentError::InvalidFrameHex(e.to_string()))?;
        }

        let properties_path = self.properties.clone().unwrap_or_else(default_properties_path);
        let properties = load_properties(&properties_path)?;

        let config = RunConfig {
            frame_type,
            overrides: FrameOverrides {
                scid,
                vcid,
                frame_hex: self.frame.clone(),
            },
            apply_only: self.apply_only,
            process_only: self.process_only,
            properties_path,
            properties,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        };
        debug!(
            frame_type = %config.frame_type,
            overrides = ?config.overrides,
            plan = ?config.plan(),
            "Resolved arguments"
        );
        Ok(config)
    }
}

fn parse_id(raw: &str, max: u16) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|v| *v <= max)
}

fn check_width(field: &'static str, value: u16, frame_type: FrameType, width: u32) -> Result<()> {
    if u32::from(value) >> width != 0 {
        return Err(ArgumentError::IdTooWide {
            field,
            value,
            frame_type,
            width,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn props_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sdls.sa.spi=1").unwrap();
        file
    }

    fn parse(args: &[&str]) -> CliArgs {
        let mut argv = vec!["kmc-sdls-test-app"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_to_tc_apply_and_process() {
        let props = props_file();
        let path = props.path().to_str().unwrap();
        let config = parse(&["-p", path]).resolve().unwrap();

        assert_eq!(config.frame_type, FrameType::Tc);
        assert_eq!(config.overrides, FrameOverrides::default());
        assert_eq!(config.plan(), RunPlan { apply: true, process: true });
        assert_eq!(config.properties, vec!["sdls.sa.spi=1"]);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_long_option_names() {
        let props = props_file();
        let path = props.path().to_str().unwrap();
        let config = parse(&[
            "--properties",
            path,
            "--type",
            "aos",
            "--scid",
            "12",
            "--vcid",
            "3",
            "--applyOnly",
            "--json",
        ])
        .resolve()
        .unwrap();

        assert_eq!(config.frame_type, FrameType::Aos);
        assert_eq!(config.overrides.scid, Some(12));
        assert_eq!(config.overrides.vcid, Some(3));
        assert_eq!(config.plan(), RunPlan { apply: true, process: false });
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_frame_type() {
        let err = parse(&["-t", "USLP"]).resolve().unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidFrameType(t) if t == "USLP"));
    }

    #[test]
    fn test_rejects_out_of_range_ids() {
        assert!(matches!(
            parse(&["-s", "1024"]).resolve().unwrap_err(),
            ArgumentError::InvalidScid(_)
        ));
        assert!(matches!(
            parse(&["-V", "64"]).resolve().unwrap_err(),
            ArgumentError::InvalidVcid(_)
        ));
        assert!(matches!(
            parse(&["-s", "abc"]).resolve().unwrap_err(),
            ArgumentError::InvalidScid(_)
        ));
        assert!(matches!(
            parse(&["--scid=-1"]).resolve().unwrap_err(),
            ArgumentError::InvalidScid(_)
        ));
    }

    #[test]
    fn test_rejected_token_in_message() {
        let msg = parse(&["-t", "USLP"]).resolve().unwrap_err().to_string();
        assert!(msg.ends_with("(got 'USLP')"), "{}", msg);
        let msg = parse(&["-s", "abc"]).resolve().unwrap_err().to_string();
        assert!(msg.ends_with("(got 'abc')"), "{}", msg);
        let msg = parse(&["-V", "99"]).resolve().unwrap_err().to_string();
        assert!(msg.ends_with("(got '99')"), "{}", msg);
    }

    #[test]
    fn test_frame_type_checked_before_ids() {
        let err = parse(&["-t", "X", "-s", "5000"]).resolve().unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidFrameType(_)));
    }

    #[test]
    fn test_rejects_ids_wider_than_frame_field() {
        assert!(matches!(
            parse(&["-t", "AOS", "-s", "256"]).resolve().unwrap_err(),
            ArgumentError::IdTooWide { width: 8, .. }
        ));
        assert!(matches!(
            parse(&["-t", "TM", "-V", "8"]).resolve().unwrap_err(),
            ArgumentError::IdTooWide { width: 3, .. }
        ));
    }

    #[test]
    fn test_frame_override_conflicts_with_id_overrides() {
        // Properties path does not exist: the conflict must be reported first
        for args in [
            &["-f", "202c0408000001bd37", "-s", "5", "-p", "/nonexistent"][..],
            &["-f", "202c0408000001bd37", "-V", "0", "-p", "/nonexistent"][..],
        ] {
            assert!(matches!(
                parse(args).resolve().unwrap_err(),
                ArgumentError::ConflictingOverrides
            ));
        }
    }

    #[test]
    fn test_rejects_invalid_frame_hex() {
        let err = parse(&["-f", "202c0"]).resolve().unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidFrameHex(_)));
    }

    #[test]
    fn test_unreadable_properties() {
        let err = parse(&["-p", "/nonexistent/kmc.properties"]).resolve().unwrap_err();
        assert!(matches!(err, ArgumentError::Properties { .. }));
    }

    proptest! {
        #[test]
        fn prop_id_accepted_iff_in_range(value in any::<u16>()) {
            let parsed = parse_id(&value.to_string(), MAX_SCID);
            prop_assert_eq!(parsed.is_some(), value <= MAX_SCID);
            let parsed = parse_id(&value.to_string(), u16::from(MAX_VCID));
            prop_assert_eq!(parsed.is_some(), value <= u16::from(MAX_VCID));
        }
    }
}
