//! Human-readable and JSON rendering of security results

use crate::orchestrator::RunOutcome;
use sdls_client::ProcessedFrame;
use sdls_frame::FrameType;
use serde::Serialize;
use std::io::{self, Write};

/// Report output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders a [`ProcessedFrame`] under the title of its frame type
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    frame_type: FrameType,
}

impl ReportFormatter {
    pub fn for_frame_type(frame_type: FrameType) -> Self {
        Self { frame_type }
    }

    pub fn title(&self) -> String {
        format!("SDLS {} Process Security Result:", self.frame_type)
    }

    /// SPI, IV and SN when present, PDU, MAC, FECF; one per line
    pub fn write_text<W: Write>(&self, out: &mut W, frame: &ProcessedFrame) -> io::Result<()> {
        let header = &frame.security_header;
        let trailer = &frame.security_trailer;

        writeln!(out, "{}", self.title())?;
        writeln!(out, "SPI: {}", header.spi)?;
        if !header.iv.is_empty() {
            writeln!(out, "IV: {}", hex::encode(&header.iv))?;
        }
        if !header.sn.is_empty() {
            writeln!(out, "SN: {}", hex::encode(&header.sn))?;
        }
        writeln!(out, "PDU: {}", hex::encode(&frame.pdu))?;
        writeln!(out, "MAC: {}", hex::encode(&trailer.mac))?;
        writeln!(out, "FECF: {:#x}", trailer.fecf)
    }
}

/// Security result with byte fields hex-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub spi: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sn: Option<String>,
    pub pdu: String,
    pub mac: String,
    pub fecf: String,
}

impl From<&ProcessedFrame> for ProcessReport {
    fn from(frame: &ProcessedFrame) -> Self {
        let header = &frame.security_header;
        let non_empty = |bytes: &[u8]| (!bytes.is_empty()).then(|| hex::encode(bytes));
        Self {
            spi: header.spi,
            iv: non_empty(&header.iv),
            sn: non_empty(&header.sn),
            pdu: hex::encode(&frame.pdu),
            mac: hex::encode(&frame.security_trailer.mac),
            fecf: format!("{:#x}", frame.security_trailer.fecf),
        }
    }
}

/// JSON document for one whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub frame_type: FrameType,
    pub frame: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<ProcessReport>,
}

impl RunReport {
    pub fn new(frame_type: FrameType, outcome: &RunOutcome) -> Self {
        Self {
            frame_type,
            frame: hex::encode(&outcome.input),
            applied: outcome.applied.as_deref().map(hex::encode),
            processed: outcome.processed.as_ref().map(ProcessReport::from),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
