//! Processed frame view returned by process-security

use sdls_frame::FrameType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeader {
    /// Security Parameter Index
    pub spi: u16,
    /// Initialization vector, empty when the SA carries none
    pub iv: Vec<u8>,
    /// Sequence number, empty when the SA carries none
    pub sn: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityTrailer {
    pub mac: Vec<u8>,
    /// Frame Error Control Field, 0 when the frame carries none
    pub fecf: u16,
}

/// Frame after security processing, split into its SDLS parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFrame {
    pub frame_type: FrameType,
    pub primary_header: Vec<u8>,
    pub security_header: SecurityHeader,
    pub pdu: Vec<u8>,
    pub security_trailer: SecurityTrailer,
}
