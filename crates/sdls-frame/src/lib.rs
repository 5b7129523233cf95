//! SDLS Frame Model
//!
//! Bit-exact header layouts for the three CCSDS transfer frame formats that
//! SDLS protects, and a [`Frame`] that turns defaults plus overrides into the
//! hex string handed to the security service.
//!
//! # Header layouts
//!
//! | Frame | Header bits | SC ID | VC ID |
//! |-------|-------------|-------|-------|
//! | TC    | 40          | 10    | 6     |
//! | TM    | 48          | 10    | 3     |
//! | AOS   | 48          | 8     | 6     |
//!
//! A frame with no overrides emits the reference default hex byte for byte.
//! Once SC ID or VC ID is overridden the header is re-packed from the field
//! table; a whole-frame hex override always wins.

use thiserror::Error;

pub mod frame;
pub mod frame_type;
pub mod layout;

pub use frame::{Frame, FrameOverrides, OverrideState};
pub use frame_type::FrameType;
pub use layout::{extract_bits, FieldSpec, FrameLayout, SC_ID, VC_ID};

/// Highest spacecraft id accepted on the command line
pub const MAX_SCID: u16 = 1023;

/// Highest virtual channel id accepted on the command line
pub const MAX_VCID: u8 = 63;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame type must be either 'TC', 'TM', or 'AOS' (got '{0}')")]
    UnknownFrameType(String),
    #[error("Frame layout has no field named {0}")]
    UnknownField(&'static str),
    #[error("{field} must be {expected} bits wide, got {actual}")]
    FieldWidth {
        field: &'static str,
        expected: u32,
        actual: usize,
    },
    #[error("{field} value '{value}' is not a binary string")]
    NotBinary { field: &'static str, value: String },
    #[error("{field} value {value} does not fit in {width} bits")]
    ValueOutOfRange {
        field: &'static str,
        value: u64,
        width: u32,
    },
    #[error("Invalid frame hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
