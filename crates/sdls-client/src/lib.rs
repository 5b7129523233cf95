//! SDLS Security Service Client
//!
//! The [`SecurityService`] trait is the seam between frame assembly and
//! whatever performs the security transform. A production deployment plugs
//! in a key-managed implementation; [`LoopbackService`] is a clear-mode
//! implementation (security header, optional MAC placeholder, FECF) with no
//! cryptography, used by the test application and its tests.
//!
//! # Clear-mode frame layout
//!
//! ```text
//! | primary header | SPI (2) | IV | SN | PDU | MAC | FECF (2, optional) |
//! ```
//!
//! IV, SN and MAC lengths come from the security association configured
//! through [`SaConfig`].

use thiserror::Error;

pub mod config;
pub mod fecf;
pub mod loopback;
pub mod processed;
pub mod service;

pub use config::SaConfig;
pub use loopback::LoopbackService;
pub use processed::{ProcessedFrame, SecurityHeader, SecurityTrailer};
pub use service::SecurityService;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid configuration line '{0}': expected key=value")]
    MalformedProperty(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidProperty { key: String, reason: String },
    #[error("{frame_type} frame too short: need at least {needed} bytes, have {actual}")]
    FrameTooShort {
        frame_type: sdls_frame::FrameType,
        needed: usize,
        actual: usize,
    },
    #[error("TC frame length field says {declared} bytes, frame has {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("TC frame of {0} bytes exceeds the 1024 byte maximum")]
    FrameTooLong(usize),
    #[error("FECF mismatch: frame carries {received:#06x}, computed {computed:#06x}")]
    FecfMismatch { received: u16, computed: u16 },
    #[error("No security association for SPI {0}")]
    UnknownSpi(u16),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
