//! Security association configuration
//!
//! Built from the `key=value` lines of the test application's properties
//! file. Keys outside the `sdls.sa.` namespace belong to other consumers of
//! the same file and are skipped.
//!
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | `sdls.sa.spi` | `1` | SPI written on apply, required on process |
//! | `sdls.sa.iv` | empty | IV bytes (hex) |
//! | `sdls.sa.sn` | empty | SN bytes (hex) |
//! | `sdls.sa.mac_length` | `0` | MAC length in bytes |
//! | `sdls.sa.has_fecf` | `true` | Frames carry a CRC-16 FECF |

use crate::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const KEY_SPI: &str = "sdls.sa.spi";
pub const KEY_IV: &str = "sdls.sa.iv";
pub const KEY_SN: &str = "sdls.sa.sn";
pub const KEY_MAC_LENGTH: &str = "sdls.sa.mac_length";
pub const KEY_HAS_FECF: &str = "sdls.sa.has_fecf";

/// Upper bound on the MAC placeholder; real SAs top out at 64 bytes
const MAX_MAC_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaConfig {
    pub spi: u16,
    #[serde(with = "hex_bytes")]
    pub iv: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub sn: Vec<u8>,
    pub mac_length: usize,
    pub has_fecf: bool,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            spi: 1,
            iv: Vec::new(),
            sn: Vec::new(),
            mac_length: 0,
            has_fecf: true,
        }
    }
}

impl SaConfig {
    /// Parse configuration lines. Later lines override earlier ones.
    pub fn from_properties<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut config = Self::default();

        for line in lines {
            let line = line.as_ref();
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ServiceError::MalformedProperty(line.to_string()))?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                KEY_SPI => config.spi = parse_value(key, value)?,
                KEY_IV => config.iv = parse_hex(key, value)?,
                KEY_SN => config.sn = parse_hex(key, value)?,
                KEY_MAC_LENGTH => {
                    let len: usize = parse_value(key, value)?;
                    if len > MAX_MAC_LENGTH {
                        return Err(invalid(key, format!("{} exceeds {}", len, MAX_MAC_LENGTH)));
                    }
                    config.mac_length = len;
                }
                KEY_HAS_FECF => config.has_fecf = parse_value(key, value)?,
                _ => debug!(key, "ignoring property"),
            }
        }

        Ok(config)
    }

    /// Security header length: SPI plus IV plus SN
    pub fn header_len(&self) -> usize {
        2 + self.iv.len() + self.sn.len()
    }

    /// Security trailer length: MAC plus FECF
    pub fn trailer_len(&self) -> usize {
        self.mac_length + if self.has_fecf { crate::fecf::FECF_LEN } else { 0 }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ServiceError {
    ServiceError::InvalidProperty {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| invalid(key, e.to_string()))
}

fn parse_hex(key: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| invalid(key, e.to_string()))
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
