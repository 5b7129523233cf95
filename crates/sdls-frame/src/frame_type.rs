//! Transfer frame variants

use crate::layout::{FrameLayout, AOS_LAYOUT, SC_ID, TC_LAYOUT, TM_LAYOUT, VC_ID};
use crate::{FrameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CCSDS transfer frame formats protected by SDLS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrameType {
    /// Telecommand
    #[default]
    Tc,
    /// Telemetry
    Tm,
    /// Advanced Orbiting Systems
    Aos,
}

impl FrameType {
    pub const ALL: [FrameType; 3] = [FrameType::Tc, FrameType::Tm, FrameType::Aos];

    pub fn layout(&self) -> &'static FrameLayout {
        match self {
            FrameType::Tc => &TC_LAYOUT,
            FrameType::Tm => &TM_LAYOUT,
            FrameType::Aos => &AOS_LAYOUT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::Tc => "TC",
            FrameType::Tm => "TM",
            FrameType::Aos => "AOS",
        }
    }

    pub fn scid_width(&self) -> u32 {
        self.field_width(SC_ID)
    }

    pub fn vcid_width(&self) -> u32 {
        self.field_width(VC_ID)
    }

    /// Render a spacecraft id as this type's fixed-width binary string
    pub fn scid_bits(&self, scid: u16) -> Result<String> {
        to_bits(SC_ID, u64::from(scid), self.scid_width())
    }

    /// Render a virtual channel id as this type's fixed-width binary string
    pub fn vcid_bits(&self, vcid: u8) -> Result<String> {
        to_bits(VC_ID, u64::from(vcid), self.vcid_width())
    }

    fn field_width(&self, name: &str) -> u32 {
        self.layout().field(name).map(|f| f.width).unwrap_or(0)
    }
}

fn to_bits(field: &'static str, value: u64, width: u32) -> Result<String> {
    if width == 0 || value >> width != 0 {
        return Err(FrameError::ValueOutOfRange {
            field,
            value,
            width,
        });
    }
    Ok(format!("{:0width$b}", value, width = width as usize))
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameType {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TC" => Ok(FrameType::Tc),
            "TM" => Ok(FrameType::Tm),
            "AOS" => Ok(FrameType::Aos),
            _ => Err(FrameError::UnknownFrameType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("tc".parse::<FrameType>().unwrap(), FrameType::Tc);
        assert_eq!("Tm".parse::<FrameType>().unwrap(), FrameType::Tm);
        assert_eq!("aOs".parse::<FrameType>().unwrap(), FrameType::Aos);
        assert!(matches!(
            "USLP".parse::<FrameType>(),
            Err(FrameError::UnknownFrameType(t)) if t == "USLP"
        ));
    }

    #[test]
    fn test_field_widths() {
        assert_eq!((FrameType::Tc.scid_width(), FrameType::Tc.vcid_width()), (10, 6));
        assert_eq!((FrameType::Tm.scid_width(), FrameType::Tm.vcid_width()), (10, 3));
        assert_eq!((FrameType::Aos.scid_width(), FrameType::Aos.vcid_width()), (8, 6));
    }

    #[test]
    fn test_id_bits_are_zero_padded() {
        assert_eq!(FrameType::Tc.scid_bits(44).unwrap(), "0000101100");
        assert_eq!(FrameType::Tm.scid_bits(3).unwrap(), "0000000011");
        assert_eq!(FrameType::Aos.scid_bits(255).unwrap(), "11111111");
        assert_eq!(FrameType::Tm.vcid_bits(5).unwrap(), "101");
        assert_eq!(FrameType::Tc.vcid_bits(63).unwrap(), "111111");
    }

    #[test]
    fn test_id_bits_reject_values_wider_than_field() {
        assert!(FrameType::Aos.scid_bits(256).is_err());
        assert!(FrameType::Tm.vcid_bits(8).is_err());
        assert!(FrameType::Tc.scid_bits(1024).is_err());
    }

    #[test]
    fn test_display_and_default() {
        assert_eq!(FrameType::Aos.to_string(), "AOS");
        assert_eq!(FrameType::default(), FrameType::Tc);
    }
}
