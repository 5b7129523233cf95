//! Frame construction, overrides and hex serialization

use crate::layout::{SC_ID, VC_ID};
use crate::{FrameError, FrameType, Result};
use tracing::debug;

/// Which source `to_hex` draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideState {
    /// Literal default frame
    NotOverridden,
    /// Header re-packed from the field table
    FieldOverridden,
    /// Caller-supplied hex, verbatim
    WholeFrameOverridden,
}

/// Overrides collected from the command line, applied once at build time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOverrides {
    pub scid: Option<u16>,
    pub vcid: Option<u8>,
    pub frame_hex: Option<String>,
}

/// A TC, TM or AOS transfer frame
#[derive(Debug, Clone)]
pub struct Frame {
    frame_type: FrameType,
    /// Current field values, parallel to the layout's field table
    values: Vec<u64>,
    body_hex: String,
    fields_overridden: bool,
    hex_override: Option<String>,
}

impl Frame {
    /// Default frame for a type
    pub fn new(frame_type: FrameType) -> Self {
        let layout = frame_type.layout();
        Self {
            frame_type,
            values: layout.fields.iter().map(|f| f.default).collect(),
            body_hex: layout.default_body_hex.to_string(),
            fields_overridden: false,
            hex_override: None,
        }
    }

    /// Build a frame and apply overrides in order: SC ID, VC ID, whole frame
    pub fn build(frame_type: FrameType, overrides: &FrameOverrides) -> Result<Self> {
        let mut frame = Self::new(frame_type);

        if let Some(scid) = overrides.scid {
            frame.override_scid(&frame_type.scid_bits(scid)?)?;
        }
        if let Some(vcid) = overrides.vcid {
            frame.override_vcid(&frame_type.vcid_bits(vcid)?)?;
        }
        if let Some(hex) = &overrides.frame_hex {
            frame.override_hex(hex.clone());
        }

        Ok(frame)
    }

    pub fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    /// Set the spacecraft id from a fixed-width binary string
    pub fn override_scid(&mut self, bits: &str) -> Result<()> {
        self.override_field(SC_ID, bits)
    }

    /// Set the virtual channel id from a fixed-width binary string
    pub fn override_vcid(&mut self, bits: &str) -> Result<()> {
        self.override_field(VC_ID, bits)
    }

    /// Replace the whole frame. Wins over field overrides when serialized.
    pub fn override_hex(&mut self, hex: impl Into<String>) {
        let hex = hex.into();
        debug!(frame_type = %self.frame_type, len = hex.len(), "whole-frame override");
        self.hex_override = Some(hex);
    }

    pub fn override_state(&self) -> OverrideState {
        if self.hex_override.is_some() {
            OverrideState::WholeFrameOverridden
        } else if self.fields_overridden {
            OverrideState::FieldOverridden
        } else {
            OverrideState::NotOverridden
        }
    }

    /// Current value of a header field
    pub fn field(&self, name: &str) -> Option<u64> {
        let idx = self.frame_type.layout().field_index(name)?;
        self.values.get(idx).copied()
    }

    pub fn header_bit_len(&self) -> u32 {
        self.frame_type.layout().header_bits()
    }

    pub fn body_hex(&self) -> &str {
        &self.body_hex
    }

    pub fn to_hex(&self) -> String {
        let layout = self.frame_type.layout();
        match self.override_state() {
            OverrideState::WholeFrameOverridden => {
                self.hex_override.clone().unwrap_or_default()
            }
            OverrideState::NotOverridden => layout.default_hex(),
            OverrideState::FieldOverridden => {
                format!("{}{}", layout.pack_hex(&self.values), self.body_hex)
            }
        }
    }

    /// Decoded frame bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(self.to_hex())?)
    }

    fn override_field(&mut self, name: &'static str, bits: &str) -> Result<()> {
        let layout = self.frame_type.layout();
        let idx = layout
            .field_index(name)
            .ok_or(FrameError::UnknownField(name))?;
        let spec = &layout.fields[idx];

        if bits.len() != spec.width as usize {
            return Err(FrameError::FieldWidth {
                field: name,
                expected: spec.width,
                actual: bits.len(),
            });
        }
        let not_binary = || FrameError::NotBinary {
            field: name,
            value: bits.to_string(),
        };
        if !bits.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(not_binary());
        }
        let value = u64::from_str_radix(bits, 2).map_err(|_| not_binary())?;

        debug!(frame_type = %self.frame_type, field = name, value, "field override");
        self.values[idx] = value;
        self.fields_overridden = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::extract_bits;
    use proptest::prelude::*;

    #[test]
    fn test_default_frames_are_literal() {
        assert_eq!(Frame::new(FrameType::Tc).to_hex(), "202c0408000001bd37");

        let tm = Frame::new(FrameType::Tm).to_hex();
        assert!(tm.starts_with("4ff000000000"));
        assert_eq!(tm.len(), 12 + 188);

        let aos = Frame::new(FrameType::Aos).to_hex();
        assert!(aos.starts_with("7fc000000000"));
        assert_eq!(aos.len(), 12 + 188);
    }

    #[test]
    fn test_default_state_is_not_overridden() {
        let frame = Frame::new(FrameType::Tc);
        assert_eq!(frame.override_state(), OverrideState::NotOverridden);
        assert_eq!(frame.field(SC_ID), Some(44));
        assert_eq!(frame.field(VC_ID), Some(1));
    }

    #[test]
    fn test_tc_scid_override_repacks_header() {
        let mut frame = Frame::new(FrameType::Tc);
        frame.override_scid("0000000011").unwrap();
        assert_eq!(frame.override_state(), OverrideState::FieldOverridden);
        // sc_id 3, everything else from the table
        assert_eq!(frame.to_hex(), "2003040800".to_owned() + "0001bd37");
    }

    #[test]
    fn test_tm_vcid_override_uses_table_defaults() {
        let mut frame = Frame::new(FrameType::Tm);
        frame.override_vcid("111").unwrap();
        let hex = frame.to_hex();
        assert_eq!(&hex[..12], "02ce00000000");
        assert_eq!(&hex[12..], Frame::new(FrameType::Tm).body_hex());
    }

    #[test]
    fn test_aos_override_keeps_leading_zero_nibble() {
        let mut frame = Frame::new(FrameType::Aos);
        frame.override_scid("00000001").unwrap();
        assert_eq!(&frame.to_hex()[..12], "004000000040");
    }

    #[test]
    fn test_whole_frame_override_wins_over_fields() {
        let mut frame = Frame::new(FrameType::Tc);
        frame.override_scid("0000000011").unwrap();
        frame.override_hex("deadbeef");
        assert_eq!(frame.override_state(), OverrideState::WholeFrameOverridden);
        assert_eq!(frame.to_hex(), "deadbeef");
    }

    #[test]
    fn test_override_rejects_wrong_width() {
        let mut frame = Frame::new(FrameType::Aos);
        let err = frame.override_scid("0000101100").unwrap_err();
        assert!(matches!(
            err,
            FrameError::FieldWidth {
                expected: 8,
                actual: 10,
                ..
            }
        ));
        assert_eq!(frame.override_state(), OverrideState::NotOverridden);
    }

    #[test]
    fn test_override_rejects_non_binary() {
        let mut frame = Frame::new(FrameType::Tm);
        assert!(matches!(
            frame.override_vcid("1 1"),
            Err(FrameError::NotBinary { .. })
        ));
        assert!(matches!(
            frame.override_vcid("+11"),
            Err(FrameError::NotBinary { .. })
        ));
    }

    #[test]
    fn test_build_applies_overrides_in_order() {
        let overrides = FrameOverrides {
            scid: Some(5),
            vcid: Some(2),
            frame_hex: None,
        };
        let frame = Frame::build(FrameType::Tc, &overrides).unwrap();
        assert_eq!(frame.field(SC_ID), Some(5));
        assert_eq!(frame.field(VC_ID), Some(2));
        assert_eq!(frame.field("frame_length"), Some(8));
    }

    #[test]
    fn test_build_rejects_id_wider_than_field() {
        let overrides = FrameOverrides {
            scid: Some(300),
            ..Default::default()
        };
        assert!(matches!(
            Frame::build(FrameType::Aos, &overrides),
            Err(FrameError::ValueOutOfRange { width: 8, .. })
        ));
    }

    #[test]
    fn test_to_bytes_rejects_bad_hex() {
        let mut frame = Frame::new(FrameType::Tc);
        frame.override_hex("abc");
        assert!(matches!(frame.to_bytes(), Err(FrameError::InvalidHex(_))));
    }

    fn type_and_ids() -> impl Strategy<Value = (FrameType, u16, u8)> {
        prop_oneof![Just(FrameType::Tc), Just(FrameType::Tm), Just(FrameType::Aos)].prop_flat_map(
            |ft| {
                let max_scid = (1u16 << ft.scid_width()) - 1;
                let max_vcid = (1u8 << ft.vcid_width()) - 1;
                (Just(ft), 0..=max_scid, 0..=max_vcid)
            },
        )
    }

    proptest! {
        #[test]
        fn prop_overrides_land_at_field_offsets((ft, scid, vcid) in type_and_ids()) {
            let overrides = FrameOverrides { scid: Some(scid), vcid: Some(vcid), frame_hex: None };
            let frame = Frame::build(ft, &overrides).unwrap();
            let bytes = frame.to_bytes().unwrap();
            let layout = ft.layout();

            let scid_at = layout.field_offset(SC_ID).unwrap();
            let vcid_at = layout.field_offset(VC_ID).unwrap();
            prop_assert_eq!(extract_bits(&bytes, scid_at, ft.scid_width()), Some(u64::from(scid)));
            prop_assert_eq!(extract_bits(&bytes, vcid_at, ft.vcid_width()), Some(u64::from(vcid)));

            // Header width unchanged
            let header_hex_len = layout.header_bits() as usize / 4;
            prop_assert_eq!(frame.to_hex().len(), header_hex_len + frame.body_hex().len());
        }

        #[test]
        fn prop_decoded_length_matches_layout((ft, scid, vcid) in type_and_ids()) {
            let overrides = FrameOverrides { scid: Some(scid), vcid: Some(vcid), frame_hex: None };
            let frame = Frame::build(ft, &overrides).unwrap();
            let expected = frame.header_bit_len() as usize / 8 + frame.body_hex().len() / 2;
            prop_assert_eq!(frame.to_bytes().unwrap().len(), expected);
        }
    }
}
