//! Per-type header field tables and default frames

/// Name of the spacecraft id field in every layout
pub const SC_ID: &str = "sc_id";

/// Name of the virtual channel id field in every layout
pub const VC_ID: &str = "vc_id";

/// One fixed-width header field, most significant bit first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: u32,
    pub default: u64,
}

impl FieldSpec {
    const fn new(name: &'static str, width: u32, default: u64) -> Self {
        Self {
            name,
            width,
            default,
        }
    }

    /// Largest value the field can hold
    pub fn max_value(&self) -> u64 {
        (1u64 << self.width) - 1
    }
}

/// Header layout plus the reference default frame for one frame type
#[derive(Debug)]
pub struct FrameLayout {
    pub fields: &'static [FieldSpec],
    /// Literal default header, emitted verbatim while nothing is overridden
    pub default_header_hex: &'static str,
    pub default_body_hex: &'static str,
}

impl FrameLayout {
    /// Total header width in bits
    pub fn header_bits(&self) -> u32 {
        self.fields.iter().map(|f| f.width).sum()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Bit offset of a field from the start of the header
    pub fn field_offset(&self, name: &str) -> Option<u32> {
        let idx = self.field_index(name)?;
        Some(self.fields[..idx].iter().map(|f| f.width).sum())
    }

    /// Default frame: literal header followed by the default body
    pub fn default_hex(&self) -> String {
        format!("{}{}", self.default_header_hex, self.default_body_hex)
    }

    /// Pack field values (one per field, in layout order) into header hex,
    /// zero-padded to the full header width.
    pub fn pack_hex(&self, values: &[u64]) -> String {
        let bits = self.header_bits();
        let packed = self
            .fields
            .iter()
            .zip(values)
            .fold(0u64, |acc, (spec, value)| {
                (acc << spec.width) | (value & spec.max_value())
            });
        format!("{:0width$x}", packed, width = (bits as usize).div_ceil(4))
    }
}

/// Read `width` bits starting at bit `offset` (msb0) from a byte buffer.
///
/// Returns `None` if the buffer is too short.
pub fn extract_bits(bytes: &[u8], offset: u32, width: u32) -> Option<u64> {
    let end = offset + width;
    if width > 64 || (end as usize).div_ceil(8) > bytes.len() {
        return None;
    }
    let mut value = 0u64;
    for bit in offset..end {
        let byte = bytes[(bit / 8) as usize];
        let set = (byte >> (7 - bit % 8)) & 1;
        value = (value << 1) | u64::from(set);
    }
    Some(value)
}

/// Body shared by the TM and AOS default frames (94 bytes)
const TM_AOS_DEFAULT_BODY: &str = concat!(
    "0000000000000000000000000000",
    "1111111111111111111111111111111111111111111111111111111111111111",
    "1111111111111111111111111111111111111111111111111111111111111111",
    "00000000000000000000000000000000",
);

pub(crate) static TC_LAYOUT: FrameLayout = FrameLayout {
    fields: &[
        FieldSpec::new("version", 2, 0b00),
        FieldSpec::new("bypass_flag", 1, 0b1),
        FieldSpec::new("ctrl_cmd_flag", 1, 0b0),
        FieldSpec::new("spare", 2, 0b00),
        FieldSpec::new(SC_ID, 10, 44),
        FieldSpec::new(VC_ID, 6, 1),
        FieldSpec::new("frame_length", 10, 8),
        FieldSpec::new("frame_sequence_number", 8, 0),
    ],
    default_header_hex: "202c040800",
    default_body_hex: "0001bd37",
};

pub(crate) static TM_LAYOUT: FrameLayout = FrameLayout {
    fields: &[
        FieldSpec::new("version", 2, 0b00),
        FieldSpec::new(SC_ID, 10, 44),
        FieldSpec::new(VC_ID, 3, 0),
        FieldSpec::new("ocf_flag", 1, 0),
        FieldSpec::new("mcfc", 8, 0),
        FieldSpec::new("vcfc", 8, 0),
        FieldSpec::new("shf", 1, 0),
        FieldSpec::new("synch", 1, 0),
        FieldSpec::new("pof", 1, 0),
        FieldSpec::new("sl_id", 2, 0b00),
        FieldSpec::new("fhp", 11, 0),
    ],
    default_header_hex: "4ff000000000",
    default_body_hex: TM_AOS_DEFAULT_BODY,
};

pub(crate) static AOS_LAYOUT: FrameLayout = FrameLayout {
    fields: &[
        FieldSpec::new("version", 2, 0b00),
        FieldSpec::new(SC_ID, 8, 44),
        FieldSpec::new(VC_ID, 6, 0),
        FieldSpec::new("vcfc", 24, 0),
        FieldSpec::new("replay_flag", 1, 0),
        FieldSpec::new("vcfc_flag", 1, 1),
        FieldSpec::new("reserved_spare", 2, 0b00),
        FieldSpec::new("vcfc_cycle", 4, 0b0000),
    ],
    default_header_hex: "7fc000000000",
    default_body_hex: TM_AOS_DEFAULT_BODY,
};
