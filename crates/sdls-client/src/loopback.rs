//! Clear-mode loopback security service
//!
//! Wraps frames in an SDLS security header and trailer without encrypting
//! or authenticating anything. The MAC is a zero-filled placeholder of the
//! configured length; the FECF is a real CRC-16 so corrupted frames are
//! still caught on process.
//!
//! TC frames arrive with their FECF attached (the TC frame length field
//! covers it), so apply drops the old FECF and recomputes it over the
//! protected frame. TM and AOS frames are taken as header plus data.

use crate::fecf::{crc16_ccitt, split_fecf, FECF_LEN};
use crate::{
    ProcessedFrame, Result, SaConfig, SecurityHeader, SecurityService, SecurityTrailer,
    ServiceError,
};
use sdls_frame::{extract_bits, FrameType};
use tracing::{debug, info};

const TC_PRIMARY_HEADER_LEN: usize = 5;
const TM_PRIMARY_HEADER_LEN: usize = 6;
const AOS_PRIMARY_HEADER_LEN: usize = 6;

/// Largest TC frame the 10-bit length field can describe
const TC_MAX_FRAME_LEN: usize = 1024;

const SPI_LEN: usize = 2;

const TC_LENGTH_FIELD: &str = "frame_length";

pub fn primary_header_len(frame_type: FrameType) -> usize {
    match frame_type {
        FrameType::Tc => TC_PRIMARY_HEADER_LEN,
        FrameType::Tm => TM_PRIMARY_HEADER_LEN,
        FrameType::Aos => AOS_PRIMARY_HEADER_LEN,
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoopbackService {
    sa: SaConfig,
}

impl LoopbackService {
    pub fn new(sa: SaConfig) -> Self {
        Self { sa }
    }

    /// Initialize from configuration lines
    pub fn from_properties<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let sa = SaConfig::from_properties(lines)?;
        info!(
            spi = sa.spi,
            iv_len = sa.iv.len(),
            sn_len = sa.sn.len(),
            mac_len = sa.mac_length,
            has_fecf = sa.has_fecf,
            "Loopback security association ready"
        );
        Ok(Self::new(sa))
    }

    pub fn sa(&self) -> &SaConfig {
        &self.sa
    }

    fn apply(&self, frame_type: FrameType, frame: &[u8]) -> Result<Vec<u8>> {
        let header_len = primary_header_len(frame_type);
        let carries_fecf = frame_type == FrameType::Tc && self.sa.has_fecf;
        let needed = header_len + if carries_fecf { FECF_LEN } else { 0 };
        if frame.len() < needed {
            return Err(ServiceError::FrameTooShort {
                frame_type,
                needed,
                actual: frame.len(),
            });
        }
        if frame_type == FrameType::Tc {
            check_tc_length(frame)?;
        }

        let (primary, rest) = frame.split_at(header_len);
        let pdu = if carries_fecf {
            &rest[..rest.len() - FECF_LEN]
        } else {
            rest
        };

        let mut out =
            Vec::with_capacity(frame.len() + self.sa.header_len() + self.sa.trailer_len());
        out.extend_from_slice(primary);
        out.extend_from_slice(&self.sa.spi.to_be_bytes());
        out.extend_from_slice(&self.sa.iv);
        out.extend_from_slice(&self.sa.sn);
        out.extend_from_slice(pdu);
        out.resize(out.len() + self.sa.mac_length, 0);

        if frame_type == FrameType::Tc {
            let total = out.len() + if self.sa.has_fecf { FECF_LEN } else { 0 };
            if total > TC_MAX_FRAME_LEN {
                return Err(ServiceError::FrameTooLong(total));
            }
            set_tc_length(&mut out, total);
        }
        if self.sa.has_fecf {
            let fecf = crc16_ccitt(&out);
            out.extend_from_slice(&fecf.to_be_bytes());
        }

        info!(
            %frame_type,
            spi = self.sa.spi,
            in_len = frame.len(),
            out_len = out.len(),
            "Applied security"
        );
        Ok(out)
    }

    fn process(&self, frame_type: FrameType, frame: &[u8]) -> Result<ProcessedFrame> {
        let header_len = primary_header_len(frame_type);
        let needed = header_len + self.sa.header_len() + self.sa.trailer_len();
        if frame.len() < needed {
            return Err(ServiceError::FrameTooShort {
                frame_type,
                needed,
                actual: frame.len(),
            });
        }

        let (body, fecf) = if self.sa.has_fecf {
            let (body, received) = split_fecf(frame).ok_or(ServiceError::FrameTooShort {
                frame_type,
                needed,
                actual: frame.len(),
            })?;
            let computed = crc16_ccitt(body);
            if received != computed {
                return Err(ServiceError::FecfMismatch { received, computed });
            }
            (body, received)
        } else {
            (frame, 0)
        };
        if frame_type == FrameType::Tc {
            check_tc_length(frame)?;
        }

        let spi = u16::from_be_bytes([body[header_len], body[header_len + 1]]);
        if spi != self.sa.spi {
            return Err(ServiceError::UnknownSpi(spi));
        }

        let iv_start = header_len + SPI_LEN;
        let sn_start = iv_start + self.sa.iv.len();
        let pdu_start = sn_start + self.sa.sn.len();
        let mac_start = body.len() - self.sa.mac_length;

        debug!(%frame_type, spi, pdu_len = mac_start - pdu_start, "Security header parsed");

        let processed = ProcessedFrame {
            frame_type,
            primary_header: body[..header_len].to_vec(),
            security_header: SecurityHeader {
                spi,
                iv: body[iv_start..sn_start].to_vec(),
                sn: body[sn_start..pdu_start].to_vec(),
            },
            pdu: body[pdu_start..mac_start].to_vec(),
            security_trailer: SecurityTrailer {
                mac: body[mac_start..].to_vec(),
                fecf,
            },
        };

        info!(%frame_type, spi, in_len = frame.len(), "Processed security");
        Ok(processed)
    }
}

/// The TC frame length field holds total length minus one
fn check_tc_length(frame: &[u8]) -> Result<()> {
    let layout = FrameType::Tc.layout();
    let (Some(offset), Some(spec)) = (
        layout.field_offset(TC_LENGTH_FIELD),
        layout.field(TC_LENGTH_FIELD),
    ) else {
        return Ok(());
    };
    let declared = extract_bits(frame, offset, spec.width)
        .map(|v| v as usize + 1)
        .unwrap_or(0);
    if declared != frame.len() {
        return Err(ServiceError::LengthMismatch {
            declared,
            actual: frame.len(),
        });
    }
    Ok(())
}

fn set_tc_length(frame: &mut [u8], total_len: usize) {
    let value = (total_len - 1) as u16;
    frame[2] = (frame[2] & 0xFC) | ((value >> 8) as u8 & 0x03);
    frame[3] = value as u8;
}

impl SecurityService for LoopbackService {
    fn apply_security_tc(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        self.apply(FrameType::Tc, frame)
    }

    fn apply_security_tm(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        self.apply(FrameType::Tm, frame)
    }

    fn apply_security_aos(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        self.apply(FrameType::Aos, frame)
    }

    fn process_security_tc(&mut self, frame: &[u8]) -> Result<ProcessedFrame> {
        self.process(FrameType::Tc, frame)
    }

    fn process_security_tm(&mut self, frame: &[u8]) -> Result<ProcessedFrame> {
        self.process(FrameType::Tm, frame)
    }

    fn process_security_aos(&mut self, frame: &[u8]) -> Result<ProcessedFrame> {
        self.process(FrameType::Aos, frame)
    }
}
