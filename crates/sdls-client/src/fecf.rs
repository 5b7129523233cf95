//! Frame Error Control Field

/// Length of the FECF in bytes
pub const FECF_LEN: usize = 2;

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection, no xorout)
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Split off and return the trailing FECF, if the frame is long enough
pub fn split_fecf(frame: &[u8]) -> Option<(&[u8], u16)> {
    if frame.len() < FECF_LEN {
        return None;
    }
    let (body, tail) = frame.split_at(frame.len() - FECF_LEN);
    Some((body, u16::from_be_bytes([tail[0], tail[1]])))
}
