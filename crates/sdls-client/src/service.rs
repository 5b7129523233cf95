//! Security service interface

use crate::{ProcessedFrame, Result};
use sdls_frame::FrameType;

/// Apply and process SDLS security, one operation pair per frame type.
///
/// Calls are blocking; implementations may hold session state (sequence
/// numbers, key handles), hence `&mut self`.
pub trait SecurityService {
    fn apply_security_tc(&mut self, frame: &[u8]) -> Result<Vec<u8>>;
    fn apply_security_tm(&mut self, frame: &[u8]) -> Result<Vec<u8>>;
    fn apply_security_aos(&mut self, frame: &[u8]) -> Result<Vec<u8>>;

    fn process_security_tc(&mut self, frame: &[u8]) -> Result<ProcessedFrame>;
    fn process_security_tm(&mut self, frame: &[u8]) -> Result<ProcessedFrame>;
    fn process_security_aos(&mut self, frame: &[u8]) -> Result<ProcessedFrame>;

    /// Dispatch apply-security on the frame type
    fn apply_security(&mut self, frame_type: FrameType, frame: &[u8]) -> Result<Vec<u8>> {
        match frame_type {
            FrameType::Tc => self.apply_security_tc(frame),
            FrameType::Tm => self.apply_security_tm(frame),
            FrameType::Aos => self.apply_security_aos(frame),
        }
    }

    /// Dispatch process-security on the frame type
    fn process_security(&mut self, frame_type: FrameType, frame: &[u8]) -> Result<ProcessedFrame> {
        match frame_type {
            FrameType::Tc => self.process_security_tc(frame),
            FrameType::Tm => self.process_security_tm(frame),
            FrameType::Aos => self.process_security_aos(frame),
        }
    }
}
