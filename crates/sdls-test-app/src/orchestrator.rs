//! Apply / process orchestration

use sdls_client::{ProcessedFrame, Result, SecurityService};
use sdls_frame::FrameType;
use tracing::info;

/// Which security steps run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub apply: bool,
    pub process: bool,
}

impl RunPlan {
    /// Both flags set behaves like neither flag set: run both steps.
    pub fn from_flags(apply_only: bool, process_only: bool) -> Self {
        let both = apply_only && process_only;
        Self {
            apply: !process_only || both,
            process: !apply_only || both,
        }
    }
}

/// What each step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub input: Vec<u8>,
    pub applied: Option<Vec<u8>>,
    pub processed: Option<ProcessedFrame>,
}

/// Drives one frame through the security service
pub struct Orchestrator<'a, S: SecurityService + ?Sized> {
    service: &'a mut S,
    frame_type: FrameType,
    plan: RunPlan,
}

impl<'a, S: SecurityService + ?Sized> Orchestrator<'a, S> {
    pub fn new(service: &'a mut S, frame_type: FrameType, plan: RunPlan) -> Self {
        Self {
            service,
            frame_type,
            plan,
        }
    }

    /// Apply then process, as the plan allows. The first failure aborts the run.
    pub fn run(&mut self, frame: Vec<u8>) -> Result<RunOutcome> {
        info!(
            frame_type = %self.frame_type,
            len = frame.len(),
            apply = self.plan.apply,
            process = self.plan.process,
            "Starting SDLS run"
        );

        let applied = if self.plan.apply {
            let out = self.service.apply_security(self.frame_type, &frame)?;
            info!(frame_type = %self.frame_type, len = out.len(), "Apply security complete");
            Some(out)
        } else {
            None
        };

        let processed = if self.plan.process {
            let input = applied.as_deref().unwrap_or(&frame);
            let result = self.service.process_security(self.frame_type, input)?;
            info!(
                frame_type = %self.frame_type,
                spi = result.security_header.spi,
                pdu_len = result.pdu.len(),
                "Process security complete"
            );
            Some(result)
        } else {
            None
        };

        Ok(RunOutcome {
            input: frame,
            applied,
            processed,
        })
    }
}
