use log::info;
use poscore::capture::{CaptureError, DecodeCapability, DecodeSender, RawDetection};
use std::collections::VecDeque;

/// Decode capability backed by a pre-generated frame stream. Frames are
/// released one per `advance`, the way a camera delivers one decode per
/// video frame.
pub struct SyntheticCamera {
    frames: VecDeque<RawDetection>,
    permission_granted: bool,
    sender: Option<DecodeSender>,
    delivered: usize,
    dropped: usize,
}

impl SyntheticCamera {
    pub fn new(frames: Vec<RawDetection>) -> Self {
        Self {
            frames: frames.into(),
            permission_granted: true,
            sender: None,
            delivered: 0,
            dropped: 0,
        }
    }

    /// Simulates an operator declining camera access.
    pub fn denied() -> Self {
        Self {
            permission_granted: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.sender.is_some()
    }

    /// Pushes the next frame. Returns `false` once the feed is exhausted,
    /// stopped or its session has gone away. A frame refused by a full
    /// queue is counted as dropped.
    pub fn advance(&mut self) -> bool {
        let Some(sender) = self.sender.as_ref() else {
            return false;
        };
        if sender.is_closed() {
            return false;
        }
        let Some(frame) = self.frames.pop_front() else {
            return false;
        };
        if sender.send(frame) {
            self.delivered += 1;
        } else {
            self.dropped += 1;
        }
        true
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl DecodeCapability for SyntheticCamera {
    fn start(&mut self, sender: DecodeSender) -> Result<(), CaptureError> {
        if !self.permission_granted {
            return Err(CaptureError::PermissionDenied);
        }
        self.sender = Some(sender);
        Ok(())
    }

    fn stop(&mut self) {
        if self.sender.take().is_some() {
            info!(
                "synthetic camera stopped: {} frames delivered, {} dropped",
                self.delivered, self.dropped
            );
        }
    }
}
