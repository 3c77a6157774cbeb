use crate::capture::detection::RawDetection;
use tokio::sync::mpsc;

/// Receiving half owned by a scan session.
pub type DecodeReceiver = mpsc::Receiver<RawDetection>;

/// Handle the decode capability pushes candidate reads into.
#[derive(Debug, Clone)]
pub struct DecodeSender {
    tx: mpsc::Sender<RawDetection>,
}

impl DecodeSender {
    /// Never waits. Returns `false` when the frame was dropped, either
    /// because the queue is full or the owning session has been discarded.
    pub fn send(&self, detection: RawDetection) -> bool {
        self.tx.try_send(detection).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Bounded queue between the decoder and its session. `capacity` must be
/// non-zero.
pub fn decode_channel(capacity: usize) -> (DecodeSender, DecodeReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (DecodeSender { tx }, rx)
}

/// Failure to bring the camera decoder up. Always retryable by the operator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("camera unavailable: {0}")]
    Unavailable(String),
}

impl CaptureError {
    pub fn operator_message(&self) -> &'static str {
        "Camera unavailable. Please check permissions and try again."
    }

    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// External decoder that reports one candidate per decode attempt.
pub trait DecodeCapability {
    fn start(&mut self, sender: DecodeSender) -> Result<(), CaptureError>;
    fn stop(&mut self);
}
