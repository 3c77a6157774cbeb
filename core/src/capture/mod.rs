//! Types exchanged with the external decode capability.

pub mod detection;
pub mod source;

pub use detection::RawDetection;
pub use source::{decode_channel, CaptureError, DecodeCapability, DecodeReceiver, DecodeSender};
