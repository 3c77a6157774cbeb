pub mod emitter;
pub mod tone;

pub use emitter::{FeedbackEmitter, FeedbackError, FeedbackSink, SilentSink, VisualPulse};
pub use tone::Tone;
