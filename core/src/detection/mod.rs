pub mod confirmation;
pub mod filter;
pub mod gate;

pub use confirmation::ConfirmationBuffer;
pub use filter::{DetectionFilter, RejectReason, Verdict};
pub use gate::{CooldownState, GatePhase, ScanGate};
