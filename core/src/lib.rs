//! Barcode detection core and register domain for the point-of-sale terminal.
//!
//! Raw decode events from a camera flow through a confirmation filter and a
//! cooldown gate before a canonical barcode is handed to the register.

pub mod capture;
pub mod detection;
pub mod feedback;
pub mod math;
pub mod pos;
pub mod prelude;
pub mod session;
pub mod symbology;
pub mod telemetry;

pub use prelude::{PosError, PosResult, ScannerConfig};
pub use session::ScanSession;
