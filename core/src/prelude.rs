use crate::pos::Money;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for one scanning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Slots in the rolling confirmation window.
    pub buffer_capacity: usize,
    /// Identical reads required before a code is trusted.
    pub confirmations: usize,
    /// Highest tolerated mean per-character decode error.
    pub max_error_rate: f32,
    /// Decode attempts held between polls; extra frames are dropped.
    pub queue_capacity: usize,
    pub cooldown_ms: u64,
    pub pulse_ms: u64,
    pub tone: ToneConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 15,
            confirmations: 3,
            max_error_rate: 0.1,
            queue_capacity: 8,
            cooldown_ms: 3000,
            pulse_ms: 300,
            tone: ToneConfig::default(),
        }
    }
}

impl ScannerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn validate(&self) -> PosResult<()> {
        if self.confirmations == 0 {
            return Err(PosError::InvalidConfig(
                "confirmations must be at least 1".into(),
            ));
        }
        if self.buffer_capacity < self.confirmations {
            return Err(PosError::InvalidConfig(format!(
                "buffer capacity {} cannot hold {} confirmations",
                self.buffer_capacity, self.confirmations
            )));
        }
        if self.queue_capacity == 0 {
            return Err(PosError::InvalidConfig(
                "queue capacity must be at least 1".into(),
            ));
        }
        if !self.max_error_rate.is_finite() || self.max_error_rate < 0.0 {
            return Err(PosError::InvalidConfig(format!(
                "max error rate {} must be a non-negative number",
                self.max_error_rate
            )));
        }
        self.tone.validate()
    }
}

/// Shape of the confirmation beep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub start_gain: f32,
    pub end_gain: f32,
    pub sample_rate: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            duration_ms: 150,
            start_gain: 0.3,
            end_gain: 0.01,
            sample_rate: 44_100,
        }
    }
}

impl ToneConfig {
    pub fn validate(&self) -> PosResult<()> {
        if self.sample_rate == 0 {
            return Err(PosError::InvalidConfig("tone sample rate is zero".into()));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !(self.frequency_hz > 0.0 && self.frequency_hz < nyquist) {
            return Err(PosError::InvalidConfig(format!(
                "tone frequency {} Hz outside (0, {}) Hz",
                self.frequency_hz, nyquist
            )));
        }
        // Exponential ramps cannot start or end at zero.
        if !(self.start_gain > 0.0 && self.end_gain > 0.0) {
            return Err(PosError::InvalidConfig(
                "tone gains must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Common error type for the register and scanner core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PosError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("Scan items before checking out")]
    EmptyCart,
    #[error("tendered {tendered} is less than total {total}")]
    InsufficientTender { tendered: Money, total: Money },
}

pub type PosResult<T> = Result<T, PosError>;
