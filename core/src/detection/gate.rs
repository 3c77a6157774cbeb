use serde::Serialize;
use std::time::{Duration, Instant};

/// Cooldown bookkeeping owned by the scan gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownState {
    pub blocked: bool,
    pub unblock_at: Option<Instant>,
}

/// Observable gate state at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GatePhase {
    Idle,
    Blocked { remaining_ms: u64 },
}

/// Suppresses every acceptance for a fixed window after a confirmed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanGate {
    state: CooldownState,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the cooldown. Returns `false` and leaves the window untouched
    /// when the gate is already blocked.
    pub fn on_accepted(&mut self, now: Instant, duration: Duration) -> bool {
        if self.is_blocked(now) {
            return false;
        }
        self.state = CooldownState {
            blocked: true,
            unblock_at: Some(now + duration),
        };
        true
    }

    /// Blocked from the accept instant up to and including `unblock_at`.
    pub fn is_blocked(&self, now: Instant) -> bool {
        match self.state.unblock_at {
            Some(unblock_at) if self.state.blocked => now <= unblock_at,
            _ => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if !self.is_blocked(now) {
            return None;
        }
        self.state
            .unblock_at
            .map(|unblock_at| unblock_at.saturating_duration_since(now))
    }

    pub fn phase(&self, now: Instant) -> GatePhase {
        match self.remaining(now) {
            Some(remaining) => GatePhase::Blocked {
                remaining_ms: remaining.as_millis() as u64,
            },
            None => GatePhase::Idle,
        }
    }

    /// Drops an expired window so the stored state reads idle again.
    pub fn release_expired(&mut self, now: Instant) {
        if self.state.blocked && !self.is_blocked(now) {
            self.state = CooldownState::default();
        }
    }

    pub fn state(&self) -> CooldownState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = CooldownState::default();
    }
}
