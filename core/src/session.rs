//! One scanning session: filter, gate and feedback wired behind a decode
//! channel. Build a fresh session whenever scanning starts and drop it when
//! scanning stops; nothing survives between sessions.

use crate::capture::{decode_channel, DecodeReceiver, DecodeSender, RawDetection};
use crate::detection::{DetectionFilter, GatePhase, ScanGate, Verdict};
use crate::feedback::{FeedbackEmitter, FeedbackSink};
use crate::prelude::{PosResult, ScannerConfig};
use crate::symbology::CanonicalBarcode;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::TryRecvError;

pub struct ScanSession {
    filter: DetectionFilter,
    gate: ScanGate,
    feedback: FeedbackEmitter,
    cooldown: Duration,
    receiver: DecodeReceiver,
    metrics: MetricsRecorder,
    logger: LogManager,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub gate: GatePhase,
    pub flashing: bool,
    pub buffered_reads: usize,
    pub last_accepted: Option<CanonicalBarcode>,
    pub metrics: MetricsSnapshot,
}

impl ScanSession {
    /// Validates the config and returns the session with the sender the
    /// decode capability should push into.
    pub fn open(
        config: &ScannerConfig,
        sink: Box<dyn FeedbackSink>,
    ) -> PosResult<(Self, DecodeSender)> {
        config.validate()?;
        let (sender, receiver) = decode_channel(config.queue_capacity);
        let session = Self {
            filter: DetectionFilter::new(config),
            gate: ScanGate::new(),
            feedback: FeedbackEmitter::new(config, sink),
            cooldown: config.cooldown(),
            receiver,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
        };
        Ok((session, sender))
    }

    pub fn observe(&mut self, candidate: &RawDetection, now: Instant) -> Verdict {
        self.gate.release_expired(now);
        let verdict = self.filter.observe(candidate, &self.gate, now);
        self.metrics.record(&verdict);

        if let Verdict::Accepted(code) = &verdict {
            self.gate.on_accepted(now, self.cooldown);
            self.feedback.on_accepted(code, now);
            self.logger.record(&format!(
                "scan confirmed {} (cooldown {} ms)",
                code,
                self.cooldown.as_millis()
            ));
        }
        verdict
    }

    /// Processes the next queued read, if any.
    pub fn poll(&mut self, now: Instant) -> Option<Verdict> {
        match self.receiver.try_recv() {
            Ok(candidate) => Some(self.observe(&candidate, now)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Processes every queued read and returns the accepted codes in order.
    pub fn drain(&mut self, now: Instant) -> Vec<CanonicalBarcode> {
        let mut accepted = Vec::new();
        while let Some(verdict) = self.poll(now) {
            if let Verdict::Accepted(code) = verdict {
                accepted.push(code);
            }
        }
        accepted
    }

    pub fn is_blocked(&self, now: Instant) -> bool {
        self.gate.is_blocked(now)
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.feedback.is_flashing(now)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn status(&self, now: Instant) -> SessionStatus {
        SessionStatus {
            gate: self.gate.phase(now),
            flashing: self.feedback.is_flashing(now),
            buffered_reads: self.filter.buffer().len(),
            last_accepted: self.filter.last_accepted().map(|(code, _)| code.clone()),
            metrics: self.metrics.snapshot(),
        }
    }
}
