use crate::feedback::tone::Tone;
use crate::prelude::ScannerConfig;
use crate::symbology::CanonicalBarcode;
use crate::telemetry::log::LogManager;
use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
}

/// Output device for the confirmation beep.
pub trait FeedbackSink: Send {
    fn play(&mut self, tone: &Tone) -> Result<(), FeedbackError>;
}

/// Sink for hosts without audio; discards every tone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl FeedbackSink for SilentSink {
    fn play(&mut self, _tone: &Tone) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Transient highlight that reverts on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualPulse {
    until: Option<Instant>,
}

impl VisualPulse {
    pub fn trigger(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.map_or(false, |until| now < until)
    }

    pub fn reset(&mut self) {
        self.until = None;
    }
}

/// Best-effort beep and flash on every confirmed scan.
pub struct FeedbackEmitter {
    sink: Box<dyn FeedbackSink>,
    tone: Tone,
    pulse: VisualPulse,
    pulse_duration: Duration,
    logger: LogManager,
}

impl FeedbackEmitter {
    pub fn new(config: &ScannerConfig, sink: Box<dyn FeedbackSink>) -> Self {
        Self {
            sink,
            tone: Tone::render(&config.tone),
            pulse: VisualPulse::default(),
            pulse_duration: config.pulse(),
            logger: LogManager::new(),
        }
    }

    /// Never fails: audio problems are logged and dropped.
    pub fn on_accepted(&mut self, code: &CanonicalBarcode, now: Instant) {
        self.pulse.trigger(now, self.pulse_duration);
        if let Err(err) = self.sink.play(&self.tone) {
            self.logger
                .trace(&format!("feedback for {} skipped: {}", code, err));
        }
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.pulse.is_active(now)
    }

    pub fn tone(&self) -> &Tone {
        &self.tone
    }

    pub fn reset(&mut self) {
        self.pulse.reset();
    }
}

impl std::fmt::Debug for FeedbackEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackEmitter")
            .field("pulse", &self.pulse)
            .field("pulse_duration", &self.pulse_duration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        played: Arc<Mutex<usize>>,
    }

    impl FeedbackSink for RecordingSink {
        fn play(&mut self, _tone: &Tone) -> Result<(), FeedbackError> {
            *self.played.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct BrokenSink;

    impl FeedbackSink for BrokenSink {
        fn play(&mut self, _tone: &Tone) -> Result<(), FeedbackError> {
            Err(FeedbackError::AudioUnavailable("no output device".into()))
        }
    }

    fn code() -> CanonicalBarcode {
        CanonicalBarcode::from_decoded("036000291452")
    }

    #[test]
    fn plays_tone_and_flashes_on_accept() {
        let played = Arc::new(Mutex::new(0));
        let sink = RecordingSink {
            played: played.clone(),
        };
        let mut emitter = FeedbackEmitter::new(&ScannerConfig::default(), Box::new(sink));
        let t0 = Instant::now();

        emitter.on_accepted(&code(), t0);
        assert_eq!(*played.lock().unwrap(), 1);
        assert!(emitter.is_flashing(t0 + Duration::from_millis(299)));
        assert!(!emitter.is_flashing(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn audio_failure_is_swallowed() {
        let mut emitter = FeedbackEmitter::new(&ScannerConfig::default(), Box::new(BrokenSink));
        let t0 = Instant::now();
        emitter.on_accepted(&code(), t0);
        assert!(emitter.is_flashing(t0));
    }

    #[test]
    fn reset_clears_pulse() {
        let mut emitter = FeedbackEmitter::new(&ScannerConfig::default(), Box::new(SilentSink));
        let t0 = Instant::now();
        emitter.on_accepted(&code(), t0);
        emitter.reset();
        assert!(!emitter.is_flashing(t0));
    }
}
