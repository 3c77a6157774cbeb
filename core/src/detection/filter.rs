use crate::capture::RawDetection;
use crate::detection::confirmation::ConfirmationBuffer;
use crate::detection::gate::ScanGate;
use crate::prelude::ScannerConfig;
use crate::symbology::CanonicalBarcode;
use serde::Serialize;
use std::time::Instant;

/// Why a candidate read was not accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Blocked,
    EmptyCode,
    ErrorRate { average: f32 },
    Unconfirmed { count: usize },
}

/// Outcome of feeding one candidate read through the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(CanonicalBarcode),
    Rejected(RejectReason),
}

impl Verdict {
    pub fn accepted(&self) -> Option<&CanonicalBarcode> {
        match self {
            Verdict::Accepted(code) => Some(code),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Debounce-by-consensus over noisy camera reads.
#[derive(Debug, Clone)]
pub struct DetectionFilter {
    buffer: ConfirmationBuffer,
    confirmations: usize,
    max_error_rate: f32,
    last_accepted: Option<(CanonicalBarcode, Instant)>,
}

impl DetectionFilter {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            buffer: ConfirmationBuffer::with_capacity(config.buffer_capacity),
            confirmations: config.confirmations.max(1),
            max_error_rate: config.max_error_rate,
            last_accepted: None,
        }
    }

    pub fn observe(&mut self, candidate: &RawDetection, gate: &ScanGate, now: Instant) -> Verdict {
        if gate.is_blocked(now) {
            return Verdict::Rejected(RejectReason::Blocked);
        }

        if let Some(average) = candidate.average_error() {
            if average > self.max_error_rate {
                return Verdict::Rejected(RejectReason::ErrorRate { average });
            }
        }

        let code = CanonicalBarcode::from_decoded(&candidate.code);
        if code.as_str().is_empty() {
            return Verdict::Rejected(RejectReason::EmptyCode);
        }

        self.buffer.push(code.clone());
        let count = self.buffer.count(&code);
        if count < self.confirmations {
            return Verdict::Rejected(RejectReason::Unconfirmed { count });
        }

        // The next scan has to earn its confirmations from scratch.
        self.buffer.clear();
        self.last_accepted = Some((code.clone(), now));
        Verdict::Accepted(code)
    }

    pub fn last_accepted(&self) -> Option<&(CanonicalBarcode, Instant)> {
        self.last_accepted.as_ref()
    }

    pub fn buffer(&self) -> &ConfirmationBuffer {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_accepted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn filter() -> DetectionFilter {
        DetectionFilter::new(&ScannerConfig::default())
    }

    #[test]
    fn accepts_on_exactly_the_third_identical_read() {
        let mut filter = filter();
        let gate = ScanGate::new();
        let now = Instant::now();
        let read = RawDetection::new("036000291452");

        assert_eq!(
            filter.observe(&read, &gate, now),
            Verdict::Rejected(RejectReason::Unconfirmed { count: 1 })
        );
        assert_eq!(
            filter.observe(&read, &gate, now),
            Verdict::Rejected(RejectReason::Unconfirmed { count: 2 })
        );
        let verdict = filter.observe(&read, &gate, now);
        assert_eq!(verdict.accepted().unwrap().as_str(), "036000291452");
        assert!(filter.buffer().is_empty());
    }

    #[test]
    fn interleaved_noise_still_confirms_on_third_match() {
        let mut filter = filter();
        let gate = ScanGate::new();
        let now = Instant::now();
        let stream = ["012345", "012345", "099999", "012345", "012345"];

        let verdicts: Vec<Verdict> = stream
            .iter()
            .map(|code| filter.observe(&RawDetection::new(*code), &gate, now))
            .collect();

        assert!(verdicts[..4].iter().all(|v| !v.is_accepted()));
        assert_eq!(verdicts[4].accepted().unwrap().as_str(), "001234000057");
    }

    #[test]
    fn high_error_rate_rejects_regardless_of_count() {
        let mut filter = filter();
        let gate = ScanGate::new();
        let now = Instant::now();
        for _ in 0..2 {
            filter.observe(&RawDetection::new("036000291452"), &gate, now);
        }
        let noisy = RawDetection::with_errors("036000291452", vec![0.05, 0.2, 0.15]);
        assert!(matches!(
            filter.observe(&noisy, &gate, now),
            Verdict::Rejected(RejectReason::ErrorRate { .. })
        ));
        assert_eq!(filter.buffer().len(), 2);
    }

    #[test]
    fn error_rate_at_threshold_is_tolerated() {
        let mut filter = filter();
        let gate = ScanGate::new();
        let read = RawDetection::with_errors("036000291452", vec![0.1, 0.1]);
        assert_eq!(
            filter.observe(&read, &gate, Instant::now()),
            Verdict::Rejected(RejectReason::Unconfirmed { count: 1 })
        );
    }

    #[test]
    fn blocked_gate_rejects_before_buffering() {
        let mut filter = filter();
        let mut gate = ScanGate::new();
        let t0 = Instant::now();
        gate.on_accepted(t0, Duration::from_millis(3000));

        for _ in 0..5 {
            assert_eq!(
                filter.observe(&RawDetection::new("036000291452"), &gate, t0),
                Verdict::Rejected(RejectReason::Blocked)
            );
        }
        assert!(filter.buffer().is_empty());
    }

    #[test]
    fn empty_code_is_rejected() {
        let mut filter = filter();
        let verdict = filter.observe(&RawDetection::new("  "), &ScanGate::new(), Instant::now());
        assert_eq!(verdict, Verdict::Rejected(RejectReason::EmptyCode));
    }

    #[test]
    fn upc_e_variants_confirm_each_other() {
        let mut filter = filter();
        let gate = ScanGate::new();
        let now = Instant::now();
        filter.observe(&RawDetection::new("123456"), &gate, now);
        filter.observe(&RawDetection::new("0123456"), &gate, now);
        let verdict = filter.observe(&RawDetection::new("01234565"), &gate, now);
        assert_eq!(verdict.accepted().unwrap().as_str(), "012345000065");
        assert_eq!(filter.last_accepted().unwrap().1, now);
    }

    #[test]
    fn evicted_reads_no_longer_count() {
        let config = ScannerConfig {
            buffer_capacity: 3,
            ..Default::default()
        };
        let mut filter = DetectionFilter::new(&config);
        let gate = ScanGate::new();
        let now = Instant::now();
        for code in ["036000291452", "036000291452", "999999999999", "888888888888"] {
            filter.observe(&RawDetection::new(code), &gate, now);
        }
        assert_eq!(
            filter.observe(&RawDetection::new("036000291452"), &gate, now),
            Verdict::Rejected(RejectReason::Unconfirmed { count: 1 })
        );
    }
}
