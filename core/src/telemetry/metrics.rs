use crate::detection::{RejectReason, Verdict};
use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters for one scanning session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub observed: usize,
    pub accepted: usize,
    pub rejected_blocked: usize,
    pub rejected_error_rate: usize,
    pub rejected_unconfirmed: usize,
    pub rejected_empty: usize,
}

impl MetricsSnapshot {
    pub fn rejected(&self) -> usize {
        self.rejected_blocked
            + self.rejected_error_rate
            + self.rejected_unconfirmed
            + self.rejected_empty
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record(&self, verdict: &Verdict) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.observed += 1;
            match verdict {
                Verdict::Accepted(_) => metrics.accepted += 1,
                Verdict::Rejected(RejectReason::Blocked) => metrics.rejected_blocked += 1,
                Verdict::Rejected(RejectReason::ErrorRate { .. }) => {
                    metrics.rejected_error_rate += 1
                }
                Verdict::Rejected(RejectReason::Unconfirmed { .. }) => {
                    metrics.rejected_unconfirmed += 1
                }
                Verdict::Rejected(RejectReason::EmptyCode) => metrics.rejected_empty += 1,
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbology::CanonicalBarcode;

    #[test]
    fn counts_each_verdict_kind() {
        let metrics = MetricsRecorder::new();
        metrics.record(&Verdict::Rejected(RejectReason::Unconfirmed { count: 1 }));
        metrics.record(&Verdict::Rejected(RejectReason::Blocked));
        metrics.record(&Verdict::Rejected(RejectReason::ErrorRate { average: 0.4 }));
        metrics.record(&Verdict::Accepted(CanonicalBarcode::from_decoded("1")));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.observed, 4);
        assert_eq!(snapshot.accepted, 1);
        assert_eq!(snapshot.rejected(), 3);
    }
}
