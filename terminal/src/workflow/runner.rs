use crate::generator::camera::SyntheticCamera;
use crate::generator::profile::{build_detection_stream, GeneratorConfig};
use crate::workflow::config::TerminalConfig;
use crate::workflow::register::{Register, ScanOutcome};
use anyhow::{anyhow, Context};
use log::info;
use poscore::capture::DecodeCapability;
use poscore::detection::Verdict;
use poscore::feedback::SilentSink;
use poscore::pos::{CartTotals, Pricebook};
use poscore::symbology::CanonicalBarcode;
use poscore::telemetry::MetricsSnapshot;
use poscore::ScanSession;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct DemoResult {
    pub frames: usize,
    pub dropped: usize,
    pub accepted: Vec<CanonicalBarcode>,
    pub added: usize,
    pub not_found: Vec<String>,
    pub totals: CartTotals,
    pub metrics: MetricsSnapshot,
}

/// Drives a scan session from a camera feed into a fresh register.
#[derive(Clone)]
pub struct Runner {
    config: TerminalConfig,
}

impl Runner {
    pub fn new(config: TerminalConfig) -> Self {
        Self { config }
    }

    pub fn execute(
        &self,
        pricebook: &Pricebook,
        generator: &GeneratorConfig,
    ) -> anyhow::Result<DemoResult> {
        let frames = build_detection_stream(generator).context("building camera feed")?;
        let frame_count = frames.len();
        let mut camera = SyntheticCamera::new(frames);
        self.drive(
            pricebook,
            &mut camera,
            frame_count,
            Duration::from_millis(generator.frame_interval_ms),
        )
    }

    /// Starts `camera`, then releases and processes one frame per tick.
    pub fn drive(
        &self,
        pricebook: &Pricebook,
        camera: &mut SyntheticCamera,
        frame_count: usize,
        frame_interval: Duration,
    ) -> anyhow::Result<DemoResult> {
        let mut register = Register::new(&self.config).with_pricebook(pricebook.clone());
        let (mut session, sender) = ScanSession::open(&self.config.scanner, Box::new(SilentSink))
            .context("opening scan session")?;
        camera
            .start(sender)
            .map_err(|err| anyhow!("{} ({})", err.operator_message(), err))?;

        let t0 = Instant::now();
        let mut accepted = Vec::new();
        let mut added = 0;
        let mut not_found = Vec::new();
        let mut frame = 0u32;

        while camera.advance() {
            let now = t0 + frame_interval * frame;
            frame += 1;
            let Some(Verdict::Accepted(code)) = session.poll(now) else {
                continue;
            };
            match register.handle_barcode(&code) {
                ScanOutcome::Added { .. } => added += 1,
                ScanOutcome::NotFound { barcode } => not_found.push(barcode),
            }
            accepted.push(code);
        }
        camera.stop();

        let metrics = session.metrics();
        info!(
            "demo processed {} of {} frames: {} accepted, {} rejected",
            metrics.observed,
            frame_count,
            metrics.accepted,
            metrics.rejected()
        );

        Ok(DemoResult {
            frames: frame_count,
            dropped: camera.dropped(),
            accepted,
            added,
            not_found,
            totals: register.cart().totals(),
            metrics,
        })
    }
}
