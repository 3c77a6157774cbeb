use crate::prelude::ToneConfig;
use std::f32::consts::PI;

/// Pre-rendered mono PCM beep.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Tone {
    /// Sine at the configured pitch under an exponential gain ramp.
    pub fn render(config: &ToneConfig) -> Self {
        let sample_rate = config.sample_rate.max(1);
        let count = (u64::from(sample_rate) * config.duration_ms / 1000) as usize;
        let ratio = config.end_gain / config.start_gain;

        let samples = (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let progress = if count > 1 {
                    i as f32 / (count - 1) as f32
                } else {
                    0.0
                };
                let gain = config.start_gain * ratio.powf(progress);
                gain * (2.0 * PI * config.frequency_hz * t).sin()
            })
            .collect();

        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / u64::from(self.sample_rate.max(1))
    }
}
