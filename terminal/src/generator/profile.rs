use anyhow::{bail, Context};
use poscore::capture::RawDetection;
use poscore::pos::{Money, Pricebook, Product};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Synthetic camera feed: each barcode is held under the lens for a number
/// of frames while the decoder occasionally misreads a digit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub barcodes: Vec<String>,
    pub frames_per_item: usize,
    pub frame_interval_ms: u64,
    pub misread_rate: f32,
    /// Upper bound of the per-character decode error.
    pub max_error: f32,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            barcodes: Vec::new(),
            frames_per_item: 30,
            frame_interval_ms: 100,
            misread_rate: 0.1,
            max_error: 0.12,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.frames_per_item == 0 {
            bail!("frames_per_item must be at least 1");
        }
        if self.frame_interval_ms == 0 {
            bail!("frame_interval_ms must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.misread_rate) {
            bail!("misread_rate {} outside [0, 1]", self.misread_rate);
        }
        if self.max_error.is_nan() || self.max_error < 0.0 {
            bail!("max_error {} must be non-negative", self.max_error);
        }
        Ok(())
    }
}

/// Replaces one digit with a different one, the typical motion-blur misread.
fn misread(code: &str, rng: &mut StdRng) -> String {
    let mut chars: Vec<char> = code.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let idx = rng.gen_range(0..chars.len());
    let current = chars[idx].to_digit(10).unwrap_or(0);
    let shifted = (current + rng.gen_range(1..10)) % 10;
    chars[idx] = char::from_digit(shifted, 10).unwrap_or('0');
    chars.into_iter().collect()
}

fn error_metrics(len: usize, max_error: f32, rng: &mut StdRng) -> Option<Vec<f32>> {
    if max_error <= 0.0 || len == 0 {
        return None;
    }
    Some((0..len).map(|_| rng.gen_range(0.0..max_error)).collect())
}

pub fn build_detection_stream(config: &GeneratorConfig) -> anyhow::Result<Vec<RawDetection>> {
    config.validate()?;
    let frame_count = config
        .barcodes
        .len()
        .checked_mul(config.frames_per_item)
        .context("overflow computing frame count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut frames = Vec::with_capacity(frame_count);

    for barcode in &config.barcodes {
        for _ in 0..config.frames_per_item {
            let code = if rng.gen::<f32>() < config.misread_rate {
                misread(barcode, &mut rng)
            } else {
                barcode.clone()
            };
            let errors = error_metrics(code.len(), config.max_error, &mut rng);
            frames.push(RawDetection {
                code,
                per_character_errors: errors,
            });
        }
    }

    Ok(frames)
}

/// Small convenience-store pricebook for demos.
pub fn sample_pricebook() -> Pricebook {
    let entries = [
        ("036000291452", "Facial Tissues", 349),
        ("012345000065", "Cigarettes King", 975),
        ("049000050103", "Cola 20oz", 229),
        ("028400090858", "Potato Chips", 199),
    ];
    let mut pricebook = Pricebook::new();
    pricebook.replace(
        entries
            .iter()
            .map(|&(barcode, name, cents)| Product {
                barcode: barcode.to_string(),
                name: name.to_string(),
                price: Money::from_cents(cents),
                category: None,
            })
            .collect(),
    );
    pricebook
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            barcodes: vec!["036000291452".into(), "01234565".into()],
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn generator_builds_expected_frame_count() {
        let frames = build_detection_stream(&config()).unwrap();
        assert_eq!(frames.len(), 2 * 30);
    }

    #[test]
    fn same_seed_replays_same_stream() {
        let first = build_detection_stream(&config()).unwrap();
        let second = build_detection_stream(&config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn misreads_change_exactly_one_digit() {
        let cfg = GeneratorConfig {
            barcodes: vec!["036000291452".into()],
            misread_rate: 1.0,
            max_error: 0.0,
            frames_per_item: 20,
            seed: 3,
            ..Default::default()
        };
        for frame in build_detection_stream(&cfg).unwrap() {
            let diff = frame
                .code
                .chars()
                .zip("036000291452".chars())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(diff, 1);
            assert!(frame.per_character_errors.is_none());
        }
    }

    #[test]
    fn error_metrics_stay_below_bound() {
        let frames = build_detection_stream(&config()).unwrap();
        for frame in frames {
            let errors = frame.per_character_errors.unwrap();
            assert_eq!(errors.len(), frame.code.len());
            assert!(errors.iter().all(|&e| (0.0..0.12).contains(&e)));
        }
    }

    #[test]
    fn zero_frames_per_item_is_rejected() {
        let cfg = GeneratorConfig {
            frames_per_item: 0,
            ..config()
        };
        assert!(build_detection_stream(&cfg).is_err());
    }

    #[test]
    fn sample_pricebook_is_populated() {
        assert_eq!(sample_pricebook().len(), 4);
    }
}
