pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(samples: &[f32]) -> Option<f32> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f32>() / samples.len() as f32)
    }

    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_slice_is_none() {
        assert_eq!(StatsHelper::mean(&[]), None);
    }

    #[test]
    fn mean_averages_values() {
        assert_eq!(StatsHelper::mean(&[0.0, 0.5, 1.0]), Some(0.5));
    }

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(StatsHelper::rms(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_handles_single_value() {
        assert_eq!(StatsHelper::rms(&[4.0]), 4.0);
    }
}
