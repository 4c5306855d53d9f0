use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal, NormalError};

/// Functionality to add some Gaussian noise.
#[derive(Clone, Debug)]
pub(super) struct GaussianNoise {
    normal: Normal<f64>,
}

impl GaussianNoise {
    /// Creates new distribution from mean and stdev.
    /// Returns an error if `stdev` is negative or not finite.
    pub(super) fn new(mean: f64, stdev: f64) -> Result<Self, NormalError> {
        Ok(Self {
            normal: Normal::new(mean, stdev)?,
        })
    }

    /// Sample from distribution
    pub(super) fn draw_sample(&self, rng: &mut StdRng) -> f64 {
        self.normal.sample(rng)
    }

    /// Adds noise to a raw axis value, saturating at the `i16` range.
    pub(super) fn add_noise(&self, rng: &mut StdRng, value: i16) -> i16 {
        let noisy = (value as f64 + self.draw_sample(rng)).round();
        noisy.clamp(i16::MIN as f64, i16::MAX as f64) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_gaussian_new() {
        let noise = GaussianNoise::new(0.0, 1.0).unwrap();
        assert_eq!(noise.normal.mean(), 0.0);
        assert_eq!(noise.normal.std_dev(), 1.0);
    }

    #[test]
    fn test_gaussian_rejects_bad_stdev() {
        assert!(GaussianNoise::new(0.0, -1.0).is_err());
        assert!(GaussianNoise::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_add_noise() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = GaussianNoise::new(0.0, 1.0).unwrap();
        for _ in 0..100 {
            let value = noise.add_noise(&mut rng, 100);
            assert!((94..=106).contains(&value));
        }
    }

    #[test]
    fn test_add_noise_saturates() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = GaussianNoise::new(1000.0, 1.0).unwrap();
        assert_eq!(noise.add_noise(&mut rng, i16::MAX), i16::MAX);
    }
}
