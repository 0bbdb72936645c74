use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{prelude::*, quantity::energy::KilowattHours};

/// Seeded multiplicative error applied to forecast balances.
///
/// The relative error stays below 100%, so a perturbed balance keeps its sign.
#[derive(Clone, Debug)]
pub struct ForecastNoise {
    amplitude: f64,
    rng: StdRng,
}

impl ForecastNoise {
    pub fn try_new(amplitude: f64, seed: u64) -> Result<Self> {
        ensure!(
            (0.0..1.0).contains(&amplitude),
            "forecast noise amplitude must be within [0, 1), got {amplitude}",
        );
        Ok(Self { amplitude, rng: StdRng::seed_from_u64(seed) })
    }

    pub fn perturb(&mut self, balance: KilowattHours) -> KilowattHours {
        let error = self.rng.random_range(-self.amplitude..=self.amplitude);
        (balance * (1.0 + error)).round_to_hundredths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_noise() {
        let balances = [1.0, -0.5, 0.25, -2.0, 0.0].map(KilowattHours::from);
        let mut first = ForecastNoise::try_new(0.3, 42).unwrap();
        let mut second = ForecastNoise::try_new(0.3, 42).unwrap();
        for balance in balances {
            assert_eq!(first.perturb(balance), second.perturb(balance));
        }
    }

    #[test]
    fn test_sign_is_preserved() {
        let mut noise = ForecastNoise::try_new(0.9, 7).unwrap();
        for _ in 0..100 {
            assert!(noise.perturb(KilowattHours::from(1.0)) >= KilowattHours::ZERO);
            assert!(noise.perturb(KilowattHours::from(-1.0)) <= KilowattHours::ZERO);
        }
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let mut noise = ForecastNoise::try_new(0.0, 1).unwrap();
        assert_eq!(noise.perturb(KilowattHours::from(0.37)), KilowattHours::from(0.37));
    }

    #[test]
    fn test_invalid_amplitude() {
        assert!(ForecastNoise::try_new(1.0, 1).is_err());
        assert!(ForecastNoise::try_new(-0.1, 1).is_err());
    }
}
