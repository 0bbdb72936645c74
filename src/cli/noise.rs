use clap::Parser;

use crate::{core::noise::ForecastNoise, prelude::*};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct NoiseArgs {
    /// Relative forecast error amplitude, for example `0.2` for ±20%.
    ///
    /// Plans are built from the exact balances when omitted.
    #[clap(long = "forecast-noise", env = "FORECAST_NOISE")]
    pub amplitude: Option<f64>,

    #[clap(long = "seed", env = "FORECAST_SEED", default_value = "42")]
    pub seed: u64,
}

impl NoiseArgs {
    pub fn noise(self) -> Result<Option<ForecastNoise>> {
        self.amplitude.map(|amplitude| ForecastNoise::try_new(amplitude, self.seed)).transpose()
    }
}
