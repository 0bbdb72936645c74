use clap::Parser;

use crate::{core::window::FixedDaylight, prelude::*};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct DaylightArgs {
    /// Hour at which the day window starts.
    #[clap(long = "sunrise", env = "SUNRISE_HOUR", default_value = "7")]
    pub sunrise: u32,

    /// Hour at which the night window starts.
    #[clap(long = "sunset", env = "SUNSET_HOUR", default_value = "19")]
    pub sunset: u32,
}

impl DaylightArgs {
    pub fn daylight(self) -> Result<FixedDaylight> {
        FixedDaylight::try_new(self.sunrise, self.sunset)
    }
}
