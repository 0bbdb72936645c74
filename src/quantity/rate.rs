use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Currency per kilowatt-hour, negative when the grid pays for consumption.
pub type KilowattHourRate = Quantity<-1, -1, 1>;

impl KilowattHourRate {
    pub fn is_non_negative(self) -> bool {
        self >= Self::ZERO
    }
}

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}/kWh", self.0)
    }
}
