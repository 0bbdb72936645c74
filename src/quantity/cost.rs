use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

pub type Cost = Quantity<0, 0, 1>;

impl Cost {
    pub const ONE_CENT: Self = Self(0.01);

    pub fn round_to_cents(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+.2}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}¤", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_abs_diff_eq!(Cost::from(12.345_6).round_to_cents().0, 12.35);
        assert_abs_diff_eq!(Cost::from(-0.004).round_to_cents().0, 0.0);
    }

    #[test]
    fn test_display_is_signed() {
        assert_eq!(Cost::from(3.0).to_string(), "+3.00");
        assert_eq!(Cost::from(-0.5).to_string(), "-0.50");
    }
}
