use std::ops::Div;

use crate::quantity::{current::Milliamps, voltage::Volts};

quantity!(Watts, f64, "W");

impl Div<Volts> for Watts {
    type Output = Milliamps;

    fn div(self, voltage: Volts) -> Self::Output {
        Milliamps(1000.0 * self.0 / voltage.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_current_draw() {
        assert_abs_diff_eq!((Watts(3.7) / Volts(3.7)).0, 1000.0);
    }
}
