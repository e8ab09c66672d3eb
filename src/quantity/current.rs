use std::ops::Mul;

use crate::quantity::{charge::MilliampHours, time::Hours};

quantity!(Milliamps, f64, "mA");

impl Mul<Hours> for Milliamps {
    type Output = MilliampHours;

    fn mul(self, hours: Hours) -> Self::Output {
        MilliampHours(self.0 * hours.0)
    }
}
