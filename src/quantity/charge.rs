use std::ops::Div;

quantity!(MilliampHours, f64, "mAh");

impl Div<Self> for MilliampHours {
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}
