quantity!(Kelvin, f64, "K");

impl Kelvin {
    /// Temperature at which the empirical curves are calibrated, 25 °C.
    pub const REFERENCE: Self = Self(298.15);

    const CELSIUS_OFFSET: f64 = 273.15;

    pub const fn from_celsius(celsius: f64) -> Self {
        Self(celsius + Self::CELSIUS_OFFSET)
    }

    pub const fn celsius(self) -> f64 {
        self.0 - Self::CELSIUS_OFFSET
    }
}
