//! Open-circuit voltage as a function of the state of charge.

use itertools::Itertools;

use crate::quantity::{ratio::StateOfCharge, voltage::Volts};

/// Piecewise-linear open-circuit voltage curve.
///
/// The curve is defined by its voltages at the fixed breakpoints `0%`, `10%`, `20%`, `95%`
/// and `100%`, and is linearly interpolated in between, hence continuous everywhere:
///
/// - below 10% the voltage ramps up from the cut-off floor;
/// - between 10% and 20% it climbs steeply out of the discharge tail;
/// - between 20% and 95% it is the long, flat plateau;
/// - above the knee at 95% it rises to the full-charge voltage, the steepest segment of all.
///
/// The knee segment rises, it does not sag towards full charge.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoltageCurve {
    /// Cut-off voltage of an empty cell.
    pub floor: Volts,

    /// Voltage at 10%.
    pub tail: Volts,

    /// Voltage at 20%, start of the plateau.
    pub plateau: Volts,

    /// Voltage at 95%, end of the plateau.
    pub knee: Volts,

    /// Voltage of a fully charged cell.
    pub full: Volts,

    /// Nominal cell voltage, used to normalize the average discharge voltage.
    pub nominal: Volts,
}

impl VoltageCurve {
    const TAIL: f64 = 0.1;
    const PLATEAU: f64 = 0.2;
    const KNEE: f64 = 0.95;

    pub const LIPO: Self = Self {
        floor: Volts(3.0),
        tail: Volts(3.5),
        plateau: Volts(3.7),
        knee: Volts(4.05),
        full: Volts(4.2),
        nominal: Volts(3.7),
    };

    pub const LIFEPO4: Self = Self {
        floor: Volts(2.5),
        tail: Volts(3.0),
        plateau: Volts(3.2),
        knee: Volts(3.35),
        full: Volts(3.6),
        nominal: Volts(3.2),
    };

    const fn breakpoints(&self) -> [(f64, Volts); 5] {
        [
            (0.0, self.floor),
            (Self::TAIL, self.tail),
            (Self::PLATEAU, self.plateau),
            (Self::KNEE, self.knee),
            (1.0, self.full),
        ]
    }

    /// Open-circuit voltage at the specified state of charge.
    ///
    /// States of charge outside of `0..=1` are clamped.
    pub fn voltage(&self, state_of_charge: StateOfCharge) -> Volts {
        let soc = state_of_charge.clamped().0;
        if soc.is_nan() || soc <= 0.0 {
            return self.floor;
        }
        self.breakpoints()
            .into_iter()
            .tuple_windows()
            .find(|(_, (end, _))| soc <= *end)
            .map_or(self.full, |((start, from), (end, to))| {
                from + (to - from) * ((soc - start) / (end - start))
            })
    }

    /// Exact integral of the curve from the empty state up to the specified state of charge,
    /// in volts times the state-of-charge fraction.
    pub fn integral(&self, state_of_charge: StateOfCharge) -> f64 {
        let soc = state_of_charge.clamped().0;
        if soc.is_nan() {
            return 0.0;
        }
        self.breakpoints()
            .into_iter()
            .tuple_windows()
            .take_while(|((start, _), _)| *start < soc)
            .map(|((start, from), (end, _))| {
                let end = end.min(soc);
                let to = self.voltage(StateOfCharge(end));
                0.5 * (from.0 + to.0) * (end - start)
            })
            .sum()
    }

    /// Average voltage over the discharge from the specified state of charge down to empty.
    ///
    /// # Returns
    ///
    /// [`None`] for an empty battery, since the average is undefined there.
    pub fn average_voltage(&self, state_of_charge: StateOfCharge) -> Option<Volts> {
        let soc = state_of_charge.clamped().0;
        (soc > 0.0).then(|| Volts(self.integral(state_of_charge) / soc))
    }
}
