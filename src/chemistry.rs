use std::fmt::{Display, Formatter};

use clap::ValueEnum;

use crate::{
    prelude::*,
    quantity::{ratio::StateOfCharge, temperature::Kelvin},
    voltage::VoltageCurve,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Chemistry {
    /// Lithium polymer, the usual smartphone cell.
    #[value(name = "lipo", alias = "li-po")]
    Lipo,

    /// Lithium iron phosphate.
    #[value(name = "lifepo4", alias = "lfp")]
    LiFePo4,
}

impl Display for Chemistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lipo => write!(f, "LiPo"),
            Self::LiFePo4 => write!(f, "LiFePO4"),
        }
    }
}

impl Chemistry {
    /// Fallback for unrecognized chemistry names.
    pub const DEFAULT: Self = Self::Lipo;

    /// Resolve the chemistry name, falling back to [`Chemistry::DEFAULT`].
    pub fn lookup(name: &str) -> ChemistryLookup {
        match <Self as ValueEnum>::from_str(name.trim(), true) {
            Ok(chemistry) => ChemistryLookup::Matched(chemistry),
            Err(_) => {
                warn!(name, fallback = %Self::DEFAULT, "unknown battery chemistry");
                ChemistryLookup::Defaulted { requested: name.to_owned() }
            }
        }
    }

    pub const fn parameters(self) -> &'static ChemistryParameters {
        match self {
            Self::Lipo => &ChemistryParameters::LIPO,
            Self::LiFePo4 => &ChemistryParameters::LIFEPO4,
        }
    }
}

/// Outcome of a chemistry name lookup.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChemistryLookup {
    Matched(Chemistry),

    /// The name is not recognized and [`Chemistry::DEFAULT`] is used instead.
    Defaulted { requested: String },
}

impl ChemistryLookup {
    pub const fn chemistry(&self) -> Chemistry {
        match self {
            Self::Matched(chemistry) => *chemistry,
            Self::Defaulted { .. } => Chemistry::DEFAULT,
        }
    }

    pub const fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }
}

/// Empirical aging and voltage parameters of a cell chemistry.
#[must_use]
#[derive(Debug)]
pub struct ChemistryParameters {
    /// Full cycles until the capacity drops to 80%.
    pub cycle_life: f64,

    /// Calendar life at the reference temperature.
    pub calendar_life_years: f64,

    pub reference_temperature: Kelvin,

    /// Aging acceleration per 10 K temperature rise.
    pub q10: f64,

    /// Average state of charge above which storage is stressful.
    pub high_stress_state_of_charge: StateOfCharge,

    /// Average state of charge below which storage is stressful.
    pub low_stress_state_of_charge: StateOfCharge,

    /// Cycling above this temperature accelerates wear.
    pub high_stress_temperature: Kelvin,

    /// Cycling below this temperature accelerates wear.
    pub low_stress_temperature: Kelvin,

    pub voltage_curve: VoltageCurve,
}

impl ChemistryParameters {
    pub const LIPO: Self = Self {
        cycle_life: 500.0,
        calendar_life_years: 5.0,
        reference_temperature: Kelvin::REFERENCE,
        q10: 2.0,
        high_stress_state_of_charge: StateOfCharge(0.9),
        low_stress_state_of_charge: StateOfCharge(0.2),
        high_stress_temperature: Kelvin::from_celsius(45.0),
        low_stress_temperature: Kelvin::from_celsius(0.0),
        voltage_curve: VoltageCurve::LIPO,
    };

    pub const LIFEPO4: Self = Self {
        cycle_life: 2000.0,
        calendar_life_years: 10.0,
        reference_temperature: Kelvin::REFERENCE,
        q10: 1.8,
        high_stress_state_of_charge: StateOfCharge(0.95),
        low_stress_state_of_charge: StateOfCharge(0.1),
        high_stress_temperature: Kelvin::from_celsius(50.0),
        low_stress_temperature: Kelvin::from_celsius(-10.0),
        voltage_curve: VoltageCurve::LIFEPO4,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matched() {
        assert_eq!(Chemistry::lookup("Lipo"), ChemistryLookup::Matched(Chemistry::Lipo));
        assert_eq!(Chemistry::lookup("LiFePO4"), ChemistryLookup::Matched(Chemistry::LiFePo4));
        assert_eq!(Chemistry::lookup(" lfp "), ChemistryLookup::Matched(Chemistry::LiFePo4));
    }

    #[test]
    fn test_lookup_defaulted() {
        let lookup = Chemistry::lookup("NiMH");
        assert!(lookup.is_defaulted());
        assert_eq!(lookup.chemistry(), Chemistry::Lipo);
        assert_eq!(lookup, ChemistryLookup::Defaulted { requested: "NiMH".to_owned() });
    }

    #[test]
    fn test_parameters() {
        assert!(Chemistry::LiFePo4.parameters().cycle_life > Chemistry::Lipo.parameters().cycle_life);
        assert_eq!(Chemistry::Lipo.parameters().voltage_curve, VoltageCurve::LIPO);
        assert!(
            Chemistry::LiFePo4.parameters().calendar_life_years
                > Chemistry::Lipo.parameters().calendar_life_years
        );
        assert!(Chemistry::LiFePo4.parameters().q10 < Chemistry::Lipo.parameters().q10);
    }
}
