//! Measurement units.
//!
//! Amounts are stored as integers in a per-system sub-unit so that
//! arithmetic within a system is exact: micrometres for SI length,
//! milligrams for SI mass, bytes for data, and for US measures a
//! fraction of a yard (or ounce) chosen so inches, feet, yards, and miles
//! are all whole numbers of it.

use std::fmt;

use super::format_float;

/// Sub-units per US yard and per US ounce.
///
/// 725 760 is highly composite, so common fractions of a yard or ounce
/// stay integral.
pub const HCN: i64 = 725_760;

/// Measurement family. Units only combine within one family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Length,
    Mass,
    Data,
}

impl UnitFamily {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Data => "data",
        }
    }
}

/// Unit system an amount is stored in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitSystem {
    Si,
    Us,
}

impl UnitSystem {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Si => "SI",
            Self::Us => "US",
        }
    }
}

struct UnitInfo {
    suffix: &'static str,
    family: UnitFamily,
    system: UnitSystem,
    sub_units: i64,
}

const fn unit(
    suffix: &'static str,
    family: UnitFamily,
    system: UnitSystem,
    sub_units: i64,
) -> UnitInfo {
    UnitInfo {
        suffix,
        family,
        system,
        sub_units,
    }
}

const UNITS: &[UnitInfo] = &[
    // SI length, in micrometres
    unit("mm", UnitFamily::Length, UnitSystem::Si, 1_000),
    unit("cm", UnitFamily::Length, UnitSystem::Si, 10_000),
    unit("m", UnitFamily::Length, UnitSystem::Si, 1_000_000),
    unit("km", UnitFamily::Length, UnitSystem::Si, 1_000_000_000),
    // US length, in sub-yards
    unit("in", UnitFamily::Length, UnitSystem::Us, HCN / 36),
    unit("ft", UnitFamily::Length, UnitSystem::Us, HCN / 3),
    unit("yd", UnitFamily::Length, UnitSystem::Us, HCN),
    unit("mi", UnitFamily::Length, UnitSystem::Us, HCN * 1760),
    // SI mass, in milligrams
    unit("mg", UnitFamily::Mass, UnitSystem::Si, 1),
    unit("g", UnitFamily::Mass, UnitSystem::Si, 1_000),
    unit("kg", UnitFamily::Mass, UnitSystem::Si, 1_000_000),
    // US mass, in sub-ounces
    unit("oz", UnitFamily::Mass, UnitSystem::Us, HCN),
    unit("lb", UnitFamily::Mass, UnitSystem::Us, HCN * 16),
    // Data, in bytes
    unit("B", UnitFamily::Data, UnitSystem::Si, 1),
    unit("kB", UnitFamily::Data, UnitSystem::Si, 1_000),
    unit("MB", UnitFamily::Data, UnitSystem::Si, 1_000_000),
    unit("GB", UnitFamily::Data, UnitSystem::Si, 1_000_000_000),
    unit("TB", UnitFamily::Data, UnitSystem::Si, 1_000_000_000_000),
    unit("KiB", UnitFamily::Data, UnitSystem::Si, 1 << 10),
    unit("MiB", UnitFamily::Data, UnitSystem::Si, 1 << 20),
    unit("GiB", UnitFamily::Data, UnitSystem::Si, 1 << 30),
    unit("TiB", UnitFamily::Data, UnitSystem::Si, 1 << 40),
];

fn lookup(suffix: &str) -> Option<&'static UnitInfo> {
    UNITS.iter().find(|info| info.suffix == suffix)
}

// US <-> SI bridges. One inch is exactly 25.4 mm and one pound exactly
// 453.59237 g; these ratios reduce those to sub-unit terms.
const LENGTH_US_TO_SI: (i128, i128) = (635, 504);
const MASS_US_TO_SI: (i128, i128) = (45_359_237, 1_161_216_000);

/// A quantity with a family, the system it is stored in, and the suffix
/// it was written with (kept for display).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitValue {
    /// Amount in sub-units of `system`.
    pub amount: i64,
    pub family: UnitFamily,
    pub system: UnitSystem,
    /// Suffix used when displaying, e.g. `"km"`.
    pub hint: &'static str,
}

impl UnitValue {
    /// Build a unit from a literal such as `2.5km`.
    ///
    /// Returns `None` for an unknown suffix.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "literal values are rounded to the nearest sub-unit"
    )]
    pub fn from_suffix(value: f64, suffix: &str) -> Option<Self> {
        let info = lookup(suffix)?;
        Some(UnitValue {
            amount: (value * info.sub_units as f64).round() as i64,
            family: info.family,
            system: info.system,
            hint: info.suffix,
        })
    }

    /// Same family, system, and hint with a new amount.
    #[must_use]
    pub fn with_amount(self, amount: i64) -> Self {
        UnitValue { amount, ..self }
    }

    /// This amount expressed in `system`'s sub-units.
    ///
    /// Data has a single system, so only length and mass ever convert.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturated to the i64 range before narrowing"
    )]
    pub fn amount_in(self, system: UnitSystem) -> i64 {
        if system == self.system {
            return self.amount;
        }
        let (num, den) = match self.family {
            UnitFamily::Length => LENGTH_US_TO_SI,
            UnitFamily::Mass => MASS_US_TO_SI,
            UnitFamily::Data => return self.amount,
        };
        let (num, den) = match self.system {
            UnitSystem::Us => (num, den),
            UnitSystem::Si => (den, num),
        };
        let converted = i128::from(self.amount) * num / den;
        converted.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// The amount in units of `hint`, e.g. `2.5` for 2 500 000 µm shown as km.
    #[expect(clippy::cast_precision_loss, reason = "display-only conversion")]
    pub fn hint_value(self) -> f64 {
        let per_unit = lookup(self.hint).map_or(1, |info| info.sub_units);
        self.amount as f64 / per_unit as f64
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_float(self.hint_value()), self.hint)
    }
}
