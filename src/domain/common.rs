//! Scale classes, display units, and the policy limits shared across the model.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Absolute ceiling for the total budget control.
pub const MAX_TOTAL_BUDGET: i64 = 1_000_000_000_000;
/// Most custom groups a session may hold at once.
pub const MAX_CUSTOM_GROUPS: usize = 50;
pub const MIN_ITEMS_PER_GROUP: usize = 1;
pub const MAX_ITEMS_PER_GROUP: usize = 20;
/// Item count given to a freshly created custom group.
pub const DEFAULT_CUSTOM_GROUP_SIZE: usize = 10;

/// Monetary scale of a template, driving defaults for newly created items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleClass {
    Small,
    #[default]
    Large,
}

impl ScaleClass {
    /// Unit cost assigned to items created by the user.
    pub fn default_unit_cost(self) -> Decimal {
        match self {
            ScaleClass::Small => Decimal::from(10_000),
            ScaleClass::Large => Decimal::from(1_000_000),
        }
    }

    /// Range ceiling for custom and imported items.
    pub fn default_max(self) -> Decimal {
        match self {
            ScaleClass::Small => Decimal::from(100_000_000),
            ScaleClass::Large => Decimal::from(100_000_000_000i64),
        }
    }

    /// Upper bound of the total budget slider.
    pub fn budget_ceiling(self) -> Decimal {
        match self {
            ScaleClass::Small => Decimal::from(1_000_000_000),
            ScaleClass::Large => Decimal::from(MAX_TOTAL_BUDGET),
        }
    }
}

impl fmt::Display for ScaleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScaleClass::Small => "small",
            ScaleClass::Large => "large",
        })
    }
}

/// Presentation unit: a divisor plus its abbreviation. Never applied to stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DisplayScale {
    Standard,
    Thousands,
    Millions,
    #[default]
    Billions,
    Trillions,
}

impl DisplayScale {
    pub const ALL: [DisplayScale; 5] = [
        DisplayScale::Standard,
        DisplayScale::Thousands,
        DisplayScale::Millions,
        DisplayScale::Billions,
        DisplayScale::Trillions,
    ];

    pub fn divisor(self) -> Decimal {
        match self {
            DisplayScale::Standard => Decimal::ONE,
            DisplayScale::Thousands => Decimal::from(1_000),
            DisplayScale::Millions => Decimal::from(1_000_000),
            DisplayScale::Billions => Decimal::from(1_000_000_000),
            DisplayScale::Trillions => Decimal::from(1_000_000_000_000i64),
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            DisplayScale::Standard => "",
            DisplayScale::Thousands => "K",
            DisplayScale::Millions => "M",
            DisplayScale::Billions => "B",
            DisplayScale::Trillions => "T",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayScale::Standard => "Standard",
            DisplayScale::Thousands => "Thousands",
            DisplayScale::Millions => "Millions",
            DisplayScale::Billions => "Billions",
            DisplayScale::Trillions => "Trillions",
        }
    }

    /// Converts a value expressed in display units into a stored amount;
    /// `None` when the product leaves the decimal range.
    pub fn to_stored(self, scaled: Decimal) -> Option<Decimal> {
        scaled.checked_mul(self.divisor())
    }

    /// Converts a stored amount into display units.
    pub fn from_stored(self, value: Decimal) -> Decimal {
        value / self.divisor()
    }

    /// Formats a stored amount in this unit, e.g. `$1,234.57B`.
    pub fn format(self, value: Decimal, places: u32) -> String {
        let scaled = self.from_stored(value);
        let body = crate::money::format_number(scaled.abs(), places);
        let rounded = scaled.round_dp(places);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}${body}{}", self.abbreviation())
    }
}

impl fmt::Display for DisplayScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayScale {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim();
        DisplayScale::ALL
            .into_iter()
            .find(|scale| {
                scale.label().eq_ignore_ascii_case(needle)
                    || (!scale.abbreviation().is_empty()
                        && scale.abbreviation().eq_ignore_ascii_case(needle))
            })
            .ok_or_else(|| format!("unknown scale `{needle}`"))
    }
}
