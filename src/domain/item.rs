use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::ScaleClass;
use crate::money::floor_quantity;

/// A single allocation line: `quantity` units at `unit_cost`, with range bounds on `budget`.
///
/// `budget == quantity * unit_cost` is the steady state, but each field can be edited on
/// its own; the allocation service recomputes the others for whichever field changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub budget: Decimal,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

impl LineItem {
    /// Builds an item from seed values. The range ceiling is five times the budget, or the
    /// large-scale default when the item starts empty.
    pub fn new(
        name: impl Into<String>,
        budget: Decimal,
        unit_cost: Decimal,
        quantity: Decimal,
    ) -> Self {
        let max = if budget > Decimal::ZERO {
            budget.saturating_mul(Decimal::from(5))
        } else {
            ScaleClass::Large.default_max()
        };
        Self {
            name: name.into(),
            budget,
            quantity: floor_quantity(quantity),
            unit_cost,
            min: Decimal::ZERO,
            max,
        }
    }

    /// An empty item priced with the scale-class defaults.
    pub fn placeholder(name: impl Into<String>, scale: ScaleClass) -> Self {
        Self {
            max: scale.default_max(),
            ..Self::new(name, Decimal::ZERO, scale.default_unit_cost(), Decimal::ZERO)
        }
    }

    pub fn with_max(mut self, max: Decimal) -> Self {
        self.max = max;
        self
    }
}
