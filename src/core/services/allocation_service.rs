use rust_decimal::Decimal;

use crate::domain::{Dataset, ItemKey};
use crate::errors::PlannerError;
use crate::money::{bounded, floor_quantity, format_number, max_amount, parse_or_zero, round_cents};

use super::{update_item, ServiceResult};

/// Field-consistency rules for the three editable item fields.
///
/// Each entry point treats the edited field as authoritative, recomputes the dependent
/// field, and returns a new snapshot that shares every untouched group with the input.
pub struct AllocationService;

impl AllocationService {
    /// Sets the allocated amount; the unit count follows as `floor(budget / unit_cost)`.
    /// A zero unit cost leaves nothing to divide by, so the count becomes zero.
    pub fn set_budget(
        dataset: &Dataset,
        group_id: &str,
        key: &ItemKey,
        budget: Decimal,
    ) -> ServiceResult<Dataset> {
        let budget = in_range(budget.max(Decimal::ZERO), "budget")?;
        update_item(dataset, group_id, key, |item| {
            item.quantity = if item.unit_cost > Decimal::ZERO {
                budget
                    .checked_div(item.unit_cost)
                    .map(floor_quantity)
                    .unwrap_or(Decimal::ZERO)
            } else {
                Decimal::ZERO
            };
            item.budget = budget;
            tracing::debug!(group = %group_id, item = %key, %budget, "budget set");
            Ok(())
        })
    }

    /// Parses raw quantity input; anything unparseable counts as zero.
    pub fn set_quantity(
        dataset: &Dataset,
        group_id: &str,
        key: &ItemKey,
        raw: &str,
    ) -> ServiceResult<Dataset> {
        Self::set_quantity_value(dataset, group_id, key, parse_or_zero(raw))
    }

    pub fn set_quantity_value(
        dataset: &Dataset,
        group_id: &str,
        key: &ItemKey,
        quantity: Decimal,
    ) -> ServiceResult<Dataset> {
        let quantity = in_range(floor_quantity(quantity), "quantity")?;
        update_item(dataset, group_id, key, |item| {
            item.budget = extended(quantity, item.unit_cost)?;
            item.quantity = quantity;
            tracing::debug!(group = %group_id, item = %key, %quantity, "quantity set");
            Ok(())
        })
    }

    /// Parses raw unit cost input; anything unparseable or negative counts as zero.
    pub fn set_unit_cost(
        dataset: &Dataset,
        group_id: &str,
        key: &ItemKey,
        raw: &str,
    ) -> ServiceResult<Dataset> {
        Self::set_unit_cost_value(dataset, group_id, key, parse_or_zero(raw))
    }

    pub fn set_unit_cost_value(
        dataset: &Dataset,
        group_id: &str,
        key: &ItemKey,
        unit_cost: Decimal,
    ) -> ServiceResult<Dataset> {
        let unit_cost = in_range(round_cents(unit_cost).max(Decimal::ZERO), "unit cost")?;
        update_item(dataset, group_id, key, |item| {
            item.budget = extended(item.quantity, unit_cost)?;
            item.unit_cost = unit_cost;
            tracing::debug!(group = %group_id, item = %key, %unit_cost, "unit cost set");
            Ok(())
        })
    }
}

fn extended(quantity: Decimal, unit_cost: Decimal) -> ServiceResult<Decimal> {
    let product = quantity.checked_mul(unit_cost).ok_or_else(|| out_of_range("budget"))?;
    in_range(round_cents(product), "budget")
}

fn in_range(value: Decimal, field: &str) -> ServiceResult<Decimal> {
    bounded(value).ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> PlannerError {
    PlannerError::InvalidInput(format!(
        "{field} exceeds the largest supported amount ({})",
        format_number(max_amount(), 0)
    ))
}
