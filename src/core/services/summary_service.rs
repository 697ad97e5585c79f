use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::Dataset;
use crate::money::round_cents;

/// Label of the trailing pie slice that holds the unallocated budget.
pub const REMAINING_LABEL: &str = "Remaining Budget";
/// Number of distinct chart colours before the palette repeats.
pub const PALETTE_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSubtotal {
    pub id: String,
    pub name: String,
    pub subtotal: Decimal,
}

/// Aggregates derived from a dataset and a total budget limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    pub total_budget_limit: Decimal,
    pub allocated: Decimal,
    /// `limit - allocated`; negative while over-allocated.
    pub remaining: Decimal,
    pub groups: Vec<GroupSubtotal>,
}

impl AllocationSummary {
    pub fn is_over_budget(&self) -> bool {
        self.allocated > self.total_budget_limit
    }

    /// Remaining budget as shown to the user, never below zero.
    pub fn remaining_display(&self) -> Decimal {
        self.remaining.max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn total(&self) -> Decimal {
        self.points
            .iter()
            .fold(Decimal::ZERO, |total, point| total.saturating_add(point.value))
    }

    pub fn max_value(&self) -> Decimal {
        self.points
            .iter()
            .map(|point| point.value)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(dataset: &Dataset, total_budget_limit: Decimal) -> AllocationSummary {
        let groups: Vec<GroupSubtotal> = dataset
            .groups()
            .map(|group| GroupSubtotal {
                id: group.id.clone(),
                name: group.name.clone(),
                subtotal: group.subtotal(),
            })
            .collect();
        let allocated = groups
            .iter()
            .fold(Decimal::ZERO, |total, group| total.saturating_add(group.subtotal));
        AllocationSummary {
            total_budget_limit,
            allocated,
            remaining: total_budget_limit.saturating_sub(allocated),
            groups,
        }
    }

    /// Group subtotals plus the floored remaining budget, each rounded to cents.
    pub fn pie_series(summary: &AllocationSummary) -> ChartSeries {
        let mut series = Self::bar_series(summary);
        let idx = series.points.len();
        series.points.push(ChartPoint {
            label: REMAINING_LABEL.to_string(),
            value: round_cents(summary.remaining_display()),
            color: Self::palette_color(idx),
        });
        series
    }

    pub fn bar_series(summary: &AllocationSummary) -> ChartSeries {
        ChartSeries {
            points: summary
                .groups
                .iter()
                .enumerate()
                .map(|(idx, group)| ChartPoint {
                    label: group.name.clone(),
                    value: round_cents(group.subtotal),
                    color: Self::palette_color(idx),
                })
                .collect(),
        }
    }

    /// CSS colour of a palette slot.
    pub fn palette_color(idx: usize) -> String {
        format!("hsl({:.3}, 65%, 50%)", Self::palette_hue(idx))
    }

    /// Golden-angle hue spacing in degrees.
    pub fn palette_hue(idx: usize) -> f64 {
        ((idx % PALETTE_SIZE) as f64 * 137.508) % 360.0
    }

    /// Share of the series total held by one point, in percent.
    pub fn share(series: &ChartSeries, point: &ChartPoint) -> f64 {
        let total = series.total();
        if total.is_zero() {
            return 0.0;
        }
        (point.value / total * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    }
}
