//! Text renderings of chart series.

use rust_decimal::prelude::ToPrimitive;

use crate::core::services::{ChartSeries, SummaryService};
use crate::domain::DisplayScale;

const LABEL_WIDTH: usize = 24;

/// Horizontal bars scaled against the largest point, one line per point.
pub fn bar_lines(
    series: &ChartSeries,
    scale: DisplayScale,
    width: usize,
    plain: bool,
) -> Vec<String> {
    let max = series.max_value().to_f64().unwrap_or(0.0);
    let bar_width = width.saturating_sub(LABEL_WIDTH + 20).max(10);
    let glyph = if plain { '#' } else { '█' };
    series
        .points
        .iter()
        .map(|point| {
            let value = point.value.to_f64().unwrap_or(0.0);
            let filled = if max > 0.0 {
                ((value / max) * bar_width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<LABEL_WIDTH$} {:<bar_width$} {}",
                fit_label(&point.label),
                glyph.to_string().repeat(filled),
                scale.format(point.value, 2),
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

/// One line per slice with its percentage share of the whole.
pub fn share_lines(series: &ChartSeries, scale: DisplayScale) -> Vec<String> {
    series
        .points
        .iter()
        .map(|point| {
            format!(
                "{:<LABEL_WIDTH$} {:>6.2}%  {}",
                fit_label(&point.label),
                SummaryService::share(series, point),
                scale.format(point.value, 2),
            )
        })
        .collect()
}

fn fit_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        label.to_string()
    } else {
        let mut fitted: String = label.chars().take(LABEL_WIDTH - 1).collect();
        fitted.push('…');
        fitted
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::core::services::ChartPoint;

    fn series() -> ChartSeries {
        ChartSeries {
            points: vec![
                ChartPoint {
                    label: "Alpha".into(),
                    value: Decimal::from(300),
                    color: SummaryService::palette_color(0),
                },
                ChartPoint {
                    label: "Beta".into(),
                    value: Decimal::from(100),
                    color: SummaryService::palette_color(1),
                },
            ],
        }
    }

    #[test]
    fn bars_scale_against_largest_point() {
        let lines = bar_lines(&series(), DisplayScale::Standard, 64, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('#').count(), 20);
        assert_eq!(lines[1].matches('#').count(), 7);
        assert!(lines[0].ends_with("$300.00"));
    }

    #[test]
    fn shares_sum_to_hundred() {
        let lines = share_lines(&series(), DisplayScale::Standard);
        assert!(lines[0].contains("75.00%"));
        assert!(lines[1].contains("25.00%"));
    }
}
