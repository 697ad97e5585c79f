//! Paginated text document of the current allocation view.

pub mod chart;
pub mod table;

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::core::services::{AllocationSummary, SummaryService};
use crate::domain::{Dataset, DisplayScale};
use crate::errors::{PlannerError, Result};
use crate::money::{format_currency, format_quantity};

pub use table::{Alignment, Table, TableColumn};

/// Lines per page when no other height is configured.
pub const DEFAULT_PAGE_HEIGHT: usize = 60;
/// Character width the document is laid out for.
pub const REPORT_WIDTH: usize = 96;
const PAGE_BREAK: char = '\u{000C}';

/// Everything a document needs from the session, captured at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub template_name: &'a str,
    pub dataset: &'a Dataset,
    pub summary: &'a AllocationSummary,
    pub scale: DisplayScale,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// Lays out the view and slices it into pages of `page_height` lines.
    pub fn build(input: &ReportInput<'_>, page_height: usize) -> Result<Self> {
        let pages = paginate(render_view(input), page_height)?;
        tracing::debug!(pages = pages.len(), "report laid out");
        Ok(Self { pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages joined by form feeds.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (idx, page) in self.pages.iter().enumerate() {
            if idx > 0 {
                out.push(PAGE_BREAK);
                out.push('\n');
            }
            for line in &page.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_text())?;
        tracing::info!(path = %path.display(), pages = self.page_count(), "report written");
        Ok(())
    }
}

/// Splits lines into fixed-height pages; the last page holds the remainder.
pub fn paginate(lines: Vec<String>, page_height: usize) -> Result<Vec<Page>> {
    if page_height == 0 {
        return Err(PlannerError::InvalidInput(
            "page height must be at least one line".into(),
        ));
    }
    if lines.is_empty() {
        return Ok(vec![Page {
            number: 1,
            lines: Vec::new(),
        }]);
    }
    Ok(lines
        .chunks(page_height)
        .enumerate()
        .map(|(idx, chunk)| Page {
            number: idx + 1,
            lines: chunk.to_vec(),
        })
        .collect())
}

/// Header, totals, one table per group, and the allocation bar chart.
pub fn render_view(input: &ReportInput<'_>) -> Vec<String> {
    let scale = input.scale;
    let summary = input.summary;
    let mut lines = vec![
        "Budget Allocation Report".to_string(),
        format!("Template : {}", input.template_name),
        format!("Generated: {}", input.generated_at.format("%Y-%m-%d %H:%M")),
        format!("Scale    : {}", scale.label()),
        String::new(),
        format!("Total budget limit : {}", scale.format(summary.total_budget_limit, 2)),
        format!("Allocated          : {}", scale.format(summary.allocated, 2)),
        format!("Remaining          : {}", scale.format(summary.remaining_display(), 2)),
    ];
    if summary.is_over_budget() {
        lines.push(format!(
            "Over budget by     : {}",
            scale.format(-summary.remaining, 2)
        ));
    }

    for group in input.dataset.groups() {
        lines.push(String::new());
        lines.push(format!("{} ({})", group.name, scale.format(group.subtotal(), 2)));
        if !group.expanded {
            lines.push(format!("  {} item(s) collapsed", group.items.len()));
            continue;
        }
        let mut table = Table::new(vec![
            TableColumn::left("Item").max_width(40),
            TableColumn::right("Quantity"),
            TableColumn::right("Unit Cost"),
            TableColumn::right("Budget"),
        ])
        .plain(true);
        for (_, item) in group.visible_items() {
            table.push_row(vec![
                item.name.clone(),
                format_quantity(item.quantity),
                format_currency(item.unit_cost),
                format_currency(item.budget),
            ]);
        }
        lines.extend(table.render_lines());
        let hidden = group.hidden_count();
        if hidden > 0 {
            lines.push(format!("  (+{hidden} hidden)"));
        }
    }

    lines.push(String::new());
    lines.push("Allocation by group".to_string());
    let pie = SummaryService::pie_series(summary);
    lines.extend(chart::bar_lines(&pie, scale, REPORT_WIDTH, true));
    lines
}
