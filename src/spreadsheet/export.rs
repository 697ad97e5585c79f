use std::io::Write;

use crate::domain::Dataset;
use crate::errors::{PlannerError, Result};
use crate::money::{format_currency, format_quantity};

pub const EXPORT_HEADERS: [&str; 5] = ["Group", "Item", "Quantity", "Unit Cost", "Total Cost"];

/// Writes every item of every group, hidden ones included, as one CSV row.
/// The total cost column carries the item budget.
pub fn write_dataset<W: Write>(dataset: &Dataset, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    let mut rows = 0;
    for group in dataset.groups() {
        for item in group.items.values() {
            let quantity = format_quantity(item.quantity);
            let unit_cost = format_currency(item.unit_cost);
            let total_cost = format_currency(item.budget);
            csv_writer.write_record([
                group.name.as_str(),
                item.name.as_str(),
                quantity.as_str(),
                unit_cost.as_str(),
                total_cost.as_str(),
            ])?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    tracing::info!(rows, "dataset exported");
    Ok(rows)
}

pub fn export_to_string(dataset: &Dataset) -> Result<String> {
    let mut buffer = Vec::new();
    write_dataset(dataset, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| PlannerError::StorageError(err.to_string()))
}
