use std::io::Read;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{Addressing, Dataset, Group, GroupKind, LineItem, ScaleClass};
use crate::errors::ImportError;
use crate::money::{bounded, floor_quantity, parse_bounded};

/// Logical columns recognised in an imported sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Group,
    Item,
    Quantity,
    UnitCost,
    TotalCost,
}

const HEADER_PATTERNS: &[(Column, &str)] = &[
    (Column::Group, r"(?i)section"),
    (Column::Group, r"(?i)group"),
    (Column::Item, r"(?i)item"),
    (Column::Quantity, r"(?i)qty"),
    (Column::Quantity, r"(?i)quantity"),
    (Column::UnitCost, r"(?i)unit\s*cost"),
    (Column::UnitCost, r"(?i)unit price"),
    (Column::TotalCost, r"(?i)total\s*cost"),
    (Column::TotalCost, r"(?i)extended\s*cost"),
];

static COMPILED_PATTERNS: Lazy<Vec<(Column, Regex)>> = Lazy::new(|| {
    HEADER_PATTERNS
        .iter()
        .filter_map(|(column, pattern)| Regex::new(pattern).ok().map(|regex| (*column, regex)))
        .collect()
});

/// Header positions of the logical columns. Group and item are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub group: usize,
    pub item: usize,
    pub quantity: Option<usize>,
    pub unit_cost: Option<usize>,
    pub total_cost: Option<usize>,
}

impl ColumnMap {
    /// Locates each logical column as the first header matching one of its patterns.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Result<Self, ImportError> {
        let find = |column: Column| {
            headers.iter().position(|header| {
                let header = header.as_ref().trim();
                COMPILED_PATTERNS
                    .iter()
                    .filter(|(candidate, _)| *candidate == column)
                    .any(|(_, regex)| regex.is_match(header))
            })
        };
        match (find(Column::Group), find(Column::Item)) {
            (Some(group), Some(item)) => Ok(Self {
                group,
                item,
                quantity: find(Column::Quantity),
                unit_cost: find(Column::UnitCost),
                total_cost: find(Column::TotalCost),
            }),
            (group, item) => Err(ImportError::MissingColumns {
                group: group.is_none(),
                item: item.is_none(),
            }),
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub dataset: Dataset,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct RowValues {
    group: String,
    item: String,
    quantity: Decimal,
    unit_cost: Decimal,
    total_cost: Decimal,
}

/// Reads a CSV sheet whose first row holds the headers and builds an imported dataset.
///
/// A row is dropped when its group or item cell is empty, or when a located numeric
/// column has an empty cell. Numeric columns absent from the header feed the derivation
/// chain instead: unit cost falls back to `total / quantity`, then zero, and total cost
/// falls back to `quantity * unit_cost`.
pub fn read_dataset<R: Read>(reader: R) -> Result<ImportOutcome, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let headers = match records.next() {
        Some(record) => record?,
        None => return Err(ImportError::EmptySheet),
    };
    let headers: Vec<&str> = headers.iter().collect();
    if headers.iter().all(|cell| cell.is_empty()) {
        return Err(ImportError::EmptySheet);
    }
    let columns = ColumnMap::detect(&headers)?;

    let mut groups = GroupAccumulator::default();
    let mut rows_read = 0;
    let mut rows_skipped = 0;
    for record in records {
        let record = record?;
        rows_read += 1;
        match normalize_row(&record, &columns) {
            Some(row) => groups.push(row),
            None => rows_skipped += 1,
        }
    }
    tracing::info!(
        rows = rows_read,
        skipped = rows_skipped,
        groups = groups.len(),
        "spreadsheet parsed"
    );
    Ok(ImportOutcome {
        dataset: groups.into_dataset(),
        rows_read,
        rows_skipped,
    })
}

fn normalize_row(record: &csv::StringRecord, columns: &ColumnMap) -> Option<RowValues> {
    let required = |idx: usize| record.get(idx).filter(|cell| !cell.is_empty());
    // A located column must be filled in; an absent column reads as unparseable.
    let optional = |idx: Option<usize>| match idx {
        Some(idx) => required(idx).map(Some),
        None => Some(None),
    };

    let group = required(columns.group)?;
    let item = required(columns.item)?;
    let quantity_cell = optional(columns.quantity)?;
    let unit_cost_cell = optional(columns.unit_cost)?;
    let total_cost_cell = optional(columns.total_cost)?;

    // Amounts beyond the supported range read as unparseable.
    let quantity = quantity_cell
        .and_then(parse_bounded)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    let total_cost = total_cost_cell.and_then(parse_bounded);
    let unit_cost = match (unit_cost_cell.and_then(parse_bounded), total_cost) {
        (Some(unit_cost), _) => unit_cost,
        (None, Some(total)) if quantity > Decimal::ZERO => {
            total.checked_div(quantity).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
    .max(Decimal::ZERO);
    let total_cost = total_cost
        .or_else(|| quantity.checked_mul(unit_cost).and_then(bounded))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);

    Some(RowValues {
        group: group.to_string(),
        item: item.to_string(),
        quantity: floor_quantity(quantity),
        unit_cost,
        total_cost,
    })
}

/// Collects rows into groups keyed by name, in first-seen order.
#[derive(Default)]
struct GroupAccumulator {
    groups: Vec<Group>,
}

impl GroupAccumulator {
    fn len(&self) -> usize {
        self.groups.len()
    }

    fn push(&mut self, row: RowValues) {
        let idx = match self.groups.iter().position(|group| group.name == row.group) {
            Some(idx) => idx,
            None => {
                let ordinal = self.groups.len() + 1;
                self.groups.push(Group::new(
                    format!("imported_group_{ordinal}"),
                    row.group.clone(),
                    GroupKind::Imported,
                    Addressing::Sequence,
                ));
                self.groups.len() - 1
            }
        };
        let item = LineItem::new(row.item, row.total_cost, row.unit_cost, row.quantity)
            .with_max(ScaleClass::Large.default_max());
        self.groups[idx].items.insert(item);
    }

    fn into_dataset(self) -> Dataset {
        Dataset::new(self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKey;

    fn import(csv: &str) -> Result<ImportOutcome, ImportError> {
        read_dataset(csv.as_bytes())
    }

    #[test]
    fn every_header_pattern_compiles() {
        assert_eq!(COMPILED_PATTERNS.len(), HEADER_PATTERNS.len());
    }

    #[test]
    fn detects_columns_by_pattern_in_any_order() {
        let headers = ["Qty", "Extended Cost", "Line Item", "Section", "Unit Price"];
        let map = ColumnMap::detect(&headers).expect("columns");
        assert_eq!(map.group, 3);
        assert_eq!(map.item, 2);
        assert_eq!(map.quantity, Some(0));
        assert_eq!(map.unit_cost, Some(4));
        assert_eq!(map.total_cost, Some(1));
    }

    #[test]
    fn tolerant_of_unit_cost_spacing() {
        let map =
            ColumnMap::detect(&["group", "item", "UNITCOST", "total   cost"]).expect("columns");
        assert_eq!(map.unit_cost, Some(2));
        assert_eq!(map.total_cost, Some(3));
        assert_eq!(map.quantity, None);
    }

    #[test]
    fn missing_item_column_fails() {
        let err = import("Group,Name,Quantity\nOps,Fuel,3\n").expect_err("no item column");
        assert!(matches!(err, ImportError::MissingColumns { group: false, item: true }));
    }

    #[test]
    fn empty_sheet_fails() {
        assert!(matches!(import(""), Err(ImportError::EmptySheet)));
        assert!(matches!(import(",,\n"), Err(ImportError::EmptySheet)));
    }

    #[test]
    fn unit_cost_is_back_derived_when_column_missing() {
        let outcome = import("Group,Item,Quantity,Total Cost\nOps,Fuel,10,500\n").expect("import");
        let group = outcome.dataset.group("imported_group_1").expect("group");
        let fuel = group.item(&ItemKey::Index(0)).expect("item");
        assert_eq!(fuel.unit_cost, Decimal::from(50));
        assert_eq!(fuel.budget, Decimal::from(500));
        assert_eq!(fuel.quantity, Decimal::from(10));
    }

    #[test]
    fn total_cost_is_derived_when_unparseable() {
        let outcome = import("Group,Item,Quantity,Unit Cost,Total Cost\nOps,Fuel,4,$2.50,n/a\n")
            .expect("import");
        let fuel = outcome
            .dataset
            .group("imported_group_1")
            .and_then(|g| g.item(&ItemKey::Index(0)))
            .cloned()
            .expect("item");
        assert_eq!(fuel.budget, Decimal::from(10));
        assert_eq!(fuel.unit_cost, Decimal::new(250, 2));
    }

    #[test]
    fn rows_with_empty_cells_are_dropped() {
        let outcome = import(
            "Group,Item,Quantity,Unit Cost,Total Cost\n\
             Ops,Fuel,1,2,2\n\
             Ops,,1,2,2\n\
             Ops,Tires,,2,2\n\
             Ops,Oil,1,2\n",
        )
        .expect("import");
        assert_eq!(outcome.rows_read, 4);
        assert_eq!(outcome.rows_skipped, 3);
        assert_eq!(outcome.dataset.group("imported_group_1").map(|g| g.items.len()), Some(1));
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let outcome = import(
            "Section,Item,Qty,Unit Cost,Total Cost\n\
             Beta,One,1,1,1\n\
             Alpha,Two,1,1,1\n\
             Beta,Three,1,1,1\n",
        )
        .expect("import");
        let groups: Vec<(&str, &str, usize)> = outcome
            .dataset
            .groups()
            .map(|group| (group.id.as_str(), group.name.as_str(), group.items.len()))
            .collect();
        assert_eq!(
            groups,
            [("imported_group_1", "Beta", 2), ("imported_group_2", "Alpha", 1)]
        );
        assert!(outcome.dataset.groups().all(|group| group.kind == GroupKind::Imported));
    }

    #[test]
    fn unparseable_quantity_counts_as_zero() {
        let outcome = import("Group,Item,Quantity,Unit Cost,Total Cost\nOps,Fuel,many,3,30\n")
            .expect("import");
        let fuel = outcome
            .dataset
            .group("imported_group_1")
            .and_then(|g| g.item(&ItemKey::Index(0)))
            .cloned()
            .expect("item");
        assert_eq!(fuel.quantity, Decimal::ZERO);
        assert_eq!(fuel.unit_cost, Decimal::from(3));
        assert_eq!(fuel.budget, Decimal::from(30));
    }

    #[test]
    fn out_of_range_amounts_read_as_unparseable() {
        let outcome = import(
            "Group,Item,Quantity,Unit Cost,Total Cost\n\
             Ops,Fuel,1,1,50000000000000000000000000000\n\
             Ops,Fleet,100000000,100000000,n/a\n",
        )
        .expect("import");
        let group = outcome.dataset.group("imported_group_1").expect("group");
        let fuel = group.item(&ItemKey::Index(0)).expect("fuel");
        assert_eq!(fuel.budget, Decimal::ONE);
        let fleet = group.item(&ItemKey::Index(1)).expect("fleet");
        assert_eq!(fleet.budget, Decimal::ZERO);
        assert_eq!(fleet.quantity, Decimal::from(100_000_000));
    }
}
