//! CSV import and export of the working dataset.

pub mod export;
pub mod import;

pub use export::{export_to_string, write_dataset, EXPORT_HEADERS};
pub use import::{read_dataset, Column, ColumnMap, ImportOutcome};
