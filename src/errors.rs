use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, service, and adapter layers.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Item `{item}` not found in group `{group}`")]
    ItemNotFound { group: String, item: String },
    #[error("Unknown template `{key}`{}", suggestion_suffix(.suggestion))]
    UnknownTemplate {
        key: String,
        suggestion: Option<String>,
    },
    #[error("Group `{0}` is not a custom or imported group")]
    NotEditable(String),
    #[error("Item `{item}` already exists in group `{group}`")]
    DuplicateItem { group: String, item: String },
    #[error("You can only have up to {0} custom groups")]
    CustomGroupLimit(usize),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, PlannerError>;

/// Structural failures raised while reading a spreadsheet for import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("The provided sheet is empty")]
    EmptySheet,
    #[error("Could not find {} column(s) in the sheet", missing_columns(.group, .item))]
    MissingColumns { group: bool, item: bool },
    #[error("Malformed spreadsheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unable to read spreadsheet: {0}")]
    Io(#[from] std::io::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(best) => format!(" (did you mean `{best}`?)"),
        None => String::new(),
    }
}

fn missing_columns(group: &bool, item: &bool) -> &'static str {
    match (*group, *item) {
        (true, true) => "'Group/Section' and 'Item'",
        (true, false) => "'Group/Section'",
        _ => "'Item'",
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        PlannerError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for PlannerError {
    fn from(err: csv::Error) -> Self {
        PlannerError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_mentions_suggestion() {
        let err = PlannerError::UnknownTemplate {
            key: "Defualt".into(),
            suggestion: Some("Default".into()),
        };
        assert_eq!(
            err.to_string(),
            "Unknown template `Defualt` (did you mean `Default`?)"
        );
    }

    #[test]
    fn missing_columns_names_each_column() {
        let err = ImportError::MissingColumns {
            group: false,
            item: true,
        };
        assert_eq!(err.to_string(), "Could not find 'Item' column(s) in the sheet");
    }
}
