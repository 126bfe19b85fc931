use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: missing required column '{0}'")]
    MissingColumn(String),

    /// A value that survived the "nan" filter still failed its cast or parse.
    #[error("Data contract violation at row {row}, column '{column}': {reason} (value: {value:?})")]
    DataContract {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl DashboardError {
    pub(crate) fn contract(
        row: usize,
        column: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        DashboardError::DataContract {
            row,
            column,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
