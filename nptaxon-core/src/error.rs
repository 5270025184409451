use thiserror::Error;

/// Errors surfaced at the dataset and construction boundaries.
///
/// The engine stages themselves are total; an unclassifiable row is never an
/// error, it resolves to the sentinel category.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Column '{column}' not found. Found: {found:?}")]
    MissingColumn { column: String, found: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid rule pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Row {row} has {found} fields but the header has {expected}")]
    ExtraFields {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Dataset has no header row")]
    EmptyDataset,
}

/// Result type for taxonomy operations
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
