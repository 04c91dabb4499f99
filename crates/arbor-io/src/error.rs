//! I/O error types for arbor-io.

use std::path::PathBuf;

/// Errors from file I/O, CSV parsing, and record validation.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the record file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the file contains no non-blank rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the record file.
        path: PathBuf,
    },

    /// Returned when a row has a different number of columns than the first row.
    #[error(
        "inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}"
    )]
    InconsistentRowLength {
        /// Path to the record file.
        path: PathBuf,
        /// Zero-based index among non-blank rows.
        row_index: usize,
        /// Column count of the first row.
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when the configured label column does not exist.
    #[error("label column {label_column} out of range in {path}: rows have {n_columns} columns")]
    LabelColumnOutOfRange {
        /// Path to the record file.
        path: PathBuf,
        /// Requested zero-based label column.
        label_column: usize,
        /// Column count of the first row.
        n_columns: usize,
    },

    /// Returned when a label cell is neither `positive` nor `negative`.
    #[error("unknown label \"{raw}\" in {path}: row {row_index}")]
    UnknownLabel {
        /// Path to the record file.
        path: PathBuf,
        /// Zero-based index among non-blank rows.
        row_index: usize,
        /// The raw label text.
        raw: String,
    },
}
