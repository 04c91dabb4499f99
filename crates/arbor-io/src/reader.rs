//! Headerless comma-separated record reader with input validation.

use std::path::{Path, PathBuf};

use arbor_rf::{Label, Record};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{LabelColumn, RecordSet};

/// Reads labelled categorical records from a comma-separated file.
///
/// Expected format:
/// - No header row
/// - One record per line, e.g. `x,x,x,x,o,o,x,o,o,positive`
/// - Label is `positive` or `negative`; every other column is an attribute
/// - Surrounding whitespace is trimmed and blank lines are skipped
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero non-blank rows |
/// | [`IoError::LabelColumnOutOfRange`] | Label column beyond the first row's width |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than the first |
/// | [`IoError::UnknownLabel`] | Label cell is not `positive` or `negative` |
pub struct RecordReader {
    path: PathBuf,
    label_column: LabelColumn,
}

impl RecordReader {
    /// Create a new reader for the given file path, label in the last column.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            label_column: LabelColumn::Last,
        }
    }

    /// Set which column holds the label.
    #[must_use]
    pub fn with_label_column(mut self, label_column: LabelColumn) -> Self {
        self.label_column = label_column;
        self
    }

    /// Read and validate the file, returning a [`RecordSet`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<RecordSet, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets our own InconsistentRowLength check fire instead
        // of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        // (column count, label column) fixed by the first row.
        let mut shape: Option<(usize, usize)> = None;

        for result in rdr.records() {
            let row = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;
            if row.iter().all(str::is_empty) {
                continue;
            }
            let row_index = records.len();

            let (expected, label_column) = match shape {
                Some(shape) => shape,
                None => {
                    let n_columns = row.len();
                    let label_column = self.label_column.resolve(n_columns).ok_or_else(|| {
                        IoError::LabelColumnOutOfRange {
                            path: self.path.clone(),
                            label_column: match self.label_column {
                                LabelColumn::Index(i) => i,
                                LabelColumn::Last => n_columns,
                            },
                            n_columns,
                        }
                    })?;
                    debug!(n_columns, label_column, "record shape fixed by first row");
                    shape = Some((n_columns, label_column));
                    (n_columns, label_column)
                }
            };

            if row.len() != expected {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: row.len(),
                });
            }

            let raw_label = row.get(label_column).unwrap_or("");
            let label: Label = raw_label.parse().map_err(|_| IoError::UnknownLabel {
                path: self.path.clone(),
                row_index,
                raw: raw_label.to_string(),
            })?;
            let attributes = row
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != label_column)
                .map(|(_, value)| value.to_string())
                .collect();
            records.push(Record::new(label, attributes));
        }

        let Some((n_columns, _)) = shape else {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        };
        let n_attributes = n_columns - 1;

        info!(n_records = records.len(), n_attributes, "dataset loaded");

        Ok(RecordSet {
            records,
            n_attributes,
        })
    }
}
