//! Domain types for arbor-io.

use arbor_rf::Record;

/// Which column of each row holds the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelColumn {
    /// The final column; every earlier column is an attribute.
    #[default]
    Last,
    /// A zero-based column index; the remaining columns keep their order.
    Index(usize),
}

impl LabelColumn {
    /// Resolve to a concrete column index for rows of `n_columns` columns.
    ///
    /// Returns `None` when the column does not exist.
    pub(crate) fn resolve(self, n_columns: usize) -> Option<usize> {
        match self {
            LabelColumn::Last => n_columns.checked_sub(1),
            LabelColumn::Index(i) if i < n_columns => Some(i),
            LabelColumn::Index(_) => None,
        }
    }
}

/// Labelled records loaded from one file.
///
/// Produced by [`RecordReader`](crate::RecordReader). Every record has
/// exactly `n_attributes` attribute values.
#[derive(Debug)]
pub struct RecordSet {
    /// Records in file order.
    pub records: Vec<Record>,
    /// Number of attribute columns per record.
    pub n_attributes: usize,
}

impl RecordSet {
    /// Return every attribute index `0..n_attributes`.
    #[must_use]
    pub fn attribute_indices(&self) -> Vec<usize> {
        (0..self.n_attributes).collect()
    }

    /// Return the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
