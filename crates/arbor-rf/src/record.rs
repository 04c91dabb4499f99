use crate::label::Label;

/// One labeled observation with categorical attribute values.
///
/// Records are immutable once built; training partitions them by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    label: Label,
    attributes: Vec<String>,
}

impl Record {
    /// Create a record from its label and attribute values.
    pub fn new(label: Label, attributes: Vec<String>) -> Self {
        Self { label, attributes }
    }

    /// Return the record's class label.
    #[must_use]
    pub fn label(&self) -> Label {
        self.label
    }

    /// Return the attribute values in positional order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Return the value at attribute position `index`, if present.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(String::as_str)
    }

    /// Return the number of attribute values.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }
}
