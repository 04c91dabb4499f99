use std::borrow::Borrow;

use tracing::{debug, instrument, trace};

use crate::{
    RfError,
    label::Label,
    node::Node,
    record::Record,
    split::{find_best_split, label_counts, uniform_label},
};

/// A binary decision tree over categorical attributes.
///
/// Created empty with [`DecisionTree::new`]; [`DecisionTree::train`] grows
/// the root by recursive information-gain splitting.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DecisionTree {
    root: Option<Node>,
    /// Minimum sample length needed to route through every decision node.
    #[serde(skip)]
    required_attributes: usize,
}

/// Check that `records` is non-empty and indexable at every attribute.
pub(crate) fn validate_records<R: Borrow<Record>>(
    records: &[R],
    attributes: &[usize],
) -> Result<(), RfError> {
    if records.is_empty() {
        return Err(RfError::EmptyInput);
    }
    let Some(&max_attribute) = attributes.iter().max() else {
        return Ok(());
    };
    for (record_index, record) in records.iter().enumerate() {
        let record: &Record = record.borrow();
        if record.n_attributes() <= max_attribute {
            let attribute_index = attributes
                .iter()
                .copied()
                .find(|&a| a >= record.n_attributes())
                .unwrap_or(max_attribute);
            return Err(RfError::AttributeIndexOutOfRange {
                record_index,
                attribute_index,
                n_attributes: record.n_attributes(),
            });
        }
    }
    Ok(())
}

impl DecisionTree {
    /// Create an untrained tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the tree over all `records`, splitting only on `attributes`.
    ///
    /// Every attribute stays eligible at every depth. Records are scanned in
    /// the order given, which fixes the tie-breaking order among equal-gain
    /// splits. A successful call replaces any previously trained root; on
    /// error the tree is left as it was.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                          |
    /// |---------------------------------------|-----------------------------------------------|
    /// | [`RfError::EmptyInput`]               | `records` is empty                            |
    /// | [`RfError::AttributeIndexOutOfRange`] | a record is too short for an index in `attributes` |
    #[instrument(skip_all, fields(n_records = records.len(), n_attributes = attributes.len()))]
    pub fn train<R: Borrow<Record>>(
        &mut self,
        records: &[R],
        attributes: &[usize],
    ) -> Result<(), RfError> {
        validate_records(records, attributes)?;

        let records: Vec<&Record> = records.iter().map(Borrow::borrow).collect();
        let root = grow(&records, attributes);

        debug!(
            depth = root.depth(),
            n_nodes = root.n_nodes(),
            n_leaves = root.n_leaves(),
            "decision tree built"
        );

        self.required_attributes = root.max_attribute().map_or(0, |a| a + 1);
        self.root = Some(root);
        Ok(())
    }

    /// Predict the label of one sample by walking from the root to a leaf.
    ///
    /// At each decision node the sample goes left when its value at the
    /// node's attribute equals the node's value, right otherwise.
    ///
    /// # Errors
    ///
    /// | Variant                                    | When                                     |
    /// |--------------------------------------------|------------------------------------------|
    /// | [`RfError::UntrainedModel`]                | called before a successful `train`       |
    /// | [`RfError::PredictionAttributeOutOfRange`] | `sample` is shorter than an attribute index used by the tree |
    pub fn predict<S: AsRef<str>>(&self, sample: &[S]) -> Result<Label, RfError> {
        let root = self.root.as_ref().ok_or(RfError::UntrainedModel)?;
        if sample.len() < self.required_attributes {
            return Err(RfError::PredictionAttributeOutOfRange {
                attribute_index: self.required_attributes - 1,
                got: sample.len(),
            });
        }
        Ok(root.route(sample))
    }

    /// Return the root node, if trained.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Return `true` once `train` has succeeded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.root.is_some()
    }

    /// Return the number of attribute values a sample needs for prediction.
    #[must_use]
    pub fn required_attributes(&self) -> usize {
        self.required_attributes
    }

    /// Return the maximum depth. A single-leaf tree (or an untrained one) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Return the total number of nodes (decisions and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.root.as_ref().map_or(0, Node::n_nodes)
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Node::n_leaves)
    }
}

/// Recursively grow a subtree over `records`.
fn grow(records: &[&Record], attributes: &[usize]) -> Node {
    let Some(split) = find_best_split(records, attributes) else {
        return Node::Leaf {
            label: label_counts(records).majority(),
        };
    };

    trace!(
        attribute = split.attribute.index(),
        value = split.value,
        gain = split.gain,
        n_left = split.left.len(),
        n_right = split.right.len(),
        "accepted split"
    );

    Node::Decision {
        attribute: split.attribute,
        value: split.value.to_string(),
        left: Box::new(grow_child(&split.left, attributes)),
        right: Box::new(grow_child(&split.right, attributes)),
    }
}

/// Emit a leaf directly for a pure side, otherwise recurse.
fn grow_child(records: &[&Record], attributes: &[usize]) -> Node {
    match uniform_label(records) {
        Some(label) => Node::Leaf { label },
        None => grow(records, attributes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AttributeIndex;

    fn record(label: Label, attrs: &[&str]) -> Record {
        Record::new(label, attrs.iter().map(|s| s.to_string()).collect())
    }

    fn two_positive_one_negative() -> Vec<Record> {
        vec![
            record(Label::Positive, &["x"]),
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["y"]),
        ]
    }

    #[test]
    fn empty_input_error() {
        let records: Vec<Record> = vec![];
        let err = DecisionTree::new().train(&records, &[0]).unwrap_err();
        assert!(matches!(err, RfError::EmptyInput));
    }

    #[test]
    fn attribute_out_of_range_error() {
        let records = vec![
            record(Label::Positive, &["x", "y"]),
            record(Label::Negative, &["x"]),
        ];
        let err = DecisionTree::new().train(&records, &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            RfError::AttributeIndexOutOfRange {
                record_index: 1,
                attribute_index: 1,
                n_attributes: 1,
            }
        ));
    }

    #[test]
    fn predict_before_train_error() {
        let err = DecisionTree::new().predict(&["x"]).unwrap_err();
        assert!(matches!(err, RfError::UntrainedModel));
    }

    #[test]
    fn pure_records_single_leaf() {
        let records = vec![
            record(Label::Positive, &["x", "o"]),
            record(Label::Positive, &["o", "o"]),
            record(Label::Positive, &["b", "x"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[0, 1]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&["anything", "else"]).unwrap(), Label::Positive);
        // A lone leaf references no attribute, so any sample length works.
        let empty: [&str; 0] = [];
        assert_eq!(tree.predict(&empty).unwrap(), Label::Positive);
    }

    #[test]
    fn simple_split_scenario() {
        let mut tree = DecisionTree::new();
        tree.train(&two_positive_one_negative(), &[0]).unwrap();

        let expected = Node::Decision {
            attribute: AttributeIndex::new(0),
            value: "x".to_string(),
            left: Box::new(Node::Leaf { label: Label::Positive }),
            right: Box::new(Node::Leaf { label: Label::Negative }),
        };
        assert_eq!(tree.root(), Some(&expected));
        assert_eq!(tree.predict(&["x"]).unwrap(), Label::Positive);
        assert_eq!(tree.predict(&["y"]).unwrap(), Label::Negative);
        // Unseen values take the right branch.
        assert_eq!(tree.predict(&["z"]).unwrap(), Label::Negative);
    }

    #[test]
    fn zero_gain_majority_leaf() {
        // XOR: no single equality split has positive gain.
        let records = vec![
            record(Label::Negative, &["0", "0"]),
            record(Label::Positive, &["0", "1"]),
            record(Label::Positive, &["1", "0"]),
            record(Label::Negative, &["1", "1"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[0, 1]).unwrap();
        assert!(tree.root().unwrap().is_leaf());
        // 2 vs 2 resolves to negative.
        assert_eq!(tree.predict(&["0", "1"]).unwrap(), Label::Negative);
    }

    #[test]
    fn zero_gain_strict_majority_positive() {
        let records = vec![
            record(Label::Positive, &["a"]),
            record(Label::Positive, &["a"]),
            record(Label::Negative, &["a"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[0]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&["b"]).unwrap(), Label::Positive);
    }

    #[test]
    fn attribute_reused_at_depth() {
        // positive iff a0 == "x" or (a0 == "b" and a1 == "y").
        // (0,"x") and (0,"o") tie at the root; at depth 1 (0,"o"), (0,"b")
        // and (1,"y") tie. The first candidate wins both times.
        let records = vec![
            record(Label::Positive, &["x", "y"]),
            record(Label::Positive, &["x", "n"]),
            record(Label::Negative, &["o", "y"]),
            record(Label::Negative, &["o", "n"]),
            record(Label::Positive, &["b", "y"]),
            record(Label::Negative, &["b", "n"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[0, 1]).unwrap();

        let leaf = |label| Box::new(Node::Leaf { label });
        let expected = Node::Decision {
            attribute: AttributeIndex::new(0),
            value: "x".to_string(),
            left: leaf(Label::Positive),
            right: Box::new(Node::Decision {
                attribute: AttributeIndex::new(0),
                value: "o".to_string(),
                left: leaf(Label::Negative),
                right: Box::new(Node::Decision {
                    attribute: AttributeIndex::new(1),
                    value: "y".to_string(),
                    left: leaf(Label::Positive),
                    right: leaf(Label::Negative),
                }),
            }),
        };
        assert_eq!(tree.root(), Some(&expected));
        assert_eq!(tree.depth(), 3);
        for r in &records {
            assert_eq!(tree.predict(r.attributes()).unwrap(), r.label());
        }
    }

    #[test]
    fn reproduces_training_labels() {
        let records = vec![
            record(Label::Positive, &["x", "x", "o"]),
            record(Label::Positive, &["x", "o", "o"]),
            record(Label::Negative, &["o", "x", "o"]),
            record(Label::Negative, &["o", "o", "x"]),
            record(Label::Positive, &["o", "x", "x"]),
            record(Label::Negative, &["b", "b", "b"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[0, 1, 2]).unwrap();
        for r in &records {
            assert_eq!(tree.predict(r.attributes()).unwrap(), r.label());
        }
    }

    #[test]
    fn unused_attribute_is_never_tested() {
        let records = vec![
            record(Label::Positive, &["x", "p"]),
            record(Label::Negative, &["x", "n"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[0]).unwrap();
        assert!(tree.root().unwrap().is_leaf());
    }

    #[test]
    fn prediction_sample_too_short() {
        let records = vec![
            record(Label::Positive, &["a", "x"]),
            record(Label::Negative, &["a", "y"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&records, &[1]).unwrap();
        assert_eq!(tree.required_attributes(), 2);
        let err = tree.predict(&["a"]).unwrap_err();
        assert!(matches!(
            err,
            RfError::PredictionAttributeOutOfRange { attribute_index: 1, got: 1 }
        ));
    }

    #[test]
    fn retrain_replaces_root() {
        let mut tree = DecisionTree::new();
        tree.train(&two_positive_one_negative(), &[0]).unwrap();
        assert_eq!(tree.n_nodes(), 3);

        let pure = vec![record(Label::Negative, &["x"])];
        tree.train(&pure, &[0]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&["x"]).unwrap(), Label::Negative);
    }

    #[test]
    fn failed_train_keeps_previous_root() {
        let mut tree = DecisionTree::new();
        tree.train(&two_positive_one_negative(), &[0]).unwrap();
        let records: Vec<Record> = vec![];
        assert!(tree.train(&records, &[0]).is_err());
        assert_eq!(tree.predict(&["x"]).unwrap(), Label::Positive);
    }

    #[test]
    fn train_accepts_borrowed_records() {
        let owned = two_positive_one_negative();
        let borrowed: Vec<&Record> = owned.iter().collect();
        let mut tree = DecisionTree::new();
        tree.train(&borrowed, &[0]).unwrap();
        assert_eq!(tree.predict(&["y"]).unwrap(), Label::Negative);
    }
}
