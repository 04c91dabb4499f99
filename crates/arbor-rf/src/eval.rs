//! Hold-out evaluation of trained classifiers.

use tracing::{info, instrument};

use crate::confusion::ConfusionMatrix;
use crate::error::RfError;
use crate::forest::RandomForest;
use crate::label::Label;
use crate::record::Record;
use crate::tree::DecisionTree;

/// A trained model that assigns a label to a record's attribute values.
pub trait Classifier {
    /// Predict the label of `record`, ignoring the record's own label.
    ///
    /// # Errors
    ///
    /// Model-specific; see [`DecisionTree::predict`] and [`RandomForest::predict`].
    fn classify(&self, record: &Record) -> Result<Label, RfError>;
}

impl Classifier for DecisionTree {
    fn classify(&self, record: &Record) -> Result<Label, RfError> {
        self.predict(record.attributes())
    }
}

impl Classifier for RandomForest {
    fn classify(&self, record: &Record) -> Result<Label, RfError> {
        self.predict(record.attributes())
    }
}

/// Predict every record in a held-out set and tally the results.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`RfError::EmptyInput`] | `records` is empty |
/// | Other errors | From the model's prediction |
#[instrument(skip_all, fields(n_records = records.len()))]
pub fn evaluate<C: Classifier + ?Sized>(
    model: &C,
    records: &[Record],
) -> Result<ConfusionMatrix, RfError> {
    if records.is_empty() {
        return Err(RfError::EmptyInput);
    }
    let mut matrix = ConfusionMatrix::default();
    for record in records {
        matrix.record(record.label(), model.classify(record)?);
    }
    info!(
        accuracy = matrix.accuracy(),
        n_records = matrix.total(),
        "evaluation complete"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: Label, attrs: &[&str]) -> Record {
        Record::new(label, attrs.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_holdout_error() {
        let mut tree = DecisionTree::new();
        tree.train(&[record(Label::Positive, &["x"])], &[0]).unwrap();
        let err = evaluate(&tree, &[]).unwrap_err();
        assert!(matches!(err, RfError::EmptyInput));
    }

    #[test]
    fn untrained_model_error() {
        let err = evaluate(&DecisionTree::new(), &[record(Label::Positive, &["x"])]).unwrap_err();
        assert!(matches!(err, RfError::UntrainedModel));
    }

    #[test]
    fn tree_holdout_accuracy() {
        let train = vec![
            record(Label::Positive, &["x"]),
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["y"]),
        ];
        let holdout = vec![
            record(Label::Positive, &["x"]),
            record(Label::Negative, &["y"]),
            record(Label::Positive, &["z"]),
            record(Label::Negative, &["x"]),
        ];
        let mut tree = DecisionTree::new();
        tree.train(&train, &[0]).unwrap();

        let matrix = evaluate(&tree, &holdout).unwrap();
        assert_eq!(matrix.true_positive, 1);
        assert_eq!(matrix.true_negative, 1);
        assert_eq!(matrix.false_negative, 1);
        assert_eq!(matrix.false_positive, 1);
        assert!((matrix.accuracy() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn works_through_trait_object() {
        let mut tree = DecisionTree::new();
        tree.train(&[record(Label::Negative, &["x"])], &[0]).unwrap();
        let model: Box<dyn Classifier> = Box::new(tree);
        let matrix = evaluate(model.as_ref(), &[record(Label::Negative, &["o"])]).unwrap();
        assert_eq!(matrix.true_negative, 1);
    }
}
