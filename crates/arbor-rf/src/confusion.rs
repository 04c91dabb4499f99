//! Confusion matrix and per-class classification metrics.

use std::fmt;

use crate::error::RfError;
use crate::label::Label;

/// A confusion matrix for binary classification.
///
/// Cells are named from the point of view of the `positive` class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ConfusionMatrix {
    /// True `positive`, predicted `positive`.
    pub true_positive: usize,
    /// True `negative`, predicted `positive`.
    pub false_positive: usize,
    /// True `negative`, predicted `negative`.
    pub true_negative: usize,
    /// True `positive`, predicted `negative`.
    pub false_negative: usize,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassMetrics {
    /// The class these metrics describe.
    pub label: Label,
    /// Precision: TP / (TP + FP). 0.0 if no predictions for this class.
    pub precision: f64,
    /// Recall: TP / (TP + FN). 0.0 if no true samples for this class.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of true samples in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from paired true and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::EmptyInput`] | Zero labels provided |
    pub fn from_labels(truth: &[Label], predicted: &[Label]) -> Result<Self, RfError> {
        if truth.is_empty() {
            return Err(RfError::EmptyInput);
        }
        let mut matrix = Self::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            matrix.record(t, p);
        }
        Ok(matrix)
    }

    /// Count one `(truth, predicted)` pair.
    pub fn record(&mut self, truth: Label, predicted: Label) {
        match (truth, predicted) {
            (Label::Positive, Label::Positive) => self.true_positive += 1,
            (Label::Negative, Label::Positive) => self.false_positive += 1,
            (Label::Negative, Label::Negative) => self.true_negative += 1,
            (Label::Positive, Label::Negative) => self.false_negative += 1,
        }
    }

    /// Return the number of samples counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.true_positive + self.true_negative) as f64 / total as f64
        }
    }

    /// Per-class precision, recall, F1, and support, `positive` first.
    #[must_use]
    pub fn class_metrics(&self) -> [ClassMetrics; 2] {
        [
            metrics(
                Label::Positive,
                self.true_positive,
                self.false_positive,
                self.false_negative,
            ),
            metrics(
                Label::Negative,
                self.true_negative,
                self.false_negative,
                self.false_positive,
            ),
        ]
    }
}

fn metrics(label: Label, tp: usize, fp: usize, fn_: usize) -> ClassMetrics {
    let support = tp + fn_;
    let precision = if tp + fp == 0 {
        0.0
    } else {
        tp as f64 / (tp + fp) as f64
    };
    let recall = if support == 0 {
        0.0
    } else {
        tp as f64 / support as f64
    };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    ClassMetrics {
        label,
        precision,
        recall,
        f1,
        support,
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>15} {:>15} {:>15}", "", "pred_positive", "pred_negative")?;
        writeln!(
            f,
            "{:>15} {:>15} {:>15}",
            "actual_positive", self.true_positive, self.false_negative
        )?;
        writeln!(
            f,
            "{:>15} {:>15} {:>15}",
            "actual_negative", self.false_positive, self.true_negative
        )
    }
}
