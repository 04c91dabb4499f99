//! Out-of-bag (OOB) evaluation for Random Forest.

use std::borrow::Borrow;

use crate::confusion::ConfusionMatrix;
use crate::error::RfError;
use crate::label::LabelCounts;
use crate::record::Record;
use crate::tree::DecisionTree;

/// Out-of-bag evaluation result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OobScore {
    /// OOB accuracy (fraction of correctly predicted OOB records).
    pub accuracy: f64,
    /// OOB confusion matrix.
    pub confusion_matrix: ConfusionMatrix,
    /// Number of records that had at least one OOB tree.
    pub n_oob_samples: usize,
}

/// Compute out-of-bag predictions and accuracy.
///
/// For each record, only trees whose bootstrap did NOT contain it vote
/// (majority, ties to `negative`). Records with no OOB tree are skipped.
pub(crate) fn compute_oob<R: Borrow<Record>>(
    trees: &[DecisionTree],
    records: &[R],
    oob_indices_per_tree: &[Vec<usize>],
) -> Result<OobScore, RfError> {
    let mut oob_votes = vec![LabelCounts::default(); records.len()];

    for (tree, oob_indices) in trees.iter().zip(oob_indices_per_tree) {
        for &record_idx in oob_indices {
            let record: &Record = records[record_idx].borrow();
            oob_votes[record_idx].add(tree.predict(record.attributes())?);
        }
    }

    let mut truth = Vec::new();
    let mut predicted = Vec::new();
    for (record, votes) in records.iter().zip(&oob_votes) {
        if votes.total() == 0 {
            continue;
        }
        let record: &Record = record.borrow();
        truth.push(record.label());
        predicted.push(votes.majority());
    }

    let n_oob_samples = truth.len();
    if n_oob_samples == 0 {
        return Err(RfError::OobEvaluationFailed {
            reason: "no record has any OOB tree".to_string(),
        });
    }

    let confusion_matrix = ConfusionMatrix::from_labels(&truth, &predicted)?;

    Ok(OobScore {
        accuracy: confusion_matrix.accuracy(),
        confusion_matrix,
        n_oob_samples,
    })
}
