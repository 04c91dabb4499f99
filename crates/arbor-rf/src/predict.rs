//! Prediction methods for the Random Forest ensemble.

use std::borrow::Borrow;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::label::{Label, LabelCounts};
use crate::record::Record;

impl RandomForest {
    /// Predict the label of one sample by majority vote across all trees.
    ///
    /// `positive` wins only with strictly more votes; ties go to `negative`.
    ///
    /// # Errors
    ///
    /// Same as [`RandomForest::votes`].
    pub fn predict<S: AsRef<str>>(&self, sample: &[S]) -> Result<Label, RfError> {
        Ok(self.votes(sample)?.majority())
    }

    /// Collect every tree's prediction for one sample into a vote tally.
    ///
    /// # Errors
    ///
    /// | Variant                                    | When                                  |
    /// |--------------------------------------------|---------------------------------------|
    /// | [`RfError::UntrainedModel`]                | called before a successful `train`    |
    /// | [`RfError::PredictionAttributeOutOfRange`] | `sample` is shorter than an attribute index used by any tree |
    pub fn votes<S: AsRef<str>>(&self, sample: &[S]) -> Result<LabelCounts, RfError> {
        if self.trees.is_empty() {
            return Err(RfError::UntrainedModel);
        }
        if sample.len() < self.required_attributes {
            return Err(RfError::PredictionAttributeOutOfRange {
                attribute_index: self.required_attributes - 1,
                got: sample.len(),
            });
        }
        let mut votes = LabelCounts::default();
        for tree in &self.trees {
            votes.add(tree.predict(sample)?);
        }
        Ok(votes)
    }

    /// Predict labels for a batch of records in parallel.
    ///
    /// Only each record's attribute values are used; its own label is ignored.
    ///
    /// # Errors
    ///
    /// Returns the first error any record produces; see [`RandomForest::votes`].
    pub fn predict_batch<R: Borrow<Record> + Sync>(
        &self,
        records: &[R],
    ) -> Result<Vec<Label>, RfError> {
        records
            .into_par_iter()
            .map(|record| {
                let record: &Record = record.borrow();
                self.predict(record.attributes())
            })
            .collect()
    }

    /// Return the number of attribute values a sample needs for prediction.
    #[must_use]
    pub fn required_attributes(&self) -> usize {
        self.required_attributes
    }
}
