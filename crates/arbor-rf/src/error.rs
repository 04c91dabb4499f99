/// Errors from decision tree and random forest operations.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when training or evaluation is called with zero records.
    #[error("input has zero records")]
    EmptyInput,

    /// Returned when a training record is too short for a requested attribute index.
    #[error("record {record_index} has {n_attributes} attributes, cannot index attribute {attribute_index}")]
    AttributeIndexOutOfRange {
        /// The zero-based index of the offending record.
        record_index: usize,
        /// The attribute index that could not be resolved.
        attribute_index: usize,
        /// The number of attribute values the record carries.
        n_attributes: usize,
    },

    /// Returned when a prediction sample is shorter than the model requires.
    #[error("prediction input has {got} attributes, but the model references attribute {attribute_index}")]
    PredictionAttributeOutOfRange {
        /// The largest attribute index referenced by the model.
        attribute_index: usize,
        /// The actual number of attribute values in the sample.
        got: usize,
    },

    /// Returned when a forest is asked to subsample more attributes than are available.
    #[error("cannot sample {requested} attributes per tree from {available} available attributes")]
    InsufficientAttributes {
        /// The configured attributes_per_tree.
        requested: usize,
        /// The number of attribute indices passed to training.
        available: usize,
    },

    /// Returned when predict is called on a model that has not been trained.
    #[error("model has not been trained")]
    UntrainedModel,

    /// Returned when tree_count is zero.
    #[error("tree_count must be at least 1, got {tree_count}")]
    InvalidTreeCount {
        /// The invalid tree_count value provided.
        tree_count: usize,
    },

    /// Returned when attributes_per_tree is zero.
    #[error("attributes_per_tree must be at least 1, got {attributes_per_tree}")]
    InvalidAttributesPerTree {
        /// The invalid attributes_per_tree value provided.
        attributes_per_tree: usize,
    },

    /// Returned when a string is neither `positive` nor `negative`.
    #[error("unknown label \"{raw}\", expected \"positive\" or \"negative\"")]
    UnknownLabel {
        /// The raw string that failed to parse.
        raw: String,
    },

    /// Returned when OOB evaluation fails (no record has any OOB tree).
    #[error("OOB evaluation failed: {reason}")]
    OobEvaluationFailed {
        /// Human-readable description of why OOB evaluation failed.
        reason: String,
    },
}
