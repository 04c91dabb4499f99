//! Categorical decision trees and random forests for binary labels.
//!
//! A [`DecisionTree`] is grown greedily by information gain over equality
//! splits on categorical attribute values. A [`RandomForest`] trains many
//! trees on bootstrap samples, each restricted to a random subset of the
//! attributes, and predicts by majority vote.

mod config;
mod confusion;
mod error;
mod eval;
mod forest;
mod label;
mod node;
mod oob;
mod predict;
mod record;
mod split;
mod tree;

pub use config::{DEFAULT_ATTRIBUTES_PER_TREE, OobMode, RandomForestConfig, TrainingMode};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::RfError;
pub use eval::{Classifier, evaluate};
pub use forest::RandomForest;
pub use label::{Label, LabelCounts};
pub use node::{AttributeIndex, Node};
pub use oob::OobScore;
pub use record::Record;
pub use split::entropy;
pub use tree::DecisionTree;
