//! Configuration builder for Random Forest training.

use std::borrow::Borrow;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::record::Record;

/// Default size of the per-tree random attribute subsample.
pub const DEFAULT_ATTRIBUTES_PER_TREE: usize = 9;

/// Whether to compute out-of-bag evaluation during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OobMode {
    /// Compute OOB accuracy and confusion matrix.
    Enabled,
    /// Skip OOB evaluation.
    Disabled,
}

/// How the ensemble's trees are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingMode {
    /// One tree after another on the calling thread.
    Sequential,
    /// Trees built concurrently on the rayon thread pool.
    Parallel,
}

/// Configuration for Random Forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter             | Default      |
/// |-----------------------|--------------|
/// | `attributes_per_tree` | 9            |
/// | `seed`                | 42           |
/// | `oob_mode`            | `Disabled`   |
/// | `training_mode`       | `Sequential` |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) tree_count: usize,
    pub(crate) attributes_per_tree: usize,
    pub(crate) seed: u64,
    pub(crate) oob_mode: OobMode,
    pub(crate) training_mode: TrainingMode,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] if `tree_count` is zero.
    pub fn new(tree_count: usize) -> Result<Self, RfError> {
        if tree_count == 0 {
            return Err(RfError::InvalidTreeCount { tree_count });
        }
        Ok(Self {
            tree_count,
            attributes_per_tree: DEFAULT_ATTRIBUTES_PER_TREE,
            seed: 42,
            oob_mode: OobMode::Disabled,
            training_mode: TrainingMode::Sequential,
        })
    }

    // --- Setters ---

    /// Set how many distinct attributes each tree may split on.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidAttributesPerTree`] if `attributes_per_tree` is zero.
    pub fn with_attributes_per_tree(mut self, attributes_per_tree: usize) -> Result<Self, RfError> {
        if attributes_per_tree == 0 {
            return Err(RfError::InvalidAttributesPerTree { attributes_per_tree });
        }
        self.attributes_per_tree = attributes_per_tree;
        Ok(self)
    }

    /// Set the random seed used by [`RandomForestConfig::fit`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the OOB evaluation mode.
    #[must_use]
    pub fn with_oob_mode(mut self, oob_mode: OobMode) -> Self {
        self.oob_mode = oob_mode;
        self
    }

    /// Set whether trees are built sequentially or in parallel.
    #[must_use]
    pub fn with_training_mode(mut self, training_mode: TrainingMode) -> Self {
        self.training_mode = training_mode;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    /// Return the per-tree attribute subsample size.
    #[must_use]
    pub fn attributes_per_tree(&self) -> usize {
        self.attributes_per_tree
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the OOB evaluation mode.
    #[must_use]
    pub fn oob_mode(&self) -> OobMode {
        self.oob_mode
    }

    /// Return the training mode.
    #[must_use]
    pub fn training_mode(&self) -> TrainingMode {
        self.training_mode
    }

    /// Train a fresh Random Forest with an RNG seeded from this config.
    ///
    /// Equivalent to [`RandomForest::train`] with a `ChaCha8Rng` seeded
    /// from [`RandomForestConfig::seed`].
    ///
    /// # Errors
    ///
    /// Same as [`RandomForest::train`].
    pub fn fit<R: Borrow<Record> + Sync>(
        &self,
        records: &[R],
        attributes: &[usize],
    ) -> Result<RandomForest, RfError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut forest = RandomForest::new();
        forest.train(records, attributes, self, &mut rng)?;
        Ok(forest)
    }
}
