//! Random Forest training with optional parallel tree construction.

use std::borrow::Borrow;
use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::{OobMode, RandomForestConfig, TrainingMode};
use crate::error::RfError;
use crate::oob::{OobScore, compute_oob};
use crate::record::Record;
use crate::tree::{DecisionTree, validate_records};

/// A bagged ensemble of decision trees.
///
/// Each tree is trained on its own bootstrap sample and its own random
/// attribute subset; prediction is a majority vote (see [`RandomForest::predict`]).
#[derive(Debug, Clone, Default)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) attribute_subsets: Vec<Vec<usize>>,
    pub(crate) required_attributes: usize,
    pub(crate) oob_score: Option<OobScore>,
}

/// One trained ensemble member plus the bookkeeping needed for OOB scoring.
struct Member {
    tree: DecisionTree,
    attributes: Vec<usize>,
    oob_indices: Vec<usize>,
}

/// Draw `n_records` indices uniformly with replacement from `0..n_records`.
///
/// Returns the bootstrap indices and the sorted out-of-bag indices (those
/// never drawn).
pub(crate) fn bootstrap_sample(n_records: usize, rng: &mut impl Rng) -> (Vec<usize>, Vec<usize>) {
    let mut in_bag = vec![false; n_records];
    let mut bootstrap_indices = Vec::with_capacity(n_records);
    for _ in 0..n_records {
        let idx = rng.gen_range(0..n_records);
        bootstrap_indices.push(idx);
        in_bag[idx] = true;
    }
    let oob_indices: Vec<usize> = (0..n_records).filter(|&i| !in_bag[i]).collect();
    (bootstrap_indices, oob_indices)
}

/// Drop repeated attribute indices, keeping first-appearance order.
pub(crate) fn distinct_attributes(attributes: &[usize]) -> Vec<usize> {
    let mut seen = HashSet::new();
    attributes.iter().copied().filter(|&a| seen.insert(a)).collect()
}

/// Pick `amount` entries from distinct positions of `attributes`, uniformly at random.
///
/// Callers guarantee `amount <= attributes.len()` and that `attributes` holds
/// no repeated index.
pub(crate) fn sample_attributes(
    attributes: &[usize],
    amount: usize,
    rng: &mut impl Rng,
) -> Vec<usize> {
    index::sample(rng, attributes.len(), amount)
        .into_iter()
        .map(|position| attributes[position])
        .collect()
}

impl RandomForest {
    /// Create an empty, untrained forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Train `config.tree_count()` trees on bootstrap samples of `records`.
    ///
    /// `rng` supplies one seed per tree; each tree then draws its bootstrap
    /// sample and its `config.attributes_per_tree()` attributes from a
    /// `ChaCha8Rng` of its own, so sequential and parallel training build the
    /// same forest from the same `rng` state.
    ///
    /// Repeated indices in `attributes` count once. Each tree sees its records
    /// in bootstrap draw order, which fixes its tie-breaks between equal-gain
    /// splits.
    ///
    /// All inputs are validated before any tree is built. The previous
    /// ensemble is replaced only once the new one is complete.
    ///
    /// # Errors
    ///
    /// | Variant                               | When                                                   |
    /// |---------------------------------------|--------------------------------------------------------|
    /// | [`RfError::EmptyInput`]               | `records` is empty                                     |
    /// | [`RfError::InsufficientAttributes`]   | fewer distinct `attributes` than `config.attributes_per_tree()` |
    /// | [`RfError::AttributeIndexOutOfRange`] | a record is too short for an index in `attributes`     |
    /// | [`RfError::OobEvaluationFailed`]      | OOB enabled but no record has any OOB tree             |
    #[instrument(skip_all, fields(n_trees = config.tree_count, n_records = records.len()))]
    pub fn train<R: Borrow<Record> + Sync>(
        &mut self,
        records: &[R],
        attributes: &[usize],
        config: &RandomForestConfig,
        rng: &mut impl Rng,
    ) -> Result<(), RfError> {
        // --- Validate inputs ---
        if records.is_empty() {
            return Err(RfError::EmptyInput);
        }
        let attributes = distinct_attributes(attributes);
        if attributes.len() < config.attributes_per_tree {
            return Err(RfError::InsufficientAttributes {
                requested: config.attributes_per_tree,
                available: attributes.len(),
            });
        }
        validate_records(records, &attributes)?;

        let n_records = records.len();
        let attributes_per_tree = config.attributes_per_tree;

        info!(
            n_trees = config.tree_count,
            n_records,
            n_attributes = attributes.len(),
            attributes_per_tree,
            mode = ?config.training_mode,
            "training random forest"
        );

        // Generate per-tree seeds from the caller's RNG.
        let tree_seeds: Vec<u64> = (0..config.tree_count).map(|_| rng.r#gen()).collect();

        let build = |seed: u64| -> Result<Member, RfError> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (bootstrap_indices, oob_indices) = bootstrap_sample(n_records, &mut rng);
            let subset = sample_attributes(&attributes, attributes_per_tree, &mut rng);

            let sample: Vec<&Record> = bootstrap_indices
                .iter()
                .map(|&i| records[i].borrow())
                .collect();

            let mut tree = DecisionTree::new();
            tree.train(&sample, &subset)?;

            debug!(
                attributes = ?subset,
                n_oob = oob_indices.len(),
                depth = tree.depth(),
                n_nodes = tree.n_nodes(),
                "tree trained"
            );

            Ok(Member {
                tree,
                attributes: subset,
                oob_indices,
            })
        };

        let members: Vec<Member> = match config.training_mode {
            TrainingMode::Sequential => tree_seeds
                .into_iter()
                .map(build)
                .collect::<Result<_, _>>()?,
            TrainingMode::Parallel => tree_seeds
                .into_par_iter()
                .map(build)
                .collect::<Result<_, _>>()?,
        };

        let mut trees = Vec::with_capacity(members.len());
        let mut attribute_subsets = Vec::with_capacity(members.len());
        let mut oob_indices_per_tree = Vec::with_capacity(members.len());
        for member in members {
            trees.push(member.tree);
            attribute_subsets.push(member.attributes);
            oob_indices_per_tree.push(member.oob_indices);
        }

        let oob_score = match config.oob_mode {
            OobMode::Enabled => Some(compute_oob(&trees, records, &oob_indices_per_tree)?),
            OobMode::Disabled => None,
        };

        self.required_attributes = trees
            .iter()
            .map(DecisionTree::required_attributes)
            .max()
            .unwrap_or(0);
        self.trees = trees;
        self.attribute_subsets = attribute_subsets;
        self.oob_score = oob_score;

        info!(
            oob_accuracy = self.oob_score.as_ref().map(|s| s.accuracy),
            "random forest training complete"
        );

        Ok(())
    }

    /// Borrow the trained trees in ensemble order.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Return the attribute subset each tree was restricted to, in ensemble order.
    #[must_use]
    pub fn attribute_subsets(&self) -> &[Vec<usize>] {
        &self.attribute_subsets
    }

    /// Return the OOB score, if it was computed.
    #[must_use]
    pub fn oob_score(&self) -> Option<&OobScore> {
        self.oob_score.as_ref()
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return `true` once `train` has succeeded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }
}
