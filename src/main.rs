use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use arbor_io::RecordReader;
use arbor_rf::{
    ClassMetrics, ConfusionMatrix, DEFAULT_ATTRIBUTES_PER_TREE, DecisionTree, OobMode,
    RandomForestConfig, TrainingMode, evaluate,
};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Categorical decision trees and random forests for binary labels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Train on one record file and report accuracy on another
    Evaluate {
        /// Path to the training record file
        #[arg(long, short = 't')]
        training: PathBuf,

        /// Path to the held-out record file
        #[arg(long)]
        testing: PathBuf,

        /// Model to train: "tree" or "forest"
        #[arg(long, short = 'm', default_value = "forest")]
        model: String,

        /// Number of trees in the forest
        #[arg(long, short = 'n', default_value_t = 20)]
        trees: usize,

        /// Attributes sampled for each tree of the forest
        #[arg(long, default_value_t = DEFAULT_ATTRIBUTES_PER_TREE)]
        attributes_per_tree: usize,

        /// Train forest trees on the rayon thread pool
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Score the forest on its out-of-bag records
        #[arg(long, default_value_t = false)]
        oob: bool,
    },

    /// Grow a single tree on every attribute and print it
    Tree {
        /// Path to the training record file
        #[arg(long, short = 't')]
        training: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ModelKind {
    Tree,
    Forest,
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput {
    model: ModelKind,
    n_training: usize,
    n_testing: usize,
    n_attributes: usize,
    accuracy: f64,
    accuracy_percent: f64,
    confusion_matrix: ConfusionMatrix,
    class_metrics: [ClassMetrics; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    forest: Option<ForestOutput>,
}

#[derive(Serialize)]
struct ForestOutput {
    n_trees: usize,
    attributes_per_tree: usize,
    attribute_subsets: Vec<Vec<usize>>,
    oob_accuracy: Option<f64>,
    n_oob_samples: Option<usize>,
}

#[derive(Serialize)]
struct TreeOutput<'a> {
    n_records: usize,
    n_attributes: usize,
    depth: usize,
    n_nodes: usize,
    n_leaves: usize,
    tree: &'a DecisionTree,
}

fn parse_model(s: &str) -> Result<ModelKind> {
    match s {
        "tree" => Ok(ModelKind::Tree),
        "forest" => Ok(ModelKind::Forest),
        other => anyhow::bail!("unknown model: {other} (expected tree or forest)"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate {
            training,
            testing,
            model,
            trees,
            attributes_per_tree,
            parallel,
            oob,
        } => {
            let model = parse_model(&model)?;

            // 1. Read both record files
            let train_set = RecordReader::new(&training)
                .read()
                .context("failed to read training records")?;
            let test_set = RecordReader::new(&testing)
                .read()
                .context("failed to read testing records")?;
            if test_set.n_attributes < train_set.n_attributes {
                anyhow::bail!(
                    "testing records have {} attributes, training records have {}",
                    test_set.n_attributes,
                    train_set.n_attributes
                );
            }
            let attributes = train_set.attribute_indices();

            // 2. Train and evaluate
            let (matrix, forest_output) = match model {
                ModelKind::Tree => {
                    let mut tree = DecisionTree::new();
                    tree.train(&train_set.records, &attributes)
                        .context("tree training failed")?;
                    info!(depth = tree.depth(), n_nodes = tree.n_nodes(), "tree trained");
                    let matrix =
                        evaluate(&tree, &test_set.records).context("tree evaluation failed")?;
                    (matrix, None)
                }
                ModelKind::Forest => {
                    let training_mode = if parallel {
                        TrainingMode::Parallel
                    } else {
                        TrainingMode::Sequential
                    };
                    let oob_mode = if oob {
                        OobMode::Enabled
                    } else {
                        OobMode::Disabled
                    };
                    let config = RandomForestConfig::new(trees)?
                        .with_attributes_per_tree(attributes_per_tree)?
                        .with_seed(cli.seed)
                        .with_oob_mode(oob_mode)
                        .with_training_mode(training_mode);
                    let forest = config
                        .fit(&train_set.records, &attributes)
                        .context("forest training failed")?;
                    let matrix = evaluate(&forest, &test_set.records)
                        .context("forest evaluation failed")?;
                    let forest_output = ForestOutput {
                        n_trees: forest.n_trees(),
                        attributes_per_tree,
                        attribute_subsets: forest.attribute_subsets().to_vec(),
                        oob_accuracy: forest.oob_score().map(|s| s.accuracy),
                        n_oob_samples: forest.oob_score().map(|s| s.n_oob_samples),
                    };
                    (matrix, Some(forest_output))
                }
            };
            info!(accuracy = matrix.accuracy(), "evaluation complete");
            info!("confusion matrix\n{matrix}");

            // 3. Print summary
            let output = EvaluateOutput {
                model,
                n_training: train_set.len(),
                n_testing: test_set.len(),
                n_attributes: train_set.n_attributes,
                accuracy: matrix.accuracy(),
                accuracy_percent: matrix.accuracy() * 100.0,
                confusion_matrix: matrix,
                class_metrics: matrix.class_metrics(),
                forest: forest_output,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Tree { training } => {
            let train_set = RecordReader::new(&training)
                .read()
                .context("failed to read training records")?;

            let mut tree = DecisionTree::new();
            tree.train(&train_set.records, &train_set.attribute_indices())
                .context("tree training failed")?;
            info!(depth = tree.depth(), n_leaves = tree.n_leaves(), "tree trained");

            let output = TreeOutput {
                n_records: train_set.len(),
                n_attributes: train_set.n_attributes,
                depth: tree.depth(),
                n_nodes: tree.n_nodes(),
                n_leaves: tree.n_leaves(),
                tree: &tree,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
