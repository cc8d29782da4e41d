//! Veltree CLI: builds velocity trees from JSON matrices.
//!
//! Usage:
//!   veltree cluster --input cluster.json [--output tree.json] [--config path]
//!   veltree cell --input cell.json [--output graph.json] [--config path]
//!   veltree augment --states x.json --velocity v.json [--blend 0.5]
//!
//! Matrices are JSON arrays of rows.

use clap::{ArgAction, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use veltree::matrix::{from_rows, to_rows};
use veltree::{
    augment_with_velocity, Branch, BranchVerdict, CellVelocityTree, ClusterOrdering,
    ClusterVelocityTree, SegmentDecomposition, VelocityConfig, VelocityError, VelocityResult,
};

#[derive(Parser)]
#[command(
    name = "veltree",
    version,
    about = "Velocity-tree construction for single-cell trajectories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Orient a cluster spanning tree
    Cluster {
        /// JSON with transition_matrix, assignments, spanning_tree and ordering or ranks
        #[arg(long)]
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Contract an augmented cell tree and vote branch directions
    Cell {
        /// JSON with tree, z, y and optionally branches or root
        #[arg(long)]
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Stack cell states with their velocity-shifted duplicates
    Augment {
        /// JSON matrix of cell states (cells x features)
        #[arg(long)]
        states: PathBuf,
        /// JSON matrix of velocities, same shape as states
        #[arg(long)]
        velocity: PathBuf,
        /// Velocity time step (defaults to the config's blend_factor)
        #[arg(long)]
        blend: Option<f64>,
        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Deserialize)]
struct ClusterInput {
    transition_matrix: Vec<Vec<f64>>,
    assignments: Vec<Vec<f64>>,
    spanning_tree: Vec<Vec<f64>>,
    #[serde(default)]
    ordering: Option<Vec<usize>>,
    #[serde(default)]
    ranks: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct ClusterOutput {
    cluster_transitions: Vec<Vec<f64>>,
    forward_likelihood: Vec<f64>,
    reverse_likelihood: Vec<f64>,
    velocity_tree: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct CellInput {
    tree: Vec<Vec<f64>>,
    z: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    #[serde(default)]
    branches: Option<Vec<Branch>>,
    #[serde(default)]
    root: usize,
}

#[derive(Serialize)]
struct CellOutput {
    contracted_tree: Vec<Vec<f64>>,
    directed_graph: Vec<Vec<f64>>,
    edges: Vec<(usize, usize)>,
    verdicts: Vec<BranchVerdict>,
    positions: Vec<Vec<f64>>,
}

fn init_logging(config: &VelocityConfig, verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::from_str(&config.log_level).unwrap_or(tracing::Level::INFO),
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> VelocityResult<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json<T: Serialize>(output: Option<&Path>, value: &T) -> VelocityResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, text + "\n")?,
        None => println!("{}", text),
    }
    Ok(())
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn run_cluster(input: &Path) -> CliResult<ClusterOutput> {
    let input: ClusterInput = read_json(input)?;
    let transitions = from_rows(&input.transition_matrix)?;
    let assignments = from_rows(&input.assignments)?;
    let spanning_tree = from_rows(&input.spanning_tree)?;
    let clusters = assignments.ncols();
    let ordering = match (input.ordering, input.ranks) {
        (Some(order), _) => ClusterOrdering::new(order, clusters)?,
        (None, Some(ranks)) if ranks.len() != clusters => {
            return Err(VelocityError::ShapeMismatch {
                what: "ranks length",
                expected: clusters,
                found: ranks.len(),
            }
            .into())
        }
        (None, Some(ranks)) => ClusterOrdering::from_ranks(&ranks),
        (None, None) => return Err("input needs either 'ordering' or 'ranks'".into()),
    };

    let result =
        ClusterVelocityTree::new(&transitions, &assignments).build(&spanning_tree, &ordering)?;
    Ok(ClusterOutput {
        cluster_transitions: to_rows(&result.cluster_transitions),
        forward_likelihood: result.forward.values().to_vec(),
        reverse_likelihood: result.reverse.values().to_vec(),
        velocity_tree: to_rows(result.velocity_tree.as_matrix()),
    })
}

fn run_cell(config: VelocityConfig, input: &Path) -> CliResult<CellOutput> {
    let input: CellInput = read_json(input)?;
    let tree = from_rows(&input.tree)?;
    let z = from_rows(&input.z)?;
    let y = from_rows(&input.y)?;

    let builder = CellVelocityTree::new(config);
    let result = match input.branches {
        Some(branches) => builder.build(&tree, &z, &y, &branches)?,
        None => builder.build(&tree, &z, &y, &SegmentDecomposition::from_root(input.root))?,
    };

    let voted = result.voted;
    Ok(CellOutput {
        contracted_tree: to_rows(&result.contracted.to_matrix()),
        edges: voted.graph.edges(),
        directed_graph: to_rows(voted.graph.as_matrix()),
        verdicts: voted.verdicts,
        positions: to_rows(&voted.positions),
    })
}

fn run_augment(states: &Path, velocity: &Path, blend: f64) -> CliResult<Vec<Vec<f64>>> {
    let states = from_rows(&read_json::<Vec<Vec<f64>>>(states)?)?;
    let velocity = from_rows(&read_json::<Vec<Vec<f64>>>(velocity)?)?;
    Ok(to_rows(&augment_with_velocity(&states, &velocity, blend)?))
}

/// Write the result, or report the error; returns the exit code
fn finish<T: Serialize>(result: CliResult<T>, output: Option<&Path>) -> i32 {
    match result.and_then(|value| Ok(write_json(output, &value)?)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = match VelocityConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config, cli.verbose);

    let code = match cli.command {
        Commands::Cluster { input, output } => finish(run_cluster(&input), output.as_deref()),
        Commands::Cell { input, output } => finish(run_cell(config, &input), output.as_deref()),
        Commands::Augment {
            states,
            velocity,
            blend,
            output,
        } => {
            let blend = blend.unwrap_or(config.blend_factor);
            finish(run_augment(&states, &velocity, blend), output.as_deref())
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(value: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn chain_input(extra: serde_json::Value) -> NamedTempFile {
        let mut input = json!({
            "transition_matrix": [[0.0, 2.0, 0.0], [2.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
            "assignments": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            "spanning_tree": [[0.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]]
        });
        if let (Some(input), Some(extra)) = (input.as_object_mut(), extra.as_object()) {
            input.extend(extra.clone());
        }
        json_file(input)
    }

    #[test]
    fn test_cluster_from_ranks() {
        let file = chain_input(json!({ "ranks": [0.0, 1.0, 2.0] }));
        let output = run_cluster(file.path()).unwrap();
        assert_eq!(output.forward_likelihood, vec![0.0, 0.0]);
        assert_eq!(
            output.velocity_tree,
            vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_cluster_explicit_ordering_wins_over_ranks() {
        let file = chain_input(json!({ "ordering": [2, 1, 0], "ranks": [0.0, 1.0, 2.0] }));
        let output = run_cluster(file.path()).unwrap();
        assert_eq!(
            output.velocity_tree,
            vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]
        );
    }

    #[test]
    fn test_cluster_rejects_short_ranks() {
        let file = chain_input(json!({ "ranks": [0.3, 0.1] }));
        let err = run_cluster(file.path()).unwrap_err();
        let err = err.downcast_ref::<VelocityError>().unwrap();
        assert!(matches!(
            err,
            VelocityError::ShapeMismatch { what: "ranks length", expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_cluster_needs_ordering_or_ranks() {
        let file = chain_input(json!({}));
        let err = run_cluster(file.path()).unwrap_err();
        assert!(err.to_string().contains("ordering"));
    }

    fn two_cell_input(extra: serde_json::Value) -> NamedTempFile {
        let mut input = json!({
            "tree": [
                [0.0, 1.0, 0.2, 0.0],
                [1.0, 0.0, 0.0, 0.2],
                [0.2, 0.0, 0.0, 0.0],
                [0.0, 0.2, 0.0, 0.0]
            ],
            "z": [[0.0, 0.0], [1.0, 0.0], [0.4, 0.1], [1.4, 0.1]],
            "y": [[0.0, 0.0], [1.0, 0.0]]
        });
        if let (Some(input), Some(extra)) = (input.as_object_mut(), extra.as_object()) {
            input.extend(extra.clone());
        }
        json_file(input)
    }

    #[test]
    fn test_cell_defaults_to_root_zero_decomposition() {
        let file = two_cell_input(json!({}));
        let output = run_cell(VelocityConfig::default(), file.path()).unwrap();
        assert_eq!(output.edges, vec![(0, 1)]);
        assert_eq!(output.verdicts.len(), 1);
        assert_eq!(output.verdicts[0].start, 0);
        assert_eq!(output.contracted_tree, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn test_cell_uses_supplied_branches() {
        let file = two_cell_input(json!({ "branches": [[1, 0]] }));
        let output = run_cell(VelocityConfig::default(), file.path()).unwrap();
        assert_eq!(output.edges, vec![(0, 1)]);
        assert_eq!(output.verdicts[0].start, 1);
        assert_eq!(output.verdicts[0].direction, veltree::BranchDirection::Backward);
    }

    #[test]
    fn test_augment_uses_blend() {
        let states = json_file(json!([[0.0, 0.0], [1.0, 1.0]]));
        let velocity = json_file(json!([[2.0, 0.0], [0.0, 2.0]]));
        let rows = run_augment(states.path(), velocity.path(), 0.25).unwrap();
        assert_eq!(rows[2], vec![0.5, 0.0]);
        assert_eq!(rows[3], vec![1.0, 1.5]);
    }
}
