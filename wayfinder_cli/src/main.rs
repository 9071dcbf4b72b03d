use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use wayfinder_core::engine::{EngineParams, RouteEngine, RouteResult, StrategyKind};
use wayfinder_core::location::Location;
use wayfinder_core::matrix::CostMatrix;
use wayfinder_core::strategy::q_learning::QLearningParams;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with a `waypoints` map of id -> [x, y]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value = "arc-routing")]
    strategy: Strategy,

    /// Treat coordinates as (lon, lat) and build the matrix with
    /// haversine distances. The a-star strategy assumes planar
    /// coordinates and should not be combined with this.
    #[arg(long)]
    geodesic: bool,

    /// Training episodes for the q-learning strategy
    #[arg(long, default_value_t = 1000)]
    episodes: usize,

    /// RNG seed for reproducible q-learning runs
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    ArcRouting,
    QLearning,
    AStar,
}

impl From<Strategy> for StrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::ArcRouting => StrategyKind::ArcRouting,
            Strategy::QLearning => StrategyKind::QLearning,
            Strategy::AStar => StrategyKind::HeuristicSearch,
        }
    }
}

#[derive(Deserialize)]
struct Waypoints {
    waypoints: BTreeMap<String, (f64, f64)>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Output {
    Solved { objective: f64, route: Vec<String> },
    NoSolution,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let file = File::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let input: Waypoints =
        serde_json::from_reader(file).context("failed to parse waypoints file")?;

    let ids: Vec<String> = input.waypoints.keys().cloned().collect();
    let locations: Vec<Location> = input
        .waypoints
        .values()
        .map(|&(x, y)| {
            if cli.geodesic {
                Location::from_lat_lon(y, x)
            } else {
                Location::from_cartesian(x, y)
            }
        })
        .collect();

    let matrix = if cli.geodesic {
        CostMatrix::from_haversine(&locations)?
    } else {
        CostMatrix::from_euclidean(&locations)?
    };

    let engine = RouteEngine::new(EngineParams {
        strategy: cli.strategy.into(),
        q_learning: QLearningParams {
            episodes: cli.episodes,
            seed: cli.seed,
            ..QLearningParams::default()
        },
        ..EngineParams::default()
    });

    info!(waypoints = ids.len(), "optimizing route");
    let output = match engine.optimize(&matrix, &locations) {
        RouteResult::Solved { objective, path } => Output::Solved {
            objective,
            route: path.into_iter().map(|index| ids[index].clone()).collect(),
        },
        RouteResult::NoSolution => Output::NoSolution,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
