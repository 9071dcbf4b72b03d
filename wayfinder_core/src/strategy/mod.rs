pub mod arc_routing;
pub mod heuristic_search;
pub mod q_learning;

use tracing::warn;

use crate::engine::RouteResult;
use crate::error::EngineError;
use crate::matrix::{Cost, CostMatrix};

use arc_routing::ArcRoutingStrategy;
use heuristic_search::HeuristicSearchStrategy;
use q_learning::QLearningStrategy;

/// A feasible route together with its objective value. The objective is
/// always a recomputation of the matrix costs along `path`.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub objective: Cost,
    pub path: Vec<usize>,
}

impl Solution {
    fn trivial() -> Self {
        Solution {
            objective: 0.0,
            path: vec![0],
        }
    }
}

pub trait RouteStrategy {
    fn name(&self) -> &'static str;

    /// Strategy-specific optimization. Implementations may assume the
    /// matrix holds at least two nodes; the single-node case is answered
    /// before this is called.
    fn solve(&self, matrix: &CostMatrix) -> Result<Solution, EngineError>;

    /// Fail-soft entry point. Callers treat an unroutable input as a
    /// normal business outcome, so every internal error collapses to
    /// `NoSolution` here and only surfaces through the log.
    fn optimize(&self, matrix: &CostMatrix) -> RouteResult {
        let solved = if matrix.num_nodes() == 1 {
            Ok(Solution::trivial())
        } else {
            self.solve(matrix)
        };

        match solved {
            Ok(solution) => RouteResult::Solved {
                objective: solution.objective,
                path: solution.path,
            },
            Err(error) => {
                warn!(strategy = self.name(), %error, "route optimization failed");
                RouteResult::NoSolution
            }
        }
    }
}

/// The closed set of strategies, dispatched without trait objects.
pub enum RouteOptimizer {
    ArcRouting(ArcRoutingStrategy),
    QLearning(QLearningStrategy),
    HeuristicSearch(HeuristicSearchStrategy),
}

impl RouteStrategy for RouteOptimizer {
    fn name(&self) -> &'static str {
        match self {
            RouteOptimizer::ArcRouting(strategy) => strategy.name(),
            RouteOptimizer::QLearning(strategy) => strategy.name(),
            RouteOptimizer::HeuristicSearch(strategy) => strategy.name(),
        }
    }

    fn solve(&self, matrix: &CostMatrix) -> Result<Solution, EngineError> {
        match self {
            RouteOptimizer::ArcRouting(strategy) => strategy.solve(matrix),
            RouteOptimizer::QLearning(strategy) => strategy.solve(matrix),
            RouteOptimizer::HeuristicSearch(strategy) => strategy.solve(matrix),
        }
    }
}
