use serde::Serialize;
use tracing::debug;

use crate::location::Location;
use crate::matrix::{Cost, CostMatrix};
use crate::strategy::arc_routing::{ArcRoutingStrategy, FirstSolutionPolicy};
use crate::strategy::heuristic_search::HeuristicSearchStrategy;
use crate::strategy::q_learning::{QLearningParams, QLearningStrategy};
use crate::strategy::{RouteOptimizer, RouteStrategy};

/// Outcome of one optimization call. Internal failures never cross this
/// boundary; callers only distinguish solved from unsolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteResult {
    Solved { objective: Cost, path: Vec<usize> },
    NoSolution,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyKind {
    #[default]
    ArcRouting,
    QLearning,
    HeuristicSearch,
}

#[derive(Clone, Debug, Default)]
pub struct EngineParams {
    pub strategy: StrategyKind,
    pub first_solution: FirstSolutionPolicy,
    pub q_learning: QLearningParams,
}

/// Façade over the strategy family: builds the configured strategy per
/// call and relays its normalized result. Holds no state between calls, so
/// one engine may serve concurrent requests.
pub struct RouteEngine {
    params: EngineParams,
}

impl RouteEngine {
    pub fn new(params: EngineParams) -> Self {
        Self { params }
    }

    /// `locations[i]` must be the coordinates of matrix node i. Only the
    /// heuristic-search strategy consults them; the other strategies
    /// accept an empty slice.
    pub fn optimize(&self, matrix: &CostMatrix, locations: &[Location]) -> RouteResult {
        debug!(
            strategy = ?self.params.strategy,
            nodes = matrix.num_nodes(),
            "optimizing route"
        );

        let optimizer = match self.params.strategy {
            StrategyKind::ArcRouting => RouteOptimizer::ArcRouting(ArcRoutingStrategy::new(
                self.params.first_solution,
            )),
            StrategyKind::QLearning => RouteOptimizer::QLearning(QLearningStrategy::new(
                self.params.q_learning.clone(),
            )),
            StrategyKind::HeuristicSearch => RouteOptimizer::HeuristicSearch(
                HeuristicSearchStrategy::new(locations.to_vec()),
            ),
        };

        optimizer.optimize(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_node_matrix() -> CostMatrix {
        CostMatrix::new(vec![
            vec![0.0, 10.0, 15.0],
            vec![10.0, 0.0, 20.0],
            vec![15.0, 20.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn selects_the_configured_strategy() {
        let matrix = three_node_matrix();

        let arc = RouteEngine::new(EngineParams {
            strategy: StrategyKind::ArcRouting,
            ..EngineParams::default()
        });
        match arc.optimize(&matrix, &[]) {
            RouteResult::Solved { objective, path } => {
                assert_eq!(objective, 45.0);
                assert_eq!(path.len(), 4);
            }
            RouteResult::NoSolution => panic!("expected a tour"),
        }
    }

    #[test]
    fn heuristic_search_without_coordinates_is_no_solution() {
        let matrix = three_node_matrix();
        let engine = RouteEngine::new(EngineParams {
            strategy: StrategyKind::HeuristicSearch,
            ..EngineParams::default()
        });

        assert_eq!(engine.optimize(&matrix, &[]), RouteResult::NoSolution);
    }

    #[test]
    fn result_serializes_with_a_status_tag() {
        let solved = RouteResult::Solved {
            objective: 45.0,
            path: vec![0, 1, 2, 0],
        };
        let json = serde_json::to_value(&solved).unwrap();
        assert_eq!(json["status"], "solved");
        assert_eq!(json["objective"], 45.0);

        let json = serde_json::to_value(RouteResult::NoSolution).unwrap();
        assert_eq!(json["status"], "no_solution");
    }
}
