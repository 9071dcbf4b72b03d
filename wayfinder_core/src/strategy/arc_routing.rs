use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::error::EngineError;
use crate::matrix::CostMatrix;
use crate::strategy::{RouteStrategy, Solution};

const DEPOT: usize = 0;

/// Largest arc cost that survives the integer conversion without losing
/// precision.
const MAX_ARC_COST: f64 = (1u64 << 53) as f64;

/// First-solution construction policy. Only cheapest-arc is implemented;
/// the enum exists so the configuration surface names the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FirstSolutionPolicy {
    #[default]
    CheapestArc,
}

/// Single-vehicle closed tour from the depot (node 0), built by always
/// appending the unvisited node with the lowest arc cost from the current
/// one. Arc costs are truncated to integers for comparison, so fractional
/// inputs must be pre-scaled by the caller. No improvement pass runs after
/// construction: tours are good, not provably optimal.
#[derive(Debug, Default)]
pub struct ArcRoutingStrategy {
    policy: FirstSolutionPolicy,
}

impl ArcRoutingStrategy {
    pub fn new(policy: FirstSolutionPolicy) -> Self {
        Self { policy }
    }

    /// Integer cost of the arc, `None` when the arc is missing.
    fn arc_cost(
        matrix: &CostMatrix,
        from: usize,
        to: usize,
    ) -> Result<Option<u64>, EngineError> {
        let cost = matrix.cost(from, to);
        if !cost.is_finite() {
            return Ok(None);
        }
        if cost > MAX_ARC_COST {
            return Err(EngineError::NumericOverflow(cost));
        }

        Ok(Some(cost as u64))
    }
}

impl RouteStrategy for ArcRoutingStrategy {
    fn name(&self) -> &'static str {
        "arc_routing"
    }

    fn solve(&self, matrix: &CostMatrix) -> Result<Solution, EngineError> {
        let FirstSolutionPolicy::CheapestArc = self.policy;

        let num_nodes = matrix.num_nodes();
        let mut tour = Vec::with_capacity(num_nodes + 1);
        let mut visited = FixedBitSet::with_capacity(num_nodes);

        let mut current = DEPOT;
        tour.push(DEPOT);
        visited.insert(DEPOT);

        while tour.len() < num_nodes {
            // Ties keep the lowest node index, so construction is
            // deterministic.
            let mut cheapest: Option<(usize, u64)> = None;
            for next in 0..num_nodes {
                if visited.contains(next) {
                    continue;
                }
                let Some(cost) = Self::arc_cost(matrix, current, next)? else {
                    continue;
                };
                match cheapest {
                    Some((_, best)) if cost >= best => {}
                    _ => cheapest = Some((next, cost)),
                }
            }

            let Some((next, _)) = cheapest else {
                return Err(EngineError::NoFeasibleSolution {
                    origin: current,
                    destination: DEPOT,
                });
            };

            visited.insert(next);
            tour.push(next);
            current = next;
        }

        if Self::arc_cost(matrix, current, DEPOT)?.is_none() {
            return Err(EngineError::NoFeasibleSolution {
                origin: current,
                destination: DEPOT,
            });
        }
        tour.push(DEPOT);

        let objective = matrix.path_cost(&tour);
        debug!(objective, nodes = num_nodes, "cheapest-arc tour constructed");

        Ok(Solution {
            objective,
            path: tour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RouteResult;
    use crate::matrix::UNREACHABLE;

    fn three_node_matrix() -> CostMatrix {
        CostMatrix::new(vec![
            vec![0.0, 10.0, 15.0],
            vec![10.0, 0.0, 20.0],
            vec![15.0, 20.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn builds_closed_tour_over_all_nodes() {
        let matrix = three_node_matrix();
        let solution = ArcRoutingStrategy::default().solve(&matrix).unwrap();

        assert_eq!(solution.objective, 45.0);
        assert_eq!(solution.path.len(), 4);
        assert_eq!(solution.path[0], DEPOT);
        assert_eq!(solution.path[3], DEPOT);

        let mut middle = solution.path[1..3].to_vec();
        middle.sort_unstable();
        assert_eq!(middle, vec![1, 2]);
    }

    #[test]
    fn objective_matches_recomputation() {
        let matrix = three_node_matrix();
        let solution = ArcRoutingStrategy::default().solve(&matrix).unwrap();

        assert_eq!(solution.objective, matrix.path_cost(&solution.path));
    }

    #[test]
    fn cheapest_arc_extends_greedily() {
        // From the depot the cheapest arc goes to node 1 (10), then the
        // only unvisited node is 2, then back home.
        let matrix = three_node_matrix();
        let solution = ArcRoutingStrategy::default().solve(&matrix).unwrap();

        assert_eq!(solution.path, vec![0, 1, 2, 0]);
    }

    #[test]
    fn unreachable_node_yields_no_solution() {
        let matrix = CostMatrix::new(vec![
            vec![0.0, UNREACHABLE],
            vec![UNREACHABLE, 0.0],
        ])
        .unwrap();

        let result = ArcRoutingStrategy::default().optimize(&matrix);
        assert_eq!(result, RouteResult::NoSolution);
    }

    #[test]
    fn missing_return_arc_yields_no_solution() {
        let matrix = CostMatrix::new(vec![
            vec![0.0, 1.0],
            vec![UNREACHABLE, 0.0],
        ])
        .unwrap();

        let result = ArcRoutingStrategy::default().optimize(&matrix);
        assert_eq!(result, RouteResult::NoSolution);
    }

    #[test]
    fn oversized_cost_is_a_numeric_overflow() {
        let matrix = CostMatrix::new(vec![vec![0.0, 1e300], vec![1e300, 0.0]]).unwrap();

        let error = ArcRoutingStrategy::default().solve(&matrix).unwrap_err();
        assert!(matches!(error, EngineError::NumericOverflow(_)));
        assert_eq!(
            ArcRoutingStrategy::default().optimize(&matrix),
            RouteResult::NoSolution
        );
    }

    #[test]
    fn single_node_is_trivial() {
        let matrix = CostMatrix::new(vec![vec![0.0]]).unwrap();
        let result = ArcRoutingStrategy::default().optimize(&matrix);

        assert_eq!(
            result,
            RouteResult::Solved {
                objective: 0.0,
                path: vec![0],
            }
        );
    }
}
