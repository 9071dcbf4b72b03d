use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::EngineError;
use crate::graph::Graph;
use crate::location::Location;
use crate::matrix::{Cost, CostMatrix};
use crate::strategy::{RouteStrategy, Solution};

const INVALID_NODE: usize = usize::MAX;

#[derive(Copy, Clone, Debug)]
struct HeapItem {
    node: usize,
    g_score: Cost,
    f_score: Cost, // g_score + h_score
    sequence: u64,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.f_score == other.f_score && self.sequence == other.sequence
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip scores to make this a min-heap; earlier insertions win
        // ties, keeping expansion order reproducible.
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

struct NodeData {
    settled: bool,
    g_score: Cost,
    parent: usize,
}

impl NodeData {
    fn new() -> Self {
        NodeData {
            settled: false,
            g_score: f64::INFINITY,
            parent: INVALID_NODE,
        }
    }
}

/// Best-first search from node 0 to node N-1, ordered by accumulated cost
/// plus straight-line distance to the destination. The heuristic is only
/// admissible when arc costs never drop below the straight-line distance
/// between the endpoints' coordinates; that consistency is the caller's
/// responsibility and is not enforced here.
pub struct HeuristicSearchStrategy {
    locations: Vec<Location>,
}

impl HeuristicSearchStrategy {
    /// `locations[i]` must be the coordinates of matrix node i.
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }
}

impl RouteStrategy for HeuristicSearchStrategy {
    fn name(&self) -> &'static str {
        "heuristic_search"
    }

    fn solve(&self, matrix: &CostMatrix) -> Result<Solution, EngineError> {
        let num_nodes = matrix.num_nodes();
        if self.locations.len() != num_nodes {
            return Err(EngineError::InfeasibleInput(format!(
                "expected {num_nodes} coordinates, got {}",
                self.locations.len()
            )));
        }

        let origin = 0;
        let destination = num_nodes - 1;
        let graph = Graph::from_matrix(matrix);

        let estimate =
            |node: usize| self.locations[node].euclidean_distance(&self.locations[destination]);

        let mut data: Vec<NodeData> = Vec::with_capacity(num_nodes);
        data.resize_with(num_nodes, NodeData::new);
        let mut heap: BinaryHeap<HeapItem> = BinaryHeap::with_capacity(num_nodes);
        let mut sequence = 0u64;

        data[origin].g_score = 0.0;
        heap.push(HeapItem {
            node: origin,
            g_score: 0.0,
            f_score: estimate(origin),
            sequence,
        });

        while let Some(HeapItem { node, g_score, .. }) = heap.pop() {
            // Node is already settled, skip
            if data[node].settled {
                continue;
            }

            // A cheaper entry for this node is already known, skip
            if g_score > data[node].g_score {
                continue;
            }

            for &(next, cost) in graph.neighbors(node) {
                let tentative = g_score + cost;
                if tentative < data[next].g_score {
                    data[next].settled = false;
                    data[next].g_score = tentative;
                    data[next].parent = node;

                    sequence += 1;
                    heap.push(HeapItem {
                        node: next,
                        g_score: tentative,
                        f_score: tentative + estimate(next),
                        sequence,
                    });
                }
            }

            data[node].settled = true;
            if node == destination {
                break;
            }
        }

        if !data[destination].settled {
            return Err(EngineError::NoFeasibleSolution {
                origin,
                destination,
            });
        }

        let mut path = Vec::with_capacity(num_nodes);
        let mut node = destination;
        while node != INVALID_NODE {
            path.push(node);
            node = data[node].parent;
        }
        path.reverse();

        let objective = matrix.path_cost(&path);
        debug!(objective, nodes = num_nodes, "best-first search reached destination");

        Ok(Solution { objective, path })
    }
}
