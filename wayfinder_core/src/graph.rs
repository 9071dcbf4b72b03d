use crate::matrix::{Cost, CostMatrix};

/// Adjacency derived from a cost matrix: an arc i -> j for every finite,
/// non-zero, off-diagonal entry. A symmetric matrix yields the undirected
/// graph the graph-based strategies expect; an asymmetric one keeps its
/// per-direction costs.
///
/// Built fresh for every optimization call and discarded at return.
pub struct Graph {
    adjacency: Vec<Vec<(usize, Cost)>>,
}

impl Graph {
    pub fn from_matrix(matrix: &CostMatrix) -> Self {
        let num_nodes = matrix.num_nodes();
        let mut adjacency: Vec<Vec<(usize, Cost)>> = vec![Vec::new(); num_nodes];

        for from in 0..num_nodes {
            for to in 0..num_nodes {
                if from == to {
                    continue;
                }
                let cost = matrix.cost(from, to);
                if cost.is_finite() && cost > 0.0 {
                    adjacency[from].push((to, cost));
                }
            }
        }

        Graph { adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Outgoing arcs of `node`, ordered by target index.
    pub fn neighbors(&self, node: usize) -> &[(usize, Cost)] {
        &self.adjacency[node]
    }
}
