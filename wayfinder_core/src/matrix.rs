use crate::error::EngineError;
use crate::location::Location;

pub type Cost = f64;

/// Entries equal to this value are legal input and mean the arc cannot be
/// traversed.
pub const UNREACHABLE: Cost = f64::INFINITY;

/// Pairwise travel costs between nodes, stored flat in row-major order.
/// To find the index for a pair of nodes, use the formula:
/// `index = from * num_nodes + to`.
///
/// Node 0 is the depot/origin; node N-1 is the destination for the
/// graph-based strategies.
#[derive(Clone, Debug)]
pub struct CostMatrix {
    costs: Vec<Cost>,
    num_nodes: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(costs: &[Cost], num_nodes: usize) -> bool {
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if costs[i * num_nodes + j] != costs[j * num_nodes + i] {
                return false;
            }
        }
    }
    true
}

impl CostMatrix {
    /// Validates and adopts a square table of pairwise costs. `INFINITY`
    /// marks a missing arc; NaN and negative entries are rejected.
    pub fn new(rows: Vec<Vec<Cost>>) -> Result<Self, EngineError> {
        let num_nodes = rows.len();
        if num_nodes == 0 {
            return Err(EngineError::InfeasibleInput(String::from(
                "cost matrix is empty",
            )));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(EngineError::InfeasibleInput(format!(
                    "row {i} has {} entries, expected {num_nodes}",
                    row.len()
                )));
            }

            for (j, &cost) in row.iter().enumerate() {
                if cost.is_nan() {
                    return Err(EngineError::InfeasibleInput(format!(
                        "cost at ({i}, {j}) is NaN"
                    )));
                }
                if cost < 0.0 {
                    return Err(EngineError::InfeasibleInput(format!(
                        "negative cost {cost} at ({i}, {j})"
                    )));
                }
            }
        }

        let costs: Vec<Cost> = rows.into_iter().flatten().collect();
        let is_symmetric = is_flat_matrix_symmetric(&costs, num_nodes);

        Ok(CostMatrix {
            costs,
            num_nodes,
            is_symmetric,
        })
    }

    pub fn from_euclidean(locations: &[Location]) -> Result<Self, EngineError> {
        Self::from_distance_fn(locations, Location::euclidean_distance)
    }

    pub fn from_haversine(locations: &[Location]) -> Result<Self, EngineError> {
        Self::from_distance_fn(locations, Location::haversine_distance)
    }

    fn from_distance_fn(
        locations: &[Location],
        distance: impl Fn(&Location, &Location) -> Cost,
    ) -> Result<Self, EngineError> {
        let num_nodes = locations.len();
        if num_nodes == 0 {
            return Err(EngineError::InfeasibleInput(String::from(
                "no waypoints provided",
            )));
        }

        let mut costs: Vec<Cost> = vec![0.0; num_nodes * num_nodes];
        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                costs[i * num_nodes + j] = distance(from, to);
            }
        }

        Ok(CostMatrix {
            costs,
            num_nodes,
            is_symmetric: true,
        })
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_nodes + to
    }

    #[inline(always)]
    pub fn cost(&self, from: usize, to: usize) -> Cost {
        if from == to {
            return 0.0;
        }

        self.costs[self.index(from, to)]
    }

    /// Sum of consecutive-pair costs along `path`. This is the canonical
    /// objective: strategies recompute their result through it rather than
    /// trusting solver-internal totals.
    pub fn path_cost(&self, path: &[usize]) -> Cost {
        path.windows(2).map(|pair| self.cost(pair[0], pair[1])).sum()
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }
}
