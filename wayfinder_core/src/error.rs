use thiserror::Error;

/// Internal failure taxonomy. None of these cross the strategy boundary:
/// they are collapsed to `RouteResult::NoSolution` and only surface in the
/// logs.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("infeasible input: {0}")]
    InfeasibleInput(String),
    #[error("no feasible route from node {origin} to node {destination}")]
    NoFeasibleSolution { origin: usize, destination: usize },
    #[error("arc cost {0} is outside the integer range supported by the solver")]
    NumericOverflow(f64),
}
