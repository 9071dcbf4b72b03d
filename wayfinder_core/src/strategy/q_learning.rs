use fixedbitset::FixedBitSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::EngineError;
use crate::graph::Graph;
use crate::matrix::{Cost, CostMatrix};
use crate::strategy::{RouteStrategy, Solution};

/// Tabular Q-learning knobs. The step budget bounds both a training
/// episode and the greedy replay; replay has no other termination
/// guarantee, so the budget is a correctness property rather than a tuning
/// knob.
#[derive(Clone, Debug)]
pub struct QLearningParams {
    pub episodes: usize,
    pub epsilon: f64,
    pub discount: f64,
    pub learning_rate: f64,
    pub step_budget: usize,
    /// Seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            episodes: 1000,
            epsilon: 0.1,
            discount: 0.95,
            learning_rate: 0.1,
            step_budget: 1000,
            seed: None,
        }
    }
}

/// Shortest-path MDP over the derived graph: states are nodes, actions are
/// outgoing arcs, rewards are negative arc costs, the destination node is
/// terminal.
struct RouteEnv<'a> {
    graph: &'a Graph,
    origin: usize,
    destination: usize,
    state: usize,
}

impl<'a> RouteEnv<'a> {
    fn new(graph: &'a Graph, origin: usize, destination: usize) -> Self {
        RouteEnv {
            graph,
            origin,
            destination,
            state: origin,
        }
    }

    fn reset(&mut self) -> usize {
        self.state = self.origin;
        self.origin
    }

    fn actions(&self) -> &[(usize, Cost)] {
        self.graph.neighbors(self.state)
    }

    /// Moves to `next` and answers (next state, reward, done). `None` when
    /// there is no arc from the current state to `next`.
    fn step(&mut self, next: usize) -> Option<(usize, Cost, bool)> {
        let &(_, cost) = self
            .graph
            .neighbors(self.state)
            .iter()
            .find(|&&(node, _)| node == next)?;

        self.state = next;
        Some((next, -cost, next == self.destination))
    }
}

/// Action-value table over (state, next node), stored flat like the cost
/// matrix.
struct QLearningAgent<'a> {
    env: RouteEnv<'a>,
    values: Vec<Cost>,
    num_nodes: usize,
}

impl<'a> QLearningAgent<'a> {
    fn new(env: RouteEnv<'a>) -> Self {
        let num_nodes = env.graph.node_count();
        QLearningAgent {
            env,
            values: vec![0.0; num_nodes * num_nodes],
            num_nodes,
        }
    }

    #[inline(always)]
    fn value(&self, state: usize, next: usize) -> Cost {
        self.values[state * self.num_nodes + next]
    }

    /// Highest action value at `state`, zero when the state has no
    /// actions.
    fn best_value(&self, state: usize) -> Cost {
        let mut best: Option<Cost> = None;
        for &(next, _) in self.env.graph.neighbors(state) {
            let value = self.value(state, next);
            best = Some(best.map_or(value, |current| current.max(value)));
        }

        best.unwrap_or(0.0)
    }

    /// Greedy action at `state`. Ties keep the lowest node index, so
    /// replay is deterministic.
    fn best_action(&self, state: usize) -> Option<usize> {
        let mut best: Option<(usize, Cost)> = None;
        for &(next, _) in self.env.graph.neighbors(state) {
            let value = self.value(state, next);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((next, value)),
            }
        }

        best.map(|(next, _)| next)
    }

    fn train(&mut self, params: &QLearningParams, rng: &mut SmallRng) {
        // `random_bool` panics outside [0, 1]; the engine must not.
        let epsilon = params.epsilon.clamp(0.0, 1.0);

        for _ in 0..params.episodes {
            let mut state = self.env.reset();

            for _ in 0..params.step_budget {
                let actions = self.env.actions();
                if actions.is_empty() {
                    break;
                }

                let chosen = if rng.random_bool(epsilon) {
                    actions[rng.random_range(0..actions.len())].0
                } else {
                    self.best_action(state).unwrap_or(actions[0].0)
                };

                let Some((next_state, reward, done)) = self.env.step(chosen) else {
                    break;
                };

                // No bootstrap past the terminal state.
                let future = if done { 0.0 } else { self.best_value(next_state) };
                let index = state * self.num_nodes + next_state;
                let current = self.values[index];
                self.values[index] = current
                    + params.learning_rate * (reward + params.discount * future - current);

                if done {
                    break;
                }
                state = next_state;
            }
        }
    }

    /// Greedy policy replay. A poorly converged policy can cycle forever,
    /// so both a revisit check and the step budget guard termination.
    fn replay(&mut self, params: &QLearningParams) -> Result<Vec<usize>, EngineError> {
        let origin = self.env.origin;
        let destination = self.env.destination;

        let mut state = self.env.reset();
        let mut path = vec![state];
        let mut visited = FixedBitSet::with_capacity(self.num_nodes);
        visited.insert(state);

        for _ in 0..params.step_budget {
            let Some(next) = self.best_action(state) else {
                return Err(EngineError::NoFeasibleSolution {
                    origin,
                    destination,
                });
            };

            if visited.contains(next) {
                return Err(EngineError::NoFeasibleSolution {
                    origin,
                    destination,
                });
            }

            visited.insert(next);
            path.push(next);

            if next == destination {
                return Ok(path);
            }
            state = next;
        }

        Err(EngineError::NoFeasibleSolution {
            origin,
            destination,
        })
    }
}

/// Learns a path policy from the depot (node 0) to the last node with
/// tabular Q-learning, then replays it greedily. The objective is
/// recomputed from the matrix: training rewards only coincide with real
/// costs by construction and are never trusted for the result.
#[derive(Debug, Default)]
pub struct QLearningStrategy {
    params: QLearningParams,
}

impl QLearningStrategy {
    pub fn new(params: QLearningParams) -> Self {
        Self { params }
    }
}

impl RouteStrategy for QLearningStrategy {
    fn name(&self) -> &'static str {
        "q_learning"
    }

    fn solve(&self, matrix: &CostMatrix) -> Result<Solution, EngineError> {
        let num_nodes = matrix.num_nodes();
        let origin = 0;
        let destination = num_nodes - 1;

        let graph = Graph::from_matrix(matrix);
        let mut rng = match self.params.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let env = RouteEnv::new(&graph, origin, destination);
        let mut agent = QLearningAgent::new(env);
        agent.train(&self.params, &mut rng);
        debug!(
            episodes = self.params.episodes,
            nodes = num_nodes,
            "training complete, replaying policy"
        );

        let path = agent.replay(&self.params)?;
        let objective = matrix.path_cost(&path);

        Ok(Solution { objective, path })
    }
}
