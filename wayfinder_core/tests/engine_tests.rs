use wayfinder_core::engine::{EngineParams, RouteEngine, RouteResult, StrategyKind};
use wayfinder_core::location::Location;
use wayfinder_core::matrix::{CostMatrix, UNREACHABLE};
use wayfinder_core::strategy::q_learning::QLearningParams;

fn three_node_matrix() -> CostMatrix {
    CostMatrix::new(vec![
        vec![0.0, 10.0, 15.0],
        vec![10.0, 0.0, 20.0],
        vec![15.0, 20.0, 0.0],
    ])
    .unwrap()
}

fn three_node_locations() -> Vec<Location> {
    // Consistent with the matrix: no arc is shorter than the straight
    // line between its endpoints.
    vec![
        Location::from_cartesian(0.0, 0.0),
        Location::from_cartesian(10.0, 0.0),
        Location::from_cartesian(15.0, 0.0),
    ]
}

fn engine(strategy: StrategyKind) -> RouteEngine {
    RouteEngine::new(EngineParams {
        strategy,
        q_learning: QLearningParams {
            seed: Some(7),
            ..QLearningParams::default()
        },
        ..EngineParams::default()
    })
}

fn solved(result: RouteResult) -> (f64, Vec<usize>) {
    match result {
        RouteResult::Solved { objective, path } => (objective, path),
        RouteResult::NoSolution => panic!("expected a solved route"),
    }
}

#[test]
fn arc_routing_builds_the_cheapest_known_tour() {
    let matrix = three_node_matrix();
    let (objective, path) = solved(engine(StrategyKind::ArcRouting).optimize(&matrix, &[]));

    assert_eq!(objective, 45.0);
    assert_eq!(path.first(), Some(&0));
    assert_eq!(path.last(), Some(&0));

    let mut visited: Vec<usize> = path[..path.len() - 1].to_vec();
    visited.sort_unstable();
    assert_eq!(visited, vec![0, 1, 2]);

    assert_eq!(objective, matrix.path_cost(&path));
}

#[test]
fn heuristic_search_connects_origin_to_destination() {
    let matrix = three_node_matrix();
    let (objective, path) = solved(
        engine(StrategyKind::HeuristicSearch).optimize(&matrix, &three_node_locations()),
    );

    assert_eq!(path.first(), Some(&0));
    assert_eq!(path.last(), Some(&2));
    assert!(objective <= 35.0, "got {objective}");
    assert_eq!(objective, matrix.path_cost(&path));
}

#[test]
fn q_learning_connects_origin_to_destination() {
    let matrix = three_node_matrix();
    let (objective, path) = solved(engine(StrategyKind::QLearning).optimize(&matrix, &[]));

    assert_eq!(path.first(), Some(&0));
    assert_eq!(path.last(), Some(&2));
    assert!(objective <= 35.0, "got {objective}");
    assert_eq!(objective, matrix.path_cost(&path));
}

#[test]
fn every_strategy_answers_the_single_node_case() {
    let matrix = CostMatrix::new(vec![vec![0.0]]).unwrap();
    let location = [Location::from_cartesian(0.0, 0.0)];

    for strategy in [
        StrategyKind::ArcRouting,
        StrategyKind::QLearning,
        StrategyKind::HeuristicSearch,
    ] {
        let result = engine(strategy).optimize(&matrix, &location);
        assert_eq!(
            result,
            RouteResult::Solved {
                objective: 0.0,
                path: vec![0],
            },
            "strategy {strategy:?}"
        );
    }
}

#[test]
fn every_strategy_reports_disconnected_inputs_as_no_solution() {
    let matrix = CostMatrix::new(vec![
        vec![0.0, UNREACHABLE],
        vec![UNREACHABLE, 0.0],
    ])
    .unwrap();
    let locations = [
        Location::from_cartesian(0.0, 0.0),
        Location::from_cartesian(1.0, 0.0),
    ];

    for strategy in [
        StrategyKind::ArcRouting,
        StrategyKind::QLearning,
        StrategyKind::HeuristicSearch,
    ] {
        let result = engine(strategy).optimize(&matrix, &locations);
        assert_eq!(result, RouteResult::NoSolution, "strategy {strategy:?}");
    }
}

#[test]
fn coordinate_derived_matrix_round_trips_through_the_engine() {
    // The collaborator's usual flow: waypoints in, euclidean matrix,
    // optimize.
    let locations = vec![
        Location::from_cartesian(0.0, 0.0),
        Location::from_cartesian(4.0, 0.0),
        Location::from_cartesian(4.0, 3.0),
        Location::from_cartesian(0.0, 3.0),
    ];
    let matrix = CostMatrix::from_euclidean(&locations).unwrap();

    let (objective, path) = solved(engine(StrategyKind::ArcRouting).optimize(&matrix, &[]));
    assert_eq!(path.len(), 5);
    assert_eq!(objective, matrix.path_cost(&path));

    let (objective, path) =
        solved(engine(StrategyKind::HeuristicSearch).optimize(&matrix, &locations));
    assert_eq!(path, vec![0, 3]);
    assert_eq!(objective, matrix.cost(0, 3));
}
