use approx::assert_abs_diff_eq;

use crate::error::Error;
use crate::grid::GridWorld;
use crate::model::{ActionName, GridCoord, Problem, StateId};
use crate::solver::{
    backup, run_policy_iteration, run_value_iteration, Algorithm, MdpSolver, PolicyIteration,
    SolverConfig, ValueIteration,
};

fn best_actions(problem: &Problem) -> Vec<Option<ActionName>> {
    problem
        .states()
        .iter()
        .map(|s| problem.best_action_name(s.id()).cloned())
        .collect()
}

fn assert_algorithms_agree(problem: &Problem, tolerance: f64) {
    let mut by_value = problem.clone();
    let mut by_policy = problem.clone();
    run_value_iteration(&mut by_value).unwrap();
    run_policy_iteration(&mut by_policy).unwrap();

    assert_eq!(best_actions(&by_value), best_actions(&by_policy));
    for (v, p) in by_value.latest_values().iter().zip(by_policy.latest_values()) {
        assert_abs_diff_eq!(*v, p, epsilon = tolerance);
    }
}

#[test]
fn test_agreement_on_running_example() {
    let problem = GridWorld::default().build().unwrap();
    assert_algorithms_agree(&problem, problem.epsilon());
}

#[test]
fn test_agreement_on_blocked_grid() {
    let problem = GridWorld::new(6, 4, GridCoord::new(6, 4))
        .with_blocked([GridCoord::new(3, 2), GridCoord::new(3, 3)])
        .with_initial(GridCoord::new(1, 1))
        .build()
        .unwrap();
    assert_algorithms_agree(&problem, problem.epsilon());

    let mut solved = problem.clone();
    run_value_iteration(&mut solved).unwrap();
    let start = solved.state_at(GridCoord::new(1, 1)).unwrap();
    // Manhattan distance to the goal; the wall does not lengthen the path.
    assert_eq!(start.latest_value(), Some(8.0));
}

#[test]
fn test_agreement_on_slippery_corridor() {
    let problem = GridWorld::new(5, 1, GridCoord::new(5, 1))
        .with_slip(0.2)
        .with_epsilon(1e-9)
        .build()
        .unwrap();
    assert_algorithms_agree(&problem, 1e-6);

    let mut solved = problem.clone();
    run_value_iteration(&mut solved).unwrap();
    for x in 1..5 {
        let state = solved.state_at(GridCoord::new(x, 1)).unwrap();
        // Each step succeeds with probability 0.8: expected cost 1.25 per cell.
        let expected = 1.25 * f64::from(5 - x);
        assert_abs_diff_eq!(state.latest_value().unwrap(), expected, epsilon = 1e-6);
        assert_eq!(solved.best_action_name(state.id()), Some(&ActionName::East));
    }
}

#[test]
fn test_converged_values_are_a_fixed_point() {
    let mut problem = GridWorld::new(4, 4, GridCoord::new(4, 4))
        .with_slip(0.3)
        .with_blocked([GridCoord::new(2, 3)])
        .with_epsilon(1e-6)
        .build()
        .unwrap();
    run_value_iteration(&mut problem).unwrap();

    let values = problem.latest_values();
    for state in problem.states() {
        if problem.is_goal(state.id()) {
            assert_eq!(values[state.id().index()], 0.0);
            continue;
        }
        let again = backup(state, &values).unwrap();
        assert_abs_diff_eq!(again.value, values[state.id().index()], epsilon = 1e-6);
    }
}

#[test]
fn test_goal_stays_at_zero_every_iteration() {
    let mut problem = GridWorld::default().build().unwrap();
    let report = run_value_iteration(&mut problem).unwrap();

    let goal = problem.state(problem.goal());
    assert_eq!(goal.values().len(), report.iterations + 1);
    assert!(goal.values().iter().all(|&v| v == 0.0));
    assert!(goal.best_action().is_none());
}

#[test]
fn test_problem_can_be_solved_twice() {
    let mut problem = GridWorld::default().build().unwrap();

    let first = run_value_iteration(&mut problem).unwrap();
    let after_value = best_actions(&problem);
    assert_eq!(
        problem.state(StateId(0)).values().len(),
        first.iterations + 1
    );

    let second = run_policy_iteration(&mut problem).unwrap();
    assert_eq!(problem.state(StateId(0)).values()[0], 0.0);
    assert_eq!(
        problem.state(StateId(0)).values().len(),
        second.iterations + 1
    );
    assert_eq!(best_actions(&problem), after_value);

    problem.reset();
    assert!(problem.states().iter().all(|s| s.values().is_empty()));
    assert!(problem.policy().iter().all(|(_, choice)| choice.is_none()));
}

#[test]
fn test_cyclic_initial_policy_hits_cap() {
    // With the goal in the south-west corner the east-first seed sends the
    // north-east corner south and the cell below it back north.
    let mut problem = GridWorld::new(3, 3, GridCoord::new(1, 1)).build().unwrap();

    let capped = PolicyIteration::new(SolverConfig::default().with_max_iterations(200));
    match capped.solve(&mut problem) {
        Err(Error::DidNotConverge {
            algorithm,
            iterations,
            ..
        }) => {
            assert_eq!(algorithm, Algorithm::PolicyIteration);
            assert_eq!(iterations, 200);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // Value iteration has no such seed and solves the same grid.
    let report = ValueIteration::default().solve(&mut problem).unwrap();
    assert!(report.iterations > 0);
    let corner = problem.state_at(GridCoord::new(3, 3)).unwrap();
    assert_eq!(corner.latest_value(), Some(4.0));
}
