//! Synchronous (Jacobi) value iteration.
//!
//! Sweep `k` backs up every non-goal state against the values of sweep
//! `k - 1` only, so no state ever observes a value computed in the same sweep.

use std::time::Instant;

use log::{info, trace};

use super::bellman::{backup, Backup};
use super::config::{SolverConfig, StoppingRule};
use super::report::SolveReport;
use super::{Algorithm, MdpSolver};
use crate::error::{Error, Result};
use crate::model::{Problem, State, StateId};

#[derive(Debug, Clone, Default)]
pub struct ValueIteration {
    config: SolverConfig,
}

impl ValueIteration {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl MdpSolver for ValueIteration {
    /// Runs value iteration until the configured stopping statistic is within
    /// the problem's epsilon.
    ///
    /// Any previous annotations on `problem` are discarded first. Without an
    /// iteration cap a non-contracting problem loops forever.
    fn solve(&self, problem: &mut Problem) -> Result<SolveReport> {
        let start = Instant::now();
        let mut report = SolveReport::new(Algorithm::ValueIteration);
        let epsilon = problem.epsilon();

        problem.reset();
        problem.push_initial_values();

        let mut min_residual = f64::INFINITY;
        let mut iteration = 0;
        loop {
            iteration += 1;
            let previous = problem.snapshot(iteration - 1);
            let backups = sweep(problem, &previous)?;

            let mut residual = 0.0_f64;
            for (index, result) in backups.into_iter().enumerate() {
                let state = problem.state_mut(StateId(index));
                match result {
                    Some(b) => {
                        residual = residual.max((b.value - previous[index]).abs());
                        state.push_value(b.value);
                        state.set_best_action(Some(b.action));
                    }
                    None => {
                        state.push_value(0.0);
                        state.set_best_action(None);
                    }
                }
            }

            min_residual = min_residual.min(residual);
            let statistic = match self.config.stopping_rule {
                StoppingRule::MinimumResidual => min_residual,
                StoppingRule::LatestResidual => residual,
            };
            report.residuals.push(residual);
            report.stopping_statistics.push(statistic);
            trace!(
                "value iteration sweep {}: residual {:e}, statistic {:e}",
                iteration,
                residual,
                statistic
            );

            if statistic <= epsilon {
                break;
            }
            if self.config.exhausted(iteration) {
                return Err(Error::DidNotConverge {
                    algorithm: Algorithm::ValueIteration,
                    iterations: iteration,
                    residual: statistic,
                });
            }
        }

        report.iterations = iteration;
        report.elapsed = start.elapsed();
        info!(
            "value iteration converged after {} sweeps in {}ms",
            report.iterations,
            report.elapsed.as_millis()
        );
        Ok(report)
    }
}

fn backup_unless_goal(
    problem: &Problem,
    state: &State,
    previous: &[f64],
) -> Result<Option<Backup>> {
    if problem.is_goal(state.id()) {
        Ok(None)
    } else {
        backup(state, previous).map(Some)
    }
}

/// Backs up every state against `previous`; the goal yields `None`.
#[cfg(not(feature = "parallel"))]
fn sweep(problem: &Problem, previous: &[f64]) -> Result<Vec<Option<Backup>>> {
    problem
        .states()
        .iter()
        .map(|state| backup_unless_goal(problem, state, previous))
        .collect()
}

#[cfg(feature = "parallel")]
fn sweep(problem: &Problem, previous: &[f64]) -> Result<Vec<Option<Backup>>> {
    use rayon::prelude::*;

    problem
        .states()
        .par_iter()
        .map(|state| backup_unless_goal(problem, state, previous))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionName, ProblemBuilder};
    use approx::assert_relative_eq;

    #[test]
    fn test_single_step_to_goal() {
        let mut builder = ProblemBuilder::new(1e-3);
        builder
            .state("S0")
            .state("S1")
            .action("S0", ActionName::East, 1.0, [("S1", 1.0)])
            .goal("S1")
            .initial("S0");
        let mut problem = builder.build().unwrap();

        let report = ValueIteration::default().solve(&mut problem).unwrap();

        let s0 = problem.state_by_label("S0").unwrap();
        let s1 = problem.state_by_label("S1").unwrap();
        assert_relative_eq!(s0.latest_value().unwrap(), 1.0);
        assert_eq!(problem.best_action_name(s0.id()), Some(&ActionName::East));
        assert_relative_eq!(s1.latest_value().unwrap(), 0.0);
        assert!(s1.best_action().is_none());
        assert_eq!(report.iterations, 2);
        assert_eq!(s0.values(), &[0.0, 1.0, 1.0]);
        assert_eq!(s1.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sweeps_are_synchronous() {
        // G <- A <- B, declared so that A is backed up before B.
        let mut builder = ProblemBuilder::new(1e-3);
        builder
            .state("G")
            .state("A")
            .state("B")
            .action("A", ActionName::West, 1.0, [("G", 1.0)])
            .action("B", ActionName::West, 1.0, [("A", 1.0)])
            .goal("G");
        let mut problem = builder.build().unwrap();

        let report = ValueIteration::default().solve(&mut problem).unwrap();

        // In the first sweep B still sees A's initial 0.0.
        let b = problem.state_by_label("B").unwrap();
        assert_eq!(b.value_at(1), Some(1.0));
        assert_eq!(b.value_at(2), Some(2.0));
        assert_eq!(report.iterations, 3);
        assert_eq!(report.residuals, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        // A and B bounce between each other and never reach the goal.
        let mut builder = ProblemBuilder::new(0.5);
        builder
            .state("A")
            .state("B")
            .state("G")
            .action("A", ActionName::East, 1.0, [("B", 1.0)])
            .action("B", ActionName::West, 1.0, [("A", 1.0)])
            .goal("G");
        let mut problem = builder.build().unwrap();

        let solver = ValueIteration::new(SolverConfig::default().with_max_iterations(10));
        let err = solver.solve(&mut problem).unwrap_err();
        assert_eq!(
            err,
            Error::DidNotConverge {
                algorithm: Algorithm::ValueIteration,
                iterations: 10,
                residual: 1.0,
            }
        );
        assert_eq!(problem.state_by_label("A").unwrap().values().len(), 11);
    }

    #[test]
    fn test_stopping_rules_on_noisy_chain() {
        // A slips back in place half the time, so its residual halves each sweep.
        let mut builder = ProblemBuilder::new(1e-4);
        builder
            .state("A")
            .state("G")
            .action("A", ActionName::East, 1.0, [("G", 0.5), ("A", 0.5)])
            .goal("G");
        let mut problem = builder.build().unwrap();

        let minimum = ValueIteration::default().solve(&mut problem).unwrap();
        assert!(minimum
            .stopping_statistics
            .windows(2)
            .all(|w| w[1] <= w[0]));
        assert!(*minimum.stopping_statistics.last().unwrap() <= 1e-4);
        assert_relative_eq!(
            problem.state(StateId(0)).latest_value().unwrap(),
            2.0,
            epsilon = 1e-3
        );

        let latest = ValueIteration::new(
            SolverConfig::default().with_stopping_rule(StoppingRule::LatestResidual),
        )
        .solve(&mut problem)
        .unwrap();
        assert_eq!(latest.stopping_statistics, latest.residuals);
        assert!(latest.final_residual().unwrap() <= 1e-4);
        // On a monotone residual sequence both rules stop at the same sweep.
        assert_eq!(latest.iterations, minimum.iterations);
    }

    #[test]
    fn test_state_without_eligible_actions_fails() {
        let mut builder = ProblemBuilder::new(1e-3);
        builder
            .state("S0")
            .state("S1")
            .action("S0", ActionName::North, 1.0, [("S0", 1.0)])
            .goal("S1");
        let mut problem = builder.build().unwrap();

        assert!(matches!(
            ValueIteration::default().solve(&mut problem),
            Err(Error::InvalidMdp(_))
        ));
    }
}
