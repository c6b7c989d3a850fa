//! Iterative evaluation of a fixed policy.

use log::trace;

use super::bellman::q_value;
use super::config::SolverConfig;
use super::Algorithm;
use crate::error::{Error, InvalidMdp, Result};
use crate::model::{Action, Policy, Problem};

/// Converged values of a policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyEvaluation {
    /// One value per state, indexed by `StateId`.
    pub values: Vec<f64>,
    pub sweeps: usize,
    /// Residual of the final sweep.
    pub residual: f64,
}

/// Computes `V^pi` by repeated synchronous sweeps
/// `V(s) <- c(s, pi(s)) + sum_{s'} P(s' | s, pi(s)) V(s')`.
#[derive(Debug, Clone, Default)]
pub struct PolicyEvaluator {
    max_sweeps: Option<usize>,
}

impl PolicyEvaluator {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            max_sweeps: config.max_iterations,
        }
    }

    /// Evaluates `policy` until a sweep changes no non-goal value by more
    /// than the problem's epsilon.
    ///
    /// The double buffer is seeded from each state's latest recorded value;
    /// the problem itself is left untouched.
    pub fn evaluate(&self, problem: &Problem, policy: &Policy) -> Result<PolicyEvaluation> {
        let actions = resolve(problem, policy)?;
        let epsilon = problem.epsilon();

        let mut current = problem.latest_values();
        let mut next = vec![0.0; current.len()];
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let residual = evaluation_sweep(&actions, &current, &mut next);
            std::mem::swap(&mut current, &mut next);
            trace!("policy evaluation sweep {}: residual {:e}", sweeps, residual);

            if residual <= epsilon {
                return Ok(PolicyEvaluation {
                    values: current,
                    sweeps,
                    residual,
                });
            }
            if self.max_sweeps.is_some_and(|cap| sweeps >= cap) {
                return Err(Error::DidNotConverge {
                    algorithm: Algorithm::PolicyIteration,
                    iterations: sweeps,
                    residual,
                });
            }
        }
    }
}

/// Looks up the chosen action of every state; `None` for the goal.
fn resolve<'a>(problem: &'a Problem, policy: &Policy) -> Result<Vec<Option<&'a Action>>> {
    problem
        .states()
        .iter()
        .map(|state| -> Result<Option<&'a Action>> {
            if problem.is_goal(state.id()) {
                return Ok(None);
            }
            policy
                .action_of(state.id())
                .and_then(|index| state.actions().get(index))
                .map(Some)
                .ok_or_else(|| {
                    InvalidMdp::MissingPolicyAction {
                        state: state.label().to_string(),
                    }
                    .into()
                })
        })
        .collect()
}

/// Writes the new value of one state into `slot` and returns its change.
fn update(action: Option<&Action>, old: f64, current: &[f64], slot: &mut f64) -> f64 {
    match action {
        Some(action) => {
            *slot = q_value(action, current);
            (old - *slot).abs()
        }
        None => {
            *slot = 0.0;
            0.0
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluation_sweep(actions: &[Option<&Action>], current: &[f64], next: &mut [f64]) -> f64 {
    next.iter_mut()
        .zip(actions)
        .enumerate()
        .map(|(index, (slot, action))| update(*action, current[index], current, slot))
        .fold(0.0, f64::max)
}

#[cfg(feature = "parallel")]
fn evaluation_sweep(actions: &[Option<&Action>], current: &[f64], next: &mut [f64]) -> f64 {
    use rayon::prelude::*;

    next.par_iter_mut()
        .zip(actions.par_iter())
        .enumerate()
        .map(|(index, (slot, action))| update(*action, current[index], current, slot))
        .reduce(|| 0.0, f64::max)
}
