//! Model-based planners for cost-minimising MDPs.
//!
//! Both planners annotate the [`Problem`] in place: afterwards every
//! non-goal state holds its converged value (the last entry of its history)
//! and its optimal action, while the goal keeps value 0.0 and no action.

use std::fmt;

use crate::error::Result;
use crate::model::Problem;

pub mod bellman;
pub mod config;
pub mod policy_evaluation;
pub mod policy_iteration;
pub mod report;
pub mod value_iteration;

#[cfg(test)]
mod tests;

pub use bellman::{backup, q_value, Backup, ValueSource};
pub use config::{SolverConfig, StoppingRule};
pub use policy_evaluation::{PolicyEvaluation, PolicyEvaluator};
pub use policy_iteration::{initial_policy, PolicyIteration};
pub use report::SolveReport;
pub use value_iteration::ValueIteration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    ValueIteration,
    PolicyIteration,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::ValueIteration => f.write_str("value iteration"),
            Algorithm::PolicyIteration => f.write_str("policy iteration"),
        }
    }
}

/// A planner that annotates a problem with values and best actions.
pub trait MdpSolver {
    fn solve(&self, problem: &mut Problem) -> Result<SolveReport>;
}

/// Runs value iteration with the default configuration.
pub fn run_value_iteration(problem: &mut Problem) -> Result<SolveReport> {
    ValueIteration::default().solve(problem)
}

/// Runs policy iteration with the default configuration.
pub fn run_policy_iteration(problem: &mut Problem) -> Result<SolveReport> {
    PolicyIteration::default().solve(problem)
}
