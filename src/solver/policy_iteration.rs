//! Policy iteration: evaluate the current policy, improve it greedily, and
//! repeat until no state changes its action.
//!
//! Every round works on explicit snapshots: policy in, values out, policy out.

use std::time::Instant;

use log::{debug, info};

use super::bellman::backup;
use super::config::SolverConfig;
use super::policy_evaluation::PolicyEvaluator;
use super::report::SolveReport;
use super::{Algorithm, MdpSolver};
use crate::error::{Error, InvalidMdp, Result};
use crate::model::{Policy, Problem, INITIAL_POLICY_PRIORITY};

#[derive(Debug, Clone, Default)]
pub struct PolicyIteration {
    config: SolverConfig,
}

impl PolicyIteration {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

/// Seeds a policy by picking, for every non-goal state, the first grid move
/// available in [`INITIAL_POLICY_PRIORITY`] order. Self-loops are never
/// picked.
pub fn initial_policy(problem: &Problem) -> Result<Policy> {
    let mut policy = Policy::empty(problem.len());

    for state in problem.states() {
        if problem.is_goal(state.id()) {
            continue;
        }
        let choice = INITIAL_POLICY_PRIORITY.iter().find_map(|name| {
            state
                .actions()
                .iter()
                .position(|action| !action.is_self_loop() && action.name() == name)
        });
        match choice {
            Some(index) => policy.set(state.id(), Some(index)),
            None => {
                return Err(InvalidMdp::NoInitialPolicyAction {
                    state: state.label().to_string(),
                }
                .into())
            }
        }
    }

    Ok(policy)
}

/// Greedy improvement against `values`. Returns the new policy and the
/// number of states whose action name changed.
fn improve(problem: &Problem, policy: &Policy, values: &[f64]) -> Result<(Policy, usize)> {
    let mut improved = policy.clone();
    let mut changed = 0;

    for state in problem.states() {
        if problem.is_goal(state.id()) {
            continue;
        }
        let greedy = backup(state, values)?;
        let current = policy
            .action_of(state.id())
            .map(|index| state.actions()[index].name());
        if current != Some(greedy.action(state).name()) {
            improved.set(state.id(), Some(greedy.action));
            changed += 1;
        }
    }

    Ok((improved, changed))
}

impl MdpSolver for PolicyIteration {
    /// Runs policy iteration until an improvement round changes nothing.
    ///
    /// Each round appends exactly one value per state to the history: the
    /// converged value of the policy evaluated in that round.
    fn solve(&self, problem: &mut Problem) -> Result<SolveReport> {
        let start = Instant::now();
        let mut report = SolveReport::new(Algorithm::PolicyIteration);
        let evaluator = PolicyEvaluator::new(&self.config);

        problem.reset();
        let mut policy = initial_policy(problem)?;
        problem.apply_policy(&policy);
        problem.push_initial_values();

        let mut round = 0;
        loop {
            round += 1;
            let evaluation = evaluator.evaluate(problem, &policy)?;
            problem.push_values(&evaluation.values);
            report.residuals.push(evaluation.residual);
            report.evaluation_sweeps.push(evaluation.sweeps);

            let (improved, changed) = improve(problem, &policy, &evaluation.values)?;
            problem.apply_policy(&improved);
            policy = improved;
            debug!(
                "policy iteration round {}: {} evaluation sweeps, {} states changed",
                round, evaluation.sweeps, changed
            );

            if changed == 0 {
                break;
            }
            if self.config.exhausted(round) {
                return Err(Error::DidNotConverge {
                    algorithm: Algorithm::PolicyIteration,
                    iterations: round,
                    residual: evaluation.residual,
                });
            }
        }

        report.iterations = round;
        report.elapsed = start.elapsed();
        info!(
            "policy iteration converged after {} rounds in {}ms",
            report.iterations,
            report.elapsed.as_millis()
        );
        Ok(report)
    }
}
