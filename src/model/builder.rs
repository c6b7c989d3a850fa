//! Construction and validation of [`Problem`]s.
//!
//! States and actions may be declared in any order; successors are resolved
//! by label when [`ProblemBuilder::build`] runs, which is also where every
//! input invariant is checked.

use std::collections::{HashMap, HashSet};

use super::action::{Action, ActionName, Transition};
use super::problem::Problem;
use super::state::{GridCoord, State, StateId};
use crate::error::{InvalidMdp, Result};

/// Allowed deviation from 1.0 for the probabilities of a stochastic action.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
struct ActionSpec {
    state: String,
    name: ActionName,
    cost: f64,
    successors: Vec<(String, f64)>,
}

/// Incremental builder for a [`Problem`].
///
/// # Examples
///
/// ```
/// use mdp_planner::model::{ActionName, ProblemBuilder};
///
/// let mut builder = ProblemBuilder::new(1e-6);
/// builder
///     .state("S0")
///     .state("S1")
///     .action("S0", ActionName::East, 1.0, [("S1", 1.0)])
///     .goal("S1")
///     .initial("S0");
/// let problem = builder.build().unwrap();
///
/// assert_eq!(problem.len(), 2);
/// assert_eq!(problem.state_by_label("S0").unwrap().actions().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    epsilon: f64,
    states: Vec<(String, Option<GridCoord>)>,
    actions: Vec<ActionSpec>,
    goal: Option<String>,
    initial: Option<String>,
}

impl ProblemBuilder {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            states: Vec::new(),
            actions: Vec::new(),
            goal: None,
            initial: None,
        }
    }

    /// Declares a state that has no grid position.
    pub fn state(&mut self, label: impl Into<String>) -> &mut Self {
        self.states.push((label.into(), None));
        self
    }

    pub fn grid_state(&mut self, label: impl Into<String>, coord: GridCoord) -> &mut Self {
        self.states.push((label.into(), Some(coord)));
        self
    }

    /// Declares an action of `state`. Actions keep their declaration order,
    /// which is the order the Bellman backup enumerates them in. Action names
    /// must be unique within a state.
    pub fn action<N, I, S>(&mut self, state: &str, name: N, cost: f64, successors: I) -> &mut Self
    where
        N: Into<ActionName>,
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.actions.push(ActionSpec {
            state: state.to_string(),
            name: name.into(),
            cost,
            successors: successors
                .into_iter()
                .map(|(label, p)| (label.into(), p))
                .collect(),
        });
        self
    }

    pub fn goal(&mut self, label: &str) -> &mut Self {
        self.goal = Some(label.to_string());
        self
    }

    pub fn initial(&mut self, label: &str) -> &mut Self {
        self.initial = Some(label.to_string());
        self
    }

    /// Validates the declarations and produces the problem.
    pub fn build(&self) -> Result<Problem> {
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(InvalidMdp::InvalidEpsilon(self.epsilon).into());
        }

        let mut ids: HashMap<&str, StateId> = HashMap::with_capacity(self.states.len());
        let mut states = Vec::with_capacity(self.states.len());
        for (index, (label, coord)) in self.states.iter().enumerate() {
            let id = StateId(index);
            if ids.insert(label.as_str(), id).is_some() {
                return Err(InvalidMdp::DuplicateState(label.clone()).into());
            }
            states.push(State::new(id, label.clone(), *coord));
        }

        let lookup = |label: &str| -> Result<StateId> {
            ids.get(label)
                .copied()
                .ok_or_else(|| InvalidMdp::UnknownState(label.to_string()).into())
        };

        let goal = match &self.goal {
            Some(label) => lookup(label)?,
            None => return Err(InvalidMdp::MissingGoal.into()),
        };
        let initial = self.initial.as_deref().map(lookup).transpose()?;

        let mut declared = HashSet::with_capacity(self.actions.len());
        for spec in &self.actions {
            let owner = lookup(&spec.state)?;
            if !declared.insert((owner, &spec.name)) {
                return Err(InvalidMdp::DuplicateAction {
                    state: spec.state.clone(),
                    action: spec.name.to_string(),
                }
                .into());
            }
            let transitions = self.resolve_transitions(spec, &ids)?;
            states[owner.index()].push_action(Action::new(
                spec.name.clone(),
                owner,
                spec.cost,
                transitions,
            ));
        }

        Ok(Problem::new(states, goal, initial, self.epsilon))
    }

    fn resolve_transitions(
        &self,
        spec: &ActionSpec,
        ids: &HashMap<&str, StateId>,
    ) -> Result<Vec<Transition>> {
        if !(spec.cost >= 0.0 && spec.cost.is_finite()) {
            return Err(InvalidMdp::NegativeCost {
                state: spec.state.clone(),
                action: spec.name.to_string(),
                cost: spec.cost,
            }
            .into());
        }
        if spec.successors.is_empty() {
            return Err(InvalidMdp::EmptyTransitions {
                state: spec.state.clone(),
                action: spec.name.to_string(),
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(spec.successors.len());
        let mut transitions = Vec::with_capacity(spec.successors.len());
        for (label, probability) in &spec.successors {
            let successor =
                ids.get(label.as_str())
                    .copied()
                    .ok_or_else(|| InvalidMdp::UnknownSuccessor {
                        state: spec.state.clone(),
                        action: spec.name.to_string(),
                        successor: label.clone(),
                    })?;
            if !seen.insert(successor) {
                return Err(InvalidMdp::DuplicateSuccessor {
                    state: spec.state.clone(),
                    action: spec.name.to_string(),
                    successor: label.clone(),
                }
                .into());
            }
            transitions.push(Transition {
                successor,
                probability: *probability,
            });
        }

        if transitions.len() == 1 {
            // A lone successor is certain whatever the input said.
            transitions[0].probability = 1.0;
            return Ok(transitions);
        }

        for t in &transitions {
            if !(0.0..=1.0).contains(&t.probability) {
                return Err(InvalidMdp::InvalidProbability {
                    state: spec.state.clone(),
                    action: spec.name.to_string(),
                    probability: t.probability,
                }
                .into());
            }
        }
        let sum: f64 = transitions.iter().map(|t| t.probability).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(InvalidMdp::ProbabilitiesDoNotSumToOne {
                state: spec.state.clone(),
                action: spec.name.to_string(),
                sum,
            }
            .into());
        }

        Ok(transitions)
    }
}
