use super::action::ActionName;
use super::policy::Policy;
use super::state::{GridCoord, State, StateId};

/// A fully specified MDP: states, goal, optional initial state and the
/// convergence threshold.
///
/// Problems are produced by [`ProblemBuilder`](super::ProblemBuilder), which
/// guarantees that every successor exists, that stochastic probabilities sum
/// to one and that `epsilon > 0`.
#[derive(Debug, Clone)]
pub struct Problem {
    states: Vec<State>,
    goal: StateId,
    initial: Option<StateId>,
    epsilon: f64,
}

impl Problem {
    pub(crate) fn new(
        states: Vec<State>,
        goal: StateId,
        initial: Option<StateId>,
        epsilon: f64,
    ) -> Self {
        Self {
            states,
            goal,
            initial,
            epsilon,
        }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// # Panics
    /// Panics if `id` does not belong to this problem.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn goal(&self) -> StateId {
        self.goal
    }

    pub fn is_goal(&self, id: StateId) -> bool {
        id == self.goal
    }

    /// Initial state, kept for reporting only.
    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn state_by_label(&self, label: &str) -> Option<&State> {
        self.states.iter().find(|s| s.label() == label)
    }

    pub fn state_at(&self, coord: GridCoord) -> Option<&State> {
        self.states.iter().find(|s| s.coord() == Some(coord))
    }

    /// Name of the state's current best action; `None` for the goal or an
    /// unsolved state.
    pub fn best_action_name(&self, id: StateId) -> Option<&ActionName> {
        self.state(id).best_action().map(|a| a.name())
    }

    /// The policy currently stored on the states.
    pub fn policy(&self) -> Policy {
        Policy::from_choices(self.states.iter().map(|s| s.best_action_index()).collect())
    }

    /// Latest value of every state, indexed by [`StateId`].
    pub fn latest_values(&self) -> Vec<f64> {
        self.states
            .iter()
            .map(|s| s.latest_value().unwrap_or(0.0))
            .collect()
    }

    /// Clears every value history and best action so the problem can be
    /// solved again.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }

    /// Snapshot of every state's value at `iteration`.
    pub(crate) fn snapshot(&self, iteration: usize) -> Vec<f64> {
        self.states
            .iter()
            .map(|s| s.values()[iteration])
            .collect()
    }

    pub(crate) fn push_initial_values(&mut self) {
        for state in &mut self.states {
            state.push_value(0.0);
        }
    }

    pub(crate) fn push_values(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.states.len());
        for (state, &value) in self.states.iter_mut().zip(values) {
            state.push_value(value);
        }
    }

    pub(crate) fn apply_policy(&mut self, policy: &Policy) {
        for state in &mut self.states {
            state.set_best_action(policy.action_of(state.id()));
        }
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.index()]
    }
}
