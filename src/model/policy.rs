use super::state::StateId;

/// An immutable assignment of one action per state.
///
/// Entries are indices into the owning state's action list; the goal state
/// (and any state not yet decided) maps to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    choices: Vec<Option<usize>>,
}

impl Policy {
    /// A policy over `num_states` states with nothing chosen yet.
    pub fn empty(num_states: usize) -> Self {
        Self {
            choices: vec![None; num_states],
        }
    }

    pub fn from_choices(choices: Vec<Option<usize>>) -> Self {
        Self { choices }
    }

    pub fn action_of(&self, state: StateId) -> Option<usize> {
        self.choices.get(state.index()).copied().flatten()
    }

    /// # Panics
    /// Panics if `state` is outside the policy.
    pub fn set(&mut self, state: StateId, action: Option<usize>) {
        self.choices[state.index()] = action;
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, Option<usize>)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .map(|(index, choice)| (StateId(index), *choice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_lookup() {
        let mut policy = Policy::empty(2);
        policy.set(StateId(1), Some(3));
        assert_eq!(policy.action_of(StateId(0)), None);
        assert_eq!(policy.action_of(StateId(1)), Some(3));
        // Lookups outside the policy are undecided rather than a panic.
        assert_eq!(policy.action_of(StateId(5)), None);
    }

    #[test]
    #[should_panic]
    fn test_set_outside_policy_panics() {
        let mut policy = Policy::empty(2);
        policy.set(StateId(2), Some(0));
    }
}
