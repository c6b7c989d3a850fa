//! The Bellman backup for cost-minimising MDPs:
//!
//! `V(s) = min_a [ c(s, a) + sum_{s'} P(s' | s, a) V(s') ]`

use crate::error::{InvalidMdp, Result};
use crate::model::{Action, State, StateId};

/// Read-only source of successor values for a backup.
///
/// # Panics
/// The slice and `Vec` implementations panic when `state` is past the end
/// of the values, i.e. when they do not cover the whole problem.
pub trait ValueSource {
    fn value_of(&self, state: StateId) -> f64;
}

impl ValueSource for [f64] {
    fn value_of(&self, state: StateId) -> f64 {
        self[state.index()]
    }
}

impl ValueSource for Vec<f64> {
    fn value_of(&self, state: StateId) -> f64 {
        self.as_slice().value_of(state)
    }
}

/// Result of backing up one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backup {
    /// Minimal expected cost over the eligible actions.
    pub value: f64,
    /// Index of the minimising action in the state's action list.
    pub action: usize,
}

impl Backup {
    /// The minimising action.
    ///
    /// # Panics
    /// Panics if `state` is not the state this backup was computed for and
    /// has fewer actions.
    pub fn action<'a>(&self, state: &'a State) -> &'a Action {
        &state.actions()[self.action]
    }
}

/// Expected one-step cost of taking `action`: `c + sum_{s'} P(s') V(s')`.
pub fn q_value<V: ValueSource + ?Sized>(action: &Action, values: &V) -> f64 {
    let transitions = action.transitions();
    if let [only] = transitions {
        return action.cost() + values.value_of(only.successor);
    }
    action.cost()
        + transitions
            .iter()
            .map(|t| t.probability * values.value_of(t.successor))
            .sum::<f64>()
}

/// Backs up `state` against `values`.
///
/// Self-loops are skipped. Actions are compared with a strict `<` in
/// declaration order, so among equal-cost actions the earliest one wins.
pub fn backup<V: ValueSource + ?Sized>(state: &State, values: &V) -> Result<Backup> {
    let mut best: Option<Backup> = None;

    for (index, action) in state.actions().iter().enumerate() {
        if action.is_self_loop() {
            continue;
        }
        let q = q_value(action, values);
        if best.map_or(true, |b| q < b.value) {
            best = Some(Backup {
                value: q,
                action: index,
            });
        }
    }

    best.ok_or_else(|| {
        InvalidMdp::NoEligibleActions {
            state: state.label().to_string(),
        }
        .into()
    })
}
