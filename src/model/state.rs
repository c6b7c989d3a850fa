use std::fmt;

use super::action::Action;

/// Index of a state inside its [`Problem`](super::Problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell coordinates of a state that lives on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell `(x + dx, y + dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A state of the MDP.
///
/// `values[k]` is the estimate after iteration `k`; index 0 is always the
/// initial 0.0. The history only ever grows while solving.
#[derive(Debug, Clone)]
pub struct State {
    id: StateId,
    label: String,
    coord: Option<GridCoord>,
    actions: Vec<Action>,
    values: Vec<f64>,
    best_action: Option<usize>,
}

impl State {
    pub(crate) fn new(id: StateId, label: String, coord: Option<GridCoord>) -> Self {
        Self {
            id,
            label,
            coord,
            actions: Vec::new(),
            values: Vec::new(),
            best_action: None,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn coord(&self) -> Option<GridCoord> {
        self.coord
    }

    /// Outgoing actions in declaration order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Full value history, one entry per iteration.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value_at(&self, iteration: usize) -> Option<f64> {
        self.values.get(iteration).copied()
    }

    pub fn latest_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn best_action(&self) -> Option<&Action> {
        self.best_action.map(|index| &self.actions[index])
    }

    /// Position of the best action in [`State::actions`].
    pub fn best_action_index(&self) -> Option<usize> {
        self.best_action
    }

    pub(crate) fn push_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub(crate) fn push_value(&mut self, value: f64) {
        self.values.push(value);
    }

    pub(crate) fn set_best_action(&mut self, index: Option<usize>) {
        debug_assert!(index.map_or(true, |i| i < self.actions.len()));
        self.best_action = index;
    }

    pub(crate) fn reset(&mut self) {
        self.values.clear();
        self.best_action = None;
    }
}
