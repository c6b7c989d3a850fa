use std::fmt;

use super::state::StateId;

/// Name of an action.
///
/// The four grid moves are closed variants so that policy seeding and
/// rendering can match on them; any other name falls back to `Named`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionName {
    East,
    North,
    South,
    West,
    Named(String),
}

/// Order in which policy iteration seeds its initial policy.
pub const INITIAL_POLICY_PRIORITY: [ActionName; 4] = [
    ActionName::East,
    ActionName::North,
    ActionName::South,
    ActionName::West,
];

impl ActionName {
    /// Parses a textual action name, recognising the `move-*` grid moves.
    pub fn parse(name: &str) -> Self {
        match name {
            "move-east" => ActionName::East,
            "move-north" => ActionName::North,
            "move-south" => ActionName::South,
            "move-west" => ActionName::West,
            other => ActionName::Named(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionName::East => "move-east",
            ActionName::North => "move-north",
            ActionName::South => "move-south",
            ActionName::West => "move-west",
            ActionName::Named(name) => name,
        }
    }

    /// Returns the grid displacement `(dx, dy)` of a move, `None` for named actions.
    pub fn delta(&self) -> Option<(i32, i32)> {
        match self {
            ActionName::East => Some((1, 0)),
            ActionName::North => Some((0, 1)),
            ActionName::South => Some((0, -1)),
            ActionName::West => Some((-1, 0)),
            ActionName::Named(_) => None,
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ActionName {
    fn from(name: &str) -> Self {
        ActionName::parse(name)
    }
}

impl From<String> for ActionName {
    fn from(name: String) -> Self {
        ActionName::parse(&name)
    }
}

/// One possible outcome of an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub successor: StateId,
    pub probability: f64,
}

/// An action available in a state.
///
/// Transitions keep the order in which the successors were declared. A single
/// transition always carries probability 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: ActionName,
    owner: StateId,
    cost: f64,
    transitions: Vec<Transition>,
}

impl Action {
    pub(crate) fn new(
        name: ActionName,
        owner: StateId,
        cost: f64,
        transitions: Vec<Transition>,
    ) -> Self {
        Self {
            name,
            owner,
            cost,
            transitions,
        }
    }

    pub fn name(&self) -> &ActionName {
        &self.name
    }

    pub fn owner(&self) -> StateId {
        self.owner
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn is_deterministic(&self) -> bool {
        self.transitions.len() == 1
    }

    /// A deterministic action that leaves the agent where it is.
    pub fn is_self_loop(&self) -> bool {
        self.is_deterministic() && self.transitions[0].successor == self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid_moves() {
        assert_eq!(ActionName::parse("move-east"), ActionName::East);
        assert_eq!(ActionName::parse("move-north"), ActionName::North);
        assert_eq!(ActionName::parse("move-south"), ActionName::South);
        assert_eq!(ActionName::parse("move-west"), ActionName::West);
        assert_eq!(
            ActionName::parse("jump"),
            ActionName::Named("jump".to_string())
        );
        assert_eq!(ActionName::West.to_string(), "move-west");
        assert_eq!(ActionName::from("jump").as_str(), "jump");
    }

    #[test]
    fn test_self_loop_detection() {
        let stay = Action::new(
            ActionName::East,
            StateId(3),
            1.0,
            vec![Transition {
                successor: StateId(3),
                probability: 1.0,
            }],
        );
        assert!(stay.is_self_loop());

        // Staying put as one outcome of a stochastic move is not a self-loop.
        let slip = Action::new(
            ActionName::East,
            StateId(3),
            1.0,
            vec![
                Transition {
                    successor: StateId(4),
                    probability: 0.8,
                },
                Transition {
                    successor: StateId(3),
                    probability: 0.2,
                },
            ],
        );
        assert!(!slip.is_self_loop());
        assert!(!slip.is_deterministic());
    }
}
