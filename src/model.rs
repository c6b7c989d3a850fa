//! In-memory model of a finite, cost-based Markov Decision Process.
//!
//! A [`Problem`] owns every [`State`]; each state owns its outgoing
//! [`Action`]s in the order they were declared. Solvers only ever append to a
//! state's value history and overwrite its best action.

pub mod action;
pub mod builder;
pub mod policy;
pub mod problem;
pub mod state;

pub use action::{Action, ActionName, Transition, INITIAL_POLICY_PRIORITY};
pub use builder::{ProblemBuilder, PROBABILITY_TOLERANCE};
pub use policy::Policy;
pub use problem::Problem;
pub use state::{GridCoord, State, StateId};
