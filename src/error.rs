use thiserror::Error;

use crate::solver::Algorithm;

/// Defects in an externally supplied model.
///
/// These are never recoverable inside a solver: the model has to be fixed
/// and rebuilt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidMdp {
    #[error("state `{state}` has no eligible (non self-loop) actions")]
    NoEligibleActions { state: String },

    #[error("state `{state}` offers none of move-east, move-north, move-south, move-west")]
    NoInitialPolicyAction { state: String },

    #[error("action `{action}` of state `{state}` references unknown successor `{successor}`")]
    UnknownSuccessor {
        state: String,
        action: String,
        successor: String,
    },

    #[error("policy assigns no action to non-goal state `{state}`")]
    MissingPolicyAction { state: String },

    #[error("state `{0}` is defined more than once")]
    DuplicateState(String),

    #[error("state `{0}` is not defined")]
    UnknownState(String),

    #[error("no goal state was designated")]
    MissingGoal,

    #[error("epsilon must be a positive finite number, got {0}")]
    InvalidEpsilon(f64),

    #[error("action `{action}` of state `{state}` has invalid cost {cost}")]
    NegativeCost {
        state: String,
        action: String,
        cost: f64,
    },

    #[error("action `{action}` of state `{state}` has invalid probability {probability}")]
    InvalidProbability {
        state: String,
        action: String,
        probability: f64,
    },

    #[error("probabilities of action `{action}` of state `{state}` sum to {sum}, expected 1.0")]
    ProbabilitiesDoNotSumToOne {
        state: String,
        action: String,
        sum: f64,
    },

    #[error("action `{action}` of state `{state}` has no successors")]
    EmptyTransitions { state: String, action: String },

    #[error("action `{action}` of state `{state}` lists successor `{successor}` twice")]
    DuplicateSuccessor {
        state: String,
        action: String,
        successor: String,
    },

    #[error("state `{state}` declares action `{action}` more than once")]
    DuplicateAction { state: String, action: String },

    #[error("grid dimensions must be positive, got {width} x {height}")]
    InvalidGridSize { width: i32, height: i32 },

    #[error("slip probability must lie in [0, 1), got {0}")]
    InvalidSlip(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid MDP: {0}")]
    InvalidMdp(#[from] InvalidMdp),

    #[error("{algorithm} did not converge after {iterations} iterations (residual {residual})")]
    DidNotConverge {
        algorithm: Algorithm,
        iterations: usize,
        residual: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
