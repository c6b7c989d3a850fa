//! Value iteration and policy iteration for finite, cost-minimising Markov
//! Decision Processes.
//!
//! ```
//! use mdp_planner::model::{ActionName, ProblemBuilder};
//! use mdp_planner::run_value_iteration;
//!
//! let mut builder = ProblemBuilder::new(1e-6);
//! builder
//!     .state("S0")
//!     .state("S1")
//!     .action("S0", ActionName::East, 1.0, [("S1", 1.0)])
//!     .goal("S1");
//! let mut problem = builder.build().unwrap();
//!
//! run_value_iteration(&mut problem).unwrap();
//! let s0 = problem.state_by_label("S0").unwrap();
//! assert_eq!(s0.latest_value(), Some(1.0));
//! assert_eq!(problem.best_action_name(s0.id()), Some(&ActionName::East));
//! ```

pub mod error;
pub mod grid;
pub mod model;
pub mod solver;

pub use error::{Error, InvalidMdp, Result};
pub use grid::{render_policy_grid, GridWorld};
pub use model::{Problem, ProblemBuilder};
pub use solver::{
    run_policy_iteration, run_value_iteration, MdpSolver, PolicyIteration, SolveReport,
    SolverConfig, StoppingRule, ValueIteration,
};
