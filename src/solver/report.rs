use std::time::Duration;

use super::Algorithm;

/// Summary of a completed solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub algorithm: Algorithm,
    /// Sweeps for value iteration, improvement rounds for policy iteration.
    pub iterations: usize,
    pub elapsed: Duration,
    /// `residuals[k]` is the residual of sweep (or the final evaluation
    /// sweep of round) `k + 1`.
    pub residuals: Vec<f64>,
    /// The statistic compared against epsilon after every value-iteration
    /// sweep. Empty for policy iteration.
    pub stopping_statistics: Vec<f64>,
    /// Inner evaluation sweeps per policy-iteration round. Empty for value
    /// iteration.
    pub evaluation_sweeps: Vec<usize>,
}

impl SolveReport {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            iterations: 0,
            elapsed: Duration::ZERO,
            residuals: Vec::new(),
            stopping_statistics: Vec::new(),
            evaluation_sweeps: Vec::new(),
        }
    }

    pub fn final_residual(&self) -> Option<f64> {
        self.residuals.last().copied()
    }
}
