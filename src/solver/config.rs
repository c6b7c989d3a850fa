/// How value iteration decides that it has converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoppingRule {
    /// Stop once the smallest sweep residual seen so far is within epsilon.
    /// This is the historical behaviour and the default.
    #[default]
    MinimumResidual,
    /// Stop once the residual of the latest sweep is within epsilon.
    LatestResidual,
}

/// Configuration shared by the planners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Convergence statistic used by value iteration.
    pub stopping_rule: StoppingRule,
    /// Upper bound on sweeps (value iteration), outer rounds and inner
    /// evaluation sweeps (policy iteration). `None` loops until convergence.
    pub max_iterations: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            stopping_rule: StoppingRule::MinimumResidual,
            max_iterations: None,
        }
    }
}

impl SolverConfig {
    pub fn with_stopping_rule(mut self, stopping_rule: StoppingRule) -> Self {
        self.stopping_rule = stopping_rule;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub(crate) fn exhausted(&self, iterations: usize) -> bool {
        self.max_iterations.is_some_and(|cap| iterations >= cap)
    }
}
