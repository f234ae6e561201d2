use thiserror::Error;

/// Reasons a transition table is rejected when building a [`TransitionModel`](crate::model::TransitionModel)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("expected {expected} {dimension}, got {actual}")]
    DimensionMismatch {
        dimension: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("model has {n_states} states but no actions")]
    NoActions { n_states: usize },

    #[error("no outcomes for state {state}, action {action}")]
    EmptyOutcomes { state: usize, action: usize },

    #[error("probability {prob} for state {state}, action {action} is outside [0, 1]")]
    ProbabilityOutOfRange {
        state: usize,
        action: usize,
        prob: f64,
    },

    #[error("probabilities for state {state}, action {action} sum to {sum} instead of 1")]
    ProbabilitySum {
        state: usize,
        action: usize,
        sum: f64,
    },

    #[error("reward {reward} for state {state}, action {action} is not finite")]
    NonFiniteReward {
        state: usize,
        action: usize,
        reward: f64,
    },

    #[error("state {state}, action {action} leads to state {next_state}, but there are only {n_states} states")]
    StateOutOfRange {
        state: usize,
        action: usize,
        next_state: usize,
        n_states: usize,
    },
}

/// Errors raised by the dynamic programming planners
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DpError {
    /// The iteration guard ran out before the sup-norm gap dropped below `tol`
    #[error("{routine} did not converge after {iterations} iterations (last gap {gap})")]
    NonConvergence {
        routine: &'static str,
        iterations: usize,
        gap: f64,
    },

    #[error("invalid value {value} for `{name}`")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("policy has {actual} entries but the model has {expected} states")]
    PolicyLength { expected: usize, actual: usize },

    #[error("value function has {actual} entries but the model has {expected} states")]
    ValueLength { expected: usize, actual: usize },

    #[error("policy picks action {action} in state {state}, but there are only {n_actions} actions")]
    InvalidAction {
        state: usize,
        action: usize,
        n_actions: usize,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}
