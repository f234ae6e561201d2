//! Dynamic programming planners for MDPs with a fully known [`TransitionModel`]

pub mod evaluation;
pub mod improvement;
pub mod policy_iteration;
pub mod value_iteration;

pub use evaluation::{policy_evaluation, policy_evaluation_from};
pub use improvement::{greedy_action, policy_improvement};
pub use policy_iteration::{policy_iteration, PolicyIteration};
pub use value_iteration::{value_iteration, ValueIteration};

use crate::{assert_interval, error::DpError, model::TransitionModel};

/// Configuration shared by the dynamic programming routines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpConfig {
    /// Discount factor applied to every future reward
    ///
    /// **Default**: `0.9`
    pub gamma: f64,
    /// Iteration stops once the sup-norm gap between successive value functions is below `tol`
    ///
    /// **Default**: `1e-3`
    pub tol: f64,
    /// Maximum number of sweeps for a single policy evaluation or value iteration run
    ///
    /// **Default**: `100_000`
    pub max_sweeps: usize,
    /// Maximum number of improvement rounds in policy iteration
    ///
    /// **Default**: `10_000`
    pub max_rounds: usize,
}

impl Default for DpConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            tol: 1e-3,
            max_sweeps: 100_000,
            max_rounds: 10_000,
        }
    }
}

impl DpConfig {
    /// Default limits with a custom discount factor and tolerance
    ///
    /// **Panics** if `gamma` is not in the interval `[0,1]`
    pub fn new(gamma: f64, tol: f64) -> Self {
        assert_interval!(gamma, 0.0, 1.0);
        Self {
            gamma,
            tol,
            ..Default::default()
        }
    }

    /// Reject a discount factor outside `[0,1]` or a negative or NaN tolerance
    ///
    /// Every routine runs this before its first sweep.
    pub fn check(&self) -> Result<(), DpError> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DpError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
            });
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(DpError::InvalidParameter {
                name: "tol",
                value: self.tol,
            });
        }
        Ok(())
    }
}

/// A value function together with the greedy policy it was produced with
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// `values[s]` is the expected discounted return from state `s`
    pub values: Vec<f64>,
    /// `policy[s]` is the action to take in state `s`
    pub policy: Vec<usize>,
    /// Rounds (policy iteration) or sweeps (value iteration) until convergence
    pub iterations: usize,
}

fn check_policy(model: &TransitionModel, policy: &[usize]) -> Result<(), DpError> {
    if policy.len() != model.n_states() {
        return Err(DpError::PolicyLength {
            expected: model.n_states(),
            actual: policy.len(),
        });
    }
    match policy
        .iter()
        .enumerate()
        .find(|&(_, &a)| a >= model.n_actions())
    {
        Some((state, &action)) => Err(DpError::InvalidAction {
            state,
            action,
            n_actions: model.n_actions(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::model::{Outcome, TransitionModel};

    /// `0 -> 1 -> 2 -> 3`, reward 1 for entering the absorbing state 3
    pub fn chain() -> TransitionModel {
        TransitionModel::from_fn(4, 1, |s, _| match s {
            0 | 1 => vec![Outcome::certain(s + 1, 0.0, false)],
            2 => vec![Outcome::certain(3, 1.0, true)],
            _ => vec![Outcome::certain(3, 0.0, true)],
        })
        .unwrap()
    }

    /// A two-state model where both actions in state 0 are exactly equivalent
    pub fn tie() -> TransitionModel {
        TransitionModel::from_fn(2, 3, |s, a| match (s, a) {
            (0, 0) | (0, 1) => vec![Outcome::certain(1, 1.0, true)],
            (0, _) => vec![Outcome::certain(1, 0.5, true)],
            _ => vec![Outcome::certain(1, 0.0, true)],
        })
        .unwrap()
    }

    /// Dense random model with up to three outcomes per pair
    pub fn random(seed: u64, n_states: usize, n_actions: usize) -> TransitionModel {
        let mut rng = StdRng::seed_from_u64(seed);
        TransitionModel::from_fn(n_states, n_actions, |_, _| {
            let n = rng.gen_range(1..=3);
            let weights = (0..n).map(|_| rng.gen_range(0.1..1.0)).collect::<Vec<f64>>();
            let total: f64 = weights.iter().sum();
            weights
                .into_iter()
                .map(|w| {
                    Outcome::new(
                        w / total,
                        rng.gen_range(0..n_states),
                        rng.gen_range(-1.0..1.0),
                        false,
                    )
                })
                .collect()
        })
        .unwrap()
    }
}
