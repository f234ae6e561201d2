use log::debug;

use crate::{
    algo::Planner,
    error::DpError,
    model::TransitionModel,
    observer::{LogObserver, Phase, Sweep, SweepObserver},
    util::max_abs_diff,
};

use super::{policy_evaluation, policy_improvement, DpConfig, Solution};

/// Alternate policy evaluation and policy improvement until the value function settles
///
/// Starts from the policy that always picks action `0`. Each round improves the
/// current policy, evaluates the candidate and compares its values to the previous
/// round's. The loop ends when that sup-norm gap drops below `config.tol`, so a
/// model with equally good actions may take extra rounds after the policy itself
/// has stopped changing.
///
/// **Errors** if `config` is invalid, or with [`DpError::NonConvergence`] if any
/// evaluation exceeds `config.max_sweeps` or the rounds exceed `config.max_rounds`.
pub fn policy_iteration<O>(
    model: &TransitionModel,
    config: &DpConfig,
    observer: &mut O,
) -> Result<Solution, DpError>
where
    O: SweepObserver + ?Sized,
{
    config.check()?;

    let mut policy = vec![0; model.n_states()];
    let mut values = policy_evaluation(model, &policy, config, observer)?;
    let mut gap = f64::INFINITY;

    for round in 1..=config.max_rounds {
        policy = policy_improvement(model, &values, &policy, config.gamma)?;
        let candidate = policy_evaluation(model, &policy, config, observer)?;
        gap = max_abs_diff(&candidate, &values);
        values = candidate;

        observer.on_sweep(&Sweep {
            phase: Phase::PolicyIteration,
            index: round,
            gap,
            values: &values,
        });

        if gap < config.tol {
            debug!("Policy iteration converged after {} rounds", round);
            return Ok(Solution {
                values,
                policy,
                iterations: round,
            });
        }
    }

    Err(DpError::NonConvergence {
        routine: "policy iteration",
        iterations: config.max_rounds,
        gap,
    })
}

/// A [`Planner`] running [`policy_iteration`]
#[derive(Debug, Clone)]
pub struct PolicyIteration<O: SweepObserver = LogObserver> {
    config: DpConfig,
    observer: O,
}

impl PolicyIteration {
    /// Initialize a planner that reports progress through the [`log`] facade
    pub fn new(config: DpConfig) -> Self {
        Self {
            config,
            observer: LogObserver,
        }
    }
}

impl Default for PolicyIteration {
    fn default() -> Self {
        Self::new(DpConfig::default())
    }
}

impl<O: SweepObserver> PolicyIteration<O> {
    /// Replace the progress observer
    pub fn with_observer<P: SweepObserver>(self, observer: P) -> PolicyIteration<P> {
        PolicyIteration {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &DpConfig {
        &self.config
    }
}

impl<O: SweepObserver> Planner for PolicyIteration<O> {
    fn plan(&mut self, model: &TransitionModel) -> Result<Solution, DpError> {
        policy_iteration(model, &self.config, &mut self.observer)
    }
}
