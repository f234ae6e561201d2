use log::debug;

use crate::{
    algo::Planner,
    error::DpError,
    model::TransitionModel,
    observer::{LogObserver, Phase, Sweep, SweepObserver},
    util::max_abs_diff,
};

use super::{greedy_action, DpConfig, Solution};

/// One synchronous Bellman optimality backup
///
/// **Returns** `(new_values, greedy_policy)`, both computed from `values` alone
fn backup(model: &TransitionModel, values: &[f64], gamma: f64) -> (Vec<f64>, Vec<usize>) {
    (0..model.n_states())
        .map(|state| {
            let (action, value) = greedy_action(model, state, values, gamma);
            (value, action)
        })
        .unzip()
}

/// Iterate the Bellman optimality operator until the value function settles
///
/// The returned policy is the greedy policy recorded during the final sweep, i.e.
/// greedy with respect to the second to last value function.
///
/// **Errors** if `config` is invalid, or with [`DpError::NonConvergence`] after
/// `config.max_sweeps` sweeps.
pub fn value_iteration<O>(
    model: &TransitionModel,
    config: &DpConfig,
    observer: &mut O,
) -> Result<Solution, DpError>
where
    O: SweepObserver + ?Sized,
{
    config.check()?;

    let mut values = vec![0.0; model.n_states()];
    let mut gap = f64::INFINITY;

    for index in 1..=config.max_sweeps {
        let (next, policy) = backup(model, &values, config.gamma);
        gap = max_abs_diff(&next, &values);
        values = next;

        observer.on_sweep(&Sweep {
            phase: Phase::ValueIteration,
            index,
            gap,
            values: &values,
        });

        if gap < config.tol {
            debug!("Value iteration converged after {} sweeps", index);
            return Ok(Solution {
                values,
                policy,
                iterations: index,
            });
        }
    }

    Err(DpError::NonConvergence {
        routine: "value iteration",
        iterations: config.max_sweeps,
        gap,
    })
}

/// A [`Planner`] running [`value_iteration`]
#[derive(Debug, Clone)]
pub struct ValueIteration<O: SweepObserver = LogObserver> {
    config: DpConfig,
    observer: O,
}

impl ValueIteration {
    /// Initialize a planner that reports progress through the [`log`] facade
    pub fn new(config: DpConfig) -> Self {
        Self {
            config,
            observer: LogObserver,
        }
    }
}

impl Default for ValueIteration {
    fn default() -> Self {
        Self::new(DpConfig::default())
    }
}

impl<O: SweepObserver> ValueIteration<O> {
    /// Replace the progress observer
    pub fn with_observer<P: SweepObserver>(self, observer: P) -> ValueIteration<P> {
        ValueIteration {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &DpConfig {
        &self.config
    }
}

impl<O: SweepObserver> Planner for ValueIteration<O> {
    fn plan(&mut self, model: &TransitionModel) -> Result<Solution, DpError> {
        value_iteration(model, &self.config, &mut self.observer)
    }
}
