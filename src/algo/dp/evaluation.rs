use std::mem;

use log::debug;

use crate::{
    error::DpError,
    model::TransitionModel,
    observer::{Phase, Sweep, SweepObserver},
    util::max_abs_diff,
};

use super::{check_policy, DpConfig};

/// Compute the state-value function of a fixed `policy`
///
/// Starts from all zeros and applies the policy's Bellman expectation backup
/// until the sup-norm gap between two successive sweeps is below `config.tol`.
///
/// **Errors** if `config` or the policy is invalid, or with
/// [`DpError::NonConvergence`] after `config.max_sweeps` sweeps.
pub fn policy_evaluation<O>(
    model: &TransitionModel,
    policy: &[usize],
    config: &DpConfig,
    observer: &mut O,
) -> Result<Vec<f64>, DpError>
where
    O: SweepObserver + ?Sized,
{
    let initial = vec![0.0; model.n_states()];
    policy_evaluation_from(model, policy, initial, config, observer)
}

/// Same as [`policy_evaluation`] but starting from the given value function
pub fn policy_evaluation_from<O>(
    model: &TransitionModel,
    policy: &[usize],
    initial: Vec<f64>,
    config: &DpConfig,
    observer: &mut O,
) -> Result<Vec<f64>, DpError>
where
    O: SweepObserver + ?Sized,
{
    config.check()?;
    check_policy(model, policy)?;
    if initial.len() != model.n_states() {
        return Err(DpError::ValueLength {
            expected: model.n_states(),
            actual: initial.len(),
        });
    }

    let DpConfig {
        gamma,
        tol,
        max_sweeps,
        ..
    } = *config;

    // Every value of a sweep is computed from `current` only
    let mut current = initial;
    let mut next = vec![0.0; model.n_states()];
    let mut gap = f64::INFINITY;

    for index in 1..=max_sweeps {
        for (state, value) in next.iter_mut().enumerate() {
            *value = model.action_value(state, policy[state], &current, gamma);
        }
        gap = max_abs_diff(&next, &current);
        mem::swap(&mut current, &mut next);

        observer.on_sweep(&Sweep {
            phase: Phase::PolicyEvaluation,
            index,
            gap,
            values: &current,
        });

        if gap < tol {
            debug!("Policy evaluation converged after {} sweeps", index);
            return Ok(current);
        }
    }

    Err(DpError::NonConvergence {
        routine: "policy evaluation",
        iterations: max_sweeps,
        gap,
    })
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;
    use crate::{
        algo::dp::testing,
        model::Outcome,
        observer::{LogObserver, Silent},
    };

    #[test]
    fn chain_values() {
        let model = testing::chain();
        let config = DpConfig::default();
        let values = policy_evaluation(&model, &[0; 4], &config, &mut Silent).unwrap();

        assert_float_eq!(values, vec![0.81, 0.9, 1.0, 0.0], abs_all <= 1e-3);
    }

    #[test]
    fn terminal_self_loop_is_worth_nothing() {
        let model = TransitionModel::from_fn(2, 1, |s, _| match s {
            0 => vec![Outcome::certain(1, 5.0, true)],
            _ => vec![Outcome::certain(1, 0.0, true)],
        })
        .unwrap();
        let values =
            policy_evaluation(&model, &[0, 0], &DpConfig::new(0.99, 1e-9), &mut Silent).unwrap();

        assert_eq!(values[1], 0.0);
        assert_eq!(values[0], 5.0);
    }

    #[test]
    fn contraction_from_any_start() {
        let model = testing::random(7, 12, 3);
        let policy = (0..12).map(|s| s % 3).collect::<Vec<_>>();
        let config = DpConfig::new(0.9, 1e-6);

        let from_zeros = policy_evaluation(&model, &policy, &config, &mut Silent).unwrap();
        let from_ones =
            policy_evaluation_from(&model, &policy, vec![1.0; 12], &config, &mut Silent).unwrap();
        let from_far =
            policy_evaluation_from(&model, &policy, vec![-50.0; 12], &config, &mut Silent)
                .unwrap();

        // The sweep gap bounds the distance to the fixed point by gamma / (1 - gamma) * tol
        let bound = 2.0 * 9.0 * config.tol;
        assert_float_eq!(from_zeros, from_ones, abs_all <= bound);
        assert_float_eq!(from_zeros, from_far, abs_all <= bound);
    }

    #[test]
    fn converged_values_are_stable() {
        let model = testing::random(11, 8, 2);
        let policy = vec![1; 8];
        let config = DpConfig::default();

        let values = policy_evaluation(&model, &policy, &config, &mut Silent).unwrap();
        let again =
            policy_evaluation_from(&model, &policy, values.clone(), &config, &mut Silent).unwrap();

        assert_float_eq!(values, again, abs_all <= config.tol);
    }

    #[test]
    fn observer_sees_every_sweep() {
        let model = testing::chain();
        let mut sweeps = vec![];
        let mut observer = |sweep: &Sweep| {
            assert_eq!(sweep.phase, Phase::PolicyEvaluation);
            sweeps.push((sweep.index, sweep.gap, sweep.values.to_vec()));
        };
        let values =
            policy_evaluation(&model, &[0; 4], &DpConfig::default(), &mut observer).unwrap();

        // Values are exact after three sweeps, the fourth confirms a zero gap
        assert_eq!(sweeps.len(), 4);
        assert_eq!(
            sweeps.iter().map(|s| s.0).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(sweeps[0].2, vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(sweeps[3].1, 0.0);
        assert_eq!(sweeps[3].2, values);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let model = testing::chain();
        let config = DpConfig::default();

        let err = policy_evaluation(&model, &[0; 3], &config, &mut Silent).unwrap_err();
        assert!(matches!(err, DpError::PolicyLength { .. }));

        let err = policy_evaluation(&model, &[0, 0, 1, 0], &config, &mut Silent).unwrap_err();
        assert!(matches!(err, DpError::InvalidAction { state: 2, .. }));

        let err = policy_evaluation_from(&model, &[0; 4], vec![0.0; 2], &config, &mut Silent)
            .unwrap_err();
        assert!(matches!(err, DpError::ValueLength { .. }));
    }

    #[test]
    fn undiscounted_reward_loop_does_not_converge() {
        let model =
            TransitionModel::from_fn(1, 1, |_, _| vec![Outcome::certain(0, 1.0, false)]).unwrap();
        let config = DpConfig {
            max_sweeps: 50,
            ..DpConfig::new(1.0, 1e-3)
        };
        let err = policy_evaluation(&model, &[0], &config, &mut LogObserver).unwrap_err();

        assert_eq!(
            err,
            DpError::NonConvergence {
                routine: "policy evaluation",
                iterations: 50,
                gap: 1.0
            }
        );
    }

    #[test]
    fn overflowing_values_do_not_converge() {
        // Values reach infinity on the second sweep and stay there
        let model = TransitionModel::from_fn(1, 1, |_, _| {
            vec![Outcome::certain(0, f64::MAX, false)]
        })
        .unwrap();
        let config = DpConfig {
            max_sweeps: 10,
            ..DpConfig::new(1.0, 1e-3)
        };
        let err = policy_evaluation(&model, &[0], &config, &mut Silent).unwrap_err();

        assert_eq!(
            err,
            DpError::NonConvergence {
                routine: "policy evaluation",
                iterations: 10,
                gap: f64::INFINITY
            }
        );
    }

    #[test]
    fn rejects_discount_above_one() {
        let model =
            TransitionModel::from_fn(1, 1, |_, _| vec![Outcome::certain(0, 1.0, false)]).unwrap();
        let config = DpConfig {
            gamma: 2.0,
            ..Default::default()
        };
        let err = policy_evaluation(&model, &[0], &config, &mut Silent).unwrap_err();

        assert_eq!(
            err,
            DpError::InvalidParameter {
                name: "gamma",
                value: 2.0
            }
        );
    }

    #[test]
    fn zero_tolerance_does_not_converge() {
        let model = testing::chain();
        let config = DpConfig {
            tol: 0.0,
            max_sweeps: 20,
            ..Default::default()
        };
        let err = policy_evaluation(&model, &[0; 4], &config, &mut Silent).unwrap_err();

        assert!(matches!(
            err,
            DpError::NonConvergence { iterations: 20, gap, .. } if gap == 0.0
        ));
    }
}
