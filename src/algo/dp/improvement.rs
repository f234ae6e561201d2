use log::trace;

use crate::{error::DpError, model::TransitionModel, util::argmax};

use super::check_policy;

/// The best action in `state` under a one-step lookahead on `values`, with its action value
///
/// Ties go to the lowest action index.
///
/// **Panics** if `state` or a successor of `state` is out of range for `values`
pub fn greedy_action(
    model: &TransitionModel,
    state: usize,
    values: &[f64],
    gamma: f64,
) -> (usize, f64) {
    argmax(&model.action_values(state, values, gamma))
}

/// Derive the greedy policy with respect to `values`
///
/// Returns a new policy; neither `values` nor the previous `policy` are modified.
///
/// **Errors** if `values` or `policy` does not fit the model
pub fn policy_improvement(
    model: &TransitionModel,
    values: &[f64],
    policy: &[usize],
    gamma: f64,
) -> Result<Vec<usize>, DpError> {
    check_policy(model, policy)?;
    if values.len() != model.n_states() {
        return Err(DpError::ValueLength {
            expected: model.n_states(),
            actual: values.len(),
        });
    }

    let new_policy = (0..model.n_states())
        .map(|state| greedy_action(model, state, values, gamma).0)
        .collect::<Vec<_>>();

    let changed = policy
        .iter()
        .zip(&new_policy)
        .filter(|(old, new)| old != new)
        .count();
    trace!(
        "Policy improvement changed {} of {} states",
        changed,
        new_policy.len()
    );

    Ok(new_policy)
}
