pub mod dp;

use crate::{algo::dp::Solution, env::KnownDynamics, error::DpError, model::TransitionModel};

/// An algorithm that computes a policy from a known model of the environment
pub trait Planner {
    /// Solve the MDP described by `model`
    fn plan(&mut self, model: &TransitionModel) -> Result<Solution, DpError>;

    /// Build the model of `env` and solve it
    fn plan_env<E: KnownDynamics>(&mut self, env: &E) -> Result<Solution, DpError> {
        let model = env.transition_model()?;
        self.plan(&model)
    }
}
