use crate::{error::ModelError, model::TransitionModel};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward)`, where `next_state` is `None` once the episode has terminated
    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f64);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Draw the current state of the environment, if the environment supports it
    fn render(&self) -> Option<String> {
        None
    }
}

/// An environment whose complete dynamics are known ahead of time
///
/// Implementors act as the model adapter for the [dynamic programming planners](crate::algo::dp):
/// states and actions are numbered densely from `0`, and the numbering must agree
/// with the `State` and `Action` values produced and consumed by [`Environment`].
pub trait KnownDynamics: Environment {
    /// Enumerate every transition of the environment
    fn transition_model(&self) -> Result<TransitionModel, ModelError>;
}
