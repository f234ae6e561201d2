use crate::error::ModelError;

/// Tolerance on the sum of outcome probabilities for a single state-action pair
pub const PROB_TOLERANCE: f64 = 1e-6;

/// One possible result of taking an action in a state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Probability of this outcome
    pub prob: f64,
    /// State the environment moves to
    pub next_state: usize,
    /// Reward received for the transition
    pub reward: f64,
    /// Whether `next_state` ends the episode
    pub terminal: bool,
}

impl Outcome {
    pub fn new(prob: f64, next_state: usize, reward: f64, terminal: bool) -> Self {
        Self {
            prob,
            next_state,
            reward,
            terminal,
        }
    }

    /// A deterministic outcome
    pub fn certain(next_state: usize, reward: f64, terminal: bool) -> Self {
        Self::new(1.0, next_state, reward, terminal)
    }
}

/// The complete dynamics of a finite MDP
///
/// A dense `n_states x n_actions` table where each entry holds the ordered list of
/// [outcomes](Outcome) for that state-action pair. The table is validated once at
/// construction and is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    n_states: usize,
    n_actions: usize,
    table: Vec<Vec<Outcome>>, // row-major by (state, action)
}

impl TransitionModel {
    /// Build a model from a nested `table[state][action]` of outcome lists
    ///
    /// Fails if the table shape does not match `n_states` and `n_actions`, if any
    /// outcome list is empty, if a reward is not finite, or if the outcomes of a
    /// pair are not a probability distribution over valid states.
    pub fn new(
        n_states: usize,
        n_actions: usize,
        table: Vec<Vec<Vec<Outcome>>>,
    ) -> Result<Self, ModelError> {
        if table.len() != n_states {
            return Err(ModelError::DimensionMismatch {
                dimension: "states",
                expected: n_states,
                actual: table.len(),
            });
        }
        if let Some(row) = table.iter().find(|row| row.len() != n_actions) {
            return Err(ModelError::DimensionMismatch {
                dimension: "actions",
                expected: n_actions,
                actual: row.len(),
            });
        }

        let table = table.into_iter().flatten().collect::<Vec<_>>();
        let model = Self {
            n_states,
            n_actions,
            table,
        };
        model.validate()?;
        Ok(model)
    }

    /// Build a model by querying `f(state, action)` for every pair
    pub fn from_fn<F>(n_states: usize, n_actions: usize, mut f: F) -> Result<Self, ModelError>
    where
        F: FnMut(usize, usize) -> Vec<Outcome>,
    {
        let table = (0..n_states)
            .map(|s| (0..n_actions).map(|a| f(s, a)).collect())
            .collect();
        Self::new(n_states, n_actions, table)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_actions == 0 && self.n_states > 0 {
            return Err(ModelError::NoActions {
                n_states: self.n_states,
            });
        }

        for state in 0..self.n_states {
            for action in 0..self.n_actions {
                let outcomes = self.outcomes(state, action);
                if outcomes.is_empty() {
                    return Err(ModelError::EmptyOutcomes { state, action });
                }

                let mut sum = 0.0;
                for outcome in outcomes {
                    if !(0.0..=1.0).contains(&outcome.prob) {
                        return Err(ModelError::ProbabilityOutOfRange {
                            state,
                            action,
                            prob: outcome.prob,
                        });
                    }
                    if !outcome.reward.is_finite() {
                        return Err(ModelError::NonFiniteReward {
                            state,
                            action,
                            reward: outcome.reward,
                        });
                    }
                    if outcome.next_state >= self.n_states {
                        return Err(ModelError::StateOutOfRange {
                            state,
                            action,
                            next_state: outcome.next_state,
                            n_states: self.n_states,
                        });
                    }
                    sum += outcome.prob;
                }

                if (sum - 1.0).abs() > PROB_TOLERANCE {
                    return Err(ModelError::ProbabilitySum { state, action, sum });
                }
            }
        }

        Ok(())
    }

    /// Number of states
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Number of actions available in every state
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Outcomes of taking `action` in `state`
    ///
    /// **Panics** if either index is out of range
    pub fn outcomes(&self, state: usize, action: usize) -> &[Outcome] {
        assert!(
            state < self.n_states && action < self.n_actions,
            "Invalid state-action pair: ({}, {})",
            state,
            action
        );
        &self.table[state * self.n_actions + action]
    }

    /// One-step lookahead: `sum(prob * (reward + gamma * values[next_state]))`
    pub fn action_value(&self, state: usize, action: usize, values: &[f64], gamma: f64) -> f64 {
        self.outcomes(state, action)
            .iter()
            .map(|o| o.prob * (o.reward + gamma * values[o.next_state]))
            .sum()
    }

    /// Action values of every action in `state`, in action order
    pub fn action_values(&self, state: usize, values: &[f64], gamma: f64) -> Vec<f64> {
        (0..self.n_actions)
            .map(|action| self.action_value(state, action, values, gamma))
            .collect()
    }
}
