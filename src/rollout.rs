use std::{thread, time::Duration};

use log::{info, warn};

use crate::env::Environment;

/// Configuration for [`rollout`]
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutConfig {
    /// The episode is cut off after this many steps
    ///
    /// **Default**: `100`
    pub max_steps: usize,
    /// Pause after drawing each frame
    ///
    /// **Default**: `None`
    pub frame_delay: Option<Duration>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            frame_delay: None,
        }
    }
}

/// Summary of a single episode played by [`rollout`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RolloutReport {
    pub steps: usize,
    pub total_reward: f64,
    /// Whether the episode reached a terminal state within `max_steps`
    pub terminated: bool,
}

/// Play one episode in `env`, always taking `policy[state]`
///
/// Each frame the environment can [render](Environment::render) is logged at `info` level.
///
/// **Panics** if the environment reaches a state that `policy` has no entry for
pub fn rollout<E>(env: &mut E, policy: &[usize], config: &RolloutConfig) -> RolloutReport
where
    E: Environment<State = usize>,
    E::Action: From<usize>,
{
    let mut report = RolloutReport::default();
    let mut state = env.reset();

    for _ in 0..config.max_steps {
        draw(env, config);

        assert!(
            state < policy.len(),
            "Policy has no action for state {}",
            state
        );
        let action: E::Action = policy[state].into();
        let (next, reward) = env.step(action);
        report.steps += 1;
        report.total_reward += reward;

        match next {
            Some(next) => state = next,
            None => {
                report.terminated = true;
                break;
            }
        }
    }
    draw(env, config);

    if report.terminated {
        info!("Episode reward: {}", report.total_reward);
    } else {
        warn!(
            "The agent didn't reach a terminal state in {} steps.",
            config.max_steps
        );
    }

    report
}

fn draw<E: Environment>(env: &E, config: &RolloutConfig) {
    if let Some(frame) = env.render() {
        info!("\n{}", frame);
        if let Some(delay) = config.frame_delay {
            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk right along a corridor of `len` cells, the last of which ends the episode
    struct Corridor {
        len: usize,
        pos: usize,
    }

    impl Environment for Corridor {
        type State = usize;
        type Action = usize;

        fn step(&mut self, action: usize) -> (Option<usize>, f64) {
            self.pos = match action {
                0 => self.pos.saturating_sub(1),
                _ => (self.pos + 1).min(self.len - 1),
            };
            if self.pos == self.len - 1 {
                (None, 1.0)
            } else {
                (Some(self.pos), -0.1)
            }
        }

        fn reset(&mut self) -> usize {
            self.pos = 0;
            self.pos
        }

        fn render(&self) -> Option<String> {
            Some(
                (0..self.len)
                    .map(|i| if i == self.pos { '@' } else { '.' })
                    .collect(),
            )
        }
    }

    #[test]
    fn reaches_terminal_state() {
        let mut env = Corridor { len: 4, pos: 0 };
        let report = rollout(&mut env, &[1, 1, 1, 1], &RolloutConfig::default());

        assert_eq!(report.steps, 3);
        assert!(report.terminated);
        assert!((report.total_reward - 0.8).abs() < 1e-9);
    }

    #[test]
    fn stops_after_max_steps() {
        let mut env = Corridor { len: 4, pos: 0 };
        let config = RolloutConfig {
            max_steps: 5,
            ..Default::default()
        };
        let report = rollout(&mut env, &[0, 0, 0, 0], &config);

        assert_eq!(report.steps, 5);
        assert!(!report.terminated);
        assert!((report.total_reward + 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_steps() {
        let mut env = Corridor { len: 2, pos: 0 };
        let config = RolloutConfig {
            max_steps: 0,
            ..Default::default()
        };
        assert_eq!(rollout(&mut env, &[1, 1], &config), RolloutReport::default());
    }

    #[test]
    #[should_panic(expected = "Policy has no action for state 1")]
    fn short_policy() {
        let mut env = Corridor { len: 4, pos: 0 };
        rollout(&mut env, &[1], &RolloutConfig::default());
    }
}
