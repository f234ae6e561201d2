use std::{error::Error, time::Duration};

use clap::{Parser, ValueEnum};
use rl_dp::{
    algo::{
        dp::{DpConfig, PolicyIteration, Solution, ValueIteration},
        Planner,
    },
    env::KnownDynamics,
    gym::FrozenLake,
    rollout::{rollout, RolloutConfig},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Lake {
    #[value(name = "deterministic-4x4")]
    Deterministic4x4,
    #[value(name = "stochastic-4x4")]
    Stochastic4x4,
    #[value(name = "deterministic-8x8")]
    Deterministic8x8,
    #[value(name = "stochastic-8x8")]
    Stochastic8x8,
}

impl Lake {
    fn make(self) -> FrozenLake {
        match self {
            Lake::Deterministic4x4 => FrozenLake::deterministic_4x4(),
            Lake::Stochastic4x4 => FrozenLake::stochastic_4x4(),
            Lake::Deterministic8x8 => FrozenLake::deterministic_8x8(),
            Lake::Stochastic8x8 => FrozenLake::stochastic_8x8(),
        }
    }
}

/// Run policy iteration and value iteration on a frozen lake and watch the results
#[derive(Parser, Debug)]
struct Args {
    /// The environment to plan in
    #[arg(long, value_enum, default_value = "deterministic-4x4")]
    env: Lake,
    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,
    /// Convergence tolerance on the value function
    #[arg(long, default_value_t = 1e-3)]
    tol: f64,
    /// Steps before an episode is cut off
    #[arg(long, default_value_t = 100)]
    max_steps: usize,
    /// Milliseconds to pause between rendered frames
    #[arg(long, default_value_t = 250)]
    frame_ms: u64,
}

fn report(env: &mut FrozenLake, solution: &Solution, rollout_config: &RolloutConfig) {
    println!("Resulting policy: {:?}", solution.policy);
    println!("\tValue function = {:.3?}", solution.values);
    rollout(env, &solution.policy, rollout_config);
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut env = args.env.make();
    let model = env.transition_model()?;
    let config = DpConfig::new(args.gamma, args.tol);
    let rollout_config = RolloutConfig {
        max_steps: args.max_steps,
        frame_delay: Some(Duration::from_millis(args.frame_ms)),
    };

    println!("\n{0}\nBeginning Policy Iteration\n{0}", "-".repeat(25));
    let solution = PolicyIteration::new(config).plan(&model)?;
    report(&mut env, &solution, &rollout_config);

    println!("\n{0}\nBeginning Value Iteration\n{0}", "-".repeat(25));
    let solution = ValueIteration::new(config).plan(&model)?;
    report(&mut env, &solution, &rollout_config);

    Ok(())
}
