/// Implemented planning algorithms
pub mod algo;

/// Error types
pub mod error;

/// Environment
pub mod env;

/// Explicit transition models
pub mod model;

/// Progress reporting for the iterative algorithms
pub mod observer;

/// Playing out a computed policy
pub mod rollout;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;
