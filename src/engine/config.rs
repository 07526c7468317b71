//! Run configuration.

use serde::{Deserialize, Serialize};

/// Which evaluator executes the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// Prefer the GPU kernels; fall back to the sequential evaluator if no
    /// adapter can be acquired.
    Auto,
    /// Require the GPU kernels (fail the run if unavailable).
    GpuOnly,
    /// Force the sequential evaluator.
    CpuOnly,
}

impl Default for Backend {
    fn default() -> Self {
        Self::Auto
    }
}

/// Parameters of one fixed-duration run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total number of time steps.
    pub total_steps: u64,
    /// Steps between emitted snapshots (0 disables snapshots).
    pub snapshot_interval: u64,
    /// Fixed time step in seconds.
    pub dt: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        // One simulated day at 30-second steps, snapshot every hour.
        // The air column's thermal mass makes the surface-exchange mode
        // stiff; explicit Euler needs dt below ~40 s to stay stable.
        Self {
            total_steps: 2880,
            snapshot_interval: 120,
            dt: 30.0,
        }
    }
}
