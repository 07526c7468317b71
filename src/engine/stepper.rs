//! Sequential time-stepping engine.
//!
//! Each step reads the previous, immutable field set, evaluates every
//! subsystem's rate at every cell (cells are independent, so the traversal
//! is parallelized with rayon), applies explicit Euler integration, and
//! swaps in a complete new field set. Cross-cell feedback within a step is
//! impossible by construction.

use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;
use rayon::prelude::*;

use crate::physics::{atmosphere, ice, land, ocean, CellContext};

use super::config::RunConfig;
use super::system::{Fields, System};

/// Per-cell rates of change for every evolving field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellRates {
    pub air_temperature: f32,
    pub air_velocity: Vec2,
    pub ocean_temperature: f32,
    pub ocean_velocity: Vec2,
    pub ice_temperature: f32,
    pub ice_velocity: Vec2,
    pub ice_thickness: f32,
    pub land_temperature: f32,
}

/// Evaluates all subsystem rates at one cell of the previous state.
pub fn cell_rates(ctx: &CellContext) -> CellRates {
    CellRates {
        air_temperature: atmosphere::temperature_rate(ctx),
        air_velocity: atmosphere::velocity_rate(ctx),
        ocean_temperature: ocean::temperature_rate(ctx),
        ocean_velocity: ocean::velocity_rate(ctx),
        ice_temperature: ice::temperature_rate(ctx),
        ice_velocity: ice::velocity_rate(ctx),
        ice_thickness: ice::thickness_rate(ctx),
        land_temperature: land::temperature_rate(ctx),
    }
}

/// Applies `next = previous + rate·dt` to every field, clamping ice
/// thickness at zero and pinning ocean velocity to zero on land cells.
fn integrate(system: &System, rates: &[CellRates], dt: f32) -> Fields {
    let prev = &system.fields;
    let mut next = prev.clone();
    let width = system.size.width;

    for (i, r) in rates.iter().enumerate() {
        let (x, y) = (i % width, i / width);

        next.atmosphere
            .temperature
            .set(x, y, prev.atmosphere.temperature.get(x, y) + r.air_temperature * dt);
        next.atmosphere
            .velocity
            .set(x, y, prev.atmosphere.velocity.get(x, y) + r.air_velocity * dt);

        next.ocean
            .temperature
            .set(x, y, prev.ocean.temperature.get(x, y) + r.ocean_temperature * dt);
        let ocean_v = if prev.elevation.get(x, y) > 0.0 {
            Vec2::ZERO
        } else {
            prev.ocean.velocity.get(x, y) + r.ocean_velocity * dt
        };
        next.ocean.velocity.set(x, y, ocean_v);

        next.ice
            .temperature
            .set(x, y, prev.ice.temperature.get(x, y) + r.ice_temperature * dt);
        next.ice
            .velocity
            .set(x, y, prev.ice.velocity.get(x, y) + r.ice_velocity * dt);
        let thickness = (prev.ice.thickness.get(x, y) + r.ice_thickness * dt).max(0.0);
        next.ice.thickness.set(x, y, thickness);

        next.land
            .temperature
            .set(x, y, prev.land.temperature.get(x, y) + r.land_temperature * dt);
    }

    next
}

/// Advances the system by one step, returning the complete next-generation
/// field set. `time` is the elapsed simulation time at the start of the step.
pub fn step(system: &System, time: f32, dt: f32) -> Fields {
    let width = system.size.width;
    let rates: Vec<CellRates> = (0..system.size.cell_count())
        .into_par_iter()
        .map(|i| {
            let ctx = CellContext::new(system, i % width, i / width, time);
            cell_rates(&ctx)
        })
        .collect();

    integrate(system, &rates, dt)
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All configured steps completed.
    Completed,
    /// The cancellation signal was observed at an iteration boundary.
    Cancelled,
}

/// A configured sequential run.
pub struct Simulation {
    system: System,
    config: RunConfig,
}

impl Simulation {
    pub fn new(system: System, config: RunConfig) -> Self {
        Self { system, config }
    }

    /// Runs the configured number of steps, emitting a cloned snapshot of
    /// the state every `snapshot_interval` steps. The cancellation flag is
    /// checked once per iteration; state replacement is atomic per step, so
    /// cancellation never leaves a half-updated system.
    pub fn run(
        mut self,
        cancel: &AtomicBool,
        mut observe: impl FnMut(u64, System),
    ) -> (System, RunOutcome) {
        for i in 0..self.config.total_steps {
            if cancel.load(Ordering::Relaxed) {
                return (self.system, RunOutcome::Cancelled);
            }

            let time = i as f32 * self.config.dt;
            self.system.fields = step(&self.system, time, self.config.dt);

            if self.config.snapshot_interval > 0 && (i + 1) % self.config.snapshot_interval == 0 {
                observe(i + 1, self.system.clone());
            }
        }
        (self.system, RunOutcome::Completed)
    }
}
