//! Simulation state and the sequential time-stepping engine.

mod config;
mod stepper;
mod system;

pub use config::{Backend, RunConfig};
pub use stepper::{cell_rates, step, CellRates, RunOutcome, Simulation};
pub use system::{
    latitude_banded_temperature, AtmosphereFields, ConfigError, Fields, IceFields, LandFields,
    OceanFields, PlanetConfig, System,
};
