//! Coupled-field planetary climate simulator.
//!
//! Advances temperature, velocity, and ice-thickness grids for four
//! interacting subsystems (atmosphere, ocean, ice, land) with explicit-Euler
//! finite differences on a torus-in-x / pole-clamped-in-y grid. The same
//! per-cell physics exists twice: a sequential CPU evaluator and a wgpu
//! compute variant that must agree within floating-point tolerance.

pub mod engine;
pub mod export;
pub mod gpu;
pub mod grid;
pub mod params;
pub mod physics;

pub use engine::{Backend, PlanetConfig, RunConfig, RunOutcome, Simulation, System};
pub use grid::{GridSize, ScalarField, VectorField};
pub use physics::CellContext;
