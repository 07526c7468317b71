//! The full simulation state: all subsystem fields plus planetary parameters.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::ops::StepSize;
use crate::grid::{GridSize, ScalarField, VectorField};
use crate::params::constants::{OMEGA, T0};

/// Errors raised while assembling a [`System`], before any simulation work.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be at least 2x2, got {width}x{height}")]
    InvalidGridSize { width: usize, height: usize },
    #[error("field has {actual} cells, expected {expected} ({width}x{height})")]
    FieldShapeMismatch {
        expected: usize,
        actual: usize,
        width: usize,
        height: usize,
    },
}

/// Planetary parameters, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Planet circumference in meters.
    pub circumference_m: f32,
    /// Axial tilt in radians.
    pub axial_tilt_rad: f32,
    /// Rotation speed in radians per second.
    pub rotation_speed_rad_s: f32,
    /// Length of the orbital year in days (0 disables the seasonal cycle).
    pub orbit_period_days: f32,
    /// Day of year at simulation start.
    pub day_of_year: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        // Earth-like baseline.
        Self {
            circumference_m: 40_075_000.0,
            axial_tilt_rad: 23.44f32.to_radians(),
            rotation_speed_rad_s: OMEGA,
            orbit_period_days: 365.25,
            day_of_year: 0.0,
        }
    }
}

/// Atmosphere state: one temperature and one velocity field.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereFields {
    pub temperature: ScalarField,
    pub velocity: VectorField,
}

/// Ocean state: one temperature and one velocity field.
#[derive(Debug, Clone, PartialEq)]
pub struct OceanFields {
    pub temperature: ScalarField,
    pub velocity: VectorField,
}

/// Ice state: temperature, drift velocity, and thickness in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct IceFields {
    pub temperature: ScalarField,
    pub velocity: VectorField,
    pub thickness: ScalarField,
}

/// Land state: temperature only.
#[derive(Debug, Clone, PartialEq)]
pub struct LandFields {
    pub temperature: ScalarField,
}

/// The complete field set of one simulation step.
///
/// `elevation` is shared, read-only input (positive above sea level); the
/// engine never mutates it, only carries it into the next generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    pub elevation: ScalarField,
    pub atmosphere: AtmosphereFields,
    pub ocean: OceanFields,
    pub ice: IceFields,
    pub land: LandFields,
}

/// The world state: grid size, planetary parameters, and all fields.
///
/// Every field has identical dimensions; the constructor enforces it. The
/// stepper replaces the whole field set at the end of each step, so a
/// `System` is never observable in a half-updated state.
#[derive(Debug, Clone)]
pub struct System {
    pub size: GridSize,
    pub planet: PlanetConfig,
    pub fields: Fields,
}

impl System {
    /// Creates a system from an elevation field, with every medium starting
    /// isothermal at `T0` and at rest.
    pub fn new(elevation: ScalarField, planet: PlanetConfig) -> Result<Self, ConfigError> {
        let size = elevation.size();
        if size.width < 2 || size.height < 2 {
            return Err(ConfigError::InvalidGridSize {
                width: size.width,
                height: size.height,
            });
        }

        let fields = Fields {
            elevation,
            atmosphere: AtmosphereFields {
                temperature: ScalarField::filled(size, T0),
                velocity: VectorField::filled(size, Vec2::ZERO),
            },
            ocean: OceanFields {
                temperature: ScalarField::filled(size, T0),
                velocity: VectorField::filled(size, Vec2::ZERO),
            },
            ice: IceFields {
                temperature: ScalarField::filled(size, T0),
                velocity: VectorField::filled(size, Vec2::ZERO),
                thickness: ScalarField::filled(size, 0.0),
            },
            land: LandFields {
                temperature: ScalarField::filled(size, T0),
            },
        };

        Ok(Self { size, planet, fields })
    }

    /// Creates a system from a flat row-major elevation buffer, validating
    /// its shape against the requested grid dimensions.
    pub fn from_raw(
        width: usize,
        height: usize,
        elevation: Vec<f32>,
        planet: PlanetConfig,
    ) -> Result<Self, ConfigError> {
        if width < 2 || height < 2 {
            return Err(ConfigError::InvalidGridSize { width, height });
        }
        let size = GridSize::new(width, height);
        let actual = elevation.len();
        let elevation = ScalarField::from_vec(size, elevation).ok_or(
            ConfigError::FieldShapeMismatch {
                expected: size.cell_count(),
                actual,
                width,
                height,
            },
        )?;
        Self::new(elevation, planet)
    }

    /// Physical cell spacing derived from the planet circumference.
    pub fn step_size(&self) -> StepSize {
        StepSize::from_circumference(
            self.planet.circumference_m,
            self.size.width,
            self.size.height,
        )
    }

    /// Replaces every medium's temperature field with the given profile,
    /// e.g. one from [`latitude_banded_temperature`].
    pub fn with_temperature_profile(mut self, profile: &ScalarField) -> Result<Self, ConfigError> {
        if profile.size() != self.size {
            return Err(ConfigError::FieldShapeMismatch {
                expected: self.size.cell_count(),
                actual: profile.size().cell_count(),
                width: self.size.width,
                height: self.size.height,
            });
        }
        self.fields.atmosphere.temperature = profile.clone();
        self.fields.ocean.temperature = profile.clone();
        self.fields.ice.temperature = profile.clone();
        self.fields.land.temperature = profile.clone();
        Ok(self)
    }
}

/// Latitude-banded initial temperature: `base` at the pole rows, rising
/// linearly to `base + range` toward the middle of the grid. Useful for
/// starting closer to a plausible climate than an isothermal field.
pub fn latitude_banded_temperature(size: GridSize, base: f32, range: f32) -> ScalarField {
    let half = size.height as f32 / 2.0;
    let step = range / half;
    let mut field = ScalarField::filled(size, base);
    for (x, y) in size.cells() {
        let factor = if (y as f32) < half {
            y as f32
        } else {
            size.height as f32 - y as f32
        };
        field.set(x, y, base + factor * step);
    }
    field
}
