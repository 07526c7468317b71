//! Per-cell evaluation context.

use crate::engine::System;
use crate::grid::ops::StepSize;
use crate::params::{coriolis, day_of_year, hour_angle, latitude_deg, seasonal_tilt, solar_flux};

/// The minimal data needed to evaluate physics at one grid point: the cell
/// coordinates, the physical step sizes, the elapsed simulation time, and
/// read access to the full previous-step [`System`].
///
/// Built fresh for every cell on every step and passed by reference into the
/// physics functions.
#[derive(Clone, Copy)]
pub struct CellContext<'a> {
    pub x: usize,
    pub y: usize,
    pub step: StepSize,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    pub system: &'a System,
}

impl<'a> CellContext<'a> {
    pub fn new(system: &'a System, x: usize, y: usize, time: f32) -> Self {
        Self {
            x,
            y,
            step: system.step_size(),
            time,
            system,
        }
    }

    /// Latitude of this cell's row in degrees.
    pub fn latitude_deg(&self) -> f32 {
        latitude_deg(self.y, self.system.size.height)
    }

    /// Coriolis parameter for this cell's row.
    pub fn coriolis(&self) -> f32 {
        coriolis(
            self.y,
            self.system.size.height,
            self.system.planet.rotation_speed_rad_s,
        )
    }

    /// Top-of-atmosphere solar flux at this cell and time.
    pub fn solar_flux(&self) -> f32 {
        let planet = &self.system.planet;
        let day = day_of_year(planet.day_of_year, self.time, planet.orbit_period_days);
        let tilt = seasonal_tilt(planet.axial_tilt_rad, planet.orbit_period_days, day);
        let omega = hour_angle(planet.rotation_speed_rad_s, self.time);
        solar_flux(self.latitude_deg(), tilt, omega)
    }

    /// Elevation at this cell (positive above sea level).
    pub fn elevation(&self) -> f32 {
        self.system.fields.elevation.get(self.x, self.y)
    }
}
