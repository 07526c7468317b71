//! Derived forcing quantities.
//!
//! Pure functions of grid position, time, and field samples. Everything here
//! has a WGSL twin in `gpu/shaders/common.wgsl`; the two must stay
//! numerically identical for the backends to agree.

use glam::Vec2;

use crate::grid::ops::{gradient, StepSize};
use crate::grid::ScalarField;

use super::constants::{
    ALBEDO_ATMOSPHERE, ALPHA_DRAG, EMISSIVITY, GAMMA, H_MAX, H_TRANSFER, ICE_AIR_COEFFICIENT,
    LAMBDA_BASE, S0, SECONDS_PER_DAY, SIGMA,
};

/// Latitude in degrees for grid row `y`. Row 0 maps to +90° (north pole),
/// the last row to -90°.
pub fn latitude_deg(y: usize, height: usize) -> f32 {
    ((height - 1 - y) as f32 / (height - 1) as f32) * 180.0 - 90.0
}

/// Coriolis parameter `2·Ω·sin(latitude)` for grid row `y`.
pub fn coriolis(y: usize, height: usize, rotation_speed: f32) -> f32 {
    2.0 * rotation_speed * latitude_deg(y, height).to_radians().sin()
}

/// Hour angle of the day in radians: `(speed·t·180/π) mod 360 − 180` degrees.
pub fn hour_angle(rotation_speed: f32, time: f32) -> f32 {
    let degrees = (rotation_speed * time).to_degrees() % 360.0 - 180.0;
    degrees.to_radians()
}

/// Effective axial tilt for the current day of the orbital year.
pub fn seasonal_tilt(axial_tilt: f32, orbit_period: f32, day_of_year: f32) -> f32 {
    if orbit_period == 0.0 {
        return axial_tilt;
    }
    let year_angle = (2.0 * std::f32::consts::PI / orbit_period) * day_of_year;
    axial_tilt * year_angle.cos()
}

/// Continuous day-of-year counter after `time` seconds of simulation.
///
/// Both evaluators derive the seasonal forcing from this, so they agree on
/// every step.
pub fn day_of_year(start_day: f32, time: f32, orbit_period: f32) -> f32 {
    if orbit_period == 0.0 {
        return start_day;
    }
    (start_day + time / SECONDS_PER_DAY) % orbit_period
}

/// Incoming solar flux (W/m^2) at a latitude for the given effective tilt and
/// hour angle. Zero on the night side (negative projection).
pub fn solar_flux(latitude_deg: f32, tilt: f32, hour_angle: f32) -> f32 {
    let lat = latitude_deg.to_radians();
    let projection = lat.cos() * tilt.cos() * hour_angle.cos() + lat.sin() * tilt.sin();
    if projection < 0.0 {
        return 0.0;
    }
    lat.cos() * S0 * (1.0 - ALBEDO_ATMOSPHERE) * projection
}

/// Heat flux from medium 1 into medium 2 (W/m^2), positive when `t1 > t2`.
pub fn exchange(t1: f32, t2: f32) -> f32 {
    H_TRANSFER * (t1 - t2)
}

/// Air-ice heat exchange, active only where ice is present.
pub fn ice_air_exchange(air_temperature: f32, ice_temperature: f32, thickness: f32) -> f32 {
    if thickness > 0.0 {
        ICE_AIR_COEFFICIENT * (air_temperature - ice_temperature)
    } else {
        0.0
    }
}

/// Stefan-Boltzmann radiative loss `σ·T⁴` (W/m^2).
pub fn radiative_loss(temperature: f32) -> f32 {
    SIGMA * temperature.powi(4)
}

/// Radiative loss scaled by the gray-body emissivity factor.
pub fn graybody_loss(temperature: f32) -> f32 {
    EMISSIVITY * radiative_loss(temperature)
}

/// Drag coefficient: base drag plus a topographic term from the local
/// elevation gradient.
pub fn drag(elevation: &ScalarField, x: usize, y: usize, step: StepSize) -> f32 {
    LAMBDA_BASE + ALPHA_DRAG * gradient(elevation, x, y, step).length()
}

/// Rotates a vector 90° for the Coriolis deflection term (`k × v`).
pub fn cross_direction(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Normalizes `v`, returning the zero vector instead of NaN when `|v| = 0`.
pub fn unit_or_zero(v: Vec2) -> Vec2 {
    if v == Vec2::ZERO {
        Vec2::ZERO
    } else {
        v / v.length()
    }
}

/// Surface stress exerted by a moving medium: `−drag·ρ·|v|²·unit(v)`.
pub fn stress(velocity: Vec2, density: f32, drag: f32) -> Vec2 {
    -drag * density * velocity.length_squared() * unit_or_zero(velocity)
}

/// Unit vector along elevation contours, zero where the surface is flat.
///
/// The gradient is rotated clockwise (row 0 is the top of the grid).
pub fn surface_normal(elevation: &ScalarField, x: usize, y: usize, step: StepSize) -> Vec2 {
    let g = gradient(elevation, x, y, step);
    let length = g.length();
    if length == 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(g.y, -g.x) / length
}

/// Obstruction force where elevation deflects the flow:
/// `γ·(min(h, h_max)/h_max)·(v·n)·n`. Zero over open ocean.
pub fn topographic_forcing(
    elevation: &ScalarField,
    velocity: Vec2,
    x: usize,
    y: usize,
    step: StepSize,
) -> Vec2 {
    let h = elevation.get(x, y);
    if h <= 0.0 {
        return Vec2::ZERO;
    }
    let n = surface_normal(elevation, x, y, step);
    GAMMA * (h.min(H_MAX) / H_MAX) * velocity.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSize;

    #[test]
    fn latitude_endpoints_and_midpoint() {
        assert_eq!(latitude_deg(0, 9), 90.0);
        assert_eq!(latitude_deg(8, 9), -90.0);
        assert_eq!(latitude_deg(4, 9), 0.0);
    }

    #[test]
    fn coriolis_vanishes_at_the_equator_and_flips_sign() {
        let omega = super::super::constants::OMEGA;
        assert!(coriolis(4, 9, omega).abs() < 1e-9);
        let north = coriolis(0, 9, omega);
        let south = coriolis(8, 9, omega);
        assert!(north > 0.0);
        assert!((north + south).abs() < 1e-9);
        assert!((north - 2.0 * omega).abs() < 1e-6);
    }

    #[test]
    fn hour_angle_starts_at_local_midnight() {
        let w = super::super::constants::OMEGA;
        assert!((hour_angle(w, 0.0) - (-std::f32::consts::PI)).abs() < 1e-6);
        // Half a rotation later the angle crosses zero (local noon).
        let half_day = std::f32::consts::PI / w;
        assert!(hour_angle(w, half_day).abs() < 1e-3);
    }

    #[test]
    fn solar_flux_is_zero_on_the_night_side() {
        // Midnight at the equator, no tilt: projection = cos(π) < 0.
        assert_eq!(solar_flux(0.0, 0.0, std::f32::consts::PI), 0.0);
    }

    #[test]
    fn solar_flux_peaks_at_noon_on_the_equator() {
        let q = solar_flux(0.0, 0.0, 0.0);
        let expected = S0 * (1.0 - ALBEDO_ATMOSPHERE);
        assert!((q - expected).abs() < 1e-3);
        // Oblique latitude receives less.
        assert!(solar_flux(60.0, 0.0, 0.0) < q);
    }

    #[test]
    fn exchange_is_positive_hot_to_cold_and_antisymmetric() {
        let q = exchange(280.0, 270.0);
        assert_eq!(q, 300.0);
        assert_eq!(exchange(270.0, 280.0), -q);
    }

    #[test]
    fn ice_air_exchange_is_gated_on_thickness() {
        assert_eq!(ice_air_exchange(280.0, 260.0, 0.0), 0.0);
        let q = ice_air_exchange(280.0, 260.0, 1.0);
        assert!((q - 0.003 * 20.0).abs() < 1e-6);
    }

    #[test]
    fn radiative_loss_matches_stefan_boltzmann() {
        let q = radiative_loss(273.15);
        assert!((q - 5.67e-8 * 273.15f32.powi(4)).abs() < 1e-4);
        assert!((graybody_loss(273.15) - 0.75 * q).abs() < 1e-4);
    }

    #[test]
    fn stress_of_a_zero_velocity_is_zero() {
        assert_eq!(stress(Vec2::ZERO, 1.225, 0.001), Vec2::ZERO);
    }

    #[test]
    fn stress_scales_quadratically_with_speed() {
        let s1 = stress(Vec2::new(5.0, 0.0), 1025.0, 0.001);
        let s2 = stress(Vec2::new(10.0, 0.0), 1025.0, 0.001);
        assert!((s2.x / s1.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn solar_flux_is_symmetric_about_the_equator_without_tilt() {
        for lat in [15.0f32, 40.0, 75.0] {
            let north = solar_flux(lat, 0.0, 0.3);
            let south = solar_flux(-lat, 0.0, 0.3);
            assert!((north - south).abs() < 1e-4);
        }
    }

    #[test]
    fn stress_opposes_the_flow() {
        let s = stress(Vec2::new(10.0, 0.0), 1.225, 0.001);
        assert!(s.x < 0.0);
        assert_eq!(s.y, 0.0);
        assert!((s.x + 0.001 * 1.225 * 100.0).abs() < 1e-4);
    }

    #[test]
    fn flat_terrain_has_no_normal_and_no_forcing() {
        let f = ScalarField::filled(GridSize::new(4, 4), 0.0);
        let step = StepSize { dx: 1.0, dy: 1.0 };
        assert_eq!(surface_normal(&f, 1, 1, step), Vec2::ZERO);
        assert_eq!(
            topographic_forcing(&f, Vec2::new(5.0, 5.0), 1, 1, step),
            Vec2::ZERO
        );
    }

    #[test]
    fn drag_grows_with_the_elevation_gradient() {
        let size = GridSize::new(8, 8);
        let data = size.cells().map(|(x, _)| x as f32 * 100.0).collect();
        let f = ScalarField::from_vec(size, data).unwrap();
        let step = StepSize { dx: 1000.0, dy: 1000.0 };
        let flat = ScalarField::filled(size, 0.0);
        assert!(drag(&f, 3, 3, step) > drag(&flat, 3, 3, step));
        assert_eq!(drag(&flat, 3, 3, step), LAMBDA_BASE);
    }

    #[test]
    fn seasonal_tilt_oscillates_over_the_year() {
        let tilt = 0.4;
        assert!((seasonal_tilt(tilt, 360.0, 0.0) - tilt).abs() < 1e-6);
        assert!(seasonal_tilt(tilt, 360.0, 180.0) < 0.0);
        assert_eq!(seasonal_tilt(tilt, 0.0, 12.0), tilt);
    }

    #[test]
    fn day_of_year_wraps_at_the_orbit_period() {
        let d = day_of_year(359.0, 2.0 * SECONDS_PER_DAY, 360.0);
        assert!((d - 1.0).abs() < 1e-3);
    }
}
