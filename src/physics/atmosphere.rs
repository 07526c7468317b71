//! Atmosphere heat and momentum budget.

use glam::Vec2;

use crate::grid::ops::{gradient, laplacian, local_derivative, local_derivative_vec};
use crate::params::constants::{CP_AIR, K_AIR, RHO_AIR, R_AIR};
use crate::params::{cross_direction, drag, exchange, ice_air_exchange, topographic_forcing};

use super::CellContext;

/// Net heat flux into the air column (W/m^2): absorbed shortwave plus
/// lateral diffusion, minus the exchanges with the three surfaces below.
pub fn heat_flux(ctx: &CellContext) -> f32 {
    let f = &ctx.system.fields;
    let t_air = f.atmosphere.temperature.get(ctx.x, ctx.y);
    let t_ocean = f.ocean.temperature.get(ctx.x, ctx.y);
    let t_land = f.land.temperature.get(ctx.x, ctx.y);
    let t_ice = f.ice.temperature.get(ctx.x, ctx.y);
    let ice_thickness = f.ice.thickness.get(ctx.x, ctx.y);

    let diffusion = K_AIR * laplacian(&f.atmosphere.temperature, ctx.x, ctx.y, ctx.step);

    ctx.solar_flux() + diffusion
        - exchange(t_air, t_ocean)
        - exchange(t_air, t_land)
        - ice_air_exchange(t_air, t_ice, ice_thickness)
}

/// Momentum forcing (m/s^2): Coriolis deflection, pressure from the
/// temperature gradient, surface drag, and topographic obstruction, all
/// opposing or redirecting the flow.
pub fn motion(ctx: &CellContext) -> Vec2 {
    let f = &ctx.system.fields;
    let v = f.atmosphere.velocity.get(ctx.x, ctx.y);
    let grad_t = gradient(&f.atmosphere.temperature, ctx.x, ctx.y, ctx.step);
    let drag_coefficient = drag(&f.elevation, ctx.x, ctx.y, ctx.step);
    let topography = topographic_forcing(&f.elevation, v, ctx.x, ctx.y, ctx.step);

    -(ctx.coriolis() * cross_direction(v) + R_AIR * grad_t + drag_coefficient * v + topography)
}

/// Eulerian temperature rate (K/s).
pub fn temperature_rate(ctx: &CellContext) -> f32 {
    let f = &ctx.system.fields;
    let v = f.atmosphere.velocity.get(ctx.x, ctx.y);
    let material = heat_flux(ctx) / (RHO_AIR * CP_AIR);
    local_derivative(&f.atmosphere.temperature, v, material, ctx.x, ctx.y, ctx.step)
}

/// Eulerian velocity rate (m/s^2); the wind advects itself.
pub fn velocity_rate(ctx: &CellContext) -> Vec2 {
    let f = &ctx.system.fields;
    let v = f.atmosphere.velocity.get(ctx.x, ctx.y);
    local_derivative_vec(&f.atmosphere.velocity, v, motion(ctx), ctx.x, ctx.y, ctx.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PlanetConfig, System};
    use crate::grid::{GridSize, ScalarField};
    use crate::params::constants::T0;

    fn uniform_system() -> System {
        let size = GridSize::new(6, 6);
        System::new(
            ScalarField::filled(size, 0.0),
            PlanetConfig {
                axial_tilt_rad: 0.0,
                ..PlanetConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn uniform_state_has_no_motion_forcing() {
        let system = uniform_system();
        let ctx = CellContext::new(&system, 2, 3, 0.0);
        assert_eq!(motion(&ctx), Vec2::ZERO);
        assert_eq!(velocity_rate(&ctx), Vec2::ZERO);
    }

    #[test]
    fn uniform_state_heat_flux_is_solar_only() {
        // All temperatures equal: every exchange and the diffusion vanish.
        let system = uniform_system();
        let ctx = CellContext::new(&system, 1, 2, 0.0);
        assert!((heat_flux(&ctx) - ctx.solar_flux()).abs() < 1e-4);
    }

    #[test]
    fn warm_surfaces_heat_the_cooler_air() {
        let mut system = uniform_system();
        for (x, y) in system.size.cells() {
            system.fields.ocean.temperature.set(x, y, T0 + 10.0);
            system.fields.land.temperature.set(x, y, T0 + 10.0);
        }
        let ctx = CellContext::new(&system, 2, 2, 0.0);
        let q = heat_flux(&ctx);
        let baseline = CellContext::new(&uniform_system(), 2, 2, 0.0).solar_flux();
        assert!(q > baseline, "air under warmer surfaces must gain heat");
    }

    #[test]
    fn drag_decelerates_a_uniform_wind() {
        let size = GridSize::new(6, 6);
        let mut system = System::new(
            ScalarField::filled(size, 0.0),
            PlanetConfig {
                axial_tilt_rad: 0.0,
                rotation_speed_rad_s: 0.0,
                ..PlanetConfig::default()
            },
        )
        .unwrap();
        for (x, y) in size.cells() {
            system.fields.atmosphere.velocity.set(x, y, Vec2::new(10.0, 0.0));
        }
        // No rotation, uniform temperature, flat terrain: only base drag remains.
        let ctx = CellContext::new(&system, 2, 2, 0.0);
        let m = motion(&ctx);
        assert!((m.x - (-0.001 * 10.0)).abs() < 1e-6);
        assert_eq!(m.y, 0.0);
    }
}
