//! Ocean heat and momentum budget.
//!
//! Ocean cells are the ones at or below sea level (`elevation <= 0`); on
//! land cells the momentum terms are clamped to zero and only the heat
//! budget runs (shallow coastal water is treated as part of the column).

use glam::Vec2;

use crate::grid::ops::{gradient, laplacian, local_derivative, local_derivative_vec, neighbors};
use crate::params::constants::{
    ALBEDO_WATER, BETA_WATER, CP_WATER, G, K_WATER, LAMBDA_BASE, RHO_AIR, RHO_ICE, RHO_WATER,
    TAU_TRANSMISSION,
};
use crate::params::{cross_direction, exchange, radiative_loss, stress, surface_normal};

use super::CellContext;

/// Net heat flux into the water column (W/m^2): shortwave transmitted
/// through the atmosphere, lateral diffusion, longwave loss, and the
/// exchanges with land, ice, and air.
pub fn heat_flux(ctx: &CellContext) -> f32 {
    let f = &ctx.system.fields;
    let t_ocean = f.ocean.temperature.get(ctx.x, ctx.y);
    let t_air = f.atmosphere.temperature.get(ctx.x, ctx.y);
    let t_land = f.land.temperature.get(ctx.x, ctx.y);
    let t_ice = f.ice.temperature.get(ctx.x, ctx.y);

    let transmitted = TAU_TRANSMISSION * (1.0 - ALBEDO_WATER) * ctx.solar_flux();
    let diffusion = K_WATER * laplacian(&f.ocean.temperature, ctx.x, ctx.y, ctx.step);

    transmitted + diffusion
        - radiative_loss(t_ocean)
        - exchange(t_ocean, t_land)
        - exchange(t_ocean, t_ice)
        - exchange(t_ocean, t_air)
}

/// True when any axis-aligned neighbor rises above sea level.
pub fn is_coastal(ctx: &CellContext) -> bool {
    let n = neighbors(&ctx.system.fields.elevation, ctx.x, ctx.y);
    n.up > 0.0 || n.down > 0.0 || n.left > 0.0 || n.right > 0.0
}

/// Coastline reflection: cancels the outward-normal velocity component on
/// coastal cells so currents run along the shore instead of into it.
pub fn boundary(ctx: &CellContext) -> Vec2 {
    if !is_coastal(ctx) {
        return Vec2::ZERO;
    }
    let f = &ctx.system.fields;
    let v = f.ocean.velocity.get(ctx.x, ctx.y);
    let n = surface_normal(&f.elevation, ctx.x, ctx.y, ctx.step);
    -v.dot(n) * n
}

/// Momentum forcing (m/s^2). Zero on land cells; elsewhere Coriolis,
/// thermal buoyancy, wind stress, and thickness-scaled ice stress, plus the
/// coastal reflection term.
pub fn motion(ctx: &CellContext) -> Vec2 {
    if ctx.elevation() > 0.0 {
        return Vec2::ZERO;
    }
    let f = &ctx.system.fields;
    let v = f.ocean.velocity.get(ctx.x, ctx.y);
    let v_air = f.atmosphere.velocity.get(ctx.x, ctx.y);
    let v_ice = f.ice.velocity.get(ctx.x, ctx.y);
    let ice_thickness = f.ice.thickness.get(ctx.x, ctx.y);

    let grad_t = gradient(&f.ocean.temperature, ctx.x, ctx.y, ctx.step);
    let wind_stress = stress(v_air, RHO_AIR, LAMBDA_BASE);
    let ice_stress = stress(v_ice, RHO_ICE, LAMBDA_BASE);

    let forcing = -(ctx.coriolis() * cross_direction(v)
        + G * BETA_WATER * grad_t
        + wind_stress / RHO_WATER
        + ice_thickness * ice_stress / RHO_WATER);

    forcing + boundary(ctx)
}

/// Eulerian temperature rate (K/s).
pub fn temperature_rate(ctx: &CellContext) -> f32 {
    let f = &ctx.system.fields;
    let v = f.ocean.velocity.get(ctx.x, ctx.y);
    let material = heat_flux(ctx) / (RHO_WATER * CP_WATER);
    local_derivative(&f.ocean.temperature, v, material, ctx.x, ctx.y, ctx.step)
}

/// Eulerian velocity rate (m/s^2). Zero on land cells.
pub fn velocity_rate(ctx: &CellContext) -> Vec2 {
    if ctx.elevation() > 0.0 {
        return Vec2::ZERO;
    }
    let f = &ctx.system.fields;
    let v = f.ocean.velocity.get(ctx.x, ctx.y);
    local_derivative_vec(&f.ocean.velocity, v, motion(ctx), ctx.x, ctx.y, ctx.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PlanetConfig, System};
    use crate::grid::{GridSize, ScalarField};
    use crate::params::constants::T0;

    fn ocean_world(size: GridSize) -> System {
        System::new(
            ScalarField::filled(size, 0.0),
            PlanetConfig {
                axial_tilt_rad: 0.0,
                ..PlanetConfig::default()
            },
        )
        .unwrap()
    }

    /// One land cell at (2, 2) in an otherwise open ocean.
    fn island_world(size: GridSize) -> System {
        let mut elevation = ScalarField::filled(size, 0.0);
        elevation.set(2, 2, 500.0);
        System::new(elevation, PlanetConfig::default()).unwrap()
    }

    #[test]
    fn land_cells_have_no_motion() {
        let system = island_world(GridSize::new(6, 6));
        let ctx = CellContext::new(&system, 2, 2, 0.0);
        assert_eq!(motion(&ctx), Vec2::ZERO);
        assert_eq!(velocity_rate(&ctx), Vec2::ZERO);
    }

    #[test]
    fn cells_beside_the_island_are_coastal() {
        let system = island_world(GridSize::new(6, 6));
        assert!(is_coastal(&CellContext::new(&system, 1, 2, 0.0)));
        assert!(is_coastal(&CellContext::new(&system, 2, 1, 0.0)));
        assert!(!is_coastal(&CellContext::new(&system, 4, 4, 0.0)));
    }

    #[test]
    fn open_ocean_boundary_term_is_zero() {
        let system = ocean_world(GridSize::new(6, 6));
        let ctx = CellContext::new(&system, 3, 3, 0.0);
        assert_eq!(boundary(&ctx), Vec2::ZERO);
    }

    #[test]
    fn wind_stress_accelerates_still_water() {
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
        let ctx = CellContext::new(&system, 3, 3, 0.0);
        let m = motion(&ctx);
        // -wind_stress/rho_water points along the wind.
        assert!(m.x > 0.0, "wind must drag the surface water eastward");
        assert_eq!(m.y, 0.0);
    }

    #[test]
    fn coastal_reflection_cancels_the_shoreward_component() {
        let size = GridSize::new(6, 6);
        // A wall of land along column 4. The reflection term must cancel
        // exactly the velocity component along the elevation-derived normal.
        let mut elevation = ScalarField::filled(size, -100.0);
        for y in 0..6 {
            elevation.set(4, y, 200.0);
        }
        let mut system = System::new(elevation, PlanetConfig::default()).unwrap();
        for (x, y) in size.cells() {
            system.fields.ocean.velocity.set(x, y, Vec2::new(2.0, 1.0));
        }
        let ctx = CellContext::new(&system, 3, 3, 0.0);
        assert!(is_coastal(&ctx));
        let n = crate::params::surface_normal(&system.fields.elevation, 3, 3, ctx.step);
        let v = system.fields.ocean.velocity.get(3, 3);
        let reflected = v + boundary(&ctx);
        // After reflection, no velocity remains along the normal direction.
        assert!(reflected.dot(n).abs() < 1e-5);
    }

    #[test]
    fn radiative_loss_cools_a_uniform_ocean_at_night() {
        let system = ocean_world(GridSize::new(6, 6));
        // time 0 is local midnight: no solar input anywhere.
        let ctx = CellContext::new(&system, 3, 3, 0.0);
        let q = heat_flux(&ctx);
        assert!((q - (-radiative_loss(T0))).abs() < 1e-3);
        assert!(temperature_rate(&ctx) < 0.0);
    }
}
