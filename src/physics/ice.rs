//! Sea-ice heat, momentum, and thickness budget.
//!
//! Ice physics is hard-gated on the local thickness: where `thickness = 0`
//! every ice rate is exactly zero, regardless of the other fields. Ice can
//! therefore grow or melt but never nucleate on an ice-free cell.

use glam::Vec2;

use crate::grid::ops::{gradient, laplacian, local_derivative, local_derivative_vec};
use crate::params::constants::{
    ALBEDO_ICE, CP_ICE, G, K_ICE, LAMBDA_BASE, L_FUSION, RHO_AIR, RHO_ICE, RHO_WATER,
    TAU_TRANSMISSION,
};
use crate::params::{cross_direction, exchange, radiative_loss, stress};

use super::CellContext;

/// True where this cell carries ice.
pub fn is_active(ctx: &CellContext) -> bool {
    ctx.system.fields.ice.thickness.get(ctx.x, ctx.y) > 0.0
}

/// Net heat flux into the ice (W/m^2): transmitted shortwave, lateral
/// conduction, the three exchanges with ocean, air, and land, minus
/// longwave loss. Zero where there is no ice.
pub fn heat_flux(ctx: &CellContext) -> f32 {
    if !is_active(ctx) {
        return 0.0;
    }
    let f = &ctx.system.fields;
    let t_ice = f.ice.temperature.get(ctx.x, ctx.y);
    let t_ocean = f.ocean.temperature.get(ctx.x, ctx.y);
    let t_air = f.atmosphere.temperature.get(ctx.x, ctx.y);
    let t_land = f.land.temperature.get(ctx.x, ctx.y);

    let transmitted = TAU_TRANSMISSION * (1.0 - ALBEDO_ICE) * ctx.solar_flux();
    let conduction = K_ICE * laplacian(&f.ice.temperature, ctx.x, ctx.y, ctx.step);

    transmitted + conduction
        + exchange(t_ocean, t_ice)
        + exchange(t_air, t_ice)
        + exchange(t_land, t_ice)
        - radiative_loss(t_ice)
}

/// Momentum forcing (m/s^2): Coriolis, internal pressure from the thickness
/// gradient, linear drag, and the wind/water stresses spread over the ice
/// mass `ρ_ice·thickness`. Zero where there is no ice.
pub fn motion(ctx: &CellContext) -> Vec2 {
    if !is_active(ctx) {
        return Vec2::ZERO;
    }
    let f = &ctx.system.fields;
    let v = f.ice.velocity.get(ctx.x, ctx.y);
    let v_air = f.atmosphere.velocity.get(ctx.x, ctx.y);
    let v_ocean = f.ocean.velocity.get(ctx.x, ctx.y);
    let thickness = f.ice.thickness.get(ctx.x, ctx.y);

    let pressure = G * gradient(&f.ice.thickness, ctx.x, ctx.y, ctx.step);
    let wind_stress = stress(v_air, RHO_AIR, LAMBDA_BASE);
    let water_stress = stress(v_ocean, RHO_WATER, LAMBDA_BASE);

    -(ctx.coriolis() * cross_direction(v)
        + pressure
        + LAMBDA_BASE * v
        + (wind_stress + water_stress) / (RHO_ICE * thickness))
}

/// Eulerian temperature rate (K/s). Zero where there is no ice.
pub fn temperature_rate(ctx: &CellContext) -> f32 {
    if !is_active(ctx) {
        return 0.0;
    }
    let f = &ctx.system.fields;
    let v = f.ice.velocity.get(ctx.x, ctx.y);
    let material = heat_flux(ctx) / (RHO_ICE * CP_ICE);
    local_derivative(&f.ice.temperature, v, material, ctx.x, ctx.y, ctx.step)
}

/// Eulerian velocity rate (m/s^2). Zero where there is no ice.
pub fn velocity_rate(ctx: &CellContext) -> Vec2 {
    if !is_active(ctx) {
        return Vec2::ZERO;
    }
    let f = &ctx.system.fields;
    let v = f.ice.velocity.get(ctx.x, ctx.y);
    local_derivative_vec(&f.ice.velocity, v, motion(ctx), ctx.x, ctx.y, ctx.step)
}

/// Eulerian thickness rate (m/s): latent-heat melt/freeze law
/// `dI/dt = −Q/(ρ_ice·L_fusion)`, advected with the ice drift. Net inward
/// heat melts ice, net outward heat thickens it; the integrator clamps the
/// result at zero. Zero where there is no ice.
pub fn thickness_rate(ctx: &CellContext) -> f32 {
    if !is_active(ctx) {
        return 0.0;
    }
    let f = &ctx.system.fields;
    let v = f.ice.velocity.get(ctx.x, ctx.y);
    let material = -heat_flux(ctx) / (RHO_ICE * L_FUSION);
    local_derivative(&f.ice.thickness, v, material, ctx.x, ctx.y, ctx.step)
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

    #[test]
    fn no_ice_means_exactly_zero_rates_everywhere() {
        let size = GridSize::new(5, 5);
        let mut system = ocean_world(size);
        // Arbitrary non-uniform surroundings must not leak through the gate.
        for (x, y) in size.cells() {
            system.fields.atmosphere.temperature.set(x, y, T0 + (x as f32) * 3.0);
            system.fields.ocean.temperature.set(x, y, T0 - (y as f32) * 2.0);
            system.fields.atmosphere.velocity.set(x, y, Vec2::new(5.0, -2.0));
            system.fields.ocean.velocity.set(x, y, Vec2::new(-1.0, 1.0));
        }
        for (x, y) in size.cells() {
            let ctx = CellContext::new(&system, x, y, 1234.0);
            assert_eq!(heat_flux(&ctx), 0.0);
            assert_eq!(temperature_rate(&ctx), 0.0);
            assert_eq!(motion(&ctx), Vec2::ZERO);
            assert_eq!(velocity_rate(&ctx), Vec2::ZERO);
            assert_eq!(thickness_rate(&ctx), 0.0);
        }
    }

    #[test]
    fn warm_water_melts_thin_ice() {
        let size = GridSize::new(5, 5);
        let mut system = ocean_world(size);
        for (x, y) in size.cells() {
            system.fields.ice.thickness.set(x, y, 0.5);
            system.fields.ice.temperature.set(x, y, T0 - 5.0);
            system.fields.ocean.temperature.set(x, y, T0 + 5.0);
        }
        let ctx = CellContext::new(&system, 2, 2, 0.0);
        // Ocean and air both warmer than the ice: net inward heat, melting.
        assert!(heat_flux(&ctx) > 0.0);
        assert!(thickness_rate(&ctx) < 0.0);
    }

    #[test]
    fn wind_pushes_drifting_ice() {
        let size = GridSize::new(5, 5);
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
            system.fields.ice.thickness.set(x, y, 1.0);
            system.fields.atmosphere.velocity.set(x, y, Vec2::new(8.0, 0.0));
        }
        let ctx = CellContext::new(&system, 2, 2, 0.0);
        let m = motion(&ctx);
        assert!(m.x > 0.0, "wind stress must push the ice along the wind");
        assert_eq!(m.y, 0.0);
    }

    #[test]
    fn thicker_ice_pushes_drift_toward_thinner_ice() {
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
        // Thickness ramp increasing with x around the middle column.
        for (x, y) in size.cells() {
            system.fields.ice.thickness.set(x, y, 1.0 + 0.2 * x as f32);
        }
        let ctx = CellContext::new(&system, 3, 3, 0.0);
        let m = motion(&ctx);
        // Pressure term -g * dI/dx with dI/dx > 0 drives the ice westward.
        assert!(m.x < 0.0);
    }

    #[test]
    fn melt_rate_matches_the_latent_heat_conversion() {
        let size = GridSize::new(5, 5);
        let mut system = ocean_world(size);
        for (x, y) in size.cells() {
            system.fields.ice.thickness.set(x, y, 1.0);
        }
        let ctx = CellContext::new(&system, 2, 2, 0.0);
        let q = heat_flux(&ctx);
        let expected = -q / (RHO_ICE * L_FUSION);
        // Uniform fields: no advection, the material rate is the whole rate.
        assert!((thickness_rate(&ctx) - expected).abs() < 1e-12);
    }
}
