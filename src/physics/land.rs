//! Land heat budget. Land does not move, so there is no momentum function
//! and the local rate equals the material rate.

use crate::grid::ops::laplacian;
use crate::params::constants::{ALBEDO_LAND, CP_LAND, K_AIR, RHO_LAND};
use crate::params::{exchange, radiative_loss};

use super::CellContext;

/// Net heat flux into the ground (W/m^2): absorbed shortwave plus lateral
/// diffusion, minus longwave loss and the exchanges with air and ocean.
pub fn heat_flux(ctx: &CellContext) -> f32 {
    let f = &ctx.system.fields;
    let t_land = f.land.temperature.get(ctx.x, ctx.y);
    let t_air = f.atmosphere.temperature.get(ctx.x, ctx.y);
    let t_ocean = f.ocean.temperature.get(ctx.x, ctx.y);

    let absorbed = (1.0 - ALBEDO_LAND) * ctx.solar_flux();
    let diffusion = K_AIR * laplacian(&f.land.temperature, ctx.x, ctx.y, ctx.step);

    absorbed + diffusion
        - radiative_loss(t_land)
        - exchange(t_land, t_air)
        - exchange(t_land, t_ocean)
}

/// Temperature rate (K/s).
pub fn temperature_rate(ctx: &CellContext) -> f32 {
    heat_flux(ctx) / (RHO_LAND * CP_LAND)
}
