//! Physical constants.
//!
//! Values are fixed; derived quantities in [`super::derived`] and the WGSL
//! constants in `gpu/shaders/common.wgsl` depend on these exact numbers.

use std::f32::consts::PI;

/// Planetary angular velocity (radians/s), one rotation per 24 h.
pub const OMEGA: f32 = 2.0 * PI / SECONDS_PER_DAY;
pub const SECONDS_PER_DAY: f32 = 24.0 * 60.0 * 60.0;

/// Gravitational acceleration (m/s^2).
pub const G: f32 = 9.81;
/// Specific gas constant for dry air (J/(kg·K)).
pub const R_AIR: f32 = 287.05;

/// Diffusivity of air (W/(m·K)).
pub const K_AIR: f32 = 2e-4;
/// Diffusivity of water (W/(m·K)).
pub const K_WATER: f32 = 1e-7;
/// Thermal conductivity of ice (W/(m·K)).
pub const K_ICE: f32 = 2.22;

/// Latent heat of fusion for water (J/kg).
pub const L_FUSION: f32 = 334_000.0;

/// Density of air (kg/m^3).
pub const RHO_AIR: f32 = 1.225;
/// Density of sea water (kg/m^3).
pub const RHO_WATER: f32 = 1025.0;
/// Density of ice (kg/m^3).
pub const RHO_ICE: f32 = 917.0;
/// Density of land (kg/m^3).
pub const RHO_LAND: f32 = 3300.0;

/// Reference temperature (K); fields are initialized isothermal at this value.
pub const T0: f32 = 273.15;

/// Thermal expansion coefficient of sea water (1/K).
pub const BETA_WATER: f32 = 0.0002;

/// Base drag coefficient.
pub const LAMBDA_BASE: f32 = 0.001;
/// Topographic contribution to the drag coefficient.
pub const ALPHA_DRAG: f32 = 0.01;
/// Strength of the topographic obstruction forcing.
pub const GAMMA: f32 = 0.02;

/// Specific heat capacities (J/(kg·K)).
pub const CP_AIR: f32 = 1005.0;
pub const CP_LAND: f32 = 800.0;
pub const CP_WATER: f32 = 3993.0;
pub const CP_ICE: f32 = 2093.0;

/// Stefan-Boltzmann constant (W/(m^2·K^4)).
pub const SIGMA: f32 = 5.67e-8;
/// Gray-body emissivity factor.
pub const EMISSIVITY: f32 = 0.75;

/// Average albedos per surface type.
pub const ALBEDO_WATER: f32 = 0.3;
pub const ALBEDO_ATMOSPHERE: f32 = 0.3;
pub const ALBEDO_LAND: f32 = 0.15;
pub const ALBEDO_ICE: f32 = 0.85;

/// Shortwave transmission factor through the atmosphere.
pub const TAU_TRANSMISSION: f32 = 0.6;
/// Solar constant (W/m^2).
pub const S0: f32 = 1361.0;

/// Maximum topography height (m); elevations are normalized against this.
pub const H_MAX: f32 = 8000.0;
/// Inter-medium heat transfer coefficient (W/(m^2·K)).
pub const H_TRANSFER: f32 = 30.0;
/// Air-ice heat exchange coefficient, gated on ice presence.
pub const ICE_AIR_COEFFICIENT: f32 = 0.003;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_rate_matches_a_24_hour_day() {
        assert!((OMEGA - 7.272_205e-5).abs() < 1e-9);
    }

    #[test]
    fn literal_values_are_pinned() {
        assert_eq!(G, 9.81);
        assert_eq!(R_AIR, 287.05);
        assert_eq!(K_AIR, 2e-4);
        assert_eq!(K_WATER, 1e-7);
        assert_eq!(K_ICE, 2.22);
        assert_eq!(L_FUSION, 334_000.0);
        assert_eq!(RHO_AIR, 1.225);
        assert_eq!(RHO_WATER, 1025.0);
        assert_eq!(RHO_ICE, 917.0);
        assert_eq!(RHO_LAND, 3300.0);
        assert_eq!(T0, 273.15);
        assert_eq!(CP_AIR, 1005.0);
        assert_eq!(CP_LAND, 800.0);
        assert_eq!(CP_WATER, 3993.0);
        assert_eq!(CP_ICE, 2093.0);
        assert_eq!(SIGMA, 5.67e-8);
        assert_eq!(ALBEDO_WATER, 0.3);
        assert_eq!(ALBEDO_ICE, 0.85);
        assert_eq!(TAU_TRANSMISSION, 0.6);
        assert_eq!(S0, 1361.0);
        assert_eq!(H_TRANSFER, 30.0);
    }
}
