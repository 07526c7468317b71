//! Physical constants and derived forcing quantities.

pub mod constants;
mod derived;

pub use derived::{
    coriolis, cross_direction, day_of_year, drag, exchange, graybody_loss, hour_angle,
    ice_air_exchange, latitude_deg, radiative_loss, seasonal_tilt, solar_flux, stress,
    surface_normal, topographic_forcing, unit_or_zero,
};
