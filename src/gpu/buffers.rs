//! Storage buffers for the compute kernels.
//!
//! Every evolving field owns a ping-pong pair (current/next, swapped by the
//! parity of the step index) plus a staging buffer for snapshot readback.
//! Elevation is a single shared read-only buffer; scalar run configuration
//! travels in one small uniform block rewritten before each step.

use bytemuck::{Pod, Zeroable};

use crate::engine::System;
use crate::grid::{GridSize, ScalarField, VectorField};
use crate::params::day_of_year;

use super::context::GpuContext;

/// Uniform block consumed by every kernel.
///
/// Field order and padding must match `struct Params` in
/// `shaders/common.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Params {
    pub circumference: f32,
    pub axial_tilt: f32,
    pub orbit_period: f32,
    pub day_of_year: f32,
    pub rotation_speed: f32,
    pub time: f32,
    pub dt: f32,
    /// Maximum elevation of the shared terrain (0 for an all-ocean world).
    pub h_max: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: u32,
    pub height: u32,
}

impl Params {
    /// Parameters for the step starting at `time` seconds.
    pub fn for_step(system: &System, time: f32, dt: f32) -> Self {
        let planet = &system.planet;
        let step = system.step_size();
        Self {
            circumference: planet.circumference_m,
            axial_tilt: planet.axial_tilt_rad,
            orbit_period: planet.orbit_period_days,
            day_of_year: day_of_year(planet.day_of_year, time, planet.orbit_period_days),
            rotation_speed: planet.rotation_speed_rad_s,
            time,
            dt,
            h_max: system.fields.elevation.max_or(0.0),
            dx: step.dx,
            dy: step.dy,
            width: system.size.width as u32,
            height: system.size.height as u32,
        }
    }
}

/// Ping-pong pair plus staging buffer for one field.
pub struct FieldBuffers {
    pair: [wgpu::Buffer; 2],
    staging: wgpu::Buffer,
    size_bytes: u64,
}

impl FieldBuffers {
    fn new(ctx: &GpuContext, label: &str, initial: &[f32]) -> Self {
        let size_bytes = (initial.len() * std::mem::size_of::<f32>()) as u64;
        let storage = |suffix: &str| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label}:{suffix}")),
                size: size_bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let pair = [storage("ping"), storage("pong")];
        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}:staging")),
            size: size_bytes,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bytes = bytemuck::cast_slice(initial);
        ctx.queue.write_buffer(&pair[0], 0, bytes);
        ctx.queue.write_buffer(&pair[1], 0, bytes);

        Self { pair, staging, size_bytes }
    }

    /// Buffer read by the kernels on a step with the given parity.
    pub fn input(&self, parity: usize) -> &wgpu::Buffer {
        &self.pair[parity & 1]
    }

    /// Buffer written by the kernels on a step with the given parity.
    pub fn output(&self, parity: usize) -> &wgpu::Buffer {
        &self.pair[(parity & 1) ^ 1]
    }

    /// Blocks until the buffer holding the given parity's *input* state is
    /// copied back to host memory, and returns its contents.
    pub fn read_back(&self, ctx: &GpuContext, parity: usize) -> Vec<f32> {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("climatesim-readback-encoder"),
            });
        encoder.copy_buffer_to_buffer(self.input(parity), 0, &self.staging, 0, self.size_bytes);
        ctx.queue.submit(Some(encoder.finish()));

        let slice = self.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        // Block until the mapping is ready.
        ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv().unwrap().unwrap();
        let data = slice.get_mapped_range();
        let out: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        self.staging.unmap();
        out
    }
}

/// All device buffers of one simulation.
pub struct SystemBuffers {
    pub params: wgpu::Buffer,
    pub elevation: wgpu::Buffer,
    pub air_temperature: FieldBuffers,
    pub air_velocity: FieldBuffers,
    pub ocean_temperature: FieldBuffers,
    pub ocean_velocity: FieldBuffers,
    pub ice_temperature: FieldBuffers,
    pub ice_velocity: FieldBuffers,
    pub ice_thickness: FieldBuffers,
    pub land_temperature: FieldBuffers,
}

impl SystemBuffers {
    /// Allocates and uploads every buffer from the host-side system state.
    pub fn new(ctx: &GpuContext, system: &System) -> Self {
        let f = &system.fields;

        let params = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("climatesim-params"),
            size: std::mem::size_of::<Params>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let elevation = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("climatesim-elevation"),
            size: (f.elevation.as_slice().len() * std::mem::size_of::<f32>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue
            .write_buffer(&elevation, 0, bytemuck::cast_slice(f.elevation.as_slice()));

        Self {
            params,
            elevation,
            air_temperature: FieldBuffers::new(
                ctx,
                "atmosphere:temperature",
                f.atmosphere.temperature.as_slice(),
            ),
            air_velocity: FieldBuffers::new(
                ctx,
                "atmosphere:velocity",
                &f.atmosphere.velocity.to_interleaved(),
            ),
            ocean_temperature: FieldBuffers::new(
                ctx,
                "ocean:temperature",
                f.ocean.temperature.as_slice(),
            ),
            ocean_velocity: FieldBuffers::new(
                ctx,
                "ocean:velocity",
                &f.ocean.velocity.to_interleaved(),
            ),
            ice_temperature: FieldBuffers::new(
                ctx,
                "ice:temperature",
                f.ice.temperature.as_slice(),
            ),
            ice_velocity: FieldBuffers::new(ctx, "ice:velocity", &f.ice.velocity.to_interleaved()),
            ice_thickness: FieldBuffers::new(ctx, "ice:thickness", f.ice.thickness.as_slice()),
            land_temperature: FieldBuffers::new(
                ctx,
                "land:temperature",
                f.land.temperature.as_slice(),
            ),
        }
    }

    /// Reads every field at the given parity back into a host-side system.
    ///
    /// `template` supplies the grid size and planetary parameters; the
    /// returned system carries freshly read field data.
    pub fn read_system(&self, ctx: &GpuContext, template: &System, parity: usize) -> System {
        let size: GridSize = template.size;
        let scalar = |data: Vec<f32>| ScalarField::from_vec(size, data).expect("buffer size");
        let vector =
            |data: Vec<f32>| VectorField::from_interleaved(size, &data).expect("buffer size");

        let mut system = template.clone();
        system.fields.atmosphere.temperature = scalar(self.air_temperature.read_back(ctx, parity));
        system.fields.atmosphere.velocity = vector(self.air_velocity.read_back(ctx, parity));
        system.fields.ocean.temperature = scalar(self.ocean_temperature.read_back(ctx, parity));
        system.fields.ocean.velocity = vector(self.ocean_velocity.read_back(ctx, parity));
        system.fields.ice.temperature = scalar(self.ice_temperature.read_back(ctx, parity));
        system.fields.ice.velocity = vector(self.ice_velocity.read_back(ctx, parity));
        system.fields.ice.thickness = scalar(self.ice_thickness.read_back(ctx, parity));
        system.fields.land.temperature = scalar(self.land_temperature.read_back(ctx, parity));
        system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlanetConfig;
    use crate::grid::{GridSize, ScalarField};

    #[test]
    fn params_track_time_season_and_terrain() {
        let size = GridSize::new(8, 4);
        let mut elevation = ScalarField::filled(size, -2000.0);
        elevation.set(3, 1, 1234.0);
        let planet = PlanetConfig {
            circumference_m: 32_000_000.0,
            orbit_period_days: 360.0,
            day_of_year: 359.5,
            ..PlanetConfig::default()
        };
        let system = crate::engine::System::new(elevation, planet).unwrap();

        let p = Params::for_step(&system, 86_400.0, 3600.0);
        assert_eq!(p.width, 8);
        assert_eq!(p.height, 4);
        assert_eq!(p.dx, 4_000_000.0);
        assert_eq!(p.dy, 8_000_000.0);
        assert_eq!(p.h_max, 1234.0);
        assert_eq!(p.time, 86_400.0);
        // One day later the seasonal counter wraps past the year boundary.
        assert!((p.day_of_year - 0.5).abs() < 1e-3);
    }

    #[test]
    fn all_ocean_world_has_zero_h_max() {
        let system = crate::engine::System::new(
            ScalarField::filled(GridSize::new(4, 4), -3000.0),
            PlanetConfig::default(),
        )
        .unwrap();
        let p = Params::for_step(&system, 0.0, 60.0);
        assert_eq!(p.h_max, 0.0);
    }
}
