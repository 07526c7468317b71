//! Compute pipelines for the coupled climate kernels.
//!
//! One kernel per evolving field, eight in total. Each kernel's WGSL module
//! is the shared prelude concatenated with its own source; each reads only
//! previous-step buffers (cross-subsystem inputs included) and writes its
//! field's next buffer, so a step on the GPU is exactly the explicit Euler
//! step of the sequential evaluator.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::{RunConfig, RunOutcome, System};

use super::buffers::{Params, SystemBuffers};
use super::context::GpuContext;

const COMMON: &str = include_str!("shaders/common.wgsl");

struct Kernel {
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
}

impl Kernel {
    /// Builds one compute kernel: bind group layout with `inputs` read-only
    /// storage buffers and one read-write output after the uniform block,
    /// plus the pipeline compiled from the prelude + kernel source.
    fn new(ctx: &GpuContext, label: &str, source: &str, inputs: u32) -> Self {
        let module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(format!("{COMMON}\n{source}"))),
            });

        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(
                    std::num::NonZeroU64::new(std::mem::size_of::<Params>() as u64).unwrap(),
                ),
            },
            count: None,
        }];
        for binding in 1..=inputs {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
        }
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: inputs + 1,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });

        let layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}-bgl")),
                entries: &entries,
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label}-layout")),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                module: &module,
                entry_point: Some("main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

        Self { pipeline, layout }
    }

    /// Binds the uniform block followed by the kernel's buffers, in the
    /// order its `@binding` declarations expect.
    fn bind(&self, ctx: &GpuContext, label: &str, buffers: &[&wgpu::Buffer]) -> wgpu::BindGroup {
        let entries: Vec<wgpu::BindGroupEntry> = buffers
            .iter()
            .enumerate()
            .map(|(i, buffer)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: buffer.as_entire_binding(),
            })
            .collect();
        ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout,
            entries: &entries,
        })
    }
}

/// The parallel evaluator: all eight kernels plus the device context.
pub struct ClimateGpu {
    ctx: GpuContext,
    air_temperature: Kernel,
    air_velocity: Kernel,
    ocean_temperature: Kernel,
    ocean_velocity: Kernel,
    ice_temperature: Kernel,
    ice_velocity: Kernel,
    ice_thickness: Kernel,
    land_temperature: Kernel,
}

impl ClimateGpu {
    pub fn new(ctx: GpuContext) -> Self {
        let air_temperature = Kernel::new(
            &ctx,
            "atmosphere:temperature",
            include_str!("shaders/atmosphere_temperature.wgsl"),
            6,
        );
        let air_velocity = Kernel::new(
            &ctx,
            "atmosphere:velocity",
            include_str!("shaders/atmosphere_velocity.wgsl"),
            3,
        );
        let ocean_temperature = Kernel::new(
            &ctx,
            "ocean:temperature",
            include_str!("shaders/ocean_temperature.wgsl"),
            5,
        );
        let ocean_velocity = Kernel::new(
            &ctx,
            "ocean:velocity",
            include_str!("shaders/ocean_velocity.wgsl"),
            6,
        );
        let ice_temperature = Kernel::new(
            &ctx,
            "ice:temperature",
            include_str!("shaders/ice_temperature.wgsl"),
            6,
        );
        let ice_velocity = Kernel::new(
            &ctx,
            "ice:velocity",
            include_str!("shaders/ice_velocity.wgsl"),
            4,
        );
        let ice_thickness = Kernel::new(
            &ctx,
            "ice:thickness",
            include_str!("shaders/ice_thickness.wgsl"),
            6,
        );
        let land_temperature = Kernel::new(
            &ctx,
            "land:temperature",
            include_str!("shaders/land_temperature.wgsl"),
            3,
        );

        Self {
            ctx,
            air_temperature,
            air_velocity,
            ocean_temperature,
            ocean_velocity,
            ice_temperature,
            ice_velocity,
            ice_thickness,
            land_temperature,
        }
    }

    /// Bind groups for one ping-pong direction: kernels read the buffers of
    /// `parity` and write the opposite side.
    fn bind_direction(&self, b: &SystemBuffers, parity: usize) -> Vec<(usize, wgpu::BindGroup)> {
        let p = parity;
        vec![
            (
                0,
                self.air_temperature.bind(
                    &self.ctx,
                    "atmosphere:temperature:bind",
                    &[
                        &b.params,
                        b.air_temperature.input(p),
                        b.air_velocity.input(p),
                        b.ocean_temperature.input(p),
                        b.land_temperature.input(p),
                        b.ice_temperature.input(p),
                        b.ice_thickness.input(p),
                        b.air_temperature.output(p),
                    ],
                ),
            ),
            (
                1,
                self.air_velocity.bind(
                    &self.ctx,
                    "atmosphere:velocity:bind",
                    &[
                        &b.params,
                        &b.elevation,
                        b.air_temperature.input(p),
                        b.air_velocity.input(p),
                        b.air_velocity.output(p),
                    ],
                ),
            ),
            (
                2,
                self.ocean_temperature.bind(
                    &self.ctx,
                    "ocean:temperature:bind",
                    &[
                        &b.params,
                        b.ocean_temperature.input(p),
                        b.ocean_velocity.input(p),
                        b.air_temperature.input(p),
                        b.land_temperature.input(p),
                        b.ice_temperature.input(p),
                        b.ocean_temperature.output(p),
                    ],
                ),
            ),
            (
                3,
                self.ocean_velocity.bind(
                    &self.ctx,
                    "ocean:velocity:bind",
                    &[
                        &b.params,
                        &b.elevation,
                        b.ocean_temperature.input(p),
                        b.ocean_velocity.input(p),
                        b.air_velocity.input(p),
                        b.ice_velocity.input(p),
                        b.ice_thickness.input(p),
                        b.ocean_velocity.output(p),
                    ],
                ),
            ),
            (
                4,
                self.ice_temperature.bind(
                    &self.ctx,
                    "ice:temperature:bind",
                    &[
                        &b.params,
                        b.ice_temperature.input(p),
                        b.ice_velocity.input(p),
                        b.ice_thickness.input(p),
                        b.ocean_temperature.input(p),
                        b.air_temperature.input(p),
                        b.land_temperature.input(p),
                        b.ice_temperature.output(p),
                    ],
                ),
            ),
            (
                5,
                self.ice_velocity.bind(
                    &self.ctx,
                    "ice:velocity:bind",
                    &[
                        &b.params,
                        b.ice_velocity.input(p),
                        b.ice_thickness.input(p),
                        b.air_velocity.input(p),
                        b.ocean_velocity.input(p),
                        b.ice_velocity.output(p),
                    ],
                ),
            ),
            (
                6,
                self.ice_thickness.bind(
                    &self.ctx,
                    "ice:thickness:bind",
                    &[
                        &b.params,
                        b.ice_thickness.input(p),
                        b.ice_velocity.input(p),
                        b.ice_temperature.input(p),
                        b.ocean_temperature.input(p),
                        b.air_temperature.input(p),
                        b.land_temperature.input(p),
                        b.ice_thickness.output(p),
                    ],
                ),
            ),
            (
                7,
                self.land_temperature.bind(
                    &self.ctx,
                    "land:temperature:bind",
                    &[
                        &b.params,
                        b.land_temperature.input(p),
                        b.air_temperature.input(p),
                        b.ocean_temperature.input(p),
                        b.land_temperature.output(p),
                    ],
                ),
            ),
        ]
    }

    fn kernel(&self, index: usize) -> &Kernel {
        match index {
            0 => &self.air_temperature,
            1 => &self.air_velocity,
            2 => &self.ocean_temperature,
            3 => &self.ocean_velocity,
            4 => &self.ice_temperature,
            5 => &self.ice_velocity,
            6 => &self.ice_thickness,
            _ => &self.land_temperature,
        }
    }

    /// Runs the configured number of steps on the device, emitting snapshot
    /// systems on the same cadence as the sequential engine. Buffers are
    /// only read back for the cadence-selected steps, so dispatches pipeline
    /// freely in between.
    pub fn run(
        &self,
        system: &System,
        config: &RunConfig,
        cancel: &AtomicBool,
        mut observe: impl FnMut(u64, System),
    ) -> (System, RunOutcome) {
        let buffers = SystemBuffers::new(&self.ctx, system);
        let directions = [
            self.bind_direction(&buffers, 0),
            self.bind_direction(&buffers, 1),
        ];

        let gx = (system.size.width as u32).div_ceil(8);
        let gy = (system.size.height as u32).div_ceil(8);

        for i in 0..config.total_steps {
            if cancel.load(Ordering::Relaxed) {
                let parity = (i % 2) as usize;
                return (
                    buffers.read_system(&self.ctx, system, parity),
                    RunOutcome::Cancelled,
                );
            }

            let params = Params::for_step(system, i as f32 * config.dt, config.dt);
            self.ctx
                .queue
                .write_buffer(&buffers.params, 0, bytemuck::bytes_of(&params));

            let mut encoder =
                self.ctx
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("climatesim-step-encoder"),
                    });
            for (kernel_index, bind_group) in &directions[(i % 2) as usize] {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("climatesim-pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.kernel(*kernel_index).pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.dispatch_workgroups(gx, gy, 1);
            }
            self.ctx.queue.submit(Some(encoder.finish()));

            if config.snapshot_interval > 0 && (i + 1) % config.snapshot_interval == 0 {
                let parity = ((i + 1) % 2) as usize;
                observe(i + 1, buffers.read_system(&self.ctx, system, parity));
            }
        }

        let parity = (config.total_steps % 2) as usize;
        (
            buffers.read_system(&self.ctx, system, parity),
            RunOutcome::Completed,
        )
    }
}
