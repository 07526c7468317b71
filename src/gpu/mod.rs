//! Parallel kernel variant: the same per-cell physics expressed as dense
//! whole-grid compute kernels dispatched through wgpu.
//!
//! This is a performance variant, not an alternate model — its output must
//! match the sequential evaluator within floating-point tolerance. The WGSL
//! sources under `shaders/` mirror `params` and `physics` term for term.

mod buffers;
mod context;
mod pipelines;

pub use context::{GpuContext, GpuError};
pub use pipelines::ClimateGpu;
