//! GPU rasterized pixel-count calculator (spec §4.4.d): a CPU software
//! rasterizer and pure pixel-counting function stand in for the actual
//! `wgpu` fragment pipeline so the counting math is exercised
//! deterministically without a GPU adapter; [`renderer::GpuRenderer`] and
//! [`readback::GpuReadback`] provide the real-adapter plumbing the engine
//! uses when one is available.

mod calculator;
mod pixels;
mod rasterize;
mod readback;
mod renderer;
mod strategies;

pub use calculator::GpuPixelCounter;
pub use pixels::{count_from_pixels, PixelCounts};
pub use rasterize::{rasterize_scene, RasterizedScene};
pub use readback::{count_mapped_buffer, GpuReadback, ReadbackSerializer};
pub use renderer::{GpuRenderer, ShaderCacheKey, DEFAULT_RENDER_TEXTURE_SIZE};
pub use strategies::{count_additive_blending, count_cpu_readback, count_fragment_loop, count_pyramidal_reduction};
