use cover_model::CoreError;
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Render target size in texels (square), matching the host's
/// `renderTextureSize` setting (default 100).
pub const DEFAULT_RENDER_TEXTURE_SIZE: u32 = 100;

/// Identifies a compiled shader variant by its source keys and an options
/// hash, so repeated renders with the same configuration reuse one
/// `wgpu::ShaderModule` instead of recompiling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderCacheKey {
    pub vertex_key: String,
    pub fragment_key: String,
    pub options_hash: u64,
}

/// Owns the `wgpu` device/queue used for offscreen pixel-count rendering,
/// plus a cache of compiled shader modules keyed by [`ShaderCacheKey`]. One
/// instance is shared across every GPU-backed `percent_visible` call; device
/// and adapter creation is the expensive part, not the per-call render.
pub struct GpuRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    render_texture_size: u32,
    shader_cache: Mutex<HashMap<ShaderCacheKey, Arc<wgpu::ShaderModule>>>,
}

impl GpuRenderer {
    /// Acquires an adapter and device. Returns
    /// [`CoreError::ResourceUnavailable`] rather than panicking when no
    /// adapter is available, so callers can fall back to a non-GPU
    /// calculator (spec §7 fallback chain) instead of crashing the host.
    pub async fn new(render_texture_size: u32) -> Result<Self, CoreError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| CoreError::ResourceUnavailable(format!("no wgpu adapter available: {err}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cover-gpu device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|err| CoreError::ResourceUnavailable(format!("wgpu device request failed: {err}")))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            render_texture_size,
            shader_cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn render_texture_size(&self) -> u32 {
        self.render_texture_size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the cached shader module for `key`, compiling and inserting
    /// one via `compile` if absent.
    pub fn shader_module(&self, key: ShaderCacheKey, compile: impl FnOnce(&wgpu::Device) -> wgpu::ShaderModule) -> Arc<wgpu::ShaderModule> {
        let mut cache = self.shader_cache.lock();
        if let Some(module) = cache.get(&key) {
            return Arc::clone(module);
        }
        let module = Arc::new(compile(&self.device));
        cache.insert(key, Arc::clone(&module));
        module
    }

    pub fn shader_cache_len(&self) -> usize {
        self.shader_cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_cache_keys_distinguish_by_options_hash() {
        let a = ShaderCacheKey {
            vertex_key: "v".into(),
            fragment_key: "f".into(),
            options_hash: 1,
        };
        let b = ShaderCacheKey {
            vertex_key: "v".into(),
            fragment_key: "f".into(),
            options_hash: 2,
        };
        assert_ne!(a, b);
    }
}
