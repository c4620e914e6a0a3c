use std::collections::HashMap;
use std::sync::Arc;

use crate::sprite_batch::WHITE_TEXTURE;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::{placeholder_pixels, Texture};

const PLACEHOLDER_SIZE: u32 = 16;

pub struct GpuSpriteTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

/// Textures keyed by file path, loaded on first request and kept for the
/// life of the renderer.
pub struct TextureCache {
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, pipeline: &SpritePipeline) -> Self {
        let mut textures = HashMap::new();
        let white = Texture::from_rgba8(device, queue, 1, 1, &[255, 255, 255, 255], WHITE_TEXTURE);
        textures.insert(Arc::from(WHITE_TEXTURE), upload(device, pipeline, white));
        Self { textures }
    }

    /// Return the texture for `path`, loading it on first use. Files that
    /// cannot be read or decoded are replaced by a checkerboard.
    pub fn get_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        path: &str,
    ) -> &GpuSpriteTexture {
        if !self.textures.contains_key(path) {
            let texture = load_texture(device, queue, path).unwrap_or_else(|err| {
                log::warn!("{err}. Using placeholder texture.");
                let pixels = placeholder_pixels(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE / 2);
                Texture::from_rgba8(device, queue, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, &pixels, path)
            });
            log::info!("Loaded texture '{}' ({}x{})", path, texture.size.0, texture.size.1);
            self.textures
                .insert(Arc::from(path), upload(device, pipeline, texture));
        }
        // Inserted above when missing.
        &self.textures[path]
    }

    pub fn get(&self, path: &str) -> Option<&GpuSpriteTexture> {
        self.textures.get(path)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn load_texture(device: &wgpu::Device, queue: &wgpu::Queue, path: &str) -> Result<Texture, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Failed to read texture '{path}': {e}"))?;
    Texture::from_bytes(device, queue, &bytes, path)
}

fn upload(device: &wgpu::Device, pipeline: &SpritePipeline, texture: Texture) -> GpuSpriteTexture {
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    GpuSpriteTexture {
        texture,
        bind_group,
    }
}
