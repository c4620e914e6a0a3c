//! Streams finished sprite batches to the GPU.
//!
//! Screens fill a [`RenderQueue`] during `draw`; the main loop hands it to
//! [`SpriteRenderer::render`] once per frame. All layers share one vertex and
//! one index buffer, so a frame costs two buffer writes however many layers it
//! has. Buffers grow to the next power of two and never shrink.

use std::sync::Arc;

use ben_core::ColorRGBA8;

use crate::camera::{Camera, CameraUniform};
use crate::gpu_context::GpuContext;
use crate::sprite_batch::{count_texture_binds, SpriteBatch, SpriteVertex};
use crate::sprite_pipeline::{BlendMode, SpritePipeline};
use crate::texture_cache::TextureCache;

pub struct RenderLayer {
    pub batch: SpriteBatch,
    pub blend: BlendMode,
    pub camera: CameraUniform,
}

/// Everything one frame wants drawn, in submission order.
pub struct RenderQueue {
    pub clear_color: ColorRGBA8,
    layers: Vec<RenderLayer>,
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self {
            clear_color: ColorRGBA8::new(0, 0, 0, 255),
            layers: Vec::new(),
        }
    }
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch whose `end` has already been called.
    pub fn push(&mut self, batch: SpriteBatch, blend: BlendMode, camera: &Camera) {
        if batch.draw_calls().is_empty() {
            return;
        }
        self.layers.push(RenderLayer {
            batch,
            blend,
            camera: camera.build_uniform(),
        });
    }

    pub fn layers(&self) -> &[RenderLayer] {
        &self.layers
    }

    pub fn sprite_count(&self) -> usize {
        self.layers.iter().map(|l| l.batch.glyph_count()).sum()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub sprite_count: u32,
}

struct CameraSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Where one layer's mesh sits inside the shared buffers.
struct LayerSpan {
    base_vertex: i32,
    index_offset: u32,
}

pub struct SpriteRenderer {
    pub pipeline: SpritePipeline,
    pub textures: TextureCache,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    camera_slots: Vec<CameraSlot>,
}

impl SpriteRenderer {
    pub fn new(gpu: &GpuContext) -> Self {
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let textures = TextureCache::new(&gpu.device, &gpu.queue, &pipeline);
        Self {
            vertex_buffer: create_vertex_buffer(&gpu.device, 1),
            index_buffer: create_index_buffer(&gpu.device, 1),
            vertex_capacity: 0,
            index_capacity: 0,
            camera_slots: Vec::new(),
            pipeline,
            textures,
        }
    }

    /// Clear `view` and draw every queued layer into it.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        queue: &RenderQueue,
    ) -> FrameStats {
        let layers = queue.layers();
        let mut stats = FrameStats {
            sprite_count: queue.sprite_count() as u32,
            ..Default::default()
        };

        // Resolve every texture before the pass borrows the cache.
        for layer in layers.iter().filter(|l| l.blend == BlendMode::Alpha) {
            for draw in layer.batch.draw_calls() {
                self.textures
                    .get_texture(&gpu.device, &gpu.queue, &self.pipeline, &draw.texture);
            }
        }

        let spans = self.upload_meshes(gpu, layers);
        self.ensure_camera_slots(&gpu.device, layers.len());
        for (slot, layer) in self.camera_slots.iter().zip(layers) {
            gpu.queue
                .write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[layer.camera]));
        }

        let clear = queue.clear_color.to_f32_array();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sprite Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear[0] as f64,
                        g: clear[1] as f64,
                        b: clear[2] as f64,
                        a: clear[3] as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        if layers.is_empty() {
            return stats;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for ((layer, span), slot) in layers.iter().zip(&spans).zip(&self.camera_slots) {
            pass.set_pipeline(self.pipeline.pipeline_for(layer.blend));
            pass.set_bind_group(0, &slot.bind_group, &[]);

            let mut last_bound: Option<&Arc<str>> = None;
            for draw in layer.batch.draw_calls() {
                if layer.blend == BlendMode::Alpha {
                    let Some(texture) = self.textures.get(&draw.texture) else {
                        continue;
                    };
                    let need_rebind = match last_bound {
                        Some(last) => **last != *draw.texture,
                        None => true,
                    };
                    if need_rebind {
                        pass.set_bind_group(1, &texture.bind_group, &[]);
                        last_bound = Some(&draw.texture);
                    }
                }
                let start = span.index_offset + draw.index_start;
                pass.draw_indexed(start..start + draw.index_count, span.base_vertex, 0..1);
                stats.draw_calls += 1;
            }
            if layer.blend == BlendMode::Alpha {
                stats.texture_binds += count_texture_binds(layer.batch.draw_calls()) as u32;
            }
        }

        stats
    }

    fn upload_meshes(&mut self, gpu: &GpuContext, layers: &[RenderLayer]) -> Vec<LayerSpan> {
        let vertex_count: usize = layers.iter().map(|l| l.batch.vertices().len()).sum();
        let index_count: usize = layers.iter().map(|l| l.batch.indices().len()).sum();
        self.ensure_mesh_capacity(&gpu.device, vertex_count, index_count);

        let mut vertices: Vec<SpriteVertex> = Vec::with_capacity(vertex_count);
        let mut indices: Vec<u32> = Vec::with_capacity(index_count);
        let mut spans = Vec::with_capacity(layers.len());
        for layer in layers {
            spans.push(LayerSpan {
                base_vertex: vertices.len() as i32,
                index_offset: indices.len() as u32,
            });
            vertices.extend_from_slice(layer.batch.vertices());
            indices.extend_from_slice(layer.batch.indices());
        }

        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
        spans
    }

    fn ensure_mesh_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }

    fn ensure_camera_slots(&mut self, device: &wgpu::Device, count: usize) {
        while self.camera_slots.len() < count {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Camera Uniform Buffer"),
                size: std::mem::size_of::<CameraUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.pipeline.create_camera_bind_group(device, &buffer);
            self.camera_slots.push(CameraSlot { buffer, bind_group });
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite_batch::GlyphSortType;
    use glam::Vec4;

    fn finished_batch(quads: usize) -> SpriteBatch {
        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::Texture);
        for _ in 0..quads {
            batch.draw(
                Vec4::new(0.0, 0.0, 1.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, 1.0),
                "t",
                0.0,
                ColorRGBA8::WHITE,
            );
        }
        batch.end();
        batch
    }

    #[test]
    fn empty_batches_are_not_queued() {
        let camera = Camera::new(800, 600);
        let mut queue = RenderQueue::new();
        queue.push(finished_batch(0), BlendMode::Alpha, &camera);
        queue.push(finished_batch(3), BlendMode::Additive, &camera);
        assert_eq!(queue.layers().len(), 1);
        assert_eq!(queue.layers()[0].blend, BlendMode::Additive);
        assert_eq!(queue.sprite_count(), 3);
        queue.clear();
        assert!(queue.layers().is_empty());
    }
}
