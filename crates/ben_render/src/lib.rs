pub mod camera;
pub mod debug_renderer;
pub mod gpu_context;
pub mod particles;
pub mod renderer;
pub mod sprite_batch;
pub mod sprite_pipeline;
pub mod texture;
pub mod texture_cache;
pub mod tile_sheet;

pub use camera::{Camera, CameraUniform};
pub use debug_renderer::DebugRenderer;
pub use gpu_context::GpuContext;
pub use particles::{ParticleBatch2D, ParticleEngine2D};
pub use renderer::{FrameStats, RenderQueue, SpriteRenderer};
pub use sprite_batch::{GlyphSortType, SpriteBatch, SpriteVertex, WHITE_TEXTURE};
pub use sprite_pipeline::{BlendMode, SpritePipeline};
pub use texture::Texture;
pub use texture_cache::TextureCache;
pub use tile_sheet::TileSheet;
