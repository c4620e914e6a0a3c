use ben_core::ColorRGBA8;
use glam::{Vec2, Vec4};

use crate::sprite_batch::SpriteBatch;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle2D {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: ColorRGBA8,
    pub life: f32,
    pub size: f32,
}

impl Particle2D {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

pub type ParticleUpdate = fn(&mut Particle2D, f32);

pub fn default_particle_update(particle: &mut Particle2D, dt: f32) {
    particle.position += particle.velocity * dt;
}

/// Fixed-capacity pool of particles that share one texture.
pub struct ParticleBatch2D {
    particles: Vec<Particle2D>,
    decay_rate: f32,
    texture: String,
    update_fn: ParticleUpdate,
    last_free: usize,
}

impl ParticleBatch2D {
    pub fn new(max_particles: usize, decay_rate: f32, texture: impl Into<String>) -> Self {
        Self::with_update(max_particles, decay_rate, texture, default_particle_update)
    }

    pub fn with_update(
        max_particles: usize,
        decay_rate: f32,
        texture: impl Into<String>,
        update_fn: ParticleUpdate,
    ) -> Self {
        Self {
            particles: vec![Particle2D::default(); max_particles.max(1)],
            decay_rate,
            texture: texture.into(),
            update_fn,
            last_free: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn add_particle(&mut self, position: Vec2, velocity: Vec2, color: ColorRGBA8, size: f32) {
        let index = self.find_free_particle();
        self.particles[index] = Particle2D {
            position,
            velocity,
            color,
            life: 1.0,
            size,
        };
    }

    pub fn update(&mut self, dt: f32) {
        for particle in self.particles.iter_mut().filter(|p| p.is_alive()) {
            (self.update_fn)(particle, dt);
            particle.life -= self.decay_rate * dt;
        }
    }

    /// Queue every live particle as a square centred on its position.
    pub fn draw(&self, batch: &mut SpriteBatch) {
        let uv = Vec4::new(0.0, 0.0, 1.0, 1.0);
        for p in self.particles.iter().filter(|p| p.is_alive()) {
            let half = p.size * 0.5;
            let dest = Vec4::new(p.position.x - half, p.position.y - half, p.size, p.size);
            batch.draw(dest, uv, &self.texture, 0.0, p.color);
        }
    }

    /// Search from the last free slot, wrap once, and overwrite slot 0 when
    /// the pool is full.
    fn find_free_particle(&mut self) -> usize {
        let len = self.particles.len();
        let start = self.last_free.min(len);
        let found = (start..len)
            .chain(0..start)
            .find(|&i| !self.particles[i].is_alive());
        match found {
            Some(i) => {
                self.last_free = i;
                i
            }
            None => 0,
        }
    }
}

/// Owns particle batches and ticks/draws them together.
#[derive(Default)]
pub struct ParticleEngine2D {
    batches: Vec<ParticleBatch2D>,
}

impl ParticleEngine2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_particle_batch(&mut self, batch: ParticleBatch2D) -> usize {
        self.batches.push(batch);
        self.batches.len() - 1
    }

    pub fn batch_mut(&mut self, index: usize) -> Option<&mut ParticleBatch2D> {
        self.batches.get_mut(index)
    }

    pub fn update(&mut self, dt: f32) {
        for batch in &mut self.batches {
            batch.update(dt);
        }
    }

    pub fn draw(&self, sprite_batch: &mut SpriteBatch) {
        for batch in &self.batches {
            batch.draw(sprite_batch);
        }
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }
}
