//! Thin wrapper over a rapier2d world.
//!
//! Bodies are handed out as [`PhysicsBody`] values that are neither `Copy`
//! nor `Clone`; `remove_body` consumes them, so a body cannot be removed twice
//! through the same handle.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

use crate::config::PhysicsSettings;

const BOX_DENSITY: f32 = 1.0;
const BOX_FRICTION: f32 = 0.3;

/// A rigid body and its single collider.
#[derive(Debug, PartialEq, Eq)]
pub struct PhysicsBody {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2, time_step: f32, solver_iterations: usize) -> Self {
        let params = IntegrationParameters {
            dt: time_step,
            num_solver_iterations: NonZeroUsize::new(solver_iterations).unwrap_or(NonZeroUsize::MIN),
            ..IntegrationParameters::default()
        };
        Self {
            gravity: vector![gravity.x, gravity.y],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    pub fn from_settings(settings: &PhysicsSettings) -> Self {
        Self::new(
            Vec2::from(settings.gravity),
            settings.time_step,
            settings.solver_iterations,
        )
    }

    pub fn time_step(&self) -> f32 {
        self.params.dt
    }

    /// Rectangle centred on `position`.
    pub fn create_box(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        angle: f32,
        dynamic: bool,
        fixed_rotation: bool,
    ) -> PhysicsBody {
        let builder = if dynamic {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let mut builder = builder
            .translation(vector![position.x, position.y])
            .rotation(angle);
        if fixed_rotation {
            builder = builder.lock_rotations();
        }
        let collider = ColliderBuilder::cuboid(half_extents.x.max(0.001), half_extents.y.max(0.001))
            .density(BOX_DENSITY)
            .friction(BOX_FRICTION)
            .build();
        self.insert(builder.build(), collider)
    }

    /// Upright dynamic capsule with locked rotation, `dims` being its full
    /// width and height.
    pub fn create_capsule(&mut self, position: Vec2, dims: Vec2) -> PhysicsBody {
        let radius = (dims.x * 0.5).max(0.001);
        let half_height = ((dims.y - dims.x) * 0.5).max(0.0);
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .lock_rotations()
            .build();
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .density(BOX_DENSITY)
            .friction(BOX_FRICTION)
            .build();
        self.insert(body, collider)
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> PhysicsBody {
        let body = self.bodies.insert(body);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        PhysicsBody { body, collider }
    }

    pub fn remove_body(&mut self, handle: PhysicsBody) {
        self.bodies.remove(
            handle.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    pub fn live_body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn position(&self, handle: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(handle.body)
            .map(|b| Vec2::new(b.translation().x, b.translation().y))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn angle(&self, handle: &PhysicsBody) -> f32 {
        self.bodies
            .get(handle.body)
            .map(|b| b.rotation().angle())
            .unwrap_or(0.0)
    }

    pub fn linvel(&self, handle: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(handle.body)
            .map(|b| Vec2::new(b.linvel().x, b.linvel().y))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_linvel(&mut self, handle: &PhysicsBody, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    /// Replace the force applied during the next step.
    pub fn apply_force(&mut self, handle: &PhysicsBody, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.reset_forces(true);
            body.add_force(vector![force.x, force.y], true);
        }
    }

    pub fn clear_forces(&mut self, handle: &PhysicsBody) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.reset_forces(true);
        }
    }

    pub fn apply_impulse(&mut self, handle: &PhysicsBody, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    /// Point-in-shape test against the body's current pose, so it holds
    /// without stepping the world.
    pub fn contains_point(&self, handle: &PhysicsBody, point: Vec2) -> bool {
        let (Some(body), Some(collider)) =
            (self.bodies.get(handle.body), self.colliders.get(handle.collider))
        else {
            return false;
        };
        let offset = collider
            .position_wrt_parent()
            .copied()
            .unwrap_or_else(Isometry::identity);
        let pose = body.position() * offset;
        collider
            .shape()
            .contains_point(&pose, &point![point.x, point.y])
    }

    /// Whether any active contact of the body lies below `feet_y`.
    pub fn touching_below(&self, handle: &PhysicsBody, feet_y: f32) -> bool {
        self.narrow_phase
            .contact_pairs_with(handle.collider)
            .filter(|pair| pair.has_any_active_contact)
            .flat_map(|pair| pair.manifolds.iter())
            .flat_map(|manifold| manifold.data.solver_contacts.iter())
            .any(|contact| contact.point.y < feet_y)
    }
}
