//! The player: a rotation-locked capsule plus tile-sheet animation.

use ben_core::{ColorRGBA8, InputState, Key};
use ben_render::{DebugRenderer, SpriteBatch, TileSheet};
use glam::{UVec2, Vec2, Vec4};

use crate::physics::{PhysicsBody, PhysicsWorld};

const MOVE_FORCE: f32 = 100.0;
const IDLE_DAMPING: f32 = 0.95;
const MAX_SPEED: f32 = 10.0;
const JUMP_IMPULSE: f32 = 30.0;
/// Contacts this far above the capsule's lowest point still count as feet.
const FEET_TOLERANCE: f32 = 0.05;

const SHEET_DIMS: UVec2 = UVec2::new(10, 2);
const DEFAULT_ANIM_SPEED: f32 = 0.2;
const RUN_ANIM_FACTOR: f32 = 0.025;
const IN_AIR_PUNCH_SLOWDOWN: f32 = 0.25;
const RUN_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerDef {
    pub position: Vec2,
    pub draw_dims: Vec2,
    pub collision_dims: Vec2,
    pub color: ColorRGBA8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveState {
    #[default]
    Standing,
    Running,
    Punching,
    InAir,
}

/// What the controls ask for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerIntent {
    /// -1 left, 0 none, 1 right.
    pub move_x: i8,
    pub jump_pressed: bool,
    pub punch_pressed: bool,
}

impl PlayerIntent {
    pub fn from_input(input: &InputState) -> Self {
        let left = input.is_held(Key::A) || input.is_held(Key::Left);
        let right = input.is_held(Key::D) || input.is_held(Key::Right);
        let move_x = if left {
            -1
        } else if right {
            1
        } else {
            0
        };
        Self {
            move_x,
            jump_pressed: input.is_just_pressed(Key::W) || input.is_just_pressed(Key::Up),
            punch_pressed: input.is_just_pressed(Key::Space),
        }
    }
}

/// Tile range and playback speed picked for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub state: MoveState,
    pub first_tile: u32,
    pub num_tiles: u32,
    pub speed: f32,
}

/// Choose the animation for the player's current physical state.
pub fn select_animation(on_ground: bool, punching: bool, velocity: Vec2, direction: i8) -> AnimationFrame {
    let frame = |state, first_tile, num_tiles, speed| AnimationFrame {
        state,
        first_tile,
        num_tiles,
        speed,
    };
    if on_ground {
        let moving_forward = (velocity.x > 0.0 && direction > 0) || (velocity.x < 0.0 && direction < 0);
        if punching {
            frame(MoveState::Punching, 1, 4, DEFAULT_ANIM_SPEED)
        } else if velocity.x.abs() > RUN_THRESHOLD && moving_forward {
            frame(MoveState::Running, 10, 6, velocity.x.abs() * RUN_ANIM_FACTOR)
        } else {
            frame(MoveState::Standing, 0, 1, DEFAULT_ANIM_SPEED)
        }
    } else if punching {
        frame(
            MoveState::Punching,
            18,
            1,
            DEFAULT_ANIM_SPEED * IN_AIR_PUNCH_SLOWDOWN,
        )
    } else if velocity.y <= 0.0 {
        frame(MoveState::InAir, 17, 1, DEFAULT_ANIM_SPEED)
    } else {
        frame(MoveState::InAir, 16, 1, DEFAULT_ANIM_SPEED)
    }
}

#[derive(Debug)]
pub struct Player {
    body: PhysicsBody,
    draw_dims: Vec2,
    collision_dims: Vec2,
    color: ColorRGBA8,
    sheet: TileSheet,
    move_state: MoveState,
    anim_time: f32,
    tile_index: u32,
    direction: i8,
    on_ground: bool,
    punching: bool,
}

impl Player {
    pub fn new(world: &mut PhysicsWorld, def: PlayerDef, texture: &str) -> Self {
        let body = world.create_capsule(def.position, def.collision_dims);
        Self {
            body,
            draw_dims: def.draw_dims,
            collision_dims: def.collision_dims,
            color: def.color,
            sheet: TileSheet::new(texture, SHEET_DIMS),
            move_state: MoveState::Standing,
            anim_time: 0.0,
            tile_index: 0,
            direction: 1,
            on_ground: false,
            punching: false,
        }
    }

    pub fn destroy(self, world: &mut PhysicsWorld) {
        world.remove_body(self.body);
    }

    pub fn def(&self, world: &PhysicsWorld) -> PlayerDef {
        PlayerDef {
            position: world.position(&self.body),
            draw_dims: self.draw_dims,
            collision_dims: self.collision_dims,
            color: self.color,
        }
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        world.position(&self.body)
    }

    pub fn move_state(&self) -> MoveState {
        self.move_state
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn is_punching(&self) -> bool {
        self.punching
    }

    /// Apply controls for one frame. Returns true when a jump was started.
    pub fn update(&mut self, world: &mut PhysicsWorld, intent: PlayerIntent) -> bool {
        if intent.move_x != 0 {
            self.direction = intent.move_x.signum();
            world.apply_force(&self.body, Vec2::new(MOVE_FORCE * intent.move_x as f32, 0.0));
        } else {
            world.clear_forces(&self.body);
            let v = world.linvel(&self.body);
            world.set_linvel(&self.body, Vec2::new(v.x * IDLE_DAMPING, v.y));
        }

        let v = world.linvel(&self.body);
        if v.x.abs() > MAX_SPEED {
            world.set_linvel(&self.body, Vec2::new(MAX_SPEED.copysign(v.x), v.y));
        }

        let feet_y = world.position(&self.body).y - self.collision_dims.y * 0.5 + FEET_TOLERANCE;
        self.on_ground = world.touching_below(&self.body, feet_y);

        let mut jumped = false;
        if self.on_ground && intent.jump_pressed {
            world.apply_impulse(&self.body, Vec2::new(0.0, JUMP_IMPULSE));
            jumped = true;
        }
        if intent.punch_pressed {
            self.punching = true;
        }

        self.animate(world.linvel(&self.body));
        jumped
    }

    fn animate(&mut self, velocity: Vec2) {
        let frame = select_animation(self.on_ground, self.punching, velocity, self.direction);
        if frame.state != self.move_state {
            self.anim_time = 0.0;
        }
        self.move_state = frame.state;
        self.anim_time += frame.speed;
        if self.punching && self.anim_time > frame.num_tiles as f32 {
            self.punching = false;
        }
        self.tile_index = frame.first_tile + (self.anim_time as u32) % frame.num_tiles;
    }

    /// Current tile's uvs, mirrored horizontally when facing left.
    pub fn uv_rect(&self) -> Vec4 {
        let mut uv = self.sheet.uvs(self.tile_index);
        if self.direction < 0 {
            uv.x += 1.0 / self.sheet.dims.x as f32;
            uv.z = -uv.z;
        }
        uv
    }

    /// Sprite rect with its bottom at the capsule's feet.
    fn dest_rect(&self, world: &PhysicsWorld) -> Vec4 {
        let position = world.position(&self.body);
        Vec4::new(
            position.x - self.draw_dims.x * 0.5,
            position.y - self.collision_dims.y * 0.5,
            self.draw_dims.x,
            self.draw_dims.y,
        )
    }

    pub fn draw(&self, world: &PhysicsWorld, batch: &mut SpriteBatch) {
        batch.draw(
            self.dest_rect(world),
            self.uv_rect(),
            &self.sheet.texture,
            0.0,
            self.color,
        );
    }

    /// Capsule outline: the straight section as a box plus both end circles.
    pub fn draw_outline(&self, world: &PhysicsWorld, debug: &mut DebugRenderer, color: ColorRGBA8) {
        let position = world.position(&self.body);
        let radius = self.collision_dims.x * 0.5;
        let half_height = ((self.collision_dims.y - self.collision_dims.x) * 0.5).max(0.0);
        debug.draw_box(
            Vec4::new(
                position.x - radius,
                position.y - half_height,
                self.collision_dims.x,
                half_height * 2.0,
            ),
            color,
            0.0,
        );
        debug.draw_circle(position + Vec2::new(0.0, half_height), color, radius);
        debug.draw_circle(position - Vec2::new(0.0, half_height), color, radius);
    }
}
