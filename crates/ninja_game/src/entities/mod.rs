pub mod box_entity;
pub mod light;
pub mod player;

pub use box_entity::{BoxDef, LevelBox};
pub use light::Light;
pub use player::{MoveState, Player, PlayerDef, PlayerIntent};
