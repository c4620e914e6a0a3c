pub mod panel;
pub mod state;
