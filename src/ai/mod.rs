//! AI behavior engine: perception, alert hysteresis and the behavior
//! state machine. AI writes `Intent`; it never touches `Input`.

mod behavior;
mod components;
mod perception;

pub use behavior::update_ai;
pub use components::*;
pub use perception::{detects, sense, Sighting};
