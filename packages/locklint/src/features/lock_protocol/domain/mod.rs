//! Lock protocol domain model

pub mod state;
pub mod state_map;

pub use state::{merge, satisfies, transition, LockAction, LockState};
pub use state_map::LockStateMap;
