//! Actor System for Path Sync
//!
//! One actor per editing session, fed through a single queue:
//!
//! ```text
//! FieldHost callbacks --> SyncEngine <-- Session (aliases, shutdown)
//!                           |    ^
//!                 spawn     v    | Resolved
//!                       resolution tasks
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types sent to the engine
//! - `engine` - Sync engine state machine with slug debouncing
//! - `session` - Wires the engine to a host and exposes the handle

mod engine;
pub mod messages;
mod session;

#[cfg(test)]
mod tests;

pub use engine::EngineState;
pub use session::Session;
