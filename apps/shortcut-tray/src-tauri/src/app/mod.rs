//! Application setup and lifecycle management
//!
//! Initialization and lifecycle code, kept out of lib.rs.

pub mod lifecycle;
pub mod plugins;
pub mod state;

pub use lifecycle::*;
pub use plugins::*;
pub use state::*;
