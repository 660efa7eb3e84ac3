//! Application services - Use case implementations
//!
//! Services borrow the room they act on and return what happened; delivering
//! the result to clients is the transport layer's job.

pub mod game_service;

pub use game_service::{CardPlay, GameService, ProfessionActivation};
