//! Application layer - Use cases and the ports they depend on
//!
//! This layer contains:
//! - Services: game use cases (start game, play card, use profession)
//! - Ports: interfaces the infrastructure implements for the application

pub mod ports;
pub mod services;
