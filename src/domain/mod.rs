//! Domain layer - Core game logic with no transport concerns
//!
//! This layer contains:
//! - Entities: Character, Player, Room
//! - Value Objects: ids, effect descriptors, content rows and tables
//! - Domain Services: character generation, scenario generation, effect resolution

pub mod entities;
pub mod services;
pub mod value_objects;
