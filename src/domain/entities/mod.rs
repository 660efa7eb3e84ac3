//! Domain entities - Core game objects with identity

mod character;
mod player;
mod room;

pub use character::{
    Baggage, Bio, Character, HealthState, Profession, NO_FEAR, PERFECTLY_HEALTHY, WORKING_AGE,
};
pub use player::Player;
pub use room::{GameData, Room};
