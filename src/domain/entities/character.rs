//! Character entity - the randomized attribute bundle a player argues with

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CardRow, ContentRow};

/// Health name a healed character ends up with
pub const PERFECTLY_HEALTHY: &str = "Perfectly healthy";
/// Fear value of a character whose fear was cured
pub const NO_FEAR: &str = "None";
/// Age at which a character could have started working
pub const WORKING_AGE: u32 = 16;

/// A player's character for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub bio: Bio,
    pub profession: Profession,
    pub health: HealthState,
    pub fear: String,
    /// Whole hobby row, so packs may add columns without code changes
    pub hobby: ContentRow,
    pub baggage: Baggage,
    pub cards: [CardRow; 2],
    pub fact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bio {
    pub age: u32,
    pub sex: String,
    pub gender: String,
    pub height: u32,
    pub weight: u32,
}

/// The profession a character currently holds.
///
/// Effects may overwrite this wholesale, so `id` is not a stable link to
/// the profession the character was generated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profession {
    pub id: String,
    pub name: String,
    /// Years of experience
    pub experience: u32,
    pub ability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthState {
    pub name: String,
    pub stage: String,
}

impl HealthState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: String::new(),
        }
    }

    pub fn healthy() -> Self {
        Self::new(PERFECTLY_HEALTHY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baggage {
    pub small: String,
    pub big: String,
}
