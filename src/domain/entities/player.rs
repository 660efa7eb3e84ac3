//! Player entity - one connected participant of a room

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::entities::Character;
use crate::domain::value_objects::PlayerId;

/// A player in a room
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    /// `None` until the game starts (or when generation was inert)
    pub character: Option<Character>,
    /// Profession the character was generated with; survives re-rolls
    pub origin_profession_id: Option<String>,
    pub used_card_ids: BTreeSet<String>,
    /// Once set, stays set until the next game start
    pub profession_used: bool,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_host: false,
            character: None,
            origin_profession_id: None,
            used_card_ids: BTreeSet::new(),
            profession_used: false,
            joined_at: Utc::now(),
        }
    }

    pub fn as_host(mut self) -> Self {
        self.is_host = true;
        self
    }

    /// Give the player a fresh character and clear per-game usage
    pub fn assign_character(&mut self, character: Option<Character>) {
        self.origin_profession_id = character.as_ref().map(|c| c.profession.id.clone());
        self.character = character;
        self.used_card_ids.clear();
        self.profession_used = false;
    }

    pub fn mark_card_used(&mut self, card_id: &str) {
        self.used_card_ids.insert(card_id.to_string());
    }
}
