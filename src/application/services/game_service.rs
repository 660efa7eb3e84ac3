//! Game service - the use cases players trigger inside a room
//!
//! The service works on a borrowed [`Room`] and never broadcasts anything
//! itself. The transport layer holds the room exclusively for the whole call
//! and fans the results out afterwards.

use std::sync::Arc;

use rand::RngCore;
use tracing::{info, instrument, warn};

use crate::domain::entities::Room;
use crate::domain::services::character_generator;
use crate::domain::services::scenario::generate_scenario;
use crate::domain::services::{EffectEngine, EffectOutcome};
use crate::domain::value_objects::{ContentTables, EffectParseError, PlayerId};

/// A card that was played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlay {
    pub player_name: String,
    pub card_name: String,
    pub outcome: EffectOutcome,
}

impl CardPlay {
    pub fn notification(&self) -> String {
        format!(
            "{}: {}. {}",
            self.player_name,
            self.card_name,
            self.outcome.summary()
        )
    }
}

/// Result of trying to use a profession ability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfessionActivation {
    /// The ability fired and the one use is spent
    Applied {
        player_name: String,
        profession_name: String,
        outcome: EffectOutcome,
    },
    /// The player already used their ability this game
    AlreadyUsed,
    /// The profession has no ability (or the player has no profession)
    NoActiveEffect,
}

/// Message shown to the actor when their profession has nothing to activate
pub const NO_ACTIVE_EFFECT: &str = "This profession has no active ability.";
/// Message shown to the actor when their ability is already spent
pub const ALREADY_USED: &str = "You have already used your profession this game.";

impl ProfessionActivation {
    pub fn notification(&self) -> String {
        match self {
            Self::Applied {
                player_name,
                profession_name,
                outcome,
            } => format!(
                "{} used profession '{}'! {}",
                player_name,
                profession_name,
                outcome.summary()
            ),
            Self::AlreadyUsed => ALREADY_USED.to_string(),
            Self::NoActiveEffect => NO_ACTIVE_EFFECT.to_string(),
        }
    }
}

/// Use cases for starting games and spending cards and abilities
#[derive(Debug, Clone)]
pub struct GameService {
    content: Arc<ContentTables>,
    engine: EffectEngine,
}

impl GameService {
    pub fn new(content: Arc<ContentTables>) -> Self {
        Self::with_engine(content, EffectEngine::new())
    }

    pub fn with_engine(content: Arc<ContentTables>, engine: EffectEngine) -> Self {
        Self { content, engine }
    }

    /// Start (or restart) the game: new scenario, new characters for everyone
    #[instrument(skip(self, room, rng), fields(room = %room.code))]
    pub fn start_game(&self, room: &mut Room, rng: &mut dyn RngCore) {
        room.started = true;
        room.game_data = Some(generate_scenario(&self.content, room.players.len(), rng));

        for player in room.players.iter_mut() {
            let character = character_generator::generate(&self.content.config, &self.content, rng);
            if character.is_none() {
                warn!("No character generated for {}", player.name);
            }
            player.assign_character(character);
        }

        info!("Game started in room {} with {} players", room.code, room.players.len());
    }

    /// Play a card from the pack.
    ///
    /// Returns `None` when the card id is unknown or the actor is not in the
    /// room; nothing changes in that case.
    #[instrument(skip(self, room, rng), fields(room = %room.code))]
    pub fn use_card(
        &self,
        room: &mut Room,
        actor: PlayerId,
        card_id: &str,
        target: Option<PlayerId>,
        rng: &mut dyn RngCore,
    ) -> Option<CardPlay> {
        let card = self.content.card(card_id)?;
        let player = room.player_mut(actor)?;
        player.mark_card_used(&card.id);
        let player_name = player.name.clone();

        let outcome = match card.descriptor() {
            Ok(descriptor) => {
                self.engine
                    .resolve(room, actor, &descriptor, &self.content, target, rng)
            }
            Err(e) => {
                warn!("Card {} cannot take effect: {}", card.id, e);
                EffectOutcome::default()
            }
        };

        Some(CardPlay {
            player_name,
            card_name: card.name.clone(),
            outcome,
        })
    }

    /// Activate the actor's profession ability, at most once per game.
    ///
    /// The ability is looked up by the profession the character was generated
    /// with, even if an effect has since replaced the visible profession.
    #[instrument(skip(self, room, rng), fields(room = %room.code))]
    pub fn use_profession(
        &self,
        room: &mut Room,
        actor: PlayerId,
        target: Option<PlayerId>,
        rng: &mut dyn RngCore,
    ) -> ProfessionActivation {
        let Some(player) = room.player(actor) else {
            return ProfessionActivation::NoActiveEffect;
        };
        if player.profession_used {
            return ProfessionActivation::AlreadyUsed;
        }
        if player.character.is_none() {
            return ProfessionActivation::NoActiveEffect;
        }

        let Some(row) = player
            .origin_profession_id
            .as_deref()
            .and_then(|id| self.content.profession(id))
        else {
            return ProfessionActivation::NoActiveEffect;
        };
        let descriptor = match row.descriptor() {
            Ok(descriptor) => Some(descriptor),
            Err(e @ EffectParseError::NoEffect(_)) => {
                info!("Profession {} is inert: {}", row.id, e);
                return ProfessionActivation::NoActiveEffect;
            }
            Err(e) => {
                warn!("Profession {} reaches nobody: {}", row.id, e);
                None
            }
        };

        let player_name = player.name.clone();
        if let Some(player) = room.player_mut(actor) {
            player.profession_used = true;
        }

        let outcome = match descriptor {
            Some(descriptor) => {
                self.engine
                    .resolve(room, actor, &descriptor, &self.content, target, rng)
            }
            None => EffectOutcome::default(),
        };

        ProfessionActivation::Applied {
            player_name,
            profession_name: row.name.clone(),
            outcome,
        }
    }
}
