//! Session management for active game rooms
//!
//! The [`SessionManager`] is the explicit room registry: it owns every
//! [`Room`], knows which room each connected player is in, and holds the
//! outbound channel of every connection so room state can be fanned out.
//! Callers hold it behind a single lock for the whole of each action.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::domain::entities::{Player, Room};
use crate::domain::value_objects::{PlayerId, RoomCode};
use crate::infrastructure::websocket::{GameState, PlayerInfo, ServerMessage};

/// Error types for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomCode),

    #[error("Player not in any room: {0}")]
    NotInRoom(PlayerId),

    #[error("Room code must not be empty")]
    EmptyRoomCode,

    #[error("Player name must not be empty")]
    EmptyName,
}

impl SessionError {
    /// Machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => "ROOM_NOT_FOUND",
            Self::NotInRoom(_) => "NOT_IN_ROOM",
            Self::EmptyRoomCode | Self::EmptyName => "INVALID_JOIN",
        }
    }
}

/// Manages active rooms and the connections of their players
#[derive(Default)]
pub struct SessionManager {
    rooms: HashMap<RoomCode, Room>,
    /// Maps players to their current room
    player_rooms: HashMap<PlayerId, RoomCode>,
    /// Channel to send messages to each connected player
    senders: HashMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a room, creating it if needed. A player already in another room
    /// leaves it first.
    pub fn join_room(
        &mut self,
        code: RoomCode,
        player_id: PlayerId,
        name: &str,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<&Room, SessionError> {
        if code.is_empty() {
            return Err(SessionError::EmptyRoomCode);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        if self.player_rooms.contains_key(&player_id) {
            self.leave(player_id);
        }

        let room = self.rooms.entry(code.clone()).or_insert_with(|| {
            tracing::info!("Created new room {}", code);
            Room::new(code.clone())
        });
        room.add_player(player_id, name);

        self.player_rooms.insert(player_id, code.clone());
        self.senders.insert(player_id, sender);

        tracing::info!("Player {} ({}) joined room {}", name, player_id, code);
        self.rooms.get(&code).ok_or(SessionError::RoomNotFound(code))
    }

    /// Remove a player from their room. Empty rooms are dropped.
    pub fn leave(&mut self, player_id: PlayerId) -> Option<(RoomCode, Player)> {
        self.senders.remove(&player_id);
        let code = self.player_rooms.remove(&player_id)?;
        let room = self.rooms.get_mut(&code)?;
        let player = room.remove_player(player_id)?;

        tracing::info!(
            "Player {} ({}) left room {} after {}s",
            player.name,
            player_id,
            code,
            (chrono::Utc::now() - player.joined_at).num_seconds()
        );
        if room.is_empty() {
            self.rooms.remove(&code);
            tracing::info!("Removed empty room {}", code);
        }
        Some((code, player))
    }

    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Room code of the room a player is in
    pub fn player_room(&self, player_id: PlayerId) -> Result<RoomCode, SessionError> {
        self.player_rooms
            .get(&player_id)
            .cloned()
            .ok_or(SessionError::NotInRoom(player_id))
    }

    /// Send a message to one player
    pub fn send_to(&self, player_id: PlayerId, message: &ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            if let Err(e) = sender.send(message.clone()) {
                tracing::warn!("Failed to send message to player {}: {}", player_id, e);
            }
        }
    }

    /// Broadcast a message to every player in a room
    pub fn broadcast(&self, code: &RoomCode, message: &ServerMessage) {
        if let Some(room) = self.room(code) {
            for player in &room.players {
                self.send_to(player.id, message);
            }
        }
    }

    /// Broadcast the current player list of a room
    pub fn broadcast_players(&self, code: &RoomCode) {
        if let Some(room) = self.room(code) {
            let message = ServerMessage::UpdatePlayers {
                players: room.players.iter().map(PlayerInfo::from).collect(),
            };
            self.broadcast(code, &message);
        }
    }

    /// Send every player in a room their own view of the game
    pub fn send_game_state(&self, code: &RoomCode) {
        if let Some(room) = self.room(code) {
            for player in &room.players {
                let message = ServerMessage::GameStarted(GameState::for_player(room, player));
                self.send_to(player.id, &message);
            }
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn player_count(&self) -> usize {
        self.player_rooms.len()
    }
}
