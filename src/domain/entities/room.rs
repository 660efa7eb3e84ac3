//! Room entity - the players of one game and the scenario they share

use serde::{Deserialize, Serialize};

use crate::domain::entities::Player;
use crate::domain::value_objects::{BunkerRow, DisasterRow, PlayerId, RoomCode};

/// Scenario generated when a game starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub disaster: DisasterRow,
    pub bunker: BunkerRow,
    /// Seats available in the bunker
    pub places: u32,
    pub total_players: u32,
}

/// A game room. Player order is join order and is the order effects report in.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub players: Vec<Player>,
    pub started: bool,
    pub host_id: Option<PlayerId>,
    pub game_data: Option<GameData>,
}

impl Room {
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            players: Vec::new(),
            started: false,
            host_id: None,
            game_data: None,
        }
    }

    /// Add a player; the first player in an empty room becomes host
    pub fn add_player(&mut self, id: PlayerId, name: impl Into<String>) -> &Player {
        let mut player = Player::new(id, name);
        if self.host_id.is_none() {
            self.host_id = Some(id);
            player = player.as_host();
        }
        self.players.push(player);
        &self.players[self.players.len() - 1]
    }

    /// Remove a player, handing the host role to the next player in order
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.position(id)?;
        let removed = self.players.remove(index);

        if self.host_id == Some(id) {
            self.host_id = self.players.first().map(|p| p.id);
            if let Some(next) = self.players.first_mut() {
                next.is_host = true;
            }
        }
        Some(removed)
    }

    pub fn position(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_player_is_host() {
        let mut room = Room::new(RoomCode::new("abc"));
        let a = PlayerId::new();
        let b = PlayerId::new();
        room.add_player(a, "Ann");
        room.add_player(b, "Bob");

        assert_eq!(room.host_id, Some(a));
        assert!(room.player(a).unwrap().is_host);
        assert!(!room.player(b).unwrap().is_host);
    }

    #[test]
    fn test_host_passes_on_when_host_leaves() {
        let mut room = Room::new(RoomCode::new("abc"));
        let a = PlayerId::new();
        let b = PlayerId::new();
        room.add_player(a, "Ann");
        room.add_player(b, "Bob");

        let removed = room.remove_player(a).unwrap();
        assert_eq!(removed.name, "Ann");
        assert_eq!(room.host_id, Some(b));
        assert!(room.player(b).unwrap().is_host);

        room.remove_player(b);
        assert!(room.is_empty());
        assert_eq!(room.host_id, None);
        assert!(room.remove_player(b).is_none());
    }
}
