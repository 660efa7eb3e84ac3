//! WebSocket handler for player connections
//!
//! Every connection gets a fresh [`PlayerId`]. Actions take the session
//! store's write lock for their whole read-resolve-mutate-broadcast run, so
//! two effects in the same room never interleave.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::application::services::ProfessionActivation;
use crate::domain::entities::{Character, GameData, Player, Room};
use crate::domain::value_objects::{PlayerId, RoomCode};
use crate::infrastructure::session::SessionError;
use crate::infrastructure::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let player_id = PlayerId::new();

    // Create a channel for sending messages to this player
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::info!("New WebSocket connection established: {}", player_id);

    // Forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state, player_id, tx.clone()).await
                    {
                        if tx.send(response).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse message: {}", e);
                    let error = ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    if tx.send(error).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by client: {}", player_id);
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error for player {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    disconnect(&state, player_id).await;
    send_task.abort();

    tracing::info!("WebSocket connection terminated: {}", player_id);
}

/// Remove a player and tell the rest of the room
async fn disconnect(state: &AppState, player_id: PlayerId) {
    let mut sessions = state.sessions.write().await;
    if let Some((code, _player)) = sessions.leave(player_id) {
        sessions.broadcast_players(&code);
    }
    tracing::debug!(
        "{} rooms, {} players connected",
        sessions.room_count(),
        sessions.player_count()
    );
}

/// Handle a parsed client message. The returned message goes to the sender only.
async fn handle_message(
    msg: ClientMessage,
    state: &AppState,
    player_id: PlayerId,
    sender: mpsc::UnboundedSender<ServerMessage>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        ClientMessage::JoinRoom { name, room_code } => {
            let mut sessions = state.sessions.write().await;
            let code = RoomCode::new(room_code);
            match sessions.join_room(code.clone(), player_id, &name, sender) {
                Ok(_) => {
                    sessions.send_to(
                        player_id,
                        &ServerMessage::RoomJoined {
                            room_code: code.to_string(),
                            player_id: player_id.to_string(),
                        },
                    );
                    sessions.broadcast_players(&code);
                    None
                }
                Err(e) => Some(ServerMessage::Error {
                    code: e.code().to_string(),
                    message: e.to_string(),
                }),
            }
        }

        ClientMessage::StartGame => {
            let mut sessions = state.sessions.write().await;
            let code = match sessions.player_room(player_id) {
                Ok(code) => code,
                Err(e) => return Some(not_in_room(e)),
            };
            let room = sessions.room_mut(&code)?;
            state.game.start_game(room, &mut rand::thread_rng());
            sessions.send_game_state(&code);
            None
        }

        ClientMessage::UseCard { card_id, target_id } => {
            let mut sessions = state.sessions.write().await;
            let code = match sessions.player_room(player_id) {
                Ok(code) => code,
                Err(e) => return Some(not_in_room(e)),
            };
            let room = sessions.room_mut(&code)?;
            let target = target_id.as_deref().and_then(PlayerId::parse);
            let Some(play) =
                state
                    .game
                    .use_card(room, player_id, &card_id, target, &mut rand::thread_rng())
            else {
                tracing::debug!("Ignoring unknown card {} from {}", card_id, player_id);
                return None;
            };
            sessions.send_game_state(&code);
            sessions.broadcast(
                &code,
                &ServerMessage::Notification {
                    message: play.notification(),
                },
            );
            None
        }

        ClientMessage::UseProfession { target_id } => {
            let mut sessions = state.sessions.write().await;
            let code = match sessions.player_room(player_id) {
                Ok(code) => code,
                Err(e) => return Some(not_in_room(e)),
            };
            let room = sessions.room_mut(&code)?;
            let target = target_id.as_deref().and_then(PlayerId::parse);
            let activation =
                state
                    .game
                    .use_profession(room, player_id, target, &mut rand::thread_rng());

            match activation {
                ProfessionActivation::Applied { .. } => {
                    sessions.send_game_state(&code);
                    sessions.broadcast(
                        &code,
                        &ServerMessage::Notification {
                            message: activation.notification(),
                        },
                    );
                    None
                }
                ProfessionActivation::NoActiveEffect => Some(ServerMessage::Notification {
                    message: activation.notification(),
                }),
                ProfessionActivation::AlreadyUsed => {
                    tracing::debug!("Player {} already used their profession", player_id);
                    None
                }
            }
        }
    }
}

fn not_in_room(e: SessionError) -> ServerMessage {
    ServerMessage::Error {
        code: e.code().to_string(),
        message: e.to_string(),
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join (or create) a room
    JoinRoom { name: String, room_code: String },
    /// Start or restart the game in the sender's room
    StartGame,
    /// Play one of the sender's cards
    UseCard {
        card_id: String,
        #[serde(default)]
        target_id: Option<String>,
    },
    /// Activate the sender's profession ability
    UseProfession {
        #[serde(default)]
        target_id: Option<String>,
    },
    /// Heartbeat ping
    Heartbeat,
}

/// Messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent to the joining player only
    RoomJoined { room_code: String, player_id: String },
    /// Current player list of the room
    UpdatePlayers { players: Vec<PlayerInfo> },
    /// Per-player view of a running game, sent on start and after every effect
    GameStarted(GameState),
    /// Free-text message shown to players
    Notification { message: String },
    /// Error response
    Error { code: String, message: String },
    /// Heartbeat response
    Pong,
}

/// Public view of a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub is_host: bool,
}

impl From<&Player> for PlayerInfo {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.clone(),
            is_host: player.is_host,
        }
    }
}

/// What one player sees of the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub me: Option<Character>,
    pub game: Option<GameData>,
    pub used_cards: Vec<String>,
    pub profession_used: bool,
}

impl GameState {
    pub fn for_player(room: &Room, player: &Player) -> Self {
        Self {
            me: player.character.clone(),
            game: room.game_data.clone(),
            used_cards: player.used_card_ids.iter().cloned().collect(),
            profession_used: player.profession_used,
        }
    }
}
