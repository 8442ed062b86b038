use super::membership::MembershipCache;
use crate::CardId;
use crate::GameId;
use crate::PlayerId;
use crate::game::CardTemplate;
use crate::game::GameState;
use crate::protocol::Action;
use crate::protocol::ServerMessage;
use anyhow::Context;
use async_tungstenite::tungstenite::Message;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;

/// Client for one hosting server.
///
/// Keeps two caches: the membership cache (its own player id per
/// game, so reconnects rejoin rather than mint) and the last snapshot
/// received per joined game. The snapshot cache is what lets the
/// server's store stay ephemeral: on a "game unknown" response the
/// client reseeds the server with RESTORE and retries the original
/// action exactly once. It is a recovery mechanism, not replication:
/// whichever client restores last wins, and anything the server
/// applied after this client's last broadcast is gone.
pub struct GameClient {
    http: reqwest::Client,
    base: String,
    membership: Mutex<Box<dyn MembershipCache>>,
    players: Mutex<HashMap<GameId, PlayerId>>,
    snapshots: Arc<Mutex<HashMap<GameId, GameState>>>,
}

impl GameClient {
    pub fn new(base: &str, membership: Box<dyn MembershipCache>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            membership: Mutex::new(membership),
            players: Mutex::new(HashMap::new()),
            snapshots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a game from a deck template, returning its id.
    pub async fn create_game(&self, template: &[CardTemplate]) -> anyhow::Result<GameId> {
        let body: serde_json::Value = self
            .http
            .post(format!("{}/game", self.base))
            .json(&serde_json::json!({ "template": template }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        body["gameId"]
            .as_str()
            .map(str::to_string)
            .context("create response missing gameId")
    }

    /// Joins a game: subscribes to its channel, then establishes
    /// identity: the cached player id when one is on file, otherwise
    /// a fresh one from the join handshake. Returns the player id and
    /// the stream of snapshot broadcasts.
    pub async fn join_game(
        &self,
        game_id: &GameId,
    ) -> anyhow::Result<(PlayerId, UnboundedReceiver<GameState>)> {
        let updates = self.subscribe(game_id).await?;
        let cached = self
            .membership
            .lock()
            .expect("membership lock")
            .player_id_for(game_id);
        let player = match cached {
            Some(player) => {
                log::info!("[client] rejoining {} as {}", game_id, player);
                player
            }
            None => {
                let body: serde_json::Value = self
                    .http
                    .post(format!("{}/game/{}/player", self.base, game_id))
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                let player = body["playerId"]
                    .as_str()
                    .context("join response missing playerId")?
                    .to_string();
                self.membership
                    .lock()
                    .expect("membership lock")
                    .save_player_id(game_id, &player);
                player
            }
        };
        self.players
            .lock()
            .expect("players lock")
            .insert(game_id.clone(), player.clone());
        Ok((player, updates))
    }

    /// The last snapshot received for a game, if any.
    pub fn latest_snapshot(&self, game_id: &GameId) -> Option<GameState> {
        self.snapshots
            .lock()
            .expect("snapshot lock")
            .get(game_id)
            .cloned()
    }

    /// Sends one action, running the recovery protocol on "game
    /// unknown": RESTORE with the cached snapshot, then retry the
    /// original action exactly once. A failed restore or retry is
    /// logged and swallowed; the view stays stale until the next
    /// broadcast, and no further retries happen here.
    pub async fn perform_game_action(
        &self,
        game_id: &GameId,
        action: Action,
    ) -> anyhow::Result<()> {
        let response = self.post_action(game_id, &action).await?;
        if response.status() != reqwest::StatusCode::NOT_FOUND {
            response.error_for_status()?;
            return Ok(());
        }
        log::warn!("[client] {} unknown to the server, restoring from cache", game_id);
        let Some(snapshot) = self.latest_snapshot(game_id) else {
            log::error!("[client] no cached snapshot for {}, cannot restore", game_id);
            return Ok(());
        };
        let restore = Action::Restore { game_state: snapshot };
        if let Err(e) = self
            .post_action(game_id, &restore)
            .await
            .and_then(|r| r.error_for_status())
        {
            log::error!("[client] restore of {} failed: {}", game_id, e);
            return Ok(());
        }
        match self
            .post_action(game_id, &action)
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("[client] retry after restoring {} failed: {}", game_id, e);
                Ok(())
            }
        }
    }

    pub async fn draw(&self, game_id: &GameId) -> anyhow::Result<()> {
        let player = self.player(game_id)?;
        self.perform_game_action(game_id, Action::Draw { player }).await
    }

    pub async fn give(
        &self,
        game_id: &GameId,
        card_ids: Vec<CardId>,
        recipient: &str,
    ) -> anyhow::Result<()> {
        let player = self.player(game_id)?;
        let action = Action::Give {
            player,
            recipient: recipient.to_string(),
            card_ids,
        };
        self.perform_game_action(game_id, action).await
    }

    pub async fn score(&self, game_id: &GameId, card_ids: Vec<CardId>) -> anyhow::Result<()> {
        let player = self.player(game_id)?;
        self.perform_game_action(game_id, Action::Score { player, card_ids }).await
    }

    pub async fn rename_player(&self, game_id: &GameId, name: &str) -> anyhow::Result<()> {
        let player = self.player(game_id)?;
        let action = Action::Rename {
            player,
            name: name.to_string(),
        };
        self.perform_game_action(game_id, action).await
    }

    pub async fn end_turn(&self, game_id: &GameId) -> anyhow::Result<()> {
        self.perform_game_action(game_id, Action::EndTurn).await
    }

    pub async fn remove_player(&self, game_id: &GameId, player: &str) -> anyhow::Result<()> {
        let action = Action::RemovePlayer {
            player: player.to_string(),
        };
        self.perform_game_action(game_id, action).await
    }

    pub async fn show_or_hide_card(&self, game_id: &GameId, card: CardId) -> anyhow::Result<()> {
        let player = self.player(game_id)?;
        let action = Action::ShowOrHideCard { player, card };
        self.perform_game_action(game_id, action).await
    }

    /// Opens the WebSocket subscription and spawns the reader that
    /// feeds both the snapshot cache and the caller's stream.
    async fn subscribe(&self, game_id: &GameId) -> anyhow::Result<UnboundedReceiver<GameState>> {
        let url = format!("{}/game/{}/subscribe", websocket_url(&self.base), game_id);
        let (mut socket, _) = async_tungstenite::tokio::connect_async(&url).await?;
        let (tx, rx) = unbounded_channel();
        let snapshots = Arc::clone(&self.snapshots);
        let game_id = game_id.clone();
        tokio::spawn(async move {
            while let Some(message) = socket.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(ServerMessage::UpdateGameState { state }) => {
                            snapshots
                                .lock()
                                .expect("snapshot lock")
                                .insert(game_id.clone(), state.clone());
                            if tx.send(state).is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("[client] unhandled message on {}: {}", game_id, e),
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
            log::info!("[client] subscription to {} ended", game_id);
        });
        Ok(rx)
    }

    async fn post_action(
        &self,
        game_id: &GameId,
        action: &Action,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(format!("{}/game/{}", self.base, game_id))
            .json(action)
            .send()
            .await
    }

    fn player(&self, game_id: &GameId) -> anyhow::Result<PlayerId> {
        self.players
            .lock()
            .expect("players lock")
            .get(game_id)
            .cloned()
            .with_context(|| format!("not joined to {}", game_id))
    }
}

/// Maps the HTTP base URL onto its WebSocket counterpart.
fn websocket_url(base: &str) -> String {
    match base {
        _ if base.starts_with("https://") => base.replacen("https://", "wss://", 1),
        _ if base.starts_with("http://") => base.replacen("http://", "ws://", 1),
        _ => base.to_string(),
    }
}
