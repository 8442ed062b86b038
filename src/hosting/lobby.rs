use super::channel::Channel;
use super::error::LobbyError;
use crate::GameId;
use crate::PlayerId;
use crate::game::CardTemplate;
use crate::game::Game;
use crate::game::GameState;
use crate::game::deck;
use crate::protocol::Action;
use crate::protocol::ServerMessage;
use crate::repository::GameRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;

/// Front desk for every live game.
///
/// Owns the repository seam, the per-game broadcast channels, and one
/// async lock per game id so that get → mutate → update → broadcast
/// runs whole against concurrent actions on the same game. Actions on
/// different games interleave freely.
pub struct Lobby {
    repository: Arc<dyn GameRepository>,
    channels: RwLock<HashMap<GameId, Channel>>,
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl Lobby {
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self {
            repository,
            channels: RwLock::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a new game with a deck built from the template and
    /// returns its minted id.
    pub async fn create(&self, template: &[CardTemplate]) -> GameId {
        let mut game = Game::new();
        game.set_deck(deck::build(template));
        let id = self.repository.save(game).await;
        log::info!("[lobby] opened game {}", id);
        id
    }

    /// The current snapshot, verbatim.
    pub async fn state(&self, id: &GameId) -> Result<GameState, LobbyError> {
        self.repository
            .get(id)
            .await
            .map(|game| game.state().clone())
            .ok_or_else(|| LobbyError::GameNotFound(id.clone()))
    }

    /// Join handshake: mints a player, stores the mutation, broadcasts
    /// the new snapshot, and returns the id to the caller.
    pub async fn join(&self, id: &GameId) -> Result<PlayerId, LobbyError> {
        let gate = self.gate(id).await;
        let _guard = gate.lock().await;
        let mut game = self
            .repository
            .get(id)
            .await
            .ok_or_else(|| LobbyError::GameNotFound(id.clone()))?;
        let player = game.add_player();
        let state = game.state().clone();
        self.repository.update(id, game).await;
        self.publish(id, state).await;
        log::info!("[lobby] {} joined {}", player, id);
        Ok(player)
    }

    /// Applies one action and broadcasts the resulting snapshot.
    ///
    /// RESTORE never resolves the repository first: it rebuilds a
    /// fresh engine from the carried snapshot and overwrites whatever
    /// entry the id has, existing or lost. Everything else 404s when
    /// the game is unknown.
    pub async fn act(&self, id: &GameId, action: Action) -> Result<(), LobbyError> {
        let gate = self.gate(id).await;
        let _guard = gate.lock().await;
        let game = match action {
            Action::Restore { ref game_state } => {
                log::info!("[lobby] restoring {} from a client snapshot", id);
                Game::from_snapshot(game_state.clone())
            }
            ref action => {
                let mut game = self
                    .repository
                    .get(id)
                    .await
                    .ok_or_else(|| LobbyError::GameNotFound(id.clone()))?;
                log::debug!("[lobby] {} applying {}", id, action);
                action.apply(&mut game)?;
                game
            }
        };
        let state = game.state().clone();
        self.repository.update(id, game).await;
        self.publish(id, state).await;
        Ok(())
    }

    /// Opens a subscription to a game's channel. Unknown games fail
    /// the handshake; this is not the not-found that triggers client
    /// recovery.
    pub async fn subscribe(&self, id: &GameId) -> Result<UnboundedReceiver<String>, LobbyError> {
        self.repository
            .get(id)
            .await
            .ok_or_else(|| LobbyError::GameNotFound(id.clone()))?;
        let mut channels = self.channels.write().await;
        let rx = channels.entry(id.clone()).or_default().subscribe();
        log::info!("[lobby] new subscriber on {}", id);
        Ok(rx)
    }

    /// Bridges one WebSocket session onto a game's channel: snapshots
    /// flow out, and the socket is watched only for close. Actions
    /// travel over plain requests, never this socket.
    pub async fn bridge(
        &self,
        id: &GameId,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> Result<(), LobbyError> {
        use futures::StreamExt;
        let mut rx = self.subscribe(id).await?;
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Some(json) => if session.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
        });
        Ok(())
    }

    async fn publish(&self, id: &GameId, state: GameState) {
        let json = ServerMessage::update(state).to_json();
        if let Some(channel) = self.channels.write().await.get_mut(id) {
            channel.broadcast(&json);
        }
    }

    async fn gate(&self, id: &GameId) -> Arc<Mutex<()>> {
        self.locks.lock().await.entry(id.clone()).or_default().clone()
    }
}
