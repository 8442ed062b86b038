use super::GameRepository;
use crate::GameId;
use crate::game::Game;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory game storage, deliberately ephemeral.
///
/// A process restart loses every entry; connected clients are expected
/// to reseed lost games from their cached snapshots via RESTORE.
#[derive(Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<GameId, Game>>,
}

#[async_trait::async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn get(&self, id: &GameId) -> Option<Game> {
        self.games.read().await.get(id).cloned()
    }
    async fn save(&self, game: Game) -> GameId {
        let mut games = self.games.write().await;
        let id = loop {
            let id = format!("game-{}", rand::random_range(0..10_000_000u32));
            if !games.contains_key(&id) {
                break id;
            }
        };
        games.insert(id.clone(), game);
        id
    }
    async fn update(&self, id: &GameId, game: Game) {
        self.games.write().await.insert(id.clone(), game);
    }
}
