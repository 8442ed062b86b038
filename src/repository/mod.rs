pub mod memory;
pub use memory::*;

use crate::GameId;
use crate::game::Game;

/// Storage port mapping game ids to live engines.
///
/// The protocol layer depends only on this seam, never on a
/// process-wide registry. Get-then-update is not atomic here; the
/// lobby serializes mutations per game id around it.
#[async_trait::async_trait]
pub trait GameRepository: Send + Sync {
    /// Looks up a game; `None` is the "game unknown" the recovery
    /// protocol hinges on.
    async fn get(&self, id: &GameId) -> Option<Game>;
    /// Stores a new game under a freshly minted id.
    async fn save(&self, game: Game) -> GameId;
    /// Writes a game under the given id, overwriting or creating.
    async fn update(&self, id: &GameId, game: Game);
}
