use crate::GameId;
use crate::PlayerId;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Client-local persisted mapping from game id to this client's own
/// player id, so a restart or reconnect rejoins as the same player
/// instead of minting a new one.
pub trait MembershipCache: Send + Sync {
    fn player_id_for(&self, game_id: &str) -> Option<PlayerId>;
    fn save_player_id(&mut self, game_id: &str, player_id: &str);
}

/// Volatile cache for tests and short-lived clients.
#[derive(Debug, Default)]
pub struct InMemoryMembershipCache {
    memberships: HashMap<GameId, PlayerId>,
}

impl MembershipCache for InMemoryMembershipCache {
    fn player_id_for(&self, game_id: &str) -> Option<PlayerId> {
        self.memberships.get(game_id).cloned()
    }
    fn save_player_id(&mut self, game_id: &str, player_id: &str) {
        self.memberships.insert(game_id.to_string(), player_id.to_string());
    }
}

/// How long a membership survives before a reopen forgets it.
const ENTRY_LIFESPAN_MS: u128 = 6 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    #[serde(rename = "playerId")]
    player_id: PlayerId,
    #[serde(rename = "expirationTime")]
    expiration_time: u128,
}

/// File-backed cache surviving client restarts.
///
/// Stored as one JSON object of game id to `{ playerId,
/// expirationTime }`; entries older than six hours are dropped when
/// the cache is opened. An unreadable or corrupt file degrades to an
/// empty cache rather than an error.
#[derive(Debug)]
pub struct FileMembershipCache {
    path: PathBuf,
}

impl FileMembershipCache {
    /// Opens the cache at the given path, pruning expired entries.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let cache = Self { path: path.into() };
        let mut entries = cache.load();
        entries.retain(|_, entry| entry.expiration_time > now_ms());
        cache.store(&entries);
        cache
    }
    fn load(&self) -> HashMap<GameId, Entry> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }
    fn store(&self, entries: &HashMap<GameId, Entry>) {
        let json = serde_json::to_string(entries).expect("serialize memberships");
        if let Err(e) = std::fs::write(&self.path, json) {
            log::warn!("[membership] failed to persist {}: {}", self.path.display(), e);
        }
    }
}

impl MembershipCache for FileMembershipCache {
    fn player_id_for(&self, game_id: &str) -> Option<PlayerId> {
        self.load().get(game_id).map(|entry| entry.player_id.clone())
    }
    fn save_player_id(&mut self, game_id: &str, player_id: &str) {
        let mut entries = self.load();
        entries.insert(
            game_id.to_string(),
            Entry {
                player_id: player_id.to_string(),
                expiration_time: now_ms() + ENTRY_LIFESPAN_MS,
            },
        );
        self.store(&entries);
    }
}

fn now_ms() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_millis()
}
