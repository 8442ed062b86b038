use crate::GameId;
use crate::PlayerId;

/// Failures the protocol layer reports explicitly, as opposed to the
/// engine's silent rule-level no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyError {
    /// No repository entry for this id: the not-found clients
    /// pattern-match to trigger RESTORE recovery.
    GameNotFound(GameId),
    /// An action named a player the game does not hold.
    UnknownPlayer(PlayerId),
}

impl std::fmt::Display for LobbyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameNotFound(id) => write!(f, "game not found: {}", id),
            Self::UnknownPlayer(id) => write!(f, "unknown player: {}", id),
        }
    }
}

impl std::error::Error for LobbyError {}

impl From<crate::game::UnknownPlayer> for LobbyError {
    fn from(e: crate::game::UnknownPlayer) -> Self {
        Self::UnknownPlayer(e.0)
    }
}
