use crate::CardId;
use crate::PlayerId;
use crate::game::Game;
use crate::game::GameState;
use crate::game::UnknownPlayer;
use serde::Deserialize;
use serde::Serialize;

/// Client-to-server game actions, the closed set of ways a game may
/// be mutated over the wire.
///
/// The `type` tag discriminates; a payload with any other tag fails to
/// deserialize and is rejected at the HTTP layer rather than silently
/// dropped. RESTORE is the recovery half-step: it carries a complete
/// snapshot for the server to rebuild a lost game from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Rename {
        player: PlayerId,
        name: String,
    },
    Draw {
        player: PlayerId,
    },
    Give {
        player: PlayerId,
        recipient: PlayerId,
        #[serde(rename = "cardIds")]
        card_ids: Vec<CardId>,
    },
    Score {
        player: PlayerId,
        #[serde(rename = "cardIds")]
        card_ids: Vec<CardId>,
    },
    EndTurn,
    RemovePlayer {
        player: PlayerId,
    },
    ShowOrHideCard {
        player: PlayerId,
        card: CardId,
    },
    Restore {
        #[serde(rename = "gameState")]
        game_state: GameState,
    },
}

impl Action {
    /// Applies this action to a live game. GIVE moves its card ids one
    /// at a time; RESTORE replaces the game wholesale (the lobby
    /// normally intercepts it earlier, since RESTORE must also work
    /// when no game exists to apply to).
    pub fn apply(&self, game: &mut Game) -> Result<(), UnknownPlayer> {
        match self {
            Self::Rename { player, name } => game.rename_player(player, name),
            Self::Draw { player } => game.draw(player),
            Self::Give {
                player,
                recipient,
                card_ids,
            } => card_ids
                .iter()
                .try_for_each(|card| game.give(player, recipient, *card)),
            Self::Score { player, card_ids } => game.score(player, card_ids),
            Self::EndTurn => Ok(game.end_turn()),
            Self::RemovePlayer { player } => Ok(game.remove_player(player)),
            Self::ShowOrHideCard { card, .. } => Ok(game.show_or_hide_card(*card)),
            Self::Restore { game_state } => Ok(*game = Game::from_snapshot(game_state.clone())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Rename { player, name } => write!(f, "RENAME {} -> {}", player, name),
            Self::Draw { player } => write!(f, "DRAW {}", player),
            Self::Give {
                player,
                recipient,
                card_ids,
            } => write!(f, "GIVE {} -> {} {:?}", player, recipient, card_ids),
            Self::Score { player, card_ids } => write!(f, "SCORE {} {:?}", player, card_ids),
            Self::EndTurn => write!(f, "END_TURN"),
            Self::RemovePlayer { player } => write!(f, "REMOVE_PLAYER {}", player),
            Self::ShowOrHideCard { card, .. } => write!(f, "SHOW_OR_HIDE_CARD {}", card),
            Self::Restore { .. } => write!(f, "RESTORE"),
        }
    }
}
