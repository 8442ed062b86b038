use super::card::Card;
use crate::CardId;
use crate::PlayerId;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// One player's holdings: an ordered hand and the sets scored so far.
/// Hand order is append order; a set is three cards of one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub hand: Vec<Card>,
    pub sets: Vec<Vec<Card>>,
}

impl PlayerState {
    /// All of this player's cards: scored sets flattened, then the hand.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.sets.iter().flatten().chain(self.hand.iter())
    }
}

/// The full snapshot of one game: exactly what goes over the wire in
/// every broadcast and what a client caches for recovery.
///
/// `deck[0]` is the next card to draw. Turn order is lexicographic on
/// player id, which the map's key order provides directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub deck: Vec<Card>,
    pub players: BTreeMap<PlayerId, PlayerState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<PlayerId>,
}

impl GameState {
    /// Every card id in the game, wherever it currently lives.
    /// A legal state yields each id exactly once.
    pub fn card_ids(&self) -> Vec<CardId> {
        self.deck
            .iter()
            .map(|c| c.id)
            .chain(self.players.values().flat_map(|p| p.cards().map(|c| c.id)))
            .collect()
    }
}
