use super::card::Card;
use super::state::GameState;
use super::state::PlayerState;
use crate::CardId;
use crate::PlayerId;

/// An operation addressed a player id this game does not hold.
///
/// Rule-level rejections (bad set, missing card, empty deck) are
/// silent no-ops; a missing player is a caller bug and is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlayer(pub PlayerId);

impl std::fmt::Display for UnknownPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown player: {}", self.0)
    }
}

impl std::error::Error for UnknownPlayer {}

/// Authoritative state machine for one game instance.
///
/// Pure and synchronous; the hosting layer owns all I/O. Every
/// mutation preserves card conservation: each card id lives in exactly
/// one place across the deck, the hands, and the scored sets.
///
/// Player ids are minted `player-<n>` from a counter that only moves
/// forward, so a suffix freed by [`Game::remove_player`] is never
/// handed to a later joiner while this instance lives.
#[derive(Debug, Clone, Default)]
pub struct Game {
    state: GameState,
    next_player: u64,
}

impl Game {
    /// A fresh game: empty deck, no players, no turn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a game from a serialized snapshot, used both for
    /// repository loads and for RESTORE recovery. The id counter
    /// resumes past the highest surviving suffix; if the snapshot
    /// carries players but no turn, the first player in id order
    /// takes it.
    pub fn from_snapshot(state: GameState) -> Self {
        let next_player = state
            .players
            .keys()
            .filter_map(|id| id.strip_prefix("player-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .map_or(0, |n| n + 1);
        let mut game = Self { state, next_player };
        if game.state.current_turn.is_none() {
            game.state.current_turn = game.state.players.keys().next().cloned();
        }
        game
    }

    /// The current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replaces the draw pile wholesale.
    pub fn set_deck(&mut self, deck: Vec<Card>) {
        self.state.deck = deck;
    }

    /// Seats a new player and returns their freshly minted id. The
    /// first player to join an untouched game takes the turn.
    pub fn add_player(&mut self) -> PlayerId {
        while self
            .state
            .players
            .contains_key(&format!("player-{}", self.next_player))
        {
            self.next_player += 1;
        }
        let player = format!("player-{}", self.next_player);
        self.next_player += 1;
        self.state.players.insert(player.clone(), PlayerState::default());
        if self.state.current_turn.is_none() {
            self.state.current_turn = Some(player.clone());
        }
        player
    }

    pub fn rename_player(&mut self, player: &PlayerId, name: &str) -> Result<(), UnknownPlayer> {
        self.player_mut(player)?.name = Some(name.to_string());
        Ok(())
    }

    /// Moves the top of the deck to the end of the player's hand.
    /// Drawing from an empty deck changes nothing.
    pub fn draw(&mut self, player: &PlayerId) -> Result<(), UnknownPlayer> {
        self.player_mut(player)?;
        if self.state.deck.is_empty() {
            return Ok(());
        }
        let card = self.state.deck.remove(0);
        self.player_mut(player)?.hand.push(card);
        Ok(())
    }

    /// Moves one card by id from the donor's hand to the end of the
    /// recipient's. Nothing happens when the donor does not hold it;
    /// the rest of the donor's hand keeps its order.
    pub fn give(
        &mut self,
        donor: &PlayerId,
        recipient: &PlayerId,
        card: CardId,
    ) -> Result<(), UnknownPlayer> {
        self.player_mut(recipient)?;
        let hand = &mut self.player_mut(donor)?.hand;
        let Some(position) = hand.iter().position(|c| c.id == card) else {
            return Ok(());
        };
        let card = hand.remove(position);
        self.player_mut(recipient)?.hand.push(card);
        Ok(())
    }

    /// Removes three same-valued cards from the hand and records them
    /// as one scored set, in the order the ids were given. Anything
    /// short of three distinct ids, all in hand, all one value, leaves
    /// the state untouched.
    pub fn score(&mut self, player: &PlayerId, card_ids: &[CardId]) -> Result<(), UnknownPlayer> {
        let hand = &self.player_mut(player)?.hand;
        if card_ids.len() != 3 {
            return Ok(());
        }
        if card_ids[0] == card_ids[1] || card_ids[0] == card_ids[2] || card_ids[1] == card_ids[2] {
            return Ok(());
        }
        let Some(cards) = card_ids
            .iter()
            .map(|id| hand.iter().find(|c| c.id == *id).cloned())
            .collect::<Option<Vec<Card>>>()
        else {
            return Ok(());
        };
        if !cards.iter().all(|c| c.value == cards[0].value) {
            return Ok(());
        }
        let player = self.player_mut(player)?;
        player.hand.retain(|c| !card_ids.contains(&c.id));
        player.sets.push(cards);
        Ok(())
    }

    /// Hands the turn to the next player in lexicographic id order,
    /// wrapping past the last. With no players the turn stays unset.
    pub fn end_turn(&mut self) {
        let players: Vec<&PlayerId> = self.state.players.keys().collect();
        let next = match players
            .iter()
            .position(|id| Some(*id) == self.state.current_turn.as_ref())
        {
            Some(i) => (i + 1) % players.len(),
            None => 0,
        };
        self.state.current_turn = players.get(next).map(|id| (*id).clone());
    }

    /// Deletes a player, returning all their cards (hand and sets,
    /// un-revealed) to the bottom of the deck. A leaving turn-holder
    /// passes the turn first, while their id still counts for order.
    /// Unknown ids are ignored.
    pub fn remove_player(&mut self, player: &PlayerId) {
        if !self.state.players.contains_key(player) {
            return;
        }
        if self.state.current_turn.as_ref() == Some(player) {
            self.end_turn();
        }
        let Some(mut gone) = self.state.players.remove(player) else {
            return;
        };
        let recovered = gone
            .sets
            .drain(..)
            .flatten()
            .chain(gone.hand.drain(..))
            .map(|mut card| {
                card.revealed = false;
                card
            });
        self.state.deck.extend(recovered);
        // the sole player passing to themselves then leaving would
        // otherwise leave the turn pointing at nobody
        if self
            .state
            .current_turn
            .as_ref()
            .is_some_and(|turn| !self.state.players.contains_key(turn))
        {
            self.state.current_turn = None;
        }
    }

    /// Toggles the visibility flag on the first hand card with the
    /// given id, wherever it sits. Unknown ids are ignored.
    pub fn show_or_hide_card(&mut self, card: CardId) {
        if let Some(card) = self
            .state
            .players
            .values_mut()
            .flat_map(|p| p.hand.iter_mut())
            .find(|c| c.id == card)
        {
            card.revealed = !card.revealed;
        }
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut PlayerState, UnknownPlayer> {
        self.state
            .players
            .get_mut(id)
            .ok_or_else(|| UnknownPlayer(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_deck() -> Vec<Card> {
        vec![
            Card::new(1, "apple"),
            Card::new(2, "banana"),
            Card::new(3, "cherry"),
        ]
    }

    #[test]
    fn new_game_has_empty_state() {
        let game = Game::new();
        assert!(game.state().deck.is_empty());
        assert!(game.state().players.is_empty());
        assert!(game.state().current_turn.is_none());
    }

    #[test]
    fn set_deck_replaces_the_deck() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        assert_eq!(game.state().deck, fruit_deck());
    }

    #[test]
    fn added_players_start_empty() {
        let mut game = Game::new();
        let a = game.add_player();
        let b = game.add_player();
        assert_eq!(a, "player-0");
        assert_eq!(b, "player-1");
        assert_eq!(game.state().players[&a], PlayerState::default());
        assert_eq!(game.state().players[&b], PlayerState::default());
    }

    #[test]
    fn first_player_takes_the_turn() {
        let mut game = Game::new();
        let a = game.add_player();
        assert_eq!(game.state().current_turn, Some(a));
        let _ = game.add_player();
        assert_eq!(game.state().current_turn, Some("player-0".to_string()));
    }

    #[test]
    fn freed_suffixes_are_never_reminted() {
        let mut game = Game::new();
        let a = game.add_player();
        let _ = game.add_player();
        game.remove_player(&a);
        assert_eq!(game.add_player(), "player-2");
    }

    #[test]
    fn draw_moves_the_top_card() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        let a = game.add_player();
        game.draw(&a).unwrap();
        assert_eq!(game.state().deck, fruit_deck()[1..].to_vec());
        assert_eq!(game.state().players[&a].hand, vec![Card::new(1, "apple")]);
        game.draw(&a).unwrap();
        assert_eq!(game.state().deck, vec![Card::new(3, "cherry")]);
        assert_eq!(
            game.state().players[&a].hand,
            vec![Card::new(1, "apple"), Card::new(2, "banana")]
        );
    }

    #[test]
    fn draw_from_empty_deck_changes_nothing() {
        let mut game = Game::new();
        let a = game.add_player();
        game.draw(&a).unwrap();
        assert!(game.state().deck.is_empty());
        assert!(game.state().players[&a].hand.is_empty());
    }

    #[test]
    fn draw_for_unknown_player_errors() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        let missing = "player-9".to_string();
        assert_eq!(game.draw(&missing), Err(UnknownPlayer(missing)));
        assert_eq!(game.state().deck.len(), 3);
    }

    #[test]
    fn give_transfers_one_card() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        let a = game.add_player();
        let b = game.add_player();
        game.draw(&a).unwrap();
        game.draw(&a).unwrap();
        game.draw(&b).unwrap();
        game.give(&a, &b, 1).unwrap();
        assert_eq!(game.state().players[&a].hand, vec![Card::new(2, "banana")]);
        assert_eq!(
            game.state().players[&b].hand,
            vec![Card::new(3, "cherry"), Card::new(1, "apple")]
        );
    }

    #[test]
    fn give_without_the_card_changes_nothing() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        let a = game.add_player();
        let b = game.add_player();
        game.draw(&a).unwrap();
        game.give(&a, &b, 42).unwrap();
        assert_eq!(game.state().players[&a].hand, vec![Card::new(1, "apple")]);
        assert!(game.state().players[&b].hand.is_empty());
    }

    #[test]
    fn give_to_unknown_player_errors() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        let a = game.add_player();
        game.draw(&a).unwrap();
        let missing = "player-9".to_string();
        assert!(game.give(&a, &missing, 1).is_err());
        assert!(game.give(&missing, &a, 1).is_err());
        assert_eq!(game.state().players[&a].hand.len(), 1);
    }

    fn scoring_game() -> (Game, PlayerId) {
        let mut game = Game::new();
        game.set_deck(vec![
            Card::new(1, "apple"),
            Card::new(2, "apple"),
            Card::new(3, "apple"),
            Card::new(4, "banana"),
        ]);
        let a = game.add_player();
        for _ in 0..4 {
            game.draw(&a).unwrap();
        }
        (game, a)
    }

    #[test]
    fn score_moves_a_set_out_of_the_hand() {
        let (mut game, a) = scoring_game();
        game.score(&a, &[1, 2, 3]).unwrap();
        assert_eq!(game.state().players[&a].hand, vec![Card::new(4, "banana")]);
        assert_eq!(
            game.state().players[&a].sets,
            vec![vec![
                Card::new(1, "apple"),
                Card::new(2, "apple"),
                Card::new(3, "apple"),
            ]]
        );
    }

    #[test]
    fn score_rejects_wrong_set_size() {
        let (mut game, a) = scoring_game();
        let before = game.state().clone();
        game.score(&a, &[1, 2]).unwrap();
        game.score(&a, &[1, 2, 3, 4]).unwrap();
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn score_rejects_mismatched_values() {
        let (mut game, a) = scoring_game();
        let before = game.state().clone();
        game.score(&a, &[2, 3, 4]).unwrap();
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn score_rejects_cards_not_in_hand() {
        let (mut game, a) = scoring_game();
        let before = game.state().clone();
        game.score(&a, &[1, 2, 99]).unwrap();
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn score_rejects_duplicate_ids() {
        let (mut game, a) = scoring_game();
        let before = game.state().clone();
        game.score(&a, &[1, 1, 1]).unwrap();
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn score_for_unknown_player_errors() {
        let (mut game, _) = scoring_game();
        assert!(game.score(&"player-9".to_string(), &[1, 2, 3]).is_err());
    }

    #[test]
    fn end_turn_cycles_in_id_order_and_wraps() {
        let mut game = Game::new();
        let a = game.add_player();
        let b = game.add_player();
        let c = game.add_player();
        assert_eq!(game.state().current_turn, Some(a.clone()));
        game.end_turn();
        assert_eq!(game.state().current_turn, Some(b));
        game.end_turn();
        assert_eq!(game.state().current_turn, Some(c));
        game.end_turn();
        assert_eq!(game.state().current_turn, Some(a));
    }

    #[test]
    fn end_turn_with_no_players_stays_unset() {
        let mut game = Game::new();
        game.end_turn();
        assert!(game.state().current_turn.is_none());
    }

    #[test]
    fn rename_sets_the_display_name() {
        let mut game = Game::new();
        let a = game.add_player();
        game.rename_player(&a, "alex").unwrap();
        assert_eq!(game.state().players[&a].name.as_deref(), Some("alex"));
        assert!(game.rename_player(&"player-9".to_string(), "x").is_err());
    }

    #[test]
    fn remove_player_returns_all_cards_to_the_deck() {
        let (mut game, a) = scoring_game();
        let b = game.add_player();
        game.score(&a, &[1, 2, 3]).unwrap();
        game.show_or_hide_card(4);
        game.remove_player(&a);
        assert!(!game.state().players.contains_key(&a));
        let deck: Vec<CardId> = game.state().deck.iter().map(|c| c.id).collect();
        assert_eq!(deck, vec![1, 2, 3, 4]);
        assert!(game.state().deck.iter().all(|c| !c.revealed));
        assert_eq!(game.state().players[&b], PlayerState::default());
    }

    #[test]
    fn remove_turn_holder_passes_the_turn_first() {
        let mut game = Game::new();
        let a = game.add_player();
        let b = game.add_player();
        game.remove_player(&a);
        assert_eq!(game.state().current_turn, Some(b));
    }

    #[test]
    fn remove_last_player_clears_the_turn() {
        let mut game = Game::new();
        let a = game.add_player();
        game.remove_player(&a);
        assert!(game.state().current_turn.is_none());
        assert!(game.state().players.is_empty());
    }

    #[test]
    fn remove_unknown_player_changes_nothing() {
        let mut game = Game::new();
        let a = game.add_player();
        let before = game.state().clone();
        game.remove_player(&"player-9".to_string());
        assert_eq!(game.state(), &before);
        assert!(game.state().players.contains_key(&a));
    }

    #[test]
    fn remove_player_conserves_card_ids() {
        let (mut game, a) = scoring_game();
        game.score(&a, &[1, 2, 3]).unwrap();
        let mut before = game.state().card_ids();
        before.sort();
        game.remove_player(&a);
        let mut after = game.state().card_ids();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn show_or_hide_toggles_a_hand_card() {
        let mut game = Game::new();
        game.set_deck(fruit_deck());
        let a = game.add_player();
        game.draw(&a).unwrap();
        game.show_or_hide_card(1);
        assert!(game.state().players[&a].hand[0].revealed);
        game.show_or_hide_card(1);
        assert!(!game.state().players[&a].hand[0].revealed);
        game.show_or_hide_card(42);
        assert!(!game.state().players[&a].hand[0].revealed);
    }

    #[test]
    fn snapshot_round_trip_rehydrates_the_game() {
        let (mut game, a) = scoring_game();
        game.score(&a, &[1, 2, 3]).unwrap();
        let json = serde_json::to_string(game.state()).unwrap();
        let snapshot: GameState = serde_json::from_str(&json).unwrap();
        let restored = Game::from_snapshot(snapshot);
        assert_eq!(restored.state(), game.state());
    }

    #[test]
    fn rehydration_resumes_the_id_counter() {
        let mut game = Game::new();
        let _ = game.add_player();
        let _ = game.add_player();
        let _ = game.add_player();
        let mut restored = Game::from_snapshot(game.state().clone());
        assert_eq!(restored.add_player(), "player-3");
    }

    #[test]
    fn rehydration_defaults_the_turn_to_the_first_player() {
        let mut game = Game::new();
        let _ = game.add_player();
        let _ = game.add_player();
        let mut snapshot = game.state().clone();
        snapshot.current_turn = None;
        let restored = Game::from_snapshot(snapshot);
        assert_eq!(restored.state().current_turn, Some("player-0".to_string()));
    }
}
