use super::card::Card;
use super::card::CardTemplate;
use crate::CardId;

/// How many copies of each template entry go into a fresh deck.
pub const COPIES_PER_VALUE: usize = 6;

/// Builds a shuffled deck from a template.
///
/// Each entry yields [`COPIES_PER_VALUE`] cards; ids are assigned
/// sequentially from 1 in template order before the shuffle, so a
/// template of k entries always produces ids `1..=6k`.
pub fn build(template: &[CardTemplate]) -> Vec<Card> {
    let stacked = template
        .iter()
        .flat_map(|entry| std::iter::repeat_n(entry, COPIES_PER_VALUE))
        .enumerate()
        .map(|(index, entry)| Card {
            id: index as CardId + 1,
            value: entry.value.clone(),
            image: entry.image.clone(),
            revealed: false,
        })
        .collect();
    shuffle(stacked)
}

/// Uniform shuffle: pick one remaining card at random, remove it,
/// repeat. Every ordering of the input is equally likely.
fn shuffle(mut cards: Vec<Card>) -> Vec<Card> {
    let mut shuffled = Vec::with_capacity(cards.len());
    while !cards.is_empty() {
        let choice = rand::random_range(0..cards.len());
        shuffled.push(cards.remove(choice));
    }
    shuffled
}
