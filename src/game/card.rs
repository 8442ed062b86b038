use crate::CardId;
use serde::Deserialize;
use serde::Serialize;

/// A single card in play.
///
/// The id is unique within one game and never reused; it is assigned
/// once at deck build time and follows the card through every hand,
/// set, and return to the deck. Two cards match when their `value`s
/// are equal. `revealed` is a table-wide visibility toggle, not a
/// secrecy guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub revealed: bool,
}

impl Card {
    pub fn new(id: CardId, value: &str) -> Self {
        Self {
            id,
            value: value.to_string(),
            image: None,
            revealed: false,
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}({})", self.id, self.value)
    }
}

/// One entry of a deck template: the blueprint a deck is built from.
/// Each entry becomes six identical cards with distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CardTemplate {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn serializes_without_optional_fields() {
        let card = Card::new(7, "apple");
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "value": "apple" }));
    }
    #[test]
    fn serializes_revealed_when_set() {
        let mut card = Card::new(7, "apple");
        card.revealed = true;
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "value": "apple", "revealed": true })
        );
    }
    #[test]
    fn deserializes_with_defaults() {
        let card: Card = serde_json::from_str(r#"{ "id": 3, "value": "wolf" }"#).unwrap();
        assert_eq!(card, Card::new(3, "wolf"));
        assert!(!card.revealed);
        assert!(card.image.is_none());
    }
}
