use crate::game::GameState;
use serde::Deserialize;
use serde::Serialize;

/// Messages pushed from server to channel subscribers.
///
/// There is exactly one today: the unconditional full-snapshot
/// broadcast that follows every successful mutation. No deltas, no
/// per-client redaction; hiding opponents' hands is a rendering
/// convention, not a protocol guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    UpdateGameState { state: GameState },
}

impl ServerMessage {
    pub fn update(state: GameState) -> Self {
        Self::UpdateGameState { state }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}
