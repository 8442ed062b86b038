pub mod env;
pub use env::*;

pub mod fixed;
pub use fixed::*;

use crate::game::CardTemplate;
use serde::Deserialize;
use serde::Serialize;

/// A deck template offered to game creators, under a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTemplate {
    pub name: String,
    pub template: Vec<CardTemplate>,
}

/// Acquisition port for deck templates. The hosting layer serves
/// whatever the configured source returns; where templates actually
/// come from is not its concern.
#[async_trait::async_trait]
pub trait DeckTemplateSource: Send + Sync {
    async fn get_templates(&self) -> anyhow::Result<Vec<NamedTemplate>>;
}
