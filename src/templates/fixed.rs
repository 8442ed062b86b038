use super::DeckTemplateSource;
use super::NamedTemplate;
use crate::game::CardTemplate;

/// Serves a fixed, in-memory list of templates.
pub struct FixedTemplateSource {
    templates: Vec<NamedTemplate>,
}

impl FixedTemplateSource {
    pub fn new(templates: Vec<NamedTemplate>) -> Self {
        Self { templates }
    }
    /// The demo deck the server falls back to when nothing is
    /// configured.
    pub fn demo() -> Self {
        Self::new(vec![NamedTemplate {
            name: "Demo".to_string(),
            template: ["🍎", "🐺", "🥔", "🥄", "🔪", "🦅"]
                .iter()
                .map(|value| CardTemplate::new(value))
                .collect(),
        }])
    }
}

#[async_trait::async_trait]
impl DeckTemplateSource for FixedTemplateSource {
    async fn get_templates(&self) -> anyhow::Result<Vec<NamedTemplate>> {
        Ok(self.templates.clone())
    }
}
