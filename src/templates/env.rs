use super::DeckTemplateSource;
use super::NamedTemplate;

/// Reads deck templates from a JSON-valued environment variable.
pub struct EnvVarTemplateSource {
    variable: String,
}

impl EnvVarTemplateSource {
    pub fn new(variable: &str) -> Self {
        Self {
            variable: variable.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DeckTemplateSource for EnvVarTemplateSource {
    async fn get_templates(&self) -> anyhow::Result<Vec<NamedTemplate>> {
        let serialized = std::env::var(&self.variable).map_err(|_| {
            anyhow::anyhow!("no templates found in environment variable {}", self.variable)
        })?;
        Ok(serde_json::from_str(&serialized)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_templates_from_the_environment() {
        let json = r#"[{ "name": "Fruit", "template": [{ "value": "apple" }] }]"#;
        unsafe { std::env::set_var("GOFISH_TEST_TEMPLATES", json) };
        let source = EnvVarTemplateSource::new("GOFISH_TEST_TEMPLATES");
        let templates = source.get_templates().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Fruit");
        assert_eq!(templates[0].template[0].value, "apple");
    }

    #[tokio::test]
    async fn missing_variable_is_an_error() {
        let source = EnvVarTemplateSource::new("GOFISH_TEST_TEMPLATES_UNSET");
        assert!(source.get_templates().await.is_err());
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        unsafe { std::env::set_var("GOFISH_TEST_TEMPLATES_BAD", "not json") };
        let source = EnvVarTemplateSource::new("GOFISH_TEST_TEMPLATES_BAD");
        assert!(source.get_templates().await.is_err());
    }
}
