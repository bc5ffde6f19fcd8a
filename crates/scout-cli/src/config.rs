use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scout_agent::ResearchConfig;

/// Host configuration: endpoints, credentials, and per-role models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reasoner: ReasonerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub research: ResearchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasonerConfig {
    /// API key; the SCOUT_API_KEY env var takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,

    /// OpenAI-compatible base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model for decision turns.
    #[serde(default)]
    pub supervisor_model: Option<String>,

    /// Model for drafting, summarization, and editing.
    #[serde(default)]
    pub writer_model: Option<String>,

    /// Model for research planning (report mode).
    #[serde(default)]
    pub planner_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Serper API key; the SERPER_API_KEY env var takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("scout").join("config.toml"))
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("SCOUT_API_KEY") {
            self.reasoner.api_key = Some(key);
        }
        if let Some(url) = var("SCOUT_BASE_URL") {
            self.reasoner.base_url = Some(url);
        }
        if let Some(model) = var("SCOUT_MODEL") {
            self.reasoner.supervisor_model = Some(model.clone());
            self.reasoner.writer_model = Some(model.clone());
            self.reasoner.planner_model = Some(model);
        }
        if let Some(key) = var("SERPER_API_KEY") {
            self.search.api_key = Some(key);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.reasoner.api_key.is_none() {
            anyhow::bail!(
                "No reasoner API key configured. Set SCOUT_API_KEY or add to {}:\n\n\
                 [reasoner]\n\
                 api_key = \"sk-...\"\n\
                 base_url = \"https://api.openai.com/v1\"\n\
                 supervisor_model = \"gpt-4o\"\n",
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the config file".to_string())
            );
        }
        if self.search.api_key.is_none() {
            anyhow::bail!("No search API key configured. Set SERPER_API_KEY.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [reasoner]
            api_key = "sk-test"
            base_url = "https://gateway.test/v1"
            supervisor_model = "big-model"
            writer_model = "fast-model"

            [search]
            api_key = "serper-test"

            [research]
            max_interactions = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.reasoner.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.reasoner.writer_model.as_deref(), Some("fast-model"));
        assert!(config.reasoner.planner_model.is_none());
        assert_eq!(config.research.max_interactions, 5);
        // Unspecified research fields keep their defaults.
        assert_eq!(config.research.search_top_k, 10);
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config: Config = toml::from_str(
            r#"
            [reasoner]
            api_key = "from-file"
            "#,
        )
        .unwrap();

        config.apply_env_overrides(|name| match name {
            "SCOUT_API_KEY" => Some("from-env".to_string()),
            "SCOUT_MODEL" => Some("env-model".to_string()),
            _ => None,
        });

        assert_eq!(config.reasoner.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.reasoner.supervisor_model.as_deref(), Some("env-model"));
        assert_eq!(config.reasoner.writer_model.as_deref(), Some("env-model"));
    }

    #[test]
    fn test_validate_requires_keys() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }
}
