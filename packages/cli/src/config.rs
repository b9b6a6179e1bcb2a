use ednotes_renderer::{HtmlOptions, BUILTIN_DEMOS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "ednotes.config.json";

/// Ednotes configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Demo names mounted for client-side hydration
    #[serde(default = "default_demos")]
    pub demos: Vec<String>,

    /// Image resource overrides applied after load (id → src)
    #[serde(default)]
    pub resources: IndexMap<String, String>,

    /// Pretty print HTML
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Indentation string
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Page title
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_demos() -> Vec<String> {
    BUILTIN_DEMOS.iter().map(|name| name.to_string()).collect()
}

fn default_pretty() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_title() -> String {
    "Ednotes".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn html_options(&self) -> HtmlOptions {
        HtmlOptions {
            pretty: self.pretty,
            indent: self.indent.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demos: default_demos(),
            resources: IndexMap::new(),
            pretty: default_pretty(),
            indent: default_indent(),
            title: default_title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "demos": ["bubbleSort"],
            "resources": { "hero": "/img/hero.png", "cat": "/img/cat.png" },
            "pretty": false,
            "title": "Sorting"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.demos, vec!["bubbleSort"]);
        assert_eq!(
            config.resources.keys().collect::<Vec<_>>(),
            vec!["hero", "cat"]
        );
        assert!(!config.pretty);
        assert_eq!(config.indent, "  ");
        assert_eq!(config.title, "Sorting");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.demos.len(), 4);
        assert!(config.resources.is_empty());
        assert!(config.pretty);
        assert_eq!(config.title, "Ednotes");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"indent": "\t"}"#).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.indent, "\t");
        assert_eq!(config.html_options().indent, "\t");

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
