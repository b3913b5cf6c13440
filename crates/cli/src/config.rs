//! Client configuration from built-in defaults and environment overrides.

pub const DEFAULT_MCP_URL: &str = "http://mcp-server:13744/mcp";
pub const DEFAULT_OLLAMA_URL: &str = "http://ollama:11434";
pub const DEFAULT_MODEL: &str = "qwen3:30b";

/// Settings for one client run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Streamable HTTP endpoint of the tool server.
    pub mcp_url: String,
    pub ollama_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on generated tokens per model turn.
    pub max_tokens: u32,
    /// Ask the model to expose its reasoning.
    pub reasoning: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mcp_url: DEFAULT_MCP_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            max_tokens: 4096,
            reasoning: true,
        }
    }
}

impl Config {
    /// Defaults, overridden by `MCP_SERVER_URL`, `OLLAMA_BASE_URL` and
    /// `OLLAMA_MODEL` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            mcp_url: var("MCP_SERVER_URL").unwrap_or(defaults.mcp_url),
            ollama_url: var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_url),
            model: var("OLLAMA_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.mcp_url, "http://mcp-server:13744/mcp");
        assert_eq!(config.ollama_url, "http://ollama:11434");
        assert_eq!(config.model, "qwen3:30b");
        assert_eq!(config.temperature, 0.8);
        assert_eq!(config.max_tokens, 4096);
        assert!(config.reasoning);
    }

    #[test]
    fn env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MCP_SERVER_URL", "http://localhost:13744/mcp"),
            ("OLLAMA_BASE_URL", "http://localhost:11434"),
            ("OLLAMA_MODEL", "llama3.2"),
        ]));
        assert_eq!(config.mcp_url, "http://localhost:13744/mcp");
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[("OLLAMA_MODEL", "  ")]));
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
