use serde::Deserialize;

/// Default Groq OpenAI-compatible API base URL.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Supports ${ENV_VAR} substitution
    pub api_key: String,
    /// Override for proxies or self-hosted gateways
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_provider() -> String {
    "groq".to_string()
}

impl LlmConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_GROQ_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a TOML document, expanding variables like ${GROQ_API_KEY}.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::env(content)?;
        let config: Config = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from `GROQ_API_KEY` when no file is present.
    ///
    /// A missing variable yields an empty key, which the adapter
    /// reports as missing input rather than failing here.
    pub fn from_env() -> Self {
        Config {
            llm: LlmConfig {
                provider: default_provider(),
                api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
                base_url: None,
                timeout_secs: None,
            },
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.llm.provider != "groq" {
            anyhow::bail!(
                "Unsupported LLM provider: '{}'. Supported: 'groq'.",
                self.llm.provider
            );
        }
        Ok(())
    }
}
