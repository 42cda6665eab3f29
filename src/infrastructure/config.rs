use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub trace: TraceSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default)]
    pub defaults: DefaultSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://disease.sh/v3/covid-19".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TraceSettings {
    pub file: String,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            file: "server/logs/http_trace.jsonl".to_string(),
        }
    }
}

/// Leaving `url` unset disables notifications
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WebhookSettings {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DefaultSettings {
    pub last_days: String,
    pub top_n: usize,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            last_days: "30".to_string(),
            top_n: 5,
        }
    }
}

/// Load `config/app.toml` if present, then `DASHBOARD__SECTION__KEY` overrides
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = from_toml("");

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.provider.base_url, "https://disease.sh/v3/covid-19");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.trace.file, "server/logs/http_trace.jsonl");
        assert_eq!(config.webhook.url, None);
        assert_eq!(config.defaults.last_days, "30");
        assert_eq!(config.defaults.top_n, 5);
    }

    #[test]
    fn test_partial_sections() {
        let config = from_toml(
            r#"
            [provider]
            timeout_secs = 3

            [webhook]
            url = "https://hooks.example.com/covid"

            [defaults]
            top_n = 10
            "#,
        );

        assert_eq!(config.provider.base_url, "https://disease.sh/v3/covid-19");
        assert_eq!(config.provider.timeout_secs, 3);
        assert_eq!(config.webhook.url.as_deref(), Some("https://hooks.example.com/covid"));
        assert_eq!(config.defaults.top_n, 10);
        assert_eq!(config.defaults.last_days, "30");
    }
}
