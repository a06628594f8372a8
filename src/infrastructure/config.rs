use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize, Clone)]
pub struct InspectorConfig {
    pub backend: BackendSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: SocketAddr,
}

/// Defaults, then `config/inspector.*` if present, then `INSPECTOR__*` environment variables.
pub fn load_inspector_config() -> anyhow::Result<InspectorConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/inspector").required(false))
        .add_source(config::Environment::with_prefix("INSPECTOR").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn builder_with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("backend.base_url", DEFAULT_BACKEND_URL)?
        .set_default("backend.timeout_secs", 10)?
        .set_default("server.listen_addr", "127.0.0.1:8080")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config: InspectorConfig = builder_with_defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.timeout(), Duration::from_secs(10));
        assert_eq!(config.server.listen_addr.port(), 8080);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [backend]
            base_url = "https://status.internal:9000"
        "#;
        let config: InspectorConfig = builder_with_defaults()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backend.base_url, "https://status.internal:9000");
        assert_eq!(config.backend.timeout_secs, 10);
    }
}
