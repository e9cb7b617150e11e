use std::time::Duration;

use serde::{Deserialize, Serialize};

use cluster_system::ext::DurationExt;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Time budget shared by every nested call of one control request.
    pub request_timeout_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
        }
    }
}

impl ControlConfig {
    pub fn new(config: &config::Config) -> anyhow::Result<Self> {
        let config: Self = config.get("cluster.control")?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_ms.millis()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::ControlConfig;

    #[test]
    fn default_request_timeout_is_30s() {
        assert_eq!(ControlConfig::default().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config() -> anyhow::Result<()> {
        let toml = r#"
            [cluster.control]
            request_timeout_ms = 5000
        "#;
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let config = ControlConfig::new(&config)?;
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() -> anyhow::Result<()> {
        let config: ControlConfig = toml::from_str("")?;
        assert_eq!(config.request_timeout_ms, 30_000);
        Ok(())
    }
}
