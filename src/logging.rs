use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            loki_enabled: lookup("LOKI_ENABLED")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
            loki_url: lookup("LOKI_URL"),
            service_name: lookup("SERVICE_NAME")
                .unwrap_or_else(|| "portfolio-tracker".to_string()),
            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
            log_level: lookup("RUST_LOG")
                .unwrap_or_else(|| "info,sqlx=warn,tower_http=debug".to_string()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.loki_enabled && self.loki_url.is_none() {
            bail!("LOKI_ENABLED is true but LOKI_URL is not set");
        }
        Ok(())
    }
}

pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    config.validate()?;

    #[cfg(feature = "loki")]
    {
        if config.loki_enabled {
            if let Some(loki_url) = config.loki_url.clone() {
                return init_with_loki(config, &loki_url);
            }
        }
    }

    init_console_only(config)
}

fn init_console_only(config: LoggingConfig) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("Console logging initialized ({})", config.log_level);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: LoggingConfig, loki_url: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(loki_url).with_context(|| format!("invalid LOKI_URL {}", loki_url))?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;

    // Ships buffered events to Loki for the life of the process.
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("Loki logging initialized at {}", loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_lookup(|_| None);
        assert!(!config.loki_enabled);
        assert_eq!(config.service_name, "portfolio-tracker");
        assert_eq!(config.environment, "development");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_loki_requires_url() {
        let config = LoggingConfig::from_lookup(|key| match key {
            "LOKI_ENABLED" => Some("true".to_string()),
            _ => None,
        });
        assert!(config.loki_enabled);
        assert!(config.validate().is_err());
    }
}
