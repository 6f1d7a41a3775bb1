use crate::application::prediction_service::PollSettings;
use crate::domain::turbine::TurbineId;
use anyhow::{ensure, Context};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub feed: FeedSettings,
    pub backend: BackendSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedSettings {
    pub enabled: bool,
    pub interval_ms: u64,
    pub alert_probability: f64,
    pub initial_turbine: String,
    pub turbines: Vec<String>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 5000,
            alert_probability: 0.1,
            initial_turbine: "Turbine-1".to_string(),
            turbines: vec![
                "Turbine-1".to_string(),
                "Turbine-2".to_string(),
                "Turbine-3".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_ms: u64,
    pub predict_interval_ms: u64,
    pub health_interval_ms: u64,
    pub maintenance_interval_ms: u64,
    pub status_interval_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 2000,
            predict_interval_ms: 3000,
            health_interval_ms: 5000,
            maintenance_interval_ms: 5000,
            status_interval_ms: 3000,
        }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid server.bind_addr `{}`", self.server.bind_addr))
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed.interval_ms)
    }

    pub fn initial_turbine(&self) -> TurbineId {
        TurbineId::new(self.feed.initial_turbine.clone())
    }

    pub fn turbines(&self) -> Vec<TurbineId> {
        self.feed.turbines.iter().cloned().map(TurbineId::new).collect()
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            timeout: Duration::from_millis(self.backend.timeout_ms),
            predictions: Duration::from_millis(self.backend.predict_interval_ms),
            health_scores: Duration::from_millis(self.backend.health_interval_ms),
            maintenance: Duration::from_millis(self.backend.maintenance_interval_ms),
            system_status: Duration::from_millis(self.backend.status_interval_ms),
        }
    }

    fn validate(self) -> anyhow::Result<Self> {
        self.bind_addr()?;
        ensure!(self.feed.interval_ms > 0, "feed.interval_ms must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.feed.alert_probability),
            "feed.alert_probability must be within 0..=1, got {}",
            self.feed.alert_probability
        );
        reqwest::Url::parse(&self.backend.base_url)
            .with_context(|| format!("Invalid backend.base_url `{}`", self.backend.base_url))?;
        for (key, value) in [
            ("backend.timeout_ms", self.backend.timeout_ms),
            ("backend.predict_interval_ms", self.backend.predict_interval_ms),
            ("backend.health_interval_ms", self.backend.health_interval_ms),
            ("backend.maintenance_interval_ms", self.backend.maintenance_interval_ms),
            ("backend.status_interval_ms", self.backend.status_interval_ms),
        ] {
            ensure!(value > 0, "{} must be positive", key);
        }
        Ok(self)
    }
}

/// Load `config/turbine.toml` (optional) overlaid with `TURBINE__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/turbine").required(false))
        .add_source(
            config::Environment::with_prefix("TURBINE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: AppConfig = settings.try_deserialize()?;
    cfg.validate()
}

#[cfg(test)]
fn parse_app_config(toml: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let cfg: AppConfig = settings.try_deserialize()?;
    cfg.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = parse_app_config("").unwrap();
        assert_eq!(cfg.bind_addr().unwrap().port(), 8080);
        assert_eq!(cfg.feed_interval(), Duration::from_secs(5));
        assert_eq!(cfg.feed.alert_probability, 0.1);
        assert_eq!(cfg.backend.base_url, "http://localhost:8000");
        assert_eq!(cfg.initial_turbine().as_str(), "Turbine-1");
        assert_eq!(cfg.turbines().len(), 3);

        let poll = cfg.poll_settings();
        assert_eq!(poll.timeout, Duration::from_millis(2000));
        assert_eq!(poll.predictions, Duration::from_millis(3000));
        assert_eq!(poll.maintenance, Duration::from_millis(5000));
    }

    #[test]
    fn test_partial_override() {
        let cfg = parse_app_config(
            r#"
            [feed]
            interval_ms = 1000
            initial_turbine = "Turbine-2"

            [backend]
            base_url = "http://predictor:9000"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.feed_interval(), Duration::from_secs(1));
        assert_eq!(cfg.initial_turbine().as_str(), "Turbine-2");
        assert_eq!(cfg.feed.alert_probability, 0.1);
        assert_eq!(cfg.backend.base_url, "http://predictor:9000");
        assert_eq!(cfg.backend.timeout_ms, 2000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse_app_config("[feed]\nalert_probability = 1.5").is_err());
        assert!(parse_app_config("[feed]\ninterval_ms = 0").is_err());
        assert!(parse_app_config("[backend]\nbase_url = \"not a url\"").is_err());
        assert!(parse_app_config("[server]\nbind_addr = \"localhost\"").is_err());
    }
}
