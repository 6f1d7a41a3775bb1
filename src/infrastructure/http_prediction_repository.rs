// HTTP prediction backend repository implementation
use crate::application::prediction_repository::PredictionRepository;
use crate::domain::prediction::{HealthScores, MaintenanceSchedule, Predictions, SystemStatus};
use crate::domain::turbine::TurbineId;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpPredictionRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPredictionRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, path: &str, turbine: Option<&TurbineId>) -> String {
        match turbine {
            Some(turbine) => format!(
                "{}{}?turbine={}",
                self.base_url,
                path,
                urlencoding::encode(turbine.as_str())
            ),
            None => format!("{}{}", self.base_url, path),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        turbine: Option<&TurbineId>,
    ) -> Result<T> {
        let url = self.build_url(path, turbine);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Prediction backend returned {} for {}: {}", status, path, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }
}

#[async_trait]
impl PredictionRepository for HttpPredictionRepository {
    async fn fetch_predictions(&self, turbine: Option<&TurbineId>) -> Result<Predictions> {
        self.get_json("/api/predict", turbine).await
    }

    async fn fetch_health_scores(&self, turbine: Option<&TurbineId>) -> Result<HealthScores> {
        self.get_json("/api/health-scores", turbine).await
    }

    async fn fetch_maintenance_schedule(
        &self,
        turbine: Option<&TurbineId>,
    ) -> Result<MaintenanceSchedule> {
        self.get_json("/api/maintenance-schedule", turbine).await
    }

    async fn fetch_system_status(&self) -> Result<SystemStatus> {
        self.get_json("/api/system-status", None).await
    }
}
