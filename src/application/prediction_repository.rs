// Repository trait for the external prediction backend
use crate::domain::prediction::{HealthScores, MaintenanceSchedule, Predictions, SystemStatus};
use crate::domain::turbine::TurbineId;
use async_trait::async_trait;

#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Component failure predictions, keyed by component name
    async fn fetch_predictions(&self, turbine: Option<&TurbineId>) -> anyhow::Result<Predictions>;

    /// Component health scores, keyed by component name
    async fn fetch_health_scores(
        &self,
        turbine: Option<&TurbineId>,
    ) -> anyhow::Result<HealthScores>;

    async fn fetch_maintenance_schedule(
        &self,
        turbine: Option<&TurbineId>,
    ) -> anyhow::Result<MaintenanceSchedule>;

    /// Fleet-wide status; not filtered by turbine
    async fn fetch_system_status(&self) -> anyhow::Result<SystemStatus>;
}
