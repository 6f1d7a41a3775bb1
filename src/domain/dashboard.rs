// Dashboard snapshot domain model
use super::alert::Alert;
use super::reading::Reading;
use super::telemetry::{HistoryPoint, Kpi};
use super::turbine::{AnimationParams, TurbineId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub power: Vec<HistoryPoint>,
    pub noise: Vec<HistoryPoint>,
    pub wind_speed: Vec<HistoryPoint>,
}

/// Everything a view needs, copied out of the store under a single lock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub selected_turbine: TurbineId,
    pub current: Option<Reading>,
    pub history: HistorySnapshot,
    pub kpis: Vec<Kpi>,
    pub alerts: Vec<Alert>,
    pub animation: AnimationParams,
    pub animation_running: bool,
}
