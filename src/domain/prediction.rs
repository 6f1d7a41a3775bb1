// Prediction backend payloads and their fixed fallbacks
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentStatus {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPrediction {
    pub status: ComponentStatus,
    pub message: String,
    /// Percentage as sent by the backend, e.g. "92%".
    pub confidence: String,
    pub based_on: String,
}

pub type Predictions = BTreeMap<String, ComponentPrediction>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTrend {
    Stable,
    Improving,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: f64,
    pub trend: HealthTrend,
}

pub type HealthScores = BTreeMap<String, HealthScore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenancePriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceStatus {
    Due,
    Scheduled,
    Completed,
    Monitoring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceItem {
    pub component: String,
    pub message: String,
    pub last_service: String,
    pub next_service: String,
    pub duration: String,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rul_days: Option<u32>,
}

pub type MaintenanceSchedule = Vec<MaintenanceItem>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub turbine_status: String,
    pub connection_status: String,
    pub last_update: Option<String>,
    pub uptime: String,
    /// kWh generated today
    pub total_power_generated: f64,
    /// percent
    pub efficiency: f64,
}

/// Where a displayed prediction value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Fresh,
    Stale,
    Fallback,
}

fn prediction(confidence: &str, based_on: &str, message: &str) -> ComponentPrediction {
    ComponentPrediction {
        status: ComponentStatus::Normal,
        message: message.to_string(),
        confidence: confidence.to_string(),
        based_on: based_on.to_string(),
    }
}

pub fn fallback_predictions() -> Predictions {
    [
        (
            "Gearbox",
            prediction(
                "85%",
                "30 days of logs",
                "Gearbox operating within normal parameters.",
            ),
        ),
        (
            "Bearings",
            prediction(
                "88%",
                "6 weeks of data",
                "Bearing vibration levels are stable and within range.",
            ),
        ),
        (
            "Generator",
            prediction(
                "92%",
                "2 months of telemetry",
                "Generator operating efficiently with stable output.",
            ),
        ),
        (
            "Rotors",
            prediction(
                "87%",
                "3 months of sensor data",
                "Rotor balance is optimal for current conditions.",
            ),
        ),
        (
            "Blades",
            prediction(
                "90%",
                "60 days of telemetry",
                "Blade aerodynamics are stable and efficient.",
            ),
        ),
        (
            "Temperature Sensors",
            prediction(
                "89%",
                "90 days of data",
                "Temperature sensors operating within calibration range.",
            ),
        ),
    ]
    .into_iter()
    .map(|(name, p)| (name.to_string(), p))
    .collect()
}

pub fn fallback_health_scores() -> HealthScores {
    [
        ("Main Bearing", 85.0),
        ("Gearbox", 80.0),
        ("Generator", 87.0),
        ("Power Electronics", 83.0),
        ("Blade System", 82.0),
        ("Control System", 90.0),
    ]
    .into_iter()
    .map(|(name, score)| {
        (
            name.to_string(),
            HealthScore {
                score,
                trend: HealthTrend::Stable,
            },
        )
    })
    .collect()
}

pub fn fallback_maintenance_schedule() -> MaintenanceSchedule {
    use MaintenancePriority::*;
    use MaintenanceStatus::*;

    let item = |component: &str,
                message: &str,
                last: &str,
                next: &str,
                duration: &str,
                priority,
                status| MaintenanceItem {
        component: component.to_string(),
        message: message.to_string(),
        last_service: last.to_string(),
        next_service: next.to_string(),
        duration: duration.to_string(),
        priority,
        status,
        rul_days: None,
    };

    vec![
        item(
            "Gearbox Oil",
            "Oil change and filter replacement required",
            "2024-01-15",
            "2024-03-15",
            "4 hours",
            High,
            Due,
        ),
        item(
            "Blade Inspection",
            "Visual inspection and surface treatment",
            "2023-12-10",
            "2024-06-10",
            "6 hours",
            Medium,
            Scheduled,
        ),
        item(
            "Generator Bearing",
            "Bearing lubrication and alignment check",
            "2024-02-20",
            "2024-08-20",
            "3 hours",
            Low,
            Completed,
        ),
        item(
            "Control System",
            "Software update and sensor calibration",
            "2024-01-30",
            "2024-04-30",
            "2 hours",
            Medium,
            Monitoring,
        ),
    ]
}

pub fn fallback_system_status() -> SystemStatus {
    SystemStatus {
        turbine_status: "unknown".to_string(),
        connection_status: "disconnected".to_string(),
        last_update: None,
        uptime: "n/a".to_string(),
        total_power_generated: 0.0,
        efficiency: 0.0,
    }
}
