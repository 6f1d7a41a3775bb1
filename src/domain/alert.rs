// Alert domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Error,
    Info,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [AlertKind::Warning, AlertKind::Error, AlertKind::Info];
}

/// Dashboard module an alert belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertModule {
    Noise,
    Power,
    Weather,
    Maintenance,
}

impl AlertModule {
    pub const ALL: [AlertModule; 4] = [
        AlertModule::Noise,
        AlertModule::Power,
        AlertModule::Weather,
        AlertModule::Maintenance,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub module: AlertModule,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        id: String,
        kind: AlertKind,
        message: String,
        module: AlertModule,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            message,
            module,
            timestamp,
        }
    }
}
