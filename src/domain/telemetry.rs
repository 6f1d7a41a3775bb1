// Telemetry derived-data domain models: history series and KPIs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Points retained per history series.
pub const HISTORY_CAPACITY: usize = 50;

/// Fixed KPI thresholds per monitored metric
pub mod thresholds {
    /// Power above this is normal (MW)
    pub const POWER_NORMAL_ABOVE: f64 = 2.0;
    /// Power above this (and not normal) is a warning; at or below is critical (MW)
    pub const POWER_WARNING_ABOVE: f64 = 1.0;

    /// Wind speed normal band, exclusive bounds (m/s)
    pub const WIND_SPEED_MIN: f64 = 3.0;
    pub const WIND_SPEED_MAX: f64 = 25.0;

    /// Rotor speed normal band, exclusive bounds (RPM)
    pub const ROTOR_RPM_MIN: f64 = 10.0;
    pub const ROTOR_RPM_MAX: f64 = 30.0;

    /// Noise below this is normal (dB)
    pub const NOISE_NORMAL_BELOW: f64 = 45.0;
    /// Noise below this (and not normal) is a warning; at or above is critical (dB)
    pub const NOISE_WARNING_BELOW: f64 = 50.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Power,
    WindSpeed,
    RotorSpeed,
    Noise,
}

impl Metric {
    /// Metrics with a rolling history series.
    pub const TRACKED: [Metric; 3] = [Metric::Power, Metric::Noise, Metric::WindSpeed];

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "power" => Some(Metric::Power),
            "wind-speed" | "wind" => Some(Metric::WindSpeed),
            "rotor-speed" | "rpm" => Some(Metric::RotorSpeed),
            "noise" => Some(Metric::Noise),
            _ => None,
        }
    }

    pub fn is_tracked(self) -> bool {
        Self::TRACKED.contains(&self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<f64>,
}

impl HistoryPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value,
            predicted: None,
        }
    }
}

/// Fixed-window FIFO of history points. The oldest point is evicted on overflow.
#[derive(Debug, Clone)]
pub struct HistorySeries {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl Default for HistorySeries {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistorySeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: HistoryPoint) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// `Down` also covers equality.
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            None => Trend::Stable,
            Some(prev) if current > prev => Trend::Up,
            Some(_) => Trend::Down,
        }
    }
}

/// Icon identifiers understood by the dashboard front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KpiIcon {
    Zap,
    Wind,
    RotateCw,
    #[serde(rename = "volume-2")]
    Volume2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: Metric,
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub status: KpiStatus,
    pub trend: Trend,
    pub icon: KpiIcon,
}

impl Kpi {
    /// Build the KPI for `metric` at `value`, comparing against the previous tail if any.
    pub fn evaluate(metric: Metric, value: f64, previous: Option<f64>) -> Self {
        let (label, unit, icon) = match metric {
            Metric::Power => ("Power Output", "MW", KpiIcon::Zap),
            Metric::WindSpeed => ("Wind Speed", "m/s", KpiIcon::Wind),
            Metric::RotorSpeed => ("Rotor RPM", "RPM", KpiIcon::RotateCw),
            Metric::Noise => ("Noise Level", "dB", KpiIcon::Volume2),
        };

        Self {
            id: metric,
            label: label.to_string(),
            value,
            unit: unit.to_string(),
            status: classify(metric, value),
            trend: Trend::between(previous, value),
            icon,
        }
    }
}

pub fn classify(metric: Metric, value: f64) -> KpiStatus {
    use thresholds::*;

    match metric {
        Metric::Power => {
            if value > POWER_NORMAL_ABOVE {
                KpiStatus::Normal
            } else if value > POWER_WARNING_ABOVE {
                KpiStatus::Warning
            } else {
                KpiStatus::Critical
            }
        }
        Metric::WindSpeed => {
            if value > WIND_SPEED_MIN && value < WIND_SPEED_MAX {
                KpiStatus::Normal
            } else {
                KpiStatus::Warning
            }
        }
        Metric::RotorSpeed => {
            if value > ROTOR_RPM_MIN && value < ROTOR_RPM_MAX {
                KpiStatus::Normal
            } else {
                KpiStatus::Warning
            }
        }
        Metric::Noise => {
            if value < NOISE_NORMAL_BELOW {
                KpiStatus::Normal
            } else if value < NOISE_WARNING_BELOW {
                KpiStatus::Warning
            } else {
                KpiStatus::Critical
            }
        }
    }
}
