// Telemetry store - Single holder of current and derived turbine state
use crate::domain::alert::Alert;
use crate::domain::dashboard::{DashboardSnapshot, HistorySnapshot};
use crate::domain::reading::{MalformedReading, RawReading, Reading};
use crate::domain::telemetry::{HistoryPoint, HistorySeries, Kpi, Metric};
use crate::domain::turbine::{AnimationParams, TurbineId};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Alerts retained, most recent first.
pub const ALERT_CAPACITY: usize = 20;

pub type SharedStore = Arc<RwLock<TelemetryStore>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed reading: {0}")]
    MalformedReading(#[from] MalformedReading),
}

#[derive(Debug, Clone, Default)]
struct History {
    power: HistorySeries,
    noise: HistorySeries,
    wind_speed: HistorySeries,
}

impl History {
    fn series(&self, metric: Metric) -> Option<&HistorySeries> {
        match metric {
            Metric::Power => Some(&self.power),
            Metric::Noise => Some(&self.noise),
            Metric::WindSpeed => Some(&self.wind_speed),
            Metric::RotorSpeed => None,
        }
    }

    fn tail(&self, metric: Metric) -> Option<f64> {
        self.series(metric).and_then(|s| s.last()).map(|p| p.value)
    }
}

#[derive(Debug, Default)]
pub struct TelemetryStore {
    selected_turbine: TurbineId,
    current: Option<Reading>,
    history: History,
    kpis: Vec<Kpi>,
    alerts: VecDeque<Alert>,
    animation: AnimationParams,
    animation_running: bool,
}

impl TelemetryStore {
    pub fn new(selected_turbine: TurbineId) -> Self {
        Self {
            selected_turbine,
            ..Self::default()
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Validate and apply one reading. On error the store is left untouched.
    pub fn ingest(&mut self, raw: RawReading) -> Result<(), StoreError> {
        let reading = Reading::try_from(raw)?;
        self.ingest_reading(reading);
        Ok(())
    }

    /// Apply a validated reading. Power, wind speed and noise trends each
    /// compare against their own series; rotor speed has none and stays stable.
    pub fn ingest_reading(&mut self, reading: Reading) {
        // KPIs compare against the tail as it was before this reading.
        let kpis = vec![
            Kpi::evaluate(Metric::Power, reading.power_output, self.history.tail(Metric::Power)),
            Kpi::evaluate(
                Metric::WindSpeed,
                reading.wind_speed,
                self.history.tail(Metric::WindSpeed),
            ),
            Kpi::evaluate(Metric::RotorSpeed, reading.rotor_rpm, None),
            Kpi::evaluate(Metric::Noise, reading.noise.level, self.history.tail(Metric::Noise)),
        ];

        let animation = AnimationParams {
            rotor_speed: reading.rotor_rpm,
            yaw: reading.nacelle.yaw,
            pitch: reading.blades.pitch,
        };

        let ts = reading.timestamp;
        self.history.power.push(HistoryPoint::new(ts, reading.power_output));
        self.history.noise.push(HistoryPoint::new(ts, reading.noise.level));
        self.history.wind_speed.push(HistoryPoint::new(ts, reading.wind_speed));
        self.kpis = kpis;
        self.animation = animation;
        self.current = Some(reading);
    }

    /// Prepend an alert, dropping the oldest beyond capacity. Ids are not deduplicated.
    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(ALERT_CAPACITY);
    }

    /// Remove the first alert with `id`. Returns false when nothing matched.
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        match self.alerts.iter().position(|a| a.id == id) {
            Some(idx) => {
                self.alerts.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Swap the selected turbine. History and KPIs are kept as they are.
    pub fn select_turbine(&mut self, turbine: TurbineId) {
        self.selected_turbine = turbine;
    }

    pub fn toggle_animation_running(&mut self) -> bool {
        self.animation_running = !self.animation_running;
        self.animation_running
    }

    pub fn selected_turbine(&self) -> &TurbineId {
        &self.selected_turbine
    }

    pub fn current(&self) -> Option<&Reading> {
        self.current.as_ref()
    }

    pub fn history(&self, metric: Metric) -> Option<&HistorySeries> {
        self.history.series(metric)
    }

    pub fn kpis(&self) -> &[Kpi] {
        &self.kpis
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn animation(&self) -> AnimationParams {
        self.animation
    }

    pub fn animation_running(&self) -> bool {
        self.animation_running
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            selected_turbine: self.selected_turbine.clone(),
            current: self.current.clone(),
            history: HistorySnapshot {
                power: self.history.power.to_vec(),
                noise: self.history.noise.to_vec(),
                wind_speed: self.history.wind_speed.to_vec(),
            },
            kpis: self.kpis.clone(),
            alerts: self.alerts.iter().cloned().collect(),
            animation: self.animation,
            animation_running: self.animation_running,
        }
    }
}
