// Prediction service - Polls the prediction backend with last-good/fallback semantics
use crate::application::prediction_repository::PredictionRepository;
use crate::domain::prediction::{
    fallback_health_scores, fallback_maintenance_schedule, fallback_predictions,
    fallback_system_status, HealthScores, MaintenanceSchedule, Predictions, Provenance,
    SystemStatus,
};
use crate::domain::turbine::TurbineId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A value as it should be displayed, with where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved<T> {
    pub value: T,
    pub provenance: Provenance,
    pub turbine: Option<TurbineId>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

struct Good<T> {
    turbine: Option<TurbineId>,
    value: T,
    fetched_at: DateTime<Utc>,
}

/// Last successfully fetched value for one endpoint.
pub struct LastGood<T> {
    fallback: fn() -> T,
    target: Option<TurbineId>,
    good: Option<Good<T>>,
    last_error: Option<String>,
}

impl<T: Clone> LastGood<T> {
    pub fn new(fallback: fn() -> T) -> Self {
        Self {
            fallback,
            target: None,
            good: None,
            last_error: None,
        }
    }

    /// Record the outcome of a fetch made for `turbine`.
    pub fn record(&mut self, turbine: Option<TurbineId>, result: anyhow::Result<T>) {
        match result {
            Ok(value) => {
                self.good = Some(Good {
                    turbine: turbine.clone(),
                    value,
                    fetched_at: Utc::now(),
                });
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("{:#}", e)),
        }
        self.target = turbine;
    }

    /// Last good value, fresh only if the latest fetch for the current target
    /// succeeded. The fixed fallback is used only before any success. A value
    /// fetched for another turbine is served as stale, tagged with that turbine.
    pub fn resolve(&self) -> Resolved<T> {
        match &self.good {
            Some(good) => Resolved {
                value: good.value.clone(),
                provenance: if self.last_error.is_none() && good.turbine == self.target {
                    Provenance::Fresh
                } else {
                    Provenance::Stale
                },
                turbine: good.turbine.clone(),
                updated_at: Some(good.fetched_at),
                last_error: self.last_error.clone(),
            },
            None => Resolved {
                value: (self.fallback)(),
                provenance: Provenance::Fallback,
                turbine: self.target.clone(),
                updated_at: None,
                last_error: self.last_error.clone(),
            },
        }
    }
}

pub type Cell<T> = Arc<RwLock<LastGood<T>>>;

/// Cadences and timeout for the backend pollers
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub timeout: Duration,
    pub predictions: Duration,
    pub health_scores: Duration,
    pub maintenance: Duration,
    pub system_status: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            predictions: Duration::from_millis(3000),
            health_scores: Duration::from_millis(5000),
            maintenance: Duration::from_millis(5000),
            system_status: Duration::from_millis(3000),
        }
    }
}

#[derive(Clone)]
pub struct PredictionService {
    predictions: Cell<Predictions>,
    health_scores: Cell<HealthScores>,
    maintenance: Cell<MaintenanceSchedule>,
    system_status: Cell<SystemStatus>,
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionService {
    pub fn new() -> Self {
        Self {
            predictions: Arc::new(RwLock::new(LastGood::new(fallback_predictions))),
            health_scores: Arc::new(RwLock::new(LastGood::new(fallback_health_scores))),
            maintenance: Arc::new(RwLock::new(LastGood::new(fallback_maintenance_schedule))),
            system_status: Arc::new(RwLock::new(LastGood::new(fallback_system_status))),
        }
    }

    pub async fn predictions(&self) -> Resolved<Predictions> {
        self.predictions.read().await.resolve()
    }

    pub async fn health_scores(&self) -> Resolved<HealthScores> {
        self.health_scores.read().await.resolve()
    }

    pub async fn maintenance_schedule(&self) -> Resolved<MaintenanceSchedule> {
        self.maintenance.read().await.resolve()
    }

    pub async fn system_status(&self) -> Resolved<SystemStatus> {
        self.system_status.read().await.resolve()
    }

    /// Start one independent poller per endpoint.
    pub fn spawn_pollers(
        &self,
        repository: Arc<dyn PredictionRepository>,
        turbine_rx: watch::Receiver<TurbineId>,
        settings: PollSettings,
    ) -> Vec<JoinHandle<()>> {
        let repo = repository.clone();
        let predictions = tokio::spawn(poll_loop(
            "predictions",
            self.predictions.clone(),
            turbine_rx.clone(),
            true,
            settings.predictions,
            settings.timeout,
            move |turbine: Option<TurbineId>| {
                let repo = repo.clone();
                async move { repo.fetch_predictions(turbine.as_ref()).await }
            },
        ));

        let repo = repository.clone();
        let health_scores = tokio::spawn(poll_loop(
            "health-scores",
            self.health_scores.clone(),
            turbine_rx.clone(),
            true,
            settings.health_scores,
            settings.timeout,
            move |turbine: Option<TurbineId>| {
                let repo = repo.clone();
                async move { repo.fetch_health_scores(turbine.as_ref()).await }
            },
        ));

        let repo = repository.clone();
        let maintenance = tokio::spawn(poll_loop(
            "maintenance-schedule",
            self.maintenance.clone(),
            turbine_rx.clone(),
            true,
            settings.maintenance,
            settings.timeout,
            move |turbine: Option<TurbineId>| {
                let repo = repo.clone();
                async move { repo.fetch_maintenance_schedule(turbine.as_ref()).await }
            },
        ));

        let repo = repository;
        let system_status = tokio::spawn(poll_loop(
            "system-status",
            self.system_status.clone(),
            turbine_rx,
            false,
            settings.system_status,
            settings.timeout,
            move |_turbine: Option<TurbineId>| {
                let repo = repo.clone();
                async move { repo.fetch_system_status().await }
            },
        ));

        vec![predictions, health_scores, maintenance, system_status]
    }
}

/// Poll one endpoint forever. When `per_turbine` is set, a turbine change
/// drops any in-flight fetch and refetches for the new turbine right away.
pub async fn poll_loop<T, F, Fut>(
    name: &'static str,
    cell: Cell<T>,
    mut turbine_rx: watch::Receiver<TurbineId>,
    per_turbine: bool,
    period: Duration,
    timeout: Duration,
    fetch: F,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(Option<TurbineId>) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut fetch_now = true;

    loop {
        if !fetch_now {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = turbine_rx.changed() => {
                    if changed.is_err() {
                        tracing::debug!("{} poller stopping, turbine selection closed", name);
                        return;
                    }
                    if !per_turbine {
                        continue;
                    }
                }
            }
        }
        fetch_now = false;

        let turbine = per_turbine.then(|| turbine_rx.borrow_and_update().clone());
        let attempt = tokio::time::timeout(timeout, fetch(turbine.clone()));

        let result = tokio::select! {
            outcome = attempt => match outcome {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("{} timed out after {:?}", name, timeout)),
            },
            changed = turbine_rx.changed(), if per_turbine => {
                if changed.is_err() {
                    return;
                }
                tracing::debug!("{} fetch superseded by turbine change", name);
                fetch_now = true;
                continue;
            }
        };

        match &result {
            Ok(_) => tracing::debug!("{} refreshed", name),
            Err(e) => tracing::warn!("{} fetch failed, keeping last good value: {:#}", name, e),
        }
        cell.write().await.record(turbine, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{ComponentPrediction, ComponentStatus};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn tagged(tag: &str) -> Predictions {
        let mut map = Predictions::new();
        map.insert(
            tag.to_string(),
            ComponentPrediction {
                status: ComponentStatus::Warning,
                message: format!("from {}", tag),
                confidence: "70%".to_string(),
                based_on: "30 days of logs".to_string(),
            },
        );
        map
    }

    fn t(id: &str) -> Option<TurbineId> {
        Some(TurbineId::new(id))
    }

    #[test]
    fn test_fallback_until_first_success() {
        let cell: LastGood<Predictions> = LastGood::new(fallback_predictions);
        let resolved = cell.resolve();
        assert_eq!(resolved.provenance, Provenance::Fallback);
        assert_eq!(resolved.value, fallback_predictions());
    }

    #[test]
    fn test_failure_keeps_last_good_value() {
        let mut cell = LastGood::new(fallback_predictions);
        cell.record(t("Turbine-1"), Ok(tagged("Turbine-1")));
        assert_eq!(cell.resolve().provenance, Provenance::Fresh);

        cell.record(t("Turbine-1"), Err(anyhow::anyhow!("connection refused")));
        let resolved = cell.resolve();
        assert_eq!(resolved.provenance, Provenance::Stale);
        assert_eq!(resolved.value, tagged("Turbine-1"));
        assert_eq!(resolved.last_error.as_deref(), Some("connection refused"));

        cell.record(t("Turbine-1"), Ok(tagged("again")));
        let resolved = cell.resolve();
        assert_eq!(resolved.provenance, Provenance::Fresh);
        assert!(resolved.last_error.is_none());
    }

    #[test]
    fn test_failure_after_switch_keeps_previous_turbines_value() {
        let mut cell = LastGood::new(fallback_predictions);
        cell.record(t("Turbine-1"), Ok(tagged("Turbine-1")));
        cell.record(t("Turbine-2"), Err(anyhow::anyhow!("timeout")));

        let resolved = cell.resolve();
        assert_eq!(resolved.provenance, Provenance::Stale);
        assert_eq!(resolved.turbine, t("Turbine-1"));
        assert_eq!(resolved.value, tagged("Turbine-1"));
        assert_eq!(resolved.last_error.as_deref(), Some("timeout"));

        cell.record(t("Turbine-2"), Ok(tagged("Turbine-2")));
        let resolved = cell.resolve();
        assert_eq!(resolved.provenance, Provenance::Fresh);
        assert_eq!(resolved.turbine, t("Turbine-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_turbine_change_supersedes_in_flight_fetch() {
        let cell: Cell<Predictions> = Arc::new(RwLock::new(LastGood::new(fallback_predictions)));
        let (tx, rx) = watch::channel(TurbineId::new("Turbine-1"));

        let poller = tokio::spawn(poll_loop(
            "predictions",
            cell.clone(),
            rx,
            true,
            Duration::from_secs(3),
            Duration::from_secs(2),
            |turbine: Option<TurbineId>| async move {
                let id = turbine.map(|t| t.to_string()).unwrap_or_default();
                if id == "Turbine-1" {
                    tokio::time::sleep(Duration::from_millis(1500)).await;
                }
                Ok::<_, anyhow::Error>(tagged(&id))
            },
        ));

        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(TurbineId::new("Turbine-2")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let resolved = cell.read().await.resolve();
        assert_eq!(resolved.provenance, Provenance::Fresh);
        assert_eq!(resolved.value, tagged("Turbine-2"));

        // the dropped Turbine-1 fetch must never land
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(cell.read().await.resolve().value, tagged("Turbine-2"));

        poller.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out() {
        let cell: Cell<Predictions> = Arc::new(RwLock::new(LastGood::new(fallback_predictions)));
        let (_tx, rx) = watch::channel(TurbineId::new("Turbine-1"));

        let poller = tokio::spawn(poll_loop(
            "predictions",
            cell.clone(),
            rx,
            true,
            Duration::from_secs(3),
            Duration::from_secs(2),
            |_turbine: Option<TurbineId>| async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, anyhow::Error>(tagged("late"))
            },
        ));

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let resolved = cell.read().await.resolve();
        assert_eq!(resolved.provenance, Provenance::Fallback);
        assert!(resolved.last_error.unwrap().contains("timed out"));

        poller.abort();
    }

    struct FlakyRepository {
        predictions_down: AtomicBool,
    }

    #[async_trait]
    impl PredictionRepository for FlakyRepository {
        async fn fetch_predictions(
            &self,
            turbine: Option<&TurbineId>,
        ) -> anyhow::Result<Predictions> {
            if self.predictions_down.load(Ordering::SeqCst) {
                anyhow::bail!("predict endpoint unavailable");
            }
            Ok(tagged(turbine.map(|t| t.as_str()).unwrap_or("none")))
        }

        async fn fetch_health_scores(
            &self,
            _turbine: Option<&TurbineId>,
        ) -> anyhow::Result<HealthScores> {
            Ok(fallback_health_scores())
        }

        async fn fetch_maintenance_schedule(
            &self,
            _turbine: Option<&TurbineId>,
        ) -> anyhow::Result<MaintenanceSchedule> {
            anyhow::bail!("maintenance endpoint unavailable")
        }

        async fn fetch_system_status(&self) -> anyhow::Result<SystemStatus> {
            Ok(SystemStatus {
                turbine_status: "operational".to_string(),
                connection_status: "connected".to_string(),
                last_update: None,
                uptime: "45 days, 12 hours".to_string(),
                total_power_generated: 2847.5,
                efficiency: 87.3,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_endpoint_failures_are_isolated() {
        let repo = Arc::new(FlakyRepository {
            predictions_down: AtomicBool::new(false),
        });
        let (_tx, rx) = watch::channel(TurbineId::new("Turbine-1"));
        let service = PredictionService::new();
        let handles = service.spawn_pollers(repo.clone(), rx, PollSettings::default());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.predictions().await.provenance, Provenance::Fresh);
        assert_eq!(service.health_scores().await.provenance, Provenance::Fresh);
        assert_eq!(service.maintenance_schedule().await.provenance, Provenance::Fallback);
        let status = service.system_status().await;
        assert_eq!(status.provenance, Provenance::Fresh);
        assert_eq!(status.turbine, None);
        assert_eq!(status.value.connection_status, "connected");

        repo.predictions_down.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(3100)).await;
        let predictions = service.predictions().await;
        assert_eq!(predictions.provenance, Provenance::Stale);
        assert_eq!(predictions.value, tagged("Turbine-1"));
        assert_eq!(service.health_scores().await.provenance, Provenance::Fresh);

        for handle in handles {
            handle.abort();
        }
    }
}
