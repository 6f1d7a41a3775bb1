// Simulation feed - Drives the store at a fixed cadence
use crate::application::reading_source::ReadingSource;
use crate::application::telemetry_store::SharedStore;
use crate::domain::alert::{Alert, AlertKind, AlertModule};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const ALERT_MESSAGES: [&str; 5] = [
    "System performance within normal parameters",
    "Blade vibration slightly elevated",
    "Power output optimized for current conditions",
    "Weather conditions favorable for operation",
    "Scheduled maintenance reminder",
];

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub ingested: bool,
    pub alert_id: Option<String>,
}

pub struct SimulationFeed {
    store: SharedStore,
    source: Box<dyn ReadingSource>,
    alert_probability: f64,
    rng: StdRng,
}

impl SimulationFeed {
    pub fn new(store: SharedStore, source: Box<dyn ReadingSource>, alert_probability: f64) -> Self {
        Self {
            store,
            source,
            alert_probability: alert_probability.clamp(0.0, 1.0),
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Fetch one reading for the selected turbine, ingest it, maybe raise an alert.
    pub async fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let turbine = self.store.read().await.selected_turbine().clone();

        match self.source.next_reading(&turbine).await {
            Ok(raw) => match self.store.write().await.ingest(raw) {
                Ok(()) => {
                    tracing::debug!("Ingested reading for {}", turbine);
                    outcome.ingested = true;
                }
                Err(e) => tracing::warn!("Discarding reading for {}: {}", turbine, e),
            },
            Err(e) => tracing::warn!("Reading source failed for {}: {:#}", turbine, e),
        }

        if self.rng.gen_bool(self.alert_probability) {
            let alert = self.synthesize_alert();
            outcome.alert_id = Some(alert.id.clone());
            tracing::debug!("Raising simulated alert {}", alert.id);
            self.store.write().await.push_alert(alert);
        }

        outcome
    }

    fn synthesize_alert(&mut self) -> Alert {
        let now = Utc::now();
        let kind = *AlertKind::ALL.choose(&mut self.rng).unwrap_or(&AlertKind::Info);
        let module = *AlertModule::ALL
            .choose(&mut self.rng)
            .unwrap_or(&AlertModule::Maintenance);
        let message = ALERT_MESSAGES.choose(&mut self.rng).unwrap_or(&ALERT_MESSAGES[0]);

        Alert::new(
            format!("alert-{}", now.timestamp_millis()),
            kind,
            message.to_string(),
            module,
            now,
        )
    }

    /// Tick forever at `interval`. The first tick fires immediately.
    pub async fn run(mut self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!("Simulation feed running every {:?}", interval);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}
