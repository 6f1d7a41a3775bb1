// Turbine service - Use cases for listing and selecting turbines
use crate::application::telemetry_store::SharedStore;
use crate::domain::turbine::{Turbine, TurbineId};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct TurbineService {
    store: SharedStore,
    known: Arc<Vec<TurbineId>>,
    selection: Arc<watch::Sender<TurbineId>>,
}

impl TurbineService {
    pub fn new(store: SharedStore, known: Vec<TurbineId>, initial: TurbineId) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            store,
            known: Arc::new(known),
            selection: Arc::new(tx),
        }
    }

    pub fn list_turbines(&self) -> Vec<Turbine> {
        self.known.iter().cloned().map(Turbine::new).collect()
    }

    /// Observe selection changes.
    pub fn subscribe(&self) -> watch::Receiver<TurbineId> {
        self.selection.subscribe()
    }

    /// Update the store's selection and notify pollers. Re-selecting the
    /// current turbine is a no-op for pollers.
    pub async fn select(&self, turbine: TurbineId) {
        self.store.write().await.select_turbine(turbine.clone());

        let changed = self.selection.send_if_modified(|current| {
            if *current == turbine {
                false
            } else {
                *current = turbine.clone();
                true
            }
        });

        if changed {
            tracing::info!("Selected turbine {}", turbine);
        }
    }
}
