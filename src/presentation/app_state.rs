// Application state for HTTP handlers
use crate::application::prediction_service::PredictionService;
use crate::application::telemetry_store::SharedStore;
use crate::application::turbine_service::TurbineService;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub turbine_service: TurbineService,
    pub prediction_service: PredictionService,
}
