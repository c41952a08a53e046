use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    controller::{AppState, Dashboard},
    error::SimulationError,
    render::{speed_label, DashboardView, Frame, ThresholdView},
    simulation::{Scenario, Thresholds},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/thresholds", get(get_thresholds))
        .route("/simulation/start", post(start_simulation))
        .route("/simulation/stop", post(stop_simulation))
        .route("/simulation/step", post(simulation_step))
        .route("/simulation/speed", put(set_speed))
        .route("/scenarios/:name", post(apply_scenario))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// Latest frame, its display strings and the schedule it was produced under
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub view: DashboardView,
    pub frame: Frame,
    pub running: bool,
    pub speed: String,
    pub tick_interval_ms: u64,
}

impl DashboardSnapshot {
    fn of(dashboard: &Dashboard, frame: Frame) -> Self {
        Self {
            view: DashboardView::from_frame(&frame),
            frame,
            running: dashboard.is_running(),
            speed: speed_label(dashboard.speed()),
            tick_interval_ms: dashboard.tick_interval().as_millis() as u64,
        }
    }
}

pub async fn get_dashboard(State(st): State<AppState>) -> ApiResponse<DashboardSnapshot> {
    let frame = st.dashboard.latest_frame();
    ApiResponse::success(DashboardSnapshot::of(&st.dashboard, frame))
}

#[derive(Debug, Serialize)]
pub struct ThresholdsResponse {
    pub thresholds: Thresholds,
    pub labels: ThresholdView,
}

pub async fn get_thresholds(State(st): State<AppState>) -> ApiResponse<ThresholdsResponse> {
    let thresholds = st.dashboard.thresholds();
    ApiResponse::success(ThresholdsResponse {
        thresholds,
        labels: thresholds.into(),
    })
}

#[derive(Debug, Serialize)]
pub struct RunState {
    pub running: bool,
    /// False when the call was a no-op
    pub changed: bool,
}

pub async fn start_simulation(State(st): State<AppState>) -> ApiResponse<RunState> {
    let changed = st.dashboard.start();
    ApiResponse::success(RunState {
        running: st.dashboard.is_running(),
        changed,
    })
}

pub async fn stop_simulation(State(st): State<AppState>) -> ApiResponse<RunState> {
    let changed = st.dashboard.stop();
    ApiResponse::success(RunState {
        running: st.dashboard.is_running(),
        changed,
    })
}

pub async fn simulation_step(State(st): State<AppState>) -> ApiResponse<DashboardSnapshot> {
    let frame = st.dashboard.step_now();
    ApiResponse::success(DashboardSnapshot::of(&st.dashboard, frame))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SpeedRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub multiplier: f64,
}

#[derive(Debug, Serialize)]
pub struct SpeedResponse {
    pub multiplier: f64,
    pub label: String,
    pub tick_interval_ms: u64,
}

pub async fn set_speed(
    State(st): State<AppState>,
    Json(req): Json<SpeedRequest>,
) -> Result<ApiResponse<SpeedResponse>, ApiError> {
    req.validate()?;
    let interval = st.dashboard.set_speed(req.multiplier)?;
    Ok(ApiResponse::success(SpeedResponse {
        multiplier: req.multiplier,
        label: speed_label(req.multiplier),
        tick_interval_ms: interval.as_millis() as u64,
    }))
}

pub async fn apply_scenario(
    State(st): State<AppState>,
    Path(name): Path<String>,
) -> Result<ApiResponse<DashboardSnapshot>, ApiError> {
    let scenario =
        Scenario::from_str(&name).map_err(|_| SimulationError::UnknownScenario(name.clone()))?;
    let frame = st.dashboard.apply_scenario(scenario);
    Ok(ApiResponse::success(DashboardSnapshot::of(&st.dashboard, frame)))
}
