//! API handlers for the server.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ecosim_core::{GridSnapshot, SpawnRequest};
use ecosim_world::{Simulation, SimulationStats};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    /// Serializes initialize/step calls; never held across an await.
    pub simulation: Arc<Mutex<Simulation>>,
}

impl AppState {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation: Arc::new(Mutex::new(simulation)),
        }
    }
}

/// Build the application router. Paths outside the API fall through to
/// files under `static_dir`.
pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/start-simulation", post(start_simulation))
        .route("/next-iteration", get(next_iteration))
        .route("/api/stats", get(get_stats))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Reset the grid with a new population
pub async fn start_simulation(
    State(state): State<AppState>,
    Json(request): Json<SpawnRequest>,
) -> Result<Json<GridSnapshot>, ApiError> {
    info!(
        plants = request.plants,
        herbivores = request.herbivores,
        carnivores = request.carnivores,
        "Simulation start requested"
    );

    let snapshot = state.simulation.lock().initialize(request)?;
    Ok(Json(snapshot))
}

/// Advance the simulation one tick
pub async fn next_iteration(State(state): State<AppState>) -> Json<GridSnapshot> {
    Json(state.simulation.lock().step())
}

/// Get simulation statistics
pub async fn get_stats(State(state): State<AppState>) -> Json<SimulationStats> {
    Json(state.simulation.lock().stats())
}

// Error handling
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, message).into_response()
    }
}

impl From<ecosim_core::Error> for ApiError {
    fn from(err: ecosim_core::Error) -> Self {
        match err {
            ecosim_core::Error::CapacityExceeded { requested, capacity } => {
                warn!(requested, capacity, "Rejected oversized population");
                ApiError::BadRequest("Too many entities".to_string())
            }
            ecosim_core::Error::Validation(msg) => ApiError::BadRequest(msg),
        }
    }
}
