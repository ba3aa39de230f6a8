use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;

use crate::data::Dataset;
use crate::result::ScheduleResult;
use crate::solver::{BacktrackPolicy, SolverConfig, SolverError};

type ApiError = (StatusCode, String);

#[derive(Debug, Clone)]
struct AppState {
    solver: SolverConfig,
}

#[derive(Debug, Deserialize)]
struct ExactParams {
    policy: Option<BacktrackPolicy>,
}

/// Both solvers' results for the same dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    #[serde(rename = "Exact")]
    pub exact: ScheduleResult,
    #[serde(rename = "Approximate")]
    pub approximate: ScheduleResult,
}

fn solver_error(e: SolverError) -> ApiError {
    let status = if e.is_precondition() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, e.to_string())
}

fn join_error(e: JoinError) -> ApiError {
    error!("Solver task failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "solver task failed".to_string(),
    )
}

fn run_exact(dataset: &Dataset, config: &SolverConfig) -> Result<ScheduleResult, SolverError> {
    dataset
        .solve_exact(config)
        .map(|solution| ScheduleResult::from(&solution))
}

fn run_approx(dataset: &Dataset) -> Result<ScheduleResult, SolverError> {
    dataset
        .solve_approx()
        .map(|solution| ScheduleResult::from(&solution))
}

async fn exact_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExactParams>,
    Json(input): Json<Dataset>,
) -> Result<Json<ScheduleResult>, ApiError> {
    let mut config = state.solver;
    if let Some(policy) = params.policy {
        config.policy = policy;
    }
    let result = tokio::task::spawn_blocking(move || run_exact(&input, &config))
        .await
        .map_err(join_error)?;
    result.map(Json).map_err(solver_error)
}

async fn approximate_handler(Json(input): Json<Dataset>) -> Result<Json<ScheduleResult>, ApiError> {
    let result = tokio::task::spawn_blocking(move || run_approx(&input))
        .await
        .map_err(join_error)?;
    result.map(Json).map_err(solver_error)
}

/// Runs both solvers side by side on one shared dataset.
async fn compare_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<Dataset>,
) -> Result<Json<CompareResponse>, ApiError> {
    let dataset = Arc::new(input);
    let config = state.solver;

    let exact = {
        let dataset = Arc::clone(&dataset);
        tokio::task::spawn_blocking(move || run_exact(&dataset, &config))
    };
    let approximate = {
        let dataset = Arc::clone(&dataset);
        tokio::task::spawn_blocking(move || run_approx(&dataset))
    };
    let (exact, approximate) = tokio::join!(exact, approximate);

    Ok(Json(CompareResponse {
        exact: exact.map_err(join_error)?.map_err(solver_error)?,
        approximate: approximate.map_err(join_error)?.map_err(solver_error)?,
    }))
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn router(solver: SolverConfig) -> Router {
    Router::new()
        .route("/v1/schedule/exact", post(exact_handler))
        .route("/v1/schedule/approximate", post(approximate_handler))
        .route("/v1/schedule/compare", post(compare_handler))
        .route("/health", get(health_handler))
        .with_state(Arc::new(AppState { solver }))
}

pub async fn run_server(bind: SocketAddr, solver: SolverConfig) -> std::io::Result<()> {
    let app = router(solver);

    let listener = tokio::net::TcpListener::bind(bind).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
