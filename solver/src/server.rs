//! Axum HTTP server: JSON endpoints over a shared [`ProbabilityCalculator`].
//!
//! The calculator (and therefore its cache) is shared as
//! `Arc<ProbabilityCalculator>` across async handlers. Every query is bounded
//! by the surface limits (supported die, at most 100 rolls), so handlers
//! compute inline.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/dice` | Supported dice, roll limit, defaults |
//! | GET | `/probability` | Win / partial win / loss for one target |
//! | GET | `/cdf` | Per-target curve up to `max_target` |
//! | GET | `/stats` | Tables built and cached entries |

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::api_computations::{validate_request, ProbabilityCalculator};
use crate::constants::{
    max_reachable_sum, DEFAULT_DIE_SIDES, DEFAULT_MAX_ROLLS, DEFAULT_TARGET, MAX_ROLLS,
    SUPPORTED_DIE_SIDES,
};
use crate::error::ProbabilityError;

pub type AppState = Arc<ProbabilityCalculator>;

type ApiResult = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

pub fn create_router(calc: Arc<ProbabilityCalculator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/dice", get(handle_get_dice))
        .route("/probability", get(handle_get_probability))
        .route("/cdf", get(handle_get_cdf))
        .route("/stats", get(handle_get_stats))
        .layer(cors)
        .with_state(calc)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProbabilityQuery {
    dice_sides: u32,
    target_number: u32,
    max_rolls: u32,
}

#[derive(Deserialize)]
struct CdfQuery {
    dice_sides: u32,
    max_target: u32,
    max_rolls: u32,
}

fn error_response(status: StatusCode, msg: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn bad_request(err: ProbabilityError) -> (StatusCode, Json<serde_json::Value>) {
    warn!("rejected query: {err}");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_dice() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "supported_sides": SUPPORTED_DIE_SIDES,
        "max_rolls": MAX_ROLLS,
        "defaults": {
            "dice_sides": DEFAULT_DIE_SIDES,
            "target_number": DEFAULT_TARGET,
            "max_rolls": DEFAULT_MAX_ROLLS,
        },
    }))
}

async fn handle_get_probability(
    State(calc): State<AppState>,
    Query(params): Query<ProbabilityQuery>,
) -> ApiResult {
    validate_request(params.dice_sides, params.target_number, params.max_rolls)
        .map_err(bad_request)?;

    let result = calc
        .query(params.dice_sides, params.target_number, params.max_rolls)
        .map_err(bad_request)?;

    Ok(Json(serde_json::json!({
        "dice_sides": params.dice_sides,
        "target_number": params.target_number,
        "max_rolls": params.max_rolls,
        "max_target": max_reachable_sum(params.dice_sides, params.max_rolls),
        "win": result.win,
        "partial_win": result.partial_win,
        "loss": result.loss,
    })))
}

async fn handle_get_cdf(State(calc): State<AppState>, Query(params): Query<CdfQuery>) -> ApiResult {
    // The curve is only offered up to the highest reachable sum.
    validate_request(params.dice_sides, params.max_target, params.max_rolls)
        .map_err(bad_request)?;

    let curve = calc
        .cdf_curve(params.dice_sides, params.max_target, params.max_rolls)
        .map_err(bad_request)?;

    Ok(Json(serde_json::json!({
        "dice_sides": params.dice_sides,
        "max_rolls": params.max_rolls,
        "points": curve.points,
    })))
}

async fn handle_get_stats(State(calc): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "tables_built": calc.tables_built(),
        "cached_entries": calc.cache_len(),
    }))
}
