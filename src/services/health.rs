use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::schedule::{Clock, SharedSchedule, TransitionKind};

/// Full health payload returned by `/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status, `healthy` or `unhealthy`.
    pub status: String,
    /// Time the payload was produced.
    pub timestamp: DateTime<Utc>,
    /// Crate version.
    pub version: String,
    /// Database connectivity section.
    pub database: DatabaseHealth,
    /// Slot schedule section.
    pub schedule: ScheduleHealth,
    /// Seconds since process start.
    pub uptime_seconds: u64,
}

/// Database section of the health payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// `healthy` or `unhealthy`.
    pub status: String,
    /// Current pool size.
    pub connection_pool_size: u32,
    /// Round-trip of the probe query.
    pub response_time_ms: u64,
}

/// Schedule section of the health payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleHealth {
    /// `healthy`, or `corrupt` when the snapshot violates its invariants.
    pub status: String,
    /// Number of configured slots.
    pub slot_count: usize,
    /// Number of the currently open slot, if any.
    pub active_slot: Option<u32>,
    /// Time of day of the next transition, if any.
    pub next_transition_at: Option<NaiveTime>,
    /// Kind of the next transition, if any.
    pub next_transition_kind: Option<TransitionKind>,
}

/// State shared with the axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle for the probe query.
    pub db: Arc<DatabaseManager>,
    /// Published slot schedule.
    pub schedule: SharedSchedule,
    /// Time source for schedule queries.
    pub clock: Arc<dyn Clock>,
    /// Process start time.
    pub start_time: DateTime<Utc>,
}

/// HTTP health endpoint of the bot process.
pub struct HealthService {
    /// Ready-to-serve axum router.
    pub router: Router,
}

impl HealthService {
    /// Builds the router with `/health`, `/health/ready` and `/health/live`.
    pub fn new(db: Arc<DatabaseManager>, schedule: SharedSchedule, clock: Arc<dyn Clock>) -> Self {
        let state = AppState {
            db,
            schedule,
            clock,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let db_status = match test_database_connection(&state.db).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds() as u64;

    let schedule = schedule_health(&state);
    let healthy = db_status == "healthy" && schedule.status == "healthy";

    let health_response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: db_status.to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        schedule,
        uptime_seconds: uptime,
    };

    if healthy {
        Ok(Json(health_response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

fn schedule_health(state: &AppState) -> ScheduleHealth {
    let store = state.schedule.snapshot();
    let now = state.clock.now();

    let (status, active_slot) = match store.active_slot(now) {
        Ok(active) => ("healthy", active.map(|s| s.number)),
        Err(e) => {
            tracing::error!("Schedule snapshot failed its invariants: {}", e);
            ("corrupt", None)
        }
    };
    let next = store.next_transition(now).ok().flatten();

    ScheduleHealth {
        status: status.to_string(),
        slot_count: store.len(),
        active_slot,
        next_transition_at: next.as_ref().map(|t| t.at),
        next_transition_kind: next.map(|t| t.kind),
    }
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(&db.pool).await?;

    Ok(())
}
