use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Method,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use amity_ledger::{Ledger, Outcome, User};
use amity_shared::types::Address;
use amity_shared::SignedCall;

use crate::auth::Authenticator;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};

/// Largest accepted request body. A call carries at most a 256-byte message
/// plus its envelope, so this is generous.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    /// The one ledger. Each call holds the lock from its first check to its
    /// last write, so calls are applied one at a time in arrival order.
    pub ledger: Arc<Mutex<Ledger>>,
    pub authenticator: Authenticator,
    pub rate_limiter: RateLimiter,
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::new())),
            authenticator: Authenticator::new(config.max_clock_skew()),
            rate_limiter: RateLimiter::from_config(&config),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .route("/calls", post(submit_call))
        .route("/users", get(list_users))
        .route("/users/:address", get(resolve_name))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ServerInfoResponse {
    name: String,
    version: &'static str,
    users: usize,
    uptime_secs: u64,
}

#[derive(Serialize)]
struct NameResponse {
    address: Address,
    name: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    let users = state.ledger.lock().await.user_count();
    Json(ServerInfoResponse {
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        users,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Authenticate a signed call and apply it to the ledger.
async fn submit_call(
    State(state): State<AppState>,
    payload: Result<Json<SignedCall>, JsonRejection>,
) -> Result<Json<Outcome>, ServerError> {
    let Json(signed) = payload?;
    let caller = state.authenticator.authenticate(&signed).await?;
    let op = signed.call.name();
    let mutation = signed.call.is_mutation();

    let outcome = {
        let mut ledger = state.ledger.lock().await;
        ledger.apply(&caller, signed.call)?
    };

    if mutation {
        info!(caller = %caller.address().short(), op, "Call committed");
    }
    Ok(Json(outcome))
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let ledger = state.ledger.lock().await;
    Json(ledger.list_all().to_vec())
}

async fn resolve_name(
    State(state): State<AppState>,
    Path(address_hex): Path<String>,
) -> Result<Json<NameResponse>, ServerError> {
    let address = Address::from_hex(&address_hex)
        .map_err(|e| ServerError::BadRequest(format!("Invalid address: {e}")))?;

    let ledger = state.ledger.lock().await;
    let name = ledger.resolve_name(&address)?.to_string();
    Ok(Json(NameResponse { address, name }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
