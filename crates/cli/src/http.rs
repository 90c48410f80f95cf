//! HTTP front end for turns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use runtime::{Message, ServiceConnector, Tool, TurnOrchestrator};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub type SharedOrchestrator = Arc<TurnOrchestrator<ServiceConnector>>;

/// Request body for POST /api/turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub user_message: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

/// Successful response for POST /api/turn.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub new_messages: Vec<Message>,
}

/// Response for GET /api/tools.
#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<Tool>,
}

/// Uniform failure envelope: `{"error": "..."}`.
///
/// Turn failures are `500`; a body that cannot be read as a request keeps
/// the status axum assigned to the rejection.
pub enum ApiError {
    Runtime(runtime::Error),
    BadRequest(JsonRejection),
}

impl From<runtime::Error> for ApiError {
    fn from(err: runtime::Error) -> Self {
        Self::Runtime(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Runtime(err) => {
                error!("turn failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::BadRequest(rejection) => {
                warn!("rejected request body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Build the router.
///
/// - `POST /api/turn` runs one turn
/// - `GET /api/tools` lists the tool catalog
/// - `GET /health` liveness check
pub fn build_router(orchestrator: SharedOrchestrator) -> Router {
    Router::new()
        .route("/api/turn", post(post_turn))
        .route("/api/tools", get(get_tools))
        .route("/health", get(health))
        .with_state(orchestrator)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(router: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}

/// POST /api/turn
async fn post_turn(
    State(orchestrator): State<SharedOrchestrator>,
    body: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let Json(body) = body?;
    let new_messages = orchestrator
        .run_turn(&body.user_message, &body.history)
        .await?;
    Ok(Json(TurnResponse { new_messages }))
}

/// GET /api/tools
async fn get_tools(
    State(orchestrator): State<SharedOrchestrator>,
) -> Result<Json<ToolsResponse>, ApiError> {
    let catalog = orchestrator.catalog().await?;
    Ok(Json(ToolsResponse {
        tools: catalog.tools().to_vec(),
    }))
}

async fn health() -> &'static str {
    "ok"
}
