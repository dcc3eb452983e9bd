//! API request handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::blocklist::BlocklistManager;
use crate::classifier::MessageClassifier;
use crate::error::ScamError;

/// Shared application state
pub struct AppState {
    pub classifier: Arc<MessageClassifier>,
    pub blocklist: BlocklistManager,
    pub model_dir: String,
}

/// Classify request body
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// Blocklist mutation request body
#[derive(Debug, Deserialize)]
pub struct BlocklistRequest {
    pub email: String,
}

/// Status response for blocklist mutations
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

fn status_for(err: &ScamError) -> StatusCode {
    match err {
        ScamError::Tokenizer(_) | ScamError::InvalidEmail(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /health - Service liveness and loaded model
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model_dir.clone(),
    })
}

/// POST /classify/ - Score a message as SAFE or SCAM
///
/// The forward pass is CPU-bound, so it runs on the blocking thread pool
/// instead of stalling the reactor.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> impl IntoResponse {
    let classifier = state.classifier.clone();
    let text = req.text;

    match tokio::task::spawn_blocking(move || classifier.classify(&text)).await {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(e)) => {
            warn!("Classification failed: {}", e);
            (status_for(&e), Json(ApiError::new(&e.to_string()))).into_response()
        }
        Err(e) => {
            error!("Classification task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Classification task failed")),
            )
                .into_response()
        }
    }
}

/// GET /blocklist/ - List all blocked addresses
pub async fn list_blocklist(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.blocklist.list().await)
}

/// POST /blocklist/add - Add an address to the blocklist
pub async fn add_to_blocklist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BlocklistRequest>,
) -> impl IntoResponse {
    match state.blocklist.add(&req.email).await {
        Ok(_) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "added".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Rejected blocklist entry {:?}: {}", req.email, e);
            (status_for(&e), Json(ApiError::new(&e.to_string()))).into_response()
        }
    }
}

/// POST /blocklist/remove - Remove an address from the blocklist
pub async fn remove_from_blocklist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BlocklistRequest>,
) -> impl IntoResponse {
    state.blocklist.remove(&req.email).await;
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "removed".to_string(),
        }),
    )
        .into_response()
}
