//! API Server - HTTP server for the classification and blocklist API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::blocklist::BlocklistManager;
use crate::classifier::MessageClassifier;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server around a loaded classifier
    pub fn new(classifier: Arc<MessageClassifier>, model_dir: String, addr: String) -> Self {
        let state = Arc::new(AppState {
            classifier,
            blocklist: BlocklistManager::new(),
            model_dir,
        });

        Self { state, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // CORS configuration: fully open, the browser extension posts from
        // arbitrary origins
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/classify/", post(handlers::classify))
            .route("/blocklist/", get(handlers::list_blocklist))
            .route("/blocklist/add", post(handlers::add_to_blocklist))
            .route("/blocklist/remove", post(handlers::remove_from_blocklist))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server (blocks until shutdown)
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("API server listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
