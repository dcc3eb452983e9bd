//! scamguard-rs: Scam message detection service
//!
//! Serves a fine-tuned binary sequence classifier (scam/phishing message
//! detection) behind an HTTP API, together with an in-memory blocklist of
//! flagged sender addresses.
//!
//! # Features
//!
//! - **Classification**: one forward pass per message through a BERT
//!   encoder with a two-class head (candle)
//! - **Blocklist**: lock-guarded in-memory set of lowercase-normalized
//!   addresses with idempotent add/remove
//! - **API**: axum REST endpoints with fully open CORS
//!
//! # Example
//!
//! ```no_run
//! use scamguard_rs::api::ApiServer;
//! use scamguard_rs::classifier::MessageClassifier;
//! use scamguard_rs::config::Config;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let classifier = Arc::new(MessageClassifier::load(
//!         Path::new(&config.model.artifact_dir),
//!         config.model.max_seq_len,
//!     )?);
//!
//!     let server = ApiServer::new(
//!         classifier,
//!         config.model.artifact_dir.clone(),
//!         config.server.listen_addr.clone(),
//!     );
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`classifier`]: Model loading and inference
//! - [`blocklist`]: In-memory blocklist
//! - [`api`]: HTTP API surface

pub mod api;
pub mod blocklist;
pub mod classifier;
pub mod config;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ScamError};
