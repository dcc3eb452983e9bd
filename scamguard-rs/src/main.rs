use scamguard_rs::api::ApiServer;
use scamguard_rs::classifier::MessageClassifier;
use scamguard_rs::config::Config;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let (config, from_file) = if Path::new("config.toml").exists() {
        (Config::from_file("config.toml")?, true)
    } else {
        (Config::default(), false)
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| format!("scamguard_rs={},tower_http=info", config.logging.level).into(),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scamguard-rs v{}", env!("CARGO_PKG_VERSION"));
    if !from_file {
        info!("No config file found, using defaults");
    }
    info!("  API listening on: {}", config.server.listen_addr);
    info!("  Model artifacts: {}", config.model.artifact_dir);
    info!("  Max sequence length: {}", config.model.max_seq_len);

    // Load the classifier once; requests share it read-only
    let classifier = Arc::new(MessageClassifier::load(
        Path::new(&config.model.artifact_dir),
        config.model.max_seq_len,
    )?);

    let server = ApiServer::new(
        classifier,
        config.model.artifact_dir.clone(),
        config.server.listen_addr.clone(),
    );

    server.run().await?;

    Ok(())
}
