use anyhow::Result;
use gerbang_kampus::{config::Config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gerbang_kampus=info".parse()?),
        )
        .init();

    info!("Starting Gerbang Kampus");

    let config = Config::from_env()?;
    info!(
        "Recommending {} categories / {} subjects, translator {}",
        config.top_categories,
        config.top_subjects,
        if config.translator_key.is_some() { "configured" } else { "disabled" }
    );

    server::serve(config).await
}
