use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt};

use song_service::{
    db::Database,
    routers::{AppState, app},
    secrets::Secrets,
    seed,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();

    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let songs = match seed::load_songs(&secrets.seed_file).await {
        Ok(songs) => songs,
        Err(e) => {
            error!("❌ Failed to load seed data: {}", e);
            std::process::exit(1);
        }
    };

    let database = match Database::connect(&secrets).await {
        Ok(db) => {
            info!("📊 Connected to MongoDB");
            db
        }
        Err(e) => {
            error!("❌ Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let store: AppState = Arc::new(database);
    if let Err(e) = seed::seed(store.as_ref(), songs).await {
        error!("❌ Failed to seed the song collection: {}", e);
        std::process::exit(1);
    }

    let listener = tokio::net::TcpListener::bind(&secrets.bind_addr)
        .await
        .with_context(|| format!("binding {}", secrets.bind_addr))?;

    info!("🎵 Song service listening on {}", secrets.bind_addr);

    axum::serve(listener, app(store))
        .await
        .context("serving HTTP")?;
    Ok(())
}
