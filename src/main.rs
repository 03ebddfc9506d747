use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use photogallery::{build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photogallery=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let app_state = AppState::from_config(config).await?;
    let app = build_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
