use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_server::{app, config::Config, run, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    config.log();

    let state = AppState::from_config(&config);
    let router = app(state).layer(config.cors_layer());

    let listener = TcpListener::bind(config.addr()).await?;
    info!("listening on {}", listener.local_addr()?);
    run(listener, router).await?;
    Ok(())
}
