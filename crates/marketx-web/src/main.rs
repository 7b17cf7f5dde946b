use std::process::ExitCode;

use clap::Parser;
use marketx_web::{app_router, AppState, Config, WebError};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "marketx=info,marketx_core=info,marketx_web=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), WebError> {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    init_tracing();

    let state = AppState::from_config(&config)?;
    let router = app_router(state);

    info!(
        listen = %config.listen,
        base_url = %config.base_url,
        cache_ttl_secs = config.cache_ttl_secs,
        "starting market explorer"
    );
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
