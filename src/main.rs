//! Pricecast server - LSTM price forecasting over HTTP
//!
//! Serves per-instrument point and range forecasts plus a raw historical
//! passthrough. Stateless by design: every request re-fetches its series
//! and re-loads the model/scaler pair.
//!
//! # Usage
//! ```sh
//! MODELS_PATH=models BIND_ADDR=0.0.0.0:8000 cargo run
//! ```

use anyhow::Result;
use pricecast::application::artifacts::FsArtifactStore;
use pricecast::application::predictor::Predictor;
use pricecast::application::service::ForecastService;
use pricecast::config::{Config, DataSource};
use pricecast::domain::ports::MarketDataProvider;
use pricecast::infrastructure::mock::MockMarketDataProvider;
use pricecast::infrastructure::yahoo::YahooMarketDataProvider;
use pricecast::interfaces::http::{AppState, router};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pricecast {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: DataSource={:?}, Models={:?}, Window={}",
        config.data_source, config.models_path, config.window_length
    );

    let provider: Arc<dyn MarketDataProvider> = match config.data_source {
        DataSource::Yahoo => Arc::new(YahooMarketDataProvider::new(config.yahoo_base_url.clone())),
        DataSource::Mock => Arc::new(MockMarketDataProvider::spanning(
            config.series_start,
            config.series_end,
            100.0,
        )),
    };

    let artifacts = Arc::new(FsArtifactStore::new(config.models_path.clone()));
    let predictor = Predictor::new(artifacts, config.window_length);
    let service = ForecastService::new(
        provider,
        predictor,
        config.series_start,
        config.series_end,
    );

    let app = router(Arc::new(AppState { service }));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
