//! HTTP surface: request/response DTOs, routing, and the error-to-status
//! mapping. Handlers are a thin adaptation layer over `ForecastService`.

use crate::application::service::ForecastService;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Candle, Prediction};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub service: ForecastService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict/range", post(predict_range))
        .route("/predict/{instrument}", post(predict_instrument))
        .route("/historical/{ticker}", get(historical))
        .with_state(state)
}

/// Short instrument names in the path map onto upstream tickers.
fn resolve_instrument(instrument: &str) -> Option<&'static str> {
    match instrument.to_lowercase().as_str() {
        "tsla" => Some("TSLA"),
        "btc" => Some("BTC-USD"),
        "usdt" => Some("USDT-USD"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub date_str: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub ticker: String,
    pub date: String,
    pub predicted_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct PredictRangeRequest {
    pub start_date: String,
    pub end_date: String,
    pub ticker: String,
}

#[derive(Debug, Serialize)]
pub struct PredictRangeResponse {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    #[serde(default = "default_days")]
    pub days: u64,
}

fn default_days() -> u64 {
    365
}

#[derive(Debug, Serialize)]
pub struct HistoricalBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl From<&Candle> for HistoricalBar {
    fn from(c: &Candle) -> Self {
        Self {
            date: c.date.to_string(),
            open: c.open.to_f64().unwrap_or(0.0),
            high: c.high.to_f64().unwrap_or(0.0),
            low: c.low.to_f64().unwrap_or(0.0),
            close: c.close.to_f64().unwrap_or(0.0),
            volume: c.volume.to_i64().unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoricalResponse {
    pub ticker: String,
    pub data: Vec<HistoricalBar>,
}

/// Error body in the `{"detail": ...}` shape the frontend expects.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        let status = match err {
            ForecastError::DateNotFound { .. } => StatusCode::NOT_FOUND,
            ForecastError::InsufficientHistory { .. } => StatusCode::BAD_REQUEST,
            ForecastError::NoData { .. }
            | ForecastError::ArtifactNotFound { .. }
            | ForecastError::Inference { .. }
            | ForecastError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    raw.parse::<NaiveDate>().map_err(|_| {
        // malformed dates follow the exact-match policy: not in the index
        ApiError::from(ForecastError::DateNotFound {
            date: raw.to_string(),
        })
    })
}

async fn predict_instrument(
    State(state): State<Arc<AppState>>,
    Path(instrument): Path<String>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let ticker = resolve_instrument(&instrument).ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Unsupported instrument: {}", instrument),
        )
    })?;

    let date = parse_date(&req.date_str)?;
    info!("Predicting {} for {}", ticker, date);

    let predicted_price = state.service.predict(ticker, date).await?;

    Ok(Json(PredictResponse {
        ticker: ticker.to_string(),
        date: req.date_str,
        predicted_price,
    }))
}

async fn predict_range(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRangeRequest>,
) -> Result<Json<PredictRangeResponse>, ApiError> {
    // range bounds are not pipeline dates; malformed input is a plain 500
    let start = req.start_date.parse::<NaiveDate>().map_err(|e| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid start_date {:?}: {}", req.start_date, e),
        )
    })?;
    let end = req.end_date.parse::<NaiveDate>().map_err(|e| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid end_date {:?}: {}", req.end_date, e),
        )
    })?;

    info!("Predicting range {}..{} for {}", start, end, req.ticker);

    let predictions = state.service.predict_range(&req.ticker, start, end).await?;

    Ok(Json(PredictRangeResponse { predictions }))
}

async fn historical(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoricalQuery>,
) -> Result<Json<HistoricalResponse>, ApiError> {
    let candles = state
        .service
        .historical(&ticker, query.days)
        .await
        .map_err(|err| match err {
            // empty trailing window is an explicit NotFound here
            ForecastError::NoData { ref ticker } => ApiError::new(
                StatusCode::NOT_FOUND,
                format!("No data found for {}", ticker),
            ),
            other => ApiError::from(other),
        })?;

    let data = candles.iter().map(HistoricalBar::from).collect();

    Ok(Json(HistoricalResponse { ticker, data }))
}
