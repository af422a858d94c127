//! Deterministic in-memory stand-ins for the market-data provider and the
//! artifact store, used by unit and integration tests and by `mock` mode.

use crate::application::artifacts::ArtifactStore;
use crate::application::model::SequenceModel;
use crate::application::scaler::MinMaxScaler;
use crate::domain::errors::ForecastError;
use crate::domain::market::Candle;
use crate::domain::ports::MarketDataProvider;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Synthetic weekday candles: a gently rising close starting at `base`,
/// one bar per business day, weekends absent like a real exchange calendar.
pub fn business_day_candles(start: NaiveDate, count: usize, base: f64) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(count);
    let mut day = start;

    while candles.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            let close = base + candles.len() as f64 * 0.5;
            let d = |v: f64| Decimal::from_f64(v).unwrap_or(Decimal::ZERO);
            candles.push(Candle {
                date: day,
                open: d(close - 0.2),
                high: d(close + 0.3),
                low: d(close - 0.4),
                close: d(close),
                volume: Decimal::from(10_000),
            });
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    candles
}

#[derive(Clone, Default)]
pub struct MockMarketDataProvider {
    candles: Vec<Candle>,
}

impl MockMarketDataProvider {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    /// Business-day candles covering `[start, end]`.
    pub fn spanning(start: NaiveDate, end: NaiveDate, base: f64) -> Self {
        // calendar-day count is a safe upper bound on business days
        let span_days = (end - start).num_days().max(0) as usize + 1;
        let mut candles = business_day_candles(start, span_days, base);
        candles.retain(|c| c.date <= end);
        Self { candles }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn daily_candles(
        &self,
        _ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Candle>> {
        Ok(self
            .candles
            .iter()
            .filter(|c| c.date >= start && c.date <= end)
            .cloned()
            .collect())
    }
}

/// Always fails, for exercising the upstream-failure path.
pub struct FailingMarketDataProvider;

#[async_trait]
impl MarketDataProvider for FailingMarketDataProvider {
    async fn daily_candles(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Candle>> {
        anyhow::bail!("simulated upstream outage fetching {}", ticker)
    }
}

/// Model stub that echoes the last normalized observation as the forecast.
struct LastValueModel;

impl SequenceModel for LastValueModel {
    fn forecast(&mut self, window: &[f32]) -> Result<f32, ForecastError> {
        window.last().copied().ok_or(ForecastError::Inference {
            reason: "empty window".to_string(),
        })
    }

    fn name(&self) -> &str {
        "Mock (last value)"
    }
}

pub struct MockArtifactStore {
    missing: bool,
    scaler: MinMaxScaler,
}

impl MockArtifactStore {
    /// Artifacts that exist and round-trip values near the mock price range.
    pub fn passthrough() -> Self {
        Self {
            missing: false,
            scaler: MinMaxScaler {
                data_min: 0.0,
                data_max: 1000.0,
                feature_range: (0.0, 1.0),
            },
        }
    }

    /// Simulates an empty models directory.
    pub fn missing() -> Self {
        Self {
            missing: true,
            scaler: MinMaxScaler {
                data_min: 0.0,
                data_max: 1.0,
                feature_range: (0.0, 1.0),
            },
        }
    }
}

impl ArtifactStore for MockArtifactStore {
    fn load(
        &self,
        ticker: &str,
    ) -> Result<(MinMaxScaler, Box<dyn SequenceModel>), ForecastError> {
        if self.missing {
            return Err(ForecastError::ArtifactNotFound {
                ticker: ticker.to_string(),
            });
        }
        Ok((self.scaler.clone(), Box::new(LastValueModel)))
    }
}
