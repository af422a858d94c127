use crate::domain::market::Candle;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `ticker` covering the trading days in `[start, end]`.
    ///
    /// Every call performs a fresh fetch; there is no cache behind this
    /// interface and an empty range returns an empty vec, not an error.
    async fn daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Candle>>;
}
