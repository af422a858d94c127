use crate::application::predictor::Predictor;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Candle, Prediction, PriceSeries};
use crate::domain::ports::MarketDataProvider;
use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

/// Application facade wired once at startup and shared read-only across
/// requests. Each call re-fetches its series and re-loads artifacts; the
/// service itself holds no mutable state.
pub struct ForecastService {
    provider: Arc<dyn MarketDataProvider>,
    predictor: Predictor,
    series_start: NaiveDate,
    series_end: NaiveDate,
}

impl ForecastService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        predictor: Predictor,
        series_start: NaiveDate,
        series_end: NaiveDate,
    ) -> Self {
        Self {
            provider,
            predictor,
            series_start,
            series_end,
        }
    }

    /// Fetches the full fixed-range asset series for `ticker`.
    async fn load_series(&self, ticker: &str) -> Result<PriceSeries, ForecastError> {
        let candles = self
            .provider
            .daily_candles(ticker, self.series_start, self.series_end)
            .await?;

        let series = PriceSeries::from_candles(&candles);
        if series.is_empty() {
            return Err(ForecastError::NoData {
                ticker: ticker.to_string(),
            });
        }

        info!("Loaded {} trading days for {}", series.len(), ticker);
        Ok(series)
    }

    pub async fn predict(&self, ticker: &str, date: NaiveDate) -> Result<f64, ForecastError> {
        let series = self.load_series(ticker).await?;
        self.predictor.predict_for_date(date, &series, ticker)
    }

    pub async fn predict_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Prediction>, ForecastError> {
        let series = self.load_series(ticker).await?;
        Ok(self.predictor.predict_range(start, end, &series, ticker))
    }

    /// Raw daily bars for the trailing `days` calendar days.
    pub async fn historical(
        &self,
        ticker: &str,
        days: u64,
    ) -> Result<Vec<Candle>, ForecastError> {
        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| ForecastError::NoData {
                ticker: ticker.to_string(),
            })?;

        // An empty span has no bars by contract
        if days == 0 {
            return Err(ForecastError::NoData {
                ticker: ticker.to_string(),
            });
        }

        let candles = self.provider.daily_candles(ticker, start, end).await?;
        if candles.is_empty() {
            return Err(ForecastError::NoData {
                ticker: ticker.to_string(),
            });
        }

        Ok(candles)
    }
}
