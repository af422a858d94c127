//! Yahoo Finance Market Data Provider
//!
//! Fetches daily OHLCV bars through the public v8 chart API. One GET per
//! call, no retries and no caching; the caller owns the freshness tradeoff.

use crate::domain::market::Candle;
use crate::domain::ports::MarketDataProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

pub struct YahooMarketDataProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooMarketDataProvider {
    pub fn new(base_url: String) -> Self {
        // Yahoo rejects requests without a browser-ish user agent
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) pricecast/0.1")
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize, Default)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

fn column(col: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
    col.as_ref()?.get(i).copied().flatten()
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn daily_candles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Candle>> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive upstream, so push it past the end of day
        let period2 = end
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
            .and_utc()
            .timestamp();

        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .context("Failed to fetch chart data from Yahoo Finance")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Yahoo chart fetch failed ({}): {}", status, error_text);
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .context("Failed to parse Yahoo chart response")?;

        if let Some(err) = envelope.chart.error {
            anyhow::bail!("Yahoo chart API error for {}: {}", ticker, err);
        }

        let Some(result) = envelope
            .chart
            .result
            .and_then(|mut r| (!r.is_empty()).then(|| r.remove(0)))
        else {
            return Ok(Vec::new());
        };

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let candles: Vec<Candle> = timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let date = DateTime::from_timestamp(ts, 0)?.date_naive();
                // A bar without a close is unusable downstream
                let close = column(&quote.close, i)?;

                Some(Candle {
                    date,
                    open: Decimal::from_f64_retain(column(&quote.open, i).unwrap_or(close))
                        .unwrap_or(Decimal::ZERO),
                    high: Decimal::from_f64_retain(column(&quote.high, i).unwrap_or(close))
                        .unwrap_or(Decimal::ZERO),
                    low: Decimal::from_f64_retain(column(&quote.low, i).unwrap_or(close))
                        .unwrap_or(Decimal::ZERO),
                    close: Decimal::from_f64_retain(close).unwrap_or(Decimal::ZERO),
                    volume: Decimal::from_f64_retain(column(&quote.volume, i).unwrap_or(0.0))
                        .unwrap_or(Decimal::ZERO),
                })
            })
            .collect();

        info!(
            "YahooMarketDataProvider: Fetched {} bars for {}",
            candles.len(),
            ticker
        );

        Ok(candles)
    }
}
