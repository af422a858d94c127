use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar as returned by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Closing prices indexed by trading day, strictly increasing by date.
///
/// Non-trading days are simply absent; there is no interpolation and the
/// window math downstream counts observations, not calendar days.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Builds a series from provider candles, dropping rows without a usable
    /// close. Input is sorted and de-duplicated by date.
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut rows: Vec<(NaiveDate, f64)> = candles
            .iter()
            .filter_map(|c| c.close.to_f64().map(|close| (c.date, close)))
            .collect();
        rows.sort_by_key(|(date, _)| *date);
        rows.dedup_by_key(|(date, _)| *date);

        let (dates, closes) = rows.into_iter().unzip();
        Self { dates, closes }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Zero-based position of `date` in the index. Exact match only; a
    /// weekend or holiday has no position.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Closing price on `date`, if it is a trading day in the series.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.position(date).map(|idx| self.closes[idx])
    }

    /// The `len` closes ending at and including `end_idx`.
    ///
    /// Callers must have verified `end_idx >= len - 1`.
    pub fn window(&self, end_idx: usize, len: usize) -> &[f64] {
        &self.closes[end_idx + 1 - len..=end_idx]
    }
}

/// A single day's forecast, with the observed close when the day traded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub ticker: String,
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub actual_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn candle(date: &str, close: f64) -> Candle {
        let d = Decimal::from_f64(close).unwrap();
        Candle {
            date: date.parse().unwrap(),
            open: d,
            high: d,
            low: d,
            close: d,
            volume: Decimal::from(1000),
        }
    }

    #[test]
    fn test_series_orders_and_dedups() {
        let candles = vec![
            candle("2024-01-03", 3.0),
            candle("2024-01-02", 2.0),
            candle("2024-01-03", 3.5),
        ];
        let series = PriceSeries::from_candles(&candles);

        assert_eq!(series.len(), 2);
        assert_eq!(series.position("2024-01-02".parse().unwrap()), Some(0));
        assert_eq!(series.position("2024-01-03".parse().unwrap()), Some(1));
    }

    #[test]
    fn test_position_is_exact_match_only() {
        let series = PriceSeries::from_candles(&[
            candle("2024-01-05", 1.0), // Friday
            candle("2024-01-08", 2.0), // Monday
        ]);

        // The weekend in between has no position.
        assert_eq!(series.position("2024-01-06".parse().unwrap()), None);
        assert_eq!(series.position("2024-01-07".parse().unwrap()), None);
    }

    #[test]
    fn test_window_ends_at_index() {
        let candles: Vec<Candle> = (1..=5)
            .map(|d| candle(&format!("2024-01-0{}", d), d as f64))
            .collect();
        let series = PriceSeries::from_candles(&candles);

        assert_eq!(series.window(4, 3), &[3.0, 4.0, 5.0]);
        assert_eq!(series.window(2, 3), &[1.0, 2.0, 3.0]);
    }
}
