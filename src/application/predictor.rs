use crate::application::artifacts::ArtifactStore;
use crate::domain::errors::ForecastError;
use crate::domain::market::{Prediction, PriceSeries};
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::debug;

/// The prediction pipeline: date alignment, window extraction, scaling,
/// inference, and inverse scaling.
pub struct Predictor {
    artifacts: Arc<dyn ArtifactStore>,
    window_length: usize,
}

impl Predictor {
    pub fn new(artifacts: Arc<dyn ArtifactStore>, window_length: usize) -> Self {
        Self {
            artifacts,
            window_length,
        }
    }

    /// Forecasts the close for `date` from the `window_length` observations
    /// ending at and including it.
    ///
    /// `date` must be an exact entry in the series index; there is no
    /// nearest-date fallback. The sufficiency check is on index positions:
    /// weekends and holidays are absent observations, never padding.
    pub fn predict_for_date(
        &self,
        date: NaiveDate,
        series: &PriceSeries,
        ticker: &str,
    ) -> Result<f64, ForecastError> {
        let (scaler, mut model) = self.artifacts.load(ticker)?;

        let idx = series
            .position(date)
            .ok_or_else(|| ForecastError::DateNotFound {
                date: date.to_string(),
            })?;

        if idx < self.window_length - 1 {
            return Err(ForecastError::InsufficientHistory {
                date: date.to_string(),
                available: idx,
                needed: self.window_length - 1,
            });
        }

        let window = series.window(idx, self.window_length);
        let scaled: Vec<f32> = window.iter().map(|&x| scaler.transform(x) as f32).collect();

        debug!("Running {} on {} observations for {}", model.name(), scaled.len(), ticker);
        let normalized = model.forecast(&scaled)?;

        // Raw inverse-transformed value, no rounding or clamping
        Ok(scaler.inverse_transform(normalized as f64))
    }

    /// Best-effort sweep over every calendar day in `[start, end]`.
    ///
    /// Days that cannot be predicted for any reason are skipped, not
    /// reported; consumers rely on receiving the partial curve.
    pub fn predict_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        series: &PriceSeries,
        ticker: &str,
    ) -> Vec<Prediction> {
        let mut predictions = Vec::new();
        let mut day = start;

        while day <= end {
            match self.predict_for_date(day, series, ticker) {
                Ok(predicted_price) => predictions.push(Prediction {
                    ticker: ticker.to_string(),
                    date: day,
                    predicted_price,
                    actual_price: series.close_on(day),
                }),
                Err(e) => debug!("Skipping {} in range sweep: {}", day, e),
            }

            let Some(next) = day.checked_add_days(Days::new(1)) else {
                break;
            };
            day = next;
        }

        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{MockArtifactStore, business_day_candles};

    fn series_of(days: usize) -> PriceSeries {
        let start = "2024-01-02".parse().unwrap();
        PriceSeries::from_candles(&business_day_candles(start, days, 100.0))
    }

    fn predictor() -> Predictor {
        Predictor::new(Arc::new(MockArtifactStore::passthrough()), 30)
    }

    #[test]
    fn test_valid_date_returns_finite_forecast() {
        let series = series_of(60);
        // 2024-02-13 sits at idx 30, one past the minimum window
        let price = predictor()
            .predict_for_date("2024-02-13".parse().unwrap(), &series, "TSLA")
            .unwrap();
        assert!(price.is_finite());
        assert!(price > 0.0);
    }

    #[test]
    fn test_non_trading_day_is_date_not_found() {
        let series = series_of(60);
        let err = predictor()
            .predict_for_date("2024-01-06".parse().unwrap(), &series, "TSLA")
            .unwrap_err();
        assert!(matches!(err, ForecastError::DateNotFound { .. }));
    }

    #[test]
    fn test_first_trading_days_are_insufficient() {
        let series = series_of(60);
        // idx 28 is one short of the 30-observation window
        let err = predictor()
            .predict_for_date("2024-02-09".parse().unwrap(), &series, "TSLA")
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory {
                available: 28,
                needed: 29,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_artifacts_take_precedence_over_bad_date() {
        let series = series_of(60);
        let predictor = Predictor::new(Arc::new(MockArtifactStore::missing()), 30);
        let err = predictor
            .predict_for_date("1900-01-01".parse().unwrap(), &series, "TSLA")
            .unwrap_err();
        assert!(matches!(err, ForecastError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_range_skips_failures_and_stays_in_bounds() {
        let series = series_of(60);
        let start: NaiveDate = "2024-02-10".parse().unwrap();
        let end: NaiveDate = "2024-02-20".parse().unwrap();

        let predictions = predictor().predict_range(start, end, &series, "TSLA");

        // 11 calendar days, weekends silently dropped
        assert!(predictions.len() <= 11);
        assert!(!predictions.is_empty());
        for p in &predictions {
            assert!(p.date >= start && p.date <= end);
            assert!(p.predicted_price.is_finite());
            // every surviving day is a trading day, so the actual is present
            assert!(p.actual_price.is_some());
        }
    }

    #[test]
    fn test_range_never_aborts_on_artifact_failure() {
        let series = series_of(60);
        let predictor = Predictor::new(Arc::new(MockArtifactStore::missing()), 30);
        let predictions = predictor.predict_range(
            "2024-02-10".parse().unwrap(),
            "2024-02-20".parse().unwrap(),
            &series,
            "TSLA",
        );
        assert!(predictions.is_empty());
    }
}
