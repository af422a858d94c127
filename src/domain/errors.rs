use thiserror::Error;

/// Failures of the forecasting pipeline and its market-data boundary.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Could not fetch data for {ticker}: no rows in the requested range")]
    NoData { ticker: String },

    #[error("Date {date} not found in asset series")]
    DateNotFound { date: String },

    #[error("Not enough historical data before {date}: {available} points available, {needed} required")]
    InsufficientHistory {
        date: String,
        available: usize,
        needed: usize,
    },

    #[error("Model files for {ticker} not found")]
    ArtifactNotFound { ticker: String },

    #[error("Inference failed: {reason}")]
    Inference { reason: String },

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_history_formatting() {
        let err = ForecastError::InsufficientHistory {
            date: "2015-07-10".to_string(),
            available: 7,
            needed: 29,
        };

        let msg = err.to_string();
        assert!(msg.contains("2015-07-10"));
        assert!(msg.contains("7"));
        assert!(msg.contains("29"));
    }

    #[test]
    fn test_artifact_not_found_formatting() {
        let err = ForecastError::ArtifactNotFound {
            ticker: "TSLA".to_string(),
        };
        assert_eq!(err.to_string(), "Model files for TSLA not found");
    }
}
