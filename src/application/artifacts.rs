use crate::application::model::{OnnxModel, SequenceModel};
use crate::application::scaler::MinMaxScaler;
use crate::domain::errors::ForecastError;
use std::path::PathBuf;
use tracing::debug;

/// Resolves the scaler/model pair trained for one instrument.
///
/// The pair is loaded fresh on every call and dropped after the prediction;
/// there is deliberately no cache behind this trait.
pub trait ArtifactStore: Send + Sync {
    fn load(&self, ticker: &str)
    -> Result<(MinMaxScaler, Box<dyn SequenceModel>), ForecastError>;
}

/// Filesystem store with the `lstm_{TICKER}_scaler.json` /
/// `lstm_{TICKER}_model.onnx` naming convention.
pub struct FsArtifactStore {
    models_path: PathBuf,
}

impl FsArtifactStore {
    pub fn new(models_path: impl Into<PathBuf>) -> Self {
        Self {
            models_path: models_path.into(),
        }
    }

    fn scaler_path(&self, ticker: &str) -> PathBuf {
        self.models_path.join(format!("lstm_{}_scaler.json", ticker))
    }

    fn model_path(&self, ticker: &str) -> PathBuf {
        self.models_path.join(format!("lstm_{}_model.onnx", ticker))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn load(
        &self,
        ticker: &str,
    ) -> Result<(MinMaxScaler, Box<dyn SequenceModel>), ForecastError> {
        let scaler_path = self.scaler_path(ticker);
        let model_path = self.model_path(ticker);

        if !scaler_path.exists() || !model_path.exists() {
            return Err(ForecastError::ArtifactNotFound {
                ticker: ticker.to_string(),
            });
        }

        debug!("Loading artifacts for {} from {:?}", ticker, self.models_path);

        let scaler =
            MinMaxScaler::from_json_file(&scaler_path).map_err(|e| ForecastError::Inference {
                reason: e.to_string(),
            })?;
        let model = OnnxModel::load(&model_path)?;

        Ok((scaler, Box::new(model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifacts_signal_not_found() {
        let store = FsArtifactStore::new("this/path/does/not/exist");
        let err = store.load("TSLA").unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ArtifactNotFound { ref ticker } if ticker == "TSLA"
        ));
    }

    #[test]
    fn test_naming_convention() {
        let store = FsArtifactStore::new("models");
        assert_eq!(
            store.scaler_path("BTC-USD"),
            PathBuf::from("models/lstm_BTC-USD_scaler.json")
        );
        assert_eq!(
            store.model_path("BTC-USD"),
            PathBuf::from("models/lstm_BTC-USD_model.onnx")
        );
    }
}
