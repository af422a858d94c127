use crate::domain::errors::ForecastError;
use ort::session::Session;
use std::path::Path;

/// A single-step-ahead sequence regressor.
///
/// Takes a normalized window of closing prices and returns one normalized
/// forecast for the step after the window.
pub trait SequenceModel: Send {
    fn forecast(&mut self, window: &[f32]) -> Result<f32, ForecastError>;

    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn SequenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceModel")
            .field("name", &self.name())
            .finish()
    }
}

/// ONNX-exported LSTM, loaded fresh per prediction.
///
/// Input contract is a (1, W, 1) f32 tensor; output is (1, 1).
pub struct OnnxModel {
    session: Session,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, ForecastError> {
        let session = Session::builder()
            .map_err(|e| ForecastError::Inference {
                reason: format!("Failed to create ONNX session builder: {}", e),
            })?
            .commit_from_file(path)
            .map_err(|e| ForecastError::Inference {
                reason: format!("Failed to load ONNX model {:?}: {}", path, e),
            })?;

        Ok(Self { session })
    }
}

impl SequenceModel for OnnxModel {
    fn forecast(&mut self, window: &[f32]) -> Result<f32, ForecastError> {
        // Single batch, one feature per step
        let shape = vec![1, window.len(), 1];

        let input_value = ort::value::Value::from_array((shape.as_slice(), window.to_vec()))
            .map_err(|e| ForecastError::Inference {
                reason: format!("Input value creation failed: {}", e),
            })?;

        let inputs = ort::inputs![input_value];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| ForecastError::Inference {
                reason: format!("Model run failed: {}", e),
            })?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or(ForecastError::Inference {
                reason: "Model produced no outputs".to_string(),
            })?;

        let data = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| ForecastError::Inference {
                reason: format!("Output extraction failed: {}", e),
            })?;

        data.1.iter().next().copied().ok_or(ForecastError::Inference {
            reason: "Model output tensor was empty".to_string(),
        })
    }

    fn name(&self) -> &str {
        "ONNX Runtime (LSTM)"
    }
}
