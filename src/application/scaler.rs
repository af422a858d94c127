use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Pre-fit min-max normalization, persisted as JSON next to its model.
///
/// The fields mirror the fitted attributes of the scaler the models were
/// trained against. The same instance must scale the input window and invert
/// the model output; pairing a window with another instrument's scaler
/// silently corrupts the forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: f64,
    pub data_max: f64,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

impl MinMaxScaler {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler file {:?}", path))?;
        let scaler: MinMaxScaler = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler file {:?}", path))?;
        Ok(scaler)
    }

    fn scale(&self) -> f64 {
        let (lo, hi) = self.feature_range;
        (hi - lo) / (self.data_max - self.data_min)
    }

    pub fn transform(&self, x: f64) -> f64 {
        let (lo, _) = self.feature_range;
        (x - self.data_min) * self.scale() + lo
    }

    pub fn inverse_transform(&self, y: f64) -> f64 {
        let (lo, _) = self.feature_range;
        (y - lo) / self.scale() + self.data_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> MinMaxScaler {
        MinMaxScaler {
            data_min: 10.0,
            data_max: 410.0,
            feature_range: (0.0, 1.0),
        }
    }

    #[test]
    fn test_transform_maps_bounds_to_feature_range() {
        let s = scaler();
        assert!((s.transform(10.0) - 0.0).abs() < 1e-12);
        assert!((s.transform(410.0) - 1.0).abs() < 1e-12);
        assert!((s.transform(210.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let s = scaler();
        for &x in &[10.0, 37.25, 199.99, 410.0, 512.3] {
            let back = s.inverse_transform(s.transform(x));
            assert!((back - x).abs() < 1e-9, "round trip drifted for {}", x);
        }
    }

    #[test]
    fn test_deserializes_without_feature_range() {
        let s: MinMaxScaler =
            serde_json::from_str(r#"{"data_min": 1.0, "data_max": 2.0}"#).unwrap();
        assert_eq!(s.feature_range, (0.0, 1.0));
    }
}
