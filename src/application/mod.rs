pub mod artifacts;
pub mod model;
pub mod predictor;
pub mod scaler;
pub mod service;
