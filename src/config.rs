use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Yahoo,
    Mock,
}

impl FromStr for DataSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(DataSource::Yahoo),
            "mock" => Ok(DataSource::Mock),
            _ => anyhow::bail!("Invalid DATA_SOURCE: {}. Must be 'yahoo' or 'mock'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_source: DataSource,
    pub bind_addr: String,
    pub models_path: PathBuf,
    pub yahoo_base_url: String,
    pub window_length: usize,
    /// Fixed fetch range used to assemble the asset series for predictions.
    pub series_start: NaiveDate,
    pub series_end: NaiveDate,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_source_str = env::var("DATA_SOURCE").unwrap_or_else(|_| "yahoo".to_string());
        let data_source = DataSource::from_str(&data_source_str)?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let models_path =
            PathBuf::from(env::var("MODELS_PATH").unwrap_or_else(|_| "models".to_string()));

        let yahoo_base_url = env::var("YAHOO_BASE_URL")
            .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string());

        let window_length = env::var("WINDOW_LENGTH")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<usize>()
            .context("Failed to parse WINDOW_LENGTH")?;

        let series_start = env::var("SERIES_START")
            .unwrap_or_else(|_| "2015-07-01".to_string())
            .parse::<NaiveDate>()
            .context("Failed to parse SERIES_START")?;

        let series_end = env::var("SERIES_END")
            .unwrap_or_else(|_| "2025-07-31".to_string())
            .parse::<NaiveDate>()
            .context("Failed to parse SERIES_END")?;

        anyhow::ensure!(window_length > 0, "WINDOW_LENGTH must be positive");

        Ok(Self {
            data_source,
            bind_addr,
            models_path,
            yahoo_base_url,
            window_length,
            series_start,
            series_end,
        })
    }
}
