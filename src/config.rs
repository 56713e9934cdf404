use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::extraction::DEFAULT_HEADER_LINES;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("DEAL_OUTPUT must be 'text' or 'json', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub criteria_path: PathBuf,
    pub output: OutputFormat,
    /// Leading PDF lines re-scanned for header values.
    pub header_scan_lines: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            criteria_path: {
                let path =
                    var("CRITERIA_PATH").unwrap_or_else(|| "investment_criteria.md".to_string());
                if path.trim().is_empty() {
                    anyhow::bail!("CRITERIA_PATH cannot be empty");
                }
                PathBuf::from(path)
            },
            output: var("DEAL_OUTPUT")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<OutputFormat>())
                .transpose()?
                .unwrap_or(OutputFormat::Text),
            header_scan_lines: var("HEADER_SCAN_LINES")
                .unwrap_or_else(|| DEFAULT_HEADER_LINES.to_string())
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("HEADER_SCAN_LINES must be a number between 1-100"))
                .and_then(|lines| {
                    if !(1..=100).contains(&lines) {
                        anyhow::bail!("HEADER_SCAN_LINES must be between 1-100");
                    }
                    Ok(lines)
                })?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Criteria path: {}", config.criteria_path.display());
        tracing::debug!("Output format: {:?}", config.output);
        tracing::debug!("Header scan lines: {}", config.header_scan_lines);

        Ok(config)
    }
}
