use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::extract::DEFAULT_MAX_DOCUMENT_BYTES;
use crate::pipeline::submission::DecisionPolicy;
use crate::similarity::ScanSettings;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Every setting has a
/// default; a value that is present but malformed is an error rather than
/// being silently replaced by the default.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Upload cap in bytes (DOCSCREEN_MAX_DOCUMENT_BYTES, default 10 MiB)
    pub max_document_bytes: usize,
    /// Matches at or below this percentage are not reported (default 10)
    pub report_threshold: f64,
    /// Scores above this percentage reject the submission (default 30)
    pub reject_threshold: f64,
    /// Corpus comparisons in flight at once (default 4)
    pub concurrency: usize,
    pub comparison_timeout: Duration,
    pub scan_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let config = Self {
            db_path: env::var("DOCSCREEN_DB_PATH").unwrap_or_else(|_| "./docscreen.db".to_string()),
            max_document_bytes: parse_var("DOCSCREEN_MAX_DOCUMENT_BYTES", DEFAULT_MAX_DOCUMENT_BYTES)?,
            report_threshold: parse_var("DOCSCREEN_REPORT_THRESHOLD", 10.0)?,
            reject_threshold: parse_var("DOCSCREEN_REJECT_THRESHOLD", 30.0)?,
            concurrency: parse_var("DOCSCREEN_CONCURRENCY", 4)?,
            comparison_timeout: Duration::from_secs(parse_var(
                "DOCSCREEN_COMPARISON_TIMEOUT_SECS",
                30,
            )?),
            scan_timeout: Duration::from_secs(parse_var("DOCSCREEN_SCAN_TIMEOUT_SECS", 300)?),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("DOCSCREEN_CONCURRENCY must be at least 1");
        }
        if !(0.0..=100.0).contains(&self.report_threshold) {
            anyhow::bail!("DOCSCREEN_REPORT_THRESHOLD must be between 0 and 100");
        }
        if !(0.0..=100.0).contains(&self.reject_threshold) {
            anyhow::bail!("DOCSCREEN_REJECT_THRESHOLD must be between 0 and 100");
        }
        Ok(())
    }

    /// Settings for the similarity scanner.
    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            report_threshold: self.report_threshold,
            concurrency: self.concurrency,
            comparison_timeout: self.comparison_timeout,
            scan_timeout: self.scan_timeout,
        }
    }

    /// Policy for turning a similarity score into a status.
    pub fn decision_policy(&self) -> DecisionPolicy {
        DecisionPolicy {
            reject_threshold: self.reject_threshold,
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}
