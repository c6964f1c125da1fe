use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_base: String,
    /// Operator name stamped as `issuedBy` on newly created fee receipts.
    pub operator: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let api_base = env::var("TUITION_API_URL")
            .context("TUITION_API_URL not found. Please set it in .env file or environment")?;

        if api_base.is_empty() {
            anyhow::bail!("TUITION_API_URL is empty");
        }

        let operator = env::var("TUITION_OPERATOR").ok().filter(|s| !s.is_empty());

        Ok(Config {
            api_base: api_base.trim_end_matches('/').to_string(),
            operator,
        })
    }
}
