use anyhow::{Result, anyhow};

const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    /// Timeout for the html sample handlers' outbound fetches.
    pub outbound_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let outbound_timeout_secs = match std::env::var("OUTBOUND_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow!("OUTBOUND_TIMEOUT_SECS must be an integer, got {raw:?}"))?,
            Err(_) => DEFAULT_OUTBOUND_TIMEOUT_SECS,
        };

        Ok(Self {
            cors_allowed_origins,
            outbound_timeout_secs,
        })
    }
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: Vec::new(),
            outbound_timeout_secs: DEFAULT_OUTBOUND_TIMEOUT_SECS,
        }
    }
}
