use crate::errors::{DeskError, DeskResult};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub calendar_api_base_url: String,
    pub calendar_api_key: Option<String>,
    pub default_timezone: String,
    pub default_risk_free_rate: f64,
    pub provider_timeout_secs: u64,
    pub dashboard_dir: PathBuf,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> DeskResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DeskResult<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let default_risk_free_rate = var_or("DEFAULT_RISK_FREE_RATE", "0.01")
            .parse::<f64>()
            .map_err(|e| DeskError::Config(format!("DEFAULT_RISK_FREE_RATE: {e}")))?;
        if !default_risk_free_rate.is_finite() {
            return Err(DeskError::Config(
                "DEFAULT_RISK_FREE_RATE: must be finite".into(),
            ));
        }

        let provider_timeout_secs = var_or("PROVIDER_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| DeskError::Config(format!("PROVIDER_TIMEOUT_SECS: {e}")))?;

        let server_port = var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| DeskError::Config(format!("SERVER_PORT: {e}")))?;

        Ok(Self {
            calendar_api_base_url: var_or(
                "CALENDAR_API_BASE_URL",
                "https://api.econcalendar.example/v1",
            ),
            calendar_api_key: lookup("CALENDAR_API_KEY").filter(|k| !k.trim().is_empty()),
            default_timezone: var_or("DEFAULT_TIMEZONE", "GMT"),
            default_risk_free_rate,
            provider_timeout_secs,
            dashboard_dir: PathBuf::from(var_or("DASHBOARD_DIR", "dashboard/dist")),
            server_port,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calendar_api_base_url: "https://api.econcalendar.example/v1".into(),
            calendar_api_key: None,
            default_timezone: "GMT".into(),
            default_risk_free_rate: 0.01,
            provider_timeout_secs: 10,
            dashboard_dir: PathBuf::from("dashboard/dist"),
            server_port: 3001,
        }
    }
}
