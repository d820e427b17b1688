use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tracing::warn;

/// Default base URL of the pipeline API.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Well-known development key.  Refused in production.
pub const DEV_INTERNAL_KEY: &str = "dev-internal-key-change-in-prod";

const DEFAULT_GATEWAY_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Runtime configuration, read from the environment at startup.
///
/// Variables:
///   - `API_BASE_URL`              pipeline API base (default localhost:5000)
///   - `INTERNAL_SERVICE_KEY`      shared secret for backend auth
///   - `LEADLINE_GATEWAY_ADDR`     gateway bind address (default 127.0.0.1:8000)
///   - `LEADLINE_API_TOKEN`        bearer token for the gateway; unset disables auth
///   - `LEADLINE_SESSION_TTL_SECS` identity retention per session (default 3600)
///   - `LEADLINE_ENV`              "production" tightens validation
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub internal_key: String,
    pub gateway_addr: SocketAddr,
    pub api_token: Option<String>,
    pub session_ttl: Duration,
    pub environment: String,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an explicit variable lookup.
    ///
    /// Tests use this to avoid mutating process-wide environment state.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let api_base = match get("API_BASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => url,
            None => {
                warn!("API_BASE_URL not set, using {DEFAULT_API_BASE}");
                DEFAULT_API_BASE.to_string()
            }
        };
        let api_base = api_base.trim_end_matches('/').to_string();

        let internal_key = match get("INTERNAL_SERVICE_KEY").filter(|s| !s.is_empty()) {
            Some(key) => key,
            None => {
                warn!("INTERNAL_SERVICE_KEY not set, using the development key");
                DEV_INTERNAL_KEY.to_string()
            }
        };

        let gateway_addr: SocketAddr = get("LEADLINE_GATEWAY_ADDR")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_GATEWAY_ADDR.to_string())
            .parse()
            .context("invalid LEADLINE_GATEWAY_ADDR")?;

        let api_token = get("LEADLINE_API_TOKEN").filter(|s| !s.is_empty());

        let session_ttl_secs = match get("LEADLINE_SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("invalid LEADLINE_SESSION_TTL_SECS")?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let environment = get("LEADLINE_ENV").unwrap_or_else(|| "development".to_string());

        let config = Config {
            api_base,
            internal_key,
            gateway_addr,
            api_token,
            session_ttl: Duration::from_secs(session_ttl_secs),
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate semantic constraints that parsing cannot enforce.
    fn validate(&self) -> anyhow::Result<()> {
        reqwest::Url::parse(&self.api_base)
            .with_context(|| format!("API_BASE_URL is not a valid URL: {}", self.api_base))?;

        if self.session_ttl.is_zero() {
            anyhow::bail!(
                "config: LEADLINE_SESSION_TTL_SECS=0 (session identity would expire immediately)"
            );
        }

        if self.environment == "production" && self.internal_key == DEV_INTERNAL_KEY {
            anyhow::bail!(
                "config: INTERNAL_SERVICE_KEY must be set to a real secret in production"
            );
        }

        Ok(())
    }
}
