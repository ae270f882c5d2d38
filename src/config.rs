use std::env;
use std::time::Duration;

/// Gateway configuration parsed from environment variables.
///
/// Read once at startup; a missing required variable aborts the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub kafka_host: String,
    pub kafka_port: u16,
    pub argo_server: String,
    pub host: String,
    pub port: u16,
    pub publish_timeout: Duration,
    pub argo_timeout: Duration,
    pub strict_intent_keys: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let kafka_host = env::var("ISSM_KAFKA_HOST")
            .map_err(|_| "ISSM_KAFKA_HOST must be set".to_string())?;

        let kafka_port: u16 = env::var("ISSM_KAFKA_PORT")
            .unwrap_or_else(|_| "9092".to_string())
            .parse()
            .map_err(|_| "ISSM_KAFKA_PORT must be a valid u16".to_string())?;

        let argo_server = env::var("ARGO_SERVER")
            .map_err(|_| "ARGO_SERVER must be set".to_string())?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("LISTEN_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "LISTEN_PORT must be a valid u16".to_string())?;

        let publish_timeout_secs: u64 = env::var("ISSM_KAFKA_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "ISSM_KAFKA_TIMEOUT must be a number of seconds".to_string())?;

        let argo_timeout_secs: u64 = env::var("ARGO_TIMEOUT")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| "ARGO_TIMEOUT must be a number of seconds".to_string())?;

        let strict_intent_keys = env::var("ISSM_STRICT_INTENT_KEYS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            kafka_host,
            kafka_port,
            argo_server,
            host,
            port,
            publish_timeout: Duration::from_secs(publish_timeout_secs),
            argo_timeout: Duration::from_secs(argo_timeout_secs),
            strict_intent_keys,
        })
    }

    /// Broker bootstrap address in `host:port` form.
    pub fn kafka_bootstrap(&self) -> String {
        format!("{}:{}", self.kafka_host, self.kafka_port)
    }
}
