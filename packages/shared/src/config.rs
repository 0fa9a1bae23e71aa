use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use std::fmt;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_TABLE_NAME: &str = "Games";
pub const DEFAULT_PAGE_SIZE: usize = 10;

const TABLE_NAME_VAR: &str = "GAMES_TABLE";
const ENDPOINT_VAR: &str = "DYNAMODB_ENDPOINT";
const PAGE_SIZE_VAR: &str = "GAMES_PAGE_SIZE";
const READY_ATTEMPTS_VAR: &str = "TABLE_READY_ATTEMPTS";
const READY_DELAY_VAR: &str = "TABLE_READY_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamesConfig {
    pub table_name: String,
    /// Local DynamoDB endpoint; `None` talks to the regional service.
    pub endpoint_url: Option<String>,
    pub page_size: usize,
    pub table_ready_attempts: u32,
    pub table_ready_delay: Duration,
}

impl Default for GamesConfig {
    fn default() -> Self {
        GamesConfig {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            endpoint_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            table_ready_attempts: 40,
            table_ready_delay: Duration::from_millis(3000),
        }
    }
}

impl GamesConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or blank keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = GamesConfig::default();

        if let Some(table_name) = get(TABLE_NAME_VAR) {
            config.table_name = table_name;
        }
        config.endpoint_url = get(ENDPOINT_VAR);
        if let Some(raw) = get(PAGE_SIZE_VAR) {
            config.page_size = parse_positive(PAGE_SIZE_VAR, &raw)?;
        }
        if let Some(raw) = get(READY_ATTEMPTS_VAR) {
            config.table_ready_attempts = parse_positive(READY_ATTEMPTS_VAR, &raw)?;
        }
        if let Some(raw) = get(READY_DELAY_VAR) {
            let millis: u64 = raw.parse().map_err(|_| invalid(READY_DELAY_VAR, &raw))?;
            config.table_ready_delay = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(invalid(key, raw)),
    }
}

pub async fn build_client(config: &GamesConfig) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(endpoint) = &config.endpoint_url {
        info!("Using DynamoDB endpoint {}", endpoint);
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = GamesConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GamesConfig::default());
        assert_eq!(config.table_name, "Games");
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_overrides_are_read() {
        let config = GamesConfig::from_lookup(lookup(&[
            ("GAMES_TABLE", "TicTacToe"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("GAMES_PAGE_SIZE", "25"),
            ("TABLE_READY_ATTEMPTS", "3"),
            ("TABLE_READY_DELAY_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.table_name, "TicTacToe");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.table_ready_attempts, 3);
        assert_eq!(config.table_ready_delay, Duration::ZERO);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config =
            GamesConfig::from_lookup(lookup(&[("GAMES_TABLE", "  "), ("DYNAMODB_ENDPOINT", "")]))
                .unwrap();
        assert_eq!(config.table_name, "Games");
        assert!(config.endpoint_url.is_none());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for (key, value) in [
            ("GAMES_PAGE_SIZE", "0"),
            ("GAMES_PAGE_SIZE", "ten"),
            ("TABLE_READY_ATTEMPTS", "-1"),
            ("TABLE_READY_DELAY_MS", "soon"),
        ] {
            let result = GamesConfig::from_lookup(lookup(&[(key, value)]));
            assert_eq!(
                result,
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            );
        }
    }
}
