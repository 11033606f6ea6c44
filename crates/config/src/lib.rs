//! Configuration surface (§6): a TOML file plus a small set of
//! `TOKENSCAN_`-prefixed environment variable overrides for the values an
//! operator most often needs to inject at deploy time (secrets, listen
//! address, database URL) rather than bake into the checked-in file.

mod error;
mod types;

pub use error::ConfigError;
pub use types::{
    ApiConfig, CleanupConfig, CoinmarketcapConfig, Config, EndpointConfig, TokenPriceConfig,
    TokensConfig,
};

const ENV_PREFIX: &str = "TOKENSCAN_";

/// Load configuration from `path`, then apply environment overrides.
pub fn load(path: &std::path::Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

    let mut config: Config = toml::from_str(&raw)
        .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?;

    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    if let Some(v) = env_var("DATABASE_URL") {
        config.database_url = v;
    }
    if let Some(v) = env_var("API_ADDRESS") {
        config.api.address = v;
    }
    if let Some(v) = env_var("COINMARKETCAP_API_KEY") {
        config.token_price.coinmarketcap_config.api_key = v;
    }
    if let Some(v) = env_var("USE_TEST_PRICES") {
        config.token_price.use_test_prices =
            parse_bool("USE_TEST_PRICES", &v)?;
    }
    Ok(())
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}")).ok()
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::Env {
            key,
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_toml_fills_in_documented_defaults() {
        let mut file = tempfile_with_contents(
            r#"
            database_url = "postgres://localhost/tokenscan"
            "#,
        );
        let config = load(file.path()).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/tokenscan");
        assert_eq!(config.tokens.block_batch_size, 5_000);
        assert_eq!(config.tokens.chain_reorg_buffer, 15);
        assert_eq!(config.header_cleanup.retain_days, 30);
        assert_eq!(config.api.address, "0.0.0.0:8080");

        drop(file);
    }

    #[test]
    fn env_override_wins_over_file() {
        let file = tempfile_with_contents(
            r#"
            database_url = "postgres://localhost/tokenscan"
            "#,
        );

        std::env::set_var("TOKENSCAN_API_ADDRESS", "127.0.0.1:9999");
        let config = load(file.path()).unwrap();
        std::env::remove_var("TOKENSCAN_API_ADDRESS");

        assert_eq!(config.api.address, "127.0.0.1:9999");
        drop(file);
    }

    fn tempfile_with_contents(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }
}
