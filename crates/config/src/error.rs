/// Errors raised loading the engine's configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("parsing config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("invalid environment override {key}: {message}")]
    Env { key: &'static str, message: String },
}
