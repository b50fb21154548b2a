use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";
/// Prefix of the environment overrides (`CLUB__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "CLUB";

#[club_derive::club_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration file and overlays `CLUB__`-prefixed environment variables.
///
/// Nested keys are separated by a double underscore, so
/// `CLUB__DATABASE__URL=ws://localhost:8001` overrides `database.url`.
/// Without a path [`DEFAULT_CONFIG_PATH`] is used; the file must exist.
///
/// # Errors
/// [`ConfigError::Config`] if the file is missing or unreadable, or if the
/// merged values do not fit `T`.
///
/// # Example
/// ```rust,no_run
/// use club_kernel::config::load_config;
/// use club_kernel::domain::config::ApiConfig;
///
/// let cfg: ApiConfig = load_config(Some("config/server.toml")).unwrap();
/// println!("{}", cfg.server.port);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", path.display());

    Config::builder()
        .add_source(File::from(path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context(format!("Reading {}", path.display()))?
        .try_deserialize::<T>()
        .context("Deserializing configuration")
}
