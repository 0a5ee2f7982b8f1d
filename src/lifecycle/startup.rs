//! Startup orchestration.
//!
//! # Responsibilities
//! - Layer configuration: defaults, file, environment, command line
//! - Load the dataset and build the HTTP server
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when the store is ready)

use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{
    apply_env_with, load_config, resolve_dataset_path, validate_config, ConfigError, ServerConfig,
};
use crate::http::HttpServer;
use crate::observability::LoggingError;
use crate::routing::PatternError;
use crate::store::{load_dataset, DatasetError};

/// Fatal errors raised before the server starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("route table error: {0}")]
    Routes(#[from] PatternError),

    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Command-line overrides applied on top of file and environment settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub data_path: Option<PathBuf>,
}

/// Build the effective configuration from the process environment.
pub fn resolve_config(overrides: &Overrides) -> Result<ServerConfig, StartupError> {
    resolve_config_with(overrides, |var| std::env::var(var).ok())
}

/// Build the effective configuration, reading environment through `lookup`.
pub fn resolve_config_with<F>(overrides: &Overrides, lookup: F) -> Result<ServerConfig, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &overrides.config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    apply_env_with(&mut config, lookup)?;

    if let Some(port) = overrides.port {
        config.listener.port = port;
    }
    if let Some(path) = &overrides.data_path {
        config.dataset.path = path.clone();
        config.dataset.relative_to_executable = false;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load the dataset and assemble the server.
pub fn prepare_server(config: ServerConfig) -> Result<HttpServer, StartupError> {
    let path = resolve_dataset_path(&config)?;
    tracing::info!(path = %path.display(), "Loading dataset");

    let store = load_dataset(&path)?;
    Ok(HttpServer::new(config, store)?)
}

/// Bind the configured listener.
pub async fn bind_listener(config: &ServerConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_env_then_flags() {
        let overrides = Overrides::default();
        let config = resolve_config_with(&overrides, |_| Some("9000".into())).unwrap();
        assert_eq!(config.listener.port, 9000);

        let overrides = Overrides {
            port: Some(9100),
            ..Overrides::default()
        };
        let config = resolve_config_with(&overrides, |_| Some("9000".into())).unwrap();
        assert_eq!(config.listener.port, 9100);
    }

    #[test]
    fn test_data_flag_is_literal_path() {
        let overrides = Overrides {
            data_path: Some(PathBuf::from("fixtures/cars.csv")),
            ..Overrides::default()
        };
        let config = resolve_config_with(&overrides, |_| None).unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("fixtures/cars.csv"));
        assert!(!config.dataset.relative_to_executable);
    }

    #[test]
    fn test_bad_port_env_is_fatal() {
        let err = resolve_config_with(&Overrides::default(), |_| Some("http".into())).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Env { .. })));
    }

    #[test]
    fn test_missing_dataset_is_fatal() {
        let mut config = ServerConfig::default();
        config.dataset.path = PathBuf::from("/nonexistent/Vehicles.csv");
        let err = prepare_server(config).err().unwrap();
        assert!(matches!(err, StartupError::Dataset(DatasetError::Io { .. })));
    }

    #[test]
    fn test_dataset_served() {
        let path = std::env::temp_dir().join(format!("vehicles-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "id,make\n7,Ford\n").unwrap();

        let mut config = ServerConfig::default();
        config.dataset.path = path.clone();
        let server = prepare_server(config).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(server.store().list(), vec!["7"]);
    }

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let mut config = ServerConfig::default();
        config.listener.host = "127.0.0.1".into();
        config.listener.port = 0;
        let listener = bind_listener(&config).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
