//! # Tennis Club Server
//!
//! Serves the member pages and the JSON API of every club slice over
//! `Axum`, backed by `SurrealDB` and the in-process event bus.
//!
//! ## Example
//! ```no_run
//! use club_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(8000)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use club::database::Database;
use club::domain::config::{ApiConfig, DatabaseConfig, LoggingConfig};
use club::event_bus::EventBus;
use club::features::members::{self, Members};
use club::kernel::server::ApiState;
use club_logger::{Logger, parse_level};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Installs the global subscriber described by the `[logging]` section.
///
/// # Errors
/// Fails for an unknown level, a bad filter or when a subscriber is
/// already installed.
pub fn init_logging(name: &str, cfg: &LoggingConfig) -> Result<Logger> {
    let mut builder = Logger::builder(name).level(parse_level(&cfg.level)?).json(cfg.json);
    if let Some(filter) = &cfg.filter {
        builder = builder.filter(filter);
    }
    if let Some(directory) = &cfg.directory {
        builder = builder.directory(directory);
    }
    Ok(builder.init()?)
}

/// Connects to the configured database and applies every slice migration.
///
/// # Errors
/// Fails when the database is unreachable, rejects the credentials or a
/// migration does not apply.
pub async fn connect(cfg: &DatabaseConfig) -> Result<Database> {
    let mut builder = Database::builder().url(&cfg.url).session(&cfg.namespace, &cfg.database);
    if let Some(creds) = &cfg.credentials {
        builder = builder.auth(&creds.username, &creds.password);
    }
    let db = builder.init().await.context("Failed to establish database connection")?;

    let report = db.migrate(&club::migrations()).await.context("Failed to apply migrations")?;
    info!(applied = report.applied.len(), skipped = report.skipped.len(), "Schema up to date");
    Ok(db)
}

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    warn!("SSL private key {} is readable by others (should be 600)", ssl.key.display());
                }
            }
        }
        Ok(())
    }

    /// Connects the database, starts every slice and assembles the state.
    ///
    /// With `database.seed` set, an empty member table is filled with the
    /// demo members.
    ///
    /// # Errors
    /// Missing SSL files, an unreachable database, a failed migration or a
    /// slice that cannot start.
    pub async fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        let db = connect(&self.cfg.database).await?;

        let events = EventBus::new();
        let slices = club::init(&self.cfg, &db, &events).context("Club bootstrap failed")?;

        let seed = self.cfg.database.seed;
        let state = ApiState::builder()
            .config(self.cfg)
            .db(db)
            .events(events)
            .register_slices(slices)
            .build()
            .context("Failed to finalize API state registry")?;

        if seed {
            seed_members(&state).await?;
        }
        Ok(Server { state })
    }
}

async fn seed_members(state: &ApiState) -> Result<()> {
    let repository = state.try_get_slice::<Members>()?.repository();
    if repository.count().await? > 0 {
        info!("Members present; skipping demo data");
        return Ok(());
    }
    let report = members::seed::seed(repository, true).await?;
    info!(created = report.created.len(), "Demo members created");
    Ok(())
}

/// A fully initialized server ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application: pages, JSON API, health and API explorer.
    pub fn app(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Serves until Ctrl+C or SIGTERM, then drains open connections.
    ///
    /// # Errors
    /// Fails when the address cannot be bound or the certificates do not load.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        info!(address = %address, ssl = cfg.server.ssl.is_some(), "Starting server");

        let app = self.app();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&ssl_config.cert, &ssl_config.key)
                .await
                .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
