//! # Database Infrastructure
//!
//! Connects the club services to [SurrealDB](https://surrealdb.com) and owns the
//! two pieces of shared persistence plumbing: schema migrations and per-table
//! id sequences.
//!
//! ## Key Features
//! - **Engine Agnostic**: `mem://`, `rocksdb://`, `ws://` and `http://` through the `any` engine.
//! - **Resilient Connectivity**: health checks are retried while the engine starts.
//! - **Stable Ids**: [`Database::next_id`] hands out integer ids that are never reused.
//!
//! ## Example
//!
//! ```rust
//! use club_database::{Database, DatabaseError, Migration};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder().url("mem://").session("club", "core").init().await?;
//!
//!     db.migrate(&[Migration::new("members", "0001", "DEFINE TABLE OVERWRITE member SCHEMALESS;")])
//!         .await?;
//!     assert_eq!(db.next_id("member").await?, 1);
//!
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use migrations::{Migration, MigrationReport};

use migrations::MigrationRunner;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use surrealdb::types::SurrealValue;
use tracing::{debug, info, instrument, warn};

const HEALTH_ATTEMPTS: u32 = 3;
const HEALTH_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        debug!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// Shared `SurrealDB` session.
///
/// Cloning is cheap; every clone talks to the same namespace and database.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.ns
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.db
    }

    /// Applies the migrations that have not run yet, in the given order.
    ///
    /// # Errors
    /// [`DatabaseError::Migration`] when a recorded migration was edited,
    /// [`DatabaseError::Surreal`] when a script fails. A failing script leaves
    /// no trace because each one runs in its own transaction.
    #[instrument(skip_all, fields(count = migrations.len()))]
    pub async fn migrate(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        let report = MigrationRunner::new(&self.inner.instance).run(migrations).await?;
        for key in &report.skipped {
            debug!(migration = %key, "Migration already applied");
        }
        for key in &report.applied {
            info!(migration = %key, "Applied migration");
        }
        Ok(report)
    }

    /// Returns the next integer id for `table`.
    ///
    /// Sequences live in the `id_sequence` table, start at 1 and only grow,
    /// so ids of deleted records are never handed out again.
    ///
    /// # Errors
    /// [`DatabaseError::Surreal`] if the sequence record cannot be updated.
    pub async fn next_id(&self, table: &str) -> Result<i64, DatabaseError> {
        let sequence = self
            .inner
            .instance
            .query(format!("UPSERT id_sequence:{table} SET seq = (seq OR 0) + 1 RETURN seq;"))
            .await
            .context(format!("Advancing {table} sequence"))?
            .take::<Vec<Sequence>>(0)
            .context(format!("Reading {table} sequence"))?;

        sequence.first().map(|s| s.seq).ok_or_else(|| DatabaseError::Internal {
            message: format!("sequence for {table} returned no value").into(),
            context: None,
        })
    }
}

/// Whether `error` is a write rejected by the unique index `index`.
///
/// Lets a repository turn a lost check-then-write race into the same
/// validation message its own check produces.
#[must_use]
pub fn violates_unique_index(error: &surrealdb::Error, index: &str) -> bool {
    let message = error.to_string();
    message.contains("already contains") && message.contains(&format!("`{index}`"))
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

#[derive(Debug, SurrealValue)]
struct Sequence {
    seq: i64,
}

/// Builder for a [`Database`] session.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
}

impl DatabaseBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Signs in as a root user after connecting.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Connects, waits for the engine to become healthy, signs in when
    /// credentials were given and selects the namespace and database.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if the url, namespace or database is missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or stays unhealthy.
    /// * [`DatabaseError::Auth`] if the credentials are rejected.
    /// * [`DatabaseError::Surreal`] if the session cannot be activated.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = required(self.url, "URL")?;
        let ns = required(self.ns, "Namespace")?;
        let db = required(self.db, "Database")?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        let mut delay = HEALTH_BACKOFF;
        for attempt in 1..=HEALTH_ATTEMPTS {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == HEALTH_ATTEMPTS {
                return Err(DatabaseError::Connection {
                    message: "Unhealthy after retries".into(),
                    context: Some(url.into()),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string().into(), context: Some(url.into()) }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        Ok(Database { inner: Arc::new(DatabaseInner { instance, ns, db }) })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, DatabaseError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| DatabaseError::Validation {
        message: format!("{name} is required").into(),
        context: None,
    })
}
