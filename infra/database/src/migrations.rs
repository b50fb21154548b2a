use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// A versioned schema script owned by one feature slice.
///
/// Scripts are applied once, in the order they are handed to
/// [`Database::migrate`](crate::Database::migrate), and recorded in the
/// `migration` table together with a checksum of their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Stable fingerprint of the script text.
    #[must_use]
    pub fn checksum(&self) -> String {
        format!("{:016x}", fxhash::hash64(self.script))
    }

    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

/// Outcome of a migration run, as `slice:version` keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        let mut report = MigrationReport::default();
        let applied = self.applied().await?;

        for migration in migrations {
            let key = migration.key();
            if let Some(existing) = applied.get(&key) {
                ensure_checksum_match(migration, existing)?;
                report.skipped.push(key);
                continue;
            }

            self.apply(migration).await?;
            report.applied.push(key);
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum, applied_at: time::now() }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!("Applying migration {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Applying migration {}", migration.key()))?;

        Ok(())
    }

    async fn applied(&self) -> Result<FxHashMap<String, String>, DatabaseError> {
        self.db
            .query("DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;")
            .await
            .context("Preparing migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry.checksum))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let checksum = migration.checksum();
    if existing == checksum {
        return Ok(());
    }
    Err(DatabaseError::Migration {
        message: format!(
            "checksum mismatch for {} (recorded {existing}, script {checksum})",
            migration.key()
        )
        .into(),
        context: Some("Migration already applied with a different script".into()),
    })
}
