//! Turso Embedded / libSQL storage layer for named key-value slots.
//!
//! A slot is one named location holding one serialized document (the
//! product catalog lives in a single slot). The same database also keeps a
//! log of contact-form submissions. The [`SlotStore`] trait is the
//! seam the catalog writes through; [`Storage`] backs it with a local libSQL
//! database and [`MemorySlots`] keeps everything in process.
//!
//! **Access rules:**
//! - CLI admin commands: read-write via [`Storage::open`]
//! - Public listings: read-only via [`Storage::open_readonly`]
//!
//! Writers are not coordinated: the last `set` on a key wins.

mod contacts;
mod memory;
mod migrations;

use std::future::Future;
use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, params};
use pureextracts_shared::{PureExtractsError, Result};

pub use memory::MemorySlots;

/// Key-value slot access used by the catalog store.
pub trait SlotStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>>;
}

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PureExtractsError::io(parent, e))?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        tracing::debug!(path = %path.display(), "slot storage opened");
        Ok(storage)
    }

    /// Open an existing database at `path` in read-only mode.
    ///
    /// Besides the handle-level check, the connection itself is switched to
    /// `query_only`, so no statement issued through it can modify the file.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PureExtractsError::Storage(format!(
                "database not found at {}",
                path.display()
            )));
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        conn.execute_batch("PRAGMA query_only = ON;")
            .await
            .map_err(|e| PureExtractsError::Storage(format!("cannot enter read-only mode: {e}")))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Whether writes are rejected on this handle.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        PureExtractsError::Storage(format!(
                            "migration v{} failed: {e}",
                            migration.version
                        ))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.is_readonly() {
            return Err(PureExtractsError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Slot operations
    // -----------------------------------------------------------------------

    /// Read a slot value.
    pub async fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT value FROM slots WHERE key = ?1", params![key])
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(
                row.get::<String>(0)
                    .map_err(|e| PureExtractsError::Storage(e.to_string()))?,
            )),
            Ok(None) => Ok(None),
            Err(e) => Err(PureExtractsError::Storage(e.to_string())),
        }
    }

    /// Insert or replace a slot value.
    pub async fn set_slot(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at",
                params![key, value, now.as_str()],
            )
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;
        tracing::trace!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    /// When a slot was last written (RFC 3339), if it exists.
    pub async fn slot_updated_at(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT updated_at FROM slots WHERE key = ?1", params![key])
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(
                row.get::<String>(0)
                    .map_err(|e| PureExtractsError::Storage(e.to_string()))?,
            )),
            Ok(None) => Ok(None),
            Err(e) => Err(PureExtractsError::Storage(e.to_string())),
        }
    }
}

impl SlotStore for Storage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_slot(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_slot(key, value).await
    }
}
