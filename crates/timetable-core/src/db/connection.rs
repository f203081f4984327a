//! Database connection management

use crate::error::Result;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;

use super::migrations;

// A CLI `status` may read while a sync batch is being written, and the
// mirror is always rebuildable from the remote, so NORMAL sync is enough.
const MIRROR_FILE_PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode = WAL;",
    "PRAGMA synchronous = NORMAL;",
    "PRAGMA busy_timeout = 5000;",
];

/// Database wrapper for the local mirror's libSQL connection
pub struct Database {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open the mirror file at `path`, creating it and its schema if needed
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        Self::build(&path_str, MIRROR_FILE_PRAGMAS).await
    }

    /// Open a throwaway in-memory mirror (tests and dry runs)
    pub async fn open_in_memory() -> Result<Self> {
        Self::build(":memory:", &[]).await
    }

    async fn build(target: &str, pragmas: &[&str]) -> Result<Self> {
        let db = Builder::new_local(target).build().await?;
        let conn = db.connect()?;

        let database = Self { _db: db, conn };
        database.apply_pragmas(pragmas).await;
        database.migrate().await?;
        tracing::debug!("Opened timetable mirror at {target}");
        Ok(database)
    }

    /// Best effort. Pragmas go through `query` because `journal_mode` answers
    /// with a row; stepping once applies the setting.
    async fn apply_pragmas(&self, pragmas: &[&str]) {
        for pragma in pragmas {
            let applied = match self.conn.query(pragma, ()).await {
                Ok(mut rows) => rows.next().await.map(|_| ()),
                Err(error) => Err(error),
            };
            if let Err(error) = applied {
                tracing::warn!("Ignoring failed {pragma}: {error}");
            }
        }
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn).await
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
