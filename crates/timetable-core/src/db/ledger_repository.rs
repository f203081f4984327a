//! Sync freshness ledger repository

use libsql::Connection;

use crate::error::Result;
use crate::models::{Collection, LastSync};

/// Trait for per-collection freshness bookkeeping
#[allow(async_fn_in_trait)]
pub trait LedgerRepository {
    /// Record a successful remote sync of a collection
    async fn record_sync(&self, collection: Collection, at_ms: i64) -> Result<()>;

    /// Last successful sync of a collection
    async fn last_sync(&self, collection: Collection) -> Result<LastSync>;
}

/// libSQL implementation of `LedgerRepository`
pub struct LibSqlLedgerRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlLedgerRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl LedgerRepository for LibSqlLedgerRepository<'_> {
    async fn record_sync(&self, collection: Collection, at_ms: i64) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO sync_info (collection_name, last_sync_time) VALUES (?, ?)",
                libsql::params![collection.as_str(), at_ms],
            )
            .await?;
        tracing::info!("Recorded sync of {collection} at {at_ms}");
        Ok(())
    }

    async fn last_sync(&self, collection: Collection) -> Result<LastSync> {
        let mut rows = self
            .conn
            .query(
                "SELECT last_sync_time FROM sync_info WHERE collection_name = ?",
                [collection.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(LastSync::At(row.get(0)?)),
            None => Ok(LastSync::Never),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_never_synced() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlLedgerRepository::new(db.connection());

        for collection in Collection::ALL {
            assert_eq!(repo.last_sync(collection).await.unwrap(), LastSync::Never);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_record_overwrites_previous() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = LibSqlLedgerRepository::new(db.connection());

        repo.record_sync(Collection::Timetable, 1_000).await.unwrap();
        repo.record_sync(Collection::Timetable, 2_000).await.unwrap();

        assert_eq!(
            repo.last_sync(Collection::Timetable).await.unwrap(),
            LastSync::At(2_000)
        );
        assert_eq!(
            repo.last_sync(Collection::Courses).await.unwrap(),
            LastSync::Never
        );
    }
}
