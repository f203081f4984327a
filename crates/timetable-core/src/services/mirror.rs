//! Shared local mirror service used across clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{
    Database, LedgerRepository, LibSqlLedgerRepository, LibSqlMirrorRepository, MirrorRepository,
    MirrorTable,
};
use crate::models::{Collection, Field, FieldFilter, LastSync};
use crate::Result;

/// Thread-safe handle to the local mirror and its sync ledger.
#[derive(Clone)]
pub struct MirrorService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl MirrorService {
    /// Open the mirror at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::debug!("Opening local mirror at {}", db_path.display());
        let db = Database::open(&db_path).await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory mirror (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Filesystem location of the mirror, `None` when in memory.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Insert or replace one record.
    pub async fn upsert<T: MirrorTable>(&self, record: &T) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.upsert(record).await
    }

    /// Insert or replace a batch of records atomically.
    pub async fn upsert_all<T: MirrorTable>(&self, records: &[T]) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.upsert_all(records).await
    }

    /// Every mirrored record of a kind, in display order.
    pub async fn get_all<T: MirrorTable>(&self) -> Result<Vec<T>> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.get_all().await
    }

    /// Fetch a record by id.
    pub async fn get_by_id<T: MirrorTable>(&self, id: &str) -> Result<Option<T>> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.get_by_id(id).await
    }

    /// Records whose `field` equals `value`.
    pub async fn query_by_field<T: MirrorTable>(
        &self,
        field: Field,
        value: &str,
    ) -> Result<Vec<T>> {
        self.query_by_fields(&[FieldFilter::new(field, value)])
            .await
    }

    /// Records matching every filter.
    pub async fn query_by_fields<T: MirrorTable>(&self, filters: &[FieldFilter]) -> Result<Vec<T>> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.query_by_fields(filters).await
    }

    /// Remove a record by id.
    pub async fn delete<T: MirrorTable>(&self, id: &str) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.delete::<T>(id).await
    }

    /// Number of mirrored records of a kind.
    pub async fn count<T: MirrorTable>(&self) -> Result<u64> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.count::<T>().await
    }

    /// Count for a collection chosen at runtime.
    pub async fn count_collection(&self, collection: Collection) -> Result<u64> {
        use crate::models::{Classroom, Course, Department, Lecturer, TimetableEntry};

        match collection {
            Collection::Departments => self.count::<Department>().await,
            Collection::Courses => self.count::<Course>().await,
            Collection::Lecturers => self.count::<Lecturer>().await,
            Collection::Classrooms => self.count::<Classroom>().await,
            Collection::Timetable => self.count::<TimetableEntry>().await,
        }
    }

    /// Empty every entity table and the ledger.
    pub async fn clear(&self) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlMirrorRepository::new(db.connection());
        repo.clear().await
    }

    /// Stamp a collection as freshly synchronized.
    pub async fn record_sync(&self, collection: Collection, at_ms: i64) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlLedgerRepository::new(db.connection());
        repo.record_sync(collection, at_ms).await
    }

    /// Last successful sync of a collection.
    pub async fn last_sync(&self, collection: Collection) -> Result<LastSync> {
        let db = self.db.lock().await;
        let repo = LibSqlLedgerRepository::new(db.connection());
        repo.last_sync(collection).await
    }

    /// Ledger entry for every collection, in collection order.
    pub async fn ledger(&self) -> Result<Vec<(Collection, LastSync)>> {
        let db = self.db.lock().await;
        let repo = LibSqlLedgerRepository::new(db.connection());

        let mut entries = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            entries.push((collection, repo.last_sync(collection).await?));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_upsert_and_list_roundtrip() {
        let service = MirrorService::open_in_memory().await.unwrap();

        service
            .upsert(&Department::new("dep-1", "Physics", "PHY"))
            .await
            .unwrap();
        let departments = service.get_all::<Department>().await.unwrap();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0].name, "Physics");
        assert!(service.db_path().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mirror_survives_reopen() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("timetable.db");

        {
            let service = MirrorService::open_path(&db_path).await.unwrap();
            service
                .upsert(&Department::new("dep-1", "Physics", "PHY"))
                .await
                .unwrap();
            service
                .record_sync(Collection::Departments, 42)
                .await
                .unwrap();
        }

        let reopened = MirrorService::open_path(&db_path).await.unwrap();
        assert_eq!(
            reopened.get_by_id::<Department>("dep-1").await.unwrap(),
            Some(Department::new("dep-1", "Physics", "PHY"))
        );
        assert_eq!(
            reopened.last_sync(Collection::Departments).await.unwrap(),
            LastSync::At(42)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clear_resets_records_and_ledger() {
        let service = MirrorService::open_in_memory().await.unwrap();
        service
            .upsert(&Department::new("dep-1", "Physics", "PHY"))
            .await
            .unwrap();
        service
            .record_sync(Collection::Departments, 42)
            .await
            .unwrap();

        service.clear().await.unwrap();

        assert_eq!(
            service
                .count_collection(Collection::Departments)
                .await
                .unwrap(),
            0
        );
        let ledger = service.ledger().await.unwrap();
        assert_eq!(ledger.len(), Collection::ALL.len());
        assert!(ledger.iter().all(|(_, last)| last.is_never()));
    }
}
