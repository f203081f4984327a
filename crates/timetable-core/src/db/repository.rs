//! Mirror repository implementation

use libsql::params::Params;
use libsql::{Connection, Value};

use super::tables::MirrorTable;
use crate::error::{Error, Result};
use crate::models::{ensure_filterable, Collection, FieldFilter};

/// Trait for local mirror storage operations (async)
#[allow(async_fn_in_trait)]
pub trait MirrorRepository {
    /// Insert or replace a record by id
    async fn upsert<T: MirrorTable>(&self, record: &T) -> Result<()>;

    /// Insert or replace a batch of records in one transaction
    async fn upsert_all<T: MirrorTable>(&self, records: &[T]) -> Result<()>;

    /// All records of a kind, in display order
    async fn get_all<T: MirrorTable>(&self) -> Result<Vec<T>>;

    /// A record by id, `None` when absent
    async fn get_by_id<T: MirrorTable>(&self, id: &str) -> Result<Option<T>>;

    /// Records matching every filter, in display order
    async fn query_by_fields<T: MirrorTable>(&self, filters: &[FieldFilter]) -> Result<Vec<T>>;

    /// Remove a record by id
    async fn delete<T: MirrorTable>(&self, id: &str) -> Result<()>;

    /// Number of mirrored records of a kind
    async fn count<T: MirrorTable>(&self) -> Result<u64>;

    /// Empty every entity table and the sync ledger
    async fn clear(&self) -> Result<()>;
}

/// libSQL implementation of `MirrorRepository`
pub struct LibSqlMirrorRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlMirrorRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn select_sql<T: MirrorTable>(filters: &[FieldFilter]) -> String {
        let mut sql = format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::table());
        if !filters.is_empty() {
            let conditions = filters
                .iter()
                .map(|filter| format!("{} = ?", filter.field.column()))
                .collect::<Vec<_>>()
                .join(" AND ");
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(T::ORDER_BY);
        sql
    }

    fn upsert_sql<T: MirrorTable>() -> String {
        let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
        format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({placeholders})",
            T::table(),
            T::COLUMNS.join(", ")
        )
    }

    async fn fetch<T: MirrorTable>(&self, sql: &str, values: Vec<Value>) -> Result<Vec<T>> {
        let mut rows = self.conn.query(sql, Params::Positional(values)).await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(T::from_row(&row)?);
        }
        Ok(records)
    }

    async fn insert_batch<T: MirrorTable>(&self, sql: &str, records: &[T]) -> Result<()> {
        for record in records {
            self.conn
                .execute(sql, Params::Positional(record.to_values()))
                .await?;
        }
        Ok(())
    }
}

impl MirrorRepository for LibSqlMirrorRepository<'_> {
    async fn upsert<T: MirrorTable>(&self, record: &T) -> Result<()> {
        self.conn
            .execute(&Self::upsert_sql::<T>(), Params::Positional(record.to_values()))
            .await?;
        Ok(())
    }

    async fn upsert_all<T: MirrorTable>(&self, records: &[T]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let sql = Self::upsert_sql::<T>();
        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        if let Err(e) = self.insert_batch(&sql, records).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e);
        }

        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        Ok(())
    }

    async fn get_all<T: MirrorTable>(&self) -> Result<Vec<T>> {
        self.fetch(&Self::select_sql::<T>(&[]), Vec::new()).await
    }

    async fn get_by_id<T: MirrorTable>(&self, id: &str) -> Result<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            T::COLUMNS.join(", "),
            T::table()
        );
        let mut rows = self
            .conn
            .query(&sql, Params::Positional(vec![Value::Text(id.to_string())]))
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn query_by_fields<T: MirrorTable>(&self, filters: &[FieldFilter]) -> Result<Vec<T>> {
        ensure_filterable::<T>(filters)?;

        let values = filters
            .iter()
            .map(|filter| Value::Text(filter.value.clone()))
            .collect();
        self.fetch(&Self::select_sql::<T>(filters), values).await
    }

    async fn delete<T: MirrorTable>(&self, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::table());
        let rows = self
            .conn
            .execute(&sql, Params::Positional(vec![Value::Text(id.to_string())]))
            .await?;

        if rows == 0 {
            return Err(Error::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            });
        }

        Ok(())
    }

    async fn count<T: MirrorTable>(&self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::table());
        let mut rows = self.conn.query(&sql, ()).await?;
        let count = match rows.next().await? {
            Some(row) => row.get::<i64>(0)?,
            None => 0,
        };
        u64::try_from(count).map_err(|_| Error::CorruptRecord(format!("negative count {count}")))
    }

    async fn clear(&self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        let tables = Collection::ALL
            .iter()
            .map(|collection| collection.as_str())
            .chain(std::iter::once("sync_info"));

        for table in tables {
            if let Err(e) = self.conn.execute(&format!("DELETE FROM {table}"), ()).await {
                self.conn.execute("ROLLBACK", ()).await.ok();
                return Err(e.into());
            }
        }

        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        tracing::info!("Cleared local mirror");
        Ok(())
    }
}
