//! Remote store backed by a directory of JSON collection exports.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use timetable_core::models::{Collection, FieldFilter, Record};
use timetable_core::remote::{RemoteError, RemoteResult, RemoteStore};

/// Reads `<dir>/<collection>.json`, each file a JSON array of documents.
///
/// An absent directory or file behaves like an unreachable remote.
#[derive(Debug, Clone)]
pub struct JsonDirRemote {
    dir: PathBuf,
}

impl JsonDirRemote {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: Collection, missing_ok: bool) -> RemoteResult<Vec<Value>> {
        let path = self.collection_path(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(error) if missing_ok && error.kind() == io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(RemoteError::Network(format!("{}: {error}", path.display())));
            }
        };

        serde_json::from_str(&raw)
            .map_err(|error| RemoteError::Malformed(format!("{}: {error}", path.display())))
    }

    async fn store(&self, collection: Collection, documents: &[Value]) -> RemoteResult<()> {
        let path = self.collection_path(collection);
        let raw = serde_json::to_string_pretty(documents)
            .map_err(|error| RemoteError::Malformed(error.to_string()))?;
        tokio::fs::write(&path, raw)
            .await
            .map_err(|error| RemoteError::Network(format!("{}: {error}", path.display())))
    }

    async fn read<T: Record>(&self) -> RemoteResult<Vec<T>> {
        self.load(T::COLLECTION, false)
            .await?
            .into_iter()
            .map(|document| {
                serde_json::from_value(document)
                    .map_err(|error| RemoteError::Malformed(format!("{}: {error}", T::COLLECTION)))
            })
            .collect()
    }
}

fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

impl RemoteStore for JsonDirRemote {
    async fn fetch_all<T: Record>(&self) -> RemoteResult<Vec<T>> {
        self.read().await
    }

    async fn fetch_where<T: Record>(&self, filters: &[FieldFilter]) -> RemoteResult<Vec<T>> {
        let records: Vec<T> = self.read().await?;
        Ok(records
            .into_iter()
            .filter(|record| filters.iter().all(|filter| filter.matches(record)))
            .collect())
    }

    async fn set<T: Record>(&self, record: &T) -> RemoteResult<()> {
        let document = serde_json::to_value(record)
            .map_err(|error| RemoteError::Malformed(error.to_string()))?;
        let mut documents = self.load(T::COLLECTION, true).await?;

        match documents
            .iter_mut()
            .find(|existing| document_id(existing) == Some(record.id()))
        {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
        self.store(T::COLLECTION, &documents).await
    }

    async fn delete<T: Record>(&self, id: &str) -> RemoteResult<()> {
        let mut documents = self.load(T::COLLECTION, true).await?;
        documents.retain(|document| document_id(document) != Some(id));
        self.store(T::COLLECTION, &documents).await
    }
}
