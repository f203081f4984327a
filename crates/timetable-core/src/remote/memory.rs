//! In-process remote store

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::models::{Collection, FieldFilter, Record};

/// Remote store held in memory as JSON documents, keyed by collection and id.
///
/// Can be switched offline to simulate an outage, and slowed down to
/// exercise fetch timeouts.
#[derive(Debug)]
pub struct MemoryRemote {
    documents: Mutex<HashMap<Collection, BTreeMap<String, Value>>>,
    online: AtomicBool,
    latency: Option<Duration>,
    requests: AtomicUsize,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
            latency: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Delay every request by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Load documents without going through the online check.
    pub async fn seed<T: Record>(&self, records: &[T]) -> RemoteResult<()> {
        let mut documents = self.documents.lock().await;
        let collection = documents.entry(T::COLLECTION).or_default();
        for record in records {
            collection.insert(record.id().to_string(), to_document(record)?);
        }
        Ok(())
    }

    /// Insert a raw document, bypassing typed serialization.
    pub async fn seed_raw(&self, collection: Collection, id: impl Into<String>, document: Value) {
        self.documents
            .lock()
            .await
            .entry(collection)
            .or_default()
            .insert(id.into(), document);
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of documents currently held for a collection.
    pub async fn document_count(&self, collection: Collection) -> usize {
        self.documents
            .lock()
            .await
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }

    /// Requests served or refused so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn begin_request(&self) -> RemoteResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.is_online() {
            Ok(())
        } else {
            Err(RemoteError::Unavailable)
        }
    }

    async fn read_collection<T: Record>(&self) -> RemoteResult<Vec<T>> {
        let documents = self.documents.lock().await;
        documents
            .get(&T::COLLECTION)
            .into_iter()
            .flat_map(BTreeMap::values)
            .map(|document| {
                serde_json::from_value(document.clone())
                    .map_err(|error| RemoteError::Malformed(error.to_string()))
            })
            .collect()
    }
}

fn to_document<T: Record>(record: &T) -> RemoteResult<Value> {
    serde_json::to_value(record).map_err(|error| RemoteError::Malformed(error.to_string()))
}

impl RemoteStore for MemoryRemote {
    async fn fetch_all<T: Record>(&self) -> RemoteResult<Vec<T>> {
        self.begin_request().await?;
        self.read_collection().await
    }

    async fn fetch_where<T: Record>(&self, filters: &[FieldFilter]) -> RemoteResult<Vec<T>> {
        self.begin_request().await?;
        let records: Vec<T> = self.read_collection().await?;
        Ok(records
            .into_iter()
            .filter(|record| filters.iter().all(|filter| filter.matches(record)))
            .collect())
    }

    async fn set<T: Record>(&self, record: &T) -> RemoteResult<()> {
        self.begin_request().await?;
        let document = to_document(record)?;
        self.documents
            .lock()
            .await
            .entry(T::COLLECTION)
            .or_default()
            .insert(record.id().to_string(), document);
        Ok(())
    }

    async fn delete<T: Record>(&self, id: &str) -> RemoteResult<()> {
        self.begin_request().await?;
        if let Some(collection) = self.documents.lock().await.get_mut(&T::COLLECTION) {
            collection.remove(id);
        }
        Ok(())
    }
}
