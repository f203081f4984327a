//! Read-through synchronization between the remote store and the mirror.
//!
//! Every read tries the remote first. A successful fetch is mirrored locally
//! and stamped in the sync ledger; a failed one falls back to whatever the
//! mirror holds and leaves the ledger untouched.

use std::future::Future;

use crate::config::SyncConfig;
use crate::db::MirrorTable;
use crate::error::{Error, Result};
use crate::models::{
    ensure_filterable, Classroom, Collection, Course, Department, FieldFilter, LastSync, Lecturer,
};
use crate::remote::{RemoteError, RemoteResult, RemoteStore};
use crate::services::MirrorService;
use crate::util::unix_timestamp_ms_now;

/// Records returned by a sync, and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome<T> {
    pub records: Vec<T>,
    /// `true` when the remote failed and the records were read from the mirror
    pub from_cache: bool,
}

impl<T> SyncOutcome<T> {
    const fn fresh(records: Vec<T>) -> Self {
        Self {
            records,
            from_cache: false,
        }
    }

    const fn cached(records: Vec<T>) -> Self {
        Self {
            records,
            from_cache: true,
        }
    }
}

/// Reference collections loaded before any scheduling screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    pub departments: SyncOutcome<Department>,
    pub lecturers: SyncOutcome<Lecturer>,
    pub classrooms: SyncOutcome<Classroom>,
    pub courses: SyncOutcome<Course>,
}

impl ReferenceData {
    /// Whether any collection had to be served from the mirror.
    pub const fn any_from_cache(&self) -> bool {
        self.departments.from_cache
            || self.lecturers.from_cache
            || self.classrooms.from_cache
            || self.courses.from_cache
    }
}

/// Fetch-remote, mirror-locally, fall-back-on-failure controller.
#[derive(Clone)]
pub struct SyncController {
    mirror: MirrorService,
    config: SyncConfig,
}

impl SyncController {
    pub const fn new(mirror: MirrorService, config: SyncConfig) -> Self {
        Self { mirror, config }
    }

    pub const fn mirror(&self) -> &MirrorService {
        &self.mirror
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Synchronize a whole collection using the supplied remote fetch.
    pub async fn sync_collection<T, F, Fut>(&self, fetch: F) -> Result<SyncOutcome<T>>
    where
        T: MirrorTable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RemoteResult<Vec<T>>>,
    {
        match self.bounded(fetch()).await {
            Ok(records) => self.mirror_fetched(records).await,
            Err(error) => {
                tracing::warn!(
                    "Remote fetch of {} failed, serving local mirror: {error}",
                    T::COLLECTION
                );
                let records = self.mirror.get_all().await?;
                Ok(SyncOutcome::cached(records))
            }
        }
    }

    /// Synchronize the subset of a collection matching `filters`.
    ///
    /// A successful filtered fetch still stamps the whole collection in the
    /// ledger. On failure the mirror is queried with the same filters.
    pub async fn sync_query<T, F, Fut>(
        &self,
        filters: &[FieldFilter],
        fetch: F,
    ) -> Result<SyncOutcome<T>>
    where
        T: MirrorTable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RemoteResult<Vec<T>>>,
    {
        ensure_filterable::<T>(filters)?;

        match self.bounded(fetch()).await {
            Ok(records) => self.mirror_fetched(records).await,
            Err(error) => {
                tracing::warn!(
                    "Filtered remote fetch of {} failed, querying local mirror: {error}",
                    T::COLLECTION
                );
                let records = self.mirror.query_by_fields(filters).await?;
                Ok(SyncOutcome::cached(records))
            }
        }
    }

    /// Synchronize a whole collection from a remote store.
    pub async fn sync_all<T, R>(&self, remote: &R) -> Result<SyncOutcome<T>>
    where
        T: MirrorTable,
        R: RemoteStore,
    {
        self.sync_collection(|| remote.fetch_all::<T>()).await
    }

    /// Synchronize the records matching `filters` from a remote store.
    pub async fn sync_where<T, R>(&self, remote: &R, filters: &[FieldFilter]) -> Result<SyncOutcome<T>>
    where
        T: MirrorTable,
        R: RemoteStore,
    {
        self.sync_query(filters, || remote.fetch_where::<T>(filters))
            .await
    }

    /// Load departments, then lecturers, classrooms and courses together.
    pub async fn sync_reference_data<R: RemoteStore>(&self, remote: &R) -> Result<ReferenceData> {
        let departments = self.sync_all::<Department, R>(remote).await?;
        let (lecturers, classrooms, courses) = tokio::join!(
            self.sync_all::<Lecturer, R>(remote),
            self.sync_all::<Classroom, R>(remote),
            self.sync_all::<Course, R>(remote),
        );

        Ok(ReferenceData {
            departments,
            lecturers: lecturers?,
            classrooms: classrooms?,
            courses: courses?,
        })
    }

    /// Write a record to the remote store, then mirror it.
    ///
    /// Writes never fall back: a remote failure is returned as-is and the
    /// mirror is left untouched.
    pub async fn save<T, R>(&self, remote: &R, record: &T) -> Result<()>
    where
        T: MirrorTable,
        R: RemoteStore,
    {
        self.bounded(remote.set(record)).await?;
        self.mirror.upsert(record).await?;
        tracing::debug!("Saved {} record {}", T::COLLECTION, record.id());
        Ok(())
    }

    /// Delete a record from the remote store, then from the mirror.
    pub async fn remove<T, R>(&self, remote: &R, id: &str) -> Result<()>
    where
        T: MirrorTable,
        R: RemoteStore,
    {
        self.bounded(remote.delete::<T>(id)).await?;
        match self.mirror.delete::<T>(id).await {
            Ok(()) | Err(Error::NotFound { .. }) => {
                tracing::debug!("Removed {} record {id}", T::COLLECTION);
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    /// Last successful sync of a collection.
    pub async fn last_sync_time(&self, collection: Collection) -> Result<LastSync> {
        self.mirror.last_sync(collection).await
    }

    /// Last successful sync of every collection.
    pub async fn ledger(&self) -> Result<Vec<(Collection, LastSync)>> {
        self.mirror.ledger().await
    }

    async fn bounded<O>(&self, request: impl Future<Output = RemoteResult<O>>) -> RemoteResult<O> {
        let timeout = self.config.remote_timeout;
        tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| RemoteError::Timeout(timeout))?
    }

    async fn mirror_fetched<T: MirrorTable>(&self, mut records: Vec<T>) -> Result<SyncOutcome<T>> {
        // Same order the mirror would return on fallback
        records.sort_by(T::display_cmp);
        self.mirror.upsert_all(&records).await?;
        self.mirror
            .record_sync(T::COLLECTION, unix_timestamp_ms_now())
            .await?;
        tracing::debug!("Mirrored {} {} records", records.len(), T::COLLECTION);
        Ok(SyncOutcome::fresh(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassType, Field, Level, RoomType, Semester, TimetableEntry};
    use crate::remote::MemoryRemote;
    use chrono::{NaiveTime, Weekday};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    async fn controller() -> SyncController {
        let mirror = MirrorService::open_in_memory().await.unwrap();
        SyncController::new(mirror, SyncConfig::default())
    }

    fn entry(id: &str, day: Weekday, hour: u32, lecturer: &str) -> TimetableEntry {
        TimetableEntry {
            id: id.to_string(),
            course_id: "crs-1".to_string(),
            course_name: "Thermodynamics".to_string(),
            course_code: "PHY 301".to_string(),
            lecturer_id: lecturer.to_string(),
            lecturer_name: "Dr. Esi Owusu".to_string(),
            classroom_id: "room-1".to_string(),
            classroom_name: "Main - 12".to_string(),
            department_id: "dep-phy".to_string(),
            department_name: "Physics".to_string(),
            level: Level::L300,
            semester: Semester::Second,
            day_of_week: day,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0),
            end_time: NaiveTime::from_hms_opt(hour + 2, 0, 0),
            class_type: ClassType::Tutorial,
            last_modified: 1,
            last_modified_by: None,
        }
    }

    fn classroom(id: &str) -> Classroom {
        Classroom {
            id: id.to_string(),
            name: format!("Room {id}"),
            building_name: Some("Main".to_string()),
            floor: None,
            room_number: Some(id.to_string()),
            capacity: 60,
            room_type: RoomType::LectureHall,
            has_projector: true,
            has_air_condition: false,
            has_computers: false,
            notes: None,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn successful_fetch_is_mirrored_and_stamped() {
        let sync = controller().await;

        let outcome = sync
            .sync_collection(|| async {
                Ok::<_, RemoteError>(vec![
                    entry("t2", Weekday::Tue, 9, "lec-1"),
                    entry("t1", Weekday::Mon, 9, "lec-1"),
                ])
            })
            .await
            .unwrap();

        assert!(!outcome.from_cache);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(sync.mirror().count::<TimetableEntry>().await.unwrap(), 2);
        assert!(!sync
            .last_sync_time(Collection::Timetable)
            .await
            .unwrap()
            .is_never());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fresh_and_cached_records_share_display_order() {
        let sync = controller().await;
        let remote = MemoryRemote::new();
        remote
            .seed(&[
                entry("fri", Weekday::Fri, 9, "lec-1"),
                entry("mon-late", Weekday::Mon, 14, "lec-1"),
                entry("mon", Weekday::Mon, 8, "lec-2"),
            ])
            .await
            .unwrap();

        let fresh = sync.sync_all::<TimetableEntry, _>(&remote).await.unwrap();
        remote.set_online(false);
        let cached = sync.sync_all::<TimetableEntry, _>(&remote).await.unwrap();

        assert!(!fresh.from_cache);
        assert!(cached.from_cache);
        let ids = |outcome: &SyncOutcome<TimetableEntry>| {
            outcome.records.iter().map(|e| e.id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&fresh), vec!["mon", "mon-late", "fri"]);
        assert_eq!(ids(&fresh), ids(&cached));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fractional_times_survive_fallback() {
        let sync = controller().await;
        let mut precise = entry("t1", Weekday::Wed, 9, "lec-1");
        precise.start_time = NaiveTime::from_hms_milli_opt(9, 0, 0, 500);

        let fresh = sync
            .sync_collection(|| {
                let precise = precise.clone();
                async move { Ok::<_, RemoteError>(vec![precise]) }
            })
            .await
            .unwrap();
        let cached = sync
            .sync_collection::<TimetableEntry, _, _>(|| async { Err(RemoteError::Unavailable) })
            .await
            .unwrap();

        assert_eq!(fresh.records, vec![precise]);
        assert_eq!(cached.records, fresh.records);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_fetch_falls_back_without_touching_ledger() {
        let sync = controller().await;
        sync.mirror()
            .upsert(&entry("t1", Weekday::Mon, 9, "lec-1"))
            .await
            .unwrap();

        let outcome = sync
            .sync_collection::<TimetableEntry, _, _>(|| async {
                Err(RemoteError::Network("connection reset".to_string()))
            })
            .await
            .unwrap();

        assert!(outcome.from_cache);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            sync.last_sync_time(Collection::Timetable).await.unwrap(),
            LastSync::Never
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_mirror_fallback_is_empty_not_error() {
        let sync = controller().await;

        let outcome = sync
            .sync_collection::<Department, _, _>(|| async { Err(RemoteError::Unavailable) })
            .await
            .unwrap();

        assert!(outcome.from_cache);
        assert!(outcome.records.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_remote_times_out_into_fallback() {
        let mirror = MirrorService::open_in_memory().await.unwrap();
        let sync = SyncController::new(
            mirror,
            SyncConfig::default().with_remote_timeout(Duration::from_millis(20)),
        );
        let remote = MemoryRemote::new().with_latency(Duration::from_millis(500));
        remote.seed(&[classroom("101")]).await.unwrap();

        let outcome = sync.sync_all::<Classroom, _>(&remote).await.unwrap();

        assert!(outcome.from_cache);
        assert!(outcome.records.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sync_where_falls_back_to_filtered_mirror() {
        let sync = controller().await;
        let remote = MemoryRemote::new();
        remote
            .seed(&[
                entry("t1", Weekday::Mon, 9, "lec-1"),
                entry("t2", Weekday::Mon, 13, "lec-2"),
            ])
            .await
            .unwrap();
        let filters = [FieldFilter::new(Field::LecturerId, "lec-1")];

        let online = sync
            .sync_where::<TimetableEntry, _>(&remote, &filters)
            .await
            .unwrap();
        assert!(!online.from_cache);
        assert_eq!(online.records.len(), 1);

        sync.mirror()
            .upsert(&entry("t3", Weekday::Wed, 9, "lec-2"))
            .await
            .unwrap();
        remote.set_online(false);

        let offline = sync
            .sync_where::<TimetableEntry, _>(&remote, &filters)
            .await
            .unwrap();
        assert!(offline.from_cache);
        let ids: Vec<_> = offline.records.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["t1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sync_where_rejects_unindexed_filter_before_fetching() {
        let sync = controller().await;
        let remote = MemoryRemote::new();

        let result = sync
            .sync_where::<Department, _>(&remote, &[FieldFilter::new(Field::Level, "100")])
            .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(remote.request_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn save_is_remote_first() {
        let sync = controller().await;
        let remote = MemoryRemote::new();
        remote.set_online(false);

        let result = sync.save(&remote, &classroom("101")).await;
        assert!(matches!(result, Err(Error::Remote(RemoteError::Unavailable))));
        assert_eq!(sync.mirror().count::<Classroom>().await.unwrap(), 0);

        remote.set_online(true);
        sync.save(&remote, &classroom("101")).await.unwrap();
        assert_eq!(remote.document_count(Collection::Classrooms).await, 1);
        assert_eq!(sync.mirror().count::<Classroom>().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remove_tolerates_record_missing_locally() {
        let sync = controller().await;
        let remote = MemoryRemote::new();
        remote.seed(&[classroom("101")]).await.unwrap();

        sync.remove::<Classroom, _>(&remote, "101").await.unwrap();
        assert_eq!(remote.document_count(Collection::Classrooms).await, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reference_data_syncs_every_collection() {
        let sync = controller().await;
        let remote = MemoryRemote::new();
        remote
            .seed(&[Department::new("dep-phy", "Physics", "PHY")])
            .await
            .unwrap();
        remote.seed(&[classroom("101"), classroom("102")]).await.unwrap();

        let data = sync.sync_reference_data(&remote).await.unwrap();

        assert!(!data.any_from_cache());
        assert_eq!(data.departments.records.len(), 1);
        assert_eq!(data.classrooms.records.len(), 2);
        assert!(data.lecturers.records.is_empty());

        let ledger = sync.ledger().await.unwrap();
        let never: Vec<_> = ledger
            .into_iter()
            .filter(|(_, last)| last.is_never())
            .map(|(collection, _)| collection)
            .collect();
        assert_eq!(never, vec![Collection::Timetable]);
    }
}
