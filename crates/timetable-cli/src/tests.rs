use std::path::PathBuf;

use chrono::{NaiveTime, Weekday};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use timetable_core::models::{ClassType, Field, FieldFilter, Level, Semester};
use timetable_core::remote::{RemoteError, RemoteStore};
use timetable_core::{Collection, Department, LastSync, MirrorService, TimetableEntry};

use crate::commands::check::SlotArgs;
use crate::commands::common::{
    default_db_path, format_time_range, parse_clock_time, parse_timeout_secs, resolve_db_path,
    RecordLine,
};
use crate::commands::status::{collect_status, format_status_lines};
use crate::commands::sync::{describe_outcome, run_sync};
use crate::commands::timetable::TimetableFilter;
use crate::error::CliError;
use crate::json_remote::JsonDirRemote;

fn entry(id: &str) -> TimetableEntry {
    TimetableEntry {
        id: id.to_string(),
        course_id: "crs-1".to_string(),
        course_name: "Organic Chemistry".to_string(),
        course_code: "CHM 204".to_string(),
        lecturer_id: "lec-1".to_string(),
        lecturer_name: "Prof. Abena Darko".to_string(),
        classroom_id: "room-1".to_string(),
        classroom_name: "Science - S2".to_string(),
        department_id: "dep-chem".to_string(),
        department_name: "Chemistry".to_string(),
        level: Level::L200,
        semester: Semester::First,
        day_of_week: Weekday::Thu,
        start_time: NaiveTime::from_hms_opt(13, 0, 0),
        end_time: NaiveTime::from_hms_opt(15, 0, 0),
        class_type: ClassType::Practical,
        last_modified: 1_700_000_000_000,
        last_modified_by: None,
    }
}

fn slot() -> SlotArgs {
    SlotArgs {
        day: 4,
        start: "13:30".to_string(),
        end: "14:30".to_string(),
        lecturer: "lec-1".to_string(),
        classroom: "room-9".to_string(),
        exclude: None,
    }
}

#[test]
fn parse_clock_time_accepts_minutes_and_seconds() {
    assert_eq!(
        parse_clock_time("09:30").unwrap(),
        NaiveTime::from_hms_opt(9, 30, 0).unwrap()
    );
    assert_eq!(
        parse_clock_time(" 17:05:30 ").unwrap(),
        NaiveTime::from_hms_opt(17, 5, 30).unwrap()
    );
    assert!(matches!(
        parse_clock_time("9am"),
        Err(CliError::InvalidTime(_))
    ));
}

#[test]
fn resolve_db_path_prefers_explicit_flag() {
    let explicit = PathBuf::from("/tmp/explicit.db");
    assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
}

#[test]
fn default_db_path_lives_in_timetable_dir() {
    let path = default_db_path();
    assert!(path.ends_with("timetable/timetable.db"));
}

#[test]
fn parse_timeout_secs_rejects_zero_and_garbage() {
    assert_eq!(parse_timeout_secs(" 15 ").unwrap(), 15);
    assert!(parse_timeout_secs("0").is_err());
    assert!(parse_timeout_secs("soon").is_err());
}

#[test]
fn slot_args_validate_day_and_range() {
    let request = slot().to_request().unwrap();
    assert_eq!(request.day_of_week, Some(4));
    assert_eq!(request.entry_id, None);

    let mut bad_day = slot();
    bad_day.day = 0;
    assert!(matches!(bad_day.to_request(), Err(CliError::Core(_))));

    let mut backwards = slot();
    backwards.end = "13:30".to_string();
    assert!(matches!(backwards.to_request(), Err(CliError::Core(_))));
}

#[test]
fn timetable_filter_maps_flags_to_fields() {
    let filter = TimetableFilter {
        lecturer: None,
        classroom: Some(" room-1 ".to_string()),
        department: Some("dep-chem".to_string()),
        level: Some(Level::L300),
    };

    assert_eq!(
        filter.to_field_filters(),
        vec![
            FieldFilter::new(Field::ClassroomId, "room-1"),
            FieldFilter::new(Field::DepartmentId, "dep-chem"),
            FieldFilter::new(Field::Level, "300"),
        ]
    );
    assert!(TimetableFilter::default().to_field_filters().is_empty());
}

#[test]
fn timetable_entry_line_shows_slot_and_id() {
    assert_eq!(
        entry("tt-7").line(),
        "Thu 13:00-15:00  CHM 204 - Practical  Prof. Abena Darko  Science - S2  [tt-7]"
    );
    assert_eq!(format_time_range(None, None), "--:-----:--");
}

#[tokio::test(flavor = "multi_thread")]
async fn json_dir_remote_reads_collection_files() {
    let tmp = tempdir().unwrap();
    std::fs::write(
        tmp.path().join("departments.json"),
        json!([
            { "id": "dep-chem", "name": "Chemistry", "code": "CHM" },
            { "id": "dep-bio", "name": "Biology", "code": "BIO", "facultyId": "fac-sci" }
        ])
        .to_string(),
    )
    .unwrap();

    let remote = JsonDirRemote::new(tmp.path());
    let departments: Vec<Department> = remote.fetch_all().await.unwrap();
    assert_eq!(departments.len(), 2);
    assert_eq!(departments[1].faculty_id.as_deref(), Some("fac-sci"));

    let missing: Result<Vec<TimetableEntry>, _> = remote.fetch_all().await;
    assert!(matches!(missing, Err(RemoteError::Network(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn json_dir_remote_set_and_delete_rewrite_file() {
    let tmp = tempdir().unwrap();
    let remote = JsonDirRemote::new(tmp.path());

    remote.set(&entry("tt-1")).await.unwrap();
    remote.set(&entry("tt-2")).await.unwrap();
    let mut changed = entry("tt-1");
    changed.class_type = ClassType::Tutorial;
    remote.set(&changed).await.unwrap();

    let entries: Vec<TimetableEntry> = remote
        .fetch_where(&[FieldFilter::new(Field::LecturerId, "lec-1")])
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].class_type, ClassType::Tutorial);

    remote.delete::<TimetableEntry>("tt-2").await.unwrap();
    let entries: Vec<TimetableEntry> = remote.fetch_all().await.unwrap();
    assert_eq!(entries, vec![changed]);
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_from_missing_dir_keeps_ledger_never() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("mirror").join("timetable.db");

    run_sync(&tmp.path().join("does-not-exist"), Some(1), &db_path)
        .await
        .unwrap();

    let mirror = MirrorService::open_path(&db_path).await.unwrap();
    let ledger = mirror.ledger().await.unwrap();
    assert!(ledger.iter().all(|(_, last)| *last == LastSync::Never));
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_from_exports_fills_status() {
    let tmp = tempdir().unwrap();
    let exports = tmp.path().join("exports");
    std::fs::create_dir_all(&exports).unwrap();
    for collection in Collection::ALL {
        std::fs::write(exports.join(format!("{collection}.json")), "[]").unwrap();
    }
    std::fs::write(
        exports.join("timetable.json"),
        serde_json::to_string(&vec![entry("tt-1"), entry("tt-2")]).unwrap(),
    )
    .unwrap();
    let db_path = tmp.path().join("timetable.db");

    run_sync(&exports, None, &db_path).await.unwrap();

    let mirror = MirrorService::open_path(&db_path).await.unwrap();
    let status = collect_status(&mirror).await.unwrap();
    assert_eq!(status.len(), Collection::ALL.len());
    assert!(status.iter().all(|item| item.last_sync.is_some()));

    let timetable = status
        .iter()
        .find(|item| item.collection == Collection::Timetable)
        .unwrap();
    assert_eq!(timetable.records, 2);

    let lines = format_status_lines(&status);
    assert!(lines[0].starts_with("departments"));
}

#[test]
fn describe_outcome_names_source() {
    let outcome = timetable_core::SyncOutcome {
        records: vec![entry("tt-1")],
        from_cache: true,
    };
    assert_eq!(
        describe_outcome("timetable", &outcome),
        "timetable         1 records (local mirror, remote unavailable)"
    );
}
