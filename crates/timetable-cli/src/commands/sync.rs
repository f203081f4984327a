use std::path::Path;

use timetable_core::{SyncController, SyncOutcome, TimetableEntry};

use crate::commands::common::{open_mirror, sync_config};
use crate::error::CliError;
use crate::json_remote::JsonDirRemote;

pub fn describe_outcome<T>(collection: &str, outcome: &SyncOutcome<T>) -> String {
    let source = if outcome.from_cache {
        "local mirror, remote unavailable"
    } else {
        "remote"
    };
    format!(
        "{collection:<12} {:>6} records ({source})",
        outcome.records.len()
    )
}

pub async fn run_sync(from: &Path, timeout_secs: Option<u64>, db_path: &Path) -> Result<(), CliError> {
    let config = sync_config(timeout_secs)?;
    let mirror = open_mirror(db_path).await?;
    let controller = SyncController::new(mirror, config);
    let remote = JsonDirRemote::new(from);

    tracing::info!("Syncing from {}", remote.dir().display());
    let reference = controller.sync_reference_data(&remote).await?;
    let timetable = controller
        .sync_all::<TimetableEntry, _>(&remote)
        .await?;

    println!("{}", describe_outcome("departments", &reference.departments));
    println!("{}", describe_outcome("lecturers", &reference.lecturers));
    println!("{}", describe_outcome("classrooms", &reference.classrooms));
    println!("{}", describe_outcome("courses", &reference.courses));
    println!("{}", describe_outcome("timetable", &timetable));

    if reference.any_from_cache() || timetable.from_cache {
        println!("Some collections were served from the local mirror; last sync times unchanged.");
    } else {
        println!("Sync completed");
    }
    Ok(())
}
