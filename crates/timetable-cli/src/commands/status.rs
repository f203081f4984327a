use std::path::Path;

use serde::Serialize;
use timetable_core::{Collection, MirrorService};

use crate::commands::common::open_mirror;
use crate::error::CliError;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusItem {
    pub collection: Collection,
    pub records: u64,
    pub last_sync: Option<i64>,
    pub last_sync_display: String,
}

pub async fn collect_status(mirror: &MirrorService) -> Result<Vec<StatusItem>, CliError> {
    let mut items = Vec::with_capacity(Collection::ALL.len());
    for (collection, last_sync) in mirror.ledger().await? {
        items.push(StatusItem {
            collection,
            records: mirror.count_collection(collection).await?,
            last_sync: last_sync.timestamp_ms(),
            last_sync_display: last_sync.to_string(),
        });
    }
    Ok(items)
}

pub fn format_status_lines(items: &[StatusItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            format!(
                "{:<12} {:>6} records  last sync: {}",
                item.collection.as_str(),
                item.records,
                item.last_sync_display
            )
        })
        .collect()
}

pub async fn run_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let mirror = open_mirror(db_path).await?;
    let items = collect_status(&mirror).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("Mirror: {}", db_path.display());
    for line in format_status_lines(&items) {
        println!("{line}");
    }
    if items.iter().all(|item| item.last_sync.is_none()) {
        println!("Nothing synced yet. Run `timetable sync --from DIR`.");
    }
    Ok(())
}
