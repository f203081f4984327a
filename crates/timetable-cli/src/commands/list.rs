use std::path::Path;

use timetable_core::{
    Classroom, Collection, Course, Department, Lecturer, MirrorService, TimetableEntry,
};

use crate::commands::common::{open_mirror, print_records};
use crate::error::CliError;

pub async fn run_list(collection: Collection, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let mirror = open_mirror(db_path).await?;
    let empty = format!("No {collection} mirrored yet. Run `timetable sync --from DIR` first.");

    match collection {
        Collection::Departments => print_all::<Department>(&mirror, as_json, &empty).await,
        Collection::Courses => print_all::<Course>(&mirror, as_json, &empty).await,
        Collection::Lecturers => print_all::<Lecturer>(&mirror, as_json, &empty).await,
        Collection::Classrooms => print_all::<Classroom>(&mirror, as_json, &empty).await,
        Collection::Timetable => print_all::<TimetableEntry>(&mirror, as_json, &empty).await,
    }
}

async fn print_all<T>(mirror: &MirrorService, as_json: bool, empty: &str) -> Result<(), CliError>
where
    T: timetable_core::db::MirrorTable + crate::commands::common::RecordLine,
{
    let records = mirror.get_all::<T>().await?;
    print_records(&records, as_json, empty)
}
