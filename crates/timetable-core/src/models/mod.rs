//! Data models for Timetable

mod classroom;
mod collection;
mod course;
mod department;
mod ledger;
mod lecturer;
mod record;
mod timetable;

pub use classroom::{Classroom, RoomType};
pub use collection::Collection;
pub use course::Course;
pub use department::Department;
pub use ledger::LastSync;
pub use lecturer::Lecturer;
pub use record::{ensure_filterable, Field, FieldFilter, Record};
pub use timetable::{
    day_number, weekday_from_number, weekday_number, ClassType, Level, Semester, TimetableEntry,
};
