pub mod check;
pub mod clear;
pub mod common;
pub mod list;
pub mod status;
pub mod sync;
pub mod timetable;
