//! timetable-core - Core library for the timetable client
//!
//! This crate contains the entity models, the offline mirror of the remote
//! timetable collections, the read-through sync controller, and the
//! scheduling conflict engine used by every timetable interface.

pub mod config;
pub mod conflict;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod scheduling;
pub mod services;
pub mod sync;
pub mod util;

pub use config::SyncConfig;
pub use conflict::{find_conflicts, has_conflict, Conflict, ConflictReason};
pub use error::{Error, Result, ValidationError};
pub use models::{
    Classroom, Collection, Course, Department, LastSync, Lecturer, Record, TimetableEntry,
};
pub use remote::{MemoryRemote, RemoteError, RemoteStore};
pub use scheduling::{preview_conflicts, Actor, Role, ScheduleRequest, Scheduler};
pub use services::MirrorService;
pub use sync::{ReferenceData, SyncController, SyncOutcome};
