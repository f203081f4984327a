//! Database migrations

use crate::error::Result;
use libsql::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
pub async fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn).await?;

    if version < 1 {
        migrate_v1(conn).await?;
    }

    Ok(())
}

/// Get the current schema version
async fn get_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            (),
        )
        .await?;

    let exists: bool = if let Some(row) = rows.next().await? {
        row.get::<i32>(0)? != 0
    } else {
        false
    };

    if !exists {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;

    let version: i32 = if let Some(row) = rows.next().await? {
        row.get(0)?
    } else {
        0
    };

    Ok(version)
}

/// Migration to version 1: mirror tables and sync ledger
async fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let statements = [
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        "CREATE TABLE IF NOT EXISTS departments (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            faculty_id TEXT,
            faculty_name TEXT,
            hod_id TEXT
        )",
        "CREATE INDEX IF NOT EXISTS idx_departments_name ON departments(name)",
        "CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            department_id TEXT NOT NULL,
            department_name TEXT NOT NULL,
            credit_hours INTEGER NOT NULL,
            level TEXT NOT NULL,
            semester TEXT NOT NULL,
            is_elective INTEGER NOT NULL DEFAULT 0,
            description TEXT
        )",
        "CREATE INDEX IF NOT EXISTS idx_courses_department ON courses(department_id)",
        "CREATE TABLE IF NOT EXISTS lecturers (
            id TEXT PRIMARY KEY,
            user_id TEXT,
            staff_id TEXT NOT NULL,
            title TEXT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            department_id TEXT NOT NULL,
            department_name TEXT NOT NULL,
            email TEXT,
            phone_number TEXT
        )",
        "CREATE INDEX IF NOT EXISTS idx_lecturers_department ON lecturers(department_id)",
        "CREATE TABLE IF NOT EXISTS classrooms (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            building_name TEXT,
            floor TEXT,
            room_number TEXT,
            capacity INTEGER NOT NULL,
            type TEXT NOT NULL,
            has_projector INTEGER NOT NULL DEFAULT 0,
            has_air_condition INTEGER NOT NULL DEFAULT 0,
            has_computers INTEGER NOT NULL DEFAULT 0,
            notes TEXT
        )",
        "CREATE TABLE IF NOT EXISTS timetable (
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL,
            course_name TEXT NOT NULL,
            course_code TEXT NOT NULL,
            lecturer_id TEXT NOT NULL,
            lecturer_name TEXT NOT NULL,
            classroom_id TEXT NOT NULL,
            classroom_name TEXT NOT NULL,
            department_id TEXT NOT NULL,
            department_name TEXT NOT NULL,
            level TEXT NOT NULL,
            semester TEXT NOT NULL,
            day_of_week INTEGER NOT NULL,
            start_time TEXT,
            end_time TEXT,
            type TEXT NOT NULL,
            last_modified INTEGER NOT NULL,
            last_modified_by TEXT
        )",
        "CREATE INDEX IF NOT EXISTS idx_timetable_lecturer ON timetable(lecturer_id)",
        "CREATE INDEX IF NOT EXISTS idx_timetable_classroom ON timetable(classroom_id)",
        "CREATE INDEX IF NOT EXISTS idx_timetable_department_level ON timetable(department_id, level)",
        "CREATE INDEX IF NOT EXISTS idx_timetable_day_start ON timetable(day_of_week, start_time)",
        // Freshness ledger, one row per collection
        "CREATE TABLE IF NOT EXISTS sync_info (
            collection_name TEXT PRIMARY KEY,
            last_sync_time INTEGER NOT NULL
        )",
        "INSERT INTO schema_version (version) VALUES (1)",
    ];

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
    }

    if let Err(e) = conn.execute("COMMIT", ()).await {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    tracing::info!("Migrated mirror database to version {CURRENT_VERSION}");
    Ok(())
}
