//! Local mirror database layer

mod connection;
mod ledger_repository;
mod migrations;
mod repository;
mod tables;

pub use connection::Database;
pub use ledger_repository::{LedgerRepository, LibSqlLedgerRepository};
pub use repository::{LibSqlMirrorRepository, MirrorRepository};
pub use tables::MirrorTable;
