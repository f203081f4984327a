//! Sync ledger value

use serde::Serialize;
use std::fmt;

use crate::util::format_timestamp_ms;

/// Last successful remote synchronization of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LastSync {
    /// The collection has never been fetched from the remote store
    Never,
    /// Local clock timestamp (Unix ms)
    At(i64),
}

impl LastSync {
    pub const fn timestamp_ms(self) -> Option<i64> {
        match self {
            Self::Never => None,
            Self::At(timestamp) => Some(timestamp),
        }
    }

    pub const fn is_never(self) -> bool {
        matches!(self, Self::Never)
    }
}

impl fmt::Display for LastSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::At(timestamp) => f.write_str(&format_timestamp_ms(*timestamp)),
        }
    }
}
