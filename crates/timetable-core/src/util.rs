//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Current Unix timestamp in milliseconds, from the local clock.
pub fn unix_timestamp_ms_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Render a Unix ms timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp_ms(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ")), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" lec-1 ")),
            Some("lec-1".to_string())
        );
    }

    #[test]
    fn format_timestamp_ms_renders_utc() {
        assert_eq!(format_timestamp_ms(0), "1970-01-01 00:00:00 UTC");
    }
}
