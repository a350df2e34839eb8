pub mod backward_pass;
pub mod forward_pass;

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Anchor for tasks with no target start and no predecessors.
pub(crate) fn early_sentinel() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// One working hour of wall-clock time.
pub(crate) fn hours(value: f64) -> Duration {
    Duration::seconds((value * 3_600.0).round() as i64)
}

/// One day of lag is a full wall-clock day, calendars not applied.
pub(crate) fn lag(days: f64) -> Duration {
    Duration::seconds((days * 86_400.0).round() as i64)
}
