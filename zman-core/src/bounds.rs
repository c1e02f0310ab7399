//! Day/week boundary math and elapsed-time derivation.

use time::{Duration, OffsetDateTime, UtcOffset};

/// Owner-local midnight of the day containing `now`.
pub fn day_start(now: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    now.to_offset(offset).date().midnight().assume_offset(offset)
}

/// Owner-local Sunday 00:00 of the week containing `now`.
pub fn week_start(now: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    let local_date = now.to_offset(offset).date();
    let days_back = local_date.weekday().number_days_from_sunday() as i64;
    (local_date - Duration::days(days_back))
        .midnight()
        .assume_offset(offset)
}

/// Whole seconds elapsed since `anchor`, never negative. Always derived
/// from the anchor timestamp rather than an incrementing counter.
pub fn elapsed_seconds(anchor: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (now - anchor).whole_seconds().max(0)
}

/// Whole minutes elapsed since `anchor`, never negative.
pub fn elapsed_minutes(anchor: OffsetDateTime, now: OffsetDateTime) -> i64 {
    elapsed_seconds(anchor, now) / 60
}

/// Render a minute count as "45m" or "1h 05m".
pub fn format_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {:02}m", hours, mins)
    }
}
