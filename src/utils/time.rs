use chrono::{DateTime, Duration, Local, Utc};

/// Width of a formatted [format_timestamp] value.
pub const TIMESTAMP_WIDTH: usize = 19;

/// This is the standard way of showing a punch time in clockcard.
pub fn format_timestamp(moment: DateTime<Utc>) -> String {
    moment
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Formats a duration as `H:MM`. Hours aren't wrapped into days.
pub fn format_hours_minutes(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    format!(
        "{}:{:02}",
        seconds.div_euclid(3600),
        seconds.rem_euclid(3600) / 60
    )
}
