//! Helpers for working with the user's configured timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of `canonical_timezone`, e.g. "Europe/Paris".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`.
///
/// Falls back to UTC if the timezone is unknown. The server validates the
/// timezone on start up so the fallback should not happen in practice.
pub fn local_today(canonical_timezone: &str) -> Date {
    let offset = get_local_offset(canonical_timezone).unwrap_or_else(|| {
        tracing::warn!("unknown timezone \"{canonical_timezone}\", falling back to UTC");
        UtcOffset::UTC
    });

    OffsetDateTime::now_utc().to_offset(offset).date()
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, UtcOffset};

    use super::{get_local_offset, local_today};

    #[test]
    fn utc_has_zero_offset() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
    }

    #[test]
    fn unknown_timezone_has_no_offset() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        let today_utc = OffsetDateTime::now_utc().date();

        let got = local_today("Not/A_Zone");

        // Allow for the test running across midnight.
        let tomorrow_utc = today_utc.next_day().unwrap_or(today_utc);
        assert!(got == today_utc || got == tomorrow_utc);
    }
}
