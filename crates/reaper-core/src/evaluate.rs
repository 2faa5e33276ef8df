//! Expiration decisions.
//!
//! Every function takes `now` explicitly so one run judges all resources
//! against the same instant. Day counts are whole days; a resource is
//! expired only when its age is strictly greater than the threshold.

use crate::{ReaperError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Expired { age_days: i64 },
    NotExpired { age_days: i64 },
    NoSignal,
}

impl Verdict {
    fn from_age(age_days: i64, threshold_days: i64) -> Self {
        if age_days > threshold_days {
            Verdict::Expired { age_days }
        } else {
            Verdict::NotExpired { age_days }
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Verdict::Expired { .. })
    }
}

/// Parses exactly `YYYY-MM-DD`: four-digit year, two-digit month and day.
/// chrono alone would also take `24-01-01`, `+2024-01-01` or `2024-1-1`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Age of a calendar date relative to `now`'s calendar date, time of day discarded.
pub fn days_since(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - date).num_days()
}

/// Image rule: the creation date is compared against today's date.
pub fn evaluate_created_date(
    created: NaiveDate,
    now: DateTime<Utc>,
    retention_days: i64,
) -> Verdict {
    Verdict::from_age(days_since(created, now), retention_days)
}

/// Disk rule: `skew` is added to the provider timestamp before the full
/// timestamps are differenced. A shift past the representable range gives
/// no signal.
pub fn evaluate_timestamp(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    retention_days: i64,
    skew: Duration,
) -> Verdict {
    match created_at.checked_add_signed(skew) {
        Some(shifted) => Verdict::from_age((now - shifted).num_days(), retention_days),
        None => Verdict::NoSignal,
    }
}

/// Tagged-resource rule. A value that is not `YYYY-MM-DD` is an error.
pub fn evaluate_by_tag(expire_value: &str, now: DateTime<Utc>, grace_days: i64) -> Result<Verdict> {
    let expires_on = parse_date(expire_value).ok_or_else(|| ReaperError::InvalidExpireDate {
        value: expire_value.to_string(),
    })?;

    Ok(Verdict::from_age(days_since(expires_on, now), grace_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_image_retention_boundary_is_strict() {
        let now = at(2024, 3, 10, 23);
        assert_eq!(
            evaluate_created_date(date(2024, 3, 5), now, 5),
            Verdict::NotExpired { age_days: 5 }
        );
        assert_eq!(
            evaluate_created_date(date(2024, 3, 4), now, 5),
            Verdict::Expired { age_days: 6 }
        );
    }

    #[test]
    fn test_image_ignores_time_of_day() {
        let created = date(2024, 3, 4);
        assert!(evaluate_created_date(created, at(2024, 3, 10, 0), 5).is_expired());
        assert!(evaluate_created_date(created, at(2024, 3, 10, 23), 5).is_expired());
    }

    #[test]
    fn test_disk_skew_shifts_boundary_by_one_day() {
        let now = at(2024, 3, 10, 12);
        let created_at = now - Duration::days(6);

        assert!(evaluate_created_date(created_at.date_naive(), now, 5).is_expired());
        assert_eq!(
            evaluate_timestamp(created_at, now, 5, Duration::hours(24)),
            Verdict::NotExpired { age_days: 5 }
        );
        assert!(
            evaluate_timestamp(created_at - Duration::days(1), now, 5, Duration::hours(24))
                .is_expired()
        );
    }

    #[test]
    fn test_disk_in_the_future_is_not_expired() {
        let now = at(2024, 3, 10, 12);
        let verdict = evaluate_timestamp(now + Duration::days(2), now, 5, Duration::hours(24));
        assert!(!verdict.is_expired());
    }

    #[test]
    fn test_disk_skew_overflow_gives_no_signal() {
        let verdict = evaluate_timestamp(
            DateTime::<Utc>::MAX_UTC,
            at(2024, 3, 10, 12),
            5,
            Duration::hours(24),
        );
        assert_eq!(verdict, Verdict::NoSignal);
    }

    #[test]
    fn test_parse_date_requires_full_width() {
        assert_eq!(parse_date("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("0024-01-05"), Some(date(24, 1, 5)));
        assert_eq!(parse_date("24-01-05"), None);
        assert_eq!(parse_date("2024-01-5"), None);
        assert_eq!(parse_date("2024-01-05T00:00:00"), None);
    }

    #[test]
    fn test_expire_tag_in_the_past() {
        let verdict = evaluate_by_tag("2024-01-01", at(2024, 1, 5, 9), 1).unwrap();
        assert_eq!(verdict, Verdict::Expired { age_days: 4 });
    }

    #[test]
    fn test_expire_tag_grace_day() {
        let now = at(2024, 1, 5, 18);
        assert!(!evaluate_by_tag("2024-01-04", now, 1).unwrap().is_expired());
        assert!(!evaluate_by_tag("2024-01-05", now, 1).unwrap().is_expired());
        assert!(!evaluate_by_tag("2024-02-01", now, 1).unwrap().is_expired());
        assert!(evaluate_by_tag("2024-01-03", now, 1).unwrap().is_expired());
    }

    #[test]
    fn test_malformed_expire_tag_is_error() {
        let now = at(2024, 1, 5, 0);
        for value in [
            "",
            "2024/01/01",
            "01-01-2024",
            "soon",
            "2024-13-01",
            "24-12-31",
            "+2024-01-01",
            " 2024-01-01",
            "2024-1-1",
            "2024-01-01 ",
            "2024-02-30",
        ] {
            assert!(
                matches!(
                    evaluate_by_tag(value, now, 1),
                    Err(ReaperError::InvalidExpireDate { .. })
                ),
                "expected parse failure for {:?}",
                value
            );
        }
    }
}
