//! Natural date and time parsing for tool arguments
//!
//! Callers say "tomorrow at 3" rather than "2026-09-01T15:00". The decision
//! model usually normalizes, but these parsers accept the spoken forms it
//! passes through. Relative dates resolve against an injected [`Clock`] so
//! tests and replays are deterministic.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

/// Time source for relative date resolution
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Fixed clock for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Wall clock shifted to the business timezone.
///
/// Standard (non-DST) offsets only. None of our deployments cross a DST
/// boundary mid-call, and slot math never mixes timezones.
#[derive(Debug, Clone, Copy)]
pub struct ZoneClock {
    offset: FixedOffset,
}

impl ZoneClock {
    pub fn for_zone(name: &str) -> Option<Self> {
        let seconds = match name {
            "UTC" => 0,
            "America/New_York" => -5 * 3600,
            "America/Chicago" => -6 * 3600,
            "America/Denver" => -7 * 3600,
            "America/Los_Angeles" => -8 * 3600,
            "Europe/London" => 0,
            "Europe/Paris" | "Europe/Berlin" | "Europe/Madrid" => 3600,
            "Asia/Kolkata" => 5 * 3600 + 1800,
            "Asia/Singapore" => 8 * 3600,
            "Australia/Sydney" => 10 * 3600,
            _ => return None,
        };
        FixedOffset::east_opt(seconds).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0).expect("zero offset"),
        }
    }
}

impl Clock for ZoneClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)?\b").expect("time regex"));

/// Parse a spoken or ISO date relative to `today`
pub fn parse_spoken_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().to_lowercase();

    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%m/%d/%Y", "%m/%d/%y", "%B %d %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&text, format) {
            return Some(date);
        }
    }

    match text.as_str() {
        "today" | "tonight" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "day after tomorrow" => return Some(today + Duration::days(2)),
        _ => {},
    }

    let weekdays = [
        ("monday", Weekday::Mon),
        ("tuesday", Weekday::Tue),
        ("wednesday", Weekday::Wed),
        ("thursday", Weekday::Thu),
        ("friday", Weekday::Fri),
        ("saturday", Weekday::Sat),
        ("sunday", Weekday::Sun),
    ];

    for (name, weekday) in weekdays {
        if !text.contains(name) {
            continue;
        }
        let ahead = (weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            .rem_euclid(7);

        let days = if text.contains("next") {
            // "next monday" always lands in the following week
            if ahead == 0 {
                7
            } else {
                ahead + 7
            }
        } else if text.contains("this") {
            // "this monday" may be today
            ahead
        } else {
            // A bare weekday name means the next occurrence, not today
            if ahead == 0 {
                7
            } else {
                ahead
            }
        };
        return Some(today + Duration::days(days));
    }

    None
}

/// Parse a spoken or `HH:MM` time
pub fn parse_spoken_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim().to_lowercase();

    match text.as_str() {
        "noon" | "midday" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        "morning" => return NaiveTime::from_hms_opt(10, 0, 0),
        "afternoon" => return NaiveTime::from_hms_opt(14, 0, 0),
        "evening" => return NaiveTime::from_hms_opt(18, 0, 0),
        _ => {},
    }

    let captures = TIME_RE.captures(&text)?;
    let mut hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = captures
        .get(2)
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);

    match captures.get(3).map(|m| m.as_str().chars().next().unwrap_or(' ')) {
        Some('p') if hour < 12 => hour += 12,
        Some('a') if hour == 12 => hour = 0,
        Some(_) => {},
        None => {
            // No meridiem: single-digit hours are assumed to be afternoon,
            // matching how callers say "at 3"
            if (1..=7).contains(&hour) {
                hour += 12;
            }
        },
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        // A Tuesday
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[test]
    fn test_iso_and_us_dates() {
        assert_eq!(
            parse_spoken_date("2026-09-12", today()),
            NaiveDate::from_ymd_opt(2026, 9, 12)
        );
        assert_eq!(
            parse_spoken_date("09/12/2026", today()),
            NaiveDate::from_ymd_opt(2026, 9, 12)
        );
        assert_eq!(
            parse_spoken_date("september 12, 2026", today()),
            NaiveDate::from_ymd_opt(2026, 9, 12)
        );
    }

    #[test]
    fn test_relative_words() {
        assert_eq!(parse_spoken_date("today", today()), Some(today()));
        assert_eq!(
            parse_spoken_date("Tomorrow", today()),
            NaiveDate::from_ymd_opt(2026, 9, 2)
        );
        assert_eq!(
            parse_spoken_date("day after tomorrow", today()),
            NaiveDate::from_ymd_opt(2026, 9, 3)
        );
    }

    #[test]
    fn test_weekday_resolution() {
        // today() is Tuesday 2026-09-01
        assert_eq!(
            parse_spoken_date("friday", today()),
            NaiveDate::from_ymd_opt(2026, 9, 4)
        );
        // Bare name of today's weekday means next week
        assert_eq!(
            parse_spoken_date("tuesday", today()),
            NaiveDate::from_ymd_opt(2026, 9, 8)
        );
        // "this tuesday" is today
        assert_eq!(parse_spoken_date("this tuesday", today()), Some(today()));
        // "next friday" skips this week's Friday
        assert_eq!(
            parse_spoken_date("next friday", today()),
            NaiveDate::from_ymd_opt(2026, 9, 11)
        );
    }

    #[test]
    fn test_unparseable_date() {
        assert_eq!(parse_spoken_date("whenever", today()), None);
        assert_eq!(parse_spoken_date("", today()), None);
    }

    #[test]
    fn test_time_parsing() {
        assert_eq!(parse_spoken_time("10:30"), NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(parse_spoken_time("2pm"), NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(
            parse_spoken_time("2:45 PM"),
            NaiveTime::from_hms_opt(14, 45, 0)
        );
        assert_eq!(parse_spoken_time("12 am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_spoken_time("noon"), NaiveTime::from_hms_opt(12, 0, 0));
    }

    #[test]
    fn test_bare_small_hour_is_afternoon() {
        assert_eq!(parse_spoken_time("3"), NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(parse_spoken_time("10"), NaiveTime::from_hms_opt(10, 0, 0));
    }

    #[test]
    fn test_daypart_defaults() {
        assert_eq!(parse_spoken_time("morning"), NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(
            parse_spoken_time("afternoon"),
            NaiveTime::from_hms_opt(14, 0, 0)
        );
        assert_eq!(parse_spoken_time("evening"), NaiveTime::from_hms_opt(18, 0, 0));
    }

    #[test]
    fn test_zone_clock_table() {
        assert!(ZoneClock::for_zone("America/New_York").is_some());
        assert!(ZoneClock::for_zone("Asia/Kolkata").is_some());
        assert!(ZoneClock::for_zone("Mars/Olympus_Mons").is_none());
    }

    #[test]
    fn test_fixed_clock() {
        let now = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let clock = FixedClock(now);
        assert_eq!(clock.today(), today());
    }
}
