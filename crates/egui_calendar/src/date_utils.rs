//! Date arithmetic and locale-aware formatting helpers.
//!
//! Everything here is pure: callers construct a [`DateUtils`] from the
//! current UTC flag and locale and rebuild it whenever either changes.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeZone as _, Timelike as _, Utc};

use crate::locale::Locale;

/// Date accessors and formatting, switching between local time and UTC.
#[derive(Clone, Debug, Default)]
pub struct DateUtils {
    pub use_utc: bool,
    pub locale: Locale,
}

impl DateUtils {
    pub fn new(use_utc: bool, locale: Locale) -> Self {
        Self { use_utc, locale }
    }

    /// Today's calendar date, read from the UTC or local clock.
    pub fn today(&self) -> NaiveDate {
        if self.use_utc {
            Utc::now().date_naive()
        } else {
            Local::now().date_naive()
        }
    }

    pub fn year(&self, date: NaiveDate) -> i32 {
        date.year()
    }

    /// Zero-based month.
    pub fn month0(&self, date: NaiveDate) -> u32 {
        date.month0()
    }

    pub fn day(&self, date: NaiveDate) -> u32 {
        date.day()
    }

    /// Weekday index with Sunday = 0, matching the weekday tables in
    /// [`Locale`].
    pub fn weekday_index(&self, date: NaiveDate) -> u32 {
        date.weekday().num_days_from_sunday()
    }

    pub fn hours(&self, datetime: NaiveDateTime) -> u32 {
        datetime.hour()
    }

    pub fn minutes(&self, datetime: NaiveDateTime) -> u32 {
        datetime.minute()
    }

    /// Replaces the year, or `None` if the result is not a real date
    /// (e.g. Feb 29 in a non-leap year).
    pub fn with_year(&self, date: NaiveDate, year: i32) -> Option<NaiveDate> {
        date.with_year(year)
    }

    /// Replaces the month (zero-based), or `None` if the result is not a
    /// real date.
    pub fn with_month0(&self, date: NaiveDate, month0: u32) -> Option<NaiveDate> {
        date.with_month0(month0)
    }

    /// Replaces the day of month, or `None` if the result is not a real
    /// date.
    pub fn with_day(&self, date: NaiveDate, day: u32) -> Option<NaiveDate> {
        date.with_day(day)
    }

    /// Number of days in the given month (zero-based), Gregorian rules.
    pub fn days_in_month(&self, year: i32, month0: u32) -> u32 {
        days_in_month(year, month0)
    }

    /// Calendar-day equality, ignoring time-of-day.
    pub fn same_calendar_day(&self, a: NaiveDateTime, b: NaiveDateTime) -> bool {
        a.date() == b.date()
    }

    /// Formats `date` with a [`chrono::format::strftime`] pattern.
    pub fn format_date(&self, date: NaiveDate, pattern: &str) -> String {
        date.format(pattern).to_string()
    }

    /// Parses a date from a string with the same pattern syntax as
    /// [`Self::format_date`], so the two round-trip.
    ///
    /// Returns `None` for anything that does not parse; free-text input is
    /// expected to be malformed in normal use.
    pub fn parse_date(&self, text: &str, pattern: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), pattern).ok()
    }

    /// Interprets a unix timestamp in milliseconds as a calendar date,
    /// using the UTC flag.
    pub fn date_from_timestamp_ms(&self, millis: i64) -> Option<NaiveDate> {
        let utc = chrono::DateTime::from_timestamp_millis(millis)?;
        if self.use_utc {
            Some(utc.date_naive())
        } else {
            Some(Local.from_utc_datetime(&utc.naive_utc()).date_naive())
        }
    }

    /// Weekday header names rotated to the configured first day of week.
    pub fn weekday_names(&self, first_day_of_week: u32, two_letter: bool) -> [&'static str; 7] {
        self.locale.weekday_names(first_day_of_week, two_letter)
    }

    /// A day number with its English ordinal suffix, e.g. `21st`.
    pub fn day_with_suffix(&self, day: u32) -> String {
        format!("{day}{}", nth_suffix(day))
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in the given month (zero-based), Gregorian rules.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        3 | 5 | 8 | 10 => 30,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// English ordinal suffix for a day of month.
pub fn nth_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}
