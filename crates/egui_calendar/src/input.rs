//! The typed-text model for typeable pickers.
//!
//! While the user is typing, the raw string is shown untouched; it is
//! only interpreted, never rewritten. Unparseable text is cleared
//! silently on blur, since free-text input is expected to be malformed
//! in normal use.

use chrono::NaiveDate;

use crate::date_utils::DateUtils;
use crate::disabled::DisabledDates;

/// How the input field and button render a date.
#[derive(Clone)]
pub enum DateFormat {
    /// A [`chrono::format::strftime`] pattern. Formatting and parsing use
    /// the same pattern, so the two round-trip.
    Pattern(String),

    /// A custom formatter; typed input is parsed with
    /// [`Datepicker::parse_typed`](crate::Datepicker::parse_typed) (or
    /// rejected when none is given).
    Custom(std::sync::Arc<dyn Fn(NaiveDate) -> String + Send + Sync>),
}

impl std::fmt::Debug for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::Pattern("%d %b %Y".to_owned())
    }
}

impl DateFormat {
    pub fn format(&self, utils: &DateUtils, date: NaiveDate) -> String {
        match self {
            Self::Pattern(pattern) => utils.format_date(date, pattern),
            Self::Custom(formatter) => formatter(date),
        }
    }
}

/// Parses what the user typed, preferring a custom parser when given.
/// Returns `None` for malformed text; the caller decides when to clear.
pub fn parse_typed(
    utils: &DateUtils,
    text: &str,
    format: &DateFormat,
    custom_parser: Option<&(dyn Fn(&str) -> Option<NaiveDate> + Send + Sync)>,
) -> Option<NaiveDate> {
    if text.trim().is_empty() {
        return None;
    }
    if let Some(parser) = custom_parser {
        return parser(text);
    }
    match format {
        DateFormat::Pattern(pattern) => utils.parse_date(text, pattern),
        DateFormat::Custom(_) => {
            log::debug!("typed input ignored: custom format without a custom parser");
            None
        }
    }
}

/// What the typed text does to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TypedOutcome {
    /// Replace the selection with this date.
    Select(NaiveDate),
    /// The date is disabled; report the attempt, keep the selection.
    Rejected(NaiveDate),
    /// Clear the selection.
    Clear,
    /// Leave the selection as it is.
    Keep,
}

/// Decides what Enter does with the typed text: commit a parseable
/// enabled date, report a disabled one, clear on malformed or emptied
/// text (the latter only when there is a selection to clear).
pub(crate) fn commit_outcome(
    utils: &DateUtils,
    text: &str,
    format: &DateFormat,
    custom_parser: Option<&(dyn Fn(&str) -> Option<NaiveDate> + Send + Sync)>,
    disabled: &DisabledDates,
    has_selection: bool,
) -> TypedOutcome {
    if text.trim().is_empty() {
        return if has_selection {
            TypedOutcome::Clear
        } else {
            TypedOutcome::Keep
        };
    }
    match parse_typed(utils, text, format, custom_parser) {
        Some(date) if disabled.is_disabled(date) => TypedOutcome::Rejected(date),
        Some(date) => TypedOutcome::Select(date),
        None => TypedOutcome::Clear,
    }
}

/// Decides what leaving the input does: malformed text clears the value
/// silently, anything parseable is left for Enter or a click.
pub(crate) fn blur_outcome(
    utils: &DateUtils,
    text: &str,
    format: &DateFormat,
    custom_parser: Option<&(dyn Fn(&str) -> Option<NaiveDate> + Send + Sync)>,
) -> TypedOutcome {
    if parse_typed(utils, text, format, custom_parser).is_none() {
        TypedOutcome::Clear
    } else {
        TypedOutcome::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_text_parses_with_the_display_pattern() {
        let utils = DateUtils::default();
        let format = DateFormat::Pattern("%d %b %Y".to_owned());

        let parsed = parse_typed(&utils, "24 Jul 2018", &format, None).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2018, 7, 24).unwrap());

        assert_eq!(parse_typed(&utils, "not a date", &format, None), None);
        assert_eq!(parse_typed(&utils, "", &format, None), None);
    }

    #[test]
    fn custom_parser_takes_precedence() {
        let utils = DateUtils::default();
        let format = DateFormat::Pattern("%Y-%m-%d".to_owned());
        let parser = |text: &str| {
            let mut parts = text.split('/');
            let day = parts.next()?.parse().ok()?;
            let month = parts.next()?.parse().ok()?;
            let year = parts.next()?.parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        };

        let parsed = parse_typed(&utils, "24/06/2018", &format, Some(&parser)).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2018, 6, 24).unwrap());
    }

    #[test]
    fn display_format_round_trips() {
        let utils = DateUtils::default();
        let format = DateFormat::default();
        let date = NaiveDate::from_ymd_opt(2016, 10, 15).unwrap();

        let text = format.format(&utils, date);
        assert_eq!(parse_typed(&utils, &text, &format, None), Some(date));
    }

    #[test]
    fn enter_commits_a_parseable_enabled_date() {
        let utils = DateUtils::default();
        let format = DateFormat::Pattern("%Y-%m-%d".to_owned());
        let open = DisabledDates::default();

        assert_eq!(
            commit_outcome(&utils, "2018-07-24", &format, None, &open, false),
            TypedOutcome::Select(NaiveDate::from_ymd_opt(2018, 7, 24).unwrap())
        );
    }

    #[test]
    fn enter_on_a_disabled_date_reports_the_attempt() {
        let utils = DateUtils::default();
        let format = DateFormat::Pattern("%Y-%m-%d".to_owned());
        let date = NaiveDate::from_ymd_opt(2018, 7, 24).unwrap();
        let disabled = DisabledDates::default().dates([date]);

        // The attempt is reported; the selection is not touched.
        assert_eq!(
            commit_outcome(&utils, "2018-07-24", &format, None, &disabled, true),
            TypedOutcome::Rejected(date)
        );
    }

    #[test]
    fn enter_with_garbage_clears() {
        let utils = DateUtils::default();
        let format = DateFormat::Pattern("%Y-%m-%d".to_owned());
        let open = DisabledDates::default();

        assert_eq!(
            commit_outcome(&utils, "not a date", &format, None, &open, true),
            TypedOutcome::Clear
        );
    }

    #[test]
    fn enter_on_emptied_text_clears_only_an_existing_selection() {
        let utils = DateUtils::default();
        let format = DateFormat::default();
        let open = DisabledDates::default();

        assert_eq!(
            commit_outcome(&utils, "  ", &format, None, &open, true),
            TypedOutcome::Clear
        );
        assert_eq!(
            commit_outcome(&utils, "  ", &format, None, &open, false),
            TypedOutcome::Keep
        );
    }

    #[test]
    fn blur_clears_garbage_and_keeps_parseable_text() {
        let utils = DateUtils::default();
        let format = DateFormat::Pattern("%Y-%m-%d".to_owned());

        assert_eq!(
            blur_outcome(&utils, "garbage", &format, None),
            TypedOutcome::Clear
        );
        assert_eq!(
            blur_outcome(&utils, "2018-07-24", &format, None),
            TypedOutcome::Keep
        );
    }
}
