//! Month and weekday names plus layout hints for the calendar header.

/// Names and layout hints used when rendering the calendar.
///
/// Weekday tables are Sunday-first; the grid rotates them to match the
/// configured first day of week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    pub months: [&'static str; 12],
    pub months_abbr: [&'static str; 12],
    pub weekdays_abbr: [&'static str; 7],
    pub weekdays_min: [&'static str; 7],

    /// Lay the calendar out right-to-left.
    pub rtl: bool,

    /// Show the year before the month in the day-view header.
    pub ymd: bool,

    /// Appended to year labels (e.g. `年`).
    pub year_suffix: &'static str,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    pub fn english() -> Self {
        Self {
            months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ],
            months_abbr: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
            weekdays_abbr: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            weekdays_min: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
            rtl: false,
            ymd: false,
            year_suffix: "",
        }
    }

    pub fn german() -> Self {
        Self {
            months: [
                "Januar",
                "Februar",
                "März",
                "April",
                "Mai",
                "Juni",
                "Juli",
                "August",
                "September",
                "Oktober",
                "November",
                "Dezember",
            ],
            months_abbr: [
                "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
            ],
            weekdays_abbr: ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
            weekdays_min: ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
            rtl: false,
            ymd: false,
            year_suffix: "",
        }
    }

    pub fn japanese() -> Self {
        Self {
            months: [
                "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
                "12月",
            ],
            months_abbr: [
                "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
                "12月",
            ],
            weekdays_abbr: ["日", "月", "火", "水", "木", "金", "土"],
            weekdays_min: ["日", "月", "火", "水", "木", "金", "土"],
            rtl: false,
            ymd: true,
            year_suffix: "年",
        }
    }

    /// Full month name. `month0` is zero-based.
    pub fn month_name(&self, month0: u32) -> &'static str {
        self.months[month0 as usize % 12]
    }

    /// Abbreviated month name. `month0` is zero-based.
    pub fn month_abbr(&self, month0: u32) -> &'static str {
        self.months_abbr[month0 as usize % 12]
    }

    /// Weekday header names rotated so that `first_day_of_week`
    /// (0 = Sunday) comes first.
    pub fn weekday_names(&self, first_day_of_week: u32, two_letter: bool) -> [&'static str; 7] {
        let source = if two_letter {
            &self.weekdays_min
        } else {
            &self.weekdays_abbr
        };
        std::array::from_fn(|i| source[(i + first_day_of_week as usize) % 7])
    }
}

#[cfg(test)]
mod tests {
    use super::Locale;

    #[test]
    fn weekday_names_rotate_to_first_day() {
        let locale = Locale::english();
        assert_eq!(locale.weekday_names(0, false)[0], "Sun");

        let monday_first = locale.weekday_names(1, false);
        assert_eq!(monday_first[0], "Mon");
        assert_eq!(monday_first[6], "Sun");

        let saturday_first = locale.weekday_names(6, true);
        assert_eq!(saturday_first[0], "Sa");
        assert_eq!(saturday_first[1], "Su");
    }

    #[test]
    fn month_names() {
        let locale = Locale::english();
        assert_eq!(locale.month_name(1), "February");
        assert_eq!(locale.month_abbr(1), "Feb");
        assert!(Locale::japanese().ymd);
    }
}
