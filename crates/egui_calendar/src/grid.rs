//! Grid generators: the ordered cells shown for the current page and view.

use chrono::{Datelike as _, Days, NaiveDate};

use crate::disabled::DisabledDates;
use crate::view::View;

/// Columns of the day grid.
pub const DAY_COLUMNS: usize = 7;
/// Rows of the day grid; 6 weeks always cover a month at any offset.
pub const DAY_ROWS: usize = 6;
/// Columns of the month and year grids.
pub const COARSE_COLUMNS: usize = 3;

/// One selectable cell of a picker grid.
///
/// Cells are regenerated on every page or view change, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Day cells hold the day itself; month/year cells hold the first day
    /// of their period.
    pub date: NaiveDate,
    pub selected: bool,
    pub disabled: bool,
    pub today: bool,
    /// An edge date belonging to the period before the page.
    pub previous_period: bool,
    /// An edge date belonging to the period after the page.
    pub next_period: bool,
}

impl Cell {
    /// True for cells outside the displayed period, rendered muted (or as
    /// blanks when edge dates are hidden).
    pub fn is_edge(&self) -> bool {
        self.previous_period || self.next_period
    }
}

/// Offset of the 1st of the page month from the start of its week row:
/// the number of placeholder cells shown when edge dates are hidden.
pub fn blank_days(page: NaiveDate, first_day_of_week: u32) -> u32 {
    let first = page.with_day(1).unwrap_or(page);
    (first.weekday().num_days_from_sunday() + 7 - first_day_of_week) % 7
}

/// The 42 cells (6×7) of the day grid for the month containing `page`,
/// starting from `first_day_of_week` (0 = Sunday). Leading and trailing
/// cells from adjacent months are flagged as edge dates.
pub fn day_cells(
    page: NaiveDate,
    first_day_of_week: u32,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    disabled: &DisabledDates,
) -> Vec<Cell> {
    let first = page.with_day(1).unwrap_or(page);
    let offset = blank_days(page, first_day_of_week);
    let start = first
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(first);

    (0..DAY_COLUMNS * DAY_ROWS)
        .filter_map(|i| start.checked_add_days(Days::new(i as u64)))
        .map(|date| Cell {
            date,
            selected: selected == Some(date),
            disabled: disabled.is_disabled(date),
            today: date == today,
            previous_period: (date.year(), date.month()) < (first.year(), first.month()),
            next_period: (date.year(), date.month()) > (first.year(), first.month()),
        })
        .collect()
}

/// The 12 month cells for the page year.
pub fn month_cells(
    page: NaiveDate,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    disabled: &DisabledDates,
) -> Vec<Cell> {
    let year = page.year();
    (0..12u32)
        .filter_map(|month0| NaiveDate::from_ymd_opt(year, month0 + 1, 1))
        .map(|date| Cell {
            date,
            selected: selected
                .is_some_and(|s| (s.year(), s.month()) == (date.year(), date.month())),
            disabled: disabled.is_month_disabled(date.year(), date.month0()),
            today: (today.year(), today.month()) == (date.year(), date.month()),
            previous_period: false,
            next_period: false,
        })
        .collect()
}

/// The 10 year cells of the decade containing `page`
/// (`floor(year / 10) * 10` through `+9`).
pub fn year_cells(
    page: NaiveDate,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    disabled: &DisabledDates,
) -> Vec<Cell> {
    let decade = page.year().div_euclid(10) * 10;
    (decade..decade + 10)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .map(|date| Cell {
            date,
            selected: selected.is_some_and(|s| s.year() == date.year()),
            disabled: disabled.is_year_disabled(date.year()),
            today: today.year() == date.year(),
            previous_period: false,
            next_period: false,
        })
        .collect()
}

/// The cells for the given view.
pub fn cells_for_view(
    view: View,
    page: NaiveDate,
    first_day_of_week: u32,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    disabled: &DisabledDates,
) -> Vec<Cell> {
    match view {
        View::Day => day_cells(page, first_day_of_week, selected, today, disabled),
        View::Month => month_cells(page, selected, today, disabled),
        View::Year | View::Decade => year_cells(page, selected, today, disabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn february_2018_monday_first_has_three_blanks() {
        // Feb 2018 starts on a Thursday; Mon/Tue/Wed belong to January.
        let page = date(2018, 2, 1);
        assert_eq!(blank_days(page, 1), 3);

        let cells = day_cells(page, 1, None, date(2018, 2, 10), &DisabledDates::default());
        assert_eq!(cells.len(), 42);
        assert!(cells[0].previous_period);
        assert!(cells[2].previous_period);
        assert_eq!(cells[3].date, date(2018, 2, 1));
        assert!(!cells[3].is_edge());
    }

    #[test]
    fn blank_day_counts_match_week_start() {
        // April 2018 starts on a Sunday; with Monday first that is 6 blanks.
        assert_eq!(blank_days(date(2018, 4, 1), 1), 6);
        // October 2018 starts on a Monday.
        assert_eq!(blank_days(date(2018, 10, 1), 1), 0);
        // January 2021 starts on a Friday; with Saturday first that is 6 blanks.
        assert_eq!(blank_days(date(2021, 1, 1), 6), 6);
        // August 2020 starts on a Saturday.
        assert_eq!(blank_days(date(2020, 8, 1), 6), 0);
    }

    #[test]
    fn day_cells_flag_today_selected_and_disabled() {
        let disabled = DisabledDates::default().dates([date(2016, 10, 2)]);
        let cells = day_cells(
            date(2016, 10, 1),
            0,
            Some(date(2016, 10, 15)),
            date(2016, 10, 3),
            &disabled,
        );

        // October 2016 starts on a Saturday; Sunday-first leaves 6 blanks.
        assert_eq!(cells[6].date, date(2016, 10, 1));
        let by_date = |d: NaiveDate| cells.iter().find(|c| c.date == d).copied().unwrap();
        assert!(by_date(date(2016, 10, 15)).selected);
        assert!(by_date(date(2016, 10, 3)).today);
        assert!(by_date(date(2016, 10, 2)).disabled);
        assert!(!by_date(date(2016, 10, 4)).disabled);
        assert!(by_date(date(2016, 9, 30)).previous_period);
        assert!(by_date(date(2016, 11, 5)).next_period);
    }

    #[test]
    fn month_cells_span_the_page_year() {
        let cells = month_cells(
            date(2018, 6, 15),
            Some(date(2018, 3, 24)),
            date(2018, 6, 20),
            &DisabledDates::default(),
        );

        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0].date, date(2018, 1, 1));
        assert!(cells[2].selected);
        assert!(cells[5].today);
    }

    #[test]
    fn year_cells_cover_the_decade() {
        let cells = year_cells(
            date(2016, 10, 1),
            Some(date(2018, 3, 24)),
            date(2016, 6, 20),
            &DisabledDates::default(),
        );

        assert_eq!(cells.len(), 10);
        assert_eq!(cells[0].date, date(2010, 1, 1));
        assert_eq!(cells[9].date, date(2019, 1, 1));
        assert!(cells[8].selected);
        assert!(cells[6].today);
    }
}
