//! Disabled-date rules: which dates may not be selected.

use chrono::{Datelike as _, Days, NaiveDate};

use crate::date_utils::days_in_month;
use crate::view::View;

/// An inclusive range of disabled dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Which dates cannot be selected.
///
/// A date is disabled when *any* clause matches:
/// * everything on or before [`Self::to`],
/// * everything on or after [`Self::from`],
/// * explicit [`Self::dates`],
/// * any inclusive range in [`Self::ranges`],
/// * weekdays in [`Self::days`] (0 = Sunday),
/// * day-of-month numbers in [`Self::days_of_month`],
/// * a custom predicate.
#[derive(Default)]
pub struct DisabledDates {
    pub to: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub dates: Vec<NaiveDate>,
    pub ranges: Vec<DateRange>,
    pub days: Vec<u32>,
    pub days_of_month: Vec<u32>,
    pub custom: Option<Box<dyn Fn(NaiveDate) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for DisabledDates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisabledDates")
            .field("to", &self.to)
            .field("from", &self.from)
            .field("dates", &self.dates)
            .field("ranges", &self.ranges)
            .field("days", &self.days)
            .field("days_of_month", &self.days_of_month)
            .field("custom", &self.custom.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

impl DisabledDates {
    /// Disable everything on or before `to`.
    #[inline]
    pub fn to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// Disable everything on or after `from`.
    #[inline]
    pub fn from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    #[inline]
    pub fn dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.dates = dates.into_iter().collect();
        self
    }

    /// Disable the inclusive range `from..=to`.
    #[inline]
    pub fn range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.ranges.push(DateRange { from, to });
        self
    }

    /// Disable weekdays by index, 0 = Sunday.
    #[inline]
    pub fn days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    #[inline]
    pub fn days_of_month(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days_of_month = days.into_iter().collect();
        self
    }

    #[inline]
    pub fn custom(mut self, predicate: impl Fn(NaiveDate) -> bool + Send + Sync + 'static) -> Self {
        self.custom = Some(Box::new(predicate));
        self
    }

    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        if self.to.is_some_and(|to| date <= to) {
            return true;
        }
        if self.from.is_some_and(|from| date >= from) {
            return true;
        }
        if self.dates.contains(&date) {
            return true;
        }
        if self
            .ranges
            .iter()
            .any(|range| range.from <= date && date <= range.to)
        {
            return true;
        }
        if self.days.contains(&date.weekday().num_days_from_sunday()) {
            return true;
        }
        if self.days_of_month.contains(&date.day()) {
            return true;
        }
        self.custom.as_ref().is_some_and(|predicate| predicate(date))
    }

    /// The earliest selectable date implied by [`Self::to`], used for
    /// keyboard clamping. `None` when there is no lower bound.
    pub fn earliest_possible_date(&self) -> Option<NaiveDate> {
        self.to.and_then(|to| to.checked_add_days(Days::new(1)))
    }

    /// The latest selectable date implied by [`Self::from`].
    pub fn latest_possible_date(&self) -> Option<NaiveDate> {
        self.from.and_then(|from| from.checked_sub_days(Days::new(1)))
    }

    /// True when no day of the given month (zero-based) can be selected.
    ///
    /// Only the `to`/`from` bounds and engulfing ranges are considered;
    /// per-day clauses are left to the day grid.
    pub fn is_month_disabled(&self, year: i32, month0: u32) -> bool {
        let Some((first, last)) = month_bounds(year, month0) else {
            return true;
        };
        if self.to.is_some_and(|to| last <= to) {
            return true;
        }
        if self.from.is_some_and(|from| first >= from) {
            return true;
        }
        self.ranges
            .iter()
            .any(|range| range.from <= first && last <= range.to)
    }

    /// True when no day of the given year can be selected.
    pub fn is_year_disabled(&self, year: i32) -> bool {
        let Some((first, last)) = year_bounds(year) else {
            return true;
        };
        if self.to.is_some_and(|to| last <= to) {
            return true;
        }
        if self.from.is_some_and(|from| first >= from) {
            return true;
        }
        self.ranges
            .iter()
            .any(|range| range.from <= first && last <= range.to)
    }

    /// True when paging forward from `page` would land on an entirely
    /// disabled page. Tests only the boundary date of the adjacent page.
    pub fn is_next_page_disabled(&self, view: View, page: NaiveDate) -> bool {
        let Some(first_of_next) = first_of_next_page(view, page) else {
            return true;
        };
        self.from.is_some_and(|from| first_of_next >= from)
    }

    /// True when paging backward from `page` would land on an entirely
    /// disabled page.
    pub fn is_previous_page_disabled(&self, view: View, page: NaiveDate) -> bool {
        let Some(last_of_previous) = last_of_previous_page(view, page) else {
            return true;
        };
        self.to.is_some_and(|to| last_of_previous <= to)
    }
}

fn month_bounds(year: i32, month0: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month0 + 1, days_in_month(year, month0))?;
    Some((first, last))
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

fn first_of_next_page(view: View, page: NaiveDate) -> Option<NaiveDate> {
    match view {
        View::Day => {
            let (year, month0) = if page.month0() == 11 {
                (page.year() + 1, 0)
            } else {
                (page.year(), page.month0() + 1)
            };
            NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        }
        View::Month => NaiveDate::from_ymd_opt(page.year() + 1, 1, 1),
        View::Year | View::Decade => {
            let decade = page.year().div_euclid(10) * 10;
            NaiveDate::from_ymd_opt(decade + 10, 1, 1)
        }
    }
}

fn last_of_previous_page(view: View, page: NaiveDate) -> Option<NaiveDate> {
    match view {
        View::Day => NaiveDate::from_ymd_opt(page.year(), page.month0() + 1, 1)?
            .checked_sub_days(Days::new(1)),
        View::Month => NaiveDate::from_ymd_opt(page.year() - 1, 12, 31),
        View::Year | View::Decade => {
            let decade = page.year().div_euclid(10) * 10;
            NaiveDate::from_ymd_opt(decade - 1, 12, 31)
        }
    }
}
