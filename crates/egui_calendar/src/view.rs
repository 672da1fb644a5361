//! The calendar's view state machine: which grid is shown, which page it
//! shows, and how selection and paging move between them.

use chrono::{Datelike as _, NaiveDate};

use crate::disabled::DisabledDates;

/// The granularity of the visible grid.
///
/// Ordered from finest to coarsest. [`View::Decade`] has no grid of its
/// own: it is the year view's page-level granularity.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
pub enum View {
    Day,
    Month,
    Year,
    Decade,
}

impl View {
    /// The next finer view, if any.
    pub fn down(self) -> Option<Self> {
        match self {
            Self::Day => None,
            Self::Month => Some(Self::Day),
            Self::Year => Some(Self::Month),
            Self::Decade => Some(Self::Year),
        }
    }

    /// The next coarser view, if any.
    pub fn up(self) -> Option<Self> {
        match self {
            Self::Day => Some(Self::Month),
            Self::Month => Some(Self::Year),
            Self::Year => Some(Self::Decade),
            Self::Decade => None,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::Decade => "decade",
        })
    }
}

/// A configuration or usage error. These indicate caller bugs and are
/// meant to fail loudly.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("view `{view}` is outside the allowed range `{minimum}..={maximum}`")]
    ViewOutOfRange {
        view: View,
        minimum: View,
        maximum: View,
    },

    #[error("initial view `{initial}` is outside the allowed range `{minimum}..={maximum}`")]
    InitialViewOutOfRange {
        initial: View,
        minimum: View,
        maximum: View,
    },
}

/// What happened when the user activated a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection is final; the picker closes with this date.
    Selected(NaiveDate),

    /// The view drilled down one level without committing a date.
    DrilledDown(View),
}

/// What happened on a page-change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageChange {
    Changed(NaiveDate),

    /// The adjacent page is entirely disabled; the page did not move.
    Blocked,
}

/// Tracks the current view and page date, bounded by the configured
/// minimum and maximum views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    view: View,
    page: NaiveDate,
    minimum_view: View,
    maximum_view: View,
    initial_view: Option<View>,
}

impl ViewState {
    /// `page` may be any date within the period to display; it is
    /// re-anchored to the first day of that period.
    pub fn new(
        minimum_view: View,
        maximum_view: View,
        initial_view: Option<View>,
        page: NaiveDate,
    ) -> Self {
        let mut state = Self {
            view: minimum_view,
            page,
            minimum_view,
            maximum_view,
            initial_view,
        };
        state.page = page_anchor(state.view, page);
        state
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The first day of the displayed period.
    pub fn page(&self) -> NaiveDate {
        self.page
    }

    pub fn allowed(&self, view: View) -> bool {
        self.minimum_view <= view && view <= self.maximum_view
    }

    /// Switches to the given view. Asking for a view outside the
    /// configured bounds is a caller contract violation.
    pub fn set_view(&mut self, view: View) -> Result<(), ConfigError> {
        if !self.allowed(view) {
            return Err(ConfigError::ViewOutOfRange {
                view,
                minimum: self.minimum_view,
                maximum: self.maximum_view,
            });
        }
        self.view = view;
        self.page = page_anchor(view, self.page);
        Ok(())
    }

    /// The view shown when the picker opens: the configured initial view
    /// if it is within bounds, the minimum view when none is configured,
    /// and an error for an explicitly configured out-of-bounds view.
    pub fn computed_initial_view(&self) -> Result<View, ConfigError> {
        match self.initial_view {
            None => Ok(self.minimum_view),
            Some(initial) if self.allowed(initial) => Ok(initial),
            Some(initial) => Err(ConfigError::InitialViewOutOfRange {
                initial,
                minimum: self.minimum_view,
                maximum: self.maximum_view,
            }),
        }
    }

    /// Resets the view for opening the picker.
    pub fn open(&mut self) -> Result<View, ConfigError> {
        let view = self.computed_initial_view()?;
        self.view = view;
        self.page = page_anchor(view, self.page);
        Ok(view)
    }

    /// Re-anchors the page so that `date` is visible in the current view.
    pub fn show_date(&mut self, date: NaiveDate) {
        self.page = page_anchor(self.view, date);
    }

    /// Activates the cell holding `date`. Selecting at the minimum view
    /// commits the date and closes; anything coarser drills down.
    pub fn select(&mut self, date: NaiveDate) -> SelectOutcome {
        if self.view == self.minimum_view {
            return SelectOutcome::Selected(date);
        }
        // `view > minimum_view`, so a finer view always exists here.
        let down = self.view.down().unwrap_or(self.minimum_view);
        self.view = down;
        self.page = page_anchor(down, date);
        SelectOutcome::DrilledDown(down)
    }

    /// Moves the page by one month/year/decade depending on the current
    /// view. A request onto an entirely disabled page is a no-op.
    pub fn change_page(&mut self, increment: i32, disabled: &DisabledDates) -> PageChange {
        if increment == 0 {
            return PageChange::Changed(self.page);
        }
        let blocked = if increment > 0 {
            disabled.is_next_page_disabled(self.view, self.page)
        } else {
            disabled.is_previous_page_disabled(self.view, self.page)
        };
        if blocked {
            return PageChange::Blocked;
        }
        match shift_page(self.view, self.page, increment) {
            Some(page) => {
                self.page = page;
                PageChange::Changed(page)
            }
            None => PageChange::Blocked,
        }
    }
}

/// First day of the period containing `date` at the given granularity.
pub fn page_anchor(view: View, date: NaiveDate) -> NaiveDate {
    let anchored = match view {
        View::Day => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
        View::Month => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        View::Year | View::Decade => {
            NaiveDate::from_ymd_opt(date.year().div_euclid(10) * 10, 1, 1)
        }
    };
    anchored.unwrap_or(date)
}

/// Moves `page` by `increment` pages at the view's granularity.
pub fn shift_page(view: View, page: NaiveDate, increment: i32) -> Option<NaiveDate> {
    match view {
        View::Day => {
            let months = page.year() as i64 * 12 + page.month0() as i64 + increment as i64;
            let year = months.div_euclid(12);
            let month0 = months.rem_euclid(12) as u32;
            NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month0 + 1, 1)
        }
        View::Month => NaiveDate::from_ymd_opt(page.year().checked_add(increment)?, 1, 1),
        View::Year | View::Decade => {
            let decade = page.year().div_euclid(10) * 10;
            NaiveDate::from_ymd_opt(decade.checked_add(increment.checked_mul(10)?)?, 1, 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn view_ordering() {
        assert!(View::Day < View::Month);
        assert!(View::Month < View::Year);
        assert!(View::Year < View::Decade);
    }

    #[test]
    fn initial_view_defaults_to_minimum() {
        let state = ViewState::new(View::Month, View::Year, None, date(2016, 10, 12));
        assert_eq!(state.computed_initial_view(), Ok(View::Month));
    }

    #[test]
    fn disallowed_initial_view_is_an_error() {
        let state = ViewState::new(View::Day, View::Month, Some(View::Year), date(2016, 10, 12));
        assert_eq!(
            state.computed_initial_view(),
            Err(ConfigError::InitialViewOutOfRange {
                initial: View::Year,
                minimum: View::Day,
                maximum: View::Month,
            })
        );
    }

    #[test]
    fn set_view_rejects_views_outside_bounds() {
        let mut state = ViewState::new(View::Day, View::Month, None, date(2016, 10, 12));

        assert!(state.set_view(View::Day).is_ok());
        assert!(state.set_view(View::Month).is_ok());
        assert_eq!(
            state.set_view(View::Year),
            Err(ConfigError::ViewOutOfRange {
                view: View::Year,
                minimum: View::Day,
                maximum: View::Month,
            })
        );
        assert_eq!(state.view(), View::Month);
    }

    #[test]
    fn selecting_at_minimum_view_commits() {
        let mut state = ViewState::new(View::Day, View::Year, None, date(2016, 10, 1));
        assert_eq!(
            state.select(date(2016, 10, 12)),
            SelectOutcome::Selected(date(2016, 10, 12))
        );
    }

    #[test]
    fn selecting_above_minimum_view_drills_down() {
        let mut state = ViewState::new(View::Day, View::Year, None, date(2016, 1, 1));
        state.set_view(View::Year).unwrap();

        assert_eq!(
            state.select(date(2018, 1, 1)),
            SelectOutcome::DrilledDown(View::Month)
        );
        assert_eq!(state.view(), View::Month);
        assert_eq!(state.page(), date(2018, 1, 1));

        assert_eq!(
            state.select(date(2018, 2, 1)),
            SelectOutcome::DrilledDown(View::Day)
        );
        assert_eq!(state.page(), date(2018, 2, 1));
    }

    #[test]
    fn selecting_at_year_floor_commits_the_year() {
        let mut state = ViewState::new(View::Year, View::Year, None, date(2016, 10, 12));
        state.open().unwrap();

        assert_eq!(state.view(), View::Year);
        assert_eq!(
            state.select(date(2016, 1, 1)),
            SelectOutcome::Selected(date(2016, 1, 1))
        );
    }

    #[test]
    fn page_anchors() {
        assert_eq!(page_anchor(View::Day, date(2016, 10, 12)), date(2016, 10, 1));
        assert_eq!(page_anchor(View::Month, date(2016, 10, 12)), date(2016, 1, 1));
        assert_eq!(page_anchor(View::Year, date(2016, 10, 12)), date(2010, 1, 1));
    }

    #[test]
    fn paging_moves_by_view_granularity() {
        let open = DisabledDates::default();

        let mut state = ViewState::new(View::Day, View::Year, None, date(2018, 2, 1));
        assert_eq!(state.change_page(1, &open), PageChange::Changed(date(2018, 3, 1)));
        assert_eq!(state.change_page(-2, &open), PageChange::Changed(date(2018, 1, 1)));
        assert_eq!(state.change_page(-1, &open), PageChange::Changed(date(2017, 12, 1)));

        state.set_view(View::Month).unwrap();
        assert_eq!(state.change_page(1, &open), PageChange::Changed(date(2018, 1, 1)));

        state.set_view(View::Year).unwrap();
        assert_eq!(state.change_page(1, &open), PageChange::Changed(date(2020, 1, 1)));
        assert_eq!(state.change_page(-1, &open), PageChange::Changed(date(2010, 1, 1)));
    }

    #[test]
    fn paging_onto_a_fully_disabled_page_is_blocked() {
        let disabled = DisabledDates::default()
            .to(date(2016, 10, 4))
            .from(date(2016, 10, 26));

        let mut state = ViewState::new(View::Day, View::Year, None, date(2016, 10, 1));
        assert_eq!(state.change_page(1, &disabled), PageChange::Blocked);
        assert_eq!(state.change_page(-1, &disabled), PageChange::Blocked);
        assert_eq!(state.page(), date(2016, 10, 1));
    }
}
