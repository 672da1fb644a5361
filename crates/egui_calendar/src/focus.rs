//! Keyboard focus logic: the ordered nav-element list, Tab trapping, the
//! tabbable cell and arrow-key navigation over the grids.
//!
//! Everything here is pure and renderer-agnostic; the widget layer maps
//! the indices produced here onto real `egui` responses.

use chrono::{Datelike as _, Days, NaiveDate};

use crate::disabled::DisabledDates;
use crate::grid::{Cell, COARSE_COLUMNS, DAY_COLUMNS};
use crate::view::View;

/// The focus-trappable elements of an open calendar, in tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavElement {
    /// The text input, present when the picker is typeable (and not inline).
    Input,
    /// Header button: previous page.
    Prev,
    /// Header button: switch to the next coarser view.
    Up,
    /// Header button: next page.
    Next,
    /// The single tabbable grid cell.
    Cell,
}

/// The ordered nav-element list for the current frame. Disabled header
/// buttons are not focusable and are left out.
pub fn nav_elements(
    typeable: bool,
    inline: bool,
    prev_enabled: bool,
    up_enabled: bool,
    next_enabled: bool,
    has_tabbable_cell: bool,
) -> Vec<NavElement> {
    let mut elements = Vec::with_capacity(5);
    if typeable && !inline {
        elements.push(NavElement::Input);
    }
    if prev_enabled {
        elements.push(NavElement::Prev);
    }
    if up_enabled {
        elements.push(NavElement::Up);
    }
    if next_enabled {
        elements.push(NavElement::Next);
    }
    if has_tabbable_cell {
        elements.push(NavElement::Cell);
    }
    elements
}

/// Where Tab moves focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabMove {
    /// Stay trapped; focus the element at this index.
    Trapped(usize),
    /// Inline only: release focus to the page before the first element.
    ReleasedStart,
    /// Inline only: release focus to the page after the last element.
    ReleasedEnd,
}

/// Computes the Tab destination. A non-inline open calendar cycles with
/// wrap-around; an inline calendar releases focus at either end so the
/// page's natural tab order takes over.
pub fn tab_move(focused: usize, len: usize, backwards: bool, inline: bool) -> TabMove {
    debug_assert!(focused < len, "focused index out of range");
    if inline && backwards && focused == 0 {
        return TabMove::ReleasedStart;
    }
    if inline && !backwards && focused + 1 == len {
        return TabMove::ReleasedEnd;
    }
    if backwards {
        TabMove::Trapped((focused + len - 1) % len)
    } else {
        TabMove::Trapped((focused + 1) % len)
    }
}

/// Chooses the one grid cell that receives tab focus.
///
/// Priority: currently focused cell > cell matching the latest valid
/// typed date > selected > today > first enabled cell. Edge dates and
/// disabled cells never become tabbable.
pub fn choose_tabbable_cell(
    cells: &[Cell],
    active: Option<usize>,
    typed: Option<NaiveDate>,
) -> Option<usize> {
    if let Some(index) = active {
        if cells.get(index).is_some_and(|c| !c.disabled) {
            return Some(index);
        }
    }

    let candidate = |predicate: &dyn Fn(&Cell) -> bool| {
        cells
            .iter()
            .position(|cell| predicate(cell) && !cell.disabled && !cell.is_edge())
    };

    if let Some(typed) = typed {
        if let Some(index) = candidate(&|cell: &Cell| cell.date == typed) {
            return Some(index);
        }
    }
    candidate(&|cell: &Cell| cell.selected)
        .or_else(|| candidate(&|cell: &Cell| cell.today))
        .or_else(|| candidate(&|_| true))
}

/// Grid columns for the given view; also the vertical arrow step.
pub fn columns_for_view(view: View) -> usize {
    match view {
        View::Day => DAY_COLUMNS,
        View::Month | View::Year | View::Decade => COARSE_COLUMNS,
    }
}

/// Where an arrow key moves the focused cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowMove {
    /// Focus the cell at this index of the current grid.
    Focus(usize),
    /// Navigation ran off the grid (or onto an edge date): change the
    /// page and focus the cell holding `focus_date` afterwards.
    Page { increment: i32, focus_date: NaiveDate },
    /// Nothing to do (clamped by the selectable bounds, or everything in
    /// that direction is disabled).
    None,
}

/// Moves focus from `current` by `delta` grid cells, skipping disabled
/// cells by extending the step, clamped by the earliest/latest selectable
/// dates.
pub fn arrow_target(
    view: View,
    cells: &[Cell],
    current: usize,
    delta: i32,
    disabled: &DisabledDates,
) -> ArrowMove {
    if delta == 0 || cells.is_empty() || current >= cells.len() {
        return ArrowMove::None;
    }

    let start = cells[current].date;
    let earliest = disabled.earliest_possible_date();
    let latest = disabled.latest_possible_date();

    // Skipping a disabled cell repeats the original stride, so a vertical
    // move stays in its column. A year of extensions bounds the search;
    // everything past that is wall-to-wall disabled anyway.
    let mut offset = i64::from(delta);
    for _ in 0..366 {
        let Some(date) = date_at_offset(view, start, offset) else {
            return ArrowMove::None;
        };
        if earliest.is_some_and(|e| date < e) || latest.is_some_and(|l| date > l) {
            return ArrowMove::None;
        }
        if !unit_disabled(view, date, disabled) {
            return resolve(cells, current as i64 + offset, date);
        }
        offset += i64::from(delta);
    }
    ArrowMove::None
}

fn resolve(cells: &[Cell], index: i64, date: NaiveDate) -> ArrowMove {
    if index < 0 {
        return ArrowMove::Page {
            increment: -1,
            focus_date: date,
        };
    }
    if let Some(cell) = cells.get(index as usize) {
        debug_assert_eq!(cell.date, date, "grid cells must be contiguous");
        if cell.previous_period {
            return ArrowMove::Page {
                increment: -1,
                focus_date: date,
            };
        }
        if cell.next_period {
            return ArrowMove::Page {
                increment: 1,
                focus_date: date,
            };
        }
        return ArrowMove::Focus(index as usize);
    }
    ArrowMove::Page {
        increment: 1,
        focus_date: date,
    }
}

/// The date `offset` grid cells away from `start`. Grids are contiguous
/// in their unit (days, months, years), so this extrapolates past the
/// visible page as well.
fn date_at_offset(view: View, start: NaiveDate, offset: i64) -> Option<NaiveDate> {
    match view {
        View::Day => {
            if offset >= 0 {
                start.checked_add_days(Days::new(offset as u64))
            } else {
                start.checked_sub_days(Days::new(offset.unsigned_abs()))
            }
        }
        View::Month => {
            let months = start.year() as i64 * 12 + start.month0() as i64 + offset;
            NaiveDate::from_ymd_opt(
                i32::try_from(months.div_euclid(12)).ok()?,
                months.rem_euclid(12) as u32 + 1,
                1,
            )
        }
        View::Year | View::Decade => {
            NaiveDate::from_ymd_opt(i32::try_from(start.year() as i64 + offset).ok()?, 1, 1)
        }
    }
}

fn unit_disabled(view: View, date: NaiveDate, disabled: &DisabledDates) -> bool {
    match view {
        View::Day => disabled.is_disabled(date),
        View::Month => disabled.is_month_disabled(date.year(), date.month0()),
        View::Year | View::Decade => disabled.is_year_disabled(date.year()),
    }
}

/// A focus move scheduled to fire after a page transition's visual delay.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PendingFocus {
    /// The view the move was scheduled on.
    pub view: View,
    /// The page (year, month0) the move was scheduled for.
    pub page: (i32, u32),
    /// The date whose cell should receive focus, as (year, month0, day).
    pub date: (i32, u32, u32),
    /// `egui` time after which the move may fire.
    pub due: f64,
}

impl PendingFocus {
    /// A deferred focus-set only applies if the view and page are still
    /// the ones it was scheduled for; otherwise it is dropped.
    pub fn still_valid(&self, view: View, page: NaiveDate) -> bool {
        self.view == view && self.page == (page.year(), page.month0())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::day_cells;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn nav_element_order() {
        assert_eq!(
            nav_elements(true, false, true, true, true, true),
            vec![
                NavElement::Input,
                NavElement::Prev,
                NavElement::Up,
                NavElement::Next,
                NavElement::Cell,
            ]
        );
        // Inline pickers have no input; disabled buttons drop out:
        assert_eq!(
            nav_elements(true, true, false, true, true, true),
            vec![NavElement::Up, NavElement::Next, NavElement::Cell]
        );
    }

    #[test]
    fn tab_cycles_with_wraparound_when_trapped() {
        let len = 4;
        let mut focused = 0;
        for expected in [1, 2, 3, 0] {
            match tab_move(focused, len, false, false) {
                TabMove::Trapped(next) => {
                    assert_eq!(next, expected);
                    focused = next;
                }
                other => panic!("expected trapped move, got {other:?}"),
            }
        }
        // N tabs return to the start:
        assert_eq!(focused, 0);

        assert_eq!(tab_move(0, len, true, false), TabMove::Trapped(3));

        // A single trapped element cycles onto itself:
        assert_eq!(tab_move(0, 1, false, false), TabMove::Trapped(0));
        assert_eq!(tab_move(0, 1, true, false), TabMove::Trapped(0));
    }

    #[test]
    fn inline_tabbing_releases_at_the_edges() {
        let len = 4;
        assert_eq!(tab_move(0, len, true, true), TabMove::ReleasedStart);
        assert_eq!(tab_move(len - 1, len, false, true), TabMove::ReleasedEnd);
        assert_eq!(tab_move(1, len, true, true), TabMove::Trapped(0));
        assert_eq!(tab_move(1, len, false, true), TabMove::Trapped(2));
    }

    #[test]
    fn tabbable_cell_priority() {
        let page = date(2016, 10, 1);
        let today = date(2016, 10, 3);
        let selected = Some(date(2016, 10, 15));
        let disabled = DisabledDates::default();
        let cells = day_cells(page, 0, selected, today, &disabled);

        // Active focus wins:
        assert_eq!(choose_tabbable_cell(&cells, Some(10), None), Some(10));
        // Then the typed date:
        let typed = Some(date(2016, 10, 20));
        let typed_index = cells.iter().position(|c| c.date == date(2016, 10, 20));
        assert_eq!(choose_tabbable_cell(&cells, None, typed), typed_index);
        // Then the selection:
        let selected_index = cells.iter().position(|c| c.selected);
        assert_eq!(choose_tabbable_cell(&cells, None, None), selected_index);

        // Then today:
        let cells = day_cells(page, 0, None, today, &disabled);
        let today_index = cells.iter().position(|c| c.today);
        assert_eq!(choose_tabbable_cell(&cells, None, None), today_index);

        // Then the first enabled non-edge cell:
        let cells = day_cells(page, 0, None, date(2000, 1, 1), &disabled);
        let first = cells.iter().position(|c| !c.is_edge());
        assert_eq!(choose_tabbable_cell(&cells, None, None), first);
    }

    #[test]
    fn arrows_move_by_day_and_week() {
        let page = date(2016, 10, 1);
        let disabled = DisabledDates::default();
        let cells = day_cells(page, 0, None, date(2016, 10, 3), &disabled);
        let start = cells.iter().position(|c| c.date == date(2016, 10, 12)).unwrap();

        assert_eq!(
            arrow_target(View::Day, &cells, start, 1, &disabled),
            ArrowMove::Focus(start + 1)
        );
        assert_eq!(
            arrow_target(View::Day, &cells, start, -1, &disabled),
            ArrowMove::Focus(start - 1)
        );
        assert_eq!(
            arrow_target(View::Day, &cells, start, 7, &disabled),
            ArrowMove::Focus(start + 7)
        );
    }

    #[test]
    fn arrows_skip_disabled_cells() {
        let page = date(2016, 10, 1);
        let disabled = DisabledDates::default().dates([date(2016, 10, 13)]);
        let cells = day_cells(page, 0, None, date(2016, 10, 3), &disabled);
        let start = cells.iter().position(|c| c.date == date(2016, 10, 12)).unwrap();

        // Oct 13 is disabled, so a single step lands on Oct 14:
        assert_eq!(
            arrow_target(View::Day, &cells, start, 1, &disabled),
            ArrowMove::Focus(start + 2)
        );
    }

    #[test]
    fn arrows_off_the_grid_change_page() {
        let page = date(2016, 10, 1);
        let disabled = DisabledDates::default();
        let cells = day_cells(page, 0, None, date(2016, 10, 3), &disabled);

        // October 2016 fills its first row from the previous month except
        // the last cell; stepping left from Oct 1 lands on an edge date.
        let first = cells.iter().position(|c| c.date == date(2016, 10, 1)).unwrap();
        assert_eq!(
            arrow_target(View::Day, &cells, first, -1, &disabled),
            ArrowMove::Page {
                increment: -1,
                focus_date: date(2016, 9, 30),
            }
        );

        let last = cells.iter().position(|c| c.date == date(2016, 10, 31)).unwrap();
        assert_eq!(
            arrow_target(View::Day, &cells, last, 7, &disabled),
            ArrowMove::Page {
                increment: 1,
                focus_date: date(2016, 11, 7),
            }
        );
    }

    #[test]
    fn arrows_clamp_at_selectable_bounds() {
        let page = date(2016, 10, 1);
        let disabled = DisabledDates::default().from(date(2016, 10, 13));
        let cells = day_cells(page, 0, None, date(2016, 10, 3), &disabled);
        let start = cells.iter().position(|c| c.date == date(2016, 10, 12)).unwrap();

        // Oct 12 is the latest selectable date; right arrow stays put.
        assert_eq!(
            arrow_target(View::Day, &cells, start, 1, &disabled),
            ArrowMove::None
        );
    }

    #[test]
    fn pending_focus_revalidates_view_and_page() {
        let pending = PendingFocus {
            view: View::Day,
            page: (2016, 10),
            date: (2016, 11, 7),
            due: 0.0,
        };

        assert!(pending.still_valid(View::Day, date(2016, 11, 15)));
        assert!(!pending.still_valid(View::Day, date(2016, 12, 1)));
        assert!(!pending.still_valid(View::Month, date(2016, 11, 15)));
    }
}
