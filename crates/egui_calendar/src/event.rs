//! Discrete notifications emitted by the widget.

use chrono::NaiveDate;

use crate::view::View;

/// Something the calendar did this frame that callers may care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatepickerEvent {
    /// A date was committed.
    Selected(NaiveDate),

    /// The user activated a disabled date; the selection did not change.
    DisabledDateAttempted(NaiveDate),

    /// The page moved; `page` is the first day of the new period.
    PageChanged { view: View, page: NaiveDate },

    /// The view drilled down or switched up.
    ViewChanged(View),

    /// The calendar opened.
    Opened,

    /// The calendar closed.
    Closed,

    /// The selection (or an unparseable typed date) was cleared.
    Cleared,
}
