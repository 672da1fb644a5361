//! A date-picker widget for [egui](https://github.com/emilk/egui): an
//! input field or button that opens a calendar overlay with day, month
//! and year views.
//!
//! ```no_run
//! # egui::__run_test_ui(|ui| {
//! let mut departure: Option<chrono::NaiveDate> = None;
//! ui.add(
//!     egui_calendar::Datepicker::new(&mut departure)
//!         .id_salt("departure")
//!         .format("%Y-%m-%d")
//!         .typeable(true),
//! );
//! # });
//! ```
//!
//! Dates the user must not pick are described with [`DisabledDates`];
//! month and weekday names come from a [`Locale`]. For richer feedback
//! than the changed flag, [`Datepicker::show`] returns the
//! [`DatepickerEvent`]s of the frame.

mod button;
mod date_utils;
mod disabled;
mod event;
mod focus;
mod grid;
mod input;
mod locale;
mod popup;
mod view;

pub use button::{Datepicker, DatepickerOutput};
pub use date_utils::DateUtils;
pub use disabled::{DateRange, DisabledDates};
pub use event::DatepickerEvent;
pub use input::DateFormat;
pub use locale::Locale;
pub use view::{ConfigError, View};

pub use chrono;
