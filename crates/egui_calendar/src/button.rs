//! The [`Datepicker`] widget: an input field or button paired with a
//! calendar overlay.

use chrono::{Datelike as _, NaiveDate, Weekday};

use egui::{
    Area, Button, Frame, InnerResponse, Key, Order, Response, RichText, TextEdit, Ui, Widget,
};

use crate::date_utils::DateUtils;
use crate::disabled::DisabledDates;
use crate::event::DatepickerEvent;
use crate::focus::PendingFocus;
use crate::input::{blur_outcome, commit_outcome, parse_typed, DateFormat, TypedOutcome};
use crate::locale::Locale;
use crate::popup::CalendarPopup;
use crate::view::{View, ViewState};

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub(crate) struct DatepickerState {
    pub open: bool,
    pub setup: bool,
    pub view: Option<View>,
    /// (year, month0) of the displayed page.
    pub page: Option<(i32, u32)>,
    /// Raw typed text, shown untouched while the input has focus.
    pub typed: String,
    /// The latest parseable typed date, as (year, month0, day).
    pub latest_typed: Option<(i32, u32, u32)>,
    /// The cell that currently receives tab focus.
    pub tabbable: Option<(i32, u32, u32)>,
    /// Remembered tabbable cell of an inline calendar while focus is
    /// elsewhere on the page.
    pub inline_tabbable: Option<(i32, u32, u32)>,
    pub pending_focus: Option<PendingFocus>,
}

/// What [`Datepicker::show`] hands back.
pub struct DatepickerOutput {
    /// The anchor's response (or the calendar area's, when inline).
    pub response: Response,
    /// Everything that happened this frame, in order.
    pub events: Vec<DatepickerEvent>,
}

/// A date-picker: shows the selected date and opens a calendar overlay
/// with day/month/year navigation when clicked.
///
/// ```no_run
/// # egui::__run_test_ui(|ui| {
/// # let mut birthday = None;
/// ui.add(egui_calendar::Datepicker::new(&mut birthday).id_salt("birthday"));
/// # });
/// ```
pub struct Datepicker<'a> {
    selection: &'a mut Option<NaiveDate>,
    id_salt: Option<&'a str>,
    format: DateFormat,
    typeable: bool,
    inline: bool,
    use_utc: bool,
    locale: Locale,
    first_day_of_week: u32,
    show_edge_dates: bool,
    minimum_view: View,
    maximum_view: View,
    initial_view: Option<View>,
    open_date: Option<NaiveDate>,
    disabled_dates: DisabledDates,
    transition_delay: f64,
    placeholder: String,
    clearable: bool,
    show_icon: bool,
    parse_typed: Option<Box<dyn Fn(&str) -> Option<NaiveDate> + Send + Sync>>,
}

impl<'a> Datepicker<'a> {
    pub fn new(selection: &'a mut Option<NaiveDate>) -> Self {
        Self {
            selection,
            id_salt: None,
            format: DateFormat::default(),
            typeable: false,
            inline: false,
            use_utc: false,
            locale: Locale::default(),
            first_day_of_week: 0,
            show_edge_dates: true,
            minimum_view: View::Day,
            maximum_view: View::Year,
            initial_view: None,
            open_date: None,
            disabled_dates: DisabledDates::default(),
            transition_delay: 0.0,
            placeholder: String::new(),
            clearable: false,
            show_icon: true,
            parse_typed: None,
        }
    }

    /// Add id salt.
    /// Must be set if multiple date pickers are in the same `Ui`.
    #[inline]
    pub fn id_salt(mut self, id_salt: &'a str) -> Self {
        self.id_salt = Some(id_salt);
        self
    }

    /// Change the display format. (Default: `%d %b %Y`)
    /// See [`chrono::format::strftime`] for valid patterns.
    #[inline]
    pub fn format(mut self, pattern: impl Into<String>) -> Self {
        self.format = DateFormat::Pattern(pattern.into());
        self
    }

    /// Use a custom formatting function instead of a pattern. Typed input
    /// then needs [`Self::parse_typed`] to be accepted.
    #[inline]
    pub fn format_with(
        mut self,
        formatter: impl Fn(NaiveDate) -> String + Send + Sync + 'static,
    ) -> Self {
        self.format = DateFormat::Custom(std::sync::Arc::new(formatter));
        self
    }

    /// Let the user type the date as text. (Default: false)
    #[inline]
    pub fn typeable(mut self, typeable: bool) -> Self {
        self.typeable = typeable;
        self
    }

    /// Embed the calendar permanently instead of opening an overlay.
    /// (Default: false)
    #[inline]
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Read "today" from the UTC clock instead of local time.
    /// (Default: false)
    #[inline]
    pub fn utc(mut self, use_utc: bool) -> Self {
        self.use_utc = use_utc;
        self
    }

    #[inline]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Which weekday starts the week rows. (Default: Sunday)
    #[inline]
    pub fn first_day_of_week(mut self, weekday: Weekday) -> Self {
        self.first_day_of_week = weekday.num_days_from_sunday();
        self
    }

    /// Like [`Self::first_day_of_week`], by index with 0 = Sunday.
    #[inline]
    pub fn first_day_of_week_index(mut self, index: u32) -> Self {
        self.first_day_of_week = index % 7;
        self
    }

    /// Show leading/trailing days of adjacent months instead of blanks.
    /// (Default: true)
    #[inline]
    pub fn show_edge_dates(mut self, show_edge_dates: bool) -> Self {
        self.show_edge_dates = show_edge_dates;
        self
    }

    /// The finest view the user can reach; selecting at this view commits
    /// the date. (Default: [`View::Day`])
    #[inline]
    pub fn minimum_view(mut self, view: View) -> Self {
        self.minimum_view = view;
        self
    }

    /// The coarsest view the user can reach. (Default: [`View::Year`])
    #[inline]
    pub fn maximum_view(mut self, view: View) -> Self {
        self.maximum_view = view;
        self
    }

    /// The view shown when the picker opens. Must lie within
    /// [`Self::minimum_view`]`..=`[`Self::maximum_view`]; an out-of-range
    /// value is a configuration bug and panics when the picker is shown.
    #[inline]
    pub fn initial_view(mut self, view: View) -> Self {
        self.initial_view = Some(view);
        self
    }

    /// The page to show when opening without a selection.
    /// (Default: today)
    #[inline]
    pub fn open_date(mut self, date: NaiveDate) -> Self {
        self.open_date = Some(date);
        self
    }

    #[inline]
    pub fn disabled_dates(mut self, disabled_dates: DisabledDates) -> Self {
        self.disabled_dates = disabled_dates;
        self
    }

    /// Seconds to wait after an arrow-key page change before moving focus
    /// onto the new page, matching a page-transition animation.
    /// (Default: 0.0)
    #[inline]
    pub fn transition_delay(mut self, seconds: f64) -> Self {
        self.transition_delay = seconds.max(0.0);
        self
    }

    /// Hint text for an empty typeable input.
    #[inline]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Show a clear button next to the anchor when a date is selected.
    /// (Default: false)
    #[inline]
    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    /// Show the calendar icon on the button. (Default: true)
    #[inline]
    pub fn show_icon(mut self, show_icon: bool) -> Self {
        self.show_icon = show_icon;
        self
    }

    /// Parse typed input with a custom function instead of the display
    /// pattern.
    #[inline]
    pub fn parse_typed(
        mut self,
        parser: impl Fn(&str) -> Option<NaiveDate> + Send + Sync + 'static,
    ) -> Self {
        self.parse_typed = Some(Box::new(parser));
        self
    }

    pub fn show(self, ui: &mut Ui) -> DatepickerOutput {
        let id = ui.make_persistent_id(self.id_salt.unwrap_or("datepicker"));
        let mut state = ui
            .data_mut(|data| data.get_persisted::<DatepickerState>(id))
            .unwrap_or_default();
        let mut events = Vec::new();

        let utils = DateUtils::new(self.use_utc, self.locale.clone());

        if !state.setup {
            let anchor = (*self.selection)
                .or(self.open_date)
                .unwrap_or_else(|| utils.today());
            state.page = Some((anchor.year(), anchor.month0()));
            state.setup = true;
        }

        let mut view_state = self.make_view_state(&state, &utils);

        let output = if self.inline {
            self.show_inline(ui, id, &mut state, &mut view_state, &utils, &mut events)
        } else {
            self.show_anchored(ui, id, &mut state, &mut view_state, &utils, &mut events)
        };

        state.view = Some(view_state.view());
        state.page = Some((view_state.page().year(), view_state.page().month0()));
        ui.data_mut(|data| data.insert_persisted(id, state));

        output
    }

    /// Rebuilds the view state machine from the persisted page and view.
    fn make_view_state(&self, state: &DatepickerState, utils: &DateUtils) -> ViewState {
        let (year, month0) = state
            .page
            .unwrap_or_else(|| (utils.today().year(), utils.today().month0()));
        let page = NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or_else(|| utils.today());

        let mut view_state = ViewState::new(
            self.minimum_view,
            self.maximum_view,
            self.initial_view,
            page,
        );
        match state.view {
            Some(view) if view_state.set_view(view).is_ok() => {}
            _ => {
                // First open, or the view bounds narrowed since the view
                // was stored. An explicitly configured out-of-range
                // initial view is a caller bug and fails loudly.
                view_state
                    .open()
                    .unwrap_or_else(|err| panic!("egui_calendar: {err}"));
            }
        }
        view_state
    }

    fn show_inline(
        self,
        ui: &mut Ui,
        id: egui::Id,
        state: &mut DatepickerState,
        view_state: &mut ViewState,
        utils: &DateUtils,
        events: &mut Vec<DatepickerEvent>,
    ) -> DatepickerOutput {
        state.open = true;
        // Scope the calendar's internal ids so several inline pickers can
        // share a `Ui`.
        let inner = ui
            .push_id(id, |ui| {
                Frame::group(ui.style()).show(ui, |ui| {
                    let mut popup = CalendarPopup {
                        selection: &mut *self.selection,
                        state: &mut *state,
                        view_state: &mut *view_state,
                        utils,
                        disabled_dates: &self.disabled_dates,
                        first_day_of_week: self.first_day_of_week,
                        show_edge_dates: self.show_edge_dates,
                        typeable: false,
                        inline: true,
                        transition_delay: self.transition_delay,
                        input_response: None,
                        events: &mut *events,
                    };
                    popup.draw(ui);
                });
            })
            .response;

        let mut response = inner;
        if events
            .iter()
            .any(|e| matches!(e, DatepickerEvent::Selected(_)))
        {
            response.mark_changed();
        }
        DatepickerOutput {
            response,
            events: std::mem::take(events),
        }
    }

    fn show_anchored(
        mut self,
        ui: &mut Ui,
        id: egui::Id,
        state: &mut DatepickerState,
        view_state: &mut ViewState,
        utils: &DateUtils,
        events: &mut Vec<DatepickerEvent>,
    ) -> DatepickerOutput {
        let (anchor_response, input_response) =
            self.anchor(ui, state, view_state, utils, events);

        let mut response = anchor_response;

        if state.open {
            let width = 7.5 * 36.0;
            let mut pos = response.rect.left_bottom();
            let margin = f32::from(ui.style().spacing.window_margin.left);
            let width_with_padding = width + ui.style().spacing.item_spacing.x + 2.0 * margin;
            if pos.x + width_with_padding > ui.clip_rect().right() {
                pos.x = response.rect.right() - width_with_padding;
            }
            // Keep the calendar inside the window.
            pos.x = pos.x.max(margin);

            let InnerResponse {
                inner: saved,
                response: area_response,
            } = Area::new(id.with("calendar"))
                .order(Order::Foreground)
                .fixed_pos(pos)
                .show(ui.ctx(), |ui| {
                    Frame::popup(ui.style())
                        .show(ui, |ui| {
                            ui.set_min_width(width);
                            ui.set_max_width(width);
                            let mut popup = CalendarPopup {
                                selection: &mut *self.selection,
                                state: &mut *state,
                                view_state: &mut *view_state,
                                utils,
                                disabled_dates: &self.disabled_dates,
                                first_day_of_week: self.first_day_of_week,
                                show_edge_dates: self.show_edge_dates,
                                typeable: self.typeable,
                                inline: false,
                                transition_delay: self.transition_delay,
                                input_response: input_response.clone(),
                                events: &mut *events,
                            };
                            popup.draw(ui)
                        })
                        .inner
                });

            if saved {
                self.close(state, events);
                response.mark_changed();
            } else if !response.clicked()
                && (ui.input(|i| i.key_pressed(Key::Escape))
                    || area_response.clicked_elsewhere())
            {
                // Keep the popup open while the user types in the anchor.
                let typing = input_response.as_ref().is_some_and(Response::has_focus);
                if !typing || ui.input(|i| i.key_pressed(Key::Escape)) {
                    self.close(state, events);
                }
            }
        }

        if events
            .iter()
            .any(|e| matches!(e, DatepickerEvent::Selected(_) | DatepickerEvent::Cleared))
        {
            response.mark_changed();
        }

        DatepickerOutput {
            response,
            events: std::mem::take(events),
        }
    }

    /// The closed widget: a button showing the formatted date, or a text
    /// input when typeable. Returns the combined anchor response and the
    /// input's own response when there is one.
    fn anchor(
        &mut self,
        ui: &mut Ui,
        state: &mut DatepickerState,
        view_state: &mut ViewState,
        utils: &DateUtils,
        events: &mut Vec<DatepickerEvent>,
    ) -> (Response, Option<Response>) {
        let mut input_response = None;

        let mut response = if self.typeable {
            let mut text = if state.typed.is_empty() {
                self.selection
                    .map(|date| self.format.format(utils, date))
                    .unwrap_or_default()
            } else {
                state.typed.clone()
            };

            let edit = TextEdit::singleline(&mut text)
                .hint_text(self.placeholder.clone())
                .desired_width(140.0);
            let edit_response = ui.add(edit);

            if edit_response.changed() {
                state.typed = text;
                self.on_typed(state, view_state, utils);
            }
            if edit_response.gained_focus() && !state.open {
                self.open(state, view_state, events);
            }
            if edit_response.lost_focus() {
                if ui.input(|i| i.key_pressed(Key::Enter)) {
                    self.commit_typed(state, view_state, utils, events);
                    self.close(state, events);
                } else if !state.typed.is_empty() {
                    self.blur_typed(state, utils, events);
                }
            }

            input_response = Some(edit_response.clone());
            edit_response
        } else {
            let label = self
                .selection
                .map(|date| self.format.format(utils, date))
                .unwrap_or_else(|| {
                    if self.placeholder.is_empty() {
                        "—".to_owned()
                    } else {
                        self.placeholder.clone()
                    }
                });
            let text = if self.show_icon {
                RichText::new(format!("{label} 📆"))
            } else {
                RichText::new(label)
            };

            let visuals = ui.visuals().widgets.open;
            let mut button = Button::new(if state.open {
                text.color(visuals.text_color())
            } else {
                text
            });
            if state.open {
                button = button.fill(visuals.weak_bg_fill).stroke(visuals.bg_stroke);
            }
            let button_response = ui.add(button);
            if button_response.clicked() {
                if state.open {
                    self.close(state, events);
                } else {
                    self.open(state, view_state, events);
                }
            }
            button_response
        };

        if self.clearable && self.selection.is_some() {
            let clear = ui.add(Button::new("✖").small());
            if clear.clicked() {
                *self.selection = None;
                state.typed.clear();
                state.latest_typed = None;
                events.push(DatepickerEvent::Cleared);
            }
            response = response.union(clear);
        }

        (response, input_response)
    }

    fn open(
        &self,
        state: &mut DatepickerState,
        view_state: &mut ViewState,
        events: &mut Vec<DatepickerEvent>,
    ) {
        view_state
            .open()
            .unwrap_or_else(|err| panic!("egui_calendar: {err}"));
        if let Some(date) = *self.selection {
            view_state.show_date(date);
        }
        state.open = true;
        events.push(DatepickerEvent::Opened);
    }

    fn close(&self, state: &mut DatepickerState, events: &mut Vec<DatepickerEvent>) {
        if state.open {
            state.open = false;
            state.typed.clear();
            state.latest_typed = None;
            state.pending_focus = None;
            events.push(DatepickerEvent::Closed);
        }
    }

    /// Typed text changed: remember and show the date when it parses.
    fn on_typed(&self, state: &mut DatepickerState, view_state: &mut ViewState, utils: &DateUtils) {
        let parsed = parse_typed(
            utils,
            &state.typed,
            &self.format,
            self.parse_typed.as_deref(),
        );
        if let Some(date) = parsed {
            state.latest_typed = Some((date.year(), date.month0(), date.day()));
            view_state.show_date(date);
        }
    }

    /// Enter pressed: commit the typed date, or clear on malformed text.
    fn commit_typed(
        &mut self,
        state: &mut DatepickerState,
        view_state: &mut ViewState,
        utils: &DateUtils,
        events: &mut Vec<DatepickerEvent>,
    ) {
        match commit_outcome(
            utils,
            &state.typed,
            &self.format,
            self.parse_typed.as_deref(),
            &self.disabled_dates,
            self.selection.is_some(),
        ) {
            TypedOutcome::Select(date) => {
                *self.selection = Some(date);
                view_state.show_date(date);
                events.push(DatepickerEvent::Selected(date));
            }
            TypedOutcome::Rejected(date) => {
                events.push(DatepickerEvent::DisabledDateAttempted(date));
            }
            TypedOutcome::Clear => {
                if !state.typed.trim().is_empty() {
                    log::debug!(
                        "egui_calendar: clearing unparseable typed date {:?}",
                        state.typed
                    );
                }
                *self.selection = None;
                events.push(DatepickerEvent::Cleared);
            }
            TypedOutcome::Keep => {}
        }
        state.typed.clear();
        state.latest_typed = None;
    }

    /// Focus left the input with text still in it: malformed text clears
    /// the value silently, valid text is left for Enter or a click.
    fn blur_typed(
        &mut self,
        state: &mut DatepickerState,
        utils: &DateUtils,
        events: &mut Vec<DatepickerEvent>,
    ) {
        if blur_outcome(utils, &state.typed, &self.format, self.parse_typed.as_deref())
            == TypedOutcome::Clear
        {
            log::debug!(
                "egui_calendar: clearing unparseable typed date {:?}",
                state.typed
            );
            *self.selection = None;
            state.typed.clear();
            state.latest_typed = None;
            events.push(DatepickerEvent::Cleared);
        }
    }
}

impl Widget for Datepicker<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        self.show(ui).response
    }
}
