//! The calendar body: header navigation, the day/month/year grids, and
//! keyboard handling (focus trap, arrow navigation, deferred focus).

use chrono::{Datelike as _, NaiveDate};

use egui::{Button, EventFilter, Grid, Key, Modifiers, Response, RichText, Ui, Vec2};

use crate::button::DatepickerState;
use crate::date_utils::DateUtils;
use crate::disabled::DisabledDates;
use crate::event::DatepickerEvent;
use crate::focus::{
    arrow_target, choose_tabbable_cell, columns_for_view, nav_elements, tab_move, ArrowMove,
    NavElement, PendingFocus, TabMove,
};
use crate::grid::{cells_for_view, Cell};
use crate::view::{PageChange, SelectOutcome, View, ViewState};

const CELL_SIZE: Vec2 = Vec2::new(34.0, 20.0);

pub(crate) struct CalendarPopup<'a> {
    pub selection: &'a mut Option<NaiveDate>,
    pub state: &'a mut DatepickerState,
    pub view_state: &'a mut ViewState,
    pub utils: &'a DateUtils,
    pub disabled_dates: &'a DisabledDates,
    pub first_day_of_week: u32,
    pub show_edge_dates: bool,
    pub typeable: bool,
    pub inline: bool,
    pub transition_delay: f64,
    /// The anchor input's response, first in the tab order when typeable.
    pub input_response: Option<Response>,
    pub events: &'a mut Vec<DatepickerEvent>,
}

impl CalendarPopup<'_> {
    /// Draws the calendar. Returns `true` when a date was committed and a
    /// non-inline picker should close.
    pub fn draw(&mut self, ui: &mut Ui) -> bool {
        let today = self.utils.today();
        let view = self.view_state.view();
        let cells = cells_for_view(
            view,
            self.view_state.page(),
            self.first_day_of_week,
            *self.selection,
            today,
            self.disabled_dates,
        );

        let (prev_response, up_response, next_response) = self.header(ui);

        if view == View::Day {
            self.weekday_header(ui);
        }

        let (close, cell_responses) = self.grid(ui, &cells);

        // The grid may have changed the page or view; in that case the
        // cells on screen this frame are stale and focus bookkeeping
        // waits for the next frame.
        let stale =
            view != self.view_state.view() || !self.view_state.page().is_page_of(&cells, view);
        if !stale {
            self.apply_pending_focus(ui, &cells, &cell_responses);
            self.keyboard_navigation(
                ui,
                &cells,
                &cell_responses,
                &prev_response,
                &up_response,
                &next_response,
            );
        }

        close && !self.inline
    }

    fn header(&mut self, ui: &mut Ui) -> (Response, Response, Response) {
        let view = self.view_state.view();
        let rtl = self.utils.locale.rtl;

        // In a right-to-left locale the arrows keep their glyphs but swap
        // their meaning.
        let (first_increment, second_increment) = if rtl { (1, -1) } else { (-1, 1) };

        let up_label = self.up_label();
        let up_allowed = self.up_enabled();

        ui.horizontal(|ui| {
            let first = ui.add_enabled(
                !self.page_change_disabled(first_increment),
                Button::new("<").min_size(CELL_SIZE),
            );
            let up = ui.add_enabled(
                up_allowed,
                Button::new(RichText::new(up_label).strong())
                    .min_size(Vec2::new(CELL_SIZE.x * 5.0, CELL_SIZE.y)),
            );
            let second = ui.add_enabled(
                !self.page_change_disabled(second_increment),
                Button::new(">").min_size(CELL_SIZE),
            );

            if first.clicked() {
                self.change_page(first_increment);
            }
            if second.clicked() {
                self.change_page(second_increment);
            }
            if up.clicked() {
                if let Some(coarser) = view.up() {
                    // `up_allowed` guards the click, so this cannot fail.
                    if self.view_state.set_view(coarser).is_ok() {
                        self.events.push(DatepickerEvent::ViewChanged(coarser));
                    }
                }
            }

            let (prev, next) = if rtl { (second, first) } else { (first, second) };
            (prev, up, next)
        })
        .inner
    }

    fn prev_enabled(&self) -> bool {
        !self.page_change_disabled(-1)
    }

    fn next_enabled(&self) -> bool {
        !self.page_change_disabled(1)
    }

    fn up_enabled(&self) -> bool {
        self.view_state
            .view()
            .up()
            .is_some_and(|coarser| self.view_state.allowed(coarser))
    }

    fn up_label(&self) -> String {
        let page = self.view_state.page();
        let locale = &self.utils.locale;
        let year = format!("{}{}", page.year(), locale.year_suffix);
        match self.view_state.view() {
            View::Day => {
                let month = locale.month_name(page.month0());
                if locale.ymd {
                    format!("{year} {month}")
                } else {
                    format!("{month} {year}")
                }
            }
            View::Month => year,
            View::Year | View::Decade => {
                let decade = page.year().div_euclid(10) * 10;
                format!(
                    "{decade}{suffix} - {}{suffix}",
                    decade + 9,
                    suffix = locale.year_suffix
                )
            }
        }
    }

    fn page_change_disabled(&self, increment: i32) -> bool {
        let view = self.view_state.view();
        let page = self.view_state.page();
        if increment > 0 {
            self.disabled_dates.is_next_page_disabled(view, page)
        } else {
            self.disabled_dates.is_previous_page_disabled(view, page)
        }
    }

    fn change_page(&mut self, increment: i32) {
        match self.view_state.change_page(increment, self.disabled_dates) {
            PageChange::Changed(page) => {
                self.events.push(DatepickerEvent::PageChanged {
                    view: self.view_state.view(),
                    page,
                });
            }
            PageChange::Blocked => {}
        }
    }

    fn weekday_header(&self, ui: &mut Ui) {
        let names = self
            .utils
            .weekday_names(self.first_day_of_week, false);
        Grid::new("weekday_header")
            .num_columns(7)
            .min_col_width(CELL_SIZE.x)
            .show(ui, |ui| {
                let rtl = self.utils.locale.rtl;
                let order: Vec<usize> = if rtl { (0..7).rev().collect() } else { (0..7).collect() };
                for i in order {
                    ui.label(RichText::new(names[i]).weak());
                }
                ui.end_row();
            });
    }

    /// Draws the cell grid. Returns whether a selection was committed and
    /// the responses of the focusable cells, by cell index.
    fn grid(&mut self, ui: &mut Ui, cells: &[Cell]) -> (bool, Vec<(usize, Response)>) {
        let view = self.view_state.view();
        let columns = columns_for_view(view);
        let mut close = false;
        let mut responses = Vec::with_capacity(cells.len());

        Grid::new(("cells", view))
            .num_columns(columns)
            .min_col_width(CELL_SIZE.x)
            .show(ui, |ui| {
                let rtl = self.utils.locale.rtl;
                for (row_index, row) in cells.chunks(columns).enumerate() {
                    let order: Vec<usize> = if rtl {
                        (0..row.len()).rev().collect()
                    } else {
                        (0..row.len()).collect()
                    };
                    for i in order {
                        let index = row_index * columns + i;
                        let cell = &cells[index];
                        if view == View::Day && cell.is_edge() && !self.show_edge_dates {
                            // A blank placeholder keeps the column.
                            let _ = ui.allocate_exact_size(CELL_SIZE, egui::Sense::hover());
                            continue;
                        }
                        if let Some(response) = self.cell_button(ui, cell, &mut close) {
                            responses.push((index, response));
                        }
                    }
                    ui.end_row();
                }
            });

        (close, responses)
    }

    /// Draws one cell. Returns its response when it is focusable.
    fn cell_button(&mut self, ui: &mut Ui, cell: &Cell, close: &mut bool) -> Option<Response> {
        let label = self.cell_label(cell);

        let mut text_color = ui.visuals().widgets.inactive.text_color();
        if cell.is_edge() {
            text_color = text_color.linear_multiply(0.5);
        }
        let fill_color = if cell.selected {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().extreme_bg_color
        };
        let button = Button::new(RichText::new(label).color(text_color))
            .fill(fill_color)
            .min_size(CELL_SIZE);

        if cell.disabled {
            let response = ui.add_enabled(false, button);
            // A disabled cell swallows the click but callers may still
            // want to know about the attempt.
            if ui.rect_contains_pointer(response.rect)
                && ui.input(|i| i.pointer.primary_clicked())
            {
                self.events
                    .push(DatepickerEvent::DisabledDateAttempted(cell.date));
            }
            return None;
        }

        let response = ui.add(button);

        if cell.today {
            // Encircle today's date
            let stroke = ui.visuals().widgets.inactive.fg_stroke;
            ui.painter()
                .circle_stroke(response.rect.center(), 8.0, stroke);
        }

        if response.clicked() {
            match self.view_state.select(cell.date) {
                SelectOutcome::Selected(date) => {
                    *self.selection = Some(date);
                    self.events.push(DatepickerEvent::Selected(date));
                    *close = true;
                }
                SelectOutcome::DrilledDown(view) => {
                    self.events.push(DatepickerEvent::ViewChanged(view));
                }
            }
        }

        Some(response)
    }

    fn cell_label(&self, cell: &Cell) -> String {
        let locale = &self.utils.locale;
        match self.view_state.view() {
            View::Day => cell.date.day().to_string(),
            View::Month => locale.month_abbr(cell.date.month0()).to_owned(),
            View::Year | View::Decade => {
                format!("{}{}", cell.date.year(), locale.year_suffix)
            }
        }
    }

    /// Fires a focus move scheduled by an earlier page change, once its
    /// delay has passed and if view and page still match.
    fn apply_pending_focus(
        &mut self,
        ui: &Ui,
        cells: &[Cell],
        cell_responses: &[(usize, Response)],
    ) {
        let Some(pending) = self.state.pending_focus else {
            return;
        };
        if !pending.still_valid(self.view_state.view(), self.view_state.page()) {
            self.state.pending_focus = None;
            return;
        }
        let now = ui.input(|i| i.time);
        if now < pending.due {
            ui.ctx()
                .request_repaint_after(std::time::Duration::from_secs_f64(pending.due - now));
            return;
        }
        self.state.pending_focus = None;
        let (year, month0, day) = pending.date;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month0 + 1, day) {
            if let Some(index) = cells.iter().position(|c| c.date == date) {
                if let Some((_, response)) =
                    cell_responses.iter().find(|(i, _)| *i == index)
                {
                    response.request_focus();
                }
            }
        }
    }

    /// Tab trapping and arrow navigation.
    fn keyboard_navigation(
        &mut self,
        ui: &mut Ui,
        cells: &[Cell],
        cell_responses: &[(usize, Response)],
        prev_response: &Response,
        up_response: &Response,
        next_response: &Response,
    ) {
        let active_cell = cell_responses
            .iter()
            .find(|(_, response)| response.has_focus())
            .map(|(index, _)| *index);

        let typed = self.state.latest_typed.and_then(|(year, month0, day)| {
            NaiveDate::from_ymd_opt(year, month0 + 1, day)
        });
        let tabbable = choose_tabbable_cell(cells, active_cell, typed);
        self.state.tabbable = tabbable.map(|index| {
            let date = cells[index].date;
            (date.year(), date.month0(), date.day())
        });

        let tabbable_response = tabbable.and_then(|index| {
            cell_responses
                .iter()
                .find(|(i, _)| *i == index)
                .map(|(_, response)| response.clone())
        });

        // Restore the remembered cell when tabbing back into an inline
        // calendar from elsewhere on the page.
        if self.inline {
            self.restore_inline_tabbable(cells, cell_responses);
        }

        let elements = nav_elements(
            self.typeable,
            self.inline,
            self.prev_enabled(),
            self.up_enabled(),
            self.next_enabled(),
            tabbable_response.is_some(),
        );
        let responses: Vec<Response> = elements
            .iter()
            .filter_map(|element| match element {
                NavElement::Input => self.input_response.clone(),
                NavElement::Prev => Some(prev_response.clone()),
                NavElement::Up => Some(up_response.clone()),
                NavElement::Next => Some(next_response.clone()),
                NavElement::Cell => tabbable_response.clone(),
            })
            .collect();

        let focused_nav = responses
            .iter()
            .position(|response| response.has_focus())
            .or_else(|| {
                // Any focused grid cell participates as the cell element.
                active_cell.and(
                    responses
                        .iter()
                        .position(|r| Some(r.id) == tabbable_response.as_ref().map(|t| t.id)),
                )
            });

        if let Some(focused) = focused_nav {
            self.handle_tab(ui, &responses, focused);
        }

        if let Some(index) = active_cell {
            self.handle_arrows(ui, cells, cell_responses, index);
        }
    }

    fn handle_tab(&mut self, ui: &mut Ui, responses: &[Response], focused: usize) {
        let focused_id = responses[focused].id;
        let len = responses.len();

        let backwards = ui.input(|i| i.modifiers.shift_only());
        let release = matches!(
            tab_move(focused, len, backwards, self.inline),
            TabMove::ReleasedStart | TabMove::ReleasedEnd
        );

        // Keep egui's own focus traversal from acting on keys we handle.
        // At an inline calendar's edges Tab is left to egui so that focus
        // is released to the page's natural order.
        ui.memory_mut(|memory| {
            memory.set_focus_lock_filter(
                focused_id,
                EventFilter {
                    tab: !release,
                    horizontal_arrows: true,
                    vertical_arrows: true,
                    ..Default::default()
                },
            );
        });

        if release {
            // Tab is left unconsumed; remember the tabbable cell so that
            // tabbing back restores it rather than an edge date.
            if ui.input(|i| i.key_pressed(Key::Tab)) {
                self.state.inline_tabbable = self.state.tabbable;
            }
            return;
        }

        let modifiers = if backwards {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        if !ui.input_mut(|i| i.consume_key(modifiers, Key::Tab)) {
            return;
        }

        if let TabMove::Trapped(next) = tab_move(focused, len, backwards, self.inline) {
            responses[next].request_focus();
        }
    }

    fn handle_arrows(
        &mut self,
        ui: &mut Ui,
        cells: &[Cell],
        cell_responses: &[(usize, Response)],
        index: usize,
    ) {
        let columns = columns_for_view(self.view_state.view()) as i32;
        let rtl = self.utils.locale.rtl;
        let horizontal = if rtl { -1 } else { 1 };

        let arrows = [
            (Key::ArrowLeft, -horizontal),
            (Key::ArrowRight, horizontal),
            (Key::ArrowUp, -columns),
            (Key::ArrowDown, columns),
        ];

        for (key, delta) in arrows {
            if !ui.input_mut(|i| i.consume_key(Modifiers::NONE, key)) {
                continue;
            }
            match arrow_target(
                self.view_state.view(),
                cells,
                index,
                delta,
                self.disabled_dates,
            ) {
                ArrowMove::Focus(target) => {
                    if let Some((_, response)) =
                        cell_responses.iter().find(|(i, _)| *i == target)
                    {
                        response.request_focus();
                    }
                }
                ArrowMove::Page {
                    increment,
                    focus_date,
                } => {
                    if let PageChange::Changed(page) =
                        self.view_state.change_page(increment, self.disabled_dates)
                    {
                        self.events.push(DatepickerEvent::PageChanged {
                            view: self.view_state.view(),
                            page,
                        });
                        let due = ui.input(|i| i.time) + self.transition_delay;
                        self.state.pending_focus = Some(PendingFocus {
                            view: self.view_state.view(),
                            page: (page.year(), page.month0()),
                            date: (focus_date.year(), focus_date.month0(), focus_date.day()),
                            due,
                        });
                        ui.ctx().request_repaint_after(
                            std::time::Duration::from_secs_f64(self.transition_delay.max(0.0)),
                        );
                        // The grid is stale after a page change.
                        break;
                    }
                }
                ArrowMove::None => {}
            }
        }
    }

    fn restore_inline_tabbable(&mut self, cells: &[Cell], cell_responses: &[(usize, Response)]) {
        let Some((year, month0, day)) = self.state.inline_tabbable else {
            return;
        };
        let gained = cell_responses
            .iter()
            .find(|(_, response)| response.gained_focus());
        let Some((index, _)) = gained else {
            return;
        };
        let Some(date) = NaiveDate::from_ymd_opt(year, month0 + 1, day) else {
            self.state.inline_tabbable = None;
            return;
        };
        if cells[*index].date != date {
            if let Some((_, response)) = cell_responses
                .iter()
                .find(|(i, _)| cells[*i].date == date)
            {
                response.request_focus();
            }
        }
        self.state.inline_tabbable = None;
    }
}

trait PageOf {
    fn is_page_of(&self, cells: &[Cell], view: View) -> bool;
}

impl PageOf for NaiveDate {
    fn is_page_of(&self, cells: &[Cell], view: View) -> bool {
        match view {
            View::Day => cells
                .iter()
                .any(|c| !c.is_edge() && (c.date.year(), c.date.month()) == (self.year(), self.month())),
            View::Month => cells.iter().any(|c| c.date.year() == self.year()),
            View::Year | View::Decade => cells
                .iter()
                .any(|c| c.date.year().div_euclid(10) == self.year().div_euclid(10)),
        }
    }
}
