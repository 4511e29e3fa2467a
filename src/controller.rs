use log::{debug, warn};

use crate::config::PanelConfig;
use crate::dispatcher::{self, Outcome, Transport};
use crate::error::PanelError;
use crate::form::{SortColumn, UploadForm, VisitInfo};
use crate::render::{self, NodeUpdate, ViewState};
use crate::selection::{SelectedFile, Selection};
use crate::templates::Templates;
use crate::validator::{self, FieldMarks};
use crate::visibility::{PageState, Panel, Visibility};

/// Identifies one submission; replies carrying an outdated ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Owns every piece of page state and reacts to user actions
///
/// One instance is built at startup. Each public method corresponds to a
/// user action or to the arrival of the upload reply; after any of them
/// the caller re-renders with [`ViewController::render`].
pub struct ViewController {
    config: PanelConfig,
    templates: Templates,
    selection: Selection,
    sort_column: SortColumn,
    visit: VisitInfo,
    marks: FieldMarks,
    panel: Panel,
    drag_over: bool,
    next_ticket: u64,
    in_flight: Option<u64>,
    clear_fields: bool,
}

impl ViewController {
    pub fn new(config: PanelConfig) -> Result<Self, PanelError> {
        Ok(Self {
            config,
            templates: Templates::new()?,
            selection: Selection::new(),
            sort_column: SortColumn::default(),
            visit: VisitInfo::default(),
            marks: FieldMarks::default(),
            panel: Panel::Hidden,
            drag_over: false,
            next_ticket: 0,
            in_flight: None,
            clear_fields: false,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn page_state(&self) -> PageState {
        PageState::derive(self.selection.is_selected(), &self.panel)
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.current()
    }

    pub fn sort_column(&self) -> SortColumn {
        self.sort_column
    }

    pub fn visit(&self) -> &VisitInfo {
        &self.visit
    }

    pub fn marks(&self) -> FieldMarks {
        self.marks
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn drag_over(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Reject a candidate by name before its content is read
    pub fn check_candidate(&mut self, name: &str) -> Result<(), PanelError> {
        self.drag_over = false;
        Selection::check(name).inspect_err(|err| self.show_error(err.to_string()))
    }

    /// Select a dropped or picked file
    ///
    /// On success the transient panels are hidden and the options shown.
    /// On failure the error panel shows the reason and the previous
    /// selection, if any, is kept.
    pub fn choose_file(&mut self, file: SelectedFile) -> Result<(), PanelError> {
        self.drag_over = false;
        match self.selection.accept(file) {
            Ok(_) => {
                self.set_panel(Panel::Hidden);
                Ok(())
            }
            Err(err) => {
                self.show_error(err.to_string());
                Err(err)
            }
        }
    }

    pub fn remove_file(&mut self) {
        if let Some(file) = self.selection.remove() {
            debug!("removed {}", file.name);
        }
        self.set_panel(Panel::Hidden);
    }

    pub fn set_sort_column(&mut self, column: SortColumn) {
        self.sort_column = column;
    }

    pub fn set_date_start(&mut self, value: &str) {
        self.visit.date_start = value.to_string();
        self.refresh_date_marks();
    }

    pub fn set_date_end(&mut self, value: &str) {
        self.visit.date_end = value.to_string();
        self.refresh_date_marks();
    }

    pub fn set_purpose(&mut self, value: &str) {
        self.visit.purpose = value.to_string();
        self.marks.purpose = validator::purpose_mark(&self.visit.purpose);
    }

    pub fn blur_purpose(&mut self) {
        self.marks.purpose = validator::purpose_mark(&self.visit.purpose);
    }

    /// Validate and switch to loading
    ///
    /// Returns the form to send and the ticket that [`finish_submit`]
    /// expects back. Refused while another submission is in flight.
    ///
    /// [`finish_submit`]: ViewController::finish_submit
    pub fn begin_submit(&mut self) -> Result<(Ticket, UploadForm), PanelError> {
        if self.in_flight.is_some() {
            warn!("submission refused: another one is in flight");
            return Err(PanelError::SubmissionInFlight);
        }

        let prepared = dispatcher::prepare(self.selection.current(), self.sort_column, &self.visit);
        if let Some(marks) = prepared.marks {
            self.marks = marks;
        }

        match prepared.form {
            Ok(form) => {
                self.set_panel(Panel::Loading);
                self.next_ticket += 1;
                self.in_flight = Some(self.next_ticket);
                debug!("submission {} started", self.next_ticket);
                Ok((Ticket(self.next_ticket), form))
            }
            Err(err) => {
                self.show_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply the outcome of the submission identified by `ticket`
    ///
    /// Returns false, leaving the page untouched, when the ticket is no
    /// longer the one in flight (the user reset or reselected meanwhile).
    pub fn finish_submit(&mut self, ticket: Ticket, outcome: Outcome) -> bool {
        if self.in_flight != Some(ticket.0) {
            debug!("dropping stale reply for submission {}", ticket.0);
            return false;
        }
        self.in_flight = None;
        self.panel = match outcome {
            Outcome::Rendered(result) => Panel::Results(Box::new(result)),
            Outcome::Failed(message) => Panel::Error(message),
        };
        true
    }

    /// Run a whole submission through `transport`
    pub async fn submit<T: Transport>(&mut self, transport: &T) -> Result<PageState, PanelError> {
        let (ticket, form) = self.begin_submit()?;
        let outcome = dispatcher::dispatch(
            transport,
            &self.config.upload_url,
            &form,
            &self.config.fallback_error,
        )
        .await;
        self.finish_submit(ticket, outcome);
        Ok(self.page_state())
    }

    /// Back to idle: no file, empty visit fields, no markers, no panel
    pub fn reset(&mut self) {
        self.selection.remove();
        self.visit.clear();
        self.marks = FieldMarks::default();
        self.drag_over = false;
        self.clear_fields = true;
        self.set_panel(Panel::Hidden);
        debug!("reset to idle");
    }

    pub fn view(&self) -> ViewState {
        let (error, results) = match &self.panel {
            Panel::Error(message) => (Some(message.clone()), None),
            Panel::Results(result) => (None, Some(render::results_view(result, &self.config))),
            Panel::Hidden | Panel::Loading => (None, None),
        };

        ViewState {
            file_name: self.selection.current().map(|f| f.name.clone()),
            visibility: Visibility::compute(self.selection.is_selected(), &self.panel),
            marks: self.marks,
            drag_over: self.drag_over,
            clear_fields: self.clear_fields,
            error,
            results,
        }
    }

    /// Node updates for the current state
    ///
    /// Consumes the pending request to empty the visit inputs, so only the
    /// first render after a reset clears them.
    pub fn render(&mut self) -> Result<Vec<NodeUpdate>, PanelError> {
        let view = self.view();
        self.clear_fields = false;
        render::render(&view, &self.templates)
    }

    /// The browser could not read an accepted candidate
    pub fn file_unreadable(&mut self, name: &str, reason: &str) {
        warn!("could not read {}: {}", name, reason);
        self.show_error(
            PanelError::FileUnreadable {
                name: name.to_string(),
                reason: reason.to_string(),
            }
            .to_string(),
        );
    }

    fn refresh_date_marks(&mut self) {
        let (start, end) = validator::date_marks(&self.visit.date_start, &self.visit.date_end);
        self.marks.date_start = start;
        self.marks.date_end = end;
    }

    fn show_error(&mut self, message: String) {
        self.set_panel(Panel::Error(message));
    }

    // Any panel change made here comes from the user, which abandons a
    // pending submission.
    fn set_panel(&mut self, panel: Panel) {
        if let Some(pending) = self.in_flight.take() {
            debug!("submission {} abandoned", pending);
        }
        self.panel = panel;
    }
}
