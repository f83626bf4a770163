//! Staff break picker controller.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::form::{FieldErrors, validate};
use super::window::{BreakDuration, BreakWindow, format_12h, format_duration, wall_clock};
use crate::api::BreakApi;
use crate::config::ScheduleConfig;
use crate::error::{AppError, Result};
use crate::models::{BreakReceipt, BreakRequest, StaffRecord};
use crate::notice::Notice;

/// Pre-selection value meaning "no particular staff member".
pub const ALL_STAFF: &str = "all";

/// Scheduler settings taken from `[schedule]`.
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub tz: Tz,
    pub break_name: String,
}

impl ScheduleSettings {
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            tz: config.tz(),
            break_name: config.break_name.clone(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

#[derive(Debug)]
enum BreakEvent {
    RosterLoaded(Result<Vec<StaffRecord>>),
    Saved(Result<BreakReceipt>),
}

#[derive(Debug)]
struct BreakMessage {
    generation: u64,
    event: BreakEvent,
}

type CloseCallback = Box<dyn FnMut() + Send>;

/// Single-form break picker: staff, duration, computed window, save.
pub struct BreakScheduler<A> {
    api: Arc<A>,
    runtime: Handle,
    settings: ScheduleSettings,
    tx: mpsc::UnboundedSender<BreakMessage>,
    rx: mpsc::UnboundedReceiver<BreakMessage>,
    pending: usize,
    generation: u64,
    open: bool,
    /// Staff id supplied by the host screen.
    pinned_staff: Option<String>,
    selected_staff: Option<String>,
    duration: Option<BreakDuration>,
    start: DateTime<Utc>,
    roster: Vec<StaffRecord>,
    roster_loading: bool,
    errors: FieldErrors,
    saving: bool,
    notice: Option<Notice>,
    on_close: Option<CloseCallback>,
}

impl<A: BreakApi + 'static> BreakScheduler<A> {
    pub fn new(api: Arc<A>, runtime: Handle, settings: ScheduleSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            runtime,
            settings,
            tx,
            rx,
            pending: 0,
            generation: 0,
            open: false,
            pinned_staff: None,
            selected_staff: None,
            duration: None,
            start: Utc::now(),
            roster: Vec::new(),
            roster_loading: false,
            errors: FieldErrors::default(),
            saving: false,
            notice: None,
            on_close: None,
        }
    }

    /// Called whenever the picker closes.
    pub fn on_close(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Set the host's staff pre-selection. `"all"` or blank clears it.
    ///
    /// Any chosen duration is reset.
    pub fn set_staff_id(&mut self, staff_id: &str) {
        let staff_id = staff_id.trim();
        if staff_id.is_empty() || staff_id == ALL_STAFF {
            self.pinned_staff = None;
        } else {
            self.pinned_staff = Some(staff_id.to_string());
            self.selected_staff = Some(staff_id.to_string());
        }
        self.duration = None;
    }

    /// Open the picker. The break starts at `now`.
    pub fn open(&mut self, now: DateTime<Utc>) {
        self.generation += 1;
        self.open = true;
        self.start = now;
        self.notice = None;
        self.saving = false;
        info!("Opening break picker at {}", format_12h(wall_clock(now, self.settings.tz)));

        let api = Arc::clone(&self.api);
        self.roster_loading = true;
        self.spawn(async move { api.fetch_all_staff().await }, BreakEvent::RosterLoaded);
    }

    /// Cancel: clear the entry and close.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.clear_entry();
        self.open = false;
        self.saving = false;
        self.roster_loading = false;
        debug!("Break picker closed");

        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.roster_loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn roster(&self) -> &[StaffRecord] {
        &self.roster
    }

    /// The staff selector is locked when the pre-selected member is on the roster.
    pub fn is_staff_locked(&self) -> bool {
        match &self.pinned_staff {
            Some(id) => self.roster.iter().any(|s| &s.id == id),
            None => false,
        }
    }

    pub fn selected_staff(&self) -> Option<&str> {
        self.selected_staff.as_deref()
    }

    /// Choose a staff member from the roster. A blank id clears the choice.
    pub fn select_staff(&mut self, staff_id: &str) -> Result<()> {
        if self.is_staff_locked() {
            return Err(AppError::invalid_state("staff selection is fixed for this break"));
        }
        let staff_id = staff_id.trim();
        if staff_id.is_empty() {
            self.selected_staff = None;
            return Ok(());
        }

        let known = self.roster.iter().any(|s| s.id == staff_id) || self.pinned_staff.as_deref() == Some(staff_id);
        if !known {
            return Err(AppError::validation(format!("Staff member {staff_id} is not on the roster")));
        }
        self.selected_staff = Some(staff_id.to_string());
        Ok(())
    }

    pub fn duration(&self) -> Option<BreakDuration> {
        self.duration
    }

    pub fn select_duration(&mut self, minutes: u32) -> Result<()> {
        self.duration = Some(BreakDuration::new(minutes)?);
        Ok(())
    }

    pub fn clear_duration(&mut self) {
        self.duration = None;
    }

    /// Current window; without a duration the break ends when it starts.
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        match self.duration {
            Some(duration) => {
                let window = BreakWindow::new(self.start, duration);
                (window.start, window.end)
            }
            None => (self.start, self.start),
        }
    }

    pub fn start_label(&self) -> String {
        format_12h(wall_clock(self.window().0, self.settings.tz))
    }

    pub fn end_label(&self) -> String {
        format_12h(wall_clock(self.window().1, self.settings.tz))
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.duration.map(BreakDuration::minutes).unwrap_or(0))
    }

    /// Messages from the last save attempt.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate and submit. Returns whether a request was sent.
    pub fn save(&mut self) -> bool {
        if !self.open || self.saving {
            return false;
        }

        self.errors = validate(self.selected_staff.as_deref(), self.duration);
        let request = match self.build_request() {
            Some(request) if self.errors.is_empty() => request,
            _ => {
                debug!("Break form has {} error(s)", self.errors.count());
                return false;
            }
        };

        info!(
            "Creating {} min break for staff {} ({} - {})",
            request.duration_minutes, request.staff_id, request.start_time, request.end_time
        );

        self.saving = true;
        let api = Arc::clone(&self.api);
        self.spawn(
            async move { api.create_staff_break(&request).await },
            BreakEvent::Saved,
        );
        true
    }

    fn build_request(&self) -> Option<BreakRequest> {
        let staff_id = self.selected_staff.as_deref()?;
        let duration = self.duration?;
        let window = BreakWindow::new(self.start, duration);
        Some(window.to_request(staff_id, &self.settings.break_name, duration, self.settings.tz))
    }

    /// Take the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Apply every result that has arrived. Returns how many were received.
    pub fn poll_messages(&mut self) -> usize {
        let mut received = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            received += 1;
        }
        received
    }

    /// Wait for every spawned request to report back.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.rx.recv().await {
                Some(message) => self.apply(message),
                None => break,
            }
        }
    }

    fn spawn<F, T>(&mut self, request: F, wrap: fn(Result<T>) -> BreakEvent)
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let tx = self.tx.clone();
        let generation = self.generation;
        self.pending += 1;
        let task = self.runtime.spawn(request);
        self.runtime.spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(AppError::Task(e.to_string())),
            };
            let _ = tx.send(BreakMessage {
                generation,
                event: wrap(result),
            });
        });
    }

    /// Reset staff (unless pinned), duration, and errors.
    fn clear_entry(&mut self) {
        self.selected_staff = self.pinned_staff.clone();
        self.duration = None;
        self.errors = FieldErrors::default();
    }

    fn apply(&mut self, message: BreakMessage) {
        self.pending = self.pending.saturating_sub(1);

        if !self.open || message.generation != self.generation {
            debug!("Dropping stale break result: {:?}", message.event);
            return;
        }

        match message.event {
            BreakEvent::RosterLoaded(result) => {
                self.roster_loading = false;
                match result {
                    Ok(staff) => self.roster = staff,
                    Err(e) if e.is_partial_data() => warn!("Staff roster not applied: {e}"),
                    Err(e) => {
                        warn!("Failed to load staff: {e}");
                        self.notice = Some(Notice::error("Error", "Failed to load staff"));
                    }
                }
            }
            BreakEvent::Saved(result) => {
                self.saving = false;
                match result {
                    Ok(_) => {
                        info!("Staff break created");
                        self.notice = Some(Notice::success(
                            "Break saved",
                            "Staff break has been successfully created.",
                        ));
                        self.close();
                    }
                    Err(e) if e.is_partial_data() => warn!("Break response not confirmed: {e}"),
                    Err(e) => {
                        warn!("Failed to create staff break: {e}");
                        self.notice = Some(Notice::error(
                            "Error",
                            "Failed to create staff break. Please try again.",
                        ));
                    }
                }
            }
        }
    }
}
