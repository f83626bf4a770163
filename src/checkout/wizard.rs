//! Complete-appointment checkout wizard controller.

use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::pricing::{CurrencyFormatter, DiscountSpec, PriceBreakdown};
use super::state::CheckoutState;
use super::step::CheckoutStep;
use crate::api::CheckoutApi;
use crate::config::CheckoutConfig;
use crate::error::{AppError, Result};
use crate::models::catalog::group_by_category;
use crate::models::{Appointment, LineItem, PageRequest, StaffRecord};
use crate::notice::Notice;
use crate::roster::{StaffChoice, StaffOption, find_option, selectable_staff};

/// Wizard settings taken from `[checkout]`.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub page: PageRequest,
    pub payment_methods: Vec<String>,
}

impl CheckoutSettings {
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self {
            page: PageRequest::first(config.page_size, config.sort.clone()),
            payment_methods: config.payment_methods.clone(),
        }
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self::from_config(&CheckoutConfig::default())
    }
}

/// Result of a background request.
#[derive(Debug)]
enum CheckoutEvent {
    ServicesLoaded(Result<Vec<LineItem>>),
    ProductsLoaded(Result<Vec<LineItem>>),
    StaffLoaded(Result<Vec<StaffRecord>>),
    AppointmentLoaded(Result<Appointment>),
    Finalized(Result<Appointment>),
}

/// Event tagged with the open session that requested it.
#[derive(Debug)]
struct CheckoutMessage {
    generation: u64,
    event: CheckoutEvent,
}

#[derive(Debug, Default, Clone, Copy)]
struct Loading {
    services: bool,
    products: bool,
    staff: bool,
}

type CompletedCallback = Box<dyn FnMut(&Appointment) + Send>;
type CloseCallback = Box<dyn FnMut() + Send>;

/// Four-step checkout: services, products, staff, then payment.
///
/// Requests run on the tokio runtime and report back over a channel. The
/// host calls [`poll_messages`](Self::poll_messages) once per frame, or
/// awaits [`settle`](Self::settle). Results from an earlier open, or arriving
/// after close, are dropped.
pub struct CheckoutWizard<A> {
    api: Arc<A>,
    runtime: Handle,
    settings: CheckoutSettings,
    formatter: Box<dyn CurrencyFormatter>,
    tx: mpsc::UnboundedSender<CheckoutMessage>,
    rx: mpsc::UnboundedReceiver<CheckoutMessage>,
    /// Spawned requests not yet received, across all generations.
    pending: usize,
    generation: u64,
    open: bool,
    appointment: Option<Appointment>,
    state: CheckoutState,
    services: Vec<LineItem>,
    products: Vec<LineItem>,
    roster: Vec<StaffRecord>,
    loading: Loading,
    /// Set once the user toggles a service; booked services then no longer
    /// overwrite the selection.
    services_touched: bool,
    submitting: bool,
    notice: Option<Notice>,
    on_completed: Option<CompletedCallback>,
    on_close: Option<CloseCallback>,
}

impl<A: CheckoutApi + 'static> CheckoutWizard<A> {
    pub fn new(
        api: Arc<A>,
        runtime: Handle,
        settings: CheckoutSettings,
        formatter: impl CurrencyFormatter + 'static,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            runtime,
            settings,
            formatter: Box::new(formatter),
            tx,
            rx,
            pending: 0,
            generation: 0,
            open: false,
            appointment: None,
            state: CheckoutState::new(),
            services: Vec::new(),
            products: Vec::new(),
            roster: Vec::new(),
            loading: Loading::default(),
            services_touched: false,
            submitting: false,
            notice: None,
            on_completed: None,
            on_close: None,
        }
    }

    /// Called with the updated appointment after a successful finalize.
    pub fn on_completed(mut self, callback: impl FnMut(&Appointment) + Send + 'static) -> Self {
        self.on_completed = Some(Box::new(callback));
        self
    }

    /// Called whenever the wizard closes.
    pub fn on_close(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Open the wizard for `appointment` and start loading lists.
    pub fn open(&mut self, appointment: Appointment) {
        self.generation += 1;
        self.open = true;
        self.submitting = false;
        self.services_touched = false;
        self.notice = None;
        self.services.clear();
        self.products.clear();
        self.roster.clear();
        self.state = CheckoutState::seeded_from(&appointment);
        if let Some(first) = self.settings.payment_methods.first() {
            self.state.payment_method = first.clone();
        }

        info!("Opening checkout for appointment {}", appointment.id);

        let api = Arc::clone(&self.api);
        let page = self.settings.page.clone();
        self.loading.services = true;
        self.spawn(async move { api.fetch_services(&page).await }, CheckoutEvent::ServicesLoaded);

        let api = Arc::clone(&self.api);
        let page = self.settings.page.clone();
        self.loading.products = true;
        self.spawn(async move { api.fetch_products(&page).await }, CheckoutEvent::ProductsLoaded);

        let api = Arc::clone(&self.api);
        self.loading.staff = true;
        self.spawn(async move { api.fetch_all_staff().await }, CheckoutEvent::StaffLoaded);

        if appointment.appointment_services.is_empty() {
            let api = Arc::clone(&self.api);
            let id = appointment.id.clone();
            self.spawn(
                async move { api.get_appointment_by_id(&id).await },
                CheckoutEvent::AppointmentLoaded,
            );
        }

        self.appointment = Some(appointment);
    }

    /// Close and discard all selections. In-flight requests are not aborted.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.appointment = None;
        self.state = CheckoutState::new();
        self.loading = Loading::default();
        self.submitting = false;
        debug!("Checkout closed");

        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Any list still loading.
    pub fn is_loading(&self) -> bool {
        self.loading.services || self.loading.products
    }

    pub fn is_staff_loading(&self) -> bool {
        self.loading.staff
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn appointment(&self) -> Option<&Appointment> {
        self.appointment.as_ref()
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn step(&self) -> CheckoutStep {
        self.state.step()
    }

    pub fn services(&self) -> &[LineItem] {
        &self.services
    }

    pub fn products(&self) -> &[LineItem] {
        &self.products
    }

    /// Products grouped by category for the product step.
    pub fn product_groups(&self) -> Vec<(&str, Vec<&LineItem>)> {
        group_by_category(&self.products)
    }

    /// Options for the staff step, "Any staff" first.
    pub fn staff_options(&self) -> Vec<StaffOption> {
        selectable_staff(&self.roster)
    }

    pub fn payment_methods(&self) -> &[String] {
        &self.settings.payment_methods
    }

    pub fn toggle_service(&mut self, id: &str) -> bool {
        self.services_touched = true;
        self.state.selected_services.toggle(id)
    }

    pub fn toggle_product(&mut self, id: &str) -> bool {
        self.state.selected_products.toggle(id)
    }

    /// Choose a staff member. Only options currently listed are accepted.
    pub fn select_staff(&mut self, choice: StaffChoice) -> Result<()> {
        let options = self.staff_options();
        let option = find_option(&options, &choice)
            .ok_or_else(|| AppError::validation(format!("Staff member {choice} is not available")))?;
        self.state.select_staff(option.choice.clone(), option.user.clone());
        Ok(())
    }

    pub fn set_tip(&mut self, amount: Decimal) -> Result<()> {
        self.state.set_tip(amount)
    }

    pub fn set_discount(&mut self, discount: DiscountSpec) {
        self.state.discount = discount;
    }

    /// Set the discount from a type name and an entered value.
    ///
    /// Out-of-range values are rejected and the current discount is kept.
    pub fn apply_discount(&mut self, kind: &str, value: Decimal) -> Result<()> {
        self.state.discount = DiscountSpec::from_kind(kind, value)?;
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: &str) -> Result<()> {
        let known = self.settings.payment_methods.is_empty() || self.settings.payment_methods.iter().any(|m| m == method);
        if !known {
            return Err(AppError::validation(format!("Unknown payment method: {method}")));
        }
        self.state.payment_method = method.to_string();
        Ok(())
    }

    /// Go to the next step. Returns `false` at the payment step.
    pub fn next(&mut self) -> bool {
        let moved = self.state.advance();
        if moved {
            debug!("Checkout step -> {}", self.state.step());
        }
        moved
    }

    /// Go to the previous step. No-op on the first step.
    pub fn back(&mut self) -> bool {
        let moved = self.state.retreat();
        if moved {
            debug!("Checkout step -> {}", self.state.step());
        }
        moved
    }

    /// Current totals, recomputed from the selections.
    pub fn price(&self) -> PriceBreakdown {
        self.state.price(&self.services, &self.products)
    }

    pub fn formatted_total(&self) -> String {
        self.formatter.format(self.price().total)
    }

    pub fn format_money(&self, amount: Decimal) -> String {
        self.formatter.format(amount)
    }

    /// Submit the completion request. Only allowed on the payment step.
    ///
    /// Remote failures surface later as a [`Notice`]; the error returned here
    /// only covers actions the current state does not allow.
    pub fn finalize(&mut self) -> Result<()> {
        if !self.open {
            return Err(AppError::invalid_state("checkout is not open"));
        }
        if !self.state.step().is_terminal() {
            return Err(AppError::invalid_state(format!(
                "cannot finalize from step '{}'",
                self.state.step()
            )));
        }
        if self.submitting {
            return Err(AppError::invalid_state("completion already in progress"));
        }
        let id = match &self.appointment {
            Some(appointment) => appointment.id.clone(),
            None => return Err(AppError::invalid_state("no appointment selected")),
        };

        let patch = self.state.completion_request();
        info!(
            "Finalizing appointment {id}: {} services, {} products, total {}",
            patch.services.len(),
            patch.products.len(),
            self.formatted_total()
        );

        self.submitting = true;
        let api = Arc::clone(&self.api);
        self.spawn(
            async move { api.update_appointment(&id, &patch).await },
            CheckoutEvent::Finalized,
        );
        Ok(())
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

    fn spawn<F, T>(&mut self, request: F, wrap: fn(Result<T>) -> CheckoutEvent)
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
            let _ = tx.send(CheckoutMessage {
                generation,
                event: wrap(result),
            });
        });
    }

    fn apply(&mut self, message: CheckoutMessage) {
        self.pending = self.pending.saturating_sub(1);

        if !self.open || message.generation != self.generation {
            debug!("Dropping stale checkout result: {:?}", message.event);
            return;
        }

        match message.event {
            CheckoutEvent::ServicesLoaded(result) => {
                self.loading.services = false;
                match result {
                    Ok(items) => self.services = items,
                    Err(e) => self.report_failure("Failed to load services", e),
                }
            }
            CheckoutEvent::ProductsLoaded(result) => {
                self.loading.products = false;
                match result {
                    Ok(items) => self.products = items,
                    Err(e) => self.report_failure("Failed to load products", e),
                }
            }
            CheckoutEvent::StaffLoaded(result) => {
                self.loading.staff = false;
                match result {
                    Ok(staff) => self.roster = staff,
                    Err(e) => self.report_failure("Failed to load staff", e),
                }
            }
            CheckoutEvent::AppointmentLoaded(result) => match result {
                Ok(_) if self.services_touched => {
                    debug!("Keeping service selection edited during lookup");
                }
                Ok(appointment) => {
                    self.state.selected_services = appointment.service_ids().collect();
                }
                Err(e) => self.report_failure("Failed to load appointment details", e),
            },
            CheckoutEvent::Finalized(result) => {
                self.submitting = false;
                match result {
                    Ok(appointment) => {
                        info!("Appointment {} completed", appointment.id);
                        self.notice = Some(Notice::success("Completed", "Appointment completed & invoiced."));
                        if let Some(callback) = self.on_completed.as_mut() {
                            callback(&appointment);
                        }
                        self.close();
                    }
                    Err(e) => self.report_failure("Failed to complete appointment", e),
                }
            }
        }
    }

    /// Partial payloads are logged only; anything else becomes an error notice.
    fn report_failure(&mut self, what: &str, err: AppError) {
        if err.is_partial_data() {
            warn!("{what}: {err} (ignored)");
            return;
        }
        warn!("{what}: {err}");
        self.notice = Some(Notice::error("Error", what));
    }
}

/// Display label for a payment method: first letter upper-cased.
pub fn payment_method_label(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
