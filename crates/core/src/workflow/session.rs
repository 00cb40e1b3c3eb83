//! Owned session state for one portal workflow.
//!
//! The session is deliberately synchronous and free of I/O. Every remote
//! operation is split into a `begin_*` call that hands out a ticket and a
//! `complete_*` call that commits the result. Tickets carry a generation
//! number per resource slot; a completion whose ticket is no longer the
//! latest is discarded, so a stale in-flight response can never overwrite a
//! newer one.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::field::{
    coerce_submission, initial_form_values, FieldDescriptor, FormValues,
};
use crate::domain::product::Product;
use crate::domain::quotation::Quotation;
use crate::errors::{ServiceError, WorkflowError};
use crate::workflow::screens::{transition, Screen, ScreenEvent};

/// User-visible message for a failed credential check.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
/// User-visible message for a failed price calculation.
pub const CALCULATION_FAILED: &str = "Failed to calculate price. Please try again.";
/// User-visible message for a failed product list fetch.
pub const PRODUCTS_FAILED: &str = "Failed to load products. Please try again.";
/// User-visible message for a failed field definition fetch.
pub const FIELDS_FAILED: &str = "Failed to load product fields. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoginTicket {
    seq: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductFetch {
    epoch: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldFetch {
    epoch: u64,
}

/// Ticket for one price calculation. The submission payload is coerced at
/// dispatch time, so later form edits cannot leak into an in-flight call.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculationTicket {
    seq: u64,
    pub payload: Map<String, Value>,
}

/// Whether a completion was committed or lost to a newer ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Rejected,
    Superseded,
}

/// Observable side effects the presentation layer must perform after a
/// commit. The original interface scrolled the result region into view once
/// a quotation appeared; a terminal front end renders the block immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEffect {
    RevealQuotation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalculationOutcome {
    pub commit: CommitOutcome,
    pub effects: Vec<ViewEffect>,
}

/// All mutable state of one workflow, owned exclusively.
#[derive(Clone, Debug)]
pub struct WorkflowSession {
    screen: Screen,
    authenticated: bool,
    authenticated_at: Option<DateTime<Utc>>,
    login_error: Option<String>,
    login_seq: u64,

    products: Vec<Product>,
    products_loaded: bool,
    products_error: Option<String>,
    product_epoch: u64,

    selected: Option<Product>,
    fields: Vec<FieldDescriptor>,
    form_values: FormValues,
    fields_error: Option<String>,
    field_epoch: u64,

    quotation: Option<Quotation>,
    calculation_error: Option<String>,
    calculation_seq: u64,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
            authenticated: false,
            authenticated_at: None,
            login_error: None,
            login_seq: 0,
            products: Vec::new(),
            products_loaded: false,
            products_error: None,
            product_epoch: 0,
            selected: None,
            fields: Vec::new(),
            form_values: FormValues::new(),
            fields_error: None,
            field_epoch: 0,
            quotation: None,
            calculation_error: None,
            calculation_seq: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn products_loaded(&self) -> bool {
        self.products_loaded
    }

    pub fn products_error(&self) -> Option<&str> {
        self.products_error.as_deref()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn fields_error(&self) -> Option<&str> {
        self.fields_error.as_deref()
    }

    pub fn form_values(&self) -> &FormValues {
        &self.form_values
    }

    pub fn quotation(&self) -> Option<&Quotation> {
        self.quotation.as_ref()
    }

    pub fn calculation_error(&self) -> Option<&str> {
        self.calculation_error.as_deref()
    }

    /// Loading -> LoggedOut, driven by the startup timer.
    pub fn finish_startup(&mut self) -> Result<(), WorkflowError> {
        self.screen = transition(self.screen, ScreenEvent::StartupComplete)?;
        Ok(())
    }

    /// Dispatch a login attempt. Clears the previous mismatch message and
    /// invalidates any attempt still in flight.
    pub fn begin_login(&mut self) -> Result<LoginTicket, WorkflowError> {
        // Dry-run the transition so a login on the wrong screen fails here,
        // not at commit time.
        transition(self.screen, ScreenEvent::LoginSucceeded)?;
        self.login_error = None;
        self.login_seq += 1;
        Ok(LoginTicket { seq: self.login_seq })
    }

    /// Commit a login attempt's verification result. Only the most recently
    /// dispatched attempt may mutate state; submission order wins, not
    /// response order.
    pub fn complete_login(
        &mut self,
        ticket: LoginTicket,
        verified: bool,
    ) -> Result<LoginOutcome, WorkflowError> {
        if ticket.seq != self.login_seq {
            return Ok(LoginOutcome::Superseded);
        }
        if !verified {
            self.login_error = Some(INVALID_CREDENTIALS.to_string());
            return Ok(LoginOutcome::Rejected);
        }

        self.screen = transition(self.screen, ScreenEvent::LoginSucceeded)?;
        self.authenticated = true;
        self.authenticated_at = Some(Utc::now());
        self.login_error = None;
        Ok(LoginOutcome::Authenticated)
    }

    pub fn begin_product_fetch(&mut self) -> Result<ProductFetch, WorkflowError> {
        if !self.authenticated {
            return Err(WorkflowError::NotAuthenticated);
        }
        self.products_error = None;
        self.product_epoch += 1;
        Ok(ProductFetch { epoch: self.product_epoch })
    }

    /// On success the collection is replaced wholesale; there is no merge.
    /// On failure the collection is left as-is and the visible error slot is
    /// set.
    pub fn complete_product_fetch(
        &mut self,
        fetch: ProductFetch,
        result: Result<Vec<Product>, ServiceError>,
    ) -> CommitOutcome {
        if fetch.epoch != self.product_epoch {
            return CommitOutcome::Superseded;
        }
        match result {
            Ok(products) => {
                self.products = products;
                self.products_loaded = true;
                self.products_error = None;
            }
            Err(_) => {
                self.products_error = Some(PRODUCTS_FAILED.to_string());
            }
        }
        CommitOutcome::Applied
    }

    /// Select a product: enter the detail screen and reset every piece of
    /// downstream state before the field fetch resolves.
    pub fn choose_product(&mut self, product: Product) -> Result<FieldFetch, WorkflowError> {
        self.screen = transition(self.screen, ScreenEvent::ProductChosen)?;
        self.selected = Some(product);
        self.reset_detail_state();
        self.field_epoch += 1;
        Ok(FieldFetch { epoch: self.field_epoch })
    }

    /// Re-fetch fields for the already selected product (retry affordance).
    /// Same downstream reset as a fresh selection.
    pub fn begin_field_refresh(&mut self) -> Result<FieldFetch, WorkflowError> {
        if self.selected.is_none() {
            return Err(WorkflowError::NoProductSelected);
        }
        self.reset_detail_state();
        self.field_epoch += 1;
        Ok(FieldFetch { epoch: self.field_epoch })
    }

    /// Success replaces the descriptor sequence and re-initializes the form
    /// with one empty entry per field; failure leaves no fields and sets the
    /// visible error slot. Stale completions are discarded.
    pub fn complete_field_fetch(
        &mut self,
        fetch: FieldFetch,
        result: Result<Vec<FieldDescriptor>, ServiceError>,
    ) -> CommitOutcome {
        if fetch.epoch != self.field_epoch {
            return CommitOutcome::Superseded;
        }
        match result {
            Ok(fields) => {
                self.form_values = initial_form_values(&fields);
                self.fields = fields;
                self.fields_error = None;
            }
            Err(_) => {
                self.fields.clear();
                self.form_values.clear();
                self.fields_error = Some(FIELDS_FAILED.to_string());
            }
        }
        CommitOutcome::Applied
    }

    /// Pure local mutation; no validation or coercion happens here.
    pub fn set_field(
        &mut self,
        name: &str,
        raw: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        match self.form_values.get_mut(name) {
            Some(slot) => {
                *slot = raw.into();
                Ok(())
            }
            None => Err(WorkflowError::UnknownField { name: name.to_string() }),
        }
    }

    /// Dispatch a calculation: clear the previous result and error, coerce
    /// the current form into the submission payload.
    pub fn begin_calculation(&mut self) -> Result<CalculationTicket, WorkflowError> {
        if self.selected.is_none() {
            return Err(WorkflowError::NoProductSelected);
        }
        self.calculation_error = None;
        self.quotation = None;
        self.calculation_seq += 1;
        Ok(CalculationTicket {
            seq: self.calculation_seq,
            payload: coerce_submission(&self.fields, &self.form_values),
        })
    }

    pub fn complete_calculation(
        &mut self,
        ticket: &CalculationTicket,
        result: Result<Quotation, ServiceError>,
    ) -> CalculationOutcome {
        if ticket.seq != self.calculation_seq {
            return CalculationOutcome { commit: CommitOutcome::Superseded, effects: Vec::new() };
        }
        match result {
            Ok(quotation) => {
                self.quotation = Some(quotation);
                self.calculation_error = None;
                CalculationOutcome {
                    commit: CommitOutcome::Applied,
                    effects: vec![ViewEffect::RevealQuotation],
                }
            }
            Err(_) => {
                self.quotation = None;
                self.calculation_error = Some(CALCULATION_FAILED.to_string());
                CalculationOutcome { commit: CommitOutcome::Applied, effects: Vec::new() }
            }
        }
    }

    /// Return to the product list. The previously fetched product collection
    /// is retained for the session lifetime; it is not re-fetched.
    pub fn back_to_list(&mut self) -> Result<(), WorkflowError> {
        self.screen = transition(self.screen, ScreenEvent::BackRequested)?;
        self.selected = None;
        self.reset_detail_state();
        // Invalidate any field fetch still in flight for the old selection.
        self.field_epoch += 1;
        Ok(())
    }

    fn reset_detail_state(&mut self) {
        self.fields.clear();
        self.form_values.clear();
        self.fields_error = None;
        self.quotation = None;
        self.calculation_error = None;
    }
}
