//! Async driver for the workflow session.
//!
//! The controller is the only place where the session meets the remote
//! service and the credential verifier. It owns the artificial pacing delays
//! (startup spinner, simulated login latency) and is responsible for logging
//! every remote failure and every discarded stale response.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::auth::CredentialVerifier;
use crate::config::UiConfig;
use crate::domain::product::Product;
use crate::errors::WorkflowError;
use crate::service::{CalculateRequest, FieldsRequest, QuoteService};
use crate::workflow::session::{
    CommitOutcome, LoginOutcome, ViewEffect, WorkflowSession,
};

/// Presentation pacing. Both delays are zeroed in tests.
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    pub startup_delay: Duration,
    pub login_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_millis(1500),
            login_delay: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self { startup_delay: Duration::ZERO, login_delay: Duration::ZERO }
    }
}

impl From<&UiConfig> for Pacing {
    fn from(ui: &UiConfig) -> Self {
        Self {
            startup_delay: Duration::from_millis(ui.startup_delay_ms),
            login_delay: Duration::from_millis(ui.login_delay_ms),
        }
    }
}

pub struct WorkflowController {
    session: WorkflowSession,
    service: Arc<dyn QuoteService>,
    verifier: Arc<dyn CredentialVerifier>,
    pacing: Pacing,
}

impl WorkflowController {
    pub fn new(
        service: Arc<dyn QuoteService>,
        verifier: Arc<dyn CredentialVerifier>,
        pacing: Pacing,
    ) -> Self {
        Self { session: WorkflowSession::new(), service, verifier, pacing }
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    /// Run the startup timer, then leave the loading screen.
    pub async fn start(&mut self) -> Result<(), WorkflowError> {
        tokio::time::sleep(self.pacing.startup_delay).await;
        self.session.finish_startup()?;
        debug!(screen = ?self.session.screen(), "startup complete");
        Ok(())
    }

    /// One login attempt. A match authenticates the session and triggers the
    /// product fetch; a mismatch sets the visible message and changes
    /// nothing else.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, WorkflowError> {
        let ticket = self.session.begin_login()?;
        tokio::time::sleep(self.pacing.login_delay).await;

        let verified = self.verifier.verify(email, password);
        let outcome = self.session.complete_login(ticket, verified)?;
        match outcome {
            LoginOutcome::Authenticated => {
                info!(email, "login accepted");
                self.ensure_products().await?;
            }
            LoginOutcome::Rejected => {
                info!(email, "login rejected");
            }
            LoginOutcome::Superseded => {
                warn!(email, "stale login attempt discarded");
            }
        }
        Ok(outcome)
    }

    /// Fetch the product list once per session. Subsequent calls reuse the
    /// cached collection; a failed fetch leaves the session retryable.
    pub async fn ensure_products(&mut self) -> Result<(), WorkflowError> {
        if self.session.products_loaded() {
            return Ok(());
        }
        let fetch = self.session.begin_product_fetch()?;
        let result = self.service.list_products().await;
        if let Err(error) = &result {
            warn!(error = %error, "product list fetch failed");
        }
        if self.session.complete_product_fetch(fetch, result) == CommitOutcome::Superseded {
            warn!("stale product list response discarded");
        }
        Ok(())
    }

    /// Select a product and resolve its field definitions.
    pub async fn select_product(&mut self, product: Product) -> Result<(), WorkflowError> {
        let request_name = product.name.clone();
        let request_code = product.code.clone();
        let fetch = self.session.choose_product(product)?;
        let result = self
            .service
            .resolve_fields(FieldsRequest {
                product: &request_name,
                product_code: &request_code,
            })
            .await;
        if let Err(error) = &result {
            warn!(error = %error, product = %request_name, "field fetch failed");
        }
        if self.session.complete_field_fetch(fetch, result) == CommitOutcome::Superseded {
            debug!(product = %request_name, "stale field response discarded");
        }
        Ok(())
    }

    /// Retry the field fetch for the current selection.
    pub async fn reload_fields(&mut self) -> Result<(), WorkflowError> {
        let selected = self
            .session
            .selected_product()
            .cloned()
            .ok_or(WorkflowError::NoProductSelected)?;
        let fetch = self.session.begin_field_refresh()?;
        let result = self
            .service
            .resolve_fields(FieldsRequest {
                product: &selected.name,
                product_code: &selected.code,
            })
            .await;
        if let Err(error) = &result {
            warn!(error = %error, product = %selected.name, "field fetch failed");
        }
        if self.session.complete_field_fetch(fetch, result) == CommitOutcome::Superseded {
            debug!(product = %selected.name, "stale field response discarded");
        }
        Ok(())
    }

    pub fn edit_field(&mut self, name: &str, raw: &str) -> Result<(), WorkflowError> {
        self.session.set_field(name, raw)
    }

    /// Submit the current form to the pricing endpoint. Returns the view
    /// effects the presentation layer must perform.
    pub async fn calculate(&mut self) -> Result<Vec<ViewEffect>, WorkflowError> {
        let selected = self
            .session
            .selected_product()
            .cloned()
            .ok_or(WorkflowError::NoProductSelected)?;
        let ticket = self.session.begin_calculation()?;
        let result = self
            .service
            .calculate_price(CalculateRequest {
                product: &selected.name,
                product_code: &selected.code,
                values: &ticket.payload,
            })
            .await;
        if let Err(error) = &result {
            warn!(error = %error, product = %selected.name, "price calculation failed");
        }
        let outcome = self.session.complete_calculation(&ticket, result);
        if outcome.commit == CommitOutcome::Superseded {
            debug!(product = %selected.name, "stale calculation result discarded");
        }
        Ok(outcome.effects)
    }

    pub fn back_to_products(&mut self) -> Result<(), WorkflowError> {
        self.session.back_to_list()
    }
}
