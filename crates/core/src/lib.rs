pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod service;
pub mod workflow;

pub use auth::{Credential, CredentialVerifier, FixedCredentialVerifier};
pub use domain::field::{FieldDescriptor, FieldKind, FormValues};
pub use domain::product::Product;
pub use domain::quotation::Quotation;
pub use errors::{ServiceError, WorkflowError};
pub use service::{
    CalculateRequest, Endpoint, FieldListResponse, FieldsRequest, ProductListResponse,
    QuoteService,
};
pub use workflow::controller::{Pacing, WorkflowController};
pub use workflow::screens::{Screen, ScreenEvent, ScreenTransitionError};
pub use workflow::session::{
    CommitOutcome, LoginOutcome, ViewEffect, WorkflowSession, CALCULATION_FAILED,
    FIELDS_FAILED, INVALID_CREDENTIALS, PRODUCTS_FAILED,
};
