use thiserror::Error;

use crate::service::Endpoint;
use crate::workflow::screens::ScreenTransitionError;

/// Failure talking to the remote automation service. Carried as data so the
/// workflow can decide which failures reach the user and which are only
/// logged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("transport failure calling {endpoint}: {detail}")]
    Transport { endpoint: Endpoint, detail: String },
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: Endpoint, status: u16 },
    #[error("invalid response body from {endpoint}: {detail}")]
    InvalidBody { endpoint: Endpoint, detail: String },
}

impl ServiceError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Transport { endpoint, .. }
            | Self::UnexpectedStatus { endpoint, .. }
            | Self::InvalidBody { endpoint, .. } => *endpoint,
        }
    }
}

/// Misuse of the workflow API: an operation invoked out of turn. These never
/// reach the user as anything but a bug report; every remote failure is
/// instead folded into the session's visible error slots.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    ScreenTransition(#[from] ScreenTransitionError),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("no product is selected")]
    NoProductSelected,
    #[error("unknown form field `{name}`")]
    UnknownField { name: String },
}
