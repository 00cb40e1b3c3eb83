use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four screens of the portal. Result display is not a screen of its
/// own: a populated quotation while on `ProductDetail` is the sub-state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Loading,
    LoggedOut,
    ProductList,
    ProductDetail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenEvent {
    StartupComplete,
    LoginSucceeded,
    ProductChosen,
    BackRequested,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScreenTransitionError {
    #[error("invalid transition from {screen:?} using event {event:?}")]
    InvalidTransition { screen: Screen, event: ScreenEvent },
}

/// The complete transition table. Everything not listed is invalid; in
/// particular there is no way back to `Loading` or `LoggedOut`.
pub fn transition(screen: Screen, event: ScreenEvent) -> Result<Screen, ScreenTransitionError> {
    use Screen::{LoggedOut, Loading, ProductDetail, ProductList};
    use ScreenEvent::{BackRequested, LoginSucceeded, ProductChosen, StartupComplete};

    match (screen, event) {
        (Loading, StartupComplete) => Ok(LoggedOut),
        (LoggedOut, LoginSucceeded) => Ok(ProductList),
        (ProductList, ProductChosen) => Ok(ProductDetail),
        (ProductDetail, BackRequested) => Ok(ProductList),
        _ => Err(ScreenTransitionError::InvalidTransition { screen, event }),
    }
}
