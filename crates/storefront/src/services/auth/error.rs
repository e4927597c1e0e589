//! Authentication error types.

use thiserror::Error;

/// Errors surfaced by the QR login flow.
///
/// All variants are recoverable: the session store returns to
/// `LoggedOut` and the user can re-scan. Display messages are
/// user-visible in the mobile client, hence the French.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The scanned payload carries no client code.
    #[error("code client introuvable dans le QR")]
    InvalidQr,

    /// The code is not in the directory, or the directory could not
    /// be reached.
    #[error("code client {0} non reconnu")]
    UnknownClient(String),

    /// A login is already in flight for this session; rapid re-scans
    /// are rejected rather than queued.
    #[error("connexion déjà en cours")]
    LoginInFlight,
}
