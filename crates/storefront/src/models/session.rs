//! Session key constants.
//!
//! Each client device gets its own tower-session; the authenticated
//! identity and the cart ride in it, so there is no shared mutable
//! state across users at this layer.

/// Session keys for per-device state.
pub mod keys {
    /// Key for the auth state machine ([`crate::session::SessionStore`]).
    pub const AUTH: &str = "auth";

    /// Key for the cart store ([`crate::cart::CartStore`]).
    pub const CART: &str = "cart";
}
