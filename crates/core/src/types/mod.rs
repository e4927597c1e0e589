//! Core types for the ETN ordering app.
//!
//! This module provides validated wrappers for common domain concepts.

pub mod client_code;
pub mod quantity;
pub mod role;

pub use client_code::{ClientCode, ClientCodeError};
pub use quantity::{Quantity, QuantityError};
pub use role::Role;
