//! ETN Core - Shared types and pure logic.
//!
//! This crate provides the types used across the ETN ordering app
//! components:
//! - `storefront` - JSON API backend consumed by the mobile/PWA client
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. The QR payload parser lives here
//! because it is pure text extraction.
//!
//! # Modules
//!
//! - [`types`] - Validated wrappers for client codes, roles, and quantities
//! - [`qr`] - QR payload parsing (login and article scan formats)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod qr;
pub mod types;

pub use qr::{LabeledLineScheme, QrPayload, QrScheme, parse_qr};
pub use types::*;
