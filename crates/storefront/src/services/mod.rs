//! Business services for the storefront.

pub mod auth;
pub mod order_pdf;
pub mod orders;

use std::collections::HashSet;
use std::sync::Mutex;

use etn_core::ClientCode;

/// RAII entry in a per-client in-flight set.
///
/// Both the login and the submission services allow at most one
/// in-flight operation per client code; a concurrent call is rejected
/// immediately, never queued. The entry is checked and inserted
/// atomically at acquisition and removed on drop, including on error
/// paths.
pub(crate) struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<ClientCode>>,
    code: ClientCode,
}

impl<'a> InFlightGuard<'a> {
    /// Claim the in-flight slot for `code`; `None` when already taken.
    pub(crate) fn acquire(set: &'a Mutex<HashSet<ClientCode>>, code: ClientCode) -> Option<Self> {
        let mut in_flight = set.lock().ok()?;
        if !in_flight.insert(code.clone()) {
            return None;
        }
        drop(in_flight);
        Some(Self { set, code })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.set.lock() {
            in_flight.remove(&self.code);
        }
    }
}
