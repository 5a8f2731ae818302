//! Input gating while a modal overlay is up.
//!
//! A pending confirmation or an open context menu owns the pointer. The controller asks the gate
//! before handling any pointer or timer input and drops it while the gate is blocking.

use derive_more::{Display, From};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub struct ConfirmHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub handle: ConfirmHandle,
    pub message: String,
}

/// Outcome of a confirmation that was still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub handle: ConfirmHandle,
    pub accepted: bool,
}

#[derive(Debug, Default)]
pub struct InputGate {
    next_handle: u64,
    pending: Option<PendingConfirmation>,
    context_menu_open: bool,
}

impl InputGate {
    pub fn is_blocking(&self) -> bool {
        self.pending.is_some() || self.context_menu_open
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Starts a confirmation. Any confirmation still pending is superseded and its handle goes
    /// stale.
    pub fn request(&mut self, message: impl Into<String>) -> ConfirmHandle {
        self.next_handle += 1;
        let handle = ConfirmHandle(self.next_handle);
        self.pending = Some(PendingConfirmation {
            handle,
            message: message.into(),
        });
        handle
    }

    /// Answers the pending confirmation. Stale handles resolve nothing.
    pub fn resolve(&mut self, handle: ConfirmHandle, accepted: bool) -> Option<Resolution> {
        if self.pending.as_ref()?.handle != handle {
            return None;
        }
        self.pending = None;
        Some(Resolution { handle, accepted })
    }

    /// Dismissing an overlay is a refusal.
    pub fn dismiss(&mut self, handle: ConfirmHandle) -> Option<Resolution> {
        self.resolve(handle, false)
    }

    pub fn set_context_menu_open(&mut self, open: bool) {
        self.context_menu_open = open;
    }

    /// Drops every overlay. A pending confirmation is refused.
    pub fn release(&mut self) -> Option<Resolution> {
        self.context_menu_open = false;
        let handle = self.pending.as_ref()?.handle;
        self.dismiss(handle)
    }
}
