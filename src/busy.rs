//! Submit flags: one in-flight run per user action.
//!
//! A page owns one `ActionFlag` per button (save, delete, cancel…).
//! `try_start()` hands out a guard while the action runs; a second click
//! meanwhile gets `None` and is ignored. Different actions never block
//! each other.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ActionFlag {
    running: AtomicBool,
}

impl ActionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the action as running. `None` if it already is.
    pub fn try_start(&self) -> Option<ActionGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(ActionGuard { flag: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Clears the flag when dropped, including on early return.
#[derive(Debug)]
pub struct ActionGuard<'a> {
    flag: &'a ActionFlag,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.flag.running.store(false, Ordering::Release);
    }
}
