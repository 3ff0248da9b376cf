//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use s24_syntax::error::{error, ErrorKind, Result};

/// A flag shared between an interpreter and whoever may want to stop it.
///
/// The executor polls it before every token, so a host thread (or a signal
/// handler) can stop a runaway program and get a `Cancelled` error back.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return error(ErrorKind::Cancelled, "execution cancelled");
        }
        Ok(())
    }
}
