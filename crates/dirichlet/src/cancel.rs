//! Cooperative cancellation for in-flight builds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::DirichletError;

/// Shared flag. Clones observe the same state; a fresh token is never cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once the token has fired.
    #[inline]
    pub fn check(&self) -> Result<(), DirichletError> {
        if self.is_cancelled() {
            Err(DirichletError::Cancelled)
        } else {
            Ok(())
        }
    }
}
