//! Cooperative cancellation.
//!
//! Cancellation in Onyx is cooperative: a request only stops once it reaches
//! a cancellation checkpoint ([`CancellationToken::check`]). The dispatch
//! engine checks between rules; `Apply` closures check before expensive work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// The request was cancelled by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Cloneable handle to a per-request cancellation flag.
///
/// All clones observe the same flag; `cancel()` on any clone is visible to
/// every checkpoint reached afterwards.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Cancellation checkpoint.
    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert_eq!(clone.check(), Ok(()));

        token.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.check(), Err(Cancelled));
    }
}
