//! User-invoked retry of a failed call.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::outcome::RequestOutcome;

type RetryFn = dyn Fn() -> BoxFuture<'static, RequestOutcome> + Send + Sync;

/// Re-issues a failed call with its original arguments.
///
/// Attached to `NETWORK_ERROR` reports; never invoked automatically.
#[derive(Clone)]
pub struct RetryCapability {
    call: Arc<RetryFn>,
}

impl RetryCapability {
    pub fn new<F>(call: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, RequestOutcome> + Send + Sync + 'static,
    {
        Self {
            call: Arc::new(call),
        }
    }

    pub async fn invoke(&self) -> RequestOutcome {
        (self.call)().await
    }
}

impl fmt::Debug for RetryCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryCapability").finish_non_exhaustive()
    }
}
