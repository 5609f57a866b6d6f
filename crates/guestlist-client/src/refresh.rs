//! Single-flight coordination for session refreshes.
//!
//! When the access cookie expires, every request in flight tends to hit a 401
//! at about the same moment. [`RefreshCoordinator`] makes sure only one of them
//! talks to the refresh endpoint: the first caller installs a shared future in
//! the slot, later callers clone it and await the same outcome. The future
//! empties the slot itself when it settles, success or failure, so the slot
//! cannot stay occupied after a refresh finishes.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;

use crate::error::RefreshError;

type RefreshFuture = Shared<BoxFuture<'static, Result<(), RefreshError>>>;

/// Holds at most one outstanding refresh and lets concurrent callers join it.
///
/// Cloning shares the slot.
#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    in_flight: Arc<Mutex<Option<RefreshFuture>>>,
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Run `start` unless a refresh is already outstanding, in which case
    /// wait for that one instead. `start` is only invoked by the caller that
    /// finds the slot empty.
    pub async fn refresh<F, Fut>(&self, start: F) -> Result<(), RefreshError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), RefreshError>> + Send + 'static,
    {
        let shared = {
            let mut slot = self.in_flight.lock();
            match slot.as_ref() {
                Some(existing) => {
                    tracing::debug!("joining in-flight session refresh");
                    existing.clone()
                }
                None => {
                    tracing::debug!("starting session refresh");
                    let release = Arc::clone(&self.in_flight);
                    let attempt = start();
                    let future = async move {
                        let outcome = attempt.await;
                        release.lock().take();
                        outcome
                    }
                    .boxed()
                    .shared();
                    *slot = Some(future.clone());
                    future
                }
            }
        };

        shared.await
    }
}
