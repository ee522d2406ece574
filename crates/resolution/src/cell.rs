//! Observable single-value cells with latest-generation-wins publication.
//!
//! A cell holds one `Stamped` value: a `Resolution` plus the `ContextId` it
//! was computed for. Publishing for a context older than the one already held
//! is a no-op, which is how results from superseded contexts get discarded
//! without cancelling the work that produced them.

use corelib::{ContextId, RemoteReadError};
use tokio::sync::watch;
use tracing::debug;

/// State of one resolved output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Not known yet for the current context.
    Pending,
    Ready(T),
    /// The remote read failed; the consumer decides whether to retry.
    Failed(RemoteReadError),
}

impl<T> Resolution<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resolution::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RemoteReadError> {
        match self {
            Resolution::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// A resolution tagged with the context generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped<T> {
    pub context: ContextId,
    pub value: Resolution<T>,
}

/// Push-based single-value container.
///
/// Consumers `subscribe` and are woken on every accepted publication.
pub struct ObservableCell<T> {
    name: &'static str,
    tx: watch::Sender<Stamped<T>>,
}

impl<T: Clone + Send + Sync + 'static> ObservableCell<T> {
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(Stamped {
            context: ContextId::default(),
            value: Resolution::Pending,
        });
        Self { name, tx }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe(&self) -> watch::Receiver<Stamped<T>> {
        self.tx.subscribe()
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> Stamped<T> {
        self.tx.borrow().clone()
    }

    /// Context generation of the current value.
    pub fn generation(&self) -> ContextId {
        self.tx.borrow().context
    }

    /// Publish `value` for `context`.
    ///
    /// Returns `false` and leaves the cell untouched when `context` is older
    /// than the generation already held.
    pub fn publish(&self, context: ContextId, value: Resolution<T>) -> bool {
        let name = self.name;
        self.tx.send_if_modified(|current| {
            if context < current.context {
                debug!(
                    cell = name,
                    stale = %context,
                    current = %current.context,
                    "discarding stale result"
                );
                return false;
            }
            *current = Stamped { context, value };
            true
        })
    }

    /// Reset to `Pending` for a newer context. Same or older contexts are ignored.
    pub fn invalidate(&self, context: ContextId) -> bool {
        self.tx.send_if_modified(|current| {
            if context <= current.context {
                return false;
            }
            *current = Stamped {
                context,
                value: Resolution::Pending,
            };
            true
        })
    }

    /// Wait until the cell holds a settled (non-pending) value for `context`
    /// or any newer generation.
    pub async fn settled(&self, context: ContextId) -> Stamped<T> {
        let mut rx = self.subscribe();
        let stamped = match rx
            .wait_for(|stamped| stamped.context >= context && !stamped.value.is_pending())
            .await
        {
            Ok(value) => value.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.get(),
        };
        stamped
    }
}

impl<T> std::fmt::Debug for ObservableCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableCell")
            .field("name", &self.name)
            .field("generation", &self.tx.borrow().context)
            .finish()
    }
}
