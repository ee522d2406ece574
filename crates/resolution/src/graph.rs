//! The resolution graph.
//!
//! ```text
//! ContextSource (watch)
//!        |
//!        v
//!  RootResolver ---------------> root cell
//!        |
//!   +----+-----------------+
//!   v                      v
//! DependentResolver   CapabilityNegotiator      (concurrent)
//!   |                      |
//!   v                      v
//! dependent cell      capability cell
//! ```
//!
//! Every refresh is keyed on the context generation. Refreshes are never
//! cancelled; a refresh that finishes after a newer one started publishes
//! into cells that already moved on, and the cells drop it.

use std::sync::Arc;

use corelib::{
    ConnectionContext, GaslessVoting, Governance, GovernanceConfig, PollAcl, ServiceHandle,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::capability::CapabilityResult;
use crate::cell::{ObservableCell, Resolution};
use crate::memo::Memo;
use crate::resolver::{CapabilityNegotiator, DependentResolver, Resolver, RootResolver};

/// Root, dependent and capability outputs for the current context.
#[derive(Debug)]
pub struct ResolutionGraph {
    root_resolver: RootResolver,
    dependent_resolver: DependentResolver,
    negotiator: CapabilityNegotiator,

    dependent_memo: Memo<ServiceHandle<PollAcl>>,
    capability_memo: Memo<CapabilityResult<GaslessVoting>>,

    root: ObservableCell<ServiceHandle<Governance>>,
    dependent: ObservableCell<ServiceHandle<PollAcl>>,
    capability: ObservableCell<CapabilityResult<GaslessVoting>>,
}

impl ResolutionGraph {
    pub fn new(
        root_resolver: RootResolver,
        dependent_resolver: DependentResolver,
        negotiator: CapabilityNegotiator,
    ) -> Self {
        Self {
            root_resolver,
            dependent_resolver,
            negotiator,
            dependent_memo: Memo::new(),
            capability_memo: Memo::new(),
            root: ObservableCell::new("root"),
            dependent: ObservableCell::new("dependent"),
            capability: ObservableCell::new("capability"),
        }
    }

    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self::new(
            RootResolver::from_config(config),
            DependentResolver::new(),
            CapabilityNegotiator::from_config(config),
        )
    }

    pub fn root(&self) -> &ObservableCell<ServiceHandle<Governance>> {
        &self.root
    }

    pub fn dependent(&self) -> &ObservableCell<ServiceHandle<PollAcl>> {
        &self.dependent
    }

    pub fn capability(&self) -> &ObservableCell<CapabilityResult<GaslessVoting>> {
        &self.capability
    }

    pub fn root_resolver(&self) -> &RootResolver {
        &self.root_resolver
    }

    pub fn negotiator(&self) -> &CapabilityNegotiator {
        &self.negotiator
    }

    /// Resolve all three outputs for `context`.
    ///
    /// The root is published synchronously; the dependent and capability
    /// reads then run concurrently. Calling this again with the same context
    /// reuses memoized results instead of reading again.
    pub async fn refresh(&self, context: &ConnectionContext) {
        let generation = context.id();
        let root = self.root_resolver.resolve(context);

        if !self.root.publish(generation, Resolution::Ready(root.clone())) {
            debug!(context = %generation, "context superseded before refresh started");
            return;
        }
        self.dependent.invalidate(generation);
        self.capability.invalidate(generation);
        self.dependent_memo.prune_older_than(generation);
        self.capability_memo.prune_older_than(generation);

        debug!(
            context = %generation,
            root = %root.address(),
            authenticated = context.is_authenticated(),
            "refreshing resolution graph"
        );

        tokio::join!(
            resolve_into(&self.dependent_resolver, &self.dependent_memo, &self.dependent, &root),
            resolve_into(&self.negotiator, &self.capability_memo, &self.capability, &root),
        );
    }

    /// Follow `contexts`, starting one refresh per observed snapshot.
    ///
    /// The returned task ends when the context publisher is dropped.
    pub fn spawn(self: Arc<Self>, mut contexts: watch::Receiver<ConnectionContext>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("resolution graph started");
            loop {
                let context = contexts.borrow_and_update().clone();
                let graph = Arc::clone(&self);
                tokio::spawn(async move { graph.refresh(&context).await });

                if contexts.changed().await.is_err() {
                    break;
                }
            }
            info!("context source closed; resolution graph stopped");
        })
    }
}

async fn resolve_into<R: Resolver>(
    resolver: &R,
    memo: &Memo<R::Output>,
    cell: &ObservableCell<R::Output>,
    root: &ServiceHandle<Governance>,
) {
    let generation = root.context().id();
    let outcome = memo
        .get_or_try_resolve((root.address(), generation), || resolver.resolve(root))
        .await;

    let value = match outcome {
        Ok(value) => Resolution::Ready(value),
        Err(error) => {
            warn!(
                resolver = resolver.name(),
                root = %root.address(),
                context = %generation,
                error = %error,
                "remote read failed"
            );
            Resolution::Failed(error)
        }
    };
    cell.publish(generation, value);
}
