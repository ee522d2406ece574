//! Resolvers derive handles from the governance root.
//!
//! - **RootResolver**: binds the configured root address (synchronous)
//! - **DependentResolver**: reads the poll ACL address from the root
//! - **CapabilityNegotiator**: reads and probes the optional gasless voter

pub mod capability;
pub mod dependent;
pub mod root;

pub use capability::CapabilityNegotiator;
pub use dependent::DependentResolver;
pub use root::RootResolver;

use async_trait::async_trait;
use corelib::{Governance, RemoteReadError, ServiceHandle};

/// Something resolved from the root handle with remote reads.
///
/// Implementations are sequential internally and independent of each other,
/// so the graph may run several of them concurrently on the same root.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Value produced for one (root, context) pair.
    type Output: Clone + Send + Sync + 'static;

    /// Resolve from `root`, using the root's connection context.
    async fn resolve(
        &self,
        root: &ServiceHandle<Governance>,
    ) -> Result<Self::Output, RemoteReadError>;

    /// Name for logging.
    fn name(&self) -> &'static str;
}
