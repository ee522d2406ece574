//! Dependent (poll ACL) resolver.

use async_trait::async_trait;
use corelib::{Governance, HandleFactory, PollAcl, RemoteReadError, ServiceHandle};
use tracing::debug;

use super::Resolver;

/// Reads the ACL address from the root and binds it with the root's context.
///
/// No retries: a failed read is returned to the caller as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependentResolver;

impl DependentResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for DependentResolver {
    type Output = ServiceHandle<PollAcl>;

    async fn resolve(
        &self,
        root: &ServiceHandle<Governance>,
    ) -> Result<ServiceHandle<PollAcl>, RemoteReadError> {
        let address = root.acl().await?;
        if address.is_zero() {
            return Err(RemoteReadError::UnsetAddress {
                operation: Governance::GET_ACL,
                contract: root.address(),
            });
        }
        debug!(
            root = %root.address(),
            acl = %address,
            context = %root.context().id(),
            "resolved poll ACL"
        );
        Ok(HandleFactory::bind(address, root.context()))
    }

    fn name(&self) -> &'static str {
        "DependentResolver"
    }
}
