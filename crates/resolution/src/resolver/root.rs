//! Root resolver.

use corelib::config::{parse_root_address, ROOT_ADDRESS_VAR};
use corelib::{
    Address, ConfigurationError, ConnectionContext, Governance, GovernanceConfig, HandleFactory,
    ServiceHandle,
};

/// Binds the statically configured governance address to each context.
///
/// The address is fixed for the process lifetime; only the context changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootResolver {
    address: Address,
}

impl RootResolver {
    /// Fails with `ConfigurationError` for the zero sentinel.
    pub fn new(address: Address) -> Result<Self, ConfigurationError> {
        if address.is_zero() {
            return Err(ConfigurationError::ZeroAddress {
                key: ROOT_ADDRESS_VAR,
            });
        }
        Ok(Self { address })
    }

    /// Build from a raw configured value. Missing or malformed input is fatal.
    pub fn from_configured(raw: Option<&str>) -> Result<Self, ConfigurationError> {
        parse_root_address(raw).map(|address| Self { address })
    }

    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self {
            address: config.root_address(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Root handle bound to `context`. Never suspends, never fails.
    pub fn resolve(&self, context: &ConnectionContext) -> ServiceHandle<Governance> {
        HandleFactory::bind(self.address, context)
    }

    /// Root handle bound to the read-only view of `context`.
    pub fn resolve_static(&self, context: &ConnectionContext) -> ServiceHandle<Governance> {
        HandleFactory::bind(self.address, &context.read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use corelib::{AddressIdentity, CallRequest, ReadEndpoint, RemoteReadError};
    use std::sync::Arc;

    struct NullEndpoint;

    #[async_trait]
    impl ReadEndpoint for NullEndpoint {
        async fn call(&self, _request: CallRequest) -> Result<Bytes, RemoteReadError> {
            Ok(Bytes::new())
        }

        fn describe(&self) -> String {
            "null".to_string()
        }
    }

    #[test]
    fn test_from_configured_rejects_bad_values() {
        assert!(matches!(
            RootResolver::from_configured(None),
            Err(ConfigurationError::Missing { .. })
        ));
        assert!(matches!(
            RootResolver::from_configured(Some("not-an-address")),
            Err(ConfigurationError::MalformedAddress { .. })
        ));
        assert!(matches!(
            RootResolver::new(Address::ZERO),
            Err(ConfigurationError::ZeroAddress { .. })
        ));
    }

    #[test]
    fn test_from_configured_accepts_address() {
        let resolver =
            RootResolver::from_configured(Some("0x1111111111111111111111111111111111111111"))
                .unwrap();
        assert_eq!(resolver.address(), Address([0x11; 20]));
    }

    #[test]
    fn test_resolve_static_strips_identity() {
        let resolver = RootResolver::new(Address([0x11; 20])).unwrap();
        let ctx = ConnectionContext::new(Arc::new(NullEndpoint))
            .with_identity(Arc::new(AddressIdentity(Address([0x77; 20]))));

        let authenticated = resolver.resolve(&ctx);
        let fixed = resolver.resolve_static(&ctx);

        assert_eq!(fixed.address(), Address([0x11; 20]));
        assert!(authenticated.context().is_authenticated());
        assert!(!fixed.context().is_authenticated());
        assert!(Arc::ptr_eq(fixed.context().endpoint(), ctx.endpoint()));
        // The stripped view is its own snapshot, never mistaken for `ctx`.
        assert!(fixed.context().id() > ctx.id());
        assert_ne!(fixed, authenticated);
    }
}
