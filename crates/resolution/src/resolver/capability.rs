//! Capability negotiator.
//!
//! # Protocol
//!
//! 1. Read the delegated voter address from the root. The zero sentinel means
//!    nothing is configured: return `Absent(Unset)` without further I/O.
//! 2. Bind a candidate handle at that address.
//! 3. Ask the candidate `supportsInterface(selector)` where `selector` is the
//!    fingerprint of the operation a conforming provider must expose.
//! 4. `true` certifies the candidate. An error, a timeout, or `false` all
//!    downgrade to `Absent` with a warning naming the candidate.
//!
//! Only the probe is downgraded. A failed read of the address itself is a
//! `RemoteReadError` like any other root-derived read.
//!
//! The probe certifies declared support only; it says nothing about whether
//! the candidate behaves correctly when called.

use std::time::Duration;

use async_trait::async_trait;
use corelib::config::DEFAULT_PROBE_TIMEOUT;
use corelib::{
    GaslessVoting, Governance, GovernanceConfig, HandleFactory, RemoteReadError, Selector,
    ServiceHandle,
};
use tracing::{debug, info, warn};

use super::Resolver;
use crate::capability::{AbsenceReason, CapabilityResult};

/// Negotiates the optional gasless-voting capability.
#[derive(Debug, Clone)]
pub struct CapabilityNegotiator {
    signature: String,
    selector: Selector,
    probe_timeout: Duration,
}

impl CapabilityNegotiator {
    /// `signature` is the canonical signature of the required operation.
    pub fn new(signature: impl Into<String>, probe_timeout: Duration) -> Self {
        let signature = signature.into();
        let selector = Selector::from_signature(&signature);
        Self {
            signature,
            selector,
            probe_timeout,
        }
    }

    pub fn from_config(config: &GovernanceConfig) -> Self {
        let negotiator = Self::new(config.capability_signature(), config.probe_timeout());
        info!(
            signature = negotiator.signature(),
            selector = %negotiator.selector,
            "capability selector"
        );
        negotiator
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Run the full negotiation against `root`.
    pub async fn negotiate(
        &self,
        root: &ServiceHandle<Governance>,
    ) -> Result<CapabilityResult<GaslessVoting>, RemoteReadError> {
        let address = root.proxy_voter().await?;
        if address.is_zero() {
            debug!(root = %root.address(), "no delegated voter configured");
            return Ok(CapabilityResult::Absent(AbsenceReason::Unset));
        }
        let candidate = HandleFactory::bind::<GaslessVoting>(address, root.context());
        Ok(self.probe(candidate).await)
    }

    /// Probe an already-bound candidate. Never fails; every failure mode is a
    /// downgrade.
    pub async fn probe(
        &self,
        candidate: ServiceHandle<GaslessVoting>,
    ) -> CapabilityResult<GaslessVoting> {
        let address = candidate.address();
        let outcome =
            tokio::time::timeout(self.probe_timeout, candidate.supports_interface(self.selector))
                .await;

        let reason = match outcome {
            Ok(Ok(true)) => {
                info!(
                    candidate = %address,
                    selector = %self.selector,
                    "delegated voter supports the gasless voting interface"
                );
                return CapabilityResult::Present(candidate);
            }
            Ok(Ok(false)) => AbsenceReason::Unsupported { address },
            Ok(Err(error)) => AbsenceReason::ProbeFailed { address, error },
            Err(_) => AbsenceReason::TimedOut {
                address,
                after: self.probe_timeout,
            },
        };

        warn!(
            candidate = %address,
            selector = %self.selector,
            reason = %reason,
            "delegated voter is not a gasless voting contract; capability disabled"
        );
        CapabilityResult::Absent(reason)
    }
}

impl Default for CapabilityNegotiator {
    fn default() -> Self {
        Self::new(GaslessVoting::MAKE_VOTE_TRANSACTION, DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl Resolver for CapabilityNegotiator {
    type Output = CapabilityResult<GaslessVoting>;

    async fn resolve(
        &self,
        root: &ServiceHandle<Governance>,
    ) -> Result<CapabilityResult<GaslessVoting>, RemoteReadError> {
        self.negotiate(root).await
    }

    fn name(&self) -> &'static str {
        "CapabilityNegotiator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matches_signature() {
        let negotiator = CapabilityNegotiator::new("transfer(address,uint256)", DEFAULT_PROBE_TIMEOUT);
        assert_eq!(negotiator.selector(), Selector([0xa9, 0x05, 0x9c, 0xbb]));
    }

    #[test]
    fn test_default_uses_vote_transaction() {
        let negotiator = CapabilityNegotiator::default();
        assert_eq!(negotiator.signature(), GaslessVoting::MAKE_VOTE_TRANSACTION);
        assert_eq!(negotiator.probe_timeout(), DEFAULT_PROBE_TIMEOUT);
    }

    #[test]
    fn test_configured_signature_overrides_default() {
        let config = GovernanceConfig::from_values(
            Some("http://127.0.0.1:8545".into()),
            Some("0x1111111111111111111111111111111111111111".into()),
            None,
        )
        .unwrap()
        .with_capability_signature("transfer(address,uint256)");

        let negotiator = CapabilityNegotiator::from_config(&config);
        assert_eq!(negotiator.signature(), "transfer(address,uint256)");
        assert_eq!(negotiator.selector(), Selector([0xa9, 0x05, 0x9c, 0xbb]));
    }
}
