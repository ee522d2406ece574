//! Outcome of capability negotiation.

use std::fmt;
use std::time::Duration;

use corelib::{Address, Interface, RemoteReadError, ServiceHandle};

/// Either a certified handle or the reason the capability is unavailable.
///
/// A handle only ever appears in `Present` after the interface-support probe
/// answered `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityResult<I: Interface> {
    Present(ServiceHandle<I>),
    Absent(AbsenceReason),
}

impl<I: Interface> CapabilityResult<I> {
    pub fn is_present(&self) -> bool {
        matches!(self, CapabilityResult::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }

    pub fn handle(&self) -> Option<&ServiceHandle<I>> {
        match self {
            CapabilityResult::Present(handle) => Some(handle),
            CapabilityResult::Absent(_) => None,
        }
    }

    pub fn into_handle(self) -> Option<ServiceHandle<I>> {
        match self {
            CapabilityResult::Present(handle) => Some(handle),
            CapabilityResult::Absent(_) => None,
        }
    }

    pub fn absence(&self) -> Option<&AbsenceReason> {
        match self {
            CapabilityResult::Present(_) => None,
            CapabilityResult::Absent(reason) => Some(reason),
        }
    }
}

/// Why a capability was downgraded to absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsenceReason {
    /// The root reported the zero sentinel; nothing was probed.
    Unset,
    /// The candidate answered `false` to the probe.
    Unsupported { address: Address },
    /// The probe call failed (revert, transport failure, undecodable reply).
    ProbeFailed {
        address: Address,
        error: RemoteReadError,
    },
    /// The probe did not answer within the configured bound.
    TimedOut { address: Address, after: Duration },
}

impl AbsenceReason {
    /// The non-conforming candidate, if one was probed.
    pub fn candidate(&self) -> Option<Address> {
        match self {
            AbsenceReason::Unset => None,
            AbsenceReason::Unsupported { address }
            | AbsenceReason::ProbeFailed { address, .. }
            | AbsenceReason::TimedOut { address, .. } => Some(*address),
        }
    }
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsenceReason::Unset => write!(f, "not configured"),
            AbsenceReason::Unsupported { address } => {
                write!(f, "{} does not support the interface", address)
            }
            AbsenceReason::ProbeFailed { address, error } => {
                write!(f, "probe of {} failed: {}", address, error)
            }
            AbsenceReason::TimedOut { address, after } => {
                write!(f, "probe of {} timed out after {:?}", address, after)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate() {
        assert_eq!(AbsenceReason::Unset.candidate(), None);
        let address = Address([0xcc; 20]);
        assert_eq!(
            AbsenceReason::Unsupported { address }.candidate(),
            Some(address)
        );
        assert_eq!(
            AbsenceReason::TimedOut {
                address,
                after: Duration::from_millis(10)
            }
            .candidate(),
            Some(address)
        );
    }

    #[test]
    fn test_display_names_candidate() {
        let reason = AbsenceReason::Unsupported {
            address: Address([0xcc; 20]),
        };
        assert!(reason
            .to_string()
            .contains("0xcccccccccccccccccccccccccccccccccccccccc"));
    }
}
