//! Remote interfaces a `ServiceHandle` can be bound to.
//!
//! Each interface is a zero-sized marker type; its read operations are
//! inherent methods on `ServiceHandle<Marker>` in the matching submodule.

pub mod gasless;
pub mod governance;
pub mod poll_acl;

pub use gasless::GaslessVoting;
pub use governance::Governance;
pub use poll_acl::PollAcl;

/// Marker trait for a remote interface.
pub trait Interface: Send + Sync + 'static {
    /// Name used in logs and debug output.
    const NAME: &'static str;
}
