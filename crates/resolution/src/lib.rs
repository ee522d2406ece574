//! Resolution of the governance handle graph.
//!
//! This crate turns a connection context into three observable outputs:
//! - the governance root handle (synchronous)
//! - the poll ACL handle read from the root
//! - the negotiated gasless-voting capability
//!
//! Outputs are stamped with the context generation that produced them so a
//! late result from a superseded context never overwrites a newer one.

pub mod capability;
pub mod cell;
pub mod graph;
pub mod memo;
pub mod resolver;

pub use capability::{AbsenceReason, CapabilityResult};
pub use cell::{ObservableCell, Resolution, Stamped};
pub use graph::ResolutionGraph;
pub use memo::Memo;
pub use resolver::{CapabilityNegotiator, DependentResolver, Resolver, RootResolver};
