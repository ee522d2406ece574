//! CLI subcommands.

use std::fmt;

use clap::Subcommand;
use corelib::{Address, ContextId, GaslessVoting, HandleFactory, PollAcl, Selector, ServiceHandle};
use resolution::{CapabilityNegotiator, CapabilityResult, Resolution, ResolutionGraph, Stamped};
use tracing::info;

use crate::config::CliConfig;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve the root, ACL and gasless-voting handles once.
    Resolve,
    /// Negotiate the gasless-voting capability against an arbitrary address.
    Probe {
        /// Candidate address.
        address: Address,
    },
    /// Print the interface selector of a canonical function signature.
    Selector {
        /// e.g. `makeVoteTransaction(address,bytes32,uint256)`
        signature: String,
    },
}

/// Printable outcome of a command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Resolved {
        root: Address,
        context: ContextId,
        authenticated: bool,
        acl: Resolution<ServiceHandle<PollAcl>>,
        capability: Resolution<CapabilityResult<GaslessVoting>>,
    },
    Probed {
        selector: Selector,
        result: CapabilityResult<GaslessVoting>,
    },
    Selector {
        signature: String,
        selector: Selector,
    },
}

impl Command {
    pub async fn execute(&self, config: &CliConfig) -> anyhow::Result<CommandResult> {
        match self {
            Command::Resolve => {
                let governance = config.governance()?;
                let source = config.context_source(&governance)?;
                let graph = ResolutionGraph::from_config(&governance);
                let context = source.current();

                info!(root = %governance.root_address(), gateway = governance.gateway(), "resolving");
                graph.refresh(&context).await;

                let Stamped { value: acl, .. } = graph.dependent().get();
                let Stamped { value: capability, .. } = graph.capability().get();
                Ok(CommandResult::Resolved {
                    root: graph.root_resolver().address(),
                    context: context.id(),
                    authenticated: context.is_authenticated(),
                    acl,
                    capability,
                })
            }
            Command::Probe { address } => {
                let governance = config.governance()?;
                let source = config.context_source(&governance)?;
                let negotiator = CapabilityNegotiator::from_config(&governance);
                let candidate = HandleFactory::bind::<GaslessVoting>(*address, &source.current());

                let result = negotiator.probe(candidate).await;
                Ok(CommandResult::Probed {
                    selector: negotiator.selector(),
                    result,
                })
            }
            Command::Selector { signature } => Ok(CommandResult::Selector {
                signature: signature.clone(),
                selector: Selector::from_signature(signature),
            }),
        }
    }
}

fn write_capability(
    f: &mut fmt::Formatter<'_>,
    result: &CapabilityResult<GaslessVoting>,
) -> fmt::Result {
    match result {
        CapabilityResult::Present(handle) => write!(f, "present at {}", handle.address()),
        CapabilityResult::Absent(reason) => write!(f, "absent ({})", reason),
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Resolved {
                root,
                context,
                authenticated,
                acl,
                capability,
            } => {
                writeln!(
                    f,
                    "root:       {} ({}, {})",
                    root,
                    context,
                    if *authenticated { "authenticated" } else { "read-only" }
                )?;
                match acl {
                    Resolution::Pending => writeln!(f, "acl:        pending")?,
                    Resolution::Ready(handle) => writeln!(f, "acl:        {}", handle.address())?,
                    Resolution::Failed(error) => writeln!(f, "acl:        failed ({})", error)?,
                }
                write!(f, "capability: ")?;
                match capability {
                    Resolution::Pending => write!(f, "pending"),
                    Resolution::Ready(result) => write_capability(f, result),
                    Resolution::Failed(error) => write!(f, "failed ({})", error),
                }
            }
            CommandResult::Probed { selector, result } => {
                write!(f, "selector {}: ", selector)?;
                write_capability(f, result)
            }
            CommandResult::Selector {
                signature,
                selector,
            } => write!(f, "{} {}", selector, signature),
        }
    }
}
