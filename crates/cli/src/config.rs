//! Command-line configuration.
//!
//! Every flag falls back to the environment variable of the same meaning, so
//! a deployment can be described entirely by its `.env` file.

use std::sync::Arc;

use clap::Parser;
use corelib::config::{
    CAPABILITY_SIGNATURE_VAR, GATEWAY_VAR, PROBE_TIMEOUT_VAR, ROOT_ADDRESS_VAR,
};
use corelib::{Address, AddressIdentity, ConfigurationError, ContextSource, GovernanceConfig};
use rpc::HttpEndpoint;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

pub const IDENTITY_VAR: &str = "WRITE_IDENTITY";

#[derive(Debug, Parser)]
#[command(
    name = "govlink",
    version,
    about = "Resolve governance handles and negotiate the gasless voting capability"
)]
pub struct CliConfig {
    /// JSON-RPC gateway URL.
    #[arg(long, env = GATEWAY_VAR, global = true)]
    pub gateway: Option<String>,

    /// Governance root (DAO) address.
    #[arg(long = "dao", env = ROOT_ADDRESS_VAR, global = true)]
    pub root_address: Option<String>,

    /// Account to make reads on behalf of.
    #[arg(long, env = IDENTITY_VAR, global = true)]
    pub identity: Option<String>,

    /// Bound on the interface-support probe, in milliseconds.
    #[arg(long, env = PROBE_TIMEOUT_VAR, global = true)]
    pub probe_timeout_ms: Option<String>,

    /// Signature of the operation a gasless voter must support.
    #[arg(long, env = CAPABILITY_SIGNATURE_VAR, global = true)]
    pub capability_signature: Option<String>,

    /// Log filter, e.g. `info` or `resolution=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Install logging, build a current-thread runtime and run the command.
    pub fn run(self) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&self.log))
            .with_writer(std::io::stderr)
            .init();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let result = runtime.block_on(self.command.execute(&self))?;
        println!("{}", result);
        Ok(())
    }

    /// Validated static configuration. Fatal when incomplete.
    pub fn governance(&self) -> Result<GovernanceConfig, ConfigurationError> {
        let config = GovernanceConfig::from_values(
            self.gateway.clone(),
            self.root_address.clone(),
            self.probe_timeout_ms.clone(),
        )?;
        Ok(match &self.capability_signature {
            Some(signature) => config.with_capability_signature(signature.clone()),
            None => config,
        })
    }

    pub fn identity(&self) -> Result<Option<AddressIdentity>, ConfigurationError> {
        self.identity
            .as_deref()
            .map(|raw| {
                raw.parse::<Address>()
                    .map(AddressIdentity)
                    .map_err(|source| ConfigurationError::MalformedAddress {
                        key: IDENTITY_VAR,
                        value: raw.to_string(),
                        source,
                    })
            })
            .transpose()
    }

    /// Context source on the configured gateway, with the identity attached
    /// when one is configured.
    pub fn context_source(
        &self,
        governance: &GovernanceConfig,
    ) -> Result<ContextSource, ConfigurationError> {
        let endpoint = HttpEndpoint::from_config(governance)?;
        let source = ContextSource::new(Arc::new(endpoint));
        if let Some(identity) = self.identity()? {
            source.attach_identity(Arc::new(identity));
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DAO: &str = "0x1111111111111111111111111111111111111111";

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_flags_build_governance_config() {
        let config = parse(&[
            "govlink",
            "--gateway",
            "http://127.0.0.1:8545",
            "--dao",
            DAO,
            "--probe-timeout-ms",
            "750",
            "resolve",
        ]);
        let governance = config.governance().unwrap();
        assert_eq!(governance.root_address(), Address([0x11; 20]));
        assert_eq!(governance.probe_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn test_bad_identity_is_configuration_error() {
        let config = parse(&["govlink", "--identity", "0x12", "resolve"]);
        assert!(matches!(
            config.identity(),
            Err(ConfigurationError::MalformedAddress {
                key: IDENTITY_VAR,
                ..
            })
        ));
    }

    #[test]
    fn test_identity_parses() {
        let config = parse(&["govlink", "--identity", DAO, "resolve"]);
        assert_eq!(
            config.identity().unwrap(),
            Some(AddressIdentity(Address([0x11; 20])))
        );
    }

    #[test]
    fn test_malformed_gateway_is_configuration_error() {
        let config = parse(&["govlink", "--gateway", "nowhere", "--dao", DAO, "resolve"]);
        let governance = config.governance().unwrap();
        assert!(matches!(
            config.context_source(&governance),
            Err(ConfigurationError::MalformedEndpoint { .. })
        ));
    }
}
