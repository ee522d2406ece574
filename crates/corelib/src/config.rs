//! Process configuration.
//!
//! Loaded once at startup from the environment (optionally hydrated from a
//! `.env` file). Missing or malformed values are `ConfigurationError`s and
//! are never retried.

use std::env;
use std::time::Duration;

use crate::address::Address;
use crate::error::ConfigurationError;
use crate::interface::GaslessVoting;

pub const GATEWAY_VAR: &str = "WEB3_GATEWAY";
pub const ROOT_ADDRESS_VAR: &str = "DAO_V1_ADDR";
pub const PROBE_TIMEOUT_VAR: &str = "PROBE_TIMEOUT_MS";
pub const CAPABILITY_SIGNATURE_VAR: &str = "CAPABILITY_SIGNATURE";
pub const SKIP_DOTENV_VAR: &str = "GOVLINK_SKIP_DOTENV";

/// Default bound on the interface-support probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Static configuration for the resolution graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceConfig {
    gateway: String,
    root_address: Address,
    probe_timeout: Duration,
    capability_signature: String,
}

impl GovernanceConfig {
    /// Hydrate `.env` (if present) and read the process environment.
    pub fn load_from_env() -> Result<Self, ConfigurationError> {
        hydrate_env_file()?;
        Self::from_values(
            get_optional_var(GATEWAY_VAR),
            get_optional_var(ROOT_ADDRESS_VAR),
            get_optional_var(PROBE_TIMEOUT_VAR),
        )
        .map(|config| match get_optional_var(CAPABILITY_SIGNATURE_VAR) {
            Some(signature) => config.with_capability_signature(signature),
            None => config,
        })
    }

    /// Validate raw values from any source (flags, env, tests).
    pub fn from_values(
        gateway: Option<String>,
        root_address: Option<String>,
        probe_timeout_ms: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let gateway = gateway.ok_or(ConfigurationError::Missing { key: GATEWAY_VAR })?;
        let root_address = parse_root_address(root_address.as_deref())?;
        let probe_timeout = match probe_timeout_ms {
            // Zero would time every probe out before it is sent.
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) if millis > 0 => Duration::from_millis(millis),
                _ => {
                    return Err(ConfigurationError::InvalidNumber {
                        key: PROBE_TIMEOUT_VAR,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_PROBE_TIMEOUT,
        };

        Ok(Self {
            gateway,
            root_address,
            probe_timeout,
            capability_signature: GaslessVoting::MAKE_VOTE_TRANSACTION.to_string(),
        })
    }

    pub fn with_capability_signature(mut self, signature: impl Into<String>) -> Self {
        self.capability_signature = signature.into();
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    pub fn root_address(&self) -> Address {
        self.root_address
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn capability_signature(&self) -> &str {
        &self.capability_signature
    }
}

/// Parse the configured root address. Missing, malformed and zero values
/// are all rejected.
pub fn parse_root_address(raw: Option<&str>) -> Result<Address, ConfigurationError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigurationError::Missing {
            key: ROOT_ADDRESS_VAR,
        })?;
    let address: Address = raw
        .parse()
        .map_err(|source| ConfigurationError::MalformedAddress {
            key: ROOT_ADDRESS_VAR,
            value: raw.to_string(),
            source,
        })?;
    if address.is_zero() {
        return Err(ConfigurationError::ZeroAddress {
            key: ROOT_ADDRESS_VAR,
        });
    }
    Ok(address)
}

fn get_optional_var(key: &'static str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Load `.env` into the process environment unless `GOVLINK_SKIP_DOTENV` is set.
/// A missing file is not an error.
pub fn hydrate_env_file() -> Result<(), ConfigurationError> {
    if env::var_os(SKIP_DOTENV_VAR).is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigurationError::Dotenv(err.to_string())),
    }
    Ok(())
}
