//! Parameter stores: where startup configuration comes from.
//!
//! [`ParameterStore`] is the seam between [`crate::config::CompletionConfig::load`]
//! and the backing service. The Lambda binary uses [`SsmParameterStore`]
//! (AWS Systems Manager, values decrypted on read); tests and local runs use
//! [`InMemoryParameterStore`].

use crate::error::ConfigError;
use async_trait::async_trait;
use std::collections::HashMap;

/// A source of named, already-decrypted configuration values.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Return the clear-text value stored under `name`.
    async fn fetch(&self, name: &str) -> Result<String, ConfigError>;
}

/// A fixed map of parameters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryParameterStore {
    values: HashMap<String, String>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn fetch(&self, name: &str) -> Result<String, ConfigError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ParameterUnavailable {
                name: name.to_string(),
                reason: "not set".to_string(),
            })
    }
}

#[cfg(feature = "lambda")]
pub use ssm::SsmParameterStore;

#[cfg(feature = "lambda")]
mod ssm {
    use super::ParameterStore;
    use crate::error::ConfigError;
    use async_trait::async_trait;
    use aws_config::meta::region::RegionProviderChain;
    use aws_config::{BehaviorVersion, Region};
    use tracing::debug;

    /// Region used when the environment does not name one.
    pub const FALLBACK_REGION: &str = "eu-west-3";

    /// AWS Systems Manager Parameter Store, read with decryption.
    #[derive(Debug, Clone)]
    pub struct SsmParameterStore {
        client: aws_sdk_ssm::Client,
    }

    impl SsmParameterStore {
        pub fn new(client: aws_sdk_ssm::Client) -> Self {
            Self { client }
        }

        /// Build a client from the default AWS credential/region chain,
        /// falling back to `eu-west-3` when no region is configured.
        pub async fn from_env() -> Self {
            let region = RegionProviderChain::default_provider()
                .or_else(Region::new(FALLBACK_REGION));
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            Self::new(aws_sdk_ssm::Client::new(&shared))
        }
    }

    #[async_trait]
    impl ParameterStore for SsmParameterStore {
        async fn fetch(&self, name: &str) -> Result<String, ConfigError> {
            debug!("Fetching parameter {}", name);
            let output = self
                .client
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send()
                .await
                .map_err(|e| ConfigError::ParameterUnavailable {
                    name: name.to_string(),
                    reason: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
                })?;

            output
                .parameter()
                .and_then(|p| p.value())
                .map(str::to_owned)
                .ok_or_else(|| ConfigError::ParameterUnavailable {
                    name: name.to_string(),
                    reason: "parameter has no value".to_string(),
                })
        }
    }
}
