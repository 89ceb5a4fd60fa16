//! SSM Parameter Store adapter.

use super::backend_error;
use crate::config::ConfigSource;
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_sdk_ssm::Client;

/// Config source reading SSM parameters (decrypted).
#[derive(Debug, Clone)]
pub struct SsmConfigSource {
    client: Client,
}

impl SsmConfigSource {
    /// Wrap an existing SSM client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigSource for SsmConfigSource {
    async fn get(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(|service| service.is_parameter_not_found())
                {
                    Error::ParameterNotFound(name.to_string())
                } else {
                    backend_error("GetParameter", &e)
                }
            })?;

        output
            .parameter
            .and_then(|parameter| parameter.value)
            .ok_or_else(|| Error::ParameterNotFound(name.to_string()))
    }
}
