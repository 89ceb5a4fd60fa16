//! AWS implementations of the backend traits.
//!
//! - [`S3Backend`]: S3 Select for queries, `GetObject`/`PutObject` for the
//!   whole document
//! - [`SsmConfigSource`]: SSM Parameter Store lookups
//!
//! Clients are built once from the default credential chain and region and
//! shared by every operation of the returned service.

mod s3;
mod ssm;

pub use s3::S3Backend;
pub use ssm::SsmConfigSource;

use crate::config::Settings;
use crate::error::Error;
use crate::service::DragonService;
use aws_config::BehaviorVersion;
use std::sync::Arc;

/// Build a [`DragonService`] backed by S3 and SSM.
///
/// Configuration is loaded from the environment (region, credentials,
/// endpoint overrides) the way every AWS SDK client does.
pub async fn connect(settings: Settings) -> DragonService {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    tracing::debug!(region = ?sdk_config.region(), "Loaded AWS configuration");

    let s3 = Arc::new(S3Backend::new(aws_sdk_s3::Client::new(&sdk_config)));
    let ssm = Arc::new(SsmConfigSource::new(aws_sdk_ssm::Client::new(&sdk_config)));

    DragonService::new(settings, ssm, s3.clone(), s3)
}

/// Convert an SDK error into a `Backend` error, keeping the service context.
fn backend_error<E>(operation: &'static str, err: &E) -> Error
where
    E: std::error::Error,
{
    Error::backend(
        operation,
        aws_sdk_s3::error::DisplayErrorContext(err).to_string(),
    )
}
