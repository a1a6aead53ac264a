//! Account context module for shared AWS client configuration.
//!
//! Everything in this crate talks to AWS through a client constructed
//! here, so that credential resolution and region selection happen in
//! exactly one place. Credentials are resolved eagerly on construction;
//! an account we cannot authenticate against is not worth scanning.
use rusoto_core::credential::{ChainProvider, ProvideAwsCredentials};
use rusoto_core::region::Region;
use rusoto_core::HttpClient;
use rusoto_lambda::LambdaClient;
use rusoto_s3::S3Client;
use rusoto_sns::SnsClient;
use rusoto_sqs::SqsClient;

use std::time::Duration;

use crate::types::InventoryResult;

/// Reusable context for constructing AWS service clients.
///
/// Holds the resolved target region alongside the default credential
/// chain. Each service client gets its own HTTP dispatcher, but shares
/// the provider so credentials resolve consistently across services.
pub struct AwsContext {
    region: Region,
    chain: ChainProvider,
}

impl AwsContext {
    /// Constructs a new `AwsContext` against the provided region.
    ///
    /// This eagerly walks the default credential chain (environment,
    /// profile, instance metadata) and fails if nothing resolves, as
    /// no assessment can run without account credentials.
    pub async fn new(region: Region) -> InventoryResult<AwsContext> {
        info!("Loading default AWS account configuration...");

        // create provider with timeout
        let mut chain = ChainProvider::new();
        chain.set_timeout(Duration::from_millis(500));

        // verify ambient credentials exist before going any further
        chain.credentials().await?;

        info!("Configuration loaded successfully!");

        Ok(AwsContext { region, chain })
    }

    /// Constructs a new S3 client from this context.
    pub fn s3(&self) -> InventoryResult<S3Client> {
        Ok(S3Client::new_with(
            HttpClient::new()?,
            self.chain.clone(),
            self.region.clone(),
        ))
    }

    /// Constructs a new Lambda client from this context.
    pub fn lambda(&self) -> InventoryResult<LambdaClient> {
        Ok(LambdaClient::new_with(
            HttpClient::new()?,
            self.chain.clone(),
            self.region.clone(),
        ))
    }

    /// Constructs a new SNS client from this context.
    pub fn sns(&self) -> InventoryResult<SnsClient> {
        Ok(SnsClient::new_with(
            HttpClient::new()?,
            self.chain.clone(),
            self.region.clone(),
        ))
    }

    /// Constructs a new SQS client from this context.
    pub fn sqs(&self) -> InventoryResult<SqsClient> {
        Ok(SqsClient::new_with(
            HttpClient::new()?,
            self.chain.clone(),
            self.region.clone(),
        ))
    }
}
