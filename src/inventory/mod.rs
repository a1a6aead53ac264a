//! Count-only inventory scanning across every supported service.
//!
//! The inventory scan walks each service enumerator in a fixed order
//! (s3, lambda, sns, sqs) and collects one labelled count per service
//! into a locally owned list. Scans are strictly sequential, and a
//! failing service contributes whatever partial count it managed to
//! gather before moving on; it never aborts the remaining services.
use rusoto_lambda::LambdaClient;
use rusoto_s3::S3Client;
use rusoto_sns::SnsClient;
use rusoto_sqs::SqsClient;
use serde::{Deserialize, Serialize};

use crate::context::AwsContext;
use crate::render::{self, Output, Tabular};
use crate::types::InventoryResult;

/// Labelled resource count for a single service.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ResourceCount {
    pub service: String,
    pub count: usize,
}

impl Tabular for ResourceCount {
    const HEADERS: &'static [&'static str] = &["SERVICE", "COUNT"];

    /// Formats a count record into table cells, field for field.
    fn columns(&self) -> Vec<String> {
        vec![self.service.clone(), self.count.to_string()]
    }
}

/// Executes an inventory scan and renders the generated report.
pub async fn exec(ctx: &AwsContext, output: Output) -> InventoryResult<()> {
    info!("Performing inventory scan...");

    let results = scan(&ctx.s3()?, &ctx.lambda()?, &ctx.sns()?, &ctx.sqs()?).await;

    render::report(&results, "inventory", output)
}

/// Scans every service in a fixed order into a list of counts.
pub async fn scan(
    s3: &S3Client,
    lambda: &LambdaClient,
    sns: &SnsClient,
    sqs: &SqsClient,
) -> Vec<ResourceCount> {
    let mut results = Vec::with_capacity(4);

    info!("Inventory scanning service: s3");
    results.push(ResourceCount {
        service: "s3".to_string(),
        count: crate::s3::count(s3).await,
    });

    info!("Inventory scanning service: lambda");
    results.push(ResourceCount {
        service: "lambda".to_string(),
        count: crate::lambda::count(lambda).await,
    });

    info!("Inventory scanning service: sns");
    results.push(ResourceCount {
        service: "sns".to_string(),
        count: crate::sns::count(sns).await,
    });

    info!("Inventory scanning service: sqs");
    results.push(ResourceCount {
        service: "sqs".to_string(),
        count: crate::sqs::count(sqs).await,
    });

    results
}
