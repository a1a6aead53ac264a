//! Assessment of the SQS queues owned by an account.
//!
//! Queue listings page via a continuation token, so enumeration runs
//! through a `QueueWalker`. The listing only yields queue URLs; detail
//! reports enrich each queue with its ARN and encryption state via
//! `GetQueueAttributes`.
use rusoto_sqs::{GetQueueAttributesRequest, Sqs, SqsClient};
use serde::{Deserialize, Serialize};

use crate::context::AwsContext;
use crate::render::{self, Output, Tabular};
use crate::types::{InventoryError, InventoryResult};
use crate::walker::QueueWalker;

/// Queue attributes requested during enrichment.
const QUEUE_ATTRIBUTES: &[&str] = &["QueueArn", "KmsMasterKeyId"];

/// Detail record for a single SQS queue.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct QueueInfo {
    #[serde(rename = "queueName")]
    pub queue_name: String,
    #[serde(rename = "queueArn")]
    pub queue_arn: String,
    pub encrypted: bool,
}

impl Tabular for QueueInfo {
    const HEADERS: &'static [&'static str] = &["QUEUE", "ARN", "ENCRYPTED"];

    /// Formats a queue record into table cells, field for field.
    fn columns(&self) -> Vec<String> {
        vec![
            self.queue_name.clone(),
            self.queue_arn.clone(),
            self.encrypted.to_string(),
        ]
    }
}

/// Executes an SQS assessment and renders the generated report.
pub async fn exec(ctx: &AwsContext, output: Output) -> InventoryResult<()> {
    info!("Service assessment: SQS queues");

    let sqs = ctx.sqs()?;
    let queues = assess(&sqs).await;

    if queues.is_empty() {
        info!("No SQS queues found in the account");
    }

    render::report(&queues, "sqs", output)
}

/// Counts the SQS queues owned by the account.
///
/// Pages through the queue listing, summing page lengths. A page
/// failure logs a diagnostic and settles for the partial count.
pub async fn count(sqs: &SqsClient) -> usize {
    let mut walker = QueueWalker::new(sqs);
    let mut total = 0;

    loop {
        match walker.next().await {
            Ok(Some(_)) => total += 1,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to list SQS queues: {}", err);
                break;
            }
        }
    }

    total
}

/// Assesses every SQS queue into a list of detail records.
///
/// Each queue is enriched with its ARN and encryption state via a
/// follow-up call; a queue whose attributes cannot be fetched is
/// skipped with a diagnostic rather than aborting the assessment.
pub async fn assess(sqs: &SqsClient) -> Vec<QueueInfo> {
    let mut queues = Vec::new();
    let mut walker = QueueWalker::new(sqs);

    loop {
        // pull the next queue URL, stopping on the partial-result policy
        let url = match walker.next().await {
            Ok(Some(url)) => url,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to list SQS queues: {}", err);
                break;
            }
        };

        // fetch the ARN and encryption attributes of the queue
        let request = GetQueueAttributesRequest {
            queue_url: url.clone(),
            attribute_names: Some(
                QUEUE_ATTRIBUTES
                    .iter()
                    .map(|attribute| attribute.to_string())
                    .collect(),
            ),
        };

        let attributes = match sqs.get_queue_attributes(request).await {
            Ok(response) => response.attributes.unwrap_or_default(),
            Err(err) => {
                error!(
                    "Unable to fetch attributes for queue {}: {}",
                    url,
                    InventoryError::from(err)
                );
                continue;
            }
        };

        queues.push(QueueInfo {
            queue_name: queue_name(&url).to_string(),
            queue_arn: attributes.get("QueueArn").cloned().unwrap_or_default(),
            encrypted: attributes.contains_key("KmsMasterKeyId"),
        });
    }

    queues
}

/// Extracts a queue name from the trailing segment of its URL.
fn queue_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
