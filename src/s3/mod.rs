//! Assessment of the S3 buckets owned by an account.
//!
//! Bucket listing is the one unpaginated call in this crate; S3 returns
//! every bucket in a single response. Detail reports enrich each bucket
//! with its home region via `GetBucketLocation`.
use rusoto_s3::{GetBucketLocationRequest, S3Client, S3};
use serde::{Deserialize, Serialize};

use crate::context::AwsContext;
use crate::render::{self, Output, Tabular};
use crate::types::{InventoryError, InventoryResult};

/// Detail record for a single S3 bucket.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct BucketInfo {
    pub name: String,
    pub region: String,
    pub created: Option<String>,
}

impl Tabular for BucketInfo {
    const HEADERS: &'static [&'static str] = &["NAME", "REGION", "CREATED"];

    /// Formats a bucket record into table cells, field for field.
    fn columns(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.region.clone(),
            render::cell_opt(&self.created),
        ]
    }
}

/// Executes an S3 assessment and renders the generated report.
pub async fn exec(ctx: &AwsContext, output: Output) -> InventoryResult<()> {
    info!("Service assessment: S3 buckets");

    let s3 = ctx.s3()?;
    let buckets = assess(&s3).await;

    if buckets.is_empty() {
        info!("No S3 buckets found in the account");
    }

    render::report(&buckets, "s3", output)
}

/// Counts the S3 buckets owned by the account.
///
/// Listing failures are non-fatal; a diagnostic is emitted and the
/// count falls back to zero so an inventory scan can carry on.
pub async fn count(s3: &S3Client) -> usize {
    match s3.list_buckets().await {
        Ok(response) => response.buckets.map(|buckets| buckets.len()).unwrap_or(0),
        Err(err) => {
            error!("Unable to list S3 buckets: {}", InventoryError::from(err));
            0
        }
    }
}

/// Assesses every S3 bucket into a list of detail records.
///
/// Each bucket is enriched with its location via a follow-up call; a
/// bucket whose location cannot be fetched is skipped with a diagnostic
/// rather than aborting the assessment.
pub async fn assess(s3: &S3Client) -> Vec<BucketInfo> {
    let mut buckets = Vec::new();

    // grab the full bucket listing (partial policy, so no early return)
    let listing = match s3.list_buckets().await {
        Ok(response) => response.buckets.unwrap_or_default(),
        Err(err) => {
            error!("Unable to list S3 buckets: {}", InventoryError::from(err));
            return buckets;
        }
    };

    info!("Processing {} buckets...", listing.len());

    for bucket in listing {
        // names should always exist, but the API says optional
        let name = match bucket.name {
            Some(name) => name,
            None => continue,
        };

        // fetch the home region of the bucket
        let request = GetBucketLocationRequest {
            bucket: name.clone(),
            ..GetBucketLocationRequest::default()
        };

        let location = match s3.get_bucket_location(request).await {
            Ok(location) => location,
            Err(err) => {
                error!(
                    "Unable to fetch location for bucket {}: {}",
                    name,
                    InventoryError::from(err)
                );
                continue;
            }
        };

        // buckets in the original region report an empty constraint
        let region = match location.location_constraint {
            Some(ref constraint) if !constraint.is_empty() => constraint.to_string(),
            _ => "us-east-1".to_string(),
        };

        buckets.push(BucketInfo {
            name,
            region,
            created: bucket.creation_date,
        });
    }

    buckets
}
