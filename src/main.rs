//! Inventory and assessment reporting for AWS accounts in a CLI.
//!
//! This tool should be used from a command line, either to count the
//! resources owned by an account across several AWS services, or to
//! report per-resource detail for a single service; please see the
//! main documentation in the repository.
//!
//! Credentials must be provided via guidelines in the [AWS Documentation]
//! (https://docs.aws.amazon.com/cli/latest/userguide/cli-environment.html).
#[macro_use]
extern crate log as logger;

use rusoto_core::region::Region;

mod cli;
mod context;
mod log;
mod render;
mod types;
mod walker;

mod inventory;
mod lambda;
mod s3;
mod sns;
mod sqs;

#[tokio::main]
async fn main() -> types::InventoryResult<()> {
    // build the CLI and grab all arguments
    let args = cli::build().get_matches();

    // initialize logging
    log::init(&args)?;

    // parse out the target region (has a default, so unwrap is safe)
    let region = args.value_of("region").unwrap().parse::<Region>()?;

    // resolve account credentials up front; nothing works without them
    let ctx = context::AwsContext::new(region).await?;

    // delegate to the cli mod
    cli::exec(ctx, &args).await
}
