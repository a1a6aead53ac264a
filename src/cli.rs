//! CLI bindings for all internal service modules.
//!
//! This module focuses on the common CLI bindings required to provide easy
//! APIs and consistency across all other modules. This is where the parent
//! CLI can be found, as well as utilities for fetching common switches and
//! values.
use clap::{App, Arg, ArgMatches};

use crate::context::AwsContext;
use crate::render::Output;
use crate::types::InventoryResult;

/// Constructs a new CLI application using Clap.
///
/// All metadata is fetched dynamically from Cargo and shouldn't require
/// to be updated (ever). Service and output names are constrained here,
/// so the rest of the crate never sees an unknown value.
pub fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("")
        .name(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .args(&[
            Arg::with_name("service")
                .help("An AWS service to assess in detail")
                .short("s")
                .long("service")
                .takes_value(true)
                .possible_values(&["s3", "lambda", "sns", "sqs"])
                .required_unless("inventory"),
            Arg::with_name("region")
                .help("An AWS region to run the assessment against")
                .short("r")
                .long("region")
                .takes_value(true)
                .default_value("eu-central-1"),
            Arg::with_name("output")
                .help("The output format of the generated report")
                .short("o")
                .long("output")
                .takes_value(true)
                .possible_values(&["table", "json"])
                .default_value("table"),
            Arg::with_name("inventory")
                .help("Runs a count-only inventory scan across all services")
                .short("i")
                .long("inventory"),
            Arg::with_name("quiet")
                .help("Only prints errors during execution")
                .short("q")
                .long("quiet"),
        ])
}

/// Executes a service assessment based on the parsed arguments from the CLI.
///
/// This will pass a singleton `AwsContext` to each submodule to avoid
/// having to resolve credentials inside each module. The inventory flag
/// takes priority over any named service.
pub async fn exec(ctx: AwsContext, args: &ArgMatches<'_>) -> InventoryResult<()> {
    let output = get_output(args);

    // the inventory scan covers every service, ignoring --service
    if args.is_present("inventory") {
        return crate::inventory::exec(&ctx, output).await;
    }

    match args.value_of("service") {
        Some("s3") => crate::s3::exec(&ctx, output).await,
        Some("lambda") => crate::lambda::exec(&ctx, output).await,
        Some("sns") => crate::sns::exec(&ctx, output).await,
        Some("sqs") => crate::sqs::exec(&ctx, output).await,
        _ => {
            build().print_help().expect("Unable to log to TTY");
            Ok(())
        }
    }
}

/// Fetches the selected output format from the common argument set.
///
/// Values are validated by Clap, so anything unrecognized was already
/// rejected before we got here; the default is a stdout table.
pub fn get_output(args: &ArgMatches<'_>) -> Output {
    match args.value_of("output") {
        Some("json") => Output::Json,
        _ => Output::Table,
    }
}
