//! Logging module for terminal based output control.
//!
//! Reports go to stdout and diagnostics go to stderr, so a JSON table
//! can be piped onwards while listing failures stay visible. A custom
//! logging implementation handles this split, along with the `--quiet`
//! switch baked into the application level.
use clap::ArgMatches;
use logger::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Basic logger instance to allow quiet-aware logging.
struct BasicLogger {
    quiet: bool,
}

// Basic logging implementation.
impl Log for BasicLogger {
    /// Returns enabled only for aws-inventory modules.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("aws_inventory")
    }

    /// Logs out a `Record` when logging is enabled.
    ///
    /// Errors always surface on stderr, even in quiet mode; everything
    /// else lands on stdout unless quiet mode culls it.
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.metadata().level() == Level::Error {
            eprintln!("{}", record.args());
        } else if !self.quiet {
            println!("{}", record.args());
        }
    }

    /// Flushes this logger.
    fn flush(&self) {}
}

/// Initializes the logger based on the provided arguments.
///
/// If the `-q` flag was provided, this short circuits to cull all
/// logging below the error level.
pub fn init(args: &ArgMatches) -> Result<(), SetLoggerError> {
    let logger = Box::new(BasicLogger {
        quiet: args.is_present("quiet"),
    });
    log::set_boxed_logger(logger).map(|_| log::set_max_level(LevelFilter::Info))
}
