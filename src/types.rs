//! Types module for the main runtime, exposing error and result types.
//!
//! Most code in this module is based around coercion of error types into
//! a common error type, to be used as the general "Error" of this crate.
use logger::SetLoggerError;
use quick_xml::events::Event;
use quick_xml::Reader;
use rusoto_core::credential::CredentialsError;
use rusoto_core::region::ParseRegionError;
use rusoto_core::request;

use std::fmt::{self, Debug, Display, Formatter};
use std::io;

/// Public type alias for a result with an `InventoryError` error type.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Delegating error wrapper for errors raised during an assessment.
///
/// The internal `String` representation enables cheap coercion from
/// other error types by binding their error messages through. This
/// is somewhat similar to the `failure` crate, but minimal.
pub struct InventoryError(String);

/// Debug implementation for `InventoryError`.
impl Debug for InventoryError {
    /// Formats an `InventoryError` by delegating to `Display`.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Display implementation for `InventoryError`.
impl Display for InventoryError {
    /// Formats an `InventoryError` by writing out the inner representation.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Macro to implement `From` for provided types.
macro_rules! derive_from {
    ($type:ty) => {
        impl<'a> From<$type> for InventoryError {
            fn from(t: $type) -> InventoryError {
                InventoryError(t.to_string())
            }
        }
    };
}

// Easy derivations of derive_from.
derive_from!(&'a str);
derive_from!(io::Error);
derive_from!(clap::Error);
derive_from!(serde_json::Error);
derive_from!(CredentialsError);
derive_from!(ParseRegionError);
derive_from!(SetLoggerError);
derive_from!(request::TlsError);
derive_from!(String);

/// Macro to implement `From` for Rusoto types.
///
/// Several AWS services (S3, SNS, SQS) report errors as XML bodies, so
/// this will pull a `Message` tag out of the body where one exists to
/// avoid surfacing a wall of markup to the user.
macro_rules! derive_from_rusoto {
    ($type:ty) => {
        impl From<rusoto_core::RusotoError<$type>> for InventoryError {
            /// Converts a Rusoto error to an `InventoryError`.
            fn from(err: rusoto_core::RusotoError<$type>) -> InventoryError {
                // grab the raw conversion
                let msg = err.to_string();

                // XML, look for a message!
                if msg.starts_with("<?xml") {
                    // create an XML reader and buffer
                    let mut reader = Reader::from_str(&msg);
                    let mut buffer = Vec::new();

                    loop {
                        // parse through each XML node event
                        match reader.read_event(&mut buffer) {
                            // end, or error, just give up
                            Ok(Event::Eof) | Err(_) => break,

                            // if we find a message tag, we'll use that as the error
                            Ok(Event::Start(ref e)) if e.name() == b"Message" => {
                                return InventoryError(
                                    reader
                                        .read_text(b"Message", &mut Vec::new())
                                        .expect("Cannot decode text value"),
                                )
                            }

                            // skip
                            _ => (),
                        }
                        // empty buffers
                        buffer.clear();
                    }
                }

                // default msg
                InventoryError(msg)
            }
        }
    };
}

// derive error display for all used service call errors
derive_from_rusoto!(rusoto_s3::GetBucketLocationError);
derive_from_rusoto!(rusoto_s3::ListBucketsError);
derive_from_rusoto!(rusoto_lambda::GetFunctionConfigurationError);
derive_from_rusoto!(rusoto_lambda::ListFunctionsError);
derive_from_rusoto!(rusoto_sns::GetTopicAttributesError);
derive_from_rusoto!(rusoto_sns::ListTopicsError);
derive_from_rusoto!(rusoto_sqs::GetQueueAttributesError);
derive_from_rusoto!(rusoto_sqs::ListQueuesError);
