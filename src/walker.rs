//! Common pagination structures for AWS listing calls.
//!
//! This module doesn't contain anything special beyond pseudo-iterators
//! to walk over paginated AWS listings in a more idiomatic manner. Each
//! walker buffers a page at a time and chases the continuation token the
//! service hands back, stopping on the first page without one.
//!
//! As this is fallible iteration, a `for` style loop cannot be used
//! easily. Instead, this pattern must be used:
//!
//! ```rust
//! let walker = TopicWalker::new(...);
//!
//! while let Some(topic) = walker.next().await? {
//!     // do something...
//! }
//! ```
//!
//! Even though this isn't as convenient as `for`, it's still much
//! cleaner than manually iterating the listing pages.
use rusoto_lambda::{FunctionConfiguration, Lambda, LambdaClient, ListFunctionsRequest};
use rusoto_sns::{ListTopicsInput, Sns, SnsClient, Topic};
use rusoto_sqs::{ListQueuesRequest, Sqs, SqsClient};

use std::future::Future;
use std::pin::Pin;

use crate::types::InventoryResult;

/// Pseudo `Iterator` structure to walk over Lambda functions.
pub struct FunctionWalker<'a> {
    lambda: &'a LambdaClient,
    marker: Option<String>,
    buffer: Vec<FunctionConfiguration>,
    finished: bool,
}

impl<'a> FunctionWalker<'a> {
    /// Construct a new `FunctionWalker` for an account region.
    pub fn new(lambda: &'a LambdaClient) -> Self {
        Self {
            lambda,
            marker: None,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Attempts to fetch the next `FunctionConfiguration` in the account.
    ///
    /// Calls can fail, which is why a `Result` is returned. Even if a call
    /// succeeds there is no guarantee a function exists, which is why an
    /// `Option` is returned.
    ///
    /// Calling this method does not guarantee a call will be made to AWS;
    /// there may already be buffered data to be returned immediately.
    pub fn next(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = InventoryResult<Option<FunctionConfiguration>>> + '_>> {
        Box::pin(async move {
            // always check the buffer first
            if !self.buffer.is_empty() {
                return Ok(Some(self.buffer.remove(0)));
            }

            // if done, no fetch
            if self.finished {
                return Ok(None);
            }

            // create a request to list the next page of functions
            let request = ListFunctionsRequest {
                marker: self.marker.clone(),
                ..ListFunctionsRequest::default()
            };

            // execute the request and await the response (blocking)
            let response = self.lambda.list_functions(request).await?;

            // check contents (although should always be there)
            if response.functions.is_none() {
                return Ok(None);
            }

            // store the page and next identifier
            self.buffer = response.functions.unwrap();
            self.marker = response.next_marker;

            // check for last page
            if self.marker.is_none() {
                self.finished = true;
            }

            // pass back
            self.next().await
        })
    }
}

/// Pseudo `Iterator` structure to walk over SNS topics.
pub struct TopicWalker<'a> {
    sns: &'a SnsClient,
    token: Option<String>,
    buffer: Vec<Topic>,
    finished: bool,
}

impl<'a> TopicWalker<'a> {
    /// Construct a new `TopicWalker` for an account region.
    pub fn new(sns: &'a SnsClient) -> Self {
        Self {
            sns,
            token: None,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Attempts to fetch the next `Topic` in the account.
    ///
    /// Semantics are identical to `FunctionWalker::next`; SNS spells
    /// its continuation token `next_token` rather than `next_marker`.
    pub fn next(&mut self) -> Pin<Box<dyn Future<Output = InventoryResult<Option<Topic>>> + '_>> {
        Box::pin(async move {
            // always check the buffer first
            if !self.buffer.is_empty() {
                return Ok(Some(self.buffer.remove(0)));
            }

            // if done, no fetch
            if self.finished {
                return Ok(None);
            }

            // create a request to list the next page of topics
            let request = ListTopicsInput {
                next_token: self.token.clone(),
                ..ListTopicsInput::default()
            };

            // execute the request and await the response (blocking)
            let response = self.sns.list_topics(request).await?;

            // check contents (although should always be there)
            if response.topics.is_none() {
                return Ok(None);
            }

            // store the page and next identifier
            self.buffer = response.topics.unwrap();
            self.token = response.next_token;

            // check for last page
            if self.token.is_none() {
                self.finished = true;
            }

            // pass back
            self.next().await
        })
    }
}

/// Pseudo `Iterator` structure to walk over SQS queue URLs.
pub struct QueueWalker<'a> {
    sqs: &'a SqsClient,
    token: Option<String>,
    buffer: Vec<String>,
    finished: bool,
}

impl<'a> QueueWalker<'a> {
    /// Construct a new `QueueWalker` for an account region.
    pub fn new(sqs: &'a SqsClient) -> Self {
        Self {
            sqs,
            token: None,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Attempts to fetch the next queue URL in the account.
    ///
    /// Semantics are identical to `FunctionWalker::next`; the listing
    /// yields plain queue URLs rather than a structured record.
    pub fn next(&mut self) -> Pin<Box<dyn Future<Output = InventoryResult<Option<String>>> + '_>> {
        Box::pin(async move {
            // always check the buffer first
            if !self.buffer.is_empty() {
                return Ok(Some(self.buffer.remove(0)));
            }

            // if done, no fetch
            if self.finished {
                return Ok(None);
            }

            // create a request to list the next page of queues
            let request = ListQueuesRequest {
                next_token: self.token.clone(),
                ..ListQueuesRequest::default()
            };

            // execute the request and await the response (blocking)
            let response = self.sqs.list_queues(request).await?;

            // check contents (although should always be there)
            if response.queue_urls.is_none() {
                return Ok(None);
            }

            // store the page and next identifier
            self.buffer = response.queue_urls.unwrap();
            self.token = response.next_token;

            // check for last page
            if self.token.is_none() {
                self.finished = true;
            }

            // pass back
            self.next().await
        })
    }
}
