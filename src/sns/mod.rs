//! Assessment of the SNS topics owned by an account.
//!
//! Topic listings page via a continuation token, so enumeration runs
//! through a `TopicWalker`. Detail reports enrich each topic with its
//! encryption state and confirmed subscription count, both pulled from
//! `GetTopicAttributes`.
use rusoto_sns::{GetTopicAttributesInput, Sns, SnsClient};
use serde::{Deserialize, Serialize};

use crate::context::AwsContext;
use crate::render::{self, Output, Tabular};
use crate::types::{InventoryError, InventoryResult};
use crate::walker::TopicWalker;

/// Detail record for a single SNS topic.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct TopicInfo {
    #[serde(rename = "topicName")]
    pub topic_name: String,
    #[serde(rename = "topicArn")]
    pub topic_arn: String,
    pub encrypted: bool,
    #[serde(rename = "subscriptionsConfirmed")]
    pub subscriptions_confirmed: i64,
}

impl Tabular for TopicInfo {
    const HEADERS: &'static [&'static str] = &["TOPIC", "ARN", "ENCRYPTED", "SUBSCRIPTIONS"];

    /// Formats a topic record into table cells, field for field.
    fn columns(&self) -> Vec<String> {
        vec![
            self.topic_name.clone(),
            self.topic_arn.clone(),
            self.encrypted.to_string(),
            self.subscriptions_confirmed.to_string(),
        ]
    }
}

/// Executes an SNS assessment and renders the generated report.
pub async fn exec(ctx: &AwsContext, output: Output) -> InventoryResult<()> {
    info!("Service assessment: SNS topics");

    let sns = ctx.sns()?;
    let topics = assess(&sns).await;

    if topics.is_empty() {
        info!("No SNS topics found in the account");
    }

    render::report(&topics, "sns", output)
}

/// Counts the SNS topics owned by the account.
///
/// Pages through the topic listing, summing page lengths. A page
/// failure logs a diagnostic and settles for the partial count.
pub async fn count(sns: &SnsClient) -> usize {
    let mut walker = TopicWalker::new(sns);
    let mut total = 0;

    loop {
        match walker.next().await {
            Ok(Some(_)) => total += 1,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to list SNS topics: {}", err);
                break;
            }
        }
    }

    total
}

/// Assesses every SNS topic into a list of detail records.
///
/// Each topic is enriched with its attribute mapping via a follow-up
/// call; a topic whose attributes cannot be fetched is skipped with a
/// diagnostic rather than aborting the assessment.
pub async fn assess(sns: &SnsClient) -> Vec<TopicInfo> {
    let mut topics = Vec::new();
    let mut walker = TopicWalker::new(sns);

    loop {
        // pull the next topic, stopping on the partial-result policy
        let topic = match walker.next().await {
            Ok(Some(topic)) => topic,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to list SNS topics: {}", err);
                break;
            }
        };

        // the ARN is the only field a listed topic carries
        let arn = match topic.topic_arn {
            Some(arn) => arn,
            None => continue,
        };

        // fetch the attribute mapping of the topic
        let request = GetTopicAttributesInput {
            topic_arn: arn.clone(),
        };

        let attributes = match sns.get_topic_attributes(request).await {
            Ok(response) => response.attributes.unwrap_or_default(),
            Err(err) => {
                error!(
                    "Unable to fetch attributes for topic {}: {}",
                    arn,
                    InventoryError::from(err)
                );
                continue;
            }
        };

        // a topic is encrypted when a KMS master key is attached
        let encrypted = attributes
            .get("KmsMasterKeyId")
            .map(|key| !key.is_empty())
            .unwrap_or(false);

        // confirmed subscriptions arrive as a stringified number
        let subscriptions_confirmed = attributes
            .get("SubscriptionsConfirmed")
            .and_then(|count| count.parse().ok())
            .unwrap_or(0);

        topics.push(TopicInfo {
            topic_name: topic_name(&arn).to_string(),
            topic_arn: arn,
            encrypted,
            subscriptions_confirmed,
        });
    }

    topics
}

/// Extracts a topic name from the trailing segment of its ARN.
fn topic_name(arn: &str) -> &str {
    arn.rsplit(':').next().unwrap_or(arn)
}

#[cfg(test)]
mod tests {
    use rusoto_core::Region;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MultipleMockRequestDispatcher,
    };
    use rusoto_sns::SnsClient;

    const LIST_PAGE_ONE: &str = concat!(
        "<ListTopicsResponse xmlns=\"http://sns.amazonaws.com/doc/2010-03-31/\">",
        "<ListTopicsResult>",
        "<Topics>",
        "<member><TopicArn>arn:aws:sns:eu-central-1:123:alerts</TopicArn></member>",
        "<member><TopicArn>arn:aws:sns:eu-central-1:123:digests</TopicArn></member>",
        "</Topics>",
        "<NextToken>page-two</NextToken>",
        "</ListTopicsResult>",
        "<ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>",
        "</ListTopicsResponse>"
    );

    const LIST_PAGE_TWO: &str = concat!(
        "<ListTopicsResponse xmlns=\"http://sns.amazonaws.com/doc/2010-03-31/\">",
        "<ListTopicsResult>",
        "<Topics>",
        "<member><TopicArn>arn:aws:sns:eu-central-1:123:receipts</TopicArn></member>",
        "</Topics>",
        "</ListTopicsResult>",
        "<ResponseMetadata><RequestId>req-2</RequestId></ResponseMetadata>",
        "</ListTopicsResponse>"
    );

    const ENCRYPTED_ATTRIBUTES: &str = concat!(
        "<GetTopicAttributesResponse xmlns=\"http://sns.amazonaws.com/doc/2010-03-31/\">",
        "<GetTopicAttributesResult>",
        "<Attributes>",
        "<entry><key>KmsMasterKeyId</key><value>alias/sns-key</value></entry>",
        "<entry><key>SubscriptionsConfirmed</key><value>4</value></entry>",
        "</Attributes>",
        "</GetTopicAttributesResult>",
        "<ResponseMetadata><RequestId>req-3</RequestId></ResponseMetadata>",
        "</GetTopicAttributesResponse>"
    );

    const PLAIN_ATTRIBUTES: &str = concat!(
        "<GetTopicAttributesResponse xmlns=\"http://sns.amazonaws.com/doc/2010-03-31/\">",
        "<GetTopicAttributesResult>",
        "<Attributes>",
        "<entry><key>SubscriptionsConfirmed</key><value>0</value></entry>",
        "</Attributes>",
        "</GetTopicAttributesResult>",
        "<ResponseMetadata><RequestId>req-4</RequestId></ResponseMetadata>",
        "</GetTopicAttributesResponse>"
    );

    #[tokio::test]
    async fn counting_topics_across_pages() {
        // two pages and two dispatchers, so a third call would panic
        let sns = SnsClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::default().with_body(LIST_PAGE_TWO),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        assert_eq!(super::count(&sns).await, 3);
    }

    #[tokio::test]
    async fn assessing_topics_with_attribute_detail() {
        let sns = SnsClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::default().with_body(ENCRYPTED_ATTRIBUTES),
                MockRequestDispatcher::default().with_body(PLAIN_ATTRIBUTES),
                MockRequestDispatcher::default().with_body(LIST_PAGE_TWO),
                MockRequestDispatcher::default().with_body(PLAIN_ATTRIBUTES),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        let topics = super::assess(&sns).await;

        assert_eq!(topics.len(), 3);

        assert_eq!(topics[0].topic_name, "alerts");
        assert_eq!(topics[0].topic_arn, "arn:aws:sns:eu-central-1:123:alerts");
        assert!(topics[0].encrypted);
        assert_eq!(topics[0].subscriptions_confirmed, 4);

        assert_eq!(topics[1].topic_name, "digests");
        assert!(!topics[1].encrypted);
        assert_eq!(topics[1].subscriptions_confirmed, 0);

        assert_eq!(topics[2].topic_name, "receipts");
    }

    #[tokio::test]
    async fn assessing_topics_skips_enrichment_failures() {
        let sns = SnsClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::with_status(500),
                MockRequestDispatcher::default().with_body(PLAIN_ATTRIBUTES),
                MockRequestDispatcher::default().with_body(LIST_PAGE_TWO),
                MockRequestDispatcher::default().with_body(PLAIN_ATTRIBUTES),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        let topics = super::assess(&sns).await;

        // the first topic failed enrichment, the other two survive
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic_name, "digests");
        assert_eq!(topics[1].topic_name, "receipts");
    }
}
