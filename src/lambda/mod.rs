//! Assessment of the Lambda functions owned by an account.
//!
//! Function listings page via a marker token, so enumeration runs
//! through a `FunctionWalker`. Detail reports enrich each function
//! with its environment variables via `GetFunctionConfiguration`, and
//! flag any function running on a runtime AWS no longer supports.
use rusoto_lambda::{
    FunctionConfiguration, GetFunctionConfigurationRequest, Lambda, LambdaClient,
};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::context::AwsContext;
use crate::render::{self, Output, Tabular};
use crate::types::{InventoryError, InventoryResult};
use crate::walker::FunctionWalker;

/// Static allow-list of Lambda runtimes currently supported by AWS.
///
/// Tuples of display name, runtime identifier and operating system,
/// mirroring the runtime support table in the Lambda documentation.
/// Matching happens on the identifier only, case insensitively.
const SUPPORTED_RUNTIMES: &[(&str, &str, &str)] = &[
    ("Node.js 22", "nodejs22.x", "Amazon Linux 2023"),
    ("Node.js 20", "nodejs20.x", "Amazon Linux 2023"),
    ("Node.js 18", "nodejs18.x", "Amazon Linux 2"),
    ("Python 3.13", "python3.13", "Amazon Linux 2023"),
    ("Python 3.12", "python3.12", "Amazon Linux 2023"),
    ("Python 3.11", "python3.11", "Amazon Linux 2"),
    ("Python 3.10", "python3.10", "Amazon Linux 2"),
    ("Python 3.9", "python3.9", "Amazon Linux 2"),
    ("Java 21", "java21", "Amazon Linux 2023"),
    ("Java 17", "java17", "Amazon Linux 2"),
    ("Java 11", "java11", "Amazon Linux 2"),
    ("Java 8", "java8.al2", "Amazon Linux 2"),
    (".NET 8", "dotnet8", "Amazon Linux 2023"),
    ("Ruby 3.3", "ruby3.3", "Amazon Linux 2023"),
    ("Ruby 3.2", "ruby3.2", "Amazon Linux 2"),
    ("OS-only Runtime (al2023)", "provided.al2023", "Amazon Linux 2023"),
    ("OS-only Runtime (al2)", "provided.al2", "Amazon Linux 2"),
];

/// Advisory attached to functions running an unlisted runtime.
const UNSUPPORTED_RUNTIME: &str = "Unsupported lambda runtime";

/// Detail record for a single Lambda function.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub runtime: String,
    pub architectures: Vec<String>,
    pub function_arn: Option<String>,
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, rename = "vpcId", skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

impl Tabular for FunctionInfo {
    const HEADERS: &'static [&'static str] = &[
        "NAME",
        "RUNTIME",
        "ARCHITECTURES",
        "FUNCTION ARN",
        "ROLE",
        "ENVIRONMENT",
        "MESSAGE",
        "VPC",
    ];

    /// Formats a function record into table cells, field for field.
    fn columns(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.runtime.clone(),
            render::cell_list(&self.architectures),
            render::cell_opt(&self.function_arn),
            render::cell_opt(&self.role),
            render::cell_map(&self.environment),
            render::cell_opt(&self.message),
            render::cell_opt(&self.vpc_id),
        ]
    }
}

/// Executes a Lambda assessment and renders the generated report.
pub async fn exec(ctx: &AwsContext, output: Output) -> InventoryResult<()> {
    info!("Service assessment: Lambda functions");

    let lambda = ctx.lambda()?;
    let functions = assess(&lambda).await;

    if functions.is_empty() {
        info!("No Lambda functions found in the account");
    }

    render::report(&functions, "lambda", output)
}

/// Counts the Lambda functions owned by the account.
///
/// Pages through the function listing, summing page lengths. A page
/// failure logs a diagnostic and settles for the partial count.
pub async fn count(lambda: &LambdaClient) -> usize {
    let mut walker = FunctionWalker::new(lambda);
    let mut total = 0;

    loop {
        match walker.next().await {
            Ok(Some(_)) => total += 1,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to list Lambda functions: {}", err);
                break;
            }
        }
    }

    total
}

/// Assesses every Lambda function into a list of detail records.
///
/// Each function is enriched with its environment configuration via a
/// follow-up call; a function whose configuration cannot be fetched is
/// skipped with a diagnostic. Functions on an unlisted runtime stay in
/// the report, carrying an advisory message.
pub async fn assess(lambda: &LambdaClient) -> Vec<FunctionInfo> {
    let mut functions = Vec::new();
    let mut walker = FunctionWalker::new(lambda);

    loop {
        // pull the next function, stopping on the partial-result policy
        let function = match walker.next().await {
            Ok(Some(function)) => function,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to list Lambda functions: {}", err);
                break;
            }
        };

        // names should always exist, but the API says optional
        let name = match function.function_name.clone() {
            Some(name) => name,
            None => continue,
        };

        // fetch the live configuration for the environment mapping
        let request = GetFunctionConfigurationRequest {
            function_name: name.clone(),
            ..GetFunctionConfigurationRequest::default()
        };

        let config = match lambda.get_function_configuration(request).await {
            Ok(config) => config,
            Err(err) => {
                error!(
                    "Unable to fetch configuration for function {}: {}",
                    name,
                    InventoryError::from(err)
                );
                continue;
            }
        };

        let runtime = function.runtime.clone().unwrap_or_default();
        let message = if is_runtime_supported(&runtime) {
            None
        } else {
            Some(UNSUPPORTED_RUNTIME.to_string())
        };

        functions.push(FunctionInfo {
            name,
            message,
            runtime,
            architectures: function.architectures.clone().unwrap_or_default(),
            function_arn: function.function_arn.clone(),
            role: function.role.clone(),
            environment: environment_variables(&config),
            vpc_id: vpc_id(&function),
        });
    }

    functions
}

/// Determines if a runtime identifier is in the supported allow-list.
pub fn is_runtime_supported(runtime: &str) -> bool {
    SUPPORTED_RUNTIMES
        .iter()
        .any(|(_, identifier, _)| identifier.eq_ignore_ascii_case(runtime))
}

/// Extracts the environment variable mapping from a configuration.
///
/// The mapping comes back ordered so the rendered reports are stable
/// between runs against the same account.
fn environment_variables(config: &FunctionConfiguration) -> BTreeMap<String, String> {
    config
        .environment
        .as_ref()
        .and_then(|environment| environment.variables.as_ref())
        .map(|variables| {
            variables
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts the attached VPC identifier from a function, if any.
fn vpc_id(function: &FunctionConfiguration) -> Option<String> {
    function
        .vpc_config
        .as_ref()
        .and_then(|vpc| vpc.vpc_id.clone())
        .filter(|vpc| !vpc.is_empty())
}

#[cfg(test)]
mod tests {
    use rusoto_core::Region;
    use rusoto_lambda::LambdaClient;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MultipleMockRequestDispatcher,
    };

    const LIST_PAGE_ONE: &str = concat!(
        "{\"Functions\":[",
        "{\"FunctionName\":\"billing\",\"FunctionArn\":\"arn:aws:lambda:eu-central-1:123:function:billing\",",
        "\"Runtime\":\"python3.12\",\"Role\":\"arn:aws:iam::123:role/billing\",\"Architectures\":[\"arm64\"]},",
        "{\"FunctionName\":\"legacy\",\"FunctionArn\":\"arn:aws:lambda:eu-central-1:123:function:legacy\",",
        "\"Runtime\":\"go1.x\",\"Role\":\"arn:aws:iam::123:role/legacy\"}",
        "],\"NextMarker\":\"page-two\"}"
    );

    const LIST_PAGE_TWO: &str = concat!(
        "{\"Functions\":[",
        "{\"FunctionName\":\"webhooks\",\"FunctionArn\":\"arn:aws:lambda:eu-central-1:123:function:webhooks\",",
        "\"Runtime\":\"nodejs20.x\",\"Role\":\"arn:aws:iam::123:role/webhooks\",",
        "\"VpcConfig\":{\"VpcId\":\"vpc-0a1b2c\"}}",
        "]}"
    );

    const BILLING_CONFIG: &str = concat!(
        "{\"FunctionName\":\"billing\",\"Runtime\":\"python3.12\",",
        "\"Environment\":{\"Variables\":{\"STAGE\":\"prod\",\"DEBUG\":\"false\"}}}"
    );

    const LEGACY_CONFIG: &str = "{\"FunctionName\":\"legacy\",\"Runtime\":\"go1.x\"}";

    const WEBHOOKS_CONFIG: &str = "{\"FunctionName\":\"webhooks\",\"Runtime\":\"nodejs20.x\"}";

    #[test]
    fn matching_runtimes_against_the_allow_list() {
        assert!(super::is_runtime_supported("python3.12"));
        assert!(super::is_runtime_supported("PYTHON3.12"));
        assert!(super::is_runtime_supported("Provided.AL2023"));
        assert!(!super::is_runtime_supported("go1.x"));
        assert!(!super::is_runtime_supported("nodejs12.x"));
        assert!(!super::is_runtime_supported(""));
    }

    #[tokio::test]
    async fn counting_functions_across_pages() {
        // two pages and two dispatchers, so a third call would panic
        let lambda = LambdaClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::default().with_body(LIST_PAGE_TWO),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        assert_eq!(super::count(&lambda).await, 3);
    }

    #[tokio::test]
    async fn counting_functions_with_a_page_failure() {
        let lambda = LambdaClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::with_status(500),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        // second page failed, so the partial count survives
        assert_eq!(super::count(&lambda).await, 2);
    }

    #[tokio::test]
    async fn assessing_functions_with_configuration_detail() {
        let lambda = LambdaClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::default().with_body(BILLING_CONFIG),
                MockRequestDispatcher::default().with_body(LEGACY_CONFIG),
                MockRequestDispatcher::default().with_body(LIST_PAGE_TWO),
                MockRequestDispatcher::default().with_body(WEBHOOKS_CONFIG),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        let functions = super::assess(&lambda).await;

        assert_eq!(functions.len(), 3);

        assert_eq!(functions[0].name, "billing");
        assert_eq!(functions[0].runtime, "python3.12");
        assert_eq!(functions[0].architectures, vec!["arm64".to_string()]);
        assert_eq!(functions[0].message, None);
        assert_eq!(
            functions[0].environment.get("STAGE"),
            Some(&"prod".to_string())
        );

        assert_eq!(functions[1].name, "legacy");
        assert_eq!(
            functions[1].message,
            Some(super::UNSUPPORTED_RUNTIME.to_string())
        );

        assert_eq!(functions[2].name, "webhooks");
        assert_eq!(functions[2].vpc_id, Some("vpc-0a1b2c".to_string()));
    }

    #[tokio::test]
    async fn assessing_functions_skips_enrichment_failures() {
        let lambda = LambdaClient::new_with(
            MultipleMockRequestDispatcher::new(vec![
                MockRequestDispatcher::default().with_body(LIST_PAGE_ONE),
                MockRequestDispatcher::with_status(500),
                MockRequestDispatcher::default().with_body(LEGACY_CONFIG),
                MockRequestDispatcher::default().with_body(LIST_PAGE_TWO),
                MockRequestDispatcher::default().with_body(WEBHOOKS_CONFIG),
            ]),
            MockCredentialsProvider,
            Region::EuCentral1,
        );

        let functions = super::assess(&lambda).await;

        // billing failed enrichment, the other two survive
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "legacy");
        assert_eq!(functions[1].name, "webhooks");
    }
}
