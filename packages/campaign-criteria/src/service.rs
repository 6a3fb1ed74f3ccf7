//! The remote mutation service seam and its HTTP/JSON binding.

use async_trait::async_trait;
use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{
    ApiError, FieldViolation, ServiceError, ServiceResult, TransportError, ValidationError,
};
use crate::types::{MutateRequest, MutateResponse, Operation};

const DEVELOPER_TOKEN_HEADER: &str = "developer-token";
const CLIENT_CUSTOMER_ID_HEADER: &str = "client-customer-id";

/// Remote service that applies a batch of criterion operations.
///
/// Implementations are not assumed to tolerate overlapping in-flight calls.
#[async_trait]
pub trait MutationService: Send + Sync {
    /// Apply the whole batch in one call.
    async fn mutate(&self, operations: &[Operation]) -> ServiceResult<MutateResponse>;
}

/// Endpoint and credentials for [`HttpMutationService`].
#[derive(Debug)]
pub struct ServiceConfig {
    endpoint: String,
    version: String,
    developer_token: String,
    client_customer_id: Option<String>,
    access_token: Option<SecretString>,
}

impl ServiceConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://adwords.google.com/api/adwords/cm";
    pub const DEFAULT_VERSION: &'static str = "v201502";

    pub fn new(developer_token: impl Into<String>) -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            version: Self::DEFAULT_VERSION.to_string(),
            developer_token: developer_token.into(),
            client_customer_id: None,
            access_token: None,
        }
    }

    /// Set a custom endpoint (sandbox, proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_client_customer_id(mut self, id: impl Into<String>) -> Self {
        self.client_customer_id = Some(id.into());
        self
    }

    /// OAuth2 bearer token. Obtaining or refreshing it is the caller's job.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn mutate_url(&self) -> String {
        format!(
            "{}/{}/CampaignCriterionService/mutate",
            self.endpoint.trim_end_matches('/'),
            self.version
        )
    }
}

/// JSON-over-HTTP binding of [`MutationService`].
pub struct HttpMutationService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpMutationService {
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[async_trait]
impl MutationService for HttpMutationService {
    async fn mutate(&self, operations: &[Operation]) -> ServiceResult<MutateResponse> {
        let Some(token) = self.config.access_token.as_ref() else {
            return Err(ApiError::Authorization {
                message: "no OAuth2 access token configured".to_string(),
            }
            .into());
        };

        let url = self.config.mutate_url();
        let mut request = self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .header(DEVELOPER_TOKEN_HEADER, &self.config.developer_token)
            .json(&MutateRequest { operations });
        if let Some(id) = &self.config.client_customer_id {
            request = request.header(CLIENT_CUSTOMER_ID_HEADER, id);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "Mutate response received");

        classify_response(status.as_u16(), &body)
    }
}

/// API fault body: `{ "message": ..., "errors": [ { field: value, ... } ] }`.
#[derive(Deserialize)]
struct ApiFault {
    message: String,
    #[serde(default)]
    errors: Vec<IndexMap<String, Value>>,
}

impl From<ApiFault> for ValidationError {
    fn from(fault: ApiFault) -> Self {
        let violations = fault
            .errors
            .into_iter()
            .map(|entry| {
                entry
                    .into_iter()
                    .map(|(field, value)| (field, display_value(value)))
                    .collect::<FieldViolation>()
            })
            .collect();
        ValidationError::new(fault.message, violations)
    }
}

fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Map an HTTP status and body onto the service's result contract.
///
/// - 2xx: the decoded response. The body must carry `value`, or be exactly `{}`
///   for an empty batch; anything else is unclassified
/// - 401/403: authorization
/// - other 4xx with an API fault body listing violations: validation
/// - anything else (5xx, bare statuses, faults without entries): transport
pub fn classify_response(status: u16, body: &str) -> ServiceResult<MutateResponse> {
    match status {
        200..=299 => decode_success(body),
        401 | 403 => {
            let message = serde_json::from_str::<ApiFault>(body)
                .map(|fault| fault.message)
                .unwrap_or_else(|_| body.to_string());
            Err(ApiError::Authorization { message }.into())
        }
        400..=499 => match serde_json::from_str::<ApiFault>(body) {
            Ok(fault) if !fault.errors.is_empty() => Err(ValidationError::from(fault).into()),
            _ => Err(transport_status(status, body)),
        },
        _ => Err(transport_status(status, body)),
    }
}

fn decode_success(body: &str) -> ServiceResult<MutateResponse> {
    let value: Value = serde_json::from_str(body).map_err(ServiceError::unclassified)?;
    let has_results = matches!(
        &value,
        Value::Object(fields) if fields.is_empty() || fields.contains_key("value")
    );
    if !has_results {
        return Err(ServiceError::unclassified(format!(
            "success response without a value field: {}",
            body
        )));
    }
    serde_json::from_value(value).map_err(ServiceError::unclassified)
}

fn transport_status(status: u16, body: &str) -> ServiceError {
    TransportError::Status {
        status,
        body: body.to_string(),
    }
    .into()
}
