//! Builds, signs and sends one JSON API request.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderValue, Method, Uri};
use rustdyn_auth::{RequestSigner, SignableRequest};
use rustdyn_model::Operation;
use rustdyn_model::error::{AmazonError, ErrorBody, ErrorCode};
use rustdyn_sts::ProvideCredentials;
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::HttpTransport;

/// Content type of every request.
pub const CONTENT_TYPE_JSON: &str = "application/x-amz-json-1.0";

const AMZ_DATE: &str = "x-amz-date";
const AMZ_TARGET: &str = "x-amz-target";
const AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Source of the signing timestamp.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Sends single requests: no retries, no table-name rewriting.
#[derive(Clone)]
pub struct RequestExecutor {
    host: String,
    uri: Uri,
    api_version: String,
    signer: Arc<dyn RequestSigner>,
    credentials: Arc<dyn ProvideCredentials>,
    transport: Arc<dyn HttpTransport>,
    clock: Clock,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("host", &self.host)
            .field("uri", &self.uri)
            .field("api_version", &self.api_version)
            .field("scheme", &self.signer.scheme())
            .field("credentials", &self.credentials)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Create an executor posting to `endpoint_url`, whose authority is `host`.
    pub fn new(
        host: impl Into<String>,
        endpoint_url: &str,
        api_version: impl Into<String>,
        signer: Arc<dyn RequestSigner>,
        credentials: Arc<dyn ProvideCredentials>,
        transport: Arc<dyn HttpTransport>,
    ) -> ClientResult<Self> {
        let uri = endpoint_url
            .parse::<Uri>()
            .map_err(|e| {
                ClientError::InvalidRequest(format!("invalid endpoint {endpoint_url}: {e}"))
            })?;
        Ok(Self {
            host: host.into(),
            uri,
            api_version: api_version.into(),
            signer,
            credentials,
            transport,
            clock: Arc::new(Utc::now),
        })
    }

    /// Replace the clock used for signing timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Send `operation` with `params` as the JSON body and return the parsed
    /// JSON response.
    ///
    /// A non-200 status becomes [`ClientError::Service`]. An
    /// `ExpiredTokenException` also drops cached session credentials so the
    /// next attempt fetches new ones.
    pub async fn send(&self, operation: Operation, params: &Json) -> ClientResult<Json> {
        let credentials = self.credentials.provide_credentials().await?;
        let body = Bytes::from(serde_json::to_vec(params)?);
        let timestamp = (self.clock)();

        let mut headers = HeaderMap::new();
        headers.insert(HOST, header_value(&self.host)?);
        headers.insert(AMZ_DATE, header_value(&self.signer.date_header(timestamp))?);
        headers.insert(AMZ_TARGET, header_value(&operation.target(&self.api_version))?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        if let Some(token) = &credentials.session_token {
            headers.insert(AMZ_SECURITY_TOKEN, header_value(token)?);
        }

        let signed = self
            .signer
            .sign(&SignableRequest::post(&headers, &body), &credentials, timestamp)?;
        headers.insert(signed.name, header_value(&signed.value)?);

        let mut request = http::Request::new(body);
        *request.method_mut() = Method::POST;
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = headers;

        debug!(operation = %operation, "sending request");
        let response = self.transport.send(request).await?;
        let status = response.status().as_u16();
        let body = response.into_body();
        debug!(operation = %operation, status, "received response");

        if status == 200 {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Json::Object(serde_json::Map::new()));
            }
            return Ok(serde_json::from_slice(&body)?);
        }

        let error = service_error(operation, status, &body);
        if error.code() == Some(ErrorCode::ExpiredTokenException) {
            warn!(operation = %operation, "session credentials expired; dropping cache");
            self.credentials.invalidate();
        }
        Err(ClientError::Service(error))
    }
}

fn header_value(value: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidRequest(format!("invalid header value: {value:?}")))
}

/// Turn an error response into an [`AmazonError`]. Bodies that are not the
/// expected JSON still produce an error carrying the status.
fn service_error(operation: Operation, status: u16, body: &[u8]) -> AmazonError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();
    let mut error = AmazonError::from_body(&parsed, status).with_action(operation.as_str());
    if parsed.message().is_none() && !body.is_empty() {
        error.message = String::from_utf8_lossy(body).into_owned();
    }
    error
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rustdyn_auth::{Credentials, LegacySigner, V4Signer};
    use rustdyn_core::AwsRegion;
    use rustdyn_sts::StaticCredentials;
    use serde_json::json;

    use super::*;
    use crate::testing::{Reply, ScriptedTransport};

    const HOST_NAME: &str = "dynamodb.us-east-1.amazonaws.com";

    fn fixed_clock() -> Clock {
        Arc::new(|| Utc.with_ymd_and_hms(2012, 2, 28, 2, 22, 10).unwrap())
    }

    fn executor(
        signer: Arc<dyn RequestSigner>,
        credentials: Credentials,
        transport: &ScriptedTransport,
    ) -> RequestExecutor {
        RequestExecutor::new(
            HOST_NAME,
            &format!("https://{HOST_NAME}/"),
            "DynamoDB_20111205",
            signer,
            Arc::new(StaticCredentials::new(credentials)),
            Arc::new(transport.clone()),
        )
        .unwrap()
        .with_clock(fixed_clock())
    }

    fn unsigned_headers(headers: &HeaderMap, auth: &str) -> HeaderMap {
        let mut headers = headers.clone();
        headers.remove(auth);
        headers
    }

    #[tokio::test]
    async fn test_should_send_wire_headers() {
        let transport = ScriptedTransport::new([Reply::ok(json!({"TableNames": []}))]);
        let exec = executor(
            Arc::new(V4Signer::dynamodb(AwsRegion::default())),
            Credentials::new("fakeKeyId", "secret"),
            &transport,
        );
        let response = exec.send(Operation::ListTables, &json!({})).await.unwrap();
        assert_eq!(response, json!({"TableNames": []}));

        let request = &transport.requests()[0];
        assert_eq!(request.action, "ListTables");
        assert_eq!(request.uri, "https://dynamodb.us-east-1.amazonaws.com/");
        assert_eq!(request.header("host"), Some(HOST_NAME));
        assert_eq!(request.header("x-amz-date"), Some("20120228T022210Z"));
        assert_eq!(request.header("x-amz-target"), Some("DynamoDB_20111205.ListTables"));
        assert_eq!(request.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert!(request.header("x-amz-security-token").is_none());
        assert!(
            request
                .header("authorization")
                .unwrap()
                .starts_with("AWS4-HMAC-SHA256 Credential=fakeKeyId/20120228/us-east-1/dynamodb/aws4_request, ")
        );
    }

    #[tokio::test]
    async fn test_should_sign_exact_bytes_sent() {
        let transport = ScriptedTransport::new([Reply::ok(json!({}))]);
        let credentials = Credentials::new("fakeKeyId", "secret");
        let signer = V4Signer::dynamodb(AwsRegion::default());
        let exec = executor(Arc::new(signer.clone()), credentials.clone(), &transport);
        let params = json!({"TableName": "my-table", "Key": {"HashKeyElement": {"S": "a"}}});
        exec.send(Operation::GetItem, &params).await.unwrap();

        let request = &transport.requests()[0];
        let headers = unsigned_headers(&request.headers, "authorization");
        let body = serde_json::to_vec(&params).unwrap();
        let expected = signer
            .sign(&SignableRequest::post(&headers, &body), &credentials, fixed_clock()())
            .unwrap();
        assert_eq!(request.header("authorization"), Some(expected.value.as_str()));
    }

    #[tokio::test]
    async fn test_should_sign_security_token_with_legacy_scheme() {
        let transport = ScriptedTransport::new([Reply::ok(json!({}))]);
        let credentials = Credentials::new("fakeKeyId", "secret").with_session_token("token-1");
        let exec = executor(Arc::new(LegacySigner), credentials.clone(), &transport);
        exec.send(Operation::DescribeTable, &json!({"TableName": "t"}))
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.header("x-amz-security-token"), Some("token-1"));
        assert_eq!(request.header("x-amz-date"), Some("Tue, 28 Feb 2012 02:22:10 GMT"));
        let auth = request.header("x-amzn-authorization").unwrap();
        assert!(auth.contains("SignedHeaders=host;x-amz-date;x-amz-security-token;x-amz-target,"));

        let headers = unsigned_headers(&request.headers, "x-amzn-authorization");
        let body = serde_json::to_vec(&json!({"TableName": "t"})).unwrap();
        let expected = LegacySigner
            .authorization(&SignableRequest::post(&headers, &body), &credentials)
            .unwrap();
        assert_eq!(auth, expected);
    }

    #[tokio::test]
    async fn test_should_map_error_response() {
        let transport = ScriptedTransport::new([Reply::error(
            400,
            "com.amazonaws.dynamodb.v20111205#ResourceNotFoundException",
            "Requested resource not found",
        )]);
        let exec = executor(Arc::new(LegacySigner), Credentials::new("k", "s"), &transport);
        let err = exec
            .send(Operation::DescribeTable, &json!({"TableName": "missing"}))
            .await
            .unwrap_err();
        let ClientError::Service(err) = err else {
            panic!("expected service error, got {err:?}");
        };
        assert_eq!(err.service_name, "com.amazonaws.dynamodb.v20111205");
        assert_eq!(err.error_type, "ResourceNotFoundException");
        assert_eq!(err.status_code, 400);
        assert_eq!(err.action.as_deref(), Some("DescribeTable"));
        assert_eq!(
            err.to_string(),
            "AmazonError - DescribeTable 400 ResourceNotFoundException: Requested resource not found"
        );
    }

    #[tokio::test]
    async fn test_should_tolerate_unparseable_error_body() {
        let transport = ScriptedTransport::new([Reply::Raw(500, "<html>oops</html>".to_owned())]);
        let exec = executor(Arc::new(LegacySigner), Credentials::new("k", "s"), &transport);
        let err = exec.send(Operation::Scan, &json!({})).await.unwrap_err();
        let ClientError::Service(err) = err else {
            panic!("expected service error, got {err:?}");
        };
        assert_eq!(err.error_type, "UnknownError");
        assert_eq!(err.service_name, "Unknown");
        assert_eq!(err.message, "<html>oops</html>");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_should_treat_empty_success_body_as_empty_object() {
        let transport = ScriptedTransport::new([Reply::Raw(200, String::new())]);
        let exec = executor(Arc::new(LegacySigner), Credentials::new("k", "s"), &transport);
        let response = exec.send(Operation::PutItem, &json!({})).await.unwrap();
        assert_eq!(response, json!({}));
    }

    #[tokio::test]
    async fn test_should_surface_transport_failure() {
        let transport = ScriptedTransport::new([Reply::Fail("connection refused".to_owned())]);
        let exec = executor(Arc::new(LegacySigner), Credentials::new("k", "s"), &transport);
        let err = exec.send(Operation::Scan, &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(err.is_retryable());
    }
}
