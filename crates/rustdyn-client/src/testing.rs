//! In-memory transport that replays scripted responses.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use http::HeaderMap;
use parking_lot::Mutex;
use serde_json::Value as Json;

use crate::transport::{HttpTransport, TransportError, TransportFuture};

/// One request seen by a [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Action name taken from `x-amz-target`.
    pub action: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Parsed JSON body.
    pub body: Json,
    /// Request URI.
    pub uri: String,
}

impl RecordedRequest {
    /// Header value as a string, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// An HTTP response with a JSON body.
    Json(u16, Json),
    /// An HTTP response with a raw body.
    Raw(u16, String),
    /// A connection failure.
    Fail(String),
}

impl Reply {
    /// `200` with `body`.
    pub fn ok(body: Json) -> Self {
        Self::Json(200, body)
    }

    /// An error response with the given `__type` and message.
    pub fn error(status: u16, error_type: &str, message: &str) -> Self {
        Self::Json(
            status,
            serde_json::json!({ "__type": error_type, "message": message }),
        )
    }
}

type Responder = dyn Fn(&RecordedRequest) -> Reply + Send + Sync;

/// Transport that records requests and answers from a queue, falling back to
/// a responder closure once the queue is empty.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    responder: Option<Arc<Responder>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("queued", &self.replies.lock().len())
            .field("requests", &self.requests.lock().len())
            .finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    /// Answer with `replies` in order.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Answer every request by calling `responder`.
    pub fn with_responder(
        responder: impl Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Some(Arc::new(responder)),
            ..Self::default()
        }
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Actions sent so far, in order.
    pub fn actions(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.action.clone()).collect()
    }

    fn reply_to(&self, recorded: &RecordedRequest) -> Reply {
        if let Some(reply) = self.replies.lock().pop_front() {
            return reply;
        }
        match &self.responder {
            Some(responder) => responder(recorded),
            None => Reply::Fail(format!("no scripted reply for {}", recorded.action)),
        }
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: http::Request<Bytes>) -> TransportFuture<'_> {
        let (parts, body) = request.into_parts();
        let action = parts
            .headers
            .get("x-amz-target")
            .and_then(|v| v.to_str().ok())
            .and_then(|target| target.rsplit('.').next())
            .unwrap_or_default()
            .to_owned();
        let recorded = RecordedRequest {
            action,
            headers: parts.headers,
            body: serde_json::from_slice(&body).unwrap_or(Json::Null),
            uri: parts.uri.to_string(),
        };
        let reply = self.reply_to(&recorded);
        self.requests.lock().push(recorded);

        Box::pin(async move {
            let (status, body) = match reply {
                Reply::Json(status, json) => (status, json.to_string()),
                Reply::Raw(status, text) => (status, text),
                Reply::Fail(message) => return Err(TransportError::new(message)),
            };
            Ok(http::Response::builder()
                .status(status)
                .body(Bytes::from(body))
                .expect("valid scripted response"))
        })
    }
}
