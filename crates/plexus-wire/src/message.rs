//! Request and response envelopes.
//!
//! Envelopes are built once through their builders and treated as frozen
//! snapshots: one envelope per encode/decode call, discarded afterwards.

use crate::value::Value;
use uuid::Uuid;

/// A client-to-server request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMessage {
    /// Globally unique request identifier.
    pub id: Uuid,
    /// The operation to perform. Never empty.
    pub op: String,
    /// Routing namespace for the operation. May be empty.
    pub processor: String,
    /// Operation arguments in insertion order.
    pub args: Vec<(String, Value)>,
}

impl RequestMessage {
    /// Start building a request for the given operation.
    pub fn build(op: impl Into<String>) -> RequestMessageBuilder {
        RequestMessageBuilder {
            id: None,
            op: op.into(),
            processor: String::new(),
            args: Vec::new(),
        }
    }

    /// Argument value for a key, if present.
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Builder for [`RequestMessage`].
#[derive(Debug)]
pub struct RequestMessageBuilder {
    id: Option<Uuid>,
    op: String,
    processor: String,
    args: Vec<(String, Value)>,
}

impl RequestMessageBuilder {
    /// Override the request id. A fresh v4 UUID is assigned otherwise.
    pub fn request_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the processor namespace.
    pub fn processor(mut self, processor: impl Into<String>) -> Self {
        self.processor = processor.into();
        self
    }

    /// Add an argument.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    /// Materialize the frozen request.
    pub fn create(self) -> RequestMessage {
        RequestMessage {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            op: self.op,
            processor: self.processor,
            args: self.args,
        }
    }
}

/// A server-to-client response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    /// The id of the request this response correlates to.
    pub request_id: Uuid,
    /// Response status.
    pub status: ResponseStatus,
    /// Response result.
    pub result: ResponseResult,
}

impl ResponseMessage {
    /// Start building a response correlated to a request id.
    pub fn build(request_id: Uuid) -> ResponseMessageBuilder {
        ResponseMessageBuilder {
            request_id,
            code: ResponseCode::Success,
            status_message: String::new(),
            attributes: Vec::new(),
            meta: Vec::new(),
            data: None,
        }
    }
}

/// Status portion of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseStatus {
    /// Status code.
    pub code: ResponseCode,
    /// Human-readable status message.
    pub message: String,
    /// Status attributes in insertion order.
    pub attributes: Vec<(String, Value)>,
}

impl ResponseStatus {
    /// Attribute value for a key, if present.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Result portion of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    /// Result metadata in insertion order.
    pub meta: Vec<(String, Value)>,
    /// Result data, absent when the operation produced none.
    pub data: Option<Value>,
}

impl ResponseResult {
    /// Metadata value for a key, if present.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Builder for [`ResponseMessage`].
#[derive(Debug)]
pub struct ResponseMessageBuilder {
    request_id: Uuid,
    code: ResponseCode,
    status_message: String,
    attributes: Vec<(String, Value)>,
    meta: Vec<(String, Value)>,
    data: Option<Value>,
}

impl ResponseMessageBuilder {
    /// Set the status code.
    pub fn code(mut self, code: ResponseCode) -> Self {
        self.code = code;
        self
    }

    /// Set the status message.
    pub fn status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = message.into();
        self
    }

    /// Add a status attribute.
    pub fn status_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add a result metadata entry.
    pub fn result_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.push((key.into(), value.into()));
        self
    }

    /// Set the result data.
    pub fn result(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Materialize the frozen response.
    pub fn create(self) -> ResponseMessage {
        ResponseMessage {
            request_id: self.request_id,
            status: ResponseStatus {
                code: self.code,
                message: self.status_message,
                attributes: self.attributes,
            },
            result: ResponseResult {
                meta: self.meta,
                data: self.data,
            },
        }
    }
}

/// Response status codes with stable wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// The request completed and the result is final.
    Success,
    /// The request completed with no result data.
    NoContent,
    /// One chunk of a multi-part result; more follow.
    PartialContent,
    /// The request lacked valid credentials.
    Unauthorized,
    /// The server requires authentication before this request.
    Authenticate,
    /// The request message could not be parsed or was missing fields.
    MalformedRequest,
    /// The request was well-formed but carried invalid arguments.
    InvalidRequestArguments,
    /// The server failed while processing the request.
    ServerError,
    /// Query evaluation failed on the server.
    QueryEvaluationError,
    /// The server timed out processing the request.
    ServerTimeout,
    /// The server failed to serialize the result.
    SerializationError,
}

impl ResponseCode {
    /// Stable wire value for this code.
    pub fn value(self) -> u16 {
        match self {
            ResponseCode::Success => 200,
            ResponseCode::NoContent => 204,
            ResponseCode::PartialContent => 206,
            ResponseCode::Unauthorized => 401,
            ResponseCode::Authenticate => 407,
            ResponseCode::MalformedRequest => 498,
            ResponseCode::InvalidRequestArguments => 499,
            ResponseCode::ServerError => 500,
            ResponseCode::QueryEvaluationError => 597,
            ResponseCode::ServerTimeout => 598,
            ResponseCode::SerializationError => 599,
        }
    }

    /// Look up a code by wire value.
    pub fn from_value(value: u16) -> Option<Self> {
        match value {
            200 => Some(ResponseCode::Success),
            204 => Some(ResponseCode::NoContent),
            206 => Some(ResponseCode::PartialContent),
            401 => Some(ResponseCode::Unauthorized),
            407 => Some(ResponseCode::Authenticate),
            498 => Some(ResponseCode::MalformedRequest),
            499 => Some(ResponseCode::InvalidRequestArguments),
            500 => Some(ResponseCode::ServerError),
            597 => Some(ResponseCode::QueryEvaluationError),
            598 => Some(ResponseCode::ServerTimeout),
            599 => Some(ResponseCode::SerializationError),
            _ => None,
        }
    }

    /// Whether this code reports success (including partial results).
    pub fn is_success(self) -> bool {
        matches!(
            self,
            ResponseCode::Success | ResponseCode::NoContent | ResponseCode::PartialContent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let id = Uuid::new_v4();
        let request = RequestMessage::build("eval")
            .request_id(id)
            .processor("session")
            .arg("query", "g.V()")
            .arg("batch", 64i32)
            .create();

        assert_eq!(request.id, id);
        assert_eq!(request.op, "eval");
        assert_eq!(request.processor, "session");
        assert_eq!(request.arg("query"), Some(&Value::String("g.V()".into())));
        assert_eq!(request.arg("batch"), Some(&Value::Int32(64)));
        assert_eq!(request.arg("missing"), None);
    }

    #[test]
    fn test_request_assigns_fresh_id() {
        let a = RequestMessage::build("eval").create();
        let b = RequestMessage::build("eval").create();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_response_builder() {
        let id = Uuid::new_v4();
        let response = ResponseMessage::build(id)
            .code(ResponseCode::Success)
            .status_message("worked")
            .status_attribute("host", "node-1")
            .result_meta("elapsed_us", 1500i64)
            .result("some-result")
            .create();

        assert_eq!(response.request_id, id);
        assert_eq!(response.status.code, ResponseCode::Success);
        assert_eq!(response.status.message, "worked");
        assert_eq!(
            response.status.attribute("host"),
            Some(&Value::String("node-1".into()))
        );
        assert_eq!(response.result.meta("elapsed_us"), Some(&Value::Int64(1500)));
        assert_eq!(
            response.result.data,
            Some(Value::String("some-result".into()))
        );
    }

    #[test]
    fn test_response_defaults() {
        let response = ResponseMessage::build(Uuid::new_v4()).create();
        assert_eq!(response.status.code, ResponseCode::Success);
        assert!(response.status.message.is_empty());
        assert!(response.status.attributes.is_empty());
        assert!(response.result.meta.is_empty());
        assert_eq!(response.result.data, None);
    }

    #[test]
    fn test_response_code_values() {
        for code in [
            ResponseCode::Success,
            ResponseCode::NoContent,
            ResponseCode::PartialContent,
            ResponseCode::Unauthorized,
            ResponseCode::Authenticate,
            ResponseCode::MalformedRequest,
            ResponseCode::InvalidRequestArguments,
            ResponseCode::ServerError,
            ResponseCode::QueryEvaluationError,
            ResponseCode::ServerTimeout,
            ResponseCode::SerializationError,
        ] {
            assert_eq!(ResponseCode::from_value(code.value()), Some(code));
        }

        assert_eq!(ResponseCode::from_value(0), None);
        assert_eq!(ResponseCode::from_value(418), None);
        assert!(ResponseCode::Success.is_success());
        assert!(ResponseCode::PartialContent.is_success());
        assert!(!ResponseCode::ServerError.is_success());
    }
}
