//! Plexus wire protocol message codec.
//!
//! This crate turns request and response envelopes for the plexus
//! graph-query protocol, including arbitrary graph primitives (vertices,
//! edges, trees, collections, maps), into a self-describing byte stream
//! and reconstructs them losslessly on the other end.
//!
//! # Modules
//!
//! - [`value`] - Runtime value types, the closed set of encodable kinds
//! - [`graph`] - Detached vertex/edge views and traversal trees
//! - [`message`] - Request/response envelopes and status codes
//! - [`registry`] - Kind-to-codec bindings and extension loading
//! - [`resolver`] - Pluggable type-to-tag resolution policy
//! - [`buffer`] - Growable output buffer and checked input cursor
//! - [`codec`] - The message codec itself
//! - [`config`] - Codec configuration
//! - [`error`] - Codec error types
//!
//! # Example
//!
//! ```
//! use plexus_wire::{MessageCodec, ResponseMessage, Value};
//! use uuid::Uuid;
//!
//! let codec = MessageCodec::new();
//! let response = ResponseMessage::build(Uuid::new_v4())
//!     .result(Value::List(vec![Value::Int32(1), Value::Null]))
//!     .create();
//!
//! let bytes = codec.serialize_response(&response).unwrap();
//! let decoded = codec.deserialize_response(bytes).unwrap();
//! assert_eq!(decoded, response);
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod graph;
pub mod message;
pub mod registry;
pub mod resolver;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use buffer::{WireBuffer, WireReader, DEFAULT_BUFFER_SIZE};
pub use codec::{read_mime_header, MessageCodec, MIME_TYPE};
pub use config::CodecConfig;
pub use graph::{Edge, Tree, Vertex, VertexProperty};
pub use message::{
    RequestMessage, ResponseCode, ResponseMessage, ResponseResult, ResponseStatus,
};
pub use registry::{
    CustomCodec, ExtensionFactory, ExtensionProvider, FactoryCatalog, Registration, TypeCodec,
    TypeKey, TypeRegistry,
};
pub use resolver::{ClassResolver, DefaultClassResolver, ResolverFactory};
pub use value::{CustomValue, MapEntry, Value, ValueMap};

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_request_roundtrip_at_crate_root() {
        let codec = MessageCodec::new();
        let request = RequestMessage::build("eval")
            .processor("session")
            .arg("query", "g.V().out()")
            .create();

        let bytes = codec.serialize_request(&request).unwrap();
        let mut reader = WireReader::new(bytes);
        assert_eq!(read_mime_header(&mut reader).unwrap(), MIME_TYPE);

        let remaining = reader.read_exact(reader.remaining()).unwrap();
        let decoded = codec
            .deserialize_request(bytes::Bytes::from(remaining))
            .unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_response_roundtrip_at_crate_root() {
        let codec = MessageCodec::new();
        let id = Uuid::new_v4();
        let response = ResponseMessage::build(id)
            .code(ResponseCode::ServerError)
            .status_message("boom")
            .create();

        let decoded = codec
            .deserialize_response(codec.serialize_response(&response).unwrap())
            .unwrap();
        assert_eq!(decoded.request_id, id);
        assert_eq!(decoded.status.code, ResponseCode::ServerError);
        assert_eq!(decoded.status.message, "boom");
    }
}
