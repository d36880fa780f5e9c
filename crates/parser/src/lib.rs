//! Descriptor parsing for protoc-gen-go-hz
//!
//! This crate turns a protoc `CodeGeneratorRequest` into the route model the
//! generator renders.
//!
//! ## Pipeline
//!
//! 1. [`DescriptorLoader`] decodes the file descriptors into a
//!    [`ProtoIndex`](protoc_gen_go_hz_common::ProtoIndex), resolving every
//!    type reference and decoding the HTTP options.
//! 2. [`AnnotationResolver`] turns each annotated method into an
//!    [`HttpBinding`](protoc_gen_go_hz_common::HttpBinding): verb, path
//!    template and the source of every bound input field.
//! 3. [`RouteModelBuilder`] collects the bindings of each service into a
//!    [`RouteTable`](protoc_gen_go_hz_common::RouteTable) and rejects
//!    duplicate routes.
//!
//! Methods without an HTTP annotation are skipped; they are not an error.

pub mod descriptor;
mod loader;
mod protobuf;
mod resolver;
mod routes;

pub use loader::DescriptorLoader;
pub use protobuf::{ParsedModel, ProtobufParser};
pub use resolver::AnnotationResolver;
pub use routes::RouteModelBuilder;

use protoc_gen_go_hz_common::Result;

/// Parse a serialized `CodeGeneratorRequest`
///
/// # Arguments
/// * `bytes` - The request exactly as protoc wrote it to stdin
///
/// # Returns
/// * `ParsedModel` - Options, descriptor index and route tables
pub fn parse_request(bytes: &[u8]) -> Result<ParsedModel> {
    ProtobufParser::from_request_bytes(bytes)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use descriptor::CodeGeneratorRequest;
    use prost::Message;

    #[test]
    fn test_parse_empty_request() {
        let bytes = CodeGeneratorRequest::default().encode_to_vec();
        let model = parse_request(&bytes).unwrap();
        assert!(model.tables.is_empty());
        assert_eq!(model.compiler_version, None);
    }
}
