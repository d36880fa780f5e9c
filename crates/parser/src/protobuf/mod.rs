//! Compiler request parsing
//!
//! Runs the front half of the pipeline (load, resolve, build routes) over a
//! `CodeGeneratorRequest` from protoc or over a `FileDescriptorSet` written
//! with `protoc --descriptor_set_out --include_imports --include_source_info`.
//!
//! ## Example
//! ```rust,ignore
//! use protoc_gen_go_hz_parser::ProtobufParser;
//!
//! let parser = ProtobufParser::from_file(
//!     "api.pb",
//!     &["user/v1/user.proto".to_string()],
//!     "paths=source_relative",
//! )?;
//! let model = parser.parse()?;
//! ```

mod parser;

pub use parser::{ParsedModel, ProtobufParser};
