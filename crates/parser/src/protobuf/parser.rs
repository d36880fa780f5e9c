//! Compiler request parser

use crate::descriptor::{CodeGeneratorRequest, FileDescriptorSet};
use crate::loader::DescriptorLoader;
use crate::routes::RouteModelBuilder;
use prost::Message;
use protoc_gen_go_hz_common::{
    GeneratorError, PluginOptions, ProtoIndex, Result, RouteTable,
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Everything the renderer needs from one request
#[derive(Debug, Clone, Serialize)]
pub struct ParsedModel {
    pub options: PluginOptions,
    /// `protoc` version as `v3.21.12`, when the compiler sent one
    pub compiler_version: Option<String>,
    pub index: ProtoIndex,
    /// One table per service of every generated file
    pub tables: Vec<RouteTable>,
}

/// Protobuf compiler request parser
///
/// Holds a decoded request and runs the descriptor loader, annotation
/// resolver and route model builder over it.
pub struct ProtobufParser {
    request: CodeGeneratorRequest,
    options: PluginOptions,
}

impl ProtobufParser {
    /// Decode a serialized `CodeGeneratorRequest` (what protoc writes to stdin)
    pub fn from_request_bytes(bytes: &[u8]) -> Result<Self> {
        let request = CodeGeneratorRequest::decode(bytes).map_err(|e| {
            GeneratorError::Decode(format!("Failed to decode CodeGeneratorRequest: {}", e))
        })?;
        Ok(Self::from_request(request))
    }

    pub fn from_request(request: CodeGeneratorRequest) -> Self {
        let options = PluginOptions::parse(request.parameter.as_deref().unwrap_or_default());
        Self { request, options }
    }

    /// Load a FileDescriptorSet file written by `protoc --descriptor_set_out`
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ProtobufParser::from_file("api.pb", &[], "verbose=true")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P, files: &[String], parameter: &str) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Decode(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes, files, parameter)
    }

    /// Build a request from FileDescriptorSet bytes
    ///
    /// `files` lists the proto files to generate; when empty, every file that
    /// declares a service is requested.
    pub fn from_file_descriptor_set(bytes: &[u8], files: &[String], parameter: &str) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes).map_err(|e| {
            GeneratorError::Decode(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        let file_to_generate = if files.is_empty() {
            set.file
                .iter()
                .filter(|f| !f.service.is_empty())
                .filter_map(|f| f.name.clone())
                .collect()
        } else {
            files.to_vec()
        };

        Ok(Self::from_request(CodeGeneratorRequest {
            file_to_generate,
            parameter: Some(parameter.to_string()),
            compiler_version: None,
            proto_file: set.file,
        }))
    }

    /// Load descriptors, resolve annotations and build the route tables
    pub fn parse(&self) -> Result<ParsedModel> {
        debug!(
            files = self.request.proto_file.len(),
            requested = ?self.request.file_to_generate,
            "parsing request"
        );

        let index = DescriptorLoader::new(&self.options).load(&self.request)?;
        let tables = RouteModelBuilder::new(&index).build()?;

        Ok(ParsedModel {
            options: self.options.clone(),
            compiler_version: self.request.compiler_version.as_ref().map(|v| v.display()),
            index,
            tables,
        })
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn request(&self) -> &CodeGeneratorRequest {
        &self.request
    }
}
