//! protoc plugin protocol
//!
//! Reads a `CodeGeneratorRequest` from stdin and writes a
//! `CodeGeneratorResponse` to stdout. Generation failures travel inside the
//! response; only I/O failures make the process exit non-zero.

use crate::logging;
use anyhow::{Context, Result};
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::CodeGeneratorResponse;
use protoc_gen_go_hz_common::GeneratorError;
use protoc_gen_go_hz_generator::OutputFile;
use protoc_gen_go_hz_parser::ProtobufParser;
use std::io::{self, Read, Write};
use tracing::{debug, info};

pub fn run(verbose: bool) -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let parser = ProtobufParser::from_request_bytes(&input);
    let verbose = verbose || parser.as_ref().is_ok_and(|p| p.options().verbose);
    logging::init(verbose);
    debug!(bytes = input.len(), "read request");

    let response = match parser.and_then(|parser| generate(&parser)) {
        Ok(files) => {
            info!(files = files.len(), "generated");
            success(files)
        }
        Err(err) => {
            debug!(error = %err, "generation failed");
            failure(&err)
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn generate(parser: &ProtobufParser) -> protoc_gen_go_hz_common::Result<Vec<OutputFile>> {
    let model = parser.parse()?;
    protoc_gen_go_hz_generator::generate(
        &model.index,
        &model.tables,
        &model.options,
        model.compiler_version.as_deref(),
    )
}

fn success(files: Vec<OutputFile>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        file: files
            .into_iter()
            .map(|f| File {
                name: Some(f.name),
                content: Some(f.content),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn failure(err: &GeneratorError) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(err.to_string()),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}
