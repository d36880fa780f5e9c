//! Go code generation for protoc-gen-go-hz
//!
//! This crate transforms route tables into Go source files that register
//! CloudWeGo Hertz routes for proto services:
//!
//! - [`CodeRenderer`] renders each service into a [`GeneratedUnit`]
//! - [`OutputAssembler`] merges units into [`OutputFile`]s
//! - [`code`] holds the code-block tree and the Go formatter both build on

pub mod code;
mod assemble;
mod marshal;
mod render;

pub use assemble::{
    output_file_name, OutputAssembler, OutputFile, GENERATOR_NAME, GENERATOR_VERSION,
};
pub use render::{CodeRenderer, GeneratedUnit, Symbol};

use protoc_gen_go_hz_common::{GeneratorError, PluginOptions, ProtoIndex, Result, RouteTable};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Hertz binding generator
///
/// Renders the route tables of one request and assembles the output files:
/// - `<Service>HTTPServer` interfaces
/// - `Register<Service>HTTPServer` route registration
/// - one request handler per route
pub struct HertzGenerator<'a> {
    index: &'a ProtoIndex,
    tables: &'a [RouteTable],
    options: &'a PluginOptions,
    compiler_version: Option<&'a str>,
}

impl<'a> HertzGenerator<'a> {
    /// Create a new generator over a loaded index and its route tables
    pub fn new(index: &'a ProtoIndex, tables: &'a [RouteTable], options: &'a PluginOptions) -> Self {
        Self {
            index,
            tables,
            options,
            compiler_version: None,
        }
    }

    /// Record the protoc version in the file headers
    pub fn with_compiler_version(mut self, version: Option<&'a str>) -> Self {
        self.compiler_version = version;
        self
    }

    /// Render and assemble every output file
    ///
    /// Nothing is returned when any service fails to render.
    pub fn generate(&self) -> Result<Vec<OutputFile>> {
        let units = CodeRenderer::new(self.index, self.options).render_all(self.tables)?;
        debug!(units = units.len(), "rendered units");
        OutputAssembler::new(self.compiler_version).assemble(units)
    }

    /// Generate and write every output file under a directory
    ///
    /// Returns the written paths. Files are only written once generation has
    /// fully succeeded.
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let files = self.generate()?;
        let mut written = Vec::with_capacity(files.len());

        for file in files {
            let output_path = output_dir.join(&file.name);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    GeneratorError::Generation(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            fs::write(&output_path, file.content).map_err(|e| {
                GeneratorError::Generation(format!(
                    "Failed to write {}: {}",
                    output_path.display(),
                    e
                ))
            })?;
            written.push(output_path);
        }

        Ok(written)
    }
}

/// Generate output files (convenience function)
pub fn generate(
    index: &ProtoIndex,
    tables: &[RouteTable],
    options: &PluginOptions,
    compiler_version: Option<&str>,
) -> Result<Vec<OutputFile>> {
    HertzGenerator::new(index, tables, options)
        .with_compiler_version(compiler_version)
        .generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tables_no_files() {
        let index = ProtoIndex::default();
        let options = PluginOptions::default();
        let files = generate(&index, &[], &options, None).unwrap();
        assert!(files.is_empty());
    }
}
