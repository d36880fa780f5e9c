//! Output assembly
//!
//! Groups rendered units by destination file, merges their imports and
//! declarations, and produces the final file contents.

use crate::code::{CodeBlock, GoFormatter};
use crate::render::GeneratedUnit;
use protoc_gen_go_hz_common::naming::trim_proto_extension;
use protoc_gen_go_hz_common::{
    finish, GeneratorError, GoPackage, Layout, PathsMode, PluginOptions, ProtoFile, Result,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub const GENERATOR_NAME: &str = "protoc-gen-go-hz";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A finished output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// Path relative to the plugin output directory
    pub name: String,
    pub content: String,
}

/// Destination of the code generated for a proto file
///
/// # Examples
/// ```
/// use protoc_gen_go_hz_common::{GoPackage, PluginOptions, ProtoFile};
/// use protoc_gen_go_hz_generator::output_file_name;
///
/// let file = ProtoFile {
///     name: "user/v1/user.proto".to_string(),
///     package: "user.v1".to_string(),
///     dependencies: vec![],
///     go_package: GoPackage {
///         import_path: "example.com/api/user/v1".to_string(),
///         name: "userv1".to_string(),
///     },
///     generate: true,
///     messages: vec![],
///     enums: vec![],
///     services: vec![],
/// };
///
/// let options = PluginOptions::default();
/// assert_eq!(output_file_name(&options, &file), "example.com/api/user/v1/user_hz.pb.go");
///
/// let options = PluginOptions::parse("paths=source_relative,layout=package,out_dir=gen");
/// assert_eq!(output_file_name(&options, &file), "gen/user/v1/userv1_hz.pb.go");
/// ```
pub fn output_file_name(options: &PluginOptions, file: &ProtoFile) -> String {
    let (proto_dir, proto_base) = match file.name.rsplit_once('/') {
        Some((dir, base)) => (dir, base),
        None => ("", file.name.as_str()),
    };

    let dir = match options.paths {
        PathsMode::Import => file.go_package.import_path.as_str(),
        PathsMode::SourceRelative => proto_dir,
    };
    let stem = match options.layout {
        Layout::File => trim_proto_extension(proto_base),
        Layout::Package => file.go_package.name.as_str(),
    };
    let name = format!("{}{}", stem, options.suffix);

    [options.out_dir.as_deref(), Some(dir), Some(name.as_str())]
        .into_iter()
        .flatten()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Units merged into one destination file
struct FileGroup {
    name: String,
    package: GoPackage,
    sources: Vec<String>,
    imports: BTreeMap<String, Option<String>>,
    blocks: Vec<CodeBlock>,
}

/// Merges generated units into output files
pub struct OutputAssembler<'a> {
    compiler_version: Option<&'a str>,
}

impl<'a> OutputAssembler<'a> {
    pub fn new(compiler_version: Option<&'a str>) -> Self {
        Self { compiler_version }
    }

    /// Merge units in order; files come out in order of first appearance
    pub fn assemble(&self, units: Vec<GeneratedUnit>) -> Result<Vec<OutputFile>> {
        let mut groups: Vec<FileGroup> = Vec::new();
        // Top-level Go names per import path, across every file of the package
        let mut symbols: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut errors = Vec::new();

        for unit in units {
            let position = match groups.iter().position(|g| g.name == unit.file_name) {
                Some(position) => position,
                None => {
                    groups.push(FileGroup {
                        name: unit.file_name.clone(),
                        package: unit.package.clone(),
                        sources: Vec::new(),
                        imports: BTreeMap::new(),
                        blocks: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[position];

            if group.package != unit.package {
                errors.push(GeneratorError::Generation(format!(
                    "{} would mix Go packages {} ({}) and {} ({})",
                    group.name,
                    group.package.name,
                    group.package.import_path,
                    unit.package.name,
                    unit.package.import_path
                )));
                continue;
            }

            let declared = symbols
                .entry(unit.package.import_path.clone())
                .or_default();
            for symbol in &unit.symbols {
                if let Some(first) = declared.get(&symbol.name) {
                    errors.push(GeneratorError::SymbolCollision {
                        file: group.name.clone(),
                        symbol: symbol.name.clone(),
                        first: first.clone(),
                        second: symbol.owner.clone(),
                    });
                } else {
                    declared.insert(symbol.name.clone(), symbol.owner.clone());
                }
            }

            if !group.sources.contains(&unit.source) {
                group.sources.push(unit.source);
            }
            for (path, alias) in unit.imports {
                group.imports.entry(path).or_insert(alias);
            }
            if !group.blocks.is_empty() {
                group.blocks.push(CodeBlock::Blank);
            }
            group.blocks.extend(unit.blocks);
        }

        let files = groups
            .into_iter()
            .map(|group| {
                debug!(file = %group.name, sources = group.sources.len(), "assembled output file");
                OutputFile {
                    content: self.render_file(&group),
                    name: group.name,
                }
            })
            .collect();
        finish(files, errors)
    }

    fn render_file(&self, group: &FileGroup) -> String {
        let mut header = format!(
            "Code generated by {name}. DO NOT EDIT.\nversions:\n- {name} v{version}\n- protoc           {protoc}",
            name = GENERATOR_NAME,
            version = GENERATOR_VERSION,
            protoc = self.compiler_version.unwrap_or("(unknown)")
        );
        for source in &group.sources {
            header.push_str("\nsource: ");
            header.push_str(source);
        }

        let mut blocks = vec![
            CodeBlock::comment(header),
            CodeBlock::Blank,
            CodeBlock::line(format!("package {}", group.package.name)),
            CodeBlock::Blank,
            import_block(&group.imports),
            CodeBlock::Blank,
        ];
        blocks.extend(group.blocks.iter().cloned());
        GoFormatter::format(&blocks)
    }
}

/// Standard library imports first, then everything else, each sorted by path
fn import_block(imports: &BTreeMap<String, Option<String>>) -> CodeBlock {
    let spec = |path: &str, alias: &Option<String>| match alias {
        Some(alias) => CodeBlock::line(format!("{} \"{}\"", alias, path)),
        None => CodeBlock::line(format!("\"{}\"", path)),
    };
    let is_std = |path: &str| !path.split('/').next().unwrap_or(path).contains('.');

    let mut lines: Vec<CodeBlock> = imports
        .iter()
        .filter(|(path, _)| is_std(path))
        .map(|(path, alias)| spec(path, alias))
        .collect();
    let third_party: Vec<CodeBlock> = imports
        .iter()
        .filter(|(path, _)| !is_std(path))
        .map(|(path, alias)| spec(path, alias))
        .collect();

    if !lines.is_empty() && !third_party.is_empty() {
        lines.push(CodeBlock::Blank);
    }
    lines.extend(third_party);
    CodeBlock::grouped("import", lines)
}
