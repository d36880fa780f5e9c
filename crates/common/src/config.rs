//! Plugin parameters
//!
//! protoc passes `--go-hz_opt` values as one comma-separated string of
//! `key=value` pairs. Parsing is permissive: unknown keys and bad values are
//! logged and skipped, never fatal.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Default suffix appended to generated file names
pub const DEFAULT_SUFFIX: &str = "_hz.pb.go";

/// Where output files are placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathsMode {
    /// Under the Go import path of the file (`paths=import`)
    #[default]
    Import,
    /// Next to the `.proto` file (`paths=source_relative`)
    SourceRelative,
}

/// How rendered units are grouped into files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// One output file per `.proto` file
    #[default]
    File,
    /// One output file per Go package
    Package,
}

/// Parsed plugin parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginOptions {
    pub verbose: bool,
    pub paths: PathsMode,
    pub layout: Layout,
    pub suffix: String,
    /// Prefix directory for every output name
    pub out_dir: Option<String>,
    /// `M<file>=<import path>` overrides, keyed by proto file name
    pub import_overrides: BTreeMap<String, String>,
    /// Keys that were not recognised, in parameter order
    pub ignored: Vec<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            paths: PathsMode::default(),
            layout: Layout::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            out_dir: None,
            import_overrides: BTreeMap::new(),
            ignored: Vec::new(),
        }
    }
}

impl PluginOptions {
    /// Parse a raw parameter string such as `verbose=true,paths=source_relative`
    ///
    /// # Examples
    /// ```
    /// use protoc_gen_go_hz_common::{PathsMode, PluginOptions};
    ///
    /// let options = PluginOptions::parse("verbose,paths=source_relative,color=blue");
    /// assert!(options.verbose);
    /// assert_eq!(options.paths, PathsMode::SourceRelative);
    /// assert_eq!(options.ignored, vec!["color".to_string()]);
    /// ```
    pub fn parse(parameter: &str) -> Self {
        let mut options = Self::default();

        for entry in parameter.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let (key, value) = match entry.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (entry, "true"),
            };

            match key {
                "verbose" => match parse_bool(value) {
                    Some(flag) => options.verbose = flag,
                    None => warn!(key, value, "ignoring invalid boolean plugin option"),
                },
                "paths" => match value {
                    "import" => options.paths = PathsMode::Import,
                    "source_relative" => options.paths = PathsMode::SourceRelative,
                    _ => warn!(key, value, "ignoring unknown paths mode"),
                },
                "layout" => match value {
                    "file" => options.layout = Layout::File,
                    "package" => options.layout = Layout::Package,
                    _ => warn!(key, value, "ignoring unknown layout"),
                },
                "suffix" if value.is_empty() => warn!(key, value, "ignoring empty suffix"),
                "suffix" => options.suffix = value.to_string(),
                "out_dir" => {
                    let dir = value.trim_end_matches('/');
                    options.out_dir = match dir {
                        "" | "." => None,
                        _ => Some(dir.to_string()),
                    };
                }
                _ if key.len() > 1 && key.starts_with('M') => {
                    options
                        .import_overrides
                        .insert(key[1..].to_string(), value.to_string());
                }
                _ => {
                    debug!(key, "ignoring unknown plugin option");
                    options.ignored.push(key.to_string());
                }
            }
        }

        options
    }

    /// Import path override for a proto file, if one was given
    pub fn import_override(&self, file_name: &str) -> Option<&str> {
        self.import_overrides.get(file_name).map(String::as_str)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
