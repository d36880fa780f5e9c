//! Common types and utilities for protoc-gen-go-hz
//!
//! This crate contains the shared data structures, error types, and naming
//! conventions used across the parser, generator, and CLI components:
//!
//! - [`model`]: the descriptor arena built by the loader
//! - [`binding`]: decoded HTTP annotations and canonical bindings
//! - [`path`]: path template parsing
//! - [`route`]: per-service route tables
//! - [`config`]: plugin parameter parsing

pub mod binding;
pub mod config;
pub mod model;
pub mod naming;
pub mod path;
pub mod route;

pub use binding::{
    BodyBinding, FieldAnnotation, FieldBinding, FieldRef, HttpAnnotation, HttpBinding, HttpVerb,
    ParamSource,
};
pub use config::{Layout, PathsMode, PluginOptions};
pub use model::{
    EnumId, EnumType, Field, FieldKind, FileId, GoPackage, Message, MessageId, Method, ProtoFile,
    ProtoIndex, ScalarKind, Service,
};
pub use path::{PathTemplate, Segment, TemplateError};
pub use route::{Route, RouteTable};

use thiserror::Error;

/// Errors that can occur during generation
///
/// Every variant is fatal to the request: the plugin reports it in the
/// response and emits no files.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("unresolved type `{type_name}` referenced by {referenced_by}")]
    UnresolvedType {
        type_name: String,
        referenced_by: String,
    },

    #[error("invalid path template \"{template}\" on {method}: {reason}")]
    InvalidPathTemplate {
        method: String,
        template: String,
        reason: String,
    },

    #[error("binding conflict on {method}: {detail}")]
    BindingConflict { method: String, detail: String },

    #[error("route conflict in service {service}: {first} and {second} both register {verb} {path}")]
    RouteConflict {
        service: String,
        verb: String,
        path: String,
        first: String,
        second: String,
    },

    #[error("unsupported binding type on {method}: {detail}")]
    UnsupportedBindingType { method: String, detail: String },

    #[error("symbol collision in {file}: `{symbol}` is generated for both {first} and {second}")]
    SymbolCollision {
        file: String,
        symbol: String,
        first: String,
        second: String,
    },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("{}", join_errors(.0))]
    Multiple(Vec<GeneratorError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Fold the errors collected by a stage into a single error
    ///
    /// Returns `None` when nothing was collected and the error itself when
    /// only one was.
    pub fn collect(mut errors: Vec<GeneratorError>) -> Option<GeneratorError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(GeneratorError::Multiple(errors)),
        }
    }

    /// Flatten into the individual errors (a single error yields itself)
    pub fn into_errors(self) -> Vec<GeneratorError> {
        match self {
            GeneratorError::Multiple(errors) => errors
                .into_iter()
                .flat_map(GeneratorError::into_errors)
                .collect(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[GeneratorError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Finish a stage: return `value` unless errors were collected
pub fn finish<T>(value: T, errors: Vec<GeneratorError>) -> Result<T> {
    match GeneratorError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}
