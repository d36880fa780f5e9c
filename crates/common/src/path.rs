//! Path template parsing
//!
//! Accepts both the `{name}` style used by `google.api.http` and the
//! `:name` / `*name` style used by Hertz. Parameters always occupy a whole
//! segment.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons a path template is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template must start with '/'")]
    NotAbsolute,

    #[error("unbalanced braces")]
    UnbalancedBraces,

    #[error("empty path segment")]
    EmptySegment,

    #[error("empty parameter name")]
    EmptyName,

    #[error("invalid parameter name `{0}`")]
    InvalidName(String),

    #[error("nested field path `{0}` is not supported")]
    NestedField(String),

    #[error("segment `{0}` mixes literal text and a parameter")]
    MixedSegment(String),

    #[error("unsupported variable pattern `{0}`")]
    UnsupportedPattern(String),

    #[error("catch-all parameter `{0}` must be the last segment")]
    CatchAllNotLast(String),

    #[error("duplicate parameter name `{0}`")]
    DuplicateParam(String),
}

/// One `/`-separated piece of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Literal(String),
    Param(String),
    /// Matches the rest of the path
    CatchAll(String),
}

/// A parsed path template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let rest = raw.strip_prefix('/').ok_or(TemplateError::NotAbsolute)?;
        check_braces(raw)?;

        let mut pieces = split_segments(rest);
        let trailing_slash = pieces.len() > 1 && pieces.last() == Some(&"");
        if trailing_slash {
            pieces.pop();
        }

        let mut segments = Vec::with_capacity(pieces.len());
        for piece in pieces {
            segments.push(parse_segment(piece)?);
        }

        let mut seen = HashSet::new();
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Literal(_) => {}
                Segment::CatchAll(name) if i + 1 != segments.len() => {
                    return Err(TemplateError::CatchAllNotLast(name.clone()));
                }
                Segment::Param(name) | Segment::CatchAll(name) => {
                    if !seen.insert(name.as_str()) {
                        return Err(TemplateError::DuplicateParam(name.clone()));
                    }
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            trailing_slash,
        })
    }

    /// The template exactly as annotated
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in template order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Route shape with parameter names erased, used for conflict detection
    ///
    /// `/users/{id}` and `/users/:uid/` both normalize to `/users/:`.
    pub fn normalized(&self) -> String {
        self.join(|s| match s {
            Segment::Literal(lit) => lit.clone(),
            Segment::Param(_) => ":".to_string(),
            Segment::CatchAll(_) => "*".to_string(),
        })
    }

    /// Path in Hertz router syntax (`/users/:id`, `/files/*path`)
    pub fn hertz_path(&self) -> String {
        let mut path = self.join(|s| match s {
            Segment::Literal(lit) => lit.clone(),
            Segment::Param(name) => format!(":{}", name),
            Segment::CatchAll(name) => format!("*{}", name),
        });
        if self.trailing_slash {
            path.push('/');
        }
        path
    }

    fn join(&self, render: impl Fn(&Segment) -> String) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|s| format!("/{}", render(s)))
            .collect()
    }
}

fn check_braces(raw: &str) -> Result<(), TemplateError> {
    let mut open = false;
    for ch in raw.chars() {
        match ch {
            '{' if open => return Err(TemplateError::UnbalancedBraces),
            '{' => open = true,
            '}' if !open => return Err(TemplateError::UnbalancedBraces),
            '}' => open = false,
            _ => {}
        }
    }
    if open {
        return Err(TemplateError::UnbalancedBraces);
    }
    Ok(())
}

/// Split on `/` outside of braces (`{name=a/*}` stays one piece)
fn split_segments(rest: &str) -> Vec<&str> {
    if rest.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_braces = false;
    for (i, ch) in rest.char_indices() {
        match ch {
            '{' => in_braces = true,
            '}' => in_braces = false,
            '/' if !in_braces => {
                pieces.push(&rest[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&rest[start..]);
    pieces
}

fn parse_segment(piece: &str) -> Result<Segment, TemplateError> {
    if piece.is_empty() {
        return Err(TemplateError::EmptySegment);
    }

    if let Some(inner) = piece.strip_prefix('{') {
        let inner = inner
            .strip_suffix('}')
            .ok_or_else(|| TemplateError::MixedSegment(piece.to_string()))?;
        return match inner.split_once('=') {
            None => Ok(Segment::Param(param_name(inner)?)),
            Some((name, "*")) => Ok(Segment::Param(param_name(name)?)),
            Some((name, "**")) => Ok(Segment::CatchAll(param_name(name)?)),
            Some((_, pattern)) => Err(TemplateError::UnsupportedPattern(pattern.to_string())),
        };
    }

    if piece.contains('{') || piece.contains('}') {
        return Err(TemplateError::MixedSegment(piece.to_string()));
    }

    if let Some(name) = piece.strip_prefix(':') {
        return Ok(Segment::Param(param_name(name)?));
    }
    if let Some(name) = piece.strip_prefix('*') {
        return Ok(Segment::CatchAll(param_name(name)?));
    }

    Ok(Segment::Literal(piece.to_string()))
}

fn param_name(name: &str) -> Result<String, TemplateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyName);
    }
    if name.contains('.') {
        return Err(TemplateError::NestedField(name.to_string()));
    }

    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(TemplateError::InvalidName(name.to_string()));
    }

    Ok(name.to_string())
}
