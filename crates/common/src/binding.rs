//! HTTP annotations and canonical bindings
//!
//! Annotations are the closed set of option payloads the loader understands.
//! The resolver turns an annotation plus the input message into an
//! [`HttpBinding`], which records where every bound input field comes from.

use crate::path::PathTemplate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP request method of a route
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    /// Every method (Hertz `Any`)
    Any,
    /// `google.api.http` custom pattern (e.g., "LINK")
    Custom(String),
}

impl HttpVerb {
    pub fn as_str(&self) -> &str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
            HttpVerb::Any => "ANY",
            HttpVerb::Custom(kind) => kind,
        }
    }

    /// Whether unbound fields travel in the request body by default
    ///
    /// GET, DELETE, HEAD and OPTIONS put them in the query string instead.
    pub fn carries_body(&self) -> bool {
        !matches!(
            self,
            HttpVerb::Get | HttpVerb::Delete | HttpVerb::Head | HttpVerb::Options
        )
    }

    /// Whether two routes with these verbs on the same path collide
    pub fn overlaps(&self, other: &HttpVerb) -> bool {
        matches!(self, HttpVerb::Any) || matches!(other, HttpVerb::Any) || self == other
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded method annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpAnnotation {
    /// Hertz `api.proto` verb option, e.g. `option (api.get) = "/users/:id";`
    Hertz { verb: HttpVerb, path: String },
    /// `option (google.api.http) = { ... };`
    Google {
        verb: HttpVerb,
        path: String,
        /// `"*"` for the whole message, a field name, or `None`
        body: Option<String>,
        response_body: Option<String>,
    },
}

impl HttpAnnotation {
    pub fn verb(&self) -> &HttpVerb {
        match self {
            HttpAnnotation::Hertz { verb, .. } | HttpAnnotation::Google { verb, .. } => verb,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            HttpAnnotation::Hertz { path, .. } | HttpAnnotation::Google { path, .. } => path,
        }
    }
}

/// Decoded field annotation (Hertz `api.proto` field options)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldAnnotation {
    Path(String),
    Query(String),
    Header(String),
    /// The field is the request body
    Body(String),
}

/// Where a bound field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    Path,
    Query,
    Header,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamSource::Path => "path",
            ParamSource::Query => "query",
            ParamSource::Header => "header",
        })
    }
}

/// Reference to a field of a route's input or output message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    /// Position in `Message::fields`
    pub index: usize,
    pub name: String,
}

/// One input field bound to a path, query or header parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub field: FieldRef,
    pub source: ParamSource,
    /// Parameter, query key or header name
    pub name: String,
    /// Declared by an annotation rather than inferred
    pub explicit: bool,
}

/// What the request body decodes into
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyBinding {
    #[default]
    None,
    /// The whole input message
    Message,
    /// A single message-typed field
    Field(FieldRef),
}

/// Canonical HTTP binding of a method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpBinding {
    pub verb: HttpVerb,
    pub template: PathTemplate,
    /// Path parameters first (template order), then query and header bindings
    /// in field declaration order
    pub params: Vec<FieldBinding>,
    pub body: BodyBinding,
    /// Serialize only this output field instead of the whole response
    pub response_body: Option<FieldRef>,
}

impl HttpBinding {
    pub fn bindings_from(&self, source: ParamSource) -> impl Iterator<Item = &FieldBinding> {
        self.params.iter().filter(move |b| b.source == source)
    }

    /// Binding for a template parameter
    pub fn path_binding(&self, param: &str) -> Option<&FieldBinding> {
        self.bindings_from(ParamSource::Path)
            .find(|b| b.name == param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_defaults() {
        assert!(!HttpVerb::Get.carries_body());
        assert!(!HttpVerb::Delete.carries_body());
        assert!(HttpVerb::Post.carries_body());
        assert!(HttpVerb::Custom("LINK".into()).carries_body());
        assert_eq!(HttpVerb::Custom("LINK".into()).to_string(), "LINK");
    }

    #[test]
    fn test_verb_overlap() {
        assert!(HttpVerb::Get.overlaps(&HttpVerb::Get));
        assert!(!HttpVerb::Get.overlaps(&HttpVerb::Post));
        assert!(HttpVerb::Any.overlaps(&HttpVerb::Delete));
        assert!(HttpVerb::Put.overlaps(&HttpVerb::Any));
    }
}
