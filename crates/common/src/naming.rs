//! Go naming conventions
//!
//! Mirrors the identifiers protoc-gen-go derives, so generated bindings
//! refer to the same types and fields as the `.pb.go` files they sit next to.

use std::collections::HashMap;

/// Go keywords that cannot be used as package names
const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Convert a proto name to the CamelCase identifier protoc-gen-go uses
///
/// # Examples
/// ```
/// use protoc_gen_go_hz_common::naming::go_camel_case;
///
/// assert_eq!(go_camel_case("user_id"), "UserId");
/// assert_eq!(go_camel_case("Outer.Inner"), "Outer_Inner");
/// assert_eq!(go_camel_case("_private"), "XPrivate");
/// ```
pub fn go_camel_case(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let next_is_lower = i + 1 < bytes.len() && bytes[i + 1].is_ascii_lowercase();

        if c == b'.' && next_is_lower {
            // ".x" joins without a separator
        } else if c == b'.' {
            out.push('_');
        } else if c == b'_' && (i == 0 || bytes[i - 1] == b'.') {
            out.push('X');
        } else if c == b'_' && next_is_lower {
            // "_x" capitalizes the next letter
        } else if c.is_ascii_digit() {
            out.push(c as char);
        } else {
            out.push(c.to_ascii_uppercase() as char);
            while i + 1 < bytes.len() && bytes[i + 1].is_ascii_lowercase() {
                i += 1;
                out.push(bytes[i] as char);
            }
        }
        i += 1;
    }

    out
}

/// Methods protoc-gen-go generates on every message struct
const GENERATED_METHODS: &[&str] = &[
    "Reset",
    "String",
    "ProtoMessage",
    "Marshal",
    "Unmarshal",
    "ExtensionRangeArray",
    "ExtensionMap",
    "Descriptor",
];

/// Go struct field names within one message, assigned in declaration order
///
/// A name that clashes with a generated method, an earlier field or an
/// earlier getter gets `_` appended until it is free, exactly as
/// protoc-gen-go does.
///
/// # Examples
/// ```
/// use protoc_gen_go_hz_common::naming::GoFieldNames;
///
/// let mut names = GoFieldNames::default();
/// assert_eq!(names.field("descriptor"), "Descriptor_");
/// assert_eq!(names.field("name"), "Name");
/// assert_eq!(names.field("get_name"), "GetName_");
/// ```
#[derive(Debug, Clone)]
pub struct GoFieldNames {
    /// Name to whether it is taken
    used: HashMap<String, bool>,
}

impl Default for GoFieldNames {
    fn default() -> Self {
        Self {
            used: GENERATED_METHODS
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
        }
    }
}

impl GoFieldNames {
    /// Reserve the name of a field, which also claims its `Get` accessor
    pub fn field(&mut self, proto_name: &str) -> String {
        self.reserve(go_camel_case(proto_name), true)
    }

    /// Reserve the name of a oneof, claimed when its first member is seen
    pub fn oneof(&mut self, proto_name: &str) -> String {
        self.reserve(go_camel_case(proto_name), false)
    }

    fn reserve(&mut self, mut name: String, has_getter: bool) -> String {
        while self.taken(&name) || (has_getter && self.taken(&format!("Get{}", name))) {
            name.push('_');
        }
        self.used.insert(name.clone(), true);
        // Oneofs release the getter slot, matching protoc-gen-go
        self.used.insert(format!("Get{}", name), has_getter);
        name
    }

    fn taken(&self, name: &str) -> bool {
        self.used.get(name).copied().unwrap_or(false)
    }
}

/// Turn an arbitrary string into a valid Go package identifier
///
/// Invalid characters become `_`, a leading digit gets a `_` prefix and
/// keywords get a `_` suffix.
pub fn go_sanitized(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() {
        return "_".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if GO_KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Default package name for an import path: its sanitized last element
///
/// A trailing major-version element such as `v2` is kept as is, matching
/// protoc-gen-go.
pub fn go_package_name_for_import(import_path: &str) -> String {
    let base = import_path
        .rsplit('/')
        .find(|part| !part.is_empty())
        .unwrap_or(import_path);
    go_sanitized(base)
}

/// Strip the `.proto` extension from a file name
pub fn trim_proto_extension(file_name: &str) -> &str {
    file_name.strip_suffix(".proto").unwrap_or(file_name)
}
