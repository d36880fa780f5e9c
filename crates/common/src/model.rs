//! Descriptor arena
//!
//! The loader builds one [`ProtoIndex`] per request. Messages and enums live
//! in flat arenas addressed by [`MessageId`] / [`EnumId`], so cross-file and
//! self-referential types never need owning pointers. After construction the
//! index is only handed out as `&ProtoIndex`.

use crate::binding::{FieldAnnotation, HttpAnnotation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position of a file in [`ProtoIndex::files`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub usize);

/// Position of a message in the message arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub usize);

/// Position of an enum in the enum arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumId(pub usize);

/// Go package a proto file is generated into
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoPackage {
    /// Import path (e.g., "example.com/api/user/v1")
    pub import_path: String,
    /// Package clause name (e.g., "userv1")
    pub name: String,
}

/// One compiled `.proto` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Path as given to protoc (e.g., "user/v1/user.proto")
    pub name: String,
    /// Proto package (e.g., "user.v1"), empty when undeclared
    pub package: String,
    pub dependencies: Vec<String>,
    pub go_package: GoPackage,
    /// True when protoc asked for this file to be generated
    pub generate: bool,
    /// Top-level messages in declaration order
    pub messages: Vec<MessageId>,
    /// Top-level enums in declaration order
    pub enums: Vec<EnumId>,
    pub services: Vec<Service>,
}

/// A gRPC service and its methods in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Fully-qualified name without the leading dot (e.g., "user.v1.UserService")
    pub full_name: String,
    pub file: FileId,
    pub comments: Option<String>,
    pub methods: Vec<Method>,
}

/// A remote procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub input: MessageId,
    pub output: MessageId,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub comments: Option<String>,
    /// Decoded HTTP annotation, `None` for methods that stay gRPC-only
    pub annotation: Option<HttpAnnotation>,
}

impl Method {
    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }
}

/// A message type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Short name (e.g., "Inner")
    pub name: String,
    /// Fully-qualified name without the leading dot (e.g., "pkg.Outer.Inner")
    pub full_name: String,
    pub file: FileId,
    /// Go identifier generated by protoc-gen-go (e.g., "Outer_Inner")
    pub go_name: String,
    pub fields: Vec<Field>,
    /// Synthetic `map<K, V>` entry message
    pub map_entry: bool,
}

impl Message {
    /// Find a field by its proto name
    pub fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

/// A message field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Struct field name in the protoc-gen-go output, e.g. `UserId`
    pub go_name: String,
    pub number: i32,
    pub json_name: String,
    pub kind: FieldKind,
    pub repeated: bool,
    /// Proto2 `optional` scalars and proto3 `optional` fields (Go pointers)
    pub explicit_presence: bool,
    /// Name of the real (non-synthetic) oneof this field belongs to
    pub oneof: Option<String>,
    pub annotation: Option<FieldAnnotation>,
}

impl Field {
    /// Scalar or enum, singular or repeated
    pub fn is_scalar_like(&self) -> bool {
        matches!(self.kind, FieldKind::Scalar(_) | FieldKind::Enum(_))
    }

    /// Singular scalar or enum outside of a oneof
    pub fn is_plain_scalar(&self) -> bool {
        self.is_scalar_like() && !self.repeated && self.oneof.is_none()
    }
}

/// Resolved type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(EnumId),
    Message(MessageId),
    /// `map<K, V>`, pointing at the synthetic entry message
    Map(MessageId),
}

/// Protobuf scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl ScalarKind {
    /// Name as written in a `.proto` file
    pub fn proto_name(self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Int32 => "int32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
        }
    }
}

/// An enum type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub full_name: String,
    pub file: FileId,
    pub go_name: String,
    pub values: Vec<String>,
}

/// Read-only index over every file in a request
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProtoIndex {
    files: Vec<ProtoFile>,
    messages: Vec<Message>,
    enums: Vec<EnumType>,
    #[serde(skip)]
    message_names: HashMap<String, MessageId>,
    #[serde(skip)]
    enum_names: HashMap<String, EnumId>,
}

impl ProtoIndex {
    /// Freeze the arenas built by the loader
    ///
    /// Ids stored in `files` must point into `messages` / `enums`.
    pub fn from_parts(files: Vec<ProtoFile>, messages: Vec<Message>, enums: Vec<EnumType>) -> Self {
        let message_names = messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m.full_name.clone(), MessageId(i)))
            .collect();
        let enum_names = enums
            .iter()
            .enumerate()
            .map(|(i, e)| (e.full_name.clone(), EnumId(i)))
            .collect();

        Self {
            files,
            messages,
            enums,
            message_names,
            enum_names,
        }
    }

    pub fn files(&self) -> &[ProtoFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> &ProtoFile {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.0]
    }

    pub fn enum_type(&self, id: EnumId) -> &EnumType {
        &self.enums[id.0]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message by fully-qualified name (leading dot optional)
    pub fn find_message(&self, full_name: &str) -> Option<MessageId> {
        self.message_names
            .get(full_name.trim_start_matches('.'))
            .copied()
    }

    /// Look up an enum by fully-qualified name (leading dot optional)
    pub fn find_enum(&self, full_name: &str) -> Option<EnumId> {
        self.enum_names.get(full_name.trim_start_matches('.')).copied()
    }

    /// Files protoc asked to generate, in request order
    pub fn files_to_generate(&self) -> impl Iterator<Item = (FileId, &ProtoFile)> {
        self.files
            .iter()
            .enumerate()
            .filter(|(_, f)| f.generate)
            .map(|(i, f)| (FileId(i), f))
    }

    /// Go package of the file declaring a message
    pub fn message_package(&self, id: MessageId) -> &GoPackage {
        &self.file(self.message(id).file).go_package
    }

    /// Go package of the file declaring an enum
    pub fn enum_package(&self, id: EnumId) -> &GoPackage {
        &self.file(self.enum_type(id).file).go_package
    }
}
