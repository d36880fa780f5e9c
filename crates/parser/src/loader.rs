//! Descriptor loading
//!
//! Turns the file descriptors of a compiler request into a [`ProtoIndex`]:
//! every message and enum gets a stable id, every type reference is resolved
//! to an id, and the HTTP options are decoded into closed annotation types.
//! The loader is the only writer of the index.

use crate::descriptor::{
    self, CodeGeneratorRequest, DescriptorProto, EnumDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, MethodOptions,
};
use protoc_gen_go_hz_common::naming::{
    go_camel_case, go_package_name_for_import, go_sanitized, trim_proto_extension, GoFieldNames,
};
use protoc_gen_go_hz_common::{
    finish, EnumId, EnumType, Field, FieldAnnotation, FieldKind, FileId, GeneratorError,
    GoPackage, HttpAnnotation, HttpVerb, Message, MessageId, Method, PluginOptions, ProtoFile,
    ProtoIndex, Result, ScalarKind, Service,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Builds the descriptor arena for one request
pub struct DescriptorLoader<'a> {
    options: &'a PluginOptions,
}

/// A message registered in the first pass, fields still unresolved
struct PendingMessage<'r> {
    id: MessageId,
    file: FileId,
    scope: String,
    /// Byte length of the `pkg.` prefix of `scope`
    package_len: usize,
    proto3: bool,
    descriptor: &'r DescriptorProto,
}

impl<'a> DescriptorLoader<'a> {
    pub fn new(options: &'a PluginOptions) -> Self {
        Self { options }
    }

    /// Load every file of the request
    ///
    /// Fails with [`GeneratorError::UnresolvedType`] for each type reference
    /// that names nothing in the request, and with [`GeneratorError::Decode`]
    /// for duplicate types, malformed options or requested files that were
    /// not supplied.
    pub fn load(&self, request: &CodeGeneratorRequest) -> Result<ProtoIndex> {
        let mut errors = Vec::new();

        // Pass 1: assign ids to every message and enum
        let mut pending = Vec::new();
        let mut enums = Vec::new();
        let mut message_ids: HashMap<String, MessageId> = HashMap::new();
        let mut enum_ids: HashMap<String, EnumId> = HashMap::new();
        let mut map_entries: HashSet<MessageId> = HashSet::new();
        let mut top_level: Vec<(Vec<MessageId>, Vec<EnumId>)> = Vec::new();

        for (i, file) in request.proto_file.iter().enumerate() {
            let file_id = FileId(i);
            let package = file.package.clone().unwrap_or_default();
            let proto3 = file.syntax.as_deref() == Some("proto3");
            let mut registry = Registry {
                file: file_id,
                package: &package,
                proto3,
                pending: &mut pending,
                enums: &mut enums,
                message_ids: &mut message_ids,
                enum_ids: &mut enum_ids,
                map_entries: &mut map_entries,
                errors: &mut errors,
            };

            let messages = file
                .message_type
                .iter()
                .map(|m| registry.register_message(&package, m))
                .collect();
            let file_enums = file
                .enum_type
                .iter()
                .map(|e| registry.register_enum(&package, e))
                .collect();
            top_level.push((messages, file_enums));
        }

        // Pass 2: resolve field types
        let resolver = TypeResolver {
            message_ids: &message_ids,
            enum_ids: &enum_ids,
            map_entries: &map_entries,
        };
        let mut messages = Vec::with_capacity(pending.len());
        for entry in &pending {
            messages.push(resolver.build_message(entry, &mut errors));
        }

        // Pass 3: files and services
        let requested: HashSet<&str> = request
            .file_to_generate
            .iter()
            .map(String::as_str)
            .collect();
        let mut files = Vec::with_capacity(request.proto_file.len());
        for (i, (file, (file_messages, file_enums))) in
            request.proto_file.iter().zip(top_level).enumerate()
        {
            let name = file.name.clone().unwrap_or_default();
            let generate = requested.contains(name.as_str());
            let comments = CommentIndex::new(file);
            let services = file
                .service
                .iter()
                .enumerate()
                .map(|(s, service)| {
                    resolver.build_service(file, FileId(i), s, service, &comments, &mut errors)
                })
                .collect();

            files.push(ProtoFile {
                go_package: self.go_package(file, &name),
                name,
                package: file.package.clone().unwrap_or_default(),
                dependencies: file.dependency.clone(),
                generate,
                messages: file_messages,
                enums: file_enums,
                services,
            });
        }

        for name in &request.file_to_generate {
            if !files.iter().any(|f| &f.name == name) {
                errors.push(GeneratorError::Decode(format!(
                    "requested file {} is missing from the descriptor set",
                    name
                )));
            }
        }

        debug!(
            files = files.len(),
            messages = messages.len(),
            enums = enums.len(),
            errors = errors.len(),
            "loaded descriptors"
        );

        finish(ProtoIndex::from_parts(files, messages, enums), errors)
    }

    /// Resolve the Go package of a file
    ///
    /// Precedence: `M<file>=` option, `go_package` file option, then a
    /// fallback derived from the proto package and file location.
    fn go_package(&self, file: &FileDescriptorProto, name: &str) -> GoPackage {
        let declared = self.options.import_override(name).or_else(|| {
            file.options
                .as_ref()
                .and_then(|o| o.go_package.as_deref())
                .filter(|p| !p.is_empty())
        });

        if let Some(raw) = declared {
            return match raw.split_once(';') {
                Some((import_path, package)) => GoPackage {
                    import_path: import_path.to_string(),
                    name: go_sanitized(package),
                },
                None => GoPackage {
                    import_path: raw.to_string(),
                    name: go_package_name_for_import(raw),
                },
            };
        }

        let import_path = match name.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        };
        let package = file.package.as_deref().unwrap_or_default();
        let package_name = if package.is_empty() {
            let stem = trim_proto_extension(name);
            go_sanitized(stem.rsplit('/').next().unwrap_or(stem))
        } else {
            go_sanitized(&package.replace('.', "_"))
        };
        debug!(file = name, package = %package_name, "no go_package declared, using fallback");

        GoPackage {
            import_path,
            name: package_name,
        }
    }
}

/// Pass-1 bookkeeping for one file
struct Registry<'r, 'p> {
    file: FileId,
    package: &'p str,
    proto3: bool,
    pending: &'p mut Vec<PendingMessage<'r>>,
    enums: &'p mut Vec<EnumType>,
    message_ids: &'p mut HashMap<String, MessageId>,
    enum_ids: &'p mut HashMap<String, EnumId>,
    map_entries: &'p mut HashSet<MessageId>,
    errors: &'p mut Vec<GeneratorError>,
}

impl<'r> Registry<'r, '_> {
    fn register_message(&mut self, scope: &str, message: &'r DescriptorProto) -> MessageId {
        let full_name = qualify(scope, message.name.as_deref().unwrap_or_default());
        let id = MessageId(self.pending.len());
        if self.message_ids.insert(full_name.clone(), id).is_some() {
            self.errors.push(GeneratorError::Decode(format!(
                "type {} is defined more than once",
                full_name
            )));
        }
        let is_map_entry = message
            .options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false);
        if is_map_entry {
            self.map_entries.insert(id);
        }

        self.pending.push(PendingMessage {
            id,
            file: self.file,
            package_len: full_name.len() - relative_name(self.package, &full_name).len(),
            scope: full_name.clone(),
            proto3: self.proto3,
            descriptor: message,
        });

        for nested in &message.nested_type {
            self.register_message(&full_name, nested);
        }
        for nested in &message.enum_type {
            self.register_enum(&full_name, nested);
        }
        id
    }

    fn register_enum(&mut self, scope: &str, descriptor: &EnumDescriptorProto) -> EnumId {
        let name = descriptor.name.clone().unwrap_or_default();
        let full_name = qualify(scope, &name);
        let id = EnumId(self.enums.len());
        if self.enum_ids.insert(full_name.clone(), id).is_some() {
            self.errors.push(GeneratorError::Decode(format!(
                "type {} is defined more than once",
                full_name
            )));
        }

        self.enums.push(EnumType {
            go_name: go_camel_case(relative_name(self.package, &full_name)),
            name,
            full_name,
            file: self.file,
            values: descriptor
                .value
                .iter()
                .map(|v| v.name.clone().unwrap_or_default())
                .collect(),
        });
        id
    }
}

/// Pass-2 lookups over the registered names
struct TypeResolver<'r> {
    message_ids: &'r HashMap<String, MessageId>,
    enum_ids: &'r HashMap<String, EnumId>,
    map_entries: &'r HashSet<MessageId>,
}

enum Resolved {
    Message(MessageId),
    Enum(EnumId),
}

impl TypeResolver<'_> {
    /// Resolve a type name as protoc would, innermost scope first
    ///
    /// protoc always hands plugins fully-qualified names (`.pkg.Msg`); relative
    /// names only appear in hand-built descriptor sets.
    fn resolve(&self, scope: &str, type_name: &str) -> Option<Resolved> {
        if let Some(absolute) = type_name.strip_prefix('.') {
            return self.lookup(absolute);
        }

        let mut scope = scope;
        loop {
            let candidate = qualify(scope, type_name);
            if let Some(found) = self.lookup(&candidate) {
                return Some(found);
            }
            if scope.is_empty() {
                return None;
            }
            scope = scope.rsplit_once('.').map(|(outer, _)| outer).unwrap_or("");
        }
    }

    fn lookup(&self, full_name: &str) -> Option<Resolved> {
        self.message_ids
            .get(full_name)
            .map(|id| Resolved::Message(*id))
            .or_else(|| self.enum_ids.get(full_name).map(|id| Resolved::Enum(*id)))
    }

    fn build_message(&self, entry: &PendingMessage<'_>, errors: &mut Vec<GeneratorError>) -> Message {
        let descriptor = entry.descriptor;
        let mut go_names = GoFieldNames::default();
        let mut named_oneofs = HashSet::new();
        let mut fields = Vec::with_capacity(descriptor.field.len());
        for field in &descriptor.field {
            let go_name = go_names.field(field.name.as_deref().unwrap_or_default());
            // Synthetic oneofs of proto3 `optional` fields take a name too
            if let Some(oneof) = field
                .oneof_index
                .filter(|index| named_oneofs.insert(*index))
                .and_then(|index| usize::try_from(index).ok())
                .and_then(|index| descriptor.oneof_decl.get(index))
            {
                go_names.oneof(oneof.name.as_deref().unwrap_or_default());
            }
            fields.extend(self.build_field(entry, field, go_name, errors));
        }

        Message {
            name: descriptor.name.clone().unwrap_or_default(),
            go_name: go_camel_case(&entry.scope[entry.package_len..]),
            full_name: entry.scope.clone(),
            file: entry.file,
            fields,
            map_entry: self.map_entries.contains(&entry.id),
        }
    }

    fn build_field(
        &self,
        entry: &PendingMessage<'_>,
        field: &FieldDescriptorProto,
        go_name: String,
        errors: &mut Vec<GeneratorError>,
    ) -> Option<Field> {
        let name = field.name.clone().unwrap_or_default();
        let field_path = format!("field {}.{}", entry.scope, name);

        let kind = match self.field_kind(entry, field) {
            Ok(kind) => kind,
            Err(type_name) => {
                errors.push(GeneratorError::UnresolvedType {
                    type_name,
                    referenced_by: field_path,
                });
                return None;
            }
        };

        let annotation = match decode_field_annotation(field.options.as_ref()) {
            Ok(annotation) => annotation,
            Err(reason) => {
                errors.push(GeneratorError::Decode(format!(
                    "invalid HTTP option on {}: {}",
                    field_path, reason
                )));
                None
            }
        };

        let repeated = field.label == Some(descriptor::Label::Repeated as i32);
        let proto3_optional = field.proto3_optional.unwrap_or(false);
        let in_oneof = field.oneof_index.is_some() && !proto3_optional;
        // Mirrors protoc-gen-go: pointer fields for singular scalars and enums
        // with presence, except bytes which stay `[]byte`
        let explicit_presence = !repeated
            && !in_oneof
            && match kind {
                FieldKind::Scalar(scalar) => scalar != ScalarKind::Bytes,
                FieldKind::Enum(_) => true,
                FieldKind::Message(_) | FieldKind::Map(_) => false,
            }
            && (proto3_optional || !entry.proto3);
        let oneof = match field.oneof_index {
            Some(index) if !proto3_optional => usize::try_from(index)
                .ok()
                .and_then(|i| entry.descriptor.oneof_decl.get(i))
                .and_then(|o| o.name.clone()),
            _ => None,
        };

        Some(Field {
            json_name: field
                .json_name
                .clone()
                .unwrap_or_else(|| json_name(&name)),
            name,
            go_name,
            number: field.number.unwrap_or_default(),
            kind,
            repeated,
            explicit_presence,
            oneof,
            annotation,
        })
    }

    /// Field kind, or the unresolvable type name
    fn field_kind(
        &self,
        entry: &PendingMessage<'_>,
        field: &FieldDescriptorProto,
    ) -> std::result::Result<FieldKind, String> {
        use descriptor::Type;

        let declared = field.r#type.and_then(|t| Type::try_from(t).ok());
        let scalar = match declared {
            Some(Type::Double) => Some(ScalarKind::Double),
            Some(Type::Float) => Some(ScalarKind::Float),
            Some(Type::Int64) => Some(ScalarKind::Int64),
            Some(Type::Uint64) => Some(ScalarKind::Uint64),
            Some(Type::Int32) => Some(ScalarKind::Int32),
            Some(Type::Fixed64) => Some(ScalarKind::Fixed64),
            Some(Type::Fixed32) => Some(ScalarKind::Fixed32),
            Some(Type::Bool) => Some(ScalarKind::Bool),
            Some(Type::String) => Some(ScalarKind::String),
            Some(Type::Bytes) => Some(ScalarKind::Bytes),
            Some(Type::Uint32) => Some(ScalarKind::Uint32),
            Some(Type::Sfixed32) => Some(ScalarKind::Sfixed32),
            Some(Type::Sfixed64) => Some(ScalarKind::Sfixed64),
            Some(Type::Sint32) => Some(ScalarKind::Sint32),
            Some(Type::Sint64) => Some(ScalarKind::Sint64),
            Some(Type::Message | Type::Group | Type::Enum) | None => None,
        };
        if let Some(scalar) = scalar {
            return Ok(FieldKind::Scalar(scalar));
        }

        let type_name = field.type_name.clone().unwrap_or_default();
        match (declared, self.resolve(&entry.scope, &type_name)) {
            (Some(Type::Enum) | None, Some(Resolved::Enum(id))) => Ok(FieldKind::Enum(id)),
            (Some(Type::Message | Type::Group) | None, Some(Resolved::Message(id))) => {
                if self.map_entries.contains(&id) {
                    Ok(FieldKind::Map(id))
                } else {
                    Ok(FieldKind::Message(id))
                }
            }
            _ => Err(type_name),
        }
    }

    fn build_service(
        &self,
        file: &FileDescriptorProto,
        file_id: FileId,
        position: usize,
        service: &descriptor::ServiceDescriptorProto,
        comments: &CommentIndex,
        errors: &mut Vec<GeneratorError>,
    ) -> Service {
        let package = file.package.as_deref().unwrap_or_default();
        let name = service.name.clone().unwrap_or_default();
        let full_name = qualify(package, &name);
        let service_path = [descriptor::FILE_SERVICE_FIELD, position as i32];

        let methods = service
            .method
            .iter()
            .enumerate()
            .filter_map(|(m, method)| {
                let path = [
                    service_path[0],
                    service_path[1],
                    descriptor::SERVICE_METHOD_FIELD,
                    m as i32,
                ];
                self.build_method(&full_name, method, comments.leading(&path), errors)
            })
            .collect();

        Service {
            comments: comments.leading(&service_path),
            name,
            full_name,
            file: file_id,
            methods,
        }
    }

    fn build_method(
        &self,
        service: &str,
        method: &MethodDescriptorProto,
        comments: Option<String>,
        errors: &mut Vec<GeneratorError>,
    ) -> Option<Method> {
        let name = method.name.clone().unwrap_or_default();
        let referenced_by = format!("method {}.{}", service, name);

        let mut endpoint = |type_name: &Option<String>| {
            let type_name = type_name.clone().unwrap_or_default();
            match self.resolve(service, &type_name) {
                Some(Resolved::Message(id)) => Some(id),
                _ => {
                    errors.push(GeneratorError::UnresolvedType {
                        type_name,
                        referenced_by: referenced_by.clone(),
                    });
                    None
                }
            }
        };
        let input = endpoint(&method.input_type);
        let output = endpoint(&method.output_type);

        let annotation = match decode_method_annotation(method.options.as_ref()) {
            Ok(annotation) => annotation,
            Err(reason) => {
                errors.push(GeneratorError::Decode(format!(
                    "invalid HTTP option on {}: {}",
                    referenced_by, reason
                )));
                None
            }
        };

        Some(Method {
            name,
            input: input?,
            output: output?,
            client_streaming: method.client_streaming.unwrap_or(false),
            server_streaming: method.server_streaming.unwrap_or(false),
            comments,
            annotation,
        })
    }
}

/// Decode the method options into at most one annotation
fn decode_method_annotation(
    options: Option<&MethodOptions>,
) -> std::result::Result<Option<HttpAnnotation>, String> {
    let Some(options) = options else {
        return Ok(None);
    };

    let hertz: Vec<(HttpVerb, &String)> = [
        (HttpVerb::Get, &options.get),
        (HttpVerb::Post, &options.post),
        (HttpVerb::Put, &options.put),
        (HttpVerb::Delete, &options.delete),
        (HttpVerb::Patch, &options.patch),
        (HttpVerb::Options, &options.options),
        (HttpVerb::Head, &options.head),
        (HttpVerb::Any, &options.any),
    ]
    .into_iter()
    .filter_map(|(verb, path)| path.as_ref().map(|p| (verb, p)))
    .collect();

    let declared = hertz.len() + usize::from(options.http.is_some());
    if declared > 1 {
        return Err(format!(
            "{} HTTP annotations declared, at most one is allowed",
            declared
        ));
    }

    if let Some((verb, path)) = hertz.into_iter().next() {
        let path = non_empty_path(path)?;
        return Ok(Some(HttpAnnotation::Hertz { verb, path }));
    }

    let Some(rule) = options.http.as_ref() else {
        return Ok(None);
    };
    if !rule.additional_bindings.is_empty() {
        return Err("additional_bindings are not supported".to_string());
    }

    use descriptor::http_rule::Pattern;
    let (verb, path) = match rule.pattern.as_ref() {
        Some(Pattern::Get(path)) => (HttpVerb::Get, path),
        Some(Pattern::Put(path)) => (HttpVerb::Put, path),
        Some(Pattern::Post(path)) => (HttpVerb::Post, path),
        Some(Pattern::Delete(path)) => (HttpVerb::Delete, path),
        Some(Pattern::Patch(path)) => (HttpVerb::Patch, path),
        Some(Pattern::Custom(custom)) => {
            let kind = custom.kind.trim().to_ascii_uppercase();
            if kind.is_empty() {
                return Err("custom pattern has an empty kind".to_string());
            }
            (HttpVerb::Custom(kind), &custom.path)
        }
        None => return Err("google.api.http rule has no pattern".to_string()),
    };

    let selector = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    Ok(Some(HttpAnnotation::Google {
        verb,
        path: non_empty_path(path)?,
        body: selector(&rule.body),
        response_body: selector(&rule.response_body),
    }))
}

fn non_empty_path(path: &str) -> std::result::Result<String, String> {
    let path = path.trim();
    if path.is_empty() {
        return Err("empty path".to_string());
    }
    Ok(path.to_string())
}

/// Decode the field options into at most one source
fn decode_field_annotation(
    options: Option<&descriptor::FieldOptions>,
) -> std::result::Result<Option<FieldAnnotation>, String> {
    let Some(options) = options else {
        return Ok(None);
    };

    let mut declared: Vec<FieldAnnotation> = Vec::new();
    if let Some(name) = &options.path {
        declared.push(FieldAnnotation::Path(name.trim().to_string()));
    }
    if let Some(name) = &options.query {
        declared.push(FieldAnnotation::Query(name.trim().to_string()));
    }
    if let Some(name) = &options.header {
        declared.push(FieldAnnotation::Header(name.trim().to_string()));
    }
    if let Some(name) = &options.body {
        declared.push(FieldAnnotation::Body(name.trim().to_string()));
    }

    if declared.len() > 1 {
        return Err(format!(
            "{} HTTP sources declared, at most one is allowed",
            declared.len()
        ));
    }
    match declared.pop() {
        Some(
            FieldAnnotation::Path(name) | FieldAnnotation::Query(name) | FieldAnnotation::Header(name),
        ) if name.is_empty() => Err("empty parameter name".to_string()),
        other => Ok(other),
    }
}

/// Leading comments keyed by `SourceCodeInfo` location path
struct CommentIndex {
    leading: HashMap<Vec<i32>, String>,
}

impl CommentIndex {
    fn new(file: &FileDescriptorProto) -> Self {
        let leading = file
            .source_code_info
            .iter()
            .flat_map(|info| info.location.iter())
            .filter_map(|location| {
                let text = clean_comment(location.leading_comments.as_deref()?)?;
                Some((location.path.clone(), text))
            })
            .collect();
        Self { leading }
    }

    fn leading(&self, path: &[i32]) -> Option<String> {
        self.leading.get(path).cloned()
    }
}

/// Strip the single space protoc keeps after `//` and surrounding blank lines
fn clean_comment(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| line.strip_prefix(' ').unwrap_or(line).trim_end())
        .collect();
    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;
    Some(lines[start..=end].join("\n"))
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn relative_name<'n>(package: &str, full_name: &'n str) -> &'n str {
    if package.is_empty() {
        return full_name;
    }
    full_name
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name)
}

/// protoc's default JSON name: drop underscores, capitalize what follows
fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{http_rule, FieldOptions, HttpRule};

    #[test]
    fn test_decode_hertz_annotation() {
        let options = MethodOptions {
            get: Some(" /users/:id ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            decode_method_annotation(Some(&options)).unwrap(),
            Some(HttpAnnotation::Hertz {
                verb: HttpVerb::Get,
                path: "/users/:id".to_string()
            })
        );
        assert_eq!(decode_method_annotation(None).unwrap(), None);
        assert_eq!(
            decode_method_annotation(Some(&MethodOptions::default())).unwrap(),
            None
        );
    }

    #[test]
    fn test_decode_google_annotation() {
        let options = MethodOptions {
            http: Some(HttpRule {
                pattern: Some(http_rule::Pattern::Custom(descriptor::CustomHttpPattern {
                    kind: "link".to_string(),
                    path: "/v1/{name}".to_string(),
                })),
                body: "*".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            decode_method_annotation(Some(&options)).unwrap(),
            Some(HttpAnnotation::Google {
                verb: HttpVerb::Custom("LINK".to_string()),
                path: "/v1/{name}".to_string(),
                body: Some("*".to_string()),
                response_body: None,
            })
        );
    }

    #[test]
    fn test_rejects_conflicting_annotations() {
        let options = MethodOptions {
            get: Some("/a".to_string()),
            post: Some("/a".to_string()),
            ..Default::default()
        };
        assert!(decode_method_annotation(Some(&options)).is_err());

        let options = MethodOptions {
            get: Some("/a".to_string()),
            http: Some(HttpRule {
                pattern: Some(http_rule::Pattern::Get("/a".to_string())),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(decode_method_annotation(Some(&options)).is_err());
    }

    #[test]
    fn test_rejects_malformed_google_rules() {
        let no_pattern = MethodOptions {
            http: Some(HttpRule::default()),
            ..Default::default()
        };
        assert!(decode_method_annotation(Some(&no_pattern)).is_err());

        let additional = MethodOptions {
            http: Some(HttpRule {
                pattern: Some(http_rule::Pattern::Get("/a".to_string())),
                additional_bindings: vec![HttpRule {
                    pattern: Some(http_rule::Pattern::Get("/b".to_string())),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(decode_method_annotation(Some(&additional)).is_err());

        let empty = MethodOptions {
            post: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            decode_method_annotation(Some(&empty)),
            Err("empty path".to_string())
        );
    }

    #[test]
    fn test_decode_field_annotation() {
        let options = FieldOptions {
            query: Some("page".to_string()),
            ..Default::default()
        };
        assert_eq!(
            decode_field_annotation(Some(&options)).unwrap(),
            Some(FieldAnnotation::Query("page".to_string()))
        );

        let both = FieldOptions {
            query: Some("page".to_string()),
            header: Some("X-Page".to_string()),
            ..Default::default()
        };
        assert!(decode_field_annotation(Some(&both)).is_err());

        let empty = FieldOptions {
            path: Some(String::new()),
            ..Default::default()
        };
        assert!(decode_field_annotation(Some(&empty)).is_err());
    }

    #[test]
    fn test_clean_comment() {
        assert_eq!(
            clean_comment(" Gets a user.\n Second line.\n"),
            Some("Gets a user.\nSecond line.".to_string())
        );
        assert_eq!(clean_comment("\n \n"), None);
    }

    #[test]
    fn test_json_name() {
        assert_eq!(json_name("page_size"), "pageSize");
        assert_eq!(json_name("id"), "id");
    }

    #[test]
    fn test_relative_name() {
        assert_eq!(relative_name("shop.v1", "shop.v1.Outer.Inner"), "Outer.Inner");
        assert_eq!(relative_name("", "Outer"), "Outer");
    }
}
