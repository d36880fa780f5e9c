//! Code rendering
//!
//! Turns each non-empty [`RouteTable`] into a [`GeneratedUnit`]: the server
//! interface, operation constants, route registration and one handler per
//! route. Rendering depends only on the table, the descriptor index and the
//! plugin options, so identical input renders identical units.

use crate::assemble::output_file_name;
use crate::code::CodeBlock;
use crate::marshal::{self, go_string, Target};
use protoc_gen_go_hz_common::{
    finish, BodyBinding, EnumId, FieldKind, GeneratorError, GoPackage, HttpVerb, MessageId,
    ParamSource, PluginOptions, ProtoIndex, Result, Route, RouteTable,
};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub const CONTEXT_IMPORT: &str = "context";
pub const STRCONV_IMPORT: &str = "strconv";
pub const APP_IMPORT: &str = "github.com/cloudwego/hertz/pkg/app";
pub const ROUTE_IMPORT: &str = "github.com/cloudwego/hertz/pkg/route";
pub const CONSTS_IMPORT: &str = "github.com/cloudwego/hertz/pkg/protocol/consts";
pub const PROTOJSON_IMPORT: &str = "google.golang.org/protobuf/encoding/protojson";

/// Identifiers an import alias must not shadow
const RESERVED: &[&str] = &[
    "context", "strconv", "app", "route", "consts", "protojson", "r", "srv", "ctx", "c", "in",
    "out", "data", "err", "raw", "item", "ok", "v", "n", "i", "body",
];

/// A top-level Go identifier declared by a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// Proto element the symbol was generated for
    pub owner: String,
}

/// Rendered code for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Output path relative to the plugin output directory
    pub file_name: String,
    /// Proto file the service is declared in
    pub source: String,
    pub package: GoPackage,
    /// Import path to explicit alias (`None` for unaliased imports)
    pub imports: BTreeMap<String, Option<String>>,
    pub symbols: Vec<Symbol>,
    pub blocks: Vec<CodeBlock>,
}

/// Renders route tables into Go source units
pub struct CodeRenderer<'a> {
    index: &'a ProtoIndex,
    options: &'a PluginOptions,
    aliases: BTreeMap<String, String>,
}

/// Unit-local state while rendering one table
struct UnitScope<'u> {
    package: &'u GoPackage,
    imports: BTreeMap<String, Option<String>>,
    errors: Vec<GeneratorError>,
}

impl<'a> CodeRenderer<'a> {
    pub fn new(index: &'a ProtoIndex, options: &'a PluginOptions) -> Self {
        Self {
            index,
            options,
            aliases: import_aliases(index),
        }
    }

    /// Render every table, skipping the empty ones
    pub fn render_all(&self, tables: &[RouteTable]) -> Result<Vec<GeneratedUnit>> {
        let mut units = Vec::new();
        let mut errors = Vec::new();

        for table in tables {
            match self.render(table) {
                Ok(Some(unit)) => units.push(unit),
                Ok(None) => {}
                Err(err) => errors.extend(err.into_errors()),
            }
        }
        finish(units, errors)
    }

    /// Render one table; `None` when the service has no routes
    pub fn render(&self, table: &RouteTable) -> Result<Option<GeneratedUnit>> {
        if table.is_empty() {
            debug!(service = %table.full_name, "no HTTP routes, nothing to render");
            return Ok(None);
        }

        let file = self.index.file(table.file);
        let mut scope = UnitScope {
            package: &file.go_package,
            imports: BTreeMap::new(),
            errors: Vec::new(),
        };
        for path in [
            CONTEXT_IMPORT,
            APP_IMPORT,
            ROUTE_IMPORT,
            CONSTS_IMPORT,
            PROTOJSON_IMPORT,
        ] {
            scope.imports.insert(path.to_string(), None);
        }

        let service = &table.service;
        let mut blocks = Vec::new();

        for route in &table.routes {
            blocks.push(CodeBlock::line(format!(
                "const {} = {}",
                operation_const(service, &route.method),
                go_string(&route.operation)
            )));
        }
        blocks.push(CodeBlock::Blank);

        blocks.extend(self.server_interface(table, &mut scope));
        blocks.push(CodeBlock::Blank);
        blocks.extend(register_func(table));

        for route in &table.routes {
            blocks.push(CodeBlock::Blank);
            blocks.push(self.handler(service, route, &mut scope));
        }

        let mut symbols = vec![
            Symbol {
                name: server_interface(service),
                owner: table.full_name.clone(),
            },
            Symbol {
                name: format!("Register{}", server_interface(service)),
                owner: table.full_name.clone(),
            },
        ];
        for route in &table.routes {
            let owner = format!("{}.{}", table.full_name, route.method);
            symbols.push(Symbol {
                name: operation_const(service, &route.method),
                owner: owner.clone(),
            });
            symbols.push(Symbol {
                name: handler_func(service, &route.method),
                owner,
            });
        }

        debug!(
            service = %table.full_name,
            routes = table.routes.len(),
            imports = scope.imports.len(),
            "rendered service"
        );
        let unit = GeneratedUnit {
            file_name: output_file_name(self.options, file),
            source: file.name.clone(),
            package: file.go_package.clone(),
            imports: scope.imports,
            symbols,
            blocks,
        };
        finish(Some(unit), scope.errors)
    }

    fn server_interface(&self, table: &RouteTable, scope: &mut UnitScope<'_>) -> Vec<CodeBlock> {
        let name = server_interface(&table.service);
        let mut doc = format!(
            "{} is the server API for {} served over HTTP.",
            name, table.service
        );
        if let Some(comments) = &table.comments {
            doc.push_str("\n\n");
            doc.push_str(comments);
        }

        let mut methods = Vec::new();
        for route in &table.routes {
            if let Some(comments) = &route.comments {
                methods.push(CodeBlock::comment(comments.clone()));
            }
            methods.push(CodeBlock::line(format!(
                "{}(context.Context, *{}) (*{}, error)",
                route.method,
                self.message_type(route.input, scope),
                self.message_type(route.output, scope)
            )));
        }

        vec![
            CodeBlock::comment(doc),
            CodeBlock::braced(format!("type {} interface", name), methods),
        ]
    }

    fn handler(&self, service: &str, route: &Route, scope: &mut UnitScope<'_>) -> CodeBlock {
        let label = format!("{}.{}", service, route.method);
        let binding = &route.binding;
        let input = self.index.message(route.input);
        let mut body = vec![CodeBlock::line(format!(
            "in := new({})",
            self.message_type(route.input, scope)
        ))];

        match &binding.body {
            BodyBinding::None => {}
            BodyBinding::Message => body.push(decode_body("in", Vec::new())),
            BodyBinding::Field(field_ref) => {
                let field = &input.fields[field_ref.index];
                match field.kind {
                    FieldKind::Message(id) if !field.repeated => {
                        let target = format!("in.{}", field.go_name);
                        let init = CodeBlock::line(format!(
                            "{} = new({})",
                            target,
                            self.message_type(id, scope)
                        ));
                        body.push(decode_body(&target, vec![init]));
                    }
                    _ => scope.errors.push(GeneratorError::UnsupportedBindingType {
                        method: label.clone(),
                        detail: format!("body field `{}` must be a singular message", field.name),
                    }),
                }
            }
        }

        for param in &binding.params {
            let field = &input.fields[param.field.index];
            let problem = if field.oneof.is_some() {
                Some("oneof members cannot be bound")
            } else if field.repeated && param.source != ParamSource::Query {
                Some("repeated fields can only be bound from the query")
            } else {
                None
            };
            let kind = marshal::value_kind(field, || match field.kind {
                FieldKind::Enum(id) => self.enum_type(id, scope),
                _ => String::new(),
            });

            match (problem, kind) {
                (None, Some(kind)) => {
                    if kind.needs_strconv() {
                        scope.imports.insert(STRCONV_IMPORT.to_string(), None);
                    }
                    body.push(marshal::bind(param, &Target { field, kind }));
                }
                (problem, _) => scope.errors.push(GeneratorError::UnsupportedBindingType {
                    method: label.clone(),
                    detail: format!(
                        "{} parameter `{}`: {}",
                        param.source,
                        param.name,
                        problem.unwrap_or("messages and maps cannot be bound")
                    ),
                }),
            }
        }

        body.push(CodeBlock::line(format!("out, err := srv.{}(ctx, in)", route.method)));
        body.push(abort_on_error("err.Error()", "consts.StatusInternalServerError"));

        let response = match &binding.response_body {
            Some(field_ref) => format!(
                "out.Get{}()",
                self.index.message(route.output).fields[field_ref.index].go_name
            ),
            None => "out".to_string(),
        };
        body.push(CodeBlock::line(format!(
            "data, err := protojson.Marshal({})",
            response
        )));
        body.push(abort_on_error("err.Error()", "consts.StatusInternalServerError"));
        body.push(CodeBlock::line(
            "c.Data(consts.StatusOK, \"application/json; charset=utf-8\", data)",
        ));

        CodeBlock::braced(
            format!(
                "func {}(srv {}) app.HandlerFunc",
                handler_func(service, &route.method),
                server_interface(service)
            ),
            vec![CodeBlock::braced(
                "return func(ctx context.Context, c *app.RequestContext)",
                body,
            )],
        )
    }

    /// Go type of a message as seen from the unit's package
    fn message_type(&self, id: MessageId, scope: &mut UnitScope<'_>) -> String {
        let message = self.index.message(id);
        self.qualify(self.index.message_package(id), &message.go_name, scope)
    }

    fn enum_type(&self, id: EnumId, scope: &mut UnitScope<'_>) -> String {
        let enum_type = self.index.enum_type(id);
        self.qualify(self.index.enum_package(id), &enum_type.go_name, scope)
    }

    fn qualify(&self, package: &GoPackage, go_name: &str, scope: &mut UnitScope<'_>) -> String {
        if package.import_path == scope.package.import_path {
            return go_name.to_string();
        }
        let alias = self
            .aliases
            .get(&package.import_path)
            .cloned()
            .unwrap_or_else(|| package.name.clone());
        scope
            .imports
            .insert(package.import_path.clone(), Some(alias.clone()));
        format!("{}.{}", alias, go_name)
    }
}

fn register_func(table: &RouteTable) -> Vec<CodeBlock> {
    let interface = server_interface(&table.service);
    let registrations = table
        .routes
        .iter()
        .map(|route| {
            let path = go_string(&route.binding.template.hertz_path());
            let handler = format!("{}(srv)", handler_func(&table.service, &route.method));
            let line = match route.verb() {
                HttpVerb::Any => format!("r.Any({}, {})", path, handler),
                HttpVerb::Custom(kind) => {
                    format!("r.Handle({}, {}, {})", go_string(kind), path, handler)
                }
                verb => format!("r.{}({}, {})", verb.as_str(), path, handler),
            };
            CodeBlock::line(line)
        })
        .collect();

    vec![
        CodeBlock::comment(format!(
            "Register{0} registers the HTTP routes of {1} on r.",
            interface, table.service
        )),
        CodeBlock::braced(
            format!("func Register{0}(r route.IRoutes, srv {0})", interface),
            registrations,
        ),
    ]
}

/// Decode a non-empty request body into `target`
fn decode_body(target: &str, mut prelude: Vec<CodeBlock>) -> CodeBlock {
    prelude.push(CodeBlock::braced(
        format!(
            "if err := (protojson.UnmarshalOptions{{DiscardUnknown: true}}).Unmarshal(body, {}); err != nil",
            target
        ),
        vec![
            CodeBlock::line(
                "c.AbortWithMsg(\"invalid request body: \"+err.Error(), consts.StatusBadRequest)",
            ),
            CodeBlock::line("return"),
        ],
    ));
    CodeBlock::braced("if body := c.Request.Body(); len(body) > 0", prelude)
}

fn abort_on_error(message: &str, status: &str) -> CodeBlock {
    CodeBlock::braced(
        "if err != nil",
        vec![
            CodeBlock::line(format!("c.AbortWithMsg({}, {})", message, status)),
            CodeBlock::line("return"),
        ],
    )
}

pub fn server_interface(service: &str) -> String {
    format!("{}HTTPServer", service)
}

pub fn operation_const(service: &str, method: &str) -> String {
    format!("Operation{}{}", service, method)
}

pub fn handler_func(service: &str, method: &str) -> String {
    format!("_{}_{}_HTTP_Handler", service, method)
}

/// One alias per Go import path of the request, stable across runs
///
/// The alias is the package name, numbered when it would collide with
/// another package or a name the generated code uses.
fn import_aliases(index: &ProtoIndex) -> BTreeMap<String, String> {
    let mut names: BTreeMap<&str, &str> = BTreeMap::new();
    for file in index.files() {
        names
            .entry(file.go_package.import_path.as_str())
            .or_insert(file.go_package.name.as_str());
    }

    let mut taken: HashSet<String> = RESERVED.iter().map(|s| s.to_string()).collect();
    let mut aliases = BTreeMap::new();
    for (path, name) in names {
        let mut alias = name.to_string();
        let mut n = 1;
        while taken.contains(&alias) {
            alias = format!("{}{}", name, n);
            n += 1;
        }
        taken.insert(alias.clone());
        aliases.insert(path.to_string(), alias);
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc_gen_go_hz_common::{FileId, ProtoFile};

    fn file(name: &str, import_path: &str, package: &str) -> ProtoFile {
        ProtoFile {
            name: name.to_string(),
            package: String::new(),
            dependencies: vec![],
            go_package: GoPackage {
                import_path: import_path.to_string(),
                name: package.to_string(),
            },
            generate: false,
            messages: vec![],
            enums: vec![],
            services: vec![],
        }
    }

    #[test]
    fn test_import_aliases_are_unique() {
        let index = ProtoIndex::from_parts(
            vec![
                file("b.proto", "example.com/b/v1", "v1"),
                file("a.proto", "example.com/a/v1", "v1"),
                file("c.proto", "example.com/c", "context"),
                file("a2.proto", "example.com/a/v1", "other"),
            ],
            vec![],
            vec![],
        );
        let aliases = import_aliases(&index);
        assert_eq!(aliases["example.com/a/v1"], "v1");
        assert_eq!(aliases["example.com/b/v1"], "v11");
        assert_eq!(aliases["example.com/c"], "context1");
        assert_eq!(aliases.len(), 3);
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let index = ProtoIndex::from_parts(vec![file("a.proto", "x", "x")], vec![], vec![]);
        let options = PluginOptions::default();
        let table = RouteTable {
            service: "Empty".to_string(),
            full_name: "Empty".to_string(),
            file: FileId(0),
            comments: None,
            routes: vec![],
        };
        assert_eq!(CodeRenderer::new(&index, &options).render(&table).unwrap(), None);
    }

    #[test]
    fn test_symbol_names() {
        assert_eq!(server_interface("UserService"), "UserServiceHTTPServer");
        assert_eq!(operation_const("UserService", "GetUser"), "OperationUserServiceGetUser");
        assert_eq!(handler_func("UserService", "GetUser"), "_UserService_GetUser_HTTP_Handler");
    }
}
