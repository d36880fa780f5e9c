//! End-to-end rendering tests: descriptors in, Go files out

use prost::Message;
use protoc_gen_go_hz_common::{GeneratorError, Result};
use protoc_gen_go_hz_generator::{generate, HertzGenerator, OutputFile, GENERATOR_VERSION};
use protoc_gen_go_hz_parser::descriptor::{
    http_rule, source_code_info, CodeGeneratorRequest, DescriptorProto, EnumDescriptorProto,
    CustomHttpPattern, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileOptions, HttpRule, Label, MethodDescriptorProto, MethodOptions, OneofDescriptorProto,
    ServiceDescriptorProto, SourceCodeInfo, Type, Version,
};
use protoc_gen_go_hz_parser::parse_request;

fn field(name: &str, number: i32, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        ..Default::default()
    }
}

fn typed_field(name: &str, number: i32, kind: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, kind)
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn rpc(name: &str, input: &str, output: &str, options: MethodOptions) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        options: Some(options),
        ..Default::default()
    }
}

fn google(pattern: http_rule::Pattern, body: &str, response_body: &str) -> MethodOptions {
    MethodOptions {
        http: Some(HttpRule {
            pattern: Some(pattern),
            body: body.to_string(),
            response_body: response_body.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn common_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common/v1/types.proto".to_string()),
        package: Some("common.v1".to_string()),
        syntax: Some("proto3".to_string()),
        options: Some(FileOptions {
            go_package: Some("example.com/api/common/v1;commonv1".to_string()),
        }),
        message_type: vec![message(
            "Page",
            vec![field("size", 1, Type::Int32), field("token", 2, Type::String)],
        )],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Role".to_string()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("ROLE_UNSPECIFIED".to_string()),
                    number: Some(0),
                },
                EnumValueDescriptorProto {
                    name: Some("ROLE_ADMIN".to_string()),
                    number: Some(1),
                },
            ],
        }],
        ..Default::default()
    }
}

/// `user.v1.UserService` serving the given methods
fn user_file(methods: Vec<MethodDescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("user/v1/user.proto".to_string()),
        package: Some("user.v1".to_string()),
        dependency: vec!["common/v1/types.proto".to_string()],
        syntax: Some("proto3".to_string()),
        options: Some(FileOptions {
            go_package: Some("example.com/api/user/v1;userv1".to_string()),
        }),
        message_type: vec![
            message("GetUserRequest", vec![field("id", 1, Type::Int64)]),
            message(
                "User",
                vec![field("id", 1, Type::Int64), field("name", 2, Type::String)],
            ),
            message(
                "UpdateUserRequest",
                vec![
                    field("id", 1, Type::Int64),
                    typed_field("user", 2, Type::Message, ".user.v1.User"),
                    field("dry_run", 3, Type::Bool),
                ],
            ),
            message(
                "ListUsersRequest",
                vec![
                    typed_field("page", 1, Type::Message, ".common.v1.Page"),
                    FieldDescriptorProto {
                        label: Some(Label::Repeated as i32),
                        ..typed_field("roles", 2, Type::Enum, ".common.v1.Role")
                    },
                ],
            ),
            message(
                "UserReply",
                vec![typed_field("user", 1, Type::Message, ".user.v1.User")],
            ),
        ],
        service: vec![ServiceDescriptorProto {
            name: Some("UserService".to_string()),
            method: methods,
        }],
        source_code_info: Some(SourceCodeInfo {
            location: vec![
                source_code_info::Location {
                    path: vec![6, 0],
                    leading_comments: Some(" Manages users.\n".to_string()),
                    ..Default::default()
                },
                source_code_info::Location {
                    path: vec![6, 0, 2, 0],
                    leading_comments: Some(" GetUser returns one user.\n".to_string()),
                    ..Default::default()
                },
            ],
        }),
        ..Default::default()
    }
}

fn get_user() -> MethodDescriptorProto {
    rpc(
        "GetUser",
        ".user.v1.GetUserRequest",
        ".user.v1.User",
        google(http_rule::Pattern::Get("/users/{id}".to_string()), "", ""),
    )
}

fn request(files: Vec<FileDescriptorProto>, generate: &[&str], parameter: &str) -> Vec<u8> {
    CodeGeneratorRequest {
        file_to_generate: generate.iter().map(|s| s.to_string()).collect(),
        parameter: Some(parameter.to_string()),
        compiler_version: Some(Version {
            major: Some(3),
            minor: Some(21),
            patch: Some(12),
            suffix: None,
        }),
        proto_file: files,
    }
    .encode_to_vec()
}

fn run(bytes: &[u8]) -> Result<Vec<OutputFile>> {
    let model = parse_request(bytes)?;
    generate(
        &model.index,
        &model.tables,
        &model.options,
        model.compiler_version.as_deref(),
    )
}

fn user_request(methods: Vec<MethodDescriptorProto>, parameter: &str) -> Vec<u8> {
    request(
        vec![common_file(), user_file(methods)],
        &["user/v1/user.proto"],
        parameter,
    )
}

#[test]
fn test_get_user_golden() {
    let files = run(&user_request(vec![get_user()], "")).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "example.com/api/user/v1/user_hz.pb.go");

    let expected = format!(
        r#"// Code generated by protoc-gen-go-hz. DO NOT EDIT.
// versions:
// - protoc-gen-go-hz v{version}
// - protoc           v3.21.12
// source: user/v1/user.proto

package userv1

import (
	"context"
	"strconv"

	"github.com/cloudwego/hertz/pkg/app"
	"github.com/cloudwego/hertz/pkg/protocol/consts"
	"github.com/cloudwego/hertz/pkg/route"
	"google.golang.org/protobuf/encoding/protojson"
)

const OperationUserServiceGetUser = "/user.v1.UserService/GetUser"

// UserServiceHTTPServer is the server API for UserService served over HTTP.
//
// Manages users.
type UserServiceHTTPServer interface {{
	// GetUser returns one user.
	GetUser(context.Context, *GetUserRequest) (*User, error)
}}

// RegisterUserServiceHTTPServer registers the HTTP routes of UserService on r.
func RegisterUserServiceHTTPServer(r route.IRoutes, srv UserServiceHTTPServer) {{
	r.GET("/users/:id", _UserService_GetUser_HTTP_Handler(srv))
}}

func _UserService_GetUser_HTTP_Handler(srv UserServiceHTTPServer) app.HandlerFunc {{
	return func(ctx context.Context, c *app.RequestContext) {{
		in := new(GetUserRequest)
		{{
			raw := c.Param("id")
			v, err := strconv.ParseInt(raw, 10, 64)
			if err != nil {{
				c.AbortWithMsg("invalid path parameter id: "+err.Error(), consts.StatusBadRequest)
				return
			}}
			in.Id = v
		}}
		out, err := srv.GetUser(ctx, in)
		if err != nil {{
			c.AbortWithMsg(err.Error(), consts.StatusInternalServerError)
			return
		}}
		data, err := protojson.Marshal(out)
		if err != nil {{
			c.AbortWithMsg(err.Error(), consts.StatusInternalServerError)
			return
		}}
		c.Data(consts.StatusOK, "application/json; charset=utf-8", data)
	}}
}}
"#,
        version = GENERATOR_VERSION
    );
    assert_eq!(files[0].content, expected);
}

#[test]
fn test_output_is_deterministic() {
    let methods = || {
        vec![
            get_user(),
            rpc(
                "ListUsers",
                ".user.v1.ListUsersRequest",
                ".user.v1.UserReply",
                MethodOptions {
                    get: Some("/users".to_string()),
                    ..Default::default()
                },
            ),
        ]
    };
    let first = run(&user_request(methods(), "layout=package")).unwrap();
    let second = run(&user_request(methods(), "layout=package")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_get_and_post_share_a_path() {
    let update = rpc(
        "UpdateUser",
        ".user.v1.UpdateUserRequest",
        ".user.v1.User",
        google(http_rule::Pattern::Post("/users/{id}".to_string()), "user", ""),
    );
    let files = run(&user_request(vec![get_user(), update], "")).unwrap();
    let content = &files[0].content;

    assert!(content.contains("\tr.GET(\"/users/:id\", _UserService_GetUser_HTTP_Handler(srv))\n"));
    assert!(content
        .contains("\tr.POST(\"/users/:id\", _UserService_UpdateUser_HTTP_Handler(srv))\n"));

    // The body decodes into the selected field, dry_run falls back to the query
    assert!(content.contains("\t\t\tin.User = new(User)\n"));
    assert!(content.contains(
        "(protojson.UnmarshalOptions{DiscardUnknown: true}).Unmarshal(body, in.User); err != nil {\n"
    ));
    assert!(content.contains("\t\tif raw, ok := c.GetQuery(\"dry_run\"); ok {\n"));
    assert!(content.contains("\t\t\tv, err := strconv.ParseBool(raw)\n"));
}

#[test]
fn test_post_without_body_field_decodes_whole_message() {
    let create = rpc(
        "CreateUser",
        ".user.v1.UpdateUserRequest",
        ".user.v1.User",
        MethodOptions {
            post: Some("/users".to_string()),
            ..Default::default()
        },
    );
    let files = run(&user_request(vec![create], "")).unwrap();
    let content = &files[0].content;

    assert!(content.contains("\t\tif body := c.Request.Body(); len(body) > 0 {\n"));
    assert!(content.contains(".Unmarshal(body, in); err != nil {\n"));
    assert!(!content.contains("c.GetQuery"));
    assert!(!content.contains("\"strconv\""));
}

#[test]
fn test_cross_package_types_are_imported() {
    let list_pages = rpc(
        "ListPages",
        ".common.v1.Page",
        ".user.v1.UserReply",
        google(http_rule::Pattern::Get("/pages".to_string()), "", "user"),
    );
    let list_users = rpc(
        "ListUsers",
        ".user.v1.ListUsersRequest",
        ".user.v1.UserReply",
        MethodOptions {
            get: Some("/users".to_string()),
            ..Default::default()
        },
    );
    let files = run(&user_request(vec![list_pages, list_users], "")).unwrap();
    let content = &files[0].content;

    assert!(content.contains("\tcommonv1 \"example.com/api/common/v1\"\n"));
    assert!(content.contains("\tListPages(context.Context, *commonv1.Page) (*UserReply, error)\n"));
    assert!(content.contains("\t\tin := new(commonv1.Page)\n"));
    assert!(content.contains("\t\t\tn, err := strconv.ParseInt(raw, 10, 32)\n"));
    assert!(content.contains("\t\t\tin.Size = v\n"));
    assert!(content.contains("\t\tdata, err := protojson.Marshal(out.GetUser())\n"));

    // Repeated enums are read from every query value
    assert!(content.contains("\t\tfor _, item := range c.QueryArgs().PeekAll(\"roles\") {\n"));
    assert!(content.contains("\t\t\tn, ok := commonv1.Role_value[raw]\n"));
    assert!(content.contains("\t\t\tin.Roles = append(in.Roles, v)\n"));
}

#[test]
fn test_path_bound_to_message_is_unsupported() {
    let update = rpc(
        "UpdateUser",
        ".user.v1.UpdateUserRequest",
        ".user.v1.User",
        MethodOptions {
            put: Some("/users/{user}".to_string()),
            ..Default::default()
        },
    );
    let err = run(&user_request(vec![update], "")).unwrap_err();
    assert!(
        err.into_errors()
            .iter()
            .any(|e| matches!(e, GeneratorError::UnsupportedBindingType { .. })),
    );
}

#[test]
fn test_duplicate_route_fails() {
    let again = rpc(
        "FetchUser",
        ".user.v1.GetUserRequest",
        ".user.v1.User",
        MethodOptions {
            get: Some("/users/:id".to_string()),
            ..Default::default()
        },
    );
    let err = run(&user_request(vec![get_user(), again], "")).unwrap_err();
    assert!(matches!(err, GeneratorError::RouteConflict { .. }));
}

#[test]
fn test_no_annotations_no_files() {
    let plain = MethodDescriptorProto {
        options: None,
        ..get_user()
    };
    let files = run(&user_request(vec![plain], "")).unwrap();
    assert!(files.is_empty());
}

/// Two files in one Go package, each declaring the given service
fn shared_package_files(first: &str, second: &str) -> Vec<FileDescriptorProto> {
    let file = |name: &str, package: &str, service: &str| FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        syntax: Some("proto3".to_string()),
        options: Some(FileOptions {
            go_package: Some("example.com/api/shared;shared".to_string()),
        }),
        message_type: vec![message("Empty", vec![])],
        service: vec![ServiceDescriptorProto {
            name: Some(service.to_string()),
            method: vec![rpc(
                "Ping",
                &format!(".{}.Empty", package),
                &format!(".{}.Empty", package),
                MethodOptions {
                    get: Some(format!("/{}/ping", package)),
                    ..Default::default()
                },
            )],
        }],
        ..Default::default()
    };
    vec![
        file("a/alpha.proto", "a.v1", first),
        file("b/beta.proto", "b.v1", second),
    ]
}

#[test]
fn test_package_layout_merges_files() {
    let bytes = request(
        shared_package_files("AlphaService", "BetaService"),
        &["a/alpha.proto", "b/beta.proto"],
        "layout=package",
    );
    let files = run(&bytes).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "example.com/api/shared/shared_hz.pb.go");

    let content = &files[0].content;
    assert!(content.contains("// source: a/alpha.proto\n// source: b/beta.proto\n"));
    assert!(content.contains("type AlphaServiceHTTPServer interface {\n"));
    assert!(content.contains("type BetaServiceHTTPServer interface {\n"));
    assert_eq!(content.matches("\npackage shared\n").count(), 1);
}

#[test]
fn test_package_layout_symbol_collision() {
    let bytes = request(
        shared_package_files("UserService", "UserService"),
        &["a/alpha.proto", "b/beta.proto"],
        "layout=package",
    );
    let errors = run(&bytes).unwrap_err().into_errors();
    assert!(errors
        .iter()
        .all(|e| matches!(e, GeneratorError::SymbolCollision { .. })));

    match &errors[0] {
        GeneratorError::SymbolCollision {
            file,
            symbol,
            first,
            second,
        } => {
            assert_eq!(file, "example.com/api/shared/shared_hz.pb.go");
            assert_eq!(symbol, "UserServiceHTTPServer");
            assert_eq!(first, "a.v1.UserService");
            assert_eq!(second, "b.v1.UserService");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_file_layout_symbol_collision_across_files() {
    let bytes = request(
        shared_package_files("UserService", "UserService"),
        &["a/alpha.proto", "b/beta.proto"],
        "",
    );
    let errors = run(&bytes).unwrap_err().into_errors();
    assert!(errors
        .iter()
        .all(|e| matches!(e, GeneratorError::SymbolCollision { .. })));

    match &errors[0] {
        GeneratorError::SymbolCollision {
            file,
            symbol,
            first,
            second,
        } => {
            assert_eq!(file, "example.com/api/shared/beta_hz.pb.go");
            assert_eq!(symbol, "UserServiceHTTPServer");
            assert_eq!(first, "a.v1.UserService");
            assert_eq!(second, "b.v1.UserService");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_file_layout_distinct_services_share_a_package() {
    let bytes = request(
        shared_package_files("AlphaService", "BetaService"),
        &["a/alpha.proto", "b/beta.proto"],
        "",
    );
    let files = run(&bytes).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "example.com/api/shared/alpha_hz.pb.go",
            "example.com/api/shared/beta_hz.pb.go"
        ]
    );
}

#[test]
fn test_custom_and_catch_all_verbs() {
    let on_user = |name: &str, options: MethodOptions| {
        rpc(name, ".user.v1.GetUserRequest", ".user.v1.User", options)
    };
    let methods = vec![
        on_user(
            "LinkUser",
            google(
                http_rule::Pattern::Custom(CustomHttpPattern {
                    kind: "LINK".to_string(),
                    path: "/users/{id}".to_string(),
                }),
                "*",
                "",
            ),
        ),
        on_user(
            "AnyUser",
            MethodOptions {
                any: Some("/any/{id}".to_string()),
                ..Default::default()
            },
        ),
        on_user(
            "HeadUser",
            MethodOptions {
                head: Some("/users/{id}".to_string()),
                ..Default::default()
            },
        ),
        on_user(
            "OptionsUser",
            MethodOptions {
                options: Some("/users/{id}".to_string()),
                ..Default::default()
            },
        ),
    ];
    let files = run(&user_request(methods, "")).unwrap();
    let content = &files[0].content;

    assert!(content.contains(
        "\tr.Handle(\"LINK\", \"/users/:id\", _UserService_LinkUser_HTTP_Handler(srv))\n"
    ));
    assert!(content.contains("\tr.Any(\"/any/:id\", _UserService_AnyUser_HTTP_Handler(srv))\n"));
    assert!(content.contains("\tr.HEAD(\"/users/:id\", _UserService_HeadUser_HTTP_Handler(srv))\n"));
    assert!(content
        .contains("\tr.OPTIONS(\"/users/:id\", _UserService_OptionsUser_HTTP_Handler(srv))\n"));
}

/// `demo/v1/demo.proto` declaring the given messages and a `DemoService`
fn demo_file(
    syntax: &str,
    messages: Vec<DescriptorProto>,
    methods: Vec<MethodDescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("demo/v1/demo.proto".to_string()),
        package: Some("demo.v1".to_string()),
        syntax: Some(syntax.to_string()),
        options: Some(FileOptions {
            go_package: Some("example.com/api/demo/v1;demov1".to_string()),
        }),
        message_type: messages,
        service: vec![ServiceDescriptorProto {
            name: Some("DemoService".to_string()),
            method: methods,
        }],
        ..Default::default()
    }
}

fn demo_content(
    syntax: &str,
    messages: Vec<DescriptorProto>,
    method: MethodDescriptorProto,
) -> String {
    let bytes = request(
        vec![demo_file(syntax, messages, vec![method])],
        &["demo/v1/demo.proto"],
        "",
    );
    let mut files = run(&bytes).unwrap();
    assert_eq!(files.len(), 1);
    files.remove(0).content
}

fn get(name: &str, input: &str, path: &str) -> MethodDescriptorProto {
    rpc(
        name,
        input,
        ".demo.v1.Reply",
        MethodOptions {
            get: Some(path.to_string()),
            ..Default::default()
        },
    )
}

#[test]
fn test_catch_all_path() {
    let content = demo_content(
        "proto3",
        vec![
            message("FileRequest", vec![field("path", 1, Type::String)]),
            message("Reply", vec![]),
        ],
        get("GetFile", ".demo.v1.FileRequest", "/files/{path=**}"),
    );

    assert!(content.contains("\tr.GET(\"/files/*path\", _DemoService_GetFile_HTTP_Handler(srv))\n"));
    assert!(content.contains("\t\t\traw := c.Param(\"path\")\n"));
    assert!(content.contains("\t\t\tin.Path = v\n"));
}

#[test]
fn test_proto3_optional_fields_are_pointers() {
    let optional = |name: &str, number: i32, kind: Type, oneof: i32| FieldDescriptorProto {
        proto3_optional: Some(true),
        oneof_index: Some(oneof),
        ..field(name, number, kind)
    };
    let member = |name: &str, number: i32| FieldDescriptorProto {
        oneof_index: Some(2),
        ..field(name, number, Type::String)
    };
    let find = DescriptorProto {
        oneof_decl: vec![
            OneofDescriptorProto {
                name: Some("_nickname".to_string()),
            },
            OneofDescriptorProto {
                name: Some("_data".to_string()),
            },
            OneofDescriptorProto {
                name: Some("contact".to_string()),
            },
        ],
        ..message(
            "FindRequest",
            vec![
                optional("nickname", 1, Type::String, 0),
                optional("data", 2, Type::Bytes, 1),
                member("email", 3),
                member("phone", 4),
                field("limit", 5, Type::Int32),
            ],
        )
    };
    let content = demo_content(
        "proto3",
        vec![find, message("Reply", vec![])],
        get("Find", ".demo.v1.FindRequest", "/find"),
    );

    assert!(content.contains("\t\t\tin.Nickname = &v\n"));
    // Bytes never get a pointer
    assert!(content.contains("\t\t\tin.Data = v\n"));
    assert!(content.contains("\t\t\tin.Limit = v\n"));

    // Oneof members are left unbound
    assert!(!content.contains("c.GetQuery(\"email\")"));
    assert!(!content.contains("c.GetQuery(\"phone\")"));
    assert!(!content.contains("in.Email"));
}

#[test]
fn test_proto2_scalars_are_pointers() {
    let lookup = message(
        "LookupRequest",
        vec![
            FieldDescriptorProto {
                label: Some(Label::Required as i32),
                ..field("id", 1, Type::Int64)
            },
            field("tag", 2, Type::String),
            field("blob", 3, Type::Bytes),
            FieldDescriptorProto {
                label: Some(Label::Repeated as i32),
                ..field("labels", 4, Type::String)
            },
        ],
    );
    let content = demo_content(
        "proto2",
        vec![lookup, message("Reply", vec![])],
        get("Lookup", ".demo.v1.LookupRequest", "/lookup/{id}"),
    );

    assert!(content.contains("\t\t\tin.Id = &v\n"));
    assert!(content.contains("\t\t\tin.Tag = &v\n"));
    assert!(content.contains("\t\t\tin.Blob = v\n"));
    assert!(content.contains("\t\t\tin.Labels = append(in.Labels, v)\n"));
}

#[test]
fn test_field_names_clashing_with_generated_methods() {
    let ping = message(
        "PingRequest",
        vec![
            field("descriptor", 1, Type::String),
            typed_field("reset", 2, Type::Message, ".demo.v1.Payload"),
            field("name", 3, Type::String),
            field("get_name", 4, Type::String),
        ],
    );
    let reply = message(
        "Reply",
        vec![typed_field("string", 1, Type::Message, ".demo.v1.Payload")],
    );
    let content = demo_content(
        "proto3",
        vec![ping, reply, message("Payload", vec![])],
        rpc(
            "Ping",
            ".demo.v1.PingRequest",
            ".demo.v1.Reply",
            google(http_rule::Pattern::Post("/ping".to_string()), "reset", "string"),
        ),
    );

    assert!(content.contains("\t\t\tin.Descriptor_ = v\n"));
    assert!(content.contains("\t\t\tin.Reset_ = new(Payload)\n"));
    assert!(content.contains("\t\t\tin.Name = v\n"));
    assert!(content.contains("\t\t\tin.GetName_ = v\n"));
    assert!(content.contains("\t\tdata, err := protojson.Marshal(out.GetString_())\n"));
}

#[test]
fn test_generate_to_directory() {
    let model = parse_request(&user_request(
        vec![get_user()],
        "paths=source_relative,out_dir=gen",
    ))
    .unwrap();
    let temp_dir = tempfile::tempdir().unwrap();

    let written = HertzGenerator::new(&model.index, &model.tables, &model.options)
        .generate_to_directory(temp_dir.path())
        .unwrap();

    let expected = temp_dir.path().join("gen/user/v1/user_hz.pb.go");
    assert_eq!(written, vec![expected.clone()]);
    let content = std::fs::read_to_string(expected).unwrap();
    assert!(content.starts_with("// Code generated by protoc-gen-go-hz. DO NOT EDIT.\n"));
    assert!(content.contains("// - protoc           v3.21.12\n"));
}
