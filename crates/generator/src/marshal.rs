//! Request marshalling glue
//!
//! Statements that read one bound parameter from the Hertz request context,
//! parse it into the field's Go type and store it on `in`. Malformed values
//! abort the request with 400.

use crate::code::CodeBlock;
use protoc_gen_go_hz_common::{Field, FieldBinding, FieldKind, ParamSource, ScalarKind};

/// Go-side type of a bound value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Scalar(ScalarKind),
    /// Qualified Go enum type, e.g. `commonv1.Role`
    Enum(String),
}

impl ValueKind {
    /// Whether parsing needs the `strconv` package
    pub fn needs_strconv(&self) -> bool {
        !matches!(
            self,
            ValueKind::Scalar(ScalarKind::String | ScalarKind::Bytes)
        )
    }
}

/// Where the bound value is stored on the input message
pub struct Target<'f> {
    pub field: &'f Field,
    pub kind: ValueKind,
}

impl Target<'_> {
    fn assign(&self) -> CodeBlock {
        let field = &self.field.go_name;
        if self.field.repeated {
            CodeBlock::line(format!("in.{0} = append(in.{0}, v)", field))
        } else if self.field.explicit_presence {
            CodeBlock::line(format!("in.{} = &v", field))
        } else {
            CodeBlock::line(format!("in.{} = v", field))
        }
    }
}

/// Value kind of a field, or `None` for messages and maps
pub fn value_kind(field: &Field, enum_type: impl FnOnce() -> String) -> Option<ValueKind> {
    match field.kind {
        FieldKind::Scalar(scalar) => Some(ValueKind::Scalar(scalar)),
        FieldKind::Enum(_) => Some(ValueKind::Enum(enum_type())),
        FieldKind::Message(_) | FieldKind::Map(_) => None,
    }
}

/// Statements binding one parameter onto `in`
pub fn bind(binding: &FieldBinding, target: &Target<'_>) -> CodeBlock {
    let what = format!("{} parameter {}", binding.source, binding.name);
    let key = go_string(&binding.name);
    let mut body = Vec::new();

    let header = match binding.source {
        ParamSource::Path => {
            body.push(CodeBlock::line(format!("raw := c.Param({})", key)));
            String::new()
        }
        ParamSource::Query if target.field.repeated => {
            body.push(CodeBlock::line("raw := string(item)"));
            format!("for _, item := range c.QueryArgs().PeekAll({})", key)
        }
        ParamSource::Query => format!("if raw, ok := c.GetQuery({}); ok", key),
        ParamSource::Header => format!("if raw := string(c.GetHeader({})); raw != \"\"", key),
    };

    body.extend(convert(&target.kind, &what));
    body.push(target.assign());
    CodeBlock::braced(header, body)
}

/// Statements turning the string `raw` into `v`
pub fn convert(kind: &ValueKind, what: &str) -> Vec<CodeBlock> {
    let parse = |call: &str| {
        vec![
            CodeBlock::line(format!("v, err := {}", call)),
            abort_on_error(what),
        ]
    };
    let narrow = |call: &str, go_type: &str| {
        vec![
            CodeBlock::line(format!("n, err := {}", call)),
            abort_on_error(what),
            CodeBlock::line(format!("v := {}(n)", go_type)),
        ]
    };

    match kind {
        ValueKind::Scalar(scalar) => match scalar {
            ScalarKind::String => vec![CodeBlock::line("v := raw")],
            ScalarKind::Bytes => vec![CodeBlock::line("v := []byte(raw)")],
            ScalarKind::Bool => parse("strconv.ParseBool(raw)"),
            ScalarKind::Int64 | ScalarKind::Sint64 | ScalarKind::Sfixed64 => {
                parse("strconv.ParseInt(raw, 10, 64)")
            }
            ScalarKind::Int32 | ScalarKind::Sint32 | ScalarKind::Sfixed32 => {
                narrow("strconv.ParseInt(raw, 10, 32)", "int32")
            }
            ScalarKind::Uint64 | ScalarKind::Fixed64 => parse("strconv.ParseUint(raw, 10, 64)"),
            ScalarKind::Uint32 | ScalarKind::Fixed32 => {
                narrow("strconv.ParseUint(raw, 10, 32)", "uint32")
            }
            ScalarKind::Double => parse("strconv.ParseFloat(raw, 64)"),
            ScalarKind::Float => narrow("strconv.ParseFloat(raw, 32)", "float32"),
        },
        // Enum values are accepted by name or by number
        ValueKind::Enum(go_type) => vec![
            CodeBlock::line(format!("n, ok := {}_value[raw]", go_type)),
            CodeBlock::braced(
                "if !ok",
                vec![
                    CodeBlock::line("i, err := strconv.ParseInt(raw, 10, 32)"),
                    abort_on_error(what),
                    CodeBlock::line("n = int32(i)"),
                ],
            ),
            CodeBlock::line(format!("v := {}(n)", go_type)),
        ],
    }
}

fn abort_on_error(what: &str) -> CodeBlock {
    CodeBlock::braced(
        "if err != nil",
        vec![
            CodeBlock::line(format!(
                "c.AbortWithMsg({}+err.Error(), consts.StatusBadRequest)",
                go_string(&format!("invalid {}: ", what))
            )),
            CodeBlock::line("return"),
        ],
    )
}

/// Quote a string as a Go interpreted string literal
pub fn go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
