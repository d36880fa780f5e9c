//! Annotation resolution
//!
//! Normalizes a method's decoded annotation and the annotations on its input
//! fields into one [`HttpBinding`].

use protoc_gen_go_hz_common::{
    finish, BodyBinding, Field, FieldAnnotation, FieldBinding, FieldKind, FieldRef,
    GeneratorError, HttpAnnotation, HttpBinding, Message, Method, ParamSource, PathTemplate,
    ProtoIndex, Result, Service,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Resolves HTTP annotations against the loaded descriptors
pub struct AnnotationResolver<'a> {
    index: &'a ProtoIndex,
}

/// Per-method resolution state
struct MethodScope<'m> {
    label: String,
    input: &'m Message,
    errors: Vec<GeneratorError>,
}

impl MethodScope<'_> {
    fn conflict(&mut self, detail: String) {
        self.errors.push(GeneratorError::BindingConflict {
            method: self.label.clone(),
            detail,
        });
    }

    fn unsupported(&mut self, detail: String) {
        self.errors.push(GeneratorError::UnsupportedBindingType {
            method: self.label.clone(),
            detail,
        });
    }

    fn field_ref(&self, index: usize) -> FieldRef {
        FieldRef {
            index,
            name: self.input.fields[index].name.clone(),
        }
    }
}

impl<'a> AnnotationResolver<'a> {
    pub fn new(index: &'a ProtoIndex) -> Self {
        Self { index }
    }

    /// Resolve one method
    ///
    /// Returns `Ok(None)` for methods without an HTTP annotation. Every
    /// problem found on the method is reported, not just the first.
    pub fn resolve(&self, service: &Service, method: &Method) -> Result<Option<HttpBinding>> {
        let Some(annotation) = method.annotation.as_ref() else {
            debug!(service = %service.full_name, method = %method.name, "no HTTP annotation");
            return Ok(None);
        };

        let label = format!("{}.{}", service.full_name, method.name);
        if method.is_streaming() {
            return Err(GeneratorError::UnsupportedBindingType {
                method: label,
                detail: "streaming methods cannot be bound to HTTP routes".to_string(),
            });
        }

        let template =
            PathTemplate::parse(annotation.path()).map_err(|e| GeneratorError::InvalidPathTemplate {
                method: label.clone(),
                template: annotation.path().to_string(),
                reason: e.to_string(),
            })?;

        let mut scope = MethodScope {
            label,
            input: self.index.message(method.input),
            errors: Vec::new(),
        };

        let mut params = self.bind_path(&mut scope, &template);
        let path_bound: HashSet<usize> = params.iter().map(|b| b.field.index).collect();

        let body = self.bind_body(&mut scope, annotation, &path_bound);
        let body_field = match &body {
            BodyBinding::Field(field) => Some(field.index),
            _ => None,
        };

        let mut rest = self.bind_explicit(&mut scope, &path_bound);
        if body != BodyBinding::Message {
            let implicit = self.bind_implicit(&mut scope, &path_bound, body_field, &rest);
            rest.extend(implicit);
        }
        rest.sort_by_key(|b| b.field.index);
        params.extend(rest);

        let response_body = self.bind_response_body(&mut scope, annotation, method);

        let binding = HttpBinding {
            verb: annotation.verb().clone(),
            template,
            params,
            body,
            response_body,
        };
        finish(Some(binding), scope.errors)
    }

    /// Match every template parameter to exactly one input field
    fn bind_path(&self, scope: &mut MethodScope<'_>, template: &PathTemplate) -> Vec<FieldBinding> {
        let input = scope.input;
        let params: Vec<&str> = template.params().collect();
        let mut bindings = Vec::with_capacity(params.len());

        for param in &params {
            let candidates: Vec<usize> = input
                .fields
                .iter()
                .enumerate()
                .filter(|(_, field)| match &field.annotation {
                    Some(FieldAnnotation::Path(alias)) => alias == param,
                    None => field.name == *param,
                    Some(_) => false,
                })
                .map(|(i, _)| i)
                .collect();

            match candidates.as_slice() {
                [index] => {
                    let field = &input.fields[*index];
                    if let Some(detail) = path_type_problem(field) {
                        scope.unsupported(format!("path parameter `{}` {}", param, detail));
                        continue;
                    }
                    bindings.push(FieldBinding {
                        field: scope.field_ref(*index),
                        source: ParamSource::Path,
                        name: param.to_string(),
                        explicit: field.annotation.is_some(),
                    });
                }
                [] => match input.field(param) {
                    Some((_, field)) => {
                        let bound = field
                            .annotation
                            .as_ref()
                            .map(annotation_name)
                            .unwrap_or("path");
                        let detail = format!(
                            "path parameter `{}` names field `{}`, which is bound to {}",
                            param, field.name, bound
                        );
                        scope.conflict(detail);
                    }
                    None => scope.errors.push(GeneratorError::InvalidPathTemplate {
                        method: scope.label.clone(),
                        template: template.as_str().to_string(),
                        reason: format!(
                            "parameter `{}` references no field of {}",
                            param, input.full_name
                        ),
                    }),
                },
                many => {
                    let names: Vec<&str> = many
                        .iter()
                        .map(|i| input.fields[*i].name.as_str())
                        .collect();
                    let detail = format!(
                        "path parameter `{}` is claimed by fields {}",
                        param,
                        names.join(", ")
                    );
                    scope.conflict(detail);
                }
            }
        }

        for field in &input.fields {
            if let Some(FieldAnnotation::Path(alias)) = &field.annotation {
                if !params.contains(&alias.as_str()) {
                    scope.errors.push(GeneratorError::InvalidPathTemplate {
                        method: scope.label.clone(),
                        template: template.as_str().to_string(),
                        reason: format!(
                            "field `{}` declares path parameter `{}` which the template lacks",
                            field.name, alias
                        ),
                    });
                }
            }
        }

        bindings
    }

    /// Decide what the request body decodes into
    fn bind_body(
        &self,
        scope: &mut MethodScope<'_>,
        annotation: &HttpAnnotation,
        path_bound: &HashSet<usize>,
    ) -> BodyBinding {
        let input = scope.input;
        let annotated: Vec<usize> = input
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| matches!(f.annotation, Some(FieldAnnotation::Body(_))))
            .map(|(i, _)| i)
            .collect();

        if annotated.len() > 1 {
            let names: Vec<&str> = annotated
                .iter()
                .map(|i| input.fields[*i].name.as_str())
                .collect();
            scope.conflict(format!(
                "request body is claimed by fields {}",
                names.join(", ")
            ));
            return BodyBinding::None;
        }
        let annotated = annotated.first().copied();

        let selected = match annotation {
            HttpAnnotation::Google { body: Some(selector), .. } if selector == "*" => {
                if let Some(index) = annotated {
                    let detail = format!(
                        "body \"*\" takes the whole message, but field `{}` is annotated as the body",
                        input.fields[index].name
                    );
                    scope.conflict(detail);
                }
                return BodyBinding::Message;
            }
            HttpAnnotation::Google { body: Some(selector), .. } => {
                match input.field(selector) {
                    Some((index, _)) if annotated.is_some_and(|a| a != index) => {
                        scope.conflict(format!(
                            "body selector `{}` disagrees with the field annotated as the body",
                            selector
                        ));
                        return BodyBinding::None;
                    }
                    Some((index, _)) => index,
                    None => {
                        scope.errors.push(GeneratorError::Decode(format!(
                            "body selector `{}` on {} names no field of {}",
                            selector, scope.label, input.full_name
                        )));
                        return BodyBinding::None;
                    }
                }
            }
            HttpAnnotation::Google { body: None, .. } => match annotated {
                Some(index) => index,
                None => return BodyBinding::None,
            },
            HttpAnnotation::Hertz { verb, .. } => match annotated {
                Some(index) => index,
                None if verb.carries_body() => return BodyBinding::Message,
                None => return BodyBinding::None,
            },
        };

        let field = &input.fields[selected];
        if path_bound.contains(&selected) {
            let detail = format!("field `{}` is bound to both path and body", field.name);
            scope.conflict(detail);
            return BodyBinding::None;
        }
        if field.repeated || !matches!(field.kind, FieldKind::Message(_)) {
            let detail = format!(
                "body field `{}` must be a singular message, found {}",
                field.name,
                describe(field)
            );
            scope.unsupported(detail);
            return BodyBinding::None;
        }

        BodyBinding::Field(scope.field_ref(selected))
    }

    /// Bindings declared with `(api.query)` and `(api.header)`
    fn bind_explicit(
        &self,
        scope: &mut MethodScope<'_>,
        path_bound: &HashSet<usize>,
    ) -> Vec<FieldBinding> {
        let input = scope.input;
        let mut bindings = Vec::new();
        let mut query: HashMap<String, usize> = HashMap::new();
        let mut header: HashMap<String, usize> = HashMap::new();

        for (index, field) in input.fields.iter().enumerate() {
            let (source, name, key, claimed) = match &field.annotation {
                Some(FieldAnnotation::Query(name)) => {
                    (ParamSource::Query, name, name.clone(), &mut query)
                }
                Some(FieldAnnotation::Header(name)) => {
                    (ParamSource::Header, name, name.to_ascii_lowercase(), &mut header)
                }
                _ => continue,
            };
            if path_bound.contains(&index) {
                continue;
            }

            if let Some(first) = claimed.insert(key, index) {
                let detail = format!(
                    "{} parameter `{}` is claimed by fields `{}` and `{}`",
                    source, name, input.fields[first].name, field.name
                );
                scope.conflict(detail);
                continue;
            }
            if let Some(problem) = param_type_problem(field, source) {
                scope.unsupported(format!("{} parameter `{}` {}", source, name, problem));
                continue;
            }

            bindings.push(FieldBinding {
                field: scope.field_ref(index),
                source,
                name: name.clone(),
                explicit: true,
            });
        }

        bindings
    }

    /// Query bindings for the scalar fields nothing else claimed
    fn bind_implicit(
        &self,
        scope: &mut MethodScope<'_>,
        path_bound: &HashSet<usize>,
        body_field: Option<usize>,
        explicit: &[FieldBinding],
    ) -> Vec<FieldBinding> {
        let input = scope.input;
        let mut bindings = Vec::new();

        for (index, field) in input.fields.iter().enumerate() {
            if field.annotation.is_some()
                || path_bound.contains(&index)
                || body_field == Some(index)
            {
                continue;
            }
            if !field.is_scalar_like() || field.oneof.is_some() {
                debug!(
                    method = %scope.label,
                    field = %field.name,
                    "leaving non-scalar field unbound"
                );
                continue;
            }

            let clash = explicit
                .iter()
                .find(|b| b.source == ParamSource::Query && b.name == field.name);
            if let Some(clash) = clash {
                let detail = format!(
                    "query parameter `{}` is claimed by fields `{}` and `{}`",
                    field.name, clash.field.name, field.name
                );
                scope.conflict(detail);
                continue;
            }

            bindings.push(FieldBinding {
                field: scope.field_ref(index),
                source: ParamSource::Query,
                name: field.name.clone(),
                explicit: false,
            });
        }

        bindings
    }

    fn bind_response_body(
        &self,
        scope: &mut MethodScope<'_>,
        annotation: &HttpAnnotation,
        method: &Method,
    ) -> Option<FieldRef> {
        let HttpAnnotation::Google {
            response_body: Some(selector),
            ..
        } = annotation
        else {
            return None;
        };

        let output = self.index.message(method.output);
        let Some((index, field)) = output.field(selector) else {
            scope.errors.push(GeneratorError::Decode(format!(
                "response_body selector `{}` on {} names no field of {}",
                selector, scope.label, output.full_name
            )));
            return None;
        };
        if field.repeated || !matches!(field.kind, FieldKind::Message(_)) {
            scope.unsupported(format!(
                "response_body field `{}` must be a singular message, found {}",
                field.name,
                describe(field)
            ));
            return None;
        }

        Some(FieldRef {
            index,
            name: field.name.clone(),
        })
    }
}

fn annotation_name(annotation: &FieldAnnotation) -> &'static str {
    match annotation {
        FieldAnnotation::Path(_) => "a different path parameter",
        FieldAnnotation::Query(_) => "query",
        FieldAnnotation::Header(_) => "header",
        FieldAnnotation::Body(_) => "the body",
    }
}

fn path_type_problem(field: &Field) -> Option<String> {
    param_type_problem(field, ParamSource::Path)
}

/// Why a field cannot be read from a path, query or header value
fn param_type_problem(field: &Field, source: ParamSource) -> Option<String> {
    if !field.is_scalar_like() {
        return Some(format!("cannot be bound to {}", describe(field)));
    }
    if field.oneof.is_some() {
        return Some(format!("cannot be bound to oneof member `{}`", field.name));
    }
    if field.repeated && source != ParamSource::Query {
        return Some(format!(
            "cannot be bound to repeated field `{}` (only query parameters repeat)",
            field.name
        ));
    }
    None
}

fn describe(field: &Field) -> String {
    let kind = match field.kind {
        FieldKind::Scalar(scalar) => scalar.proto_name(),
        FieldKind::Enum(_) => "enum",
        FieldKind::Message(_) => "message",
        FieldKind::Map(_) => "map",
    };
    if field.repeated && !matches!(field.kind, FieldKind::Map(_)) {
        format!("repeated {} field `{}`", kind, field.name)
    } else {
        format!("{} field `{}`", kind, field.name)
    }
}
