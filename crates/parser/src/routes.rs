//! Route model building
//!
//! Groups the resolved bindings of each service into a [`RouteTable`] and
//! validates the table as a whole.

use crate::resolver::AnnotationResolver;
use protoc_gen_go_hz_common::{
    finish, GeneratorError, ParamSource, ProtoIndex, Result, Route, RouteTable, Service,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Builds one route table per service of every generated file
pub struct RouteModelBuilder<'a> {
    index: &'a ProtoIndex,
    resolver: AnnotationResolver<'a>,
}

impl<'a> RouteModelBuilder<'a> {
    pub fn new(index: &'a ProtoIndex) -> Self {
        Self {
            index,
            resolver: AnnotationResolver::new(index),
        }
    }

    /// Build the tables of every file marked for generation
    ///
    /// Tables come out in file order, then service declaration order; services
    /// without HTTP routes yield empty tables. Errors from every service are
    /// collected before failing.
    pub fn build(&self) -> Result<Vec<RouteTable>> {
        let mut tables = Vec::new();
        let mut errors = Vec::new();

        for (_, file) in self.index.files_to_generate() {
            let first_table = tables.len();
            for service in &file.services {
                match self.build_service(service) {
                    Ok(table) => tables.push(table),
                    Err(err) => errors.extend(err.into_errors()),
                }
            }
            warn_cross_service_duplicates(&file.name, &tables[first_table..]);
        }

        debug!(
            tables = tables.len(),
            routes = tables.iter().map(|t| t.routes.len()).sum::<usize>(),
            "built route model"
        );
        finish(tables, errors)
    }

    /// Build and validate the table of one service
    pub fn build_service(&self, service: &Service) -> Result<RouteTable> {
        let mut errors = Vec::new();
        let mut routes = Vec::new();

        for method in &service.methods {
            match self.resolver.resolve(service, method) {
                Ok(Some(binding)) => routes.push(Route {
                    method: method.name.clone(),
                    operation: format!("/{}/{}", service.full_name, method.name),
                    input: method.input,
                    output: method.output,
                    comments: method.comments.clone(),
                    binding,
                }),
                Ok(None) => {}
                Err(err) => errors.extend(err.into_errors()),
            }
        }

        errors.extend(check_duplicates(service, &routes));
        errors.extend(check_path_params(service, &routes));

        debug!(service = %service.full_name, routes = routes.len(), "built route table");
        let table = RouteTable {
            service: service.name.clone(),
            full_name: service.full_name.clone(),
            file: service.file,
            comments: service.comments.clone(),
            routes,
        };
        finish(table, errors)
    }

    pub fn index(&self) -> &ProtoIndex {
        self.index
    }
}

/// No two routes may overlap on verb and share a normalized path
fn check_duplicates(service: &Service, routes: &[Route]) -> Vec<GeneratorError> {
    let mut errors = Vec::new();
    let mut by_path: HashMap<String, Vec<&Route>> = HashMap::new();

    for route in routes {
        let seen = by_path.entry(route.normalized_path()).or_default();
        if let Some(first) = seen.iter().find(|r| r.verb().overlaps(route.verb())) {
            errors.push(GeneratorError::RouteConflict {
                service: service.full_name.clone(),
                verb: route.verb().to_string(),
                path: route.binding.template.as_str().to_string(),
                first: first.method.clone(),
                second: route.method.clone(),
            });
        }
        seen.push(route);
    }

    errors
}

/// Every template parameter is bound to exactly one field
fn check_path_params(service: &Service, routes: &[Route]) -> Vec<GeneratorError> {
    let mut errors = Vec::new();

    for route in routes {
        let template = &route.binding.template;
        for param in template.params() {
            let count = route
                .binding
                .params
                .iter()
                .filter(|b| b.source == ParamSource::Path && b.name == param)
                .count();
            if count != 1 {
                errors.push(GeneratorError::InvalidPathTemplate {
                    method: format!("{}.{}", service.full_name, route.method),
                    template: template.as_str().to_string(),
                    reason: format!("parameter `{}` is bound {} times", param, count),
                });
            }
        }
    }

    errors
}

/// Services register on their own routers, so overlaps across them only warn
fn warn_cross_service_duplicates(file: &str, tables: &[RouteTable]) {
    let mut seen: HashMap<(String, String), &str> = HashMap::new();

    for table in tables {
        for route in &table.routes {
            let key = (route.verb().to_string(), route.normalized_path());
            match seen.get(&key) {
                Some(owner) if *owner != table.full_name => {
                    warn!(
                        file,
                        verb = %key.0,
                        path = %route.binding.template.as_str(),
                        first = %owner,
                        second = %table.full_name,
                        "route registered by more than one service"
                    );
                }
                Some(_) => {}
                None => {
                    seen.insert(key, &table.full_name);
                }
            }
        }
    }
}
