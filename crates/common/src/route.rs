//! Per-service route tables

use crate::binding::{HttpBinding, HttpVerb};
use crate::model::{FileId, MessageId};
use serde::Serialize;

/// A resolved HTTP route for one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Proto method name (e.g., "GetUser")
    pub method: String,
    /// gRPC operation (e.g., "/user.v1.UserService/GetUser")
    pub operation: String,
    pub input: MessageId,
    pub output: MessageId,
    pub comments: Option<String>,
    pub binding: HttpBinding,
}

impl Route {
    pub fn verb(&self) -> &HttpVerb {
        &self.binding.verb
    }

    pub fn normalized_path(&self) -> String {
        self.binding.template.normalized()
    }
}

/// Routes of one service in method declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTable {
    pub service: String,
    pub full_name: String,
    pub file: FileId,
    pub comments: Option<String>,
    pub routes: Vec<Route>,
}

impl RouteTable {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
