use serde::{Deserialize, Serialize};

/// Which source set a class was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Entity,
    Controller,
    Interface,
    #[serde(rename = "type")]
    TypeAlias,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Entity => "entity",
            ClassKind::Controller => "controller",
            ClassKind::Interface => "interface",
            ClassKind::TypeAlias => "type",
        }
    }

    pub fn is_frontend(&self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::TypeAlias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub type_name: String,
    pub name: String,
}

impl Field {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// An HTTP-mapped controller method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub http_method: String,
    pub return_type: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModel {
    pub name: String,
    pub kind: ClassKind,
    pub fields: Vec<Field>,
    pub methods: Vec<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ClassModel {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            methods: Vec::new(),
            parent: None,
            source: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Operation>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Association,
    Inheritance,
}

/// A directed edge between two classes of the same diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub from_kind: ClassKind,
    pub to: String,
    pub to_kind: ClassKind,
    pub kind: RelationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub service: String,
    pub method: String,
}

impl ServiceCall {
    /// Receiver name as written in the controller, e.g. `taskService`.
    pub fn receiver(&self) -> String {
        format!("{}Service", self.service)
    }
}

/// A controller method resolved to its full route and the service calls in
/// its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub class_name: String,
    pub method_name: String,
    pub http_method: String,
    pub path: String,
    pub service_calls: Vec<ServiceCall>,
}

impl Endpoint {
    /// `GetMapping` → `get`
    pub fn verb(&self) -> String {
        self.http_method.trim_end_matches("Mapping").to_lowercase()
    }
}

/// A frontend call site that targets a controller endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCall {
    pub view_file: String,
    pub api_client: String,
    pub http_method: String,
    pub path: String,
    pub controller_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ClassKind::TypeAlias).unwrap();
        assert_eq!(json, "\"type\"");
        let json = serde_json::to_string(&ClassKind::Entity).unwrap();
        assert_eq!(json, "\"entity\"");
    }

    #[test]
    fn test_endpoint_verb() {
        let endpoint = Endpoint {
            class_name: "TaskController".to_string(),
            method_name: "deleteTask".to_string(),
            http_method: "DeleteMapping".to_string(),
            path: "/tasks/{id}".to_string(),
            service_calls: vec![],
        };
        assert_eq!(endpoint.verb(), "delete");
    }

    #[test]
    fn test_service_call_receiver() {
        let call = ServiceCall {
            service: "task".to_string(),
            method: "createTask".to_string(),
        };
        assert_eq!(call.receiver(), "taskService");
    }
}
