use crate::analyze::lang::ModelParser;
use crate::analyze::source::{find_brace_end, squash_whitespace, strip_comments};
use crate::types::{ClassKind, ClassModel, Endpoint, Field, Operation, ServiceCall};
use once_cell::sync::Lazy;
use regex::Regex;

/// Persistent data records: private instance fields become attributes.
pub struct JavaEntityParser;

/// HTTP controllers: mapped methods become operations.
pub struct JavaControllerParser;

static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"public\s+(?:abstract\s+|final\s+)?class\s+(\w+)(?:\s*<[^>{]*>)?(?:\s+extends\s+([\w.]+))?")
        .unwrap()
});

// private [static|final|transient|volatile]* Type name [= init];
static FIELD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bprivate\s+((?:(?:static|final|transient|volatile)\s+)*)([\w.]+(?:\s*<[\w\s,.<>?\[\]]*>)?(?:\[\])*)\s+(\w+)\s*(?:=[^;]*)?;")
        .unwrap()
});

// Annotation argument list body: plain text, string literals that may hold
// parentheses, or one level of nested parentheses.
const ANNOTATION_ARGS: &str = r#"(?:[^()"]|"(?:[^"\\]|\\.)*"|\([^()]*\))*"#;

// @XxxMapping(...) [@Other(...)]* public ReturnType name(
static MAPPING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"@(GetMapping|PostMapping|PutMapping|DeleteMapping|PatchMapping)\b(?:\s*\(({args})\))?(?:\s*@\w+(?:\s*\({args}\))?)*\s*public\s+(?:static\s+)?([\w.]+(?:\s*<[\w\s,.<>?\[\]]*>)?(?:\[\])*)\s+(\w+)\s*\(",
        args = ANNOTATION_ARGS
    ))
    .unwrap()
});

static REQUEST_MAPPING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"@RequestMapping\s*\(({args})\)", args = ANNOTATION_ARGS)).unwrap()
});

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).unwrap());

static SERVICE_CALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)Service\.(\w+)\(").unwrap());

impl ModelParser for JavaEntityParser {
    fn parse_models(&self, content: &str) -> Vec<ClassModel> {
        let content = strip_comments(content);
        let Some(cap) = CLASS_PATTERN.captures(&content) else {
            return Vec::new();
        };

        let name = cap.get(1).map(|m| m.as_str()).unwrap_or("");
        let parent = cap.get(2).map(|m| m.as_str().to_string());

        let fields = FIELD_PATTERN
            .captures_iter(&content)
            .filter(|c| {
                let modifiers = c.get(1).map(|m| m.as_str()).unwrap_or("");
                !modifiers.contains("static")
            })
            .map(|c| {
                let type_name = squash_whitespace(c.get(2).map(|m| m.as_str()).unwrap_or(""));
                let field_name = c.get(3).map(|m| m.as_str()).unwrap_or("");
                Field::new(type_name, field_name)
            })
            .collect();

        vec![ClassModel::new(name, ClassKind::Entity)
            .with_fields(fields)
            .with_parent(parent)]
    }
}

impl ModelParser for JavaControllerParser {
    fn parse_models(&self, content: &str) -> Vec<ClassModel> {
        let content = strip_comments(content);
        let Some(cap) = CLASS_PATTERN.captures(&content) else {
            return Vec::new();
        };

        let name = cap.get(1).map(|m| m.as_str()).unwrap_or("");

        let methods = MAPPING_PATTERN
            .captures_iter(&content)
            .map(|c| Operation {
                http_method: c.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
                return_type: squash_whitespace(c.get(3).map(|m| m.as_str()).unwrap_or("")),
                name: c.get(4).map(|m| m.as_str()).unwrap_or("").to_string(),
            })
            .collect();

        vec![ClassModel::new(name, ClassKind::Controller).with_methods(methods)]
    }
}

/// Resolve every mapped method of a controller to an endpoint, in source
/// order.
pub fn parse_endpoints(content: &str) -> Vec<Endpoint> {
    let content = strip_comments(content);
    let Some(class_cap) = CLASS_PATTERN.captures(&content) else {
        return Vec::new();
    };

    let class_name = class_cap.get(1).map(|m| m.as_str()).unwrap_or("");
    let class_start = class_cap.get(0).map(|m| m.start()).unwrap_or(0);
    let base_path = REQUEST_MAPPING_PATTERN
        .captures(&content[..class_start])
        .and_then(|c| c.get(1))
        .and_then(|args| first_string_literal(args.as_str()))
        .unwrap_or_default();

    MAPPING_PATTERN
        .captures_iter(&content)
        .map(|c| {
            let whole = c.get(0).map(|m| m.end()).unwrap_or(0);
            let sub_path = c
                .get(2)
                .and_then(|args| first_string_literal(args.as_str()))
                .unwrap_or_default();

            let body = find_brace_end(&content, whole)
                .map(|end| &content[whole..end])
                .unwrap_or("");

            Endpoint {
                class_name: class_name.to_string(),
                method_name: c.get(4).map(|m| m.as_str()).unwrap_or("").to_string(),
                http_method: c.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
                path: join_path(&base_path, &sub_path),
                service_calls: extract_service_calls(body),
            }
        })
        .collect()
}

/// Endpoints for the requested method names, in request order. Names with no
/// mapped method are skipped.
pub fn find_endpoints(content: &str, names: &[String]) -> Vec<Endpoint> {
    let all = parse_endpoints(content);
    names
        .iter()
        .filter_map(|name| all.iter().find(|e| &e.method_name == name).cloned())
        .collect()
}

fn extract_service_calls(body: &str) -> Vec<ServiceCall> {
    SERVICE_CALL_PATTERN
        .captures_iter(body)
        .map(|c| ServiceCall {
            service: c.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
            method: c.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
        })
        .collect()
}

fn first_string_literal(args: &str) -> Option<String> {
    STRING_LITERAL
        .captures(args)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// `/tasks` + `/{id}` → `/tasks/{id}`; an empty sub path yields the base and
/// two empty parts yield the root route `/`.
fn join_path(base: &str, sub: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let sub = sub.trim().trim_start_matches('/');

    match (base.is_empty(), sub.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => ensure_leading_slash(base),
        (true, false) => format!("/{}", sub),
        (false, false) => format!("{}/{}", ensure_leading_slash(base), sub),
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
