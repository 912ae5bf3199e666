use crate::types::{ApiCall, Endpoint};
use regex::Regex;

/// Regex source matching a route template: literal segments are escaped,
/// `{id}` placeholders match any single path segment (including `${expr}`
/// template interpolations).
fn path_pattern(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    let mut pattern = String::new();
    let mut rest = trimmed;

    while let Some(open) = rest.find('{') {
        pattern.push_str(&regex::escape(&rest[..open]));
        match rest[open..].find('}') {
            Some(close) => {
                pattern.push_str(r#"[^/'"`]+"#);
                rest = &rest[open + close + 1..];
            }
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    pattern.push_str(&regex::escape(rest));
    pattern
}

/// Build the call-site matcher for one endpoint: `client.verb(` or
/// `client.verb<T>(` (one level of nested generics) with a string or
/// template literal naming the path, optionally prefixed by `api` or `/api`.
fn call_pattern(endpoint: &Endpoint) -> Option<Regex> {
    if endpoint.path.is_empty() {
        return None;
    }

    let source = format!(
        r#"(\w+)\.{verb}(?:\s*<(?:[^<>()]|<[^<>()]*>)*>)?\s*\(\s*['"`](?:/?api)?/?{path}['"`?]"#,
        verb = regex::escape(&endpoint.verb()),
        path = path_pattern(&endpoint.path),
    );

    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(path = %endpoint.path, error = %e, "skipping unmatchable endpoint path");
            None
        }
    }
}

/// Find frontend calls in one view file that target the given endpoints.
pub fn find_api_calls(view_file: &str, content: &str, endpoints: &[Endpoint]) -> Vec<ApiCall> {
    let mut calls = Vec::new();

    for endpoint in endpoints {
        let Some(re) = call_pattern(endpoint) else {
            continue;
        };

        for cap in re.captures_iter(content) {
            calls.push(ApiCall {
                view_file: view_file.to_string(),
                api_client: cap.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
                http_method: endpoint.verb(),
                path: endpoint.path.clone(),
                controller_method: endpoint.method_name.clone(),
            });
        }
    }

    calls
}
