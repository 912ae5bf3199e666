use crate::analyze::lang::ModelParser;
use crate::analyze::source::{find_brace_end, squash_whitespace, strip_comments};
use crate::types::{ClassKind, ClassModel, Field};
use once_cell::sync::Lazy;
use regex::Regex;

/// `export interface` and `export type X = { ... }` declarations.
pub struct TypeScriptParser;

static INTERFACE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+interface\s+(\w+)(?:\s*<[^>{]*>)?(?:\s+extends\s+([\w.]+)[^{]*)?\s*\{")
        .unwrap()
});

static TYPE_ALIAS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+type\s+(\w+)(?:\s*<[^>=]*>)?\s*=\s*\{").unwrap()
});

static PROPERTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:readonly\s+)?(\w+)\??\s*:\s*(.+)$").unwrap()
});

impl ModelParser for TypeScriptParser {
    fn parse_models(&self, content: &str) -> Vec<ClassModel> {
        let content = strip_comments(content);
        let mut models: Vec<(usize, ClassModel)> = Vec::new();

        for cap in INTERFACE_PATTERN.captures_iter(&content) {
            let Some(whole) = cap.get(0) else { continue };
            let name = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let parent = cap.get(2).map(|m| m.as_str().to_string());

            let fields = body_at(&content, whole.end() - 1)
                .map(parse_properties)
                .unwrap_or_default();

            models.push((
                whole.start(),
                ClassModel::new(name, ClassKind::Interface)
                    .with_fields(fields)
                    .with_parent(parent),
            ));
        }

        for cap in TYPE_ALIAS_PATTERN.captures_iter(&content) {
            let Some(whole) = cap.get(0) else { continue };
            let name = cap.get(1).map(|m| m.as_str()).unwrap_or("");

            let fields = body_at(&content, whole.end() - 1)
                .map(parse_properties)
                .unwrap_or_default();

            models.push((
                whole.start(),
                ClassModel::new(name, ClassKind::TypeAlias).with_fields(fields),
            ));
        }

        // Declaration order across both kinds
        models.sort_by_key(|(offset, _)| *offset);
        models.into_iter().map(|(_, model)| model).collect()
    }
}

fn body_at(content: &str, open: usize) -> Option<&str> {
    let close = find_brace_end(content, open)?;
    Some(&content[open + 1..close])
}

/// Split an object body into top-level members and keep those shaped like
/// `name?: Type`. Method signatures and index signatures are skipped.
fn parse_properties(body: &str) -> Vec<Field> {
    split_members(body)
        .into_iter()
        .filter_map(|member| {
            let member = squash_whitespace(member);
            let cap = PROPERTY_PATTERN.captures(&member)?;
            let name = cap.get(1)?.as_str();
            // A union written one member per line starts with `|`
            let type_name = cap.get(2)?.as_str().trim().trim_start_matches('|').trim();
            if type_name.is_empty() {
                return None;
            }
            Some(Field::new(type_name, name))
        })
        .collect()
}

/// Members end at `;`, `,` or a newline that is not nested inside braces,
/// brackets, parentheses or generic arguments. A newline does not end a
/// member whose type is still open (`status:` or a trailing `|`) or whose
/// next line continues a union with `|`.
fn split_members(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut members = Vec::new();
    let mut depth = 0i32;
    let mut angle = 0i32;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth -= 1,
            b'<' => angle += 1,
            b'>' if angle > 0 && (i == 0 || bytes[i - 1] != b'=') => angle -= 1,
            b'\n' if depth <= 0 && angle <= 0 && continues_type(body, start, i) => {}
            b';' | b',' | b'\n' if depth <= 0 && angle <= 0 => {
                members.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < body.len() {
        members.push(&body[start..]);
    }

    members
        .into_iter()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .collect()
}

fn continues_type(body: &str, start: usize, newline: usize) -> bool {
    let pending = body[start..newline].trim_end();
    let next = body[newline + 1..].trim_start();
    pending.ends_with(':') || pending.ends_with('|') || next.starts_with('|')
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK_TYPES: &str = r#"
// task detail
export interface TaskDetail {
  id: string
  name: string
  priority: 'CRITICAL' | 'HIGH' | 'MEDIUM' | 'LOW'
  files: TaskFile[]
  comments?: TaskComment[] // optional
  meta: {
    created: string
    tags: string[]
  }
  counts: Record<string, number>;
  onChange(value: string): void
}

export interface TaskFile {
  id: string; name: string; size: number
}

export type Paged = {
  items: TaskDetail[],
  total: number,
}
"#;

    #[test]
    fn test_interfaces_and_type_aliases() {
        let models = TypeScriptParser.parse_models(TASK_TYPES);
        let names: Vec<(&str, ClassKind)> =
            models.iter().map(|m| (m.name.as_str(), m.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("TaskDetail", ClassKind::Interface),
                ("TaskFile", ClassKind::Interface),
                ("Paged", ClassKind::TypeAlias),
            ]
        );
    }

    #[test]
    fn test_property_types() {
        let models = TypeScriptParser.parse_models(TASK_TYPES);
        let detail = &models[0];

        let fields: Vec<(&str, &str)> = detail
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();

        assert_eq!(
            fields,
            vec![
                ("id", "string"),
                ("name", "string"),
                ("priority", "'CRITICAL' | 'HIGH' | 'MEDIUM' | 'LOW'"),
                ("files", "TaskFile[]"),
                ("comments", "TaskComment[]"),
                ("meta", "{ created: string tags: string[] }"),
                ("counts", "Record<string, number>"),
            ]
        );
    }

    #[test]
    fn test_single_line_members() {
        let models = TypeScriptParser.parse_models(TASK_TYPES);
        let file = &models[1];
        let names: Vec<&str> = file.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "size"]);

        let paged = &models[2];
        assert_eq!(paged.fields.len(), 2);
        assert_eq!(paged.fields[0].type_name, "TaskDetail[]");
    }

    #[test]
    fn test_union_continued_on_following_lines() {
        let src = "export interface Task {\n  status:\n    | 'TODO'\n    | 'DONE'\n  owner: User |\n    null\n  name: string\n}\n";
        let models = TypeScriptParser.parse_models(src);

        let fields: Vec<(&str, &str)> = models[0]
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("status", "'TODO' | 'DONE'"),
                ("owner", "User | null"),
                ("name", "string"),
            ]
        );
    }

    #[test]
    fn test_mixed_declarations_keep_source_order() {
        let src = r#"
export type Page = { total: number }
export interface Task { id: number }
export type Filter = { keyword: string }
export interface Project { id: number }
"#;
        let models = TypeScriptParser.parse_models(src);
        let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Page", "Task", "Filter", "Project"]);
    }

    #[test]
    fn test_interface_extends() {
        let models =
            TypeScriptParser.parse_models("export interface Admin extends User, Auditable { level: number }");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].parent.as_deref(), Some("User"));
        assert_eq!(models[0].fields.len(), 1);
    }

    #[test]
    fn test_non_exported_declarations_ignored() {
        let models = TypeScriptParser.parse_models("interface Local { a: string }");
        assert!(models.is_empty());
    }
}
