//! Relationship inference: a field whose type mentions another class's name
//! becomes an association edge to that class.

use crate::types::{ClassModel, RelationKind, Relationship};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap());

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"'[^']*'|"[^"]*"|`[^`]*`"#).unwrap());

/// Type names mentioned by a type expression: the outer type, generic
/// arguments, array element types and union members. String literal types
/// are ignored.
///
/// `List<Tag>` → `[List, Tag]`, `TaskFile[] | null` → `[TaskFile, null]`
pub fn referenced_type_names(type_expr: &str) -> Vec<String> {
    let without_literals = QUOTED.replace_all(type_expr, " ");
    let mut seen = HashSet::new();
    IDENTIFIER
        .find_iter(&without_literals)
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Infer edges between the classes of one diagram.
///
/// Associations are deduplicated per (source, target) pair and labelled with
/// the field names that produced them, in declaration order. When a name is
/// defined more than once, a target on the same side (backend or frontend)
/// as the source wins.
pub fn infer_relationships(classes: &[ClassModel]) -> Vec<Relationship> {
    let mut relationships: Vec<Relationship> = Vec::new();

    for class in classes {
        let mut targets: Vec<(&ClassModel, Vec<String>)> = Vec::new();

        for field in &class.fields {
            for name in referenced_type_names(&field.type_name) {
                let Some(target) = resolve(classes, class, &name) else {
                    continue;
                };
                match targets
                    .iter_mut()
                    .find(|(t, _)| t.name == target.name && t.kind == target.kind)
                {
                    Some((_, fields)) => {
                        if !fields.contains(&field.name) {
                            fields.push(field.name.clone());
                        }
                    }
                    None => targets.push((target, vec![field.name.clone()])),
                }
            }
        }

        for (target, fields) in targets {
            relationships.push(Relationship {
                from: class.name.clone(),
                from_kind: class.kind,
                to: target.name.clone(),
                to_kind: target.kind,
                kind: RelationKind::Association,
                label: Some(fields.join(", ")),
            });
        }

        if let Some(parent) = &class.parent {
            if let Some(target) = resolve(classes, class, parent) {
                relationships.push(Relationship {
                    from: class.name.clone(),
                    from_kind: class.kind,
                    to: target.name.clone(),
                    to_kind: target.kind,
                    kind: RelationKind::Inheritance,
                    label: None,
                });
            }
        }
    }

    tracing::debug!(
        classes = classes.len(),
        relationships = relationships.len(),
        "inferred relationships"
    );

    relationships
}

fn resolve<'a>(classes: &'a [ClassModel], from: &ClassModel, name: &str) -> Option<&'a ClassModel> {
    let side = from.kind.is_frontend();
    classes
        .iter()
        .find(|c| c.name == name && c.kind.is_frontend() == side)
        .or_else(|| classes.iter().find(|c| c.name == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassKind, Field};

    fn entity(name: &str, fields: &[(&str, &str)]) -> ClassModel {
        ClassModel::new(name, ClassKind::Entity).with_fields(
            fields
                .iter()
                .map(|(t, n)| Field::new(*t, *n))
                .collect(),
        )
    }

    #[test]
    fn test_referenced_type_names() {
        assert_eq!(referenced_type_names("String"), vec!["String"]);
        assert_eq!(referenced_type_names("List<Tag>"), vec!["List", "Tag"]);
        assert_eq!(
            referenced_type_names("Map<String, List<Task>>"),
            vec!["Map", "String", "List", "Task"]
        );
        assert_eq!(
            referenced_type_names("TaskFile[] | null"),
            vec!["TaskFile", "null"]
        );
        assert!(referenced_type_names("'HIGH' | 'LOW'").is_empty());
    }

    #[test]
    fn test_field_type_matches_class_name() {
        let classes = vec![
            entity("Task", &[("Project", "project"), ("String", "name")]),
            entity("Project", &[("Long", "id")]),
        ];

        let rels = infer_relationships(&classes);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].from, "Task");
        assert_eq!(rels[0].to, "Project");
        assert_eq!(rels[0].kind, RelationKind::Association);
        assert_eq!(rels[0].label.as_deref(), Some("project"));
    }

    #[test]
    fn test_generic_argument_matches() {
        let classes = vec![
            entity("Task", &[("List<Tag>", "tags")]),
            entity("Tag", &[]),
        ];

        let rels = infer_relationships(&classes);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].to, "Tag");
    }

    #[test]
    fn test_duplicate_edges_are_merged() {
        let classes = vec![
            entity(
                "Notification",
                &[("User", "targetUser"), ("User", "sender")],
            ),
            entity("User", &[]),
        ];

        let rels = infer_relationships(&classes);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].label.as_deref(), Some("targetUser, sender"));
    }

    #[test]
    fn test_self_reference() {
        let classes = vec![entity("Comment", &[("Comment", "parentComment")])];
        let rels = infer_relationships(&classes);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].from, "Comment");
        assert_eq!(rels[0].to, "Comment");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let classes = vec![entity("Task", &[("project", "p")]), entity("Project", &[])];
        assert!(infer_relationships(&classes).is_empty());
    }

    #[test]
    fn test_inheritance_only_when_parent_present() {
        let classes = vec![
            entity("Task", &[]).with_parent(Some("BaseEntity".to_string())),
            entity("Tag", &[]).with_parent(Some("Missing".to_string())),
            entity("BaseEntity", &[]),
        ];

        let rels = infer_relationships(&classes);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationKind::Inheritance);
        assert_eq!(rels[0].to, "BaseEntity");
    }
}
