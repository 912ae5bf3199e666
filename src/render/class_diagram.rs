use std::collections::{HashMap, HashSet};

use crate::analyze::infer_relationships;
use crate::render::dot::{escape_record, Digraph};
use crate::types::{ClassKind, ClassModel, RelationKind};

/// Diagrams with more classes than this get a top-to-bottom layout with extra
/// rank separation.
const LARGE_DIAGRAM_THRESHOLD: usize = 15;

/// Build a record-shaped class diagram with inferred relationships.
///
/// A class defined twice with the same name and kind (the same interface in
/// two `.ts` files, say) is drawn once; the first definition wins. Same-named
/// classes of different kinds get distinct nodes.
pub fn build_class_diagram(classes: &[ClassModel], dpi: u32) -> Digraph {
    let classes = dedupe(classes);
    let ids = node_ids(&classes);

    let mut graph = Digraph::new().with_comment("Class Diagram");
    graph.node_attr("shape", "record");

    for class in &classes {
        let id = node_id(&ids, &class.name, class.kind);
        let label = record_label(class);
        graph.node(id, &[("label", label.as_str())]);
    }

    for rel in infer_relationships(&classes) {
        let from = node_id(&ids, &rel.from, rel.from_kind);
        let to = node_id(&ids, &rel.to, rel.to_kind);
        match rel.kind {
            RelationKind::Association => {
                let label = rel.label.unwrap_or_default();
                graph.edge(from, to, &[("label", label.as_str())]);
            }
            RelationKind::Inheritance => {
                graph.edge(from, to, &[("arrowhead", "empty")]);
            }
        }
    }

    if classes.len() > LARGE_DIAGRAM_THRESHOLD {
        graph.graph_attr("rankdir", "TB");
        graph.graph_attr("ranksep", "1.5");
    }

    graph.graph_attr("size", "50,50");
    graph.graph_attr("dpi", dpi.to_string());

    graph
}

/// `{Name|field: Type\n...|method(): Ret [GetMapping]\n...}`
pub fn record_label(class: &ClassModel) -> String {
    let fields: Vec<String> = class
        .fields
        .iter()
        .map(|f| format!("{}: {}", escape_record(&f.name), escape_record(&f.type_name)))
        .collect();

    let methods: Vec<String> = class
        .methods
        .iter()
        .map(|m| {
            format!(
                "{}(): {} [{}]",
                escape_record(&m.name),
                escape_record(&m.return_type),
                m.http_method
            )
        })
        .collect();

    format!(
        "{{{}|{}|{}}}",
        escape_record(&class.name),
        fields.join("\\n"),
        methods.join("\\n")
    )
}

fn dedupe(classes: &[ClassModel]) -> Vec<ClassModel> {
    let mut seen = HashSet::new();
    classes
        .iter()
        .filter(|c| {
            let fresh = seen.insert((c.name.clone(), c.kind));
            if !fresh {
                tracing::debug!(class = %c.name, kind = c.kind.as_str(), "duplicate class skipped");
            }
            fresh
        })
        .cloned()
        .collect()
}

/// Plain class names are used as node ids unless the name is shared by
/// classes of different kinds, in which case the kind is appended.
fn node_ids(classes: &[ClassModel]) -> HashMap<(String, ClassKind), String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for class in classes {
        *counts.entry(class.name.as_str()).or_default() += 1;
    }

    classes
        .iter()
        .map(|c| {
            let id = if counts.get(c.name.as_str()).copied().unwrap_or(0) > 1 {
                format!("{} ({})", c.name, c.kind.as_str())
            } else {
                c.name.clone()
            };
            ((c.name.clone(), c.kind), id)
        })
        .collect()
}

fn node_id(ids: &HashMap<(String, ClassKind), String>, name: &str, kind: ClassKind) -> String {
    ids.get(&(name.to_string(), kind))
        .cloned()
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Operation};

    fn class(name: &str, kind: ClassKind, fields: &[(&str, &str)]) -> ClassModel {
        ClassModel::new(name, kind).with_fields(
            fields
                .iter()
                .map(|(t, n)| Field::new(*t, *n))
                .collect(),
        )
    }

    #[test]
    fn test_record_label() {
        let task = class(
            "Task",
            ClassKind::Entity,
            &[("String", "name"), ("List<Tag>", "tags")],
        );
        assert_eq!(
            record_label(&task),
            r"{Task|name: String\ntags: List\<Tag\>|}"
        );

        let controller = ClassModel::new("TaskController", ClassKind::Controller).with_methods(vec![
            Operation {
                http_method: "GetMapping".to_string(),
                return_type: "Result<TaskDTO>".to_string(),
                name: "getTask".to_string(),
            },
        ]);
        assert_eq!(
            record_label(&controller),
            r"{TaskController||getTask(): Result\<TaskDTO\> [GetMapping]}"
        );
    }

    #[test]
    fn test_edges_follow_field_types() {
        let classes = vec![
            class("Task", ClassKind::Entity, &[("Project", "project")]),
            class("Project", ClassKind::Entity, &[]),
        ];
        let graph = build_class_diagram(&classes, 300);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].from, "Task");
        assert_eq!(graph.edges[0].to, "Project");
        assert_eq!(graph.graph_attr_value("dpi"), Some("300"));
        assert_eq!(graph.graph_attr_value("size"), Some("50,50"));
        assert_eq!(graph.graph_attr_value("rankdir"), None);
    }

    #[test]
    fn test_large_diagram_layout() {
        let classes: Vec<ClassModel> = (0..16)
            .map(|i| class(&format!("C{}", i), ClassKind::Entity, &[]))
            .collect();
        let graph = build_class_diagram(&classes, 300);
        assert_eq!(graph.graph_attr_value("rankdir"), Some("TB"));
        assert_eq!(graph.graph_attr_value("ranksep"), Some("1.5"));

        let small = build_class_diagram(&classes[..15], 300);
        assert_eq!(small.graph_attr_value("rankdir"), None);
    }

    #[test]
    fn test_same_name_different_kind_gets_distinct_nodes() {
        let classes = vec![
            class("Task", ClassKind::Entity, &[("Project", "project")]),
            class("Project", ClassKind::Entity, &[]),
            class("Task", ClassKind::Interface, &[("Project", "project")]),
            class("Project", ClassKind::Interface, &[]),
        ];
        let graph = build_class_diagram(&classes, 300);

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Task (entity)",
                "Project (entity)",
                "Task (interface)",
                "Project (interface)"
            ]
        );

        let edges: Vec<(&str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("Task (entity)", "Project (entity)"),
                ("Task (interface)", "Project (interface)")
            ]
        );
    }

    #[test]
    fn test_duplicate_definitions_collapse() {
        let classes = vec![
            class("Task", ClassKind::Interface, &[("string", "id")]),
            class("Task", ClassKind::Interface, &[("number", "id")]),
        ];
        let graph = build_class_diagram(&classes, 300);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.nodes[0].attrs[0].1.contains("id: string"));
    }

    #[test]
    fn test_inheritance_edge_style() {
        let classes = vec![
            class("Task", ClassKind::Entity, &[]).with_parent(Some("BaseEntity".to_string())),
            class("BaseEntity", ClassKind::Entity, &[]),
        ];
        let graph = build_class_diagram(&classes, 300);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(
            graph.edges[0].attrs,
            vec![("arrowhead".to_string(), "empty".to_string())]
        );
    }
}
