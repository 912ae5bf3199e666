//! Minimal Graphviz DOT document model.
//!
//! Every id and attribute value is emitted quoted, so callers never deal with
//! DOT's identifier rules.

use std::fmt::Write;

pub type Attrs = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Digraph {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub graph_attrs: Attrs,
    pub node_attrs: Attrs,
    pub edge_attrs: Attrs,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Digraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set a graph attribute, replacing an earlier value for the same key.
    pub fn graph_attr(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        set_attr(&mut self.graph_attrs, key, value.into());
        self
    }

    pub fn node_attr(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        set_attr(&mut self.node_attrs, key, value.into());
        self
    }

    pub fn edge_attr(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        set_attr(&mut self.edge_attrs, key, value.into());
        self
    }

    pub fn node(&mut self, id: impl Into<String>, attrs: &[(&str, &str)]) -> &mut Self {
        self.nodes.push(Node {
            id: id.into(),
            attrs: to_attrs(attrs),
        });
        self
    }

    pub fn edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        attrs: &[(&str, &str)],
    ) -> &mut Self {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            attrs: to_attrs(attrs),
        });
        self
    }

    pub fn graph_attr_value(&self, key: &str) -> Option<&str> {
        self.graph_attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render the graph as DOT source.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();

        if let Some(comment) = &self.comment {
            for line in comment.lines() {
                let _ = writeln!(out, "// {}", line);
            }
        }

        match &self.name {
            Some(name) => {
                let _ = writeln!(out, "digraph {} {{", quote(name));
            }
            None => out.push_str("digraph {\n"),
        }

        for (key, value) in &self.graph_attrs {
            let _ = writeln!(out, "\t{}={}", key, quote(value));
        }
        if !self.node_attrs.is_empty() {
            let _ = writeln!(out, "\tnode {}", attr_list(&self.node_attrs));
        }
        if !self.edge_attrs.is_empty() {
            let _ = writeln!(out, "\tedge {}", attr_list(&self.edge_attrs));
        }

        for node in &self.nodes {
            if node.attrs.is_empty() {
                let _ = writeln!(out, "\t{}", quote(&node.id));
            } else {
                let _ = writeln!(out, "\t{} {}", quote(&node.id), attr_list(&node.attrs));
            }
        }

        for edge in &self.edges {
            let _ = write!(out, "\t{} -> {}", quote(&edge.from), quote(&edge.to));
            if !edge.attrs.is_empty() {
                let _ = write!(out, " {}", attr_list(&edge.attrs));
            }
            out.push('\n');
        }

        out.push_str("}\n");
        out
    }
}

fn set_attr(attrs: &mut Attrs, key: &str, value: String) {
    match attrs.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => attrs.push((key.to_string(), value)),
    }
}

fn to_attrs(attrs: &[(&str, &str)]) -> Attrs {
    attrs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn attr_list(attrs: &Attrs) -> String {
    let parts: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{}={}", k, quote(v)))
        .collect();
    format!("[{}]", parts.join(" "))
}

/// Quote a DOT string. Backslash escapes such as `\n`, `\l` and `\{` are
/// passed through for Graphviz to interpret; only `"` and line breaks are
/// escaped here.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                // A trailing backslash would escape the closing quote
                match chars.next() {
                    Some(next) => out.push(next),
                    None => out.push('\\'),
                }
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape text for use inside a `shape=record` label, where `{ } | < >` are
/// structural.
pub fn escape_record(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '<' | '>' | '{' | '}' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("Task"), "\"Task\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\nb"), "\"a\\nb\"");
        assert_eq!(quote(r"keep\lescape"), r#""keep\lescape""#);
        assert_eq!(quote("trailing\\"), "\"trailing\\\\\"");
    }

    #[test]
    fn test_escape_record() {
        assert_eq!(escape_record("List<Tag>"), r"List\<Tag\>");
        assert_eq!(escape_record("{ a | b }"), r"\{ a \| b \}");
    }

    #[test]
    fn test_to_dot() {
        let mut graph = Digraph::new().named("G").with_comment("Class Diagram");
        graph.graph_attr("rankdir", "TB");
        graph.node_attr("shape", "record");
        graph.node("Task", &[("label", "{Task||}")]);
        graph.node("Project", &[]);
        graph.edge("Task", "Project", &[("label", "project")]);

        let dot = graph.to_dot();
        assert!(dot.starts_with("// Class Diagram\ndigraph \"G\" {\n"));
        assert!(dot.contains("\trankdir=\"TB\"\n"));
        assert!(dot.contains("\tnode [shape=\"record\"]\n"));
        assert!(dot.contains("\t\"Task\" [label=\"{Task||}\"]\n"));
        assert!(dot.contains("\t\"Project\"\n"));
        assert!(dot.contains("\t\"Task\" -> \"Project\" [label=\"project\"]\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_graph_attr_replaces() {
        let mut graph = Digraph::new();
        graph.graph_attr("dpi", "300");
        graph.graph_attr("dpi", "600");
        assert_eq!(graph.graph_attrs.len(), 1);
        assert_eq!(graph.graph_attr_value("dpi"), Some("600"));
    }
}
