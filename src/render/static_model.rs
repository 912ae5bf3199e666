//! Hand-authored diagrams described in TOML: the logical design class
//! diagram, the domain model and the use-case diagram ship embedded, and a
//! project can replace any of them with its own file.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::render::dot::{escape_record, Digraph};

const DESIGN_MODEL: &str = include_str!("../../assets/design.toml");
const DOMAIN_MODEL: &str = include_str!("../../assets/domain.toml");
const USE_CASE_MODEL: &str = include_str!("../../assets/use_case.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinModel {
    Design,
    Domain,
    UseCase,
}

impl BuiltinModel {
    pub fn source(&self) -> &'static str {
        match self {
            BuiltinModel::Design => DESIGN_MODEL,
            BuiltinModel::Domain => DOMAIN_MODEL,
            BuiltinModel::UseCase => USE_CASE_MODEL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinModel::Design => "design",
            BuiltinModel::Domain => "domain",
            BuiltinModel::UseCase => "use-case",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticModel {
    /// Output file stem
    pub name: String,
    #[serde(default)]
    pub graph_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Caption drawn under the graph
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_fontsize: Option<String>,
    #[serde(default)]
    pub graph: BTreeMap<String, String>,
    #[serde(default)]
    pub node_defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub edge_defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: Vec<ClassNode>,
    #[serde(default)]
    pub nodes: Vec<PlainNode>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    /// Extra renders of the same graph with a different format or dpi
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A UML class box; attributes and operations are drawn left-aligned.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassNode {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlainNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub dpi: Option<u32>,
}

impl StaticModel {
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let model: StaticModel = toml::from_str(source).map_err(|e| Error::Model {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        model.validate()?;
        Ok(model)
    }

    pub fn builtin(model: BuiltinModel) -> Result<Self> {
        Self::parse(model.as_str(), model.source())
    }

    /// Load the user file when given, otherwise the embedded model.
    pub fn load(model: BuiltinModel, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                Self::parse(&path.display().to_string(), &source)
            }
            None => Self::builtin(model),
        }
    }

    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for id in self
            .classes
            .iter()
            .map(|c| &c.name)
            .chain(self.nodes.iter().map(|n| &n.id))
        {
            if !ids.insert(id.as_str()) {
                return Err(self.invalid(format!("node `{}` is defined twice", id)));
            }
        }

        for edge in &self.edges {
            for end in [&edge.from, &edge.to] {
                if !ids.contains(end.as_str()) {
                    return Err(self.invalid(format!(
                        "edge {} -> {} references unknown node `{}`",
                        edge.from, edge.to, end
                    )));
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, message: String) -> Error {
        Error::Model {
            name: self.name.clone(),
            message,
        }
    }

    pub fn to_digraph(&self) -> Digraph {
        let mut graph = Digraph::new();
        if let Some(name) = &self.graph_name {
            graph = graph.named(name);
        }
        if let Some(comment) = &self.comment {
            graph = graph.with_comment(comment);
        }

        for (key, value) in &self.graph {
            graph.graph_attr(key, value.as_str());
        }
        for (key, value) in &self.node_defaults {
            graph.node_attr(key, value.as_str());
        }
        for (key, value) in &self.edge_defaults {
            graph.edge_attr(key, value.as_str());
        }

        for class in &self.classes {
            let label = class_label(class);
            let mut attrs = vec![("label", label.as_str())];
            attrs.extend(class.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            graph.node(class.name.as_str(), &attrs);
        }

        for node in &self.nodes {
            let mut attrs: Vec<(&str, &str)> = Vec::new();
            if let Some(label) = &node.label {
                attrs.push(("label", label.as_str()));
            }
            attrs.extend(node.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            graph.node(node.id.as_str(), &attrs);
        }

        for edge in &self.edges {
            let mut attrs: Vec<(&str, &str)> = Vec::new();
            if let Some(label) = &edge.label {
                attrs.push(("label", label.as_str()));
            }
            attrs.extend(edge.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            graph.edge(edge.from.as_str(), edge.to.as_str(), &attrs);
        }

        if let Some(title) = &self.title {
            graph.graph_attr("label", format!("\n{}\n", title));
            if let Some(size) = &self.title_fontsize {
                graph.graph_attr("fontsize", size.as_str());
            }
        }

        graph
    }
}

/// `{Name|+ id: Long\l+ name: String\l|+ login()\l}`
fn class_label(class: &ClassNode) -> String {
    format!(
        "{{{}|{}|{}}}",
        escape_record(&class.name),
        section(&class.attributes),
        section(&class.operations)
    )
}

fn section(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("{}\\l", escape_record(line)))
        .collect()
}
