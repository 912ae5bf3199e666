use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::{infer_relationships, ScenarioModel};
use crate::error::{Error, Result};
use crate::types::{ApiCall, ClassKind, ClassModel, Endpoint, Relationship};

pub const CLASS_DATA_FILE: &str = "class_data.json";
pub const SEQUENCE_DATA_FILE: &str = "sequence_data.json";

#[derive(Serialize)]
pub struct ClassData {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ClassSummary,
    pub classes: Vec<ClassModel>,
    pub relationships: Vec<Relationship>,
}

#[derive(Serialize)]
pub struct ClassSummary {
    pub entities: usize,
    pub controllers: usize,
    pub frontend_types: usize,
}

impl ClassData {
    pub fn new(classes: &[ClassModel]) -> Self {
        let count = |kind: ClassKind| classes.iter().filter(|c| c.kind == kind).count();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            summary: ClassSummary {
                entities: count(ClassKind::Entity),
                controllers: count(ClassKind::Controller),
                frontend_types: classes.iter().filter(|c| c.kind.is_frontend()).count(),
            },
            classes: classes.to_vec(),
            relationships: infer_relationships(classes),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEntry {
    pub scenario: String,
    pub title: String,
    pub description: String,
    pub methods: Vec<Endpoint>,
    pub api_calls: Vec<ApiCall>,
    pub diagram_path: String,
}

impl SequenceEntry {
    pub fn new(model: &ScenarioModel, diagram_path: &Path) -> Self {
        Self {
            scenario: model.name.clone(),
            title: model.title.clone(),
            description: model.description.clone(),
            methods: model.endpoints.clone(),
            api_calls: model.api_calls.clone(),
            diagram_path: diagram_path.display().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct SequenceData {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub scenarios: Vec<SequenceEntry>,
}

impl SequenceData {
    pub fn new(scenarios: Vec<SequenceEntry>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            scenarios,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Write `contents` to `file_name` inside `output_dir`, creating the
/// directory when needed.
pub fn write_data(output_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    let path = output_dir.join(file_name);
    fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}
