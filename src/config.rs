//! Project configuration loaded from `umlgen.toml`.
//!
//! Every field has a default that matches the task-management project
//! layout, so running without a config file works out of the box.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "umlgen.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "@diagrams";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: String,
    pub format: OutputFormat,
    pub dpi: u32,
    pub dot_command: String,
    /// Descend into subdirectories of the source directories
    pub recursive: bool,
    pub sources: SourcesConfig,
    pub models: ModelsConfig,
    pub scenarios: Vec<Scenario>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            format: OutputFormat::Png,
            dpi: 300,
            dot_command: "dot".to_string(),
            recursive: false,
            sources: SourcesConfig::default(),
            models: ModelsConfig::default(),
            scenarios: default_scenarios(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub entity_dir: String,
    pub controller_dir: String,
    pub types_dir: String,
    /// Root that scenario view paths are relative to
    pub frontend_dir: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            entity_dir: "backend/guinea-pig-pojo/src/main/java/com/taskManagement/entity"
                .to_string(),
            controller_dir:
                "backend/guinea-pig-server/src/main/java/com/taskManagement/controller"
                    .to_string(),
            types_dir: "frontend/src/types".to_string(),
            frontend_dir: "frontend/src".to_string(),
        }
    }
}

/// Optional replacements for the embedded static diagram models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
}

/// A user-visible flow rendered as one sequence diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Controller file name inside the controller directory
    pub controller: String,
    pub methods: Vec<String>,
    #[serde(default)]
    pub views: Vec<String>,
}

impl Scenario {
    fn new(
        name: &str,
        title: &str,
        description: &str,
        controller: &str,
        methods: &[&str],
        views: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            controller: controller.to_string(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
            views: views.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// `TaskController.java` → `TaskController`
    pub fn controller_name(&self) -> &str {
        self.controller
            .strip_suffix(".java")
            .unwrap_or(&self.controller)
    }
}

pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "user_authentication",
            "User Authentication",
            "Login, registration and fetching the current user",
            "UserController.java",
            &["login", "register", "getCurrentUser", "logout"],
            &["views/auth/login.vue", "views/auth/register.vue", "api/user.ts"],
        ),
        Scenario::new(
            "task_management",
            "Task Management",
            "Creating, viewing, updating and deleting tasks",
            "TaskController.java",
            &[
                "createTask",
                "getTaskList",
                "getTaskDetail",
                "updateTask",
                "deleteTask",
            ],
            &["views/task/list.vue", "views/task/detail.vue", "api/task.ts"],
        ),
        Scenario::new(
            "project_management",
            "Project Management",
            "Creating, viewing, updating and deleting projects",
            "ProjectController.java",
            &[
                "createProject",
                "getProjectList",
                "getProjectDetail",
                "updateProject",
                "deleteProject",
            ],
            &[
                "views/project/list.vue",
                "views/project/detail.vue",
                "api/project.ts",
            ],
        ),
        Scenario::new(
            "task_comment",
            "Task Comments",
            "Adding, viewing and deleting task comments",
            "TaskController.java",
            &["getTaskComments", "createComment", "deleteComment"],
            &["views/task/detail.vue", "api/task.ts"],
        ),
        Scenario::new(
            "file_upload",
            "File Upload",
            "Uploading task and project attachments",
            "FileController.java",
            &["uploadFile", "uploadTaskFile", "uploadProjectFile"],
            &["views/task/detail.vue", "views/project/detail.vue", "api/file.ts"],
        ),
    ]
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config file, or `umlgen.toml` under `root` if it
    /// exists, or fall back to defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            tracing::debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.output_dir)
    }
}

/// Join `path` onto `root` unless it is already absolute.
pub fn resolve(root: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}
