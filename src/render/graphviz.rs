use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::{Config, OutputFormat};
use crate::error::{Error, Result};
use crate::render::dot::Digraph;

/// What ended up on disk for one diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered(PathBuf),
    /// Graphviz was skipped or failed; the DOT source was written instead.
    DotSaved { path: PathBuf, reason: Option<String> },
}

impl RenderOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RenderOutcome::Rendered(path) => path,
            RenderOutcome::DotSaved { path, .. } => path,
        }
    }
}

/// Writes diagrams into the output directory through the Graphviz `dot`
/// binary.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub dot_command: String,
    /// Write `.dot` files without invoking Graphviz
    pub dot_only: bool,
}

impl Renderer {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
            dot_command: "dot".to_string(),
            dot_only: false,
        }
    }

    pub fn from_config(root: &Path, config: &Config, dot_only: bool) -> Self {
        Self {
            output_dir: config.output_path(root),
            format: config.format,
            dot_command: config.dot_command.clone(),
            dot_only,
        }
    }

    pub fn render(&self, name: &str, graph: &Digraph) -> Result<RenderOutcome> {
        self.render_as(name, graph, self.format)
    }

    /// Render with an explicit format and, when given, a dpi override.
    pub fn render_variant(
        &self,
        name: &str,
        graph: &Digraph,
        format: Option<OutputFormat>,
        dpi: Option<u32>,
    ) -> Result<RenderOutcome> {
        match dpi {
            Some(dpi) => {
                let mut graph = graph.clone();
                graph.graph_attr("dpi", dpi.to_string());
                self.render_as(name, &graph, format.unwrap_or(self.format))
            }
            None => self.render_as(name, graph, format.unwrap_or(self.format)),
        }
    }

    fn render_as(&self, name: &str, graph: &Digraph, format: OutputFormat) -> Result<RenderOutcome> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;
        let source = graph.to_dot();

        if self.dot_only {
            let path = self.save_dot(name, &source)?;
            return Ok(RenderOutcome::DotSaved { path, reason: None });
        }

        let target = self
            .output_dir
            .join(format!("{}.{}", name, format.extension()));

        match self.run_dot(name, &source, format, &target) {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "rendered diagram");
                Ok(RenderOutcome::Rendered(target))
            }
            Err(e) => {
                tracing::warn!(diagram = name, error = %e, "graphviz failed, keeping DOT source");
                let path = self.save_dot(name, &source)?;
                Ok(RenderOutcome::DotSaved {
                    path,
                    reason: Some(e.to_string()),
                })
            }
        }
    }

    fn save_dot(&self, name: &str, source: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.dot", name));
        fs::write(&path, source).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }

    fn run_dot(&self, name: &str, source: &str, format: OutputFormat, target: &Path) -> Result<()> {
        let render_err = |message: String| Error::Render {
            name: name.to_string(),
            message,
        };

        let mut child = Command::new(&self.dot_command)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(target)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| render_err(format!("could not run `{}`: {}", self.dot_command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(source.as_bytes()) {
                drop(stdin);
                // Reap the child before reporting the broken pipe
                let _ = child.kill();
                let status = child.wait();
                tracing::debug!(diagram = name, ?status, "dot exited before reading its input");
                return Err(render_err(format!("failed to feed `{}`: {}", self.dot_command, e)));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| render_err(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(render_err(if stderr.is_empty() {
                format!("`{}` exited with {}", self.dot_command, output.status)
            } else {
                stderr
            }))
        }
    }
}
