use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::render::RenderOutcome;

static DIAGRAM: Emoji<'_, '_> = Emoji("📐 ", "");
static DATA: Emoji<'_, '_> = Emoji("🗂  ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");

/// Console reporter; everything except errors is silenced by `--quiet`.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn spinner(&self, message: impl Into<String>) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}{}", DIAGRAM, style(title).cyan().bold());
        }
    }

    pub fn outcome(&self, outcome: &RenderOutcome) {
        if self.quiet {
            return;
        }
        match outcome {
            RenderOutcome::Rendered(path) => {
                println!("  {} {}", style("✓").green(), style(path.display()).green());
            }
            RenderOutcome::DotSaved { path, reason: None } => {
                println!("  {} {}", style("✓").green(), style(path.display()).cyan());
            }
            RenderOutcome::DotSaved {
                path,
                reason: Some(reason),
            } => {
                println!(
                    "  {}{} {}",
                    WARN,
                    style(path.display()).yellow(),
                    style(format!("(graphviz failed: {})", reason)).dim()
                );
            }
        }
    }

    pub fn data_file(&self, path: &Path) {
        if !self.quiet {
            println!("  {}{}", DATA, style(path.display()).dim());
        }
    }

    pub fn count(&self, label: &str, count: usize) {
        if !self.quiet {
            println!("  {:<18}{}", label, style(count).cyan());
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("\n{}{}", SUCCESS, style(message).green().bold());
        }
    }

    pub fn warn(&self, message: &str) {
        if !self.quiet {
            println!("  {}{}", WARN, style(message).yellow());
        }
    }
}

pub fn print_error(message: &str) {
    eprintln!("  {} {}", style("✗").red(), message);
}
