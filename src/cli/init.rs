use anyhow::{bail, Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE_NAME};

const HEADER: &str = "# umlgen configuration. Paths are relative to the project root.\n\n";

/// Write the default configuration to `umlgen.toml` under `root`.
pub fn run_init(root: &Path, force: bool, quiet: bool) -> Result<PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    let body = Config::default()
        .to_toml()
        .context("Failed to serialize the default config")?;
    let contents = format!("{}{}", HEADER, body);
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    if !quiet {
        println!("  {} Created {}", style("✓").green(), style(path.display()).cyan());
    }

    Ok(path)
}
