use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated
    pub relative_path: String,
}

/// List files under `dir` whose name ends with `suffix`, excluding names
/// ending with any of `exclude`. Without `recursive` only the directory's
/// direct children are listed. A missing directory yields an empty list.
pub fn list_source_files(
    root: &Path,
    dir: &Path,
    suffix: &str,
    exclude: &[&str],
    recursive: bool,
) -> Vec<SourceFile> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "source directory not found, skipping");
        return Vec::new();
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<SourceFile> = WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.ends_with(suffix) && !exclude.iter().any(|ex| name.ends_with(ex))
        })
        .map(|entry| {
            let path = entry.into_path();
            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            SourceFile {
                path,
                relative_path,
            }
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
