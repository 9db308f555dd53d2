use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &[".ts", ".tsx"];
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist"];

/// Every `.ts`/`.tsx` file under `dir`, sorted. Build output and
/// dependency directories are skipped, as is anything unreadable.
pub fn source_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect(dir, &mut files);
    files.sort();
    files
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), "cannot read directory: {e}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Ok(meta) = std::fs::metadata(&path) else {
            continue;
        };

        if meta.is_dir() {
            if !SKIPPED_DIRS.contains(&name.as_ref()) {
                collect(&path, files);
            }
        } else if EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            files.push(path);
        }
    }
}
