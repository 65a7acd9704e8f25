use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::args::WalkOptions;

/// A source file discovered under one of the requested roots, paired with
/// the language id inferred from its extension.
#[derive(Debug, Clone)]
pub(crate) struct DiscoveredFile {
    pub(crate) path: PathBuf,
    pub(crate) language_id: String,
}

#[derive(Debug, Default)]
pub(crate) struct WalkStats {
    pub(crate) skipped_binary: usize,
    pub(crate) skipped_oversize: usize,
    pub(crate) skipped_unknown_extension: usize,
    pub(crate) skipped_not_found: usize,
    pub(crate) skipped_permission_denied: usize,
    pub(crate) skipped_walk_errors: usize,
}

fn record_io_error(err: &io::Error, stats: &mut WalkStats) {
    match err.kind() {
        io::ErrorKind::NotFound => stats.skipped_not_found += 1,
        io::ErrorKind::PermissionDenied => stats.skipped_permission_denied += 1,
        _ => stats.skipped_walk_errors += 1,
    }
}

pub(crate) fn language_for_extension(ext: &str) -> Option<&'static str> {
    let id = match ext {
        "rs" => "rust",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "java" => "java",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "txt" | "md" => "text",
        _ => return None,
    };
    Some(id)
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(4096).any(|b| *b == 0)
}

/// Walks the given roots and returns matching files sorted by path, so
/// repeated runs over the same tree see files in the same order. Per-entry
/// I/O problems are counted and skipped; only a nonexistent root argument is
/// an error.
pub(crate) fn collect_files(
    roots: &[PathBuf],
    walk: &WalkOptions,
    forced_language: Option<&str>,
    stats: &mut WalkStats,
) -> Result<Vec<DiscoveredFile>, String> {
    let mut files: Vec<DiscoveredFile> = Vec::new();

    for root in roots {
        if !root.exists() {
            return Err(format!("path does not exist: {}", root.display()));
        }
        if root.is_file() {
            if let Some(found) = examine_file(root, walk, forced_language, stats) {
                files.push(found);
            }
            continue;
        }

        let ignore_dirs = walk.ignore_dirs.clone();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .ignore(false)
            .git_ignore(walk.respect_gitignore)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .require_git(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.path_is_symlink() {
                    return false;
                }
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    let name = entry.file_name().to_string_lossy();
                    return !ignore_dirs.contains(name.as_ref());
                }
                true
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => {
                    stats.skipped_walk_errors += 1;
                    continue;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(found) = examine_file(entry.path(), walk, forced_language, stats) {
                files.push(found);
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

fn examine_file(
    path: &Path,
    walk: &WalkOptions,
    forced_language: Option<&str>,
    stats: &mut WalkStats,
) -> Option<DiscoveredFile> {
    let language_id = match forced_language {
        Some(id) => id.to_string(),
        None => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            match ext.as_deref().and_then(language_for_extension) {
                Some(id) => id.to_string(),
                None => {
                    stats.skipped_unknown_extension += 1;
                    return None;
                }
            }
        }
    };

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            record_io_error(&err, stats);
            return None;
        }
    };
    if meta.len() > walk.max_file_size {
        stats.skipped_oversize += 1;
        return None;
    }

    Some(DiscoveredFile {
        path: path.to_path_buf(),
        language_id,
    })
}

/// Reads a discovered file. Binary content, non-UTF-8 content and read
/// failures (the file may be gone by now) are counted and yield `None`; one
/// unreadable file never fails the run.
pub(crate) fn read_source(file: &DiscoveredFile, stats: &mut WalkStats) -> Option<String> {
    let bytes = match fs::read(&file.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            record_io_error(&err, stats);
            return None;
        }
    };
    if looks_binary(&bytes) {
        stats.skipped_binary += 1;
        return None;
    }
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            stats.skipped_binary += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cpd-walk-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn maps_known_extensions() {
        assert_eq!(language_for_extension("rs"), Some("rust"));
        assert_eq!(language_for_extension("tsx"), Some("typescript"));
        assert_eq!(language_for_extension("exe"), None);
    }

    #[test]
    fn collects_files_sorted_and_skips_ignored_dirs() {
        let dir = temp_dir("collect");
        fs::write(dir.join("b.rs"), "fn b() {}").unwrap();
        fs::write(dir.join("a.rs"), "fn a() {}").unwrap();
        fs::create_dir_all(dir.join("node_modules")).unwrap();
        fs::write(dir.join("node_modules/ignored.js"), "x").unwrap();
        fs::write(dir.join("notes.bin"), "x").unwrap();

        let mut walk = WalkOptions::default();
        walk.ignore_dirs = HashSet::from(["node_modules".to_string()]);
        let mut stats = WalkStats::default();
        let files = collect_files(&[dir.clone()], &walk, None, &mut stats).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.rs", "b.rs"]);
        assert_eq!(stats.skipped_unknown_extension, 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn oversize_and_binary_files_are_skipped() {
        let dir = temp_dir("skip");
        fs::write(dir.join("big.rs"), "x".repeat(64)).unwrap();
        fs::write(dir.join("nul.rs"), b"fn\0main").unwrap();

        let mut walk = WalkOptions::default();
        walk.max_file_size = 32;
        let mut stats = WalkStats::default();
        let files = collect_files(&[dir.clone()], &walk, None, &mut stats).unwrap();
        assert_eq!(stats.skipped_oversize, 1);
        assert_eq!(files.len(), 1);

        assert!(read_source(&files[0], &mut stats).is_none());
        assert_eq!(stats.skipped_binary, 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_deleted_after_discovery_is_skipped_not_fatal() {
        let dir = temp_dir("gone");
        fs::write(dir.join("a.rs"), "fn a() {}").unwrap();
        fs::write(dir.join("b.rs"), "fn b() {}").unwrap();

        let walk = WalkOptions::default();
        let mut stats = WalkStats::default();
        let files = collect_files(&[dir.clone()], &walk, None, &mut stats).unwrap();
        assert_eq!(files.len(), 2);

        fs::remove_file(&files[0].path).unwrap();

        assert!(read_source(&files[0], &mut stats).is_none());
        assert_eq!(stats.skipped_not_found, 1);

        // the surviving file still reads fine
        assert_eq!(
            read_source(&files[1], &mut stats).as_deref(),
            Some("fn b() {}")
        );
        assert_eq!(stats.skipped_walk_errors, 0);

        let _ = fs::remove_dir_all(&dir);
    }
}
