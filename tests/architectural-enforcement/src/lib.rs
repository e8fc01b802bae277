//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code (timers wait on deadlines)
//! - No blocking I/O inside async code
//!
//! The helpers here walk the workspace's production sources so each test
//! only has to say what it forbids.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source roots, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["overlay/core/src", "tui/src"];

/// One scanned source file
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Lines before the first `#[cfg(test)]`, with their 1-based numbers
    pub fn production_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.as_str()))
    }

    /// Whether the code at `line_number` sits inside an `async fn`
    pub fn in_async_fn(&self, line_number: usize) -> bool {
        for line in self.lines[..line_number].iter().rev() {
            let trimmed = line.trim_start();
            if let Some(signature) = fn_signature(trimmed) {
                return signature.contains("async fn");
            }
        }
        false
    }
}

fn fn_signature(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("pub(crate) ")
        .or_else(|| line.strip_prefix("pub "))
        .unwrap_or(line);
    (rest.starts_with("fn ") || rest.starts_with("async fn ")).then_some(line)
}

/// Workspace root (two levels above this crate)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Every `.rs` file under the production roots
pub fn production_sources() -> Vec<SourceFile> {
    let root = workspace_root();
    let mut files = Vec::new();

    for dir in PRODUCTION_DIRS {
        let path = root.join(dir);
        if !path.exists() {
            continue;
        }
        for entry in walkdir::WalkDir::new(&path)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
                continue;
            }
            let Ok(content) = fs::read_to_string(entry.path()) else {
                continue;
            };
            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                lines: content.lines().map(str::to_string).collect(),
            });
        }
    }

    files
}

/// Code portion of a line (comments stripped)
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("sample.rs"),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let file = source("fn a() {}\n#[cfg(test)]\nmod tests {}\n");
        let lines: Vec<_> = file.production_lines().collect();
        assert_eq!(lines, vec![(1, "fn a() {}")]);
    }

    #[test]
    fn test_in_async_fn() {
        let file = source("pub async fn run() {\n    work();\n}\nfn load() {\n    read();\n}\n");
        assert!(file.in_async_fn(2));
        assert!(!file.in_async_fn(5));
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("x(); // sleep(1)"), "x(); ");
    }

    #[test]
    fn test_workspace_has_sources() {
        assert!(!production_sources().is_empty());
    }
}
