//! Line table implementations
//!
//! [`StaticLineTable`] serves pre-registered files (tests, manifests).
//! [`SourceLineCache`] reads real source files from disk and keeps them
//! cached, optionally re-reading a file whose modification time changed.

use crate::traits::LineTableOracle;
use parking_lot::RwLock;
use snare_common::SessionConfig;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// Lines that close a block never carry an instruction of their own
const BLOCK_TERMINATORS: &[&str] = &["end", "}", "]", ")"];

#[derive(Debug, Clone, Default)]
struct FileLines {
    line_count: usize,
    stop_points: BTreeSet<usize>,
}

/// In-memory line table keyed by path as given
#[derive(Debug, Clone, Default)]
pub struct StaticLineTable {
    files: HashMap<String, FileLines>,
}

impl StaticLineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(
        mut self,
        file: impl Into<String>,
        line_count: usize,
        stop_points: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.insert(file, line_count, stop_points);
        self
    }

    pub fn insert(
        &mut self,
        file: impl Into<String>,
        line_count: usize,
        stop_points: impl IntoIterator<Item = usize>,
    ) {
        self.files.insert(
            file.into(),
            FileLines {
                line_count,
                stop_points: stop_points.into_iter().collect(),
            },
        );
    }
}

impl LineTableOracle for StaticLineTable {
    fn load(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    fn line_count(&self, file: &str) -> usize {
        self.files.get(file).map_or(0, |f| f.line_count)
    }

    fn stop_points(&self, file: &str) -> BTreeSet<usize> {
        self.files
            .get(file)
            .map(|f| f.stop_points.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct CachedSource {
    modified: Option<SystemTime>,
    lines: FileLines,
}

/// Disk-backed line table
pub struct SourceLineCache {
    entries: RwLock<HashMap<PathBuf, CachedSource>>,
    reload_on_change: bool,
    comment_prefix: String,
}

impl SourceLineCache {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_options(config.reload_source_on_change, &config.comment_prefix)
    }

    pub fn with_options(reload_on_change: bool, comment_prefix: &str) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            reload_on_change,
            comment_prefix: comment_prefix.to_string(),
        }
    }

    /// Drop a cached file so the next query re-reads it
    pub fn invalidate(&self, file: &str) {
        self.entries.write().remove(&resolve_path(file));
    }

    pub fn cached_files(&self) -> usize {
        self.entries.read().len()
    }

    fn lines(&self, file: &str) -> Option<FileLines> {
        let path = resolve_path(file);

        if let Some(cached) = self.entries.read().get(&path) {
            if !self.reload_on_change || cached.modified == modified_time(&path) {
                return Some(cached.lines.clone());
            }
            trace!(path = %path.display(), "Source changed on disk, reloading");
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Source file not loadable");
                return None;
            }
        };
        let lines = scan_source(&content, &self.comment_prefix);
        debug!(
            path = %path.display(),
            line_count = lines.line_count,
            stop_points = lines.stop_points.len(),
            "Source file cached"
        );

        self.entries.write().insert(
            path.clone(),
            CachedSource {
                modified: modified_time(&path),
                lines: lines.clone(),
            },
        );
        Some(lines)
    }
}

impl LineTableOracle for SourceLineCache {
    fn load(&self, file: &str) -> bool {
        self.lines(file).is_some()
    }

    fn line_count(&self, file: &str) -> usize {
        self.lines(file).map_or(0, |l| l.line_count)
    }

    fn stop_points(&self, file: &str) -> BTreeSet<usize> {
        self.lines(file).map(|l| l.stop_points).unwrap_or_default()
    }

    fn canonical_path(&self, file: &str) -> String {
        resolve_path(file).to_string_lossy().into_owned()
    }
}

fn resolve_path(file: &str) -> PathBuf {
    std::fs::canonicalize(file).unwrap_or_else(|_| PathBuf::from(file))
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn scan_source(content: &str, comment_prefix: &str) -> FileLines {
    let mut line_count = 0;
    let mut stop_points = BTreeSet::new();

    for (idx, line) in content.lines().enumerate() {
        line_count += 1;
        let code = line.trim();
        if code.is_empty()
            || (!comment_prefix.is_empty() && code.starts_with(comment_prefix))
            || BLOCK_TERMINATORS.contains(&code)
        {
            continue;
        }
        stop_points.insert(idx + 1);
    }

    FileLines {
        line_count,
        stop_points,
    }
}
