/// Persistence for pending and ranked lists.
///
/// Both lists are flat UTF-8 text, one item per line, newline-terminated.
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreError;
use crate::types::Item;

/// A place a list of items is loaded from and written back to.
pub trait Store {
    /// Read every item, in stored order.
    fn load(&self) -> Result<Vec<Item>, StoreError>;

    /// Replace the stored list with `items`.
    fn save(&self, items: &[Item]) -> Result<(), StoreError>;

    /// Empty the store.
    fn clear(&self) -> Result<(), StoreError>;

    /// Human-readable location, for messages.
    fn describe(&self) -> String;
}

/// Parse line-oriented text into items. Blank lines are skipped and each
/// record has its surrounding whitespace stripped.
pub fn parse_lines(content: &str) -> Vec<Item> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(Item::new)
        .collect()
}

/// Render items as newline-terminated lines.
pub fn render_lines(items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(item.as_str());
        out.push('\n');
    }
    out
}

/// A list stored in a text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    allow_missing: bool,
}

impl FileStore {
    /// A store that fails to load if the file does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            allow_missing: false,
        }
    }

    /// Treat a missing file as an empty list instead of an error.
    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path with `.`, `..` and symlinks resolved. A missing file is
    /// resolved through its parent directory.
    pub fn resolved_path(&self) -> PathBuf {
        if let Ok(resolved) = std::fs::canonicalize(&self.path) {
            return resolved;
        }
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        match (std::fs::canonicalize(parent), self.path.file_name()) {
            (Ok(dir), Some(name)) => dir.join(name),
            _ => self.path.clone(),
        }
    }

    /// True when both stores point at the same file, however the paths are
    /// spelled.
    pub fn is_same_file(&self, other: &FileStore) -> bool {
        self.resolved_path() == other.resolved_path()
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Vec<Item>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let items = parse_lines(&content);
                debug!(path = %self.path.display(), count = items.len(), "loaded");
                Ok(items)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && self.allow_missing => {
                debug!(path = %self.path.display(), "missing, treating as empty");
                Ok(Vec::new())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::Missing {
                path: self.path.clone(),
            }),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Write to a temp file next to the target, then rename it into place so
    /// readers never see a half-written list.
    fn save(&self, items: &[Item]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(render_lines(items).as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), count = items.len(), "saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        std::fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "cleared");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory store. Counts writes so callers can check whether a run
/// touched it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<Vec<Item>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        MemoryStore {
            items: RefCell::new(items.into_iter().collect()),
            writes: Cell::new(0),
        }
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    /// Number of `save` and `clear` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items())
    }

    fn save(&self, items: &[Item]) -> Result<(), StoreError> {
        *self.items.borrow_mut() = items.to_vec();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.items.borrow_mut().clear();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
