//! Source file database and position mapping
//!
//! Spans are plain byte ranges; this module turns them back into file names,
//! 1-based line/column pairs and source text for diagnostics.

use crate::common::Span;
use miette::NamedSource;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Index of a file in a [`SourceDb`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// A line/column position inside a file (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: FileId,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: FileId, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One source text plus its line index
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: Option<PathBuf>,
    name: String,
    content: Arc<str>,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<String>) -> Self {
        let content: Arc<str> = Arc::from(content.into());
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            id,
            path: None,
            name: name.into(),
            content,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line and column of a byte offset; offsets past the end clamp
    /// and offsets inside a character move back to its first byte
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = self.content[self.line_starts[line]..offset].chars().count();
        (line + 1, col + 1)
    }

    pub fn location(&self, offset: usize) -> SourceLocation {
        let (line, column) = self.line_col(offset);
        SourceLocation::new(self.id, line, column)
    }

    /// Text between two byte offsets, empty when out of range
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        self.content.get(start..end).unwrap_or("")
    }

    pub fn text(&self, span: Span) -> &str {
        self.span_text(span.start as usize, span.end as usize)
    }

    /// Text of a 1-based line without its terminator
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.content.len());
        self.content
            .get(start..end)
            .map(|text| text.strip_suffix('\r').unwrap_or(text))
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// All source files of a session
#[derive(Debug, Default)]
pub struct SourceDb {
    files: Vec<SourceFile>,
    by_path: FxHashMap<PathBuf, FileId>,
}

impl SourceDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: PathBuf, content: String) -> FileId {
        if let Some(&id) = self.by_path.get(&path) {
            let name = self.files[id.0 as usize].name.clone();
            let mut file = SourceFile::new(id, name, content);
            file.path = Some(path);
            self.files[id.0 as usize] = file;
            return id;
        }
        let id = self.next_id();
        let mut file = SourceFile::new(id, path.display().to_string(), content);
        file.path = Some(path.clone());
        self.files.push(file);
        self.by_path.insert(path, id);
        id
    }

    /// A file with no path on disk, shown as `<name>`
    pub fn add_virtual(&mut self, name: &str, content: String) -> FileId {
        let id = self.next_id();
        self.files.push(SourceFile::new(id, format!("<{name}>"), content));
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    pub fn get_by_path(&self, path: &Path) -> Option<&SourceFile> {
        self.by_path.get(path).and_then(|&id| self.get(id))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    fn next_id(&self) -> FileId {
        FileId(self.files.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_lines() {
        let file = SourceFile::new(FileId(0), "t.jc", "a\r\nbc\r\n");
        assert_eq!(file.line_text(1), Some("a"));
        assert_eq!(file.line_text(2), Some("bc"));
        assert_eq!(file.line_col(4), (2, 2));
    }

    #[test]
    fn columns_count_chars() {
        let file = SourceFile::new(FileId(0), "t.jc", "\"é\" x");
        // `x` sits at byte 5 but is the fifth character
        assert_eq!(file.line_col(5), (1, 5));
    }

    #[test]
    fn re_adding_a_path_replaces_content() {
        let mut db = SourceDb::new();
        let a = db.add_file(PathBuf::from("a.jc"), "one".to_string());
        let b = db.add_file(PathBuf::from("a.jc"), "two".to_string());
        assert_eq!(a, b);
        assert_eq!(db.file_count(), 1);
        assert_eq!(db.get(a).map(|f| f.content()), Some("two"));
    }
}
