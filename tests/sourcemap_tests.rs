//! Source map tests
//!
//! Tests for:
//! - File database management
//! - Line/column position tracking
//! - Mapping parser spans and diagnostics back to source text

use jacy_syntax::sourcemap::{FileId, SourceDb, SourceLocation};
use jacy_syntax::{parse_file, Span};
use std::path::PathBuf;

// ==================== SourceDb Tests ====================

#[test]
fn test_source_db_add_file() {
    let mut db = SourceDb::new();

    let source = r#"func main() {
    let x = 42;
}"#;

    let file_id = db.add_file(PathBuf::from("main.jc"), source.to_string());

    assert_eq!(file_id, FileId(0));
    assert!(db.get(file_id).is_some());
}

#[test]
fn test_source_db_multiple_files() {
    let mut db = SourceDb::new();

    let id1 = db.add_file(PathBuf::from("a.jc"), "func a() {}".to_string());
    let id2 = db.add_file(PathBuf::from("b.jc"), "func b() {}".to_string());

    assert_eq!(id1, FileId(0));
    assert_eq!(id2, FileId(1));
    assert_eq!(db.file_count(), 2);
    assert_eq!(db.iter().count(), 2);
}

#[test]
fn test_source_db_lookup_by_path() {
    let mut db = SourceDb::new();

    let path = PathBuf::from("lib.jc");
    let id = db.add_file(path.clone(), "func main() {}".to_string());

    let found = db.get_by_path(&path).expect("file by path");
    assert_eq!(found.id, id);
    assert_eq!(found.name(), "lib.jc");
    assert!(db.get_by_path(&PathBuf::from("missing.jc")).is_none());
}

#[test]
fn test_virtual_file() {
    let mut db = SourceDb::new();

    let id = db.add_virtual("repl", "let x = 1".to_string());
    let file = db.get(id).expect("virtual file");

    assert_eq!(file.name(), "<repl>");
    assert!(file.path.is_none());
}

// ==================== SourceFile Tests ====================

#[test]
fn test_source_file_line_lookup() {
    let mut db = SourceDb::new();

    let source = "line 1\nline 2\nline 3";
    let file_id = db.add_file(PathBuf::from("test.jc"), source.to_string());
    let file = db.get(file_id).expect("file");

    assert_eq!(file.line_col(0), (1, 1));
    // Start of line 2 (after "line 1\n")
    assert_eq!(file.line_col(7), (2, 1));
    assert_eq!(file.line_col(14), (3, 1));
    assert_eq!(file.line_count(), 3);
}

#[test]
fn test_source_file_empty_lines() {
    let mut db = SourceDb::new();

    let file_id = db.add_file(PathBuf::from("test.jc"), "line 1\n\n\nline 4".to_string());
    let file = db.get(file_id).expect("file");

    assert_eq!(file.line_col(7).0, 2);
    assert_eq!(file.line_col(8).0, 3);
    assert_eq!(file.line_col(9).0, 4);
    assert_eq!(file.line_text(2), Some(""));
}

#[test]
fn test_offset_past_end_clamps() {
    let mut db = SourceDb::new();

    let file_id = db.add_file(PathBuf::from("t.jc"), "ab\ncd".to_string());
    let file = db.get(file_id).expect("file");

    assert_eq!(file.line_col(100), (2, 3));
}

#[test]
fn test_offset_inside_character_snaps_back() {
    let mut db = SourceDb::new();

    let file_id = db.add_file(PathBuf::from("u.jc"), "é\nxé".to_string());
    let file = db.get(file_id).expect("file");

    assert_eq!(file.line_col(1), (1, 1));
    assert_eq!(file.line_col(2), (1, 2));
    assert_eq!(file.line_col(5), (2, 2));
}

#[test]
fn test_line_text() {
    let mut db = SourceDb::new();

    let file_id = db.add_file(
        PathBuf::from("test.jc"),
        "line one\nline two\nline three".to_string(),
    );
    let file = db.get(file_id).expect("file");

    assert_eq!(file.line_text(1), Some("line one"));
    assert_eq!(file.line_text(3), Some("line three"));
    assert_eq!(file.line_text(0), None);
    assert_eq!(file.line_text(4), None);
}

// ==================== SourceLocation Tests ====================

#[test]
fn test_source_location_display() {
    let loc = SourceLocation::new(FileId(0), 10, 5);
    assert_eq!(loc.to_string(), "10:5");
}

// ==================== Parser Integration ====================

#[test]
fn test_span_text_of_parsed_items() {
    let mut db = SourceDb::new();

    let source = "func foo() {\n    return 42;\n}";
    let file_id = db.add_file(PathBuf::from("foo.jc"), source.to_string());
    let file = db.get(file_id).expect("file");

    let parsed = parse_file(source);
    let item = &parsed.node.items[0];
    assert_eq!(file.text(item.span), source);

    // `return` on line 2
    let span = Span::new(17, 23);
    assert_eq!(file.text(span), "return");
    assert_eq!(file.location(span.start as usize), SourceLocation::new(file_id, 2, 5));
    assert_eq!(file.line_col(span.end as usize), (2, 11));
}

#[test]
fn test_diagnostic_location() {
    let mut db = SourceDb::new();

    let source = "func f() {\n    let = 1;\n}";
    let file_id = db.add_file(PathBuf::from("bad.jc"), source.to_string());
    let file = db.get(file_id).expect("file");

    let parsed = parse_file(source);
    let diagnostic = parsed.diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(file.text(diagnostic.span), "=");
    assert_eq!(file.line_col(diagnostic.span.start as usize), (2, 9));

    let rendered = parsed.diagnostics.render(file);
    assert!(rendered.contains("bad.jc"), "{rendered}");
}

#[test]
fn test_slice_out_of_range_is_empty() {
    let mut db = SourceDb::new();

    let file_id = db.add_file(PathBuf::from("t.jc"), "abc".to_string());
    let file = db.get(file_id).expect("file");

    assert_eq!(file.span_text(1, 3), "bc");
    assert_eq!(file.span_text(2, 10), "");
}
