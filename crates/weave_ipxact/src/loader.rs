//! Loading a library from directories of JSON documents.

use std::path::{Path, PathBuf};

use weave_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Location};

use crate::document::Document;
use crate::library::{Library, LibraryError, MemoryLibrary};

/// A document file could not be read or parsed.
pub const E300: DiagnosticCode = DiagnosticCode::new(Category::Error, 300);
/// Two documents share a VLNV.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Loads every `*.json` document under `paths` into a library.
///
/// Files are visited in sorted path order so the first of two documents with
/// the same VLNV is deterministic. Unreadable files and duplicates are
/// reported to `sink` and skipped.
pub fn load_library(paths: &[PathBuf], sink: &DiagnosticSink) -> MemoryLibrary {
    let mut library = MemoryLibrary::new();
    for root in paths {
        let files = match discover_documents(root) {
            Ok(files) => files,
            Err(e) => {
                sink.emit(unreadable(root, &e));
                continue;
            }
        };
        tracing::debug!(root = %root.display(), files = files.len(), "scanning library path");
        for path in files {
            let document = match load_document(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    sink.emit(unreadable(&path, &e));
                    continue;
                }
            };
            let vlnv = document.vlnv().clone();
            let existing_kind = library.resolve(&vlnv).map(Document::kind);
            if let Err(e) = library.insert(document) {
                let mut diag =
                    Diagnostic::error(E301, e.to_string(), file_location(&path)).with_label(
                        Label::primary(Location::document(&vlnv), "already defined"),
                    );
                if let Some(kind) = existing_kind {
                    diag = diag.with_note(format!("the first definition is a {kind}"));
                }
                sink.emit(diag);
            }
        }
    }
    tracing::debug!(documents = library.len(), "library loaded");
    library
}

/// Reads and parses one document file.
pub fn load_document(path: &Path) -> Result<Document, LibraryError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Lists the `*.json` files under `dir` (recursive), sorted by path.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LibraryError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

fn file_location(path: &Path) -> Location {
    Location::NONE.at(format!("file `{}`", path.display()))
}

fn unreadable(path: &Path, err: &LibraryError) -> Diagnostic {
    Diagnostic::error(E300, err.to_string(), file_location(path))
}
