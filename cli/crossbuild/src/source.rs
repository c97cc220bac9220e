//! Locating the source file to build.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Extension a buildable source file must carry.
pub const SOURCE_EXTENSION: &str = "go";

/// Pre-flight failures. Any of these stops the run before a build starts.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no .go file found in {}", dir.display())]
    NoCandidates { dir: PathBuf },

    #[error("{}", ambiguous_message(.candidates))]
    Ambiguous { candidates: Vec<PathBuf> },

    #[error("not a .go file: {}", path.display())]
    WrongExtension { path: PathBuf },

    #[error("source file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("reading directory {}: {source}", dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn ambiguous_message(candidates: &[PathBuf]) -> String {
    let mut msg = format!("multiple .{SOURCE_EXTENSION} files found:");
    for c in candidates {
        let _ = write!(msg, "\n  {}", c.display());
    }
    let _ = write!(msg, "\nuse -f <file.{SOURCE_EXTENSION}> to pick one");
    msg
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Resolve the source file relative to `dir`.
///
/// An explicit path must carry the source extension and name an existing
/// regular file; it is returned as given. Without one, `dir` must contain
/// exactly one source file, whose bare file name is returned.
pub fn locate(dir: &Path, requested: Option<&Path>) -> Result<PathBuf, SourceError> {
    match requested.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => validate(dir, path),
        None => detect(dir),
    }
}

fn validate(dir: &Path, path: &Path) -> Result<PathBuf, SourceError> {
    if !has_source_extension(path) {
        return Err(SourceError::WrongExtension {
            path: path.to_path_buf(),
        });
    }
    if !dir.join(path).is_file() {
        return Err(SourceError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

fn detect(dir: &Path) -> Result<PathBuf, SourceError> {
    let read_err = |source| SourceError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if has_source_extension(&path) && path.is_file() {
            candidates.push(PathBuf::from(entry.file_name()));
        }
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(SourceError::NoCandidates {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(SourceError::Ambiguous { candidates }),
    }
}
