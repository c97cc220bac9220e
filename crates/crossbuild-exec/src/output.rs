//! Output artifact naming.

use std::path::{Path, PathBuf};

use crossbuild_matrix::BuildPair;

/// Output path for one build pair, relative to the working directory:
/// `{version}/{stem}_{os}_{arch}{suffix}`.
///
/// `stem` is the source file name without its extension; `suffix` is `.exe`
/// for windows and empty otherwise.
pub fn output_path(source: &Path, version: &str, pair: BuildPair) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    Path::new(version).join(format!(
        "{stem}_{}_{}{}",
        pair.os,
        pair.arch,
        pair.os.executable_suffix()
    ))
}
