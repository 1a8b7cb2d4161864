use std::path::Path;

use walkdir::WalkDir;

/// Total size in bytes of every file under `path`.
///
/// A file path yields its own length and a missing path yields zero. Entries
/// that cannot be read contribute zero instead of failing the walk.
pub fn dir_size(path: &Path) -> u64 {
  WalkDir::new(path)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .filter_map(|e| e.metadata().ok())
    .map(|m| m.len())
    .sum()
}
