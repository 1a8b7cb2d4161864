//! Well-known names shared across the crate.

/// File name of the structured result written into the output directory.
pub const RESULT_FILENAME: &str = "build-result.json";

/// Directory inside the project that receives the version stamp.
pub const STAMP_DIR: &str = "Assets/Resources";

/// File name of the version stamp inside [`STAMP_DIR`].
pub const STAMP_FILENAME: &str = "build_version.json";

/// Version of the stamp record format.
pub const STAMPER_VERSION: &str = "1.0";

/// Incremental cache directories removed by the cache cleaner, relative to the project root.
pub const CACHE_DIRS: [&str; 2] = ["Library/Bee", "Library/BuildCache"];
