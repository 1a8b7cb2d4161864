mod build;
mod clean;
mod targets;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use targets::cmd_targets;
