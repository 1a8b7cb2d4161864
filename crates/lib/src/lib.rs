//! hostbuild-lib: headless build automation for a host game engine
//!
//! This crate turns an environment-driven build request into one platform
//! build and a machine-readable result:
//! - `config`: typed build configuration read from the environment
//! - `target`: data-driven target capability table and resolution
//! - `defines`: scoped injection and guaranteed restore of scripting defines
//! - `execute`: the sequential build pipeline
//! - `report`: the `build-result.json` contract with the CI runner
//! - `sign`, `clean`: post-processing and cache maintenance

pub mod clean;
pub mod config;
pub mod consts;
pub mod defines;
pub mod execute;
pub mod host;
pub mod process;
pub mod report;
pub mod sign;
pub mod stamp;
pub mod target;
pub mod util;

pub use config::{BuildConfiguration, DefineSet};
pub use execute::{BuildError, BuildReport, run};
pub use report::BuildResult;
