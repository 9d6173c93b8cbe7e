//! Config loading entry points.

use super::merge::merge_policy;
use super::sources::{env, global_file, workspace_file};
use super::TidbitConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load with full precedence: defaults, global file, workspace files, env.
    pub fn load(workspace_root: &Path) -> Result<TidbitConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = env::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load from one explicit file (replacing the global and workspace files).
    /// Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<TidbitConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        let builder = env::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Built-in defaults only.
    pub fn default() -> TidbitConfig {
        TidbitConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
