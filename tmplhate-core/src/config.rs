//! Optional YAML config file.
//!
//! # Lookup
//!
//! 1. an explicit `--config <path>`, which must exist;
//! 2. `<home>/.tmplhate.yaml`;
//! 3. `<home>/.tmplhate.yml`;
//! 4. nothing: every setting falls back to flags, env vars and defaults.
//!
//! Every key is optional. Unknown keys are ignored so one file can be shared
//! across tmplhate versions.
//!
//! ```yaml
//! values: ~/deploy/values.yaml
//! case: title
//! dont_normalize: false
//! env_policy: single-uppercased
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{CaseConvention, EnvPolicy};

/// File names searched for in the home directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &[".tmplhate.yaml", ".tmplhate.yml"];

/// Settings read from a config file. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub tmpl: Option<String>,
    pub values: Option<String>,
    pub output: Option<String>,
    pub case: Option<CaseConvention>,
    pub dont_normalize: Option<bool>,
    pub env_policy: Option<EnvPolicy>,
}

/// A config file that was found and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: FileConfig,
}

/// Load the config file, preferring `explicit` over the files in `home`.
///
/// Returns `Ok(None)` when no explicit path was given and no default file
/// exists (or `home` is unknown).
pub fn load_at(
    explicit: Option<&Path>,
    home: Option<&Path>,
) -> Result<Option<LoadedConfig>, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match home.and_then(find_default) {
            Some(path) => path,
            None => return Ok(None),
        },
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "config file loaded");
    Ok(Some(LoadedConfig { path, config }))
}

/// `load_at` convenience wrapper using `dirs::home_dir()`.
pub fn load(explicit: Option<&Path>) -> Result<Option<LoadedConfig>, ConfigError> {
    load_at(explicit, dirs::home_dir().as_deref())
}

fn find_default(home: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| home.join(name))
        .find(|path| path.is_file())
}

/// An empty file (or one holding only `null`) is an empty config.
fn parse(contents: &str) -> Result<FileConfig, serde_yaml::Error> {
    let parsed: Option<FileConfig> = serde_yaml::from_str(contents)?;
    Ok(parsed.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
