use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagebindError, Result};
use crate::flavor::Flavor;
use crate::funcs::FuncMap;
use crate::loader::Loader;

pub const CONFIG_FILE: &str = "pagebind.toml";

/// Root config structure deserialized from pagebind.toml.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    /// Base template file, relative to the config file's directory.
    pub base: Option<String>,

    /// Glob pattern for page files, relative to the config file's directory.
    pub pages: String,
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.templates.pages.trim().is_empty() {
            return Err(PagebindError::ConfigInvalid {
                reason: "'pages' must be a non-empty glob pattern".into(),
            });
        }
        if self
            .templates
            .base
            .as_deref()
            .is_some_and(|b| b.trim().is_empty())
        {
            return Err(PagebindError::ConfigInvalid {
                reason: "'base' must name a file when present".into(),
            });
        }
        Ok(())
    }
}

/// Load and validate a LoaderConfig from a pagebind.toml file or the directory holding it.
pub fn load_config(path: &Path) -> Result<LoaderConfig> {
    let config_path = config_path(path);

    if !config_path.exists() {
        return Err(PagebindError::ConfigNotFound { path: config_path });
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| PagebindError::Io {
        context: format!("reading {}", config_path.display()),
        source: e,
    })?;

    let config: LoaderConfig =
        toml::from_str(&content).map_err(|e| PagebindError::ConfigParse { source: e })?;

    config.validate()?;

    Ok(config)
}

fn config_path(path: &Path) -> PathBuf {
    if path.ends_with(CONFIG_FILE) {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILE)
    }
}

impl<F: Flavor> Loader<F> {
    /// Build a loader from `config`, resolving relative paths against `root`.
    pub fn from_config(config: &LoaderConfig, root: &Path) -> Self {
        let pages = root.join(&config.templates.pages);
        let loader = Self::new(pages.to_string_lossy().into_owned());
        match &config.templates.base {
            Some(base) => loader.with_base(root.join(base)),
            None => loader,
        }
    }

    /// Read `pagebind.toml` from `dir` and build a loader rooted there.
    pub fn from_dir(dir: &Path, funcs: Option<FuncMap>) -> Result<Self> {
        let config = load_config(dir)?;
        let loader = Self::from_config(&config, dir);
        Ok(match funcs {
            Some(funcs) => loader.with_funcs(funcs),
            None => loader,
        })
    }
}
