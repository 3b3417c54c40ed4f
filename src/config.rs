//! Server configuration: an optional TOML file overlaid with environment variables.

use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Path of the optional TOML configuration file.
pub const CONFIG_ENV: &str = "VIRO3D_CONFIG";
pub const DATA_DIR_ENV: &str = "VIRO3D_DATA_DIR";
pub const BLAST_DB_ENV: &str = "BLAST_DB_PATH";
pub const BLASTP_BIN_ENV: &str = "BLASTP_BIN";
pub const MODELS_DIR_ENV: &str = "STRUCTURAL_MODELS_PATH";
pub const BUNDLE_DIR_ENV: &str = "VIRO3D_BUNDLE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the JSON collection exports.
    pub data_dir: PathBuf,
    /// BLAST protein database searched by sequence queries.
    pub blast_db: PathBuf,
    pub blastp_bin: PathBuf,
    /// Directory of predicted model files (`CF-<id>.cif`, `EF-<id>_relaxed.pdb`, ...).
    pub models_dir: PathBuf,
    /// Root under which model bundles are written.
    pub bundle_dir: PathBuf,
    /// Worker threads per alignment run.
    pub threads: u32,
    pub max_concurrent_alignments: usize,
    /// Number of alignment reports kept in memory.
    pub alignment_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            blast_db: PathBuf::from("data/blast/viro3d_blast_db"),
            blastp_bin: PathBuf::from("blastp"),
            models_dir: PathBuf::from("data/structural_models"),
            bundle_dir: std::env::temp_dir().join("viro3d-bundles"),
            threads: 4,
            max_concurrent_alignments: 2,
            alignment_cache_size: 64,
        }
    }
}

impl Config {
    /// Load the configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `var` to look up environment variables.
    pub fn load_with(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match var(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&*expand_tilde(&path)))?,
            None => Self::default(),
        };
        config.apply_env(&var);
        config.expand_paths();
        config.validate()?;

        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self, var: &impl Fn(&str) -> Option<String>) {
        let overrides: [(&str, &mut PathBuf); 5] = [
            (DATA_DIR_ENV, &mut self.data_dir),
            (BLAST_DB_ENV, &mut self.blast_db),
            (BLASTP_BIN_ENV, &mut self.blastp_bin),
            (MODELS_DIR_ENV, &mut self.models_dir),
            (BUNDLE_DIR_ENV, &mut self.bundle_dir),
        ];
        for (key, target) in overrides {
            if let Some(value) = var(key).filter(|v| !v.is_empty()) {
                *target = PathBuf::from(value);
            }
        }
    }

    fn expand_paths(&mut self) {
        for path in [
            &mut self.data_dir,
            &mut self.blast_db,
            &mut self.blastp_bin,
            &mut self.models_dir,
            &mut self.bundle_dir,
        ] {
            if let Some(raw) = path.to_str()
                && let Cow::Owned(expanded) = expand_tilde(raw)
            {
                *path = PathBuf::from(expanded);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.threads > 0, "threads must be at least 1");
        anyhow::ensure!(
            self.max_concurrent_alignments > 0,
            "max_concurrent_alignments must be at least 1"
        );
        anyhow::ensure!(
            self.alignment_cache_size > 0,
            "alignment_cache_size must be at least 1"
        );
        Ok(())
    }

    pub fn cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.alignment_cache_size).unwrap_or(NonZeroUsize::MIN)
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
