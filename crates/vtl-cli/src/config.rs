//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use vtl_core::{CompetencyRegistry, EditorConfig, ValidationError};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor tunables (`[editor]` table).
    pub editor: EditorConfig,

    /// Extra competencies seeded into the registry, name to color.
    pub competencies: BTreeMap<String, String>,

    /// Seed for palette colors of new competencies. Random when unset.
    pub palette_seed: Option<u64>,
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // VTL_EDITOR__SKIP_TRASH=false reaches editor.skip_trash
        figment = figment.merge(Env::prefixed("VTL_").split("__"));

        figment.extract()
    }

    /// Builds a registry with the defaults plus the configured competencies.
    ///
    /// Configured entries never recolor a default.
    pub fn registry(&self) -> Result<CompetencyRegistry, ValidationError> {
        let mut registry = self
            .palette_seed
            .map_or_else(CompetencyRegistry::new, CompetencyRegistry::with_seed);
        for (name, color) in &self.competencies {
            registry.insert(name, color)?;
        }
        Ok(registry)
    }
}

/// Returns the platform-specific config directory for vtl.
///
/// On Linux: `~/.config/vtl`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vtl"))
}
