//! Highlighting configuration persistence
//!
//! Stores user preferences in `~/.config/token-editor/highlight.yaml`

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::syntax::{Grammar, LanguageId};

/// Highlighting configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Selected theme id (e.g., "default-dark", "github-light")
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Prefer `queries/{lang}/highlights.scm` in the config dir over bundled queries
    #[serde(default = "default_user_queries")]
    pub user_queries: bool,
    /// Extra extension → language name mappings, e.g. `rs.in: rust`
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, String>,
}

fn default_theme() -> String {
    "default-dark".to_string()
}

fn default_user_queries() -> bool {
    true
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            user_queries: default_user_queries(),
            extensions: HashMap::new(),
        }
    }
}

impl HighlightConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Language for `path`: configured extensions win over built-in detection.
    /// The longest matching suffix is used, so `rs.in` beats `in`.
    pub fn language_for(&self, path: &Path) -> LanguageId {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return LanguageId::PlainText;
        };

        let configured = self
            .extensions
            .iter()
            .filter(|(ext, _)| {
                name.len() > ext.len()
                    && name.ends_with(ext.as_str())
                    && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
            })
            .max_by_key(|(ext, _)| ext.len());

        if let Some((ext, language)) = configured {
            match LanguageId::from_name(language) {
                Some(id) => return id,
                None => tracing::warn!("Unknown language {:?} configured for .{}", language, ext),
            }
        }
        LanguageId::from_path(path)
    }

    /// Grammar for `language`, honouring `user_queries`
    pub fn grammar(&self, language: LanguageId) -> Option<Grammar> {
        if self.user_queries {
            Grammar::load(language)
        } else {
            Grammar::builtin(language)
        }
    }
}
