//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pianoviz/pianoviz.toml`
//! 3. Local config: `<project_dir>/.pianoviz.toml`
//! 4. Environment variables: `PIANOVIZ_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::LayoutBounds;

/// Unified configuration for pianoviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the datasets (default: data)
    pub data_dir: PathBuf,
    /// Lineage records, relative to data_dir
    pub history_file: PathBuf,
    /// Sales table, relative to data_dir
    pub sales_file: PathBuf,
    /// Event timeline, relative to data_dir
    pub timeline_file: PathBuf,
    /// Instrument photos
    pub photos_dir: PathBuf,
    /// Instrument sound samples
    pub sounds_dir: PathBuf,
    /// Horizontal extent of the tree layout
    pub layout: LayoutBounds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_file: PathBuf::from("piano_history.json"),
            sales_file: PathBuf::from("piano_sales.csv"),
            timeline_file: PathBuf::from("timeline.csv"),
            photos_dir: PathBuf::from("photos"),
            sounds_dir: PathBuf::from("sounds_trim"),
            layout: LayoutBounds::default(),
        }
    }
}

/// Raw layout section; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayout {
    pub initial_position: Option<f64>,
    pub min_bound: Option<f64>,
    pub max_bound: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub sales_file: Option<PathBuf>,
    pub timeline_file: Option<PathBuf>,
    pub photos_dir: Option<PathBuf>,
    pub sounds_dir: Option<PathBuf>,
    pub layout: RawLayout,
}

/// Get the XDG config directory for pianoviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pianoviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pianoviz.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".pianoviz.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_file)
    }

    pub fn timeline_path(&self) -> PathBuf {
        self.data_dir.join(&self.timeline_file)
    }

    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.photos_dir = expand_path(&self.photos_dir);
        self.sounds_dir = expand_path(&self.sounds_dir);
    }

    /// Resolve relative directories against the project directory.
    fn anchor_to(&mut self, project_dir: &Path) {
        for dir in [&mut self.data_dir, &mut self.photos_dir, &mut self.sounds_dir] {
            if dir.is_relative() {
                *dir = project_dir.join(&*dir);
            }
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let pick = |o: &Option<PathBuf>, base: &PathBuf| o.clone().unwrap_or_else(|| base.clone());
        Self {
            data_dir: pick(&overlay.data_dir, &self.data_dir),
            history_file: pick(&overlay.history_file, &self.history_file),
            sales_file: pick(&overlay.sales_file, &self.sales_file),
            timeline_file: pick(&overlay.timeline_file, &self.timeline_file),
            photos_dir: pick(&overlay.photos_dir, &self.photos_dir),
            sounds_dir: pick(&overlay.sounds_dir, &self.sounds_dir),
            layout: LayoutBounds {
                initial_position: overlay
                    .layout
                    .initial_position
                    .unwrap_or(self.layout.initial_position),
                min_bound: overlay.layout.min_bound.unwrap_or(self.layout.min_bound),
                max_bound: overlay.layout.max_bound.unwrap_or(self.layout.max_bound),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config; relative
    ///   data directories are resolved against it
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        if let Some(project) = project_dir {
            current.anchor_to(project);
        }

        current.layout.validate()?;
        Ok(current)
    }

    /// Apply PIANOVIZ_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PIANOVIZ")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let path_keys: [(&str, &mut PathBuf); 6] = [
            ("data_dir", &mut settings.data_dir),
            ("history_file", &mut settings.history_file),
            ("sales_file", &mut settings.sales_file),
            ("timeline_file", &mut settings.timeline_file),
            ("photos_dir", &mut settings.photos_dir),
            ("sounds_dir", &mut settings.sounds_dir),
        ];
        for (key, target) in path_keys {
            if let Ok(val) = config.get_string(key) {
                *target = PathBuf::from(val);
            }
        }

        let float_keys: [(&str, &mut f64); 3] = [
            ("layout.initial_position", &mut settings.layout.initial_position),
            ("layout.min_bound", &mut settings.layout.min_bound),
            ("layout.max_bound", &mut settings.layout.max_bound),
        ];
        for (key, target) in float_keys {
            match config.get_float(key) {
                Ok(val) => *target = val,
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => return Err(config_err(e)),
            }
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# pianoviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/pianoviz/pianoviz.toml
#   Local:  <project>/.pianoviz.toml
#   Env:    PIANOVIZ_* environment variables (PIANOVIZ_LAYOUT__MAX_BOUND=...)

# Directory holding the datasets (relative paths resolve against the project)
# data_dir = "data"

# Dataset files inside data_dir
# history_file = "piano_history.json"
# sales_file = "piano_sales.csv"
# timeline_file = "timeline.csv"

# Media for the event box
# photos_dir = "photos"
# sounds_dir = "sounds_trim"

[layout]
# Root position and horizontal extent, in layout units
# initial_position = 4.0
# min_bound = 0.0
# max_bound = 8.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_resolving_paths_then_under_data_dir() {
        let settings = Settings::default();
        assert_eq!(settings.history_path(), PathBuf::from("data/piano_history.json"));
        assert_eq!(settings.sales_path(), PathBuf::from("data/piano_sales.csv"));
        assert_eq!(settings.layout, LayoutBounds::default());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let overlay: RawSettings = toml::from_str(
            r#"
data_dir = "/srv/pianos"
[layout]
max_bound = 12.0
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.data_dir, PathBuf::from("/srv/pianos"));
        assert_eq!(merged.sales_file, PathBuf::from("piano_sales.csv"));
        assert_eq!(merged.layout.max_bound, 12.0);
        assert_eq!(merged.layout.min_bound, 0.0);
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/pianos"),
            ..Settings::default()
        };
        settings.expand_paths();
        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_dir.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_relative_dirs_when_anchoring_then_joined_with_project() {
        let mut settings = Settings::default();
        settings.anchor_to(Path::new("/work/viz"));
        assert_eq!(settings.data_dir, PathBuf::from("/work/viz/data"));
        assert_eq!(settings.photos_dir, PathBuf::from("/work/viz/photos"));
    }

    #[test]
    fn template_parses_as_raw_settings() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.data_dir.is_none());
    }
}
