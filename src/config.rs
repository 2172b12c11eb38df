//! `.scrutineye.toml` loading.
//!
//! The file is looked up in the current directory and its ancestors, then in
//! the user config directory. A missing file means defaults; an unreadable or
//! invalid one also means defaults, with a warning.
//!
//! ```toml
//! [display]
//! dark_mode = true
//! start_view = "workspace"
//!
//! [inspector]
//! name = "Inspector Sharma"
//! role = "Field Regulator"
//!
//! [thresholds]
//! ocr_confidence = 90
//! ```

use crate::errors::ConfigError;
use crate::model::DetectionThresholds;
use crate::tui::view_state::View;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".scrutineye.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub dark_mode: bool,
    /// View identifier; unknown values fall back to the dashboard.
    pub start_view: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            start_view: View::Dashboard.id().to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn start_view(&self) -> View {
        View::parse_or_default(&self.start_view)
    }
}

/// Identity shown in the sidebar and used for "assigned to me".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub name: String,
    pub role: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            name: "Inspector Kumar".to_string(),
            role: "Senior Regulator".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrutineyeConfig {
    pub display: DisplayConfig,
    pub inspector: InspectorConfig,
    pub thresholds: DetectionThresholds,
}

impl ScrutineyeConfig {
    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inspector.name.trim().is_empty() {
            return Err(ConfigError::Invalid("inspector.name must not be empty".into()));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    let read = || -> std::io::Result<String> {
        let file = fs::File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Ok(contents)
    };
    read().map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses TOML and normalises out-of-range thresholds.
pub fn parse_config(contents: &str) -> Result<ScrutineyeConfig, ConfigError> {
    let mut config: ScrutineyeConfig = toml::from_str(contents)?;
    let clamped = config.thresholds.clamped();
    if clamped != config.thresholds {
        tracing::warn!("Detection thresholds outside their ranges were clamped");
        config.thresholds = clamped;
    }
    config.validate()?;
    Ok(config)
}

/// Loads one explicit file. Errors are returned to the caller.
pub fn load_config_from_path(path: &Path) -> Result<ScrutineyeConfig, ConfigError> {
    let contents = read_config_file(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

fn try_load(path: &Path) -> Option<ScrutineyeConfig> {
    match load_config_from_path(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring config file, using defaults");
            None
        }
    }
}

/// `start` and up to nine of its ancestors.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Candidate config files in lookup order.
pub fn candidate_paths(start: PathBuf, user_config_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .collect();
    if let Some(dir) = user_config_dir {
        paths.push(dir.join("scrutineye").join(CONFIG_FILE_NAME));
    }
    paths
}

/// Resolves the effective configuration.
///
/// An explicit path must load; otherwise the first usable discovered file
/// wins and defaults fill in for none.
pub fn load_config(explicit: Option<&Path>) -> Result<ScrutineyeConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to get current directory, using default config");
            return Ok(ScrutineyeConfig::default());
        }
    };

    Ok(candidate_paths(current, dirs::config_dir())
        .iter()
        .find_map(|path| try_load(path))
        .unwrap_or_else(|| {
            tracing::debug!("No config file found, using defaults");
            ScrutineyeConfig::default()
        }))
}

/// Writes a default config file into `dir`.
pub fn init_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    fs::write(&path, ScrutineyeConfig::default().to_toml()?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), ScrutineyeConfig::default());
    }

    #[test]
    fn test_sections_are_read() {
        let config = parse_config(indoc! {r#"
            [display]
            dark_mode = true
            start_view = "seller-intel"

            [inspector]
            name = "Inspector Sharma"

            [thresholds]
            severity = 9
        "#})
        .unwrap();
        assert!(config.display.dark_mode);
        assert_eq!(config.display.start_view(), View::SellerIntel);
        assert_eq!(config.inspector.name, "Inspector Sharma");
        assert_eq!(config.inspector.role, "Senior Regulator");
        assert_eq!(config.thresholds.severity, 9);
        assert_eq!(config.thresholds.ocr_confidence, 85);
    }

    #[test]
    fn test_unknown_start_view_falls_back() {
        let config = parse_config("[display]\nstart_view = \"inbox\"\n").unwrap();
        assert_eq!(config.display.start_view(), View::Dashboard);
    }

    #[test]
    fn test_out_of_range_thresholds_are_clamped() {
        let config = parse_config("[thresholds]\nocr_confidence = 10\n").unwrap();
        assert_eq!(config.thresholds.ocr_confidence, 70);
    }

    #[test]
    fn test_empty_inspector_name_rejected() {
        let err = parse_config("[inspector]\nname = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let text = ScrutineyeConfig::default().to_toml().unwrap();
        assert_eq!(parse_config(&text).unwrap(), ScrutineyeConfig::default());
    }

    #[test]
    fn test_candidates_search_ancestors_then_user_dir() {
        let paths = candidate_paths(PathBuf::from("/a/b"), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/b/.scrutineye.toml"),
                PathBuf::from("/a/.scrutineye.toml"),
                PathBuf::from("/.scrutineye.toml"),
                PathBuf::from("/home/u/.config/scrutineye/.scrutineye.toml"),
            ]
        );
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path(), false).unwrap();
        assert!(path.exists());
        assert!(init_config(dir.path(), false).is_err());
        assert!(init_config(dir.path(), true).is_ok());
    }
}
