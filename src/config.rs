//! User configuration for the CLI.
//!
//! Read from `<config_dir>/cellgraph/config.toml`, or from the file given
//! with `--config`. Problems never abort the program: they are reported as
//! warnings and the defaults are used instead.

use cellgraph_engine::engine::{DEFAULT_VERSION, EngineConfig, NameCase};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    version: Option<String>,
    name_case: Option<NameCase>,
}

/// Settings resolved from the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Version tag written to, and required of, documents.
    pub version: String,
    pub name_case: NameCase,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: DEFAULT_VERSION.to_string(),
            name_case: NameCase::default(),
        }
    }
}

impl Settings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.version.clone()).with_name_case(self.name_case)
    }
}

/// Load settings from `config_file`, or from the user config directory.
///
/// A missing default file is not an error; a missing explicit file is a warning.
pub fn load_settings(config_file: Option<&Path>) -> (Settings, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = config_file.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = config_path else {
        return (Settings::default(), warnings);
    };
    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Settings::default(), warnings);
    }

    let file = match read_config_file(&path) {
        Ok(file) => file,
        Err(warning) => {
            warnings.push(warning);
            return (Settings::default(), warnings);
        }
    };

    let mut settings = Settings::default();
    if let Some(version) = file.version {
        let version = version.trim();
        if version.is_empty() {
            warnings.push(format!(
                "Ignoring empty version in {}; using '{}'",
                path.display(),
                DEFAULT_VERSION
            ));
        } else {
            settings.version = version.to_string();
        }
    }
    if let Some(name_case) = file.name_case {
        settings.name_case = name_case;
    }
    (settings, warnings)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    toml::from_str::<ConfigFile>(&content)
        .map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgraph")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
