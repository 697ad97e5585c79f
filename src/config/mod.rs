use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::DisplayScale;
use crate::errors::PlannerError;
use crate::report::DEFAULT_PAGE_HEIGHT;
use crate::templates::DEFAULT_TEMPLATE_KEY;
use crate::utils::paths::{app_data_dir, ensure_dir};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: [&str; 4] = ["default_template", "scale", "page_height", "export_dir"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_template: String,
    pub scale: DisplayScale,
    pub page_height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_TEMPLATE_KEY.into(),
            scale: DisplayScale::default(),
            page_height: DEFAULT_PAGE_HEIGHT,
            export_dir: None,
        }
    }
}

impl Config {
    /// Updates one key from its textual form. An empty `export_dir` clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PlannerError> {
        let value = value.trim();
        match key {
            "default_template" => {
                if value.is_empty() {
                    return Err(PlannerError::ConfigError("template key cannot be empty".into()));
                }
                self.default_template = value.to_string();
            }
            "scale" => {
                self.scale = value.parse().map_err(PlannerError::ConfigError)?;
            }
            "page_height" => {
                let height: usize = value.parse().map_err(|_| {
                    PlannerError::ConfigError(format!("`{value}` is not a line count"))
                })?;
                if height == 0 {
                    return Err(PlannerError::ConfigError(
                        "page_height must be at least 1".into(),
                    ));
                }
                self.page_height = height;
            }
            "export_dir" => {
                self.export_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => {
                return Err(PlannerError::ConfigError(format!(
                    "unknown key `{other}`; expected one of {}",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Resolves a relative output path against `export_dir` when one is configured.
    pub fn resolve_output(&self, path: &Path) -> PathBuf {
        match &self.export_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, PlannerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, PlannerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the stored configuration, or the defaults when none was saved yet.
    pub fn load(&self) -> Result<Config, PlannerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| PlannerError::ConfigError(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), PlannerError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), PlannerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
