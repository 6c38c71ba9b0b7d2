use std::fs;
use std::path::{Path, PathBuf};

use sdui::{DispatcherOptions, ValidatorOptions};
use serde::Serialize;
use thiserror::Error;

/// Errors emitted while reading settings.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("settings IO failed")]
    Io(#[from] std::io::Error),
    #[error("settings JSON failed")]
    Json(#[from] serde_json::Error),
}

/// Status describing how settings were loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingsLoadStatus {
    Loaded,
    Missing,
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatorSettings {
    pub(crate) strict: bool,
    pub(crate) deny_warnings: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DispatchSettings {
    pub(crate) max_depth: Option<usize>,
}

/// Tool settings read from `settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Settings {
    pub(crate) validator: ValidatorSettings,
    pub(crate) dispatch: DispatchSettings,
}

impl Settings {
    /// Read known fields, keeping defaults for missing or mistyped ones.
    pub(crate) fn from_json(value: &serde_json::Value) -> Self {
        let mut settings = Settings::default();

        if let Some(validator) = value.get("validator") {
            if let Some(strict) = read_bool_field(validator, "strict") {
                settings.validator.strict = strict;
            }
            if let Some(deny) = read_bool_field(validator, "denyWarnings") {
                settings.validator.deny_warnings = deny;
            }
        }

        if let Some(dispatch) = value.get("dispatch") {
            settings.dispatch.max_depth = dispatch
                .get("maxDepth")
                .and_then(serde_json::Value::as_u64)
                .and_then(|depth| usize::try_from(depth).ok());
        }

        settings
    }

    pub(crate) fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            strict: self.validator.strict,
        }
    }

    pub(crate) fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions {
            max_depth: self.dispatch.max_depth,
        }
    }
}

/// Settings together with where they came from.
#[derive(Debug, Clone)]
pub(crate) struct LoadedSettings {
    pub(crate) settings: Settings,
    pub(crate) status: SettingsLoadStatus,
    pub(crate) source: PathBuf,
}

/// Load from `path`, or from the default location when `None`. A missing or
/// unparsable file yields defaults; only IO failures are errors.
pub(crate) fn load_settings(
    path: Option<&Path>,
) -> Result<LoadedSettings, SettingsError> {
    let source = match path {
        Some(path) => path.to_path_buf(),
        None => default_settings_path(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        ),
    };

    let (settings, status) = match fs::read_to_string(&source) {
        Ok(data) => parse_settings(&data),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            (Settings::default(), SettingsLoadStatus::Missing)
        },
        Err(err) => return Err(err.into()),
    };

    Ok(LoadedSettings {
        settings,
        status,
        source,
    })
}

fn parse_settings(data: &str) -> (Settings, SettingsLoadStatus) {
    match serde_json::from_str::<serde_json::Value>(data) {
        Ok(value) => (Settings::from_json(&value), SettingsLoadStatus::Loaded),
        Err(err) => (
            Settings::default(),
            SettingsLoadStatus::Invalid(err.to_string()),
        ),
    }
}

/// `$XDG_CONFIG_HOME/sdui/settings.json`, else `~/.config/sdui/...`, else
/// the temp dir.
fn default_settings_path(
    config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    let base = config_home
        .filter(|dir| dir.is_absolute())
        .or_else(|| home.map(|home| home.join(".config")))
        .unwrap_or_else(std::env::temp_dir);
    base.join("sdui").join("settings.json")
}

fn read_bool_field(value: &serde_json::Value, key: &str) -> Option<bool> {
    value.get(key).and_then(serde_json::Value::as_bool)
}
