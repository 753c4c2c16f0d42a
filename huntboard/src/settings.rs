use std::fs;
use std::path::{Path, PathBuf};

use huntboard_nav::NavigationTiming;
use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
const DEFAULT_REPLY_CHUNK_WORDS: usize = 3;

/// User settings of the headless host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct HostSettings {
    pub(crate) viewport_width: f32,
    /// Keep the selection local instead of mirroring it to the parent.
    pub(crate) standalone: bool,
    pub(crate) timing: NavigationTiming,
    /// Overrides the default panel layout file.
    pub(crate) layouts_path: Option<PathBuf>,
    /// Words per streamed chat reply chunk.
    pub(crate) reply_chunk_words: usize,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            standalone: false,
            timing: NavigationTiming::default(),
            layouts_path: None,
            reply_chunk_words: DEFAULT_REPLY_CHUNK_WORDS,
        }
    }
}

/// Status describing how settings were loaded from disk.
#[derive(Debug, Clone)]
pub(crate) enum SettingsLoadStatus {
    Loaded,
    Missing,
    Invalid(String),
}

/// Result of loading settings from disk.
#[derive(Debug, Clone)]
pub(crate) struct SettingsLoad {
    settings: HostSettings,
    status: SettingsLoadStatus,
}

impl SettingsLoad {
    pub(crate) fn new(
        settings: HostSettings,
        status: SettingsLoadStatus,
    ) -> Self {
        Self { settings, status }
    }

    pub(crate) fn into_parts(self) -> (HostSettings, SettingsLoadStatus) {
        (self.settings, self.status)
    }
}

pub(crate) fn load_settings() -> Result<SettingsLoad, SettingsError> {
    load_settings_from_path(&settings_path())
}

fn load_settings_from_path(path: &Path) -> Result<SettingsLoad, SettingsError> {
    let data = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(SettingsLoad::new(
                HostSettings::default(),
                SettingsLoadStatus::Missing,
            ));
        },
        Err(err) => return Err(err.into()),
    };

    match serde_json::from_str::<HostSettings>(&data) {
        Ok(settings) => {
            Ok(SettingsLoad::new(settings, SettingsLoadStatus::Loaded))
        },
        Err(err) => Ok(SettingsLoad::new(
            HostSettings::default(),
            SettingsLoadStatus::Invalid(format!("{err}")),
        )),
    }
}

fn settings_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("huntboard")
            .join("settings.json");
    }

    std::env::temp_dir().join("huntboard").join("settings.json")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{HostSettings, SettingsLoadStatus, load_settings_from_path};

    #[test]
    fn given_partial_settings_when_load_then_missing_fields_default() {
        let root = test_temp_dir("partial");
        let path = root.join("settings.json");
        fs::write(&path, r#"{ "viewportWidth": 390, "standalone": true }"#)
            .expect("settings payload should be written");

        let (settings, status) = load_settings_from_path(&path)
            .expect("settings should load successfully")
            .into_parts();

        assert!(matches!(status, SettingsLoadStatus::Loaded));
        assert_eq!(settings.viewport_width, 390.0);
        assert!(settings.standalone);
        assert_eq!(settings.reply_chunk_words, 3);

        fs::remove_dir_all(&root)
            .expect("temporary directory should be removed");
    }

    #[test]
    fn given_missing_file_when_load_then_defaults_with_missing_status() {
        let root = test_temp_dir("missing");

        let (settings, status) =
            load_settings_from_path(&root.join("settings.json"))
                .expect("missing settings should not fail")
                .into_parts();

        assert!(matches!(status, SettingsLoadStatus::Missing));
        assert_eq!(settings, HostSettings::default());

        fs::remove_dir_all(&root)
            .expect("temporary directory should be removed");
    }

    #[test]
    fn given_invalid_json_when_load_then_returns_default_with_invalid_status() {
        let root = test_temp_dir("invalid_json");
        let path = root.join("settings.json");
        fs::write(&path, "{ this is not valid json")
            .expect("invalid test payload should be written");

        let (settings, status) = load_settings_from_path(&path)
            .expect("loading invalid settings should not fail with io error")
            .into_parts();

        assert_eq!(settings, HostSettings::default());
        match status {
            SettingsLoadStatus::Invalid(message) => {
                assert!(!message.is_empty());
            },
            other => panic!("expected invalid status, got {other:?}"),
        }

        fs::remove_dir_all(&root)
            .expect("temporary directory should be removed");
    }

    fn test_temp_dir(test_name: &str) -> std::path::PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "huntboard-settings-{test_name}-{stamp}-{}",
            std::process::id()
        ));

        fs::create_dir_all(&dir)
            .expect("temporary directory should be created");
        dir
    }
}
