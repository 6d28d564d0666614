use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Options shared by every retarget and dress run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DresserSettings {
    /// Name of the avatar child that roots the target skeleton.
    pub armature_name: String,
    /// Fall back to canonical alias matching when exact names differ.
    pub semantic_matching: bool,
    /// Recompute local transforms so reparented bones keep their world pose.
    pub preserve_world_transform: bool,
    /// Move each dressed mesh node under the avatar root.
    pub relocate_meshes: bool,
}

impl Default for DresserSettings {
    fn default() -> Self {
        Self {
            armature_name: "Armature".to_string(),
            semantic_matching: true,
            preserve_world_transform: true,
            relocate_meshes: true,
        }
    }
}

impl DresserSettings {
    /// Read settings from a JSON file. Fields missing from the file keep
    /// their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read dresser settings: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid dresser settings JSON: {}", path.display()))
    }

    /// Write settings as pretty JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("failed to serialize dresser settings")?;
        fs::write(path, content)
            .with_context(|| format!("failed to write dresser settings: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_serialize_then_json_contains_armature_name() {
        let settings = DresserSettings::default();
        let json = serde_json::to_string(&settings).expect("serialize settings");
        assert!(json.contains("\"armature_name\":\"Armature\""));
    }

    #[test]
    fn given_partial_json_when_parsing_then_missing_fields_use_defaults() {
        let settings: DresserSettings =
            serde_json::from_value(serde_json::json!({ "semantic_matching": false }))
                .expect("parse settings");
        assert!(!settings.semantic_matching);
        assert_eq!(settings.armature_name, "Armature");
        assert!(settings.relocate_meshes);
    }

    #[test]
    fn given_saved_settings_when_loading_then_values_survive() {
        let mut path = std::env::temp_dir();
        path.push(format!("avatar-dresser-settings-{}.json", std::process::id()));
        let settings = DresserSettings {
            armature_name: "Root".to_string(),
            preserve_world_transform: false,
            ..DresserSettings::default()
        };

        settings.save(&path).expect("save settings");
        let loaded = DresserSettings::load(&path).expect("load settings");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn given_malformed_file_when_loading_then_error_names_the_path() {
        let mut path = std::env::temp_dir();
        path.push(format!("avatar-dresser-broken-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"armature_name\": 3 }").expect("write settings");

        let error = DresserSettings::load(&path).expect_err("malformed file must fail");
        let _ = std::fs::remove_file(&path);

        assert!(error.to_string().contains("avatar-dresser-broken"));
    }

    #[test]
    fn given_missing_file_when_loading_then_error_names_the_path() {
        let path = Path::new("/nonexistent/avatar-dresser/settings.json");
        let error = DresserSettings::load(path).expect_err("missing file must fail");
        assert!(error.to_string().contains("settings.json"));
    }
}
