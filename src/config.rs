//! Game configuration, dataset presets and language defaults.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::challenge::MAX_TEAM_SIZE;
use crate::error::{EngineError, Result};

/// Default number of autocomplete candidates.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" => Language::De,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self { Language::En => "en", Language::De => "de" }
    }

    pub fn default_dataset_path(self) -> &'static str {
        preset_for(self, PresetSize::Small).path
    }

    pub fn medium_dataset_path(self) -> &'static str {
        preset_for(self, PresetSize::Medium).path
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Equation,
    Teams,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetSize { Small, Medium }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetPreset {
    pub id: &'static str,
    pub language: Language,
    pub size: PresetSize,
    pub path: &'static str,
    pub label: &'static str,
}

pub const DATASET_PRESETS: [DatasetPreset; 4] = [
    DatasetPreset {
        id: "en-small", language: Language::En, size: PresetSize::Small,
        path: "data/glove.2024.wikigiga.50d.top14000.txt", label: "English small (14k)",
    },
    DatasetPreset {
        id: "en-medium", language: Language::En, size: PresetSize::Medium,
        path: "data/glove.2024.wikigiga.50d.top50000.txt", label: "English medium (50k)",
    },
    DatasetPreset {
        id: "de-small", language: Language::De, size: PresetSize::Small,
        path: "data/cc.de.300.top14000.txt", label: "German small (14k)",
    },
    DatasetPreset {
        id: "de-medium", language: Language::De, size: PresetSize::Medium,
        path: "data/cc.de.300.top30000.txt", label: "German medium (30k)",
    },
];

fn preset_for(language: Language, size: PresetSize) -> &'static DatasetPreset {
    // Every (language, size) pair has a row above.
    DATASET_PRESETS
        .iter()
        .find(|p| p.language == language && p.size == size)
        .unwrap_or(&DATASET_PRESETS[0])
}

pub fn preset_by_id(id: &str) -> Option<&'static DatasetPreset> {
    DATASET_PRESETS.iter().find(|p| p.id == id)
}

/// Preset whose path matches exactly; `None` means a custom path.
pub fn preset_for_path(path: &str) -> Option<&'static DatasetPreset> {
    let path = path.trim();
    DATASET_PRESETS.iter().find(|p| p.path == path)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Empty in a config file means the language's default table.
    #[serde(default)]
    pub dataset_path: String,
    pub language: Language,
    pub variant: Variant,
    /// Words per team in the team variant, 1..=10.
    pub team_size: usize,
    /// Grow `team_size` by one after every scored team round.
    pub auto_increment: bool,
    pub suggestion_limit: usize,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dataset_path: Language::En.default_dataset_path().to_string(),
            language: Language::En,
            variant: Variant::Equation,
            team_size: 1,
            auto_increment: false,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mut cfg: GameConfig = serde_json::from_slice(&bytes)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        if cfg.dataset_path.trim().is_empty() {
            cfg.dataset_path = cfg.language.default_dataset_path().to_string();
        }
        cfg.team_size = clamp_team_size(cfg.team_size);
        Ok(cfg)
    }

    /// Switch language. The dataset path follows only if it was empty or
    /// still the previous language's default.
    pub fn set_language(&mut self, next: Language) {
        let previous_default = self.language.default_dataset_path();
        self.language = next;
        let current = self.dataset_path.trim();
        if current.is_empty() || current == previous_default {
            self.dataset_path = next.default_dataset_path().to_string();
        }
    }

    /// Point the config at a preset by id.
    pub fn use_preset(&mut self, id: &str) -> Result<&'static DatasetPreset> {
        let preset = preset_by_id(id)
            .ok_or_else(|| EngineError::Config(format!("unknown dataset preset {:?}", id)))?;
        self.dataset_path = preset.path.to_string();
        Ok(preset)
    }

    pub fn set_team_size(&mut self, n: usize) {
        self.team_size = clamp_team_size(n);
    }
}

pub fn clamp_team_size(n: usize) -> usize {
    n.clamp(1, MAX_TEAM_SIZE)
}

/// Team size typed by a player; clamped into range, never defaulted.
pub fn parse_team_size(text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .map(clamp_team_size)
        .map_err(|e| EngineError::Config(format!("team size {:?}: {}", text.trim(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = GameConfig::default();
        assert_eq!(c.dataset_path, "data/glove.2024.wikigiga.50d.top14000.txt");
        assert_eq!(c.team_size, 1);
        assert_eq!(c.suggestion_limit, 12);
        assert_eq!(preset_for_path(&c.dataset_path).unwrap().id, "en-small");
    }

    #[test]
    fn language_switch_follows_default_path_only() {
        let mut c = GameConfig::default();
        c.set_language(Language::De);
        assert_eq!(c.dataset_path, "data/cc.de.300.top14000.txt");

        c.dataset_path = "my/own.txt".into();
        c.set_language(Language::En);
        assert_eq!(c.dataset_path, "my/own.txt");
        assert!(preset_for_path(&c.dataset_path).is_none());
    }

    #[test]
    fn presets_and_medium_paths() {
        let mut c = GameConfig::default();
        assert_eq!(c.use_preset("de-medium").unwrap().label, "German medium (30k)");
        assert_eq!(c.dataset_path, Language::De.medium_dataset_path());
        assert!(c.use_preset("fr-small").is_err());
        assert_eq!(Language::from_code("DE"), Language::De);
        assert_eq!(Language::from_code("xx"), Language::En);
    }

    #[test]
    fn team_size_is_clamped() {
        let mut c = GameConfig::default();
        c.set_team_size(0);
        assert_eq!(c.team_size, 1);
        c.set_team_size(42);
        assert_eq!(c.team_size, 10);
    }

    #[test]
    fn typed_team_size() {
        assert_eq!(parse_team_size(" 4 ").unwrap(), 4);
        assert_eq!(parse_team_size("0").unwrap(), 1);
        assert_eq!(parse_team_size("99").unwrap(), 10);
        assert!(matches!(parse_team_size("many"), Err(EngineError::Config(_))));
        assert!(matches!(parse_team_size(""), Err(EngineError::Config(_))));
        assert!(matches!(parse_team_size("-2"), Err(EngineError::Config(_))));
    }

    #[test]
    fn loads_partial_json() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"language":"de","variant":"teams","team_size":15,"seed":9}}"#).unwrap();
        let c = GameConfig::load(f.path()).unwrap();
        assert_eq!(c.language, Language::De);
        assert_eq!(c.variant, Variant::Teams);
        assert_eq!(c.team_size, 10);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.dataset_path, Language::De.default_dataset_path());
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{ nope").unwrap();
        assert!(matches!(GameConfig::load(f.path()), Err(EngineError::Config(_))));
    }

    #[test]
    fn missing_config_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
