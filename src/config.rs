use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::Difficulty;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_timed_seconds")]
    pub timed_seconds: u64,
    #[serde(default = "default_fetch_words")]
    pub fetch_words: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_difficulty() -> String {
    "easy".to_string()
}
fn default_word_count() -> usize {
    25
}
fn default_timed_seconds() -> u64 {
    30
}
fn default_fetch_words() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            difficulty: default_difficulty(),
            word_count: default_word_count(),
            timed_seconds: default_timed_seconds(),
            fetch_words: default_fetch_words(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("klack")
            .join("config.toml")
    }

    pub fn resolved_difficulty(&self) -> Difficulty {
        Difficulty::from_name(&self.difficulty).unwrap_or_default()
    }

    /// Reset unknown values left behind by hand edits or old versions.
    fn normalize(&mut self) {
        if Difficulty::from_name(&self.difficulty).is_none() {
            self.difficulty = default_difficulty();
        }
        if self.word_count == 0 {
            self.word_count = default_word_count();
        }
        if self.timed_seconds == 0 {
            self.timed_seconds = default_timed_seconds();
        }
    }
}
