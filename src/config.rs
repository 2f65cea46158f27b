use crate::event::KeyCode;
use crate::keycode::code_from_key;
use crate::tracker::TriggerKeys;
use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use rdev::Key;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub keymaps: KeyMaps,
    pub playback: PlaybackSettings,
    /// Listing imported at startup and written back on exit.
    pub macros_path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KeyMaps {
    /// Pressed together to arm a recording, and again to stop it.
    pub arm: [Key; 3],
    /// Prefix of each recorded slot's identifier; the third key is the slot's number key.
    pub slot_modifiers: [Key; 2],
}

impl Default for KeyMaps {
    fn default() -> Self {
        Self {
            arm: [Key::ControlLeft, Key::Alt, Key::ShiftLeft],
            slot_modifiers: [Key::ControlLeft, Key::ShiftLeft],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PlaybackSettings {
    pub settle_delay_ms: u64,
    pub flush_delay_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1,
            flush_delay_ms: 20,
        }
    }
}

impl PlaybackSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }
}

fn resolve(key: Key) -> Result<KeyCode> {
    code_from_key(key).ok_or_else(|| anyhow!("key {:?} has no key code", key))
}

fn distinct(codes: &[KeyCode]) -> bool {
    codes
        .iter()
        .enumerate()
        .all(|(i, code)| !codes[i + 1..].contains(code))
}

impl KeyMaps {
    pub fn trigger_keys(&self) -> Result<TriggerKeys> {
        let arm = [resolve(self.arm[0])?, resolve(self.arm[1])?, resolve(self.arm[2])?];
        let slot_modifiers = [resolve(self.slot_modifiers[0])?, resolve(self.slot_modifiers[1])?];
        if !distinct(&arm) {
            bail!("arm keys must be three different keys: {:?}", self.arm);
        }
        if !distinct(&slot_modifiers) {
            bail!("slot modifiers must be two different keys: {:?}", self.slot_modifiers);
        }
        Ok(TriggerKeys { arm, slot_modifiers })
    }
}

impl Config {
    pub fn macros_path(&self) -> Result<PathBuf> {
        match &self.macros_path {
            Some(path) => Ok(path.clone()),
            None => default_macros_path(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "keymac").ok_or_else(|| anyhow!("no home directory found"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn default_macros_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("macros.txt"))
}

/// Loads the config at `path`, or the default location. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    if !path.exists() {
        log::info!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    let config: Config =
        serde_json::from_str(&content).with_context(|| format!("parsing {:?}", path))?;
    log::info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path).with_context(|| format!("creating {:?}", path))?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}
