//! Path resolution and environment switches.
//!
//! Everything lives under one home directory:
//! - `sound_mapping.json` (the catalog)
//! - `sounds/{voice}/{sound}.mp3|.wav` and `sounds/chime.mp3`
//! - `logs/` (hook log files)
//!
//! The home is `$VOICECUE_HOME` when set, otherwise
//! `~/.claude/voice-notifications`. CLI overrides win over both.

use std::env;
use std::path::PathBuf;

use crate::error::{CueError, Result};

pub const HOME_ENV: &str = "VOICECUE_HOME";
pub const MUTE_ENV: &str = "VOICECUE_MUTE";
pub const DEBUG_LOG_ENV: &str = "VOICECUE_DEBUG_LOG";

const MAPPING_FILE: &str = "sound_mapping.json";
const SOUNDS_DIR: &str = "sounds";
const LOGS_DIR: &str = "logs";

/// Returns the default home directory (~/.claude/voice-notifications).
pub fn default_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude").join("voice-notifications"))
}

/// `$VOICECUE_HOME` when set and non-empty, else [`default_home`].
pub fn voicecue_home() -> Option<PathBuf> {
    env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(default_home)
}

/// True for `1`, `true`, or `yes` in either case.
pub fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub home: Option<PathBuf>,
    pub mapping_path: Option<PathBuf>,
    pub sounds_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueConfig {
    pub home: PathBuf,
    pub mapping_path: PathBuf,
    pub sounds_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl CueConfig {
    /// Lays out all paths under `home`.
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            mapping_path: home.join(MAPPING_FILE),
            sounds_dir: home.join(SOUNDS_DIR),
            log_dir: home.join(LOGS_DIR),
            home,
        }
    }

    /// Merges CLI overrides over the environment over defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let home = match overrides.home {
            Some(home) => home,
            None => voicecue_home().ok_or(CueError::HomeDirNotFound)?,
        };
        let mut config = Self::with_home(home);
        if let Some(path) = overrides.mapping_path {
            config.mapping_path = path;
        }
        if let Some(dir) = overrides.sounds_dir {
            config.sounds_dir = dir;
        }
        Ok(config)
    }
}
