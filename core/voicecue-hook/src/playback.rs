//! Plays a resolved sound through a system audio player.
//!
//! Lookup order for a sound file:
//!
//! ```text
//! {sounds}/{voice}/{sound}.mp3
//! {sounds}/{voice}/{sound}.wav
//! {sounds}/chime.mp3
//! ```
//!
//! No decoding happens in this process. The first player found on `PATH`
//! that handles the file format is spawned and given a few seconds to
//! finish. Callers fall back to [`ring_bell`] on any error.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use fs_err as fs;
use thiserror::Error;

/// Voice clips are short; anything longer is cut off.
pub const PLAYBACK_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const CHIME_FILE: &str = "chime.mp3";
const SOUND_FORMATS: &[&str] = &["mp3", "wav"];

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("No sound file for {voice}/{sound} and no chime fallback")]
    NoSoundFile { voice: String, sound: String },

    #[error("No audio player on PATH can play {0}")]
    NoBackend(PathBuf),

    #[error("Failed to start {player}: {source}")]
    Spawn {
        player: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{player} exited with {status}")]
    PlayerFailed { player: String, status: ExitStatus },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a playable file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    Voice(PathBuf),
    Chime(PathBuf),
}

impl SoundSource {
    pub fn path(&self) -> &Path {
        match self {
            SoundSource::Voice(path) | SoundSource::Chime(path) => path,
        }
    }
}

pub struct SoundLocator<'a> {
    sounds_dir: &'a Path,
}

impl<'a> SoundLocator<'a> {
    pub fn new(sounds_dir: &'a Path) -> Self {
        Self { sounds_dir }
    }

    pub fn locate(&self, voice: &str, sound: &str) -> Option<SoundSource> {
        if is_plain_name(voice) && is_plain_name(sound) {
            let voice_dir = self.sounds_dir.join(voice);
            for format in SOUND_FORMATS {
                let candidate = voice_dir.join(format!("{}.{}", sound, format));
                if candidate.is_file() {
                    tracing::debug!(path = %candidate.display(), "Found sound file");
                    return Some(SoundSource::Voice(candidate));
                }
            }
            tracing::warn!(
                voice = %voice,
                sound = %sound,
                dir = %voice_dir.display(),
                "Sound file not found"
            );
        } else {
            tracing::warn!(voice = %voice, sound = %sound, "Rejected sound name");
        }

        let chime = self.sounds_dir.join(CHIME_FILE);
        if chime.is_file() {
            tracing::warn!(path = %chime.display(), "Using chime fallback");
            return Some(SoundSource::Chime(chime));
        }
        None
    }
}

/// Names come from the mapping file and CLI; keep them inside the sounds dir.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

pub trait AudioBackend {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

struct Player {
    program: &'static str,
    args: &'static [&'static str],
    formats: &'static [&'static str],
}

const PLAYERS: &[Player] = &[
    Player {
        program: "afplay",
        args: &[],
        formats: &["mp3", "wav"],
    },
    Player {
        program: "paplay",
        args: &[],
        formats: &["wav"],
    },
    Player {
        program: "aplay",
        args: &["-q"],
        formats: &["wav"],
    },
    Player {
        program: "mpg123",
        args: &["-q"],
        formats: &["mp3"],
    },
    Player {
        program: "ffplay",
        args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
        formats: &["mp3", "wav"],
    },
];

/// Spawns an external player found on the search path.
pub struct CommandBackend {
    search_path: Vec<PathBuf>,
    timeout: Duration,
}

impl CommandBackend {
    pub fn from_env() -> Self {
        let search_path = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self::with_search_path(search_path)
    }

    pub fn with_search_path(search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path,
            timeout: PLAYBACK_TIMEOUT,
        }
    }

    fn find_player(&self, format: &str) -> Option<(&'static Player, PathBuf)> {
        PLAYERS
            .iter()
            .filter(|player| player.formats.contains(&format))
            .find_map(|player| {
                self.search_path
                    .iter()
                    .map(|dir| dir.join(player.program))
                    .find(|candidate| candidate.is_file())
                    .map(|program| (player, program))
            })
    }
}

impl AudioBackend for CommandBackend {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let (player, program) = self
            .find_player(&format)
            .ok_or_else(|| PlaybackError::NoBackend(path.to_path_buf()))?;

        let mut child = Command::new(&program)
            .args(player.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                player: player.program.to_string(),
                source,
            })?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                if status.success() {
                    return Ok(());
                }
                return Err(PlaybackError::PlayerFailed {
                    player: player.program.to_string(),
                    status,
                });
            }
            if started.elapsed() >= self.timeout {
                tracing::debug!(player = player.program, "Playback timed out, stopping player");
                let _ = child.kill();
                let _ = child.wait();
                return Ok(());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Locates and plays `voice/sound`, returning the file that was played.
pub fn play_sound(
    sounds_dir: &Path,
    voice: &str,
    sound: &str,
    backend: &dyn AudioBackend,
) -> Result<SoundSource, PlaybackError> {
    let source = SoundLocator::new(sounds_dir)
        .locate(voice, sound)
        .ok_or_else(|| PlaybackError::NoSoundFile {
            voice: voice.to_string(),
            sound: sound.to_string(),
        })?;
    backend.play(source.path())?;
    Ok(source)
}

/// Terminal bell, the last fallback when nothing else can make a sound.
pub fn ring_bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

/// Voice packs available under the sounds directory.
pub fn list_voices(sounds_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(sounds_dir) else {
        return Vec::new();
    };
    let mut voices: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| !name.starts_with('.'))
        .collect();
    voices.sort();
    voices
}
