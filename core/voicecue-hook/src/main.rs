//! voicecue-hook: voice notifications for Claude Code hook events.
//!
//! Rust binary that maps each hook event to a sound and plays it.
//! Called directly by Claude Code hooks configured in ~/.claude/settings.json:
//!
//! ```json
//! { "type": "command", "command": "voicecue-hook --voice alfred" }
//! ```
//!
//! ## Subcommands
//!
//! - (none) / `handle`: Main hook handler, reads JSON from stdin and plays a sound
//! - `resolve`: Reads JSON from stdin and prints the resolved sound without playing
//! - `check`: Validates the sound mapping
//! - `voices`: Lists installed voice packs
//!
//! The process always exits 0. A non-zero exit would make Claude Code treat
//! the notification hook as broken.

mod handle;
mod logging;
mod playback;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use voicecue_core::config::ConfigOverrides;
use voicecue_core::CueConfig;

const DEFAULT_VOICE: &str = "alfred";

#[derive(Parser)]
#[command(name = "voicecue-hook")]
#[command(about = "Voice notifications for Claude Code hook events")]
#[command(version)]
struct Cli {
    /// Voice pack to play from (subdirectory of the sounds directory)
    #[arg(long, global = true, default_value = DEFAULT_VOICE)]
    voice: String,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Base directory for mapping, sounds and logs
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Sound mapping file (defaults to <home>/sound_mapping.json)
    #[arg(long, global = true, value_name = "PATH")]
    mapping: Option<PathBuf>,

    /// Directory containing voice packs (defaults to <home>/sounds)
    #[arg(long, global = true, value_name = "DIR")]
    sounds_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Used when arguments cannot be parsed, so the hook still makes a sound.
    fn fallback() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            debug: false,
            home: None,
            mapping: None,
            sounds_dir: None,
            command: None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a hook event (reads JSON from stdin)
    Handle,

    /// Print the sound a hook event resolves to (reads JSON from stdin)
    Resolve,

    /// Validate the sound mapping
    Check,

    /// List installed voice packs
    Voices,
}

fn main() {
    let (cli, arg_error) = match Cli::try_parse() {
        Ok(cli) => (cli, None),
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = err.print();
                return;
            }
            (Cli::fallback(), Some(err.to_string()))
        }
    };

    let overrides = ConfigOverrides {
        home: cli.home.clone(),
        mapping_path: cli.mapping.clone(),
        sounds_dir: cli.sounds_dir.clone(),
    };
    let (config, config_error) = match CueConfig::resolve(overrides) {
        Ok(config) => (config, None),
        Err(err) => (
            CueConfig::with_home(std::env::temp_dir().join("voice-notifications")),
            Some(err),
        ),
    };

    let _logging_guard = logging::init(&config.log_dir, cli.debug);

    if let Some(err) = arg_error {
        tracing::warn!(error = %err.trim(), "Invalid arguments, using defaults");
    }
    if let Some(err) = config_error {
        tracing::warn!(error = %err, home = %config.home.display(), "Using fallback home");
    }
    tracing::debug!(
        voice = %cli.voice,
        mapping = %config.mapping_path.display(),
        sounds = %config.sounds_dir.display(),
        "voicecue-hook started"
    );

    match cli.command.unwrap_or(Commands::Handle) {
        Commands::Handle => handle::run(&config, &cli.voice, cli.debug),
        Commands::Resolve => handle::run_resolve(&config, cli.debug),
        Commands::Check => handle::run_check(&config),
        Commands::Voices => handle::run_voices(&config),
    }
}
