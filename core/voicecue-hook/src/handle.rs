//! Event handler for Claude Code hooks.
//!
//! Reads JSON from stdin, resolves a sound, and plays it.
//!
//! ## Degradation
//!
//! ```text
//! empty / invalid stdin   → resolved as Stop
//! mapping missing or bad  → built-in catalog
//! sound file missing      → chime.mp3
//! no file / no player     → terminal bell
//! ```
//!
//! Nothing here returns an error to `main`; every failure is logged and
//! turned into a quieter outcome.

use std::io::{self, Read, Write};
use std::path::Path;

use voicecue_core::config::{env_flag, MUTE_ENV};
use voicecue_core::{
    classify_message, CueConfig, EventContext, EventKind, PatternCatalog, ResolvedSound,
    Resolver, DEFAULT_LOAD_TIMEOUT,
};

use crate::playback::{self, AudioBackend, CommandBackend, SoundSource};

/// What the handler ended up doing with the resolved sound.
#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    Played(SoundSource),
    Bell,
    Muted,
}

pub fn run(config: &CueConfig, voice: &str, debug: bool) {
    let ctx = context_from_input(&read_stdin(), debug);
    log_event_details(&ctx);

    let catalog = PatternCatalog::load_or_builtin(&config.mapping_path, DEFAULT_LOAD_TIMEOUT);
    let resolved = Resolver::new(&catalog).resolve(&ctx);

    let delivery = if env_flag(MUTE_ENV) {
        tracing::info!(sound = %resolved, "Playback muted");
        Delivery::Muted
    } else {
        deliver(&config.sounds_dir, voice, &resolved, &CommandBackend::from_env())
    };
    tracing::debug!(delivery = ?delivery, stage = %resolved.stage, "Hook handled");
}

/// Resolves without playing and prints `sound<TAB>stage` to stdout.
pub fn run_resolve(config: &CueConfig, debug: bool) {
    let ctx = context_from_input(&read_stdin(), debug);
    let catalog = PatternCatalog::load_or_builtin(&config.mapping_path, DEFAULT_LOAD_TIMEOUT);
    let resolved = Resolver::new(&catalog).resolve(&ctx);
    report(&mut io::stdout().lock(), |out| {
        writeln!(out, "{}\t{}", resolved.sound, resolved.stage)
    });
}

/// Loads the mapping and prints any issues. Load failures are reported,
/// not returned, since the hook would fall back to the built-in mapping.
pub fn run_check(config: &CueConfig) {
    let loaded = PatternCatalog::load_with_timeout(&config.mapping_path, DEFAULT_LOAD_TIMEOUT);
    report(&mut io::stdout().lock(), |out| {
        write_check(out, &config.mapping_path, &loaded)
    });
}

pub fn run_voices(config: &CueConfig) {
    let voices = playback::list_voices(&config.sounds_dir);
    report(&mut io::stdout().lock(), |out| {
        if voices.is_empty() {
            writeln!(out, "No voice packs in {}", config.sounds_dir.display())?;
        }
        for voice in &voices {
            writeln!(out, "{}", voice)?;
        }
        Ok(())
    });
}

fn write_check<W: Write>(
    out: &mut W,
    mapping_path: &Path,
    loaded: &voicecue_core::Result<PatternCatalog>,
) -> io::Result<()> {
    match loaded {
        Ok(catalog) if catalog.issues().is_empty() => {
            writeln!(out, "{}: ok", mapping_path.display())
        }
        Ok(catalog) => {
            writeln!(
                out,
                "{}: {} issue(s)",
                mapping_path.display(),
                catalog.issues().len()
            )?;
            for issue in catalog.issues() {
                writeln!(out, "  {}", issue)?;
            }
            Ok(())
        }
        Err(err) => {
            writeln!(out, "{}", err)?;
            writeln!(out, "The built-in mapping will be used.")
        }
    }
}

/// Runs `write` against `out` and flushes. A closed or full stdout is
/// logged; returns whether everything was written.
fn report<W: Write>(out: &mut W, write: impl FnOnce(&mut W) -> io::Result<()>) -> bool {
    match write(out).and_then(|()| out.flush()) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to write to stdout");
            false
        }
    }
}

fn read_stdin() -> String {
    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        tracing::warn!(error = %err, "Failed to read stdin");
    }
    input
}

fn context_from_input(input: &str, debug: bool) -> EventContext {
    if input.trim().is_empty() {
        tracing::warn!("No hook payload on stdin, using default sound");
        return EventContext::unresolved();
    }
    if debug {
        tracing::debug!(payload = %input.trim(), "Hook payload");
    }
    EventContext::from_json_str(input)
}

fn log_event_details(ctx: &EventContext) {
    match ctx.event_kind {
        Some(EventKind::Notification) => {
            let message = ctx.message.as_deref().unwrap_or("No message provided");
            tracing::info!(
                message = %message,
                category = %classify_message(message),
                "Notification event"
            );
        }
        Some(EventKind::SubagentStop) => {
            let active = ctx.stop_hook_active.unwrap_or(false);
            tracing::info!(stop_hook_active = active, "Subagent stop event");
            if active {
                tracing::debug!("Continuing from a previous stop hook");
            }
        }
        _ => {}
    }

    tracing::info!(
        event = ctx.raw_event_name.as_deref().unwrap_or("<none>"),
        tool = ctx.raw_tool_name.as_deref().unwrap_or("None"),
        target = ctx.target_summary().as_deref().unwrap_or(""),
        "Processing hook event"
    );
}

/// Plays the sound, ringing the terminal bell if nothing can be played.
fn deliver(
    sounds_dir: &Path,
    voice: &str,
    resolved: &ResolvedSound,
    backend: &dyn AudioBackend,
) -> Delivery {
    tracing::info!(voice = %voice, sound = %resolved, "Playing sound");
    match playback::play_sound(sounds_dir, voice, resolved.as_str(), backend) {
        Ok(source) => {
            tracing::info!(
                voice = %voice,
                sound = %resolved,
                path = %source.path().display(),
                "Played sound"
            );
            Delivery::Played(source)
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                voice = %voice,
                sound = %resolved,
                "Playback failed, falling back to terminal bell"
            );
            playback::ring_bell();
            Delivery::Bell
        }
    }
}
