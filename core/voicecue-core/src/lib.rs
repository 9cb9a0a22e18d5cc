//! # voicecue-core
//!
//! Sound cue resolution for Claude Code hook events: turns one hook payload
//! into one sound identifier using a layered `sound_mapping.json`.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The only I/O is the
//!   bounded catalog load.
//! - **Stateless**: Every invocation builds a fresh context and catalog.
//! - **Graceful degradation**: Bad input, a missing mapping, or an empty spec
//!   all degrade to a default sound, never to an error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voicecue_core::{EventContext, PatternCatalog, Resolver, DEFAULT_LOAD_TIMEOUT};
//!
//! let catalog = PatternCatalog::load_or_builtin(&config.mapping_path, DEFAULT_LOAD_TIMEOUT);
//! let ctx = EventContext::from_json_str(&stdin);
//! let sound = Resolver::new(&catalog).resolve(&ctx);
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod resolver;
pub mod select;
pub mod types;

pub use catalog::{
    BashPatterns, CatalogIssue, CommandPatterns, FilePatterns, HookEventSounds, PatternCatalog,
    SoundSpec, DEFAULT_LOAD_TIMEOUT,
};
pub use classify::classify_message;
pub use config::CueConfig;
pub use context::EventContext;
pub use error::{CueError, Result};
pub use resolver::{resolve, ResolutionStage, ResolvedSound, Resolver};
pub use select::{
    select, FirstPicker, RandomPicker, SeededPicker, VariantPicker, FALLBACK_SOUND,
};
pub use types::*;
