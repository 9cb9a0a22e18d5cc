//! Resolves an [`EventContext`] to one sound identifier.
//!
//! ## Precedence
//!
//! ```text
//! 1. Notification   message category  → hook_events.Notification[category|default]
//! 2. Context        file path/command → file_operations / bash_commands
//! 3. Tool           tool kind         → tools[tool]
//! 4. HookEvent      event kind        → hook_events[event][tool|default]
//! 5. Default                          → default
//! ```
//!
//! The first stage that finds a spec wins. A stage that finds nothing hands
//! off to the next one; stage 5 always has a spec.

use crate::catalog::{PatternCatalog, SoundSpec};
use crate::classify::classify_message;
use crate::context::EventContext;
use crate::select::{select, RandomPicker, VariantPicker};
use crate::types::{file_name, CommandFamily, EventKind, FileKind, GitCommand, NamedSet, ToolKind};

/// Which stage produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    Notification,
    Context,
    Tool,
    HookEvent,
    Default,
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionStage::Notification => write!(f, "notification"),
            ResolutionStage::Context => write!(f, "context"),
            ResolutionStage::Tool => write!(f, "tool"),
            ResolutionStage::HookEvent => write!(f, "hook_event"),
            ResolutionStage::Default => write!(f, "default"),
        }
    }
}

/// A concrete, non-empty sound identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSound {
    pub sound: String,
    pub stage: ResolutionStage,
}

impl ResolvedSound {
    pub fn as_str(&self) -> &str {
        &self.sound
    }
}

impl std::fmt::Display for ResolvedSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sound)
    }
}

/// Resolves events against a borrowed catalog.
pub struct Resolver<'a, P = RandomPicker> {
    catalog: &'a PatternCatalog,
    picker: P,
}

impl<'a> Resolver<'a, RandomPicker> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self::with_picker(catalog, RandomPicker)
    }
}

impl<'a, P: VariantPicker> Resolver<'a, P> {
    pub fn with_picker(catalog: &'a PatternCatalog, picker: P) -> Self {
        Self { catalog, picker }
    }

    pub fn resolve(&mut self, ctx: &EventContext) -> ResolvedSound {
        let (stage, spec) = self.find_spec(ctx);
        let sound = select(spec, &mut self.picker);
        tracing::debug!(
            event = %ctx.effective_event_kind(),
            tool = ?ctx.tool_kind,
            stage = %stage,
            sound = %sound,
            "Resolved sound"
        );
        ResolvedSound { sound, stage }
    }

    fn find_spec(&self, ctx: &EventContext) -> (ResolutionStage, &'a SoundSpec) {
        let event = ctx.effective_event_kind();

        if let Some(spec) = self.notification_spec(event, ctx) {
            return (ResolutionStage::Notification, spec);
        }

        if let Some(spec) = self.context_spec(event, ctx) {
            return (ResolutionStage::Context, spec);
        }

        if let Some(spec) = ctx.tool_kind.and_then(|tool| self.catalog.tool(tool)) {
            return (ResolutionStage::Tool, spec);
        }
        if let Some(tool) = ctx.tool_kind {
            tracing::debug!(tool = %tool, "No tool mapping, trying hook event");
        }

        if let Some(spec) = self.hook_event_spec(event, ctx.tool_kind) {
            return (ResolutionStage::HookEvent, spec);
        }

        tracing::warn!(
            event = %event,
            tool = ?ctx.tool_kind,
            "No mapping for event, using default sound"
        );
        (ResolutionStage::Default, self.catalog.default_sound())
    }

    fn notification_spec(&self, event: EventKind, ctx: &EventContext) -> Option<&'a SoundSpec> {
        if event != EventKind::Notification {
            return None;
        }
        let message = ctx.message.as_deref().filter(|m| !m.is_empty())?;
        let category = classify_message(message);
        let entry = self.catalog.hook_event(EventKind::Notification)?;

        match entry.for_category(category) {
            Some(spec) => {
                tracing::debug!(category = %category, "Notification category mapping");
                Some(spec)
            }
            None => {
                tracing::debug!(category = %category, "Using default notification sound");
                entry.default_spec()
            }
        }
    }

    fn context_spec(&self, event: EventKind, ctx: &EventContext) -> Option<&'a SoundSpec> {
        if !event.is_tool_event() {
            return None;
        }
        let tool = ctx.tool_kind?;
        if ctx.file_path.is_none() && ctx.command.is_none() {
            return None;
        }

        let spec = if tool.is_file_operation() {
            ctx.file_path
                .as_deref()
                .and_then(|path| self.file_operation_spec(tool, path))
        } else if tool == ToolKind::Bash {
            ctx.command.as_deref().and_then(|command| self.bash_spec(command))
        } else {
            None
        };

        if spec.is_none() {
            tracing::debug!(
                event = %event,
                tool = %tool,
                "No context pattern, falling back to tool mapping"
            );
        }
        spec
    }

    fn file_operation_spec(&self, tool: ToolKind, path: &str) -> Option<&'a SoundSpec> {
        if path.is_empty() {
            return None;
        }
        let base = tool.base_file_tool();
        let patterns = self.catalog.file_operation(base)?;

        if let Some(spec) = patterns.for_filename(file_name(path)) {
            return Some(spec);
        }
        if let Some(spec) = FileKind::from_path(path).and_then(|kind| patterns.for_file_kind(kind))
        {
            return Some(spec);
        }
        patterns.default_spec()
    }

    fn bash_spec(&self, command: &str) -> Option<&'a SoundSpec> {
        if command.trim().is_empty() {
            return None;
        }
        let bash = self.catalog.bash_commands();

        if let Some(git) = GitCommand::detect(command) {
            if let Some(spec) = bash.for_git_command(git) {
                tracing::debug!(git = git.name(), "Git subcommand mapping");
                return Some(spec);
            }
        }

        if let Some(family) = CommandFamily::detect(command) {
            if let Some(patterns) = bash.for_family(family) {
                let spec = patterns
                    .match_prefix(command)
                    .or_else(|| patterns.direct_spec());
                if spec.is_some() {
                    tracing::debug!(family = family.name(), "Command family mapping");
                    return spec;
                }
            }
        }

        bash.default_spec()
    }

    fn hook_event_spec(&self, event: EventKind, tool: Option<ToolKind>) -> Option<&'a SoundSpec> {
        let entry = self.catalog.hook_event(event)?;
        tool.and_then(|tool| entry.for_tool(tool))
            .or_else(|| entry.default_spec())
    }
}

/// One-shot resolution with the thread-local random picker.
pub fn resolve(catalog: &PatternCatalog, ctx: &EventContext) -> ResolvedSound {
    Resolver::new(catalog).resolve(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::{FirstPicker, FALLBACK_SOUND};
    use serde_json::{json, Value};

    fn catalog(value: Value) -> PatternCatalog {
        PatternCatalog::from_json_str(&value.to_string()).expect("parse catalog")
    }

    fn resolve_first(cat: &PatternCatalog, payload: Value) -> ResolvedSound {
        let ctx = EventContext::from_payload(&payload);
        Resolver::with_picker(cat, FirstPicker).resolve(&ctx)
    }

    fn layered_catalog() -> PatternCatalog {
        catalog(json!({
            "hook_events": {
                "Stop": "task_complete",
                "SubagentStop": ["agent_done"],
                "PreToolUse": { "Task": "delegate", "default": "tool_start" },
                "PostToolUse": { "default": "tool_done" },
                "Notification": {
                    "permission_request": "need_permission",
                    "idle_timeout": "still_there",
                    "default": "notify"
                }
            },
            "tools": { "Edit": "tool_edit", "Bash": "tool_bash", "Grep": "tool_grep" },
            "context_patterns": {
                "file_operations": {
                    "Edit": {
                        "by_filename": { "README.md": "readme_edit" },
                        "by_extension": { ".py": "python_edit", ".md": "markdown_edit" },
                        "default": "edit_default"
                    },
                    "Read": { "by_extension": { ".rs": "rust_read" } }
                },
                "bash_commands": {
                    "git": { "git commit": "git_commit", "git": "git_generic" },
                    "npm": { "npm install": "npm_install", "npm run test": "npm_test" },
                    "docker": ["docker_1"],
                    "default": "bash_default"
                }
            },
            "default": "global_default"
        }))
    }

    #[test]
    fn test_notification_category_mapping() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({ "hook_event_name": "Notification", "message": "Waiting for your input..." }),
        );
        assert_eq!(resolved.sound, "still_there");
        assert_eq!(resolved.stage, ResolutionStage::Notification);
    }

    #[test]
    fn test_notification_unmapped_category_uses_notification_default() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({ "hook_event_name": "Notification", "message": "Build failed" }),
        );
        assert_eq!(resolved.sound, "notify");
        assert_eq!(resolved.stage, ResolutionStage::Notification);
    }

    #[test]
    fn test_notification_without_message_uses_hook_event_default() {
        let cat = layered_catalog();
        let resolved = resolve_first(&cat, json!({ "hook_event_name": "Notification" }));
        assert_eq!(resolved.sound, "notify");
        assert_eq!(resolved.stage, ResolutionStage::HookEvent);
    }

    #[test]
    fn test_blank_notification_message_skips_category_lookup() {
        let cat = catalog(json!({
            "hook_events": {
                "Notification": { "general": "general_chime", "default": "notify" }
            },
            "default": "global_default"
        }));
        let resolved = resolve_first(
            &cat,
            json!({ "hook_event_name": "Notification", "message": "" }),
        );
        assert_eq!(resolved.sound, "notify");
        assert_eq!(resolved.stage, ResolutionStage::HookEvent);
    }

    #[test]
    fn test_extension_beats_tool_default() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Edit",
                "tool_input": { "file_path": "x.py" }
            }),
        );
        assert_eq!(resolved.sound, "python_edit");
        assert_eq!(resolved.stage, ResolutionStage::Context);
    }

    #[test]
    fn test_filename_beats_extension() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PostToolUse",
                "tool_name": "Edit",
                "tool_input": { "file_path": "/repo/README.md" }
            }),
        );
        assert_eq!(resolved.sound, "readme_edit");
    }

    #[test]
    fn test_variant_tools_use_base_patterns() {
        let cat = layered_catalog();
        let multi = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "MultiEdit",
                "tool_input": { "file_path": "notes.md" }
            }),
        );
        assert_eq!(multi.sound, "markdown_edit");

        let notebook = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "NotebookRead",
                "tool_input": { "file_path": "lib.rs" }
            }),
        );
        assert_eq!(notebook.sound, "rust_read");
    }

    #[test]
    fn test_file_tool_default_when_nothing_specific_matches() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Edit",
                "tool_input": { "file_path": "main.go" }
            }),
        );
        assert_eq!(resolved.sound, "edit_default");
        assert_eq!(resolved.stage, ResolutionStage::Context);
    }

    #[test]
    fn test_file_tool_without_patterns_falls_to_hook_event() {
        let cat = layered_catalog();
        // Read has no default pattern and no flat tool mapping.
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PostToolUse",
                "tool_name": "Read",
                "tool_input": { "file_path": "main.go" }
            }),
        );
        assert_eq!(resolved.sound, "tool_done");
        assert_eq!(resolved.stage, ResolutionStage::HookEvent);
    }

    #[test]
    fn test_git_subcommand_beats_family_patterns() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Bash",
                "tool_input": { "command": "git commit -m 'msg'" }
            }),
        );
        assert_eq!(resolved.sound, "git_commit");
    }

    #[test]
    fn test_unmapped_git_subcommand_uses_family_prefix() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Bash",
                "tool_input": { "command": "git cherry-pick abc123" }
            }),
        );
        assert_eq!(resolved.sound, "git_generic");
    }

    #[test]
    fn test_family_prefix_and_direct_spec() {
        let cat = layered_catalog();
        let npm = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Bash",
                "tool_input": { "command": "npm run test -- --watch" }
            }),
        );
        assert_eq!(npm.sound, "npm_test");

        let docker = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Bash",
                "tool_input": { "command": "docker compose up" }
            }),
        );
        assert_eq!(docker.sound, "docker_1");
    }

    #[test]
    fn test_unmatched_family_and_unknown_command_use_bash_default() {
        let cat = layered_catalog();
        for command in ["npm ci", "ls -la", "cargo build"] {
            let resolved = resolve_first(
                &cat,
                json!({
                    "hook_event_name": "PreToolUse",
                    "tool_name": "Bash",
                    "tool_input": { "command": command }
                }),
            );
            assert_eq!(resolved.sound, "bash_default", "{command}");
            assert_eq!(resolved.stage, ResolutionStage::Context);
        }
    }

    #[test]
    fn test_bash_without_command_uses_flat_tool_mapping() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({ "hook_event_name": "PreToolUse", "tool_name": "Bash", "tool_input": {} }),
        );
        assert_eq!(resolved.sound, "tool_bash");
        assert_eq!(resolved.stage, ResolutionStage::Tool);
    }

    #[test]
    fn test_non_context_tool_uses_flat_mapping() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Grep",
                "tool_input": { "pattern": "TODO", "file_path": "src" }
            }),
        );
        assert_eq!(resolved.sound, "tool_grep");
        assert_eq!(resolved.stage, ResolutionStage::Tool);
    }

    #[test]
    fn test_hook_event_tool_specific_entry() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({ "hook_event_name": "PreToolUse", "tool_name": "Task" }),
        );
        assert_eq!(resolved.sound, "delegate");
        assert_eq!(resolved.stage, ResolutionStage::HookEvent);
    }

    #[test]
    fn test_unknown_tool_falls_back_to_hook_event_default() {
        let cat = layered_catalog();
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "mcp__browser__click",
                "tool_input": { "file_path": "x.py" }
            }),
        );
        assert_eq!(resolved.sound, "tool_start");
        assert_eq!(resolved.stage, ResolutionStage::HookEvent);
    }

    #[test]
    fn test_unresolved_event_behaves_like_stop() {
        let cat = layered_catalog();
        let resolved = resolve_first(&cat, json!({ "hook_event_name": "SessionStart" }));
        assert_eq!(resolved.sound, "task_complete");
        assert_eq!(resolved.stage, ResolutionStage::HookEvent);
    }

    #[test]
    fn test_event_without_mapping_uses_global_default() {
        let cat = layered_catalog();
        let resolved = resolve_first(&cat, json!({ "hook_event_name": "UserPromptSubmit" }));
        assert_eq!(resolved.sound, "global_default");
        assert_eq!(resolved.stage, ResolutionStage::Default);
    }

    #[test]
    fn test_context_only_applies_to_tool_events() {
        let cat = layered_catalog();
        // Stop events never consult file patterns even when a path is present.
        let resolved = resolve_first(
            &cat,
            json!({
                "hook_event_name": "Stop",
                "tool_name": "Edit",
                "tool_input": { "file_path": "x.py" }
            }),
        );
        assert_eq!(resolved.sound, "tool_edit");
        assert_eq!(resolved.stage, ResolutionStage::Tool);
    }

    #[test]
    fn test_every_event_kind_resolves_without_context() {
        for cat in [layered_catalog(), PatternCatalog::builtin()] {
            for kind in EventKind::ALL {
                let resolved = resolve_first(&cat, json!({ "hook_event_name": kind.name() }));
                assert!(!resolved.sound.is_empty(), "{kind}");
            }
        }
    }

    #[test]
    fn test_builtin_catalog_resolutions() {
        let cat = PatternCatalog::builtin();
        let read = resolve_first(
            &cat,
            json!({
                "hook_event_name": "PreToolUse",
                "tool_name": "Read",
                "tool_input": { "file_path": "a.py" }
            }),
        );
        assert_eq!(read.sound, "file_read");

        let prompt = resolve_first(&cat, json!({ "hook_event_name": "UserPromptSubmit" }));
        assert_eq!(prompt.sound, FALLBACK_SOUND);
        assert_eq!(prompt.stage, ResolutionStage::Default);
    }

    #[test]
    fn test_empty_variant_list_degrades_to_fallback() {
        let cat = catalog(json!({
            "tools": { "Write": [] },
            "default": "global_default"
        }));
        let resolved = resolve_first(
            &cat,
            json!({ "hook_event_name": "PostToolUse", "tool_name": "Write" }),
        );
        assert_eq!(resolved.sound, FALLBACK_SOUND);
        assert_eq!(resolved.stage, ResolutionStage::Tool);
    }
}
