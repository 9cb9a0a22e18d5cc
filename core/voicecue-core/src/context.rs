//! Normalizes raw hook payloads into an [`EventContext`].
//!
//! Claude Code sends one JSON document per hook invocation:
//!
//! ```json
//! {
//!   "hook_event_name": "PreToolUse",
//!   "tool_name": "Bash",
//!   "tool_input": { "command": "git status --porcelain" }
//! }
//! ```
//!
//! Normalization never fails. Unknown event names leave the event kind
//! unresolved, unknown tool names leave the tool absent, and fields of the
//! wrong JSON type are treated as missing.

use serde_json::{Map, Value};

use crate::types::{EventKind, NamedSet, ToolKind};

const KEY_HOOK_EVENT_NAME: &str = "hook_event_name";
const KEY_TOOL_NAME: &str = "tool_name";
const KEY_TOOL_INPUT: &str = "tool_input";
const KEY_MESSAGE: &str = "message";
const KEY_STOP_HOOK_ACTIVE: &str = "stop_hook_active";
const KEY_FILE_PATH: &str = "file_path";
const KEY_COMMAND: &str = "command";
const KEY_PATTERN: &str = "pattern";

/// Canonical view of one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventContext {
    /// `None` when the payload named no event or an unknown one.
    pub event_kind: Option<EventKind>,
    pub raw_event_name: Option<String>,
    pub tool_kind: Option<ToolKind>,
    pub raw_tool_name: Option<String>,
    pub file_path: Option<String>,
    pub command: Option<String>,
    pub pattern: Option<String>,
    pub message: Option<String>,
    pub stop_hook_active: Option<bool>,
}

impl EventContext {
    /// Context for input that could not be parsed at all.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> Self {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => Self::from_payload(&value),
            Err(err) => {
                tracing::warn!(error = %err, "Hook payload is not valid JSON");
                Self::unresolved()
            }
        }
    }

    pub fn from_payload(payload: &Value) -> Self {
        let Some(fields) = payload.as_object() else {
            tracing::warn!("Hook payload is not a JSON object");
            return Self::unresolved();
        };

        let raw_event_name = string_field(fields, KEY_HOOK_EVENT_NAME);
        let event_kind = raw_event_name.as_deref().and_then(EventKind::from_name);
        if event_kind.is_none() {
            tracing::warn!(
                event = ?raw_event_name,
                "Unknown hook event, treating as Stop"
            );
        }

        let raw_tool_name = string_field(fields, KEY_TOOL_NAME);
        let tool_kind = raw_tool_name.as_deref().and_then(ToolKind::from_name);
        if let (Some(name), None) = (&raw_tool_name, tool_kind) {
            tracing::debug!(tool = %name, "Unrecognized tool name");
        }

        let tool_input = fields.get(KEY_TOOL_INPUT).and_then(Value::as_object);
        let input_field = |key: &str| tool_input.and_then(|input| string_field(input, key));

        Self {
            event_kind,
            raw_event_name,
            tool_kind,
            raw_tool_name,
            file_path: input_field(KEY_FILE_PATH),
            command: input_field(KEY_COMMAND),
            pattern: input_field(KEY_PATTERN),
            message: string_field(fields, KEY_MESSAGE),
            stop_hook_active: fields.get(KEY_STOP_HOOK_ACTIVE).and_then(Value::as_bool),
        }
    }

    /// Event kind used for resolution; unresolved input behaves like Stop.
    pub fn effective_event_kind(&self) -> EventKind {
        self.event_kind.unwrap_or(EventKind::Stop)
    }

    /// Short description of what the tool is operating on, for log lines.
    pub fn target_summary(&self) -> Option<String> {
        if let Some(path) = &self.file_path {
            Some(format!("-> {}", path))
        } else if let Some(command) = &self.command {
            Some(format!("-> {}", command))
        } else {
            self.pattern
                .as_ref()
                .map(|pattern| format!("-> searching '{}'", pattern))
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}
