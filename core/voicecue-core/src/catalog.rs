//! Sound mapping catalog.
//!
//! The catalog is read from `sound_mapping.json` once per invocation and is
//! never mutated afterwards. Parsing happens in two layers: a permissive
//! serde layer keyed by strings, then a typed layer keyed by the closed
//! vocabularies in [`crate::types`]. Anything the typed layer cannot place
//! is recorded as a [`CatalogIssue`] instead of failing the load.
//!
//! ```json
//! {
//!   "hook_events": {
//!     "Stop": ["task_complete", "all_done"],
//!     "Notification": { "permission_request": "need_permission", "default": "notify" }
//!   },
//!   "tools": { "Read": "file_read" },
//!   "context_patterns": {
//!     "file_operations": {
//!       "Edit": { "by_filename": {}, "by_extension": { ".py": "python_edit" }, "default": "code_edit" }
//!     },
//!     "bash_commands": {
//!       "git": { "git status": "git_status" },
//!       "npm": ["npm_1", "npm_2"],
//!       "default": "bash_run"
//!     }
//!   },
//!   "default": "task_complete"
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use fs_err as fs;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CueError, Result};
use crate::select::FALLBACK_SOUND;
use crate::types::{
    CommandFamily, EventKind, FileKind, GitCommand, NamedSet, NotificationCategory, ToolKind,
};

/// Upper bound on how long a catalog read may take before falling back.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(500);

const DEFAULT_KEY: &str = "default";

// ═══════════════════════════════════════════════════════════════════════════════
// Sound Specs
// ═══════════════════════════════════════════════════════════════════════════════

/// One identifier or a set of interchangeable variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundSpec {
    Single(String),
    Variants(Vec<String>),
    /// Any other JSON shape. Kept so one bad entry does not sink the file.
    Malformed(Value),
}

impl SoundSpec {
    pub fn single(name: &str) -> Self {
        SoundSpec::Single(name.to_string())
    }

    fn is_empty(&self) -> bool {
        match self {
            SoundSpec::Single(name) => name.trim().is_empty(),
            SoundSpec::Variants(names) => names.iter().all(|n| n.trim().is_empty()),
            SoundSpec::Malformed(_) => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Typed Catalog
// ═══════════════════════════════════════════════════════════════════════════════

/// Sounds for one hook event, keyed by tool name or notification category.
///
/// The legacy shape (`"Stop": "task_complete"`) loads as an entry with only
/// `default` set, so lookups never branch on representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookEventSounds {
    keyed: BTreeMap<String, SoundSpec>,
    default: Option<SoundSpec>,
}

impl HookEventSounds {
    pub fn direct(spec: SoundSpec) -> Self {
        Self {
            keyed: BTreeMap::new(),
            default: Some(spec),
        }
    }

    pub fn for_tool(&self, tool: ToolKind) -> Option<&SoundSpec> {
        self.keyed.get(tool.name())
    }

    pub fn for_category(&self, category: NotificationCategory) -> Option<&SoundSpec> {
        self.keyed.get(category.name())
    }

    pub fn default_spec(&self) -> Option<&SoundSpec> {
        self.default.as_ref()
    }
}

/// Patterns for one base file-operation tool (Read, Edit, Write).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePatterns {
    by_filename: BTreeMap<String, SoundSpec>,
    by_extension: HashMap<FileKind, SoundSpec>,
    default: Option<SoundSpec>,
}

impl FilePatterns {
    pub fn for_filename(&self, filename: &str) -> Option<&SoundSpec> {
        self.by_filename.get(filename)
    }

    pub fn for_file_kind(&self, kind: FileKind) -> Option<&SoundSpec> {
        self.by_extension.get(&kind)
    }

    pub fn default_spec(&self) -> Option<&SoundSpec> {
        self.default.as_ref()
    }
}

/// Sounds for one command family: prefix patterns or a direct spec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CommandPatterns {
    Prefixes(BTreeMap<String, SoundSpec>),
    Direct(SoundSpec),
}

impl CommandPatterns {
    /// Longest configured prefix of the trimmed command. Overlapping
    /// prefixes therefore resolve the same way whatever their order in the
    /// mapping file, unlike a first-listed-wins scan.
    pub fn match_prefix(&self, command: &str) -> Option<&SoundSpec> {
        let CommandPatterns::Prefixes(prefixes) = self else {
            return None;
        };
        let command = command.trim();
        prefixes
            .iter()
            .filter(|(prefix, _)| !prefix.is_empty() && command.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, spec)| spec)
    }

    /// Exact entry for a git subcommand prefix such as `git status`.
    fn exact(&self, key: &str) -> Option<&SoundSpec> {
        match self {
            CommandPatterns::Prefixes(prefixes) => prefixes.get(key),
            CommandPatterns::Direct(_) => None,
        }
    }

    pub fn direct_spec(&self) -> Option<&SoundSpec> {
        match self {
            CommandPatterns::Direct(spec) => Some(spec),
            CommandPatterns::Prefixes(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BashPatterns {
    families: HashMap<CommandFamily, CommandPatterns>,
    default: Option<SoundSpec>,
}

impl BashPatterns {
    pub fn for_git_command(&self, git: GitCommand) -> Option<&SoundSpec> {
        self.families
            .get(&CommandFamily::Git)
            .and_then(|patterns| patterns.exact(git.name()))
    }

    pub fn for_family(&self, family: CommandFamily) -> Option<&CommandPatterns> {
        self.families.get(&family)
    }

    pub fn default_spec(&self) -> Option<&SoundSpec> {
        self.default.as_ref()
    }
}

/// Problems found while loading a sound mapping. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    UnknownHookEvent(String),
    UnknownHookEventKey { event: EventKind, key: String },
    UnknownTool { section: &'static str, name: String },
    NotBaseFileTool(ToolKind),
    UnknownExtension { tool: ToolKind, key: String },
    UnknownCommandFamily(String),
    EmptySpec(String),
    MalformedSpec(String),
    MalformedSection(String),
    MissingDefault,
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::UnknownHookEvent(name) => {
                write!(f, "hook_events.{}: unknown hook event", name)
            }
            CatalogIssue::UnknownHookEventKey { event, key } => {
                write!(
                    f,
                    "hook_events.{}.{}: not a tool name or notification category",
                    event, key
                )
            }
            CatalogIssue::UnknownTool { section, name } => {
                write!(f, "{}.{}: unknown tool", section, name)
            }
            CatalogIssue::NotBaseFileTool(tool) => {
                write!(
                    f,
                    "context_patterns.file_operations.{}: only Read, Edit and Write patterns are consulted",
                    tool
                )
            }
            CatalogIssue::UnknownExtension { tool, key } => {
                write!(
                    f,
                    "context_patterns.file_operations.{}.by_extension.{}: unrecognized file type",
                    tool, key
                )
            }
            CatalogIssue::UnknownCommandFamily(name) => {
                write!(f, "context_patterns.bash_commands.{}: unknown command family", name)
            }
            CatalogIssue::EmptySpec(location) => write!(f, "{}: empty sound spec", location),
            CatalogIssue::MalformedSpec(location) => {
                write!(f, "{}: sound spec must be a string or list of strings", location)
            }
            CatalogIssue::MalformedSection(location) => {
                write!(f, "{}: expected an object, section ignored", location)
            }
            CatalogIssue::MissingDefault => {
                write!(f, "default: missing, using '{}'", FALLBACK_SOUND)
            }
        }
    }
}

/// Immutable, layered sound configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCatalog {
    hook_events: HashMap<EventKind, HookEventSounds>,
    tools: HashMap<ToolKind, SoundSpec>,
    file_operations: HashMap<ToolKind, FilePatterns>,
    bash_commands: BashPatterns,
    default: SoundSpec,
    issues: Vec<CatalogIssue>,
}

static BUILTIN: Lazy<PatternCatalog> = Lazy::new(|| {
    let task_complete = SoundSpec::single(FALLBACK_SOUND);
    PatternCatalog {
        hook_events: HashMap::from([
            (EventKind::Stop, HookEventSounds::direct(task_complete.clone())),
            (EventKind::PostToolUse, HookEventSounds::direct(task_complete.clone())),
        ]),
        tools: HashMap::from([
            (ToolKind::Read, SoundSpec::single("file_read")),
            (ToolKind::Edit, SoundSpec::single("code_edit")),
            (ToolKind::Grep, SoundSpec::single("search")),
        ]),
        file_operations: HashMap::new(),
        bash_commands: BashPatterns::default(),
        default: task_complete,
        issues: Vec::new(),
    }
});

impl PatternCatalog {
    /// Minimal catalog used when no mapping file can be loaded.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Fails only when the text is not a JSON object. Misshapen sections
    /// inside it become [`CatalogIssue`]s.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parse_error = |source: serde_json::Error| CueError::Json {
            context: "parsing sound mapping".to_string(),
            source,
        };
        let value: Value = serde_json::from_str(json).map_err(parse_error)?;
        if !value.is_object() {
            return Err(parse_error(<serde_json::Error as serde::de::Error>::custom(
                "sound mapping must be a JSON object",
            )));
        }
        let raw: RawCatalog = serde_json::from_value(value).map_err(parse_error)?;
        Ok(Self::from_raw(raw))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CueError::MappingNotFound(path.to_path_buf())
            } else {
                CueError::Io {
                    context: format!("reading {}", path.display()),
                    source,
                }
            }
        })?;
        let catalog = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            issues = catalog.issues.len(),
            "Loaded sound mapping"
        );
        Ok(catalog)
    }

    /// Loads on a helper thread and gives up after `timeout`. A read stuck
    /// on a slow mount is abandoned rather than joined.
    pub fn load_with_timeout(path: &Path, timeout: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let owned: PathBuf = path.to_path_buf();
        thread::spawn(move || {
            let _ = tx.send(Self::load(&owned));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(CueError::LoadTimedOut {
                path: path.to_path_buf(),
                timeout,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(CueError::LoaderDisconnected(path.to_path_buf()))
            }
        }
    }

    /// Never fails: any load error yields [`PatternCatalog::builtin`].
    pub fn load_or_builtin(path: &Path, timeout: Duration) -> Self {
        match Self::load_with_timeout(path, timeout) {
            Ok(catalog) => {
                for issue in &catalog.issues {
                    tracing::warn!(issue = %issue, "Sound mapping issue");
                }
                catalog
            }
            Err(err) => {
                tracing::error!(error = %err, "Could not load sound mapping, using built-in");
                Self::builtin()
            }
        }
    }

    pub fn hook_event(&self, kind: EventKind) -> Option<&HookEventSounds> {
        self.hook_events.get(&kind)
    }

    pub fn tool(&self, kind: ToolKind) -> Option<&SoundSpec> {
        self.tools.get(&kind)
    }

    /// Patterns for a base file tool; callers normalize variants first.
    pub fn file_operation(&self, base: ToolKind) -> Option<&FilePatterns> {
        self.file_operations.get(&base)
    }

    pub fn bash_commands(&self) -> &BashPatterns {
        &self.bash_commands
    }

    pub fn default_sound(&self) -> &SoundSpec {
        &self.default
    }

    /// Problems found while loading. Empty for the built-in catalog.
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    fn from_raw(raw: RawCatalog) -> Self {
        let mut issues = Vec::new();

        let raw_hook_events: BTreeMap<String, RawHookEvent> =
            section("hook_events", raw.hook_events, &mut issues).unwrap_or_default();
        let mut hook_events = HashMap::new();
        for (name, entry) in raw_hook_events {
            let Some(kind) = EventKind::from_name(&name) else {
                issues.push(CatalogIssue::UnknownHookEvent(name));
                continue;
            };
            let location = format!("hook_events.{}", kind);
            let sounds = match entry {
                RawHookEvent::Direct(spec) => {
                    check_spec(&location, &spec, &mut issues);
                    HookEventSounds::direct(spec)
                }
                RawHookEvent::Structured(mut entries) => {
                    let default = entries.remove(DEFAULT_KEY);
                    if let Some(spec) = &default {
                        check_spec(&format!("{}.default", location), spec, &mut issues);
                    }
                    let mut keyed = BTreeMap::new();
                    for (key, spec) in entries {
                        let canonical = ToolKind::from_name(&key)
                            .map(|tool| tool.name())
                            .or_else(|| NotificationCategory::from_name(&key).map(|c| c.name()));
                        let Some(canonical) = canonical else {
                            issues.push(CatalogIssue::UnknownHookEventKey { event: kind, key });
                            continue;
                        };
                        check_spec(&format!("{}.{}", location, key), &spec, &mut issues);
                        // The exact spelling wins over case-folded duplicates.
                        if key == canonical {
                            keyed.insert(key, spec);
                        } else {
                            keyed.entry(canonical.to_string()).or_insert(spec);
                        }
                    }
                    HookEventSounds { keyed, default }
                }
            };
            hook_events.insert(kind, sounds);
        }

        let raw_tools: BTreeMap<String, SoundSpec> =
            section("tools", raw.tools, &mut issues).unwrap_or_default();
        let mut tools = HashMap::new();
        for (name, spec) in raw_tools {
            match ToolKind::from_name(&name) {
                Some(kind) => {
                    check_spec(&format!("tools.{}", kind), &spec, &mut issues);
                    tools.insert(kind, spec);
                }
                None => issues.push(CatalogIssue::UnknownTool {
                    section: "tools",
                    name,
                }),
            }
        }

        let context: RawContextPatterns =
            section("context_patterns", raw.context_patterns, &mut issues).unwrap_or_default();

        let raw_file_operations: BTreeMap<String, Value> = section(
            "context_patterns.file_operations",
            context.file_operations,
            &mut issues,
        )
        .unwrap_or_default();
        let mut file_operations = HashMap::new();
        for (name, value) in raw_file_operations {
            let Some(kind) = ToolKind::from_name(&name) else {
                issues.push(CatalogIssue::UnknownTool {
                    section: "context_patterns.file_operations",
                    name,
                });
                continue;
            };
            if !kind.is_file_operation() || kind.base_file_tool() != kind {
                issues.push(CatalogIssue::NotBaseFileTool(kind));
                continue;
            }
            let location = format!("context_patterns.file_operations.{}", kind);
            if let Some(patterns) = section(&location, value, &mut issues) {
                file_operations.insert(kind, file_patterns_from_raw(kind, patterns, &mut issues));
            }
        }

        let raw_bash: RawBashCommands = section(
            "context_patterns.bash_commands",
            context.bash_commands,
            &mut issues,
        )
        .unwrap_or_default();
        let bash_commands = bash_patterns_from_raw(raw_bash, &mut issues);

        let default = match raw.default {
            Some(spec) => {
                check_spec(DEFAULT_KEY, &spec, &mut issues);
                spec
            }
            None => {
                issues.push(CatalogIssue::MissingDefault);
                SoundSpec::single(FALLBACK_SOUND)
            }
        };

        Self {
            hook_events,
            tools,
            file_operations,
            bash_commands,
            default,
            issues,
        }
    }
}

fn file_patterns_from_raw(
    tool: ToolKind,
    raw: RawFilePatterns,
    issues: &mut Vec<CatalogIssue>,
) -> FilePatterns {
    let location = format!("context_patterns.file_operations.{}", tool);

    let by_filename: BTreeMap<String, SoundSpec> =
        section(&format!("{}.by_filename", location), raw.by_filename, issues)
            .unwrap_or_default();
    for (name, spec) in &by_filename {
        check_spec(&format!("{}.by_filename.{}", location, name), spec, issues);
    }

    let raw_by_extension: BTreeMap<String, SoundSpec> =
        section(&format!("{}.by_extension", location), raw.by_extension, issues)
            .unwrap_or_default();
    let mut by_extension = HashMap::new();
    for (key, spec) in raw_by_extension {
        match FileKind::from_name(&key) {
            Some(kind) => {
                check_spec(&format!("{}.by_extension.{}", location, key), &spec, issues);
                by_extension.insert(kind, spec);
            }
            None => issues.push(CatalogIssue::UnknownExtension { tool, key }),
        }
    }

    if let Some(spec) = &raw.default {
        check_spec(&format!("{}.default", location), spec, issues);
    }

    FilePatterns {
        by_filename,
        by_extension,
        default: raw.default,
    }
}

fn bash_patterns_from_raw(raw: RawBashCommands, issues: &mut Vec<CatalogIssue>) -> BashPatterns {
    let location = "context_patterns.bash_commands";
    let mut families = HashMap::new();

    for (name, patterns) in raw.families {
        let Some(family) = CommandFamily::from_name(&name) else {
            issues.push(CatalogIssue::UnknownCommandFamily(name));
            continue;
        };
        match &patterns {
            CommandPatterns::Prefixes(prefixes) => {
                for (prefix, spec) in prefixes {
                    check_spec(&format!("{}.{}.{}", location, name, prefix), spec, issues);
                }
            }
            CommandPatterns::Direct(spec) => {
                check_spec(&format!("{}.{}", location, name), spec, issues);
            }
        }
        families.insert(family, patterns);
    }

    if let Some(spec) = &raw.default {
        check_spec(&format!("{}.default", location), spec, issues);
    }

    BashPatterns {
        families,
        default: raw.default,
    }
}

/// Reads one object-shaped section. Absent and `null` sections yield
/// `None` quietly; any other shape is recorded and skipped.
fn section<T: DeserializeOwned>(
    location: &str,
    value: Value,
    issues: &mut Vec<CatalogIssue>,
) -> Option<T> {
    if value.is_null() {
        return None;
    }
    if value.is_object() {
        match serde_json::from_value(value) {
            Ok(parsed) => return Some(parsed),
            Err(err) => tracing::debug!(location = %location, error = %err, "Unreadable section"),
        }
    }
    issues.push(CatalogIssue::MalformedSection(location.to_string()));
    None
}

fn check_spec(location: &str, spec: &SoundSpec, issues: &mut Vec<CatalogIssue>) {
    if matches!(spec, SoundSpec::Malformed(_)) {
        issues.push(CatalogIssue::MalformedSpec(location.to_string()));
    } else if spec.is_empty() {
        issues.push(CatalogIssue::EmptySpec(location.to_string()));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// On-disk Shape
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    hook_events: Value,
    #[serde(default)]
    tools: Value,
    #[serde(default)]
    context_patterns: Value,
    #[serde(default)]
    default: Option<SoundSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHookEvent {
    Structured(BTreeMap<String, SoundSpec>),
    Direct(SoundSpec),
}

#[derive(Debug, Default, Deserialize)]
struct RawContextPatterns {
    #[serde(default)]
    file_operations: Value,
    #[serde(default)]
    bash_commands: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawFilePatterns {
    #[serde(default)]
    by_filename: Value,
    #[serde(default)]
    by_extension: Value,
    #[serde(default)]
    default: Option<SoundSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBashCommands {
    #[serde(default)]
    default: Option<SoundSpec>,
    #[serde(flatten)]
    families: BTreeMap<String, CommandPatterns>,
}
