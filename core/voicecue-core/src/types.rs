//! Closed vocabularies shared by the normalizer, catalog, and resolver.
//!
//! Every set here is fixed at compile time. Group membership and name
//! lookups are exhaustive matches so adding a variant forces every mapping
//! to be revisited.

use serde::{Deserialize, Serialize};

/// A closed set of names with a canonical spelling for each member.
pub trait NamedSet: Sized + Copy + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Canonical spelling as it appears in hook payloads and sound mappings.
    fn name(&self) -> &'static str;

    /// Exact match first, then ASCII case-insensitive match.
    fn from_name(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        if let Some(found) = Self::ALL.iter().find(|m| m.name() == value) {
            return Some(*found);
        }
        let found = Self::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(value))
            .copied();
        if let Some(member) = found {
            tracing::debug!(
                value = %value,
                matched = member.name(),
                "Case-insensitive name match"
            );
        }
        found
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Hook Events
// ═══════════════════════════════════════════════════════════════════════════════

/// Lifecycle phase that triggered the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    Stop,
    PreToolUse,
    PostToolUse,
    Notification,
    SubagentStop,
    UserPromptSubmit,
}

impl EventKind {
    /// PreToolUse and PostToolUse carry tool name and tool input.
    pub fn is_tool_event(&self) -> bool {
        matches!(self, EventKind::PreToolUse | EventKind::PostToolUse)
    }
}

impl NamedSet for EventKind {
    const ALL: &'static [Self] = &[
        EventKind::Stop,
        EventKind::PreToolUse,
        EventKind::PostToolUse,
        EventKind::Notification,
        EventKind::SubagentStop,
        EventKind::UserPromptSubmit,
    ];

    fn name(&self) -> &'static str {
        match self {
            EventKind::Stop => "Stop",
            EventKind::PreToolUse => "PreToolUse",
            EventKind::PostToolUse => "PostToolUse",
            EventKind::Notification => "Notification",
            EventKind::SubagentStop => "SubagentStop",
            EventKind::UserPromptSubmit => "UserPromptSubmit",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tools
// ═══════════════════════════════════════════════════════════════════════════════

/// Capability group a tool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolGroup {
    FileOperation,
    Search,
    System,
    Workflow,
    Web,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolKind {
    Read,
    Edit,
    MultiEdit,
    Write,
    NotebookRead,
    NotebookEdit,
    Bash,
    #[serde(rename = "LS")]
    Ls,
    Grep,
    Glob,
    Task,
    WebFetch,
    WebSearch,
    TodoWrite,
    ExitPlanMode,
}

impl ToolKind {
    pub fn group(&self) -> ToolGroup {
        match self {
            ToolKind::Read
            | ToolKind::Edit
            | ToolKind::MultiEdit
            | ToolKind::Write
            | ToolKind::NotebookRead
            | ToolKind::NotebookEdit => ToolGroup::FileOperation,
            ToolKind::Grep | ToolKind::Glob => ToolGroup::Search,
            ToolKind::Bash | ToolKind::Ls => ToolGroup::System,
            ToolKind::Task | ToolKind::TodoWrite | ToolKind::ExitPlanMode => ToolGroup::Workflow,
            ToolKind::WebFetch | ToolKind::WebSearch => ToolGroup::Web,
        }
    }

    pub fn is_file_operation(&self) -> bool {
        self.group() == ToolGroup::FileOperation
    }

    /// Collapses notebook and multi-edit variants onto the tool whose file
    /// patterns they share. Only meaningful for file-operation tools.
    pub fn base_file_tool(&self) -> ToolKind {
        match self {
            ToolKind::MultiEdit | ToolKind::NotebookEdit => ToolKind::Edit,
            ToolKind::NotebookRead => ToolKind::Read,
            other => *other,
        }
    }
}

impl NamedSet for ToolKind {
    const ALL: &'static [Self] = &[
        ToolKind::Read,
        ToolKind::Edit,
        ToolKind::MultiEdit,
        ToolKind::Write,
        ToolKind::NotebookRead,
        ToolKind::NotebookEdit,
        ToolKind::Bash,
        ToolKind::Ls,
        ToolKind::Grep,
        ToolKind::Glob,
        ToolKind::Task,
        ToolKind::WebFetch,
        ToolKind::WebSearch,
        ToolKind::TodoWrite,
        ToolKind::ExitPlanMode,
    ];

    fn name(&self) -> &'static str {
        match self {
            ToolKind::Read => "Read",
            ToolKind::Edit => "Edit",
            ToolKind::MultiEdit => "MultiEdit",
            ToolKind::Write => "Write",
            ToolKind::NotebookRead => "NotebookRead",
            ToolKind::NotebookEdit => "NotebookEdit",
            ToolKind::Bash => "Bash",
            ToolKind::Ls => "LS",
            ToolKind::Grep => "Grep",
            ToolKind::Glob => "Glob",
            ToolKind::Task => "Task",
            ToolKind::WebFetch => "WebFetch",
            ToolKind::WebSearch => "WebSearch",
            ToolKind::TodoWrite => "TodoWrite",
            ToolKind::ExitPlanMode => "ExitPlanMode",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// File Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Recognized file types for `by_extension` lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Python,
    JavaScript,
    TypeScript,
    TypeScriptJsx,
    Java,
    Cpp,
    C,
    Rust,
    Go,
    Html,
    Css,
    Scss,
    Json,
    Yaml,
    Yml,
    Toml,
    Xml,
    Markdown,
    Text,
    Readme,
    GitIgnore,
    Dockerfile,
    Makefile,
}

impl FileKind {
    /// Filenames recognized whole, before any suffix matching.
    const SPECIAL_FILENAMES: &'static [FileKind] = &[
        FileKind::Readme,
        FileKind::GitIgnore,
        FileKind::Dockerfile,
        FileKind::Makefile,
    ];

    /// Classifies a path by its filename, then by its lower-cased suffix.
    pub fn from_path(path: &str) -> Option<FileKind> {
        let filename = file_name(path);
        if filename.is_empty() {
            return None;
        }

        if let Some(kind) = Self::SPECIAL_FILENAMES
            .iter()
            .find(|k| k.name() == filename)
        {
            return Some(*kind);
        }

        let suffix = suffix(filename)?.to_ascii_lowercase();
        Self::ALL
            .iter()
            .filter(|k| !Self::SPECIAL_FILENAMES.contains(k))
            .find(|k| k.name() == suffix)
            .copied()
    }
}

impl NamedSet for FileKind {
    const ALL: &'static [Self] = &[
        FileKind::Python,
        FileKind::JavaScript,
        FileKind::TypeScript,
        FileKind::TypeScriptJsx,
        FileKind::Java,
        FileKind::Cpp,
        FileKind::C,
        FileKind::Rust,
        FileKind::Go,
        FileKind::Html,
        FileKind::Css,
        FileKind::Scss,
        FileKind::Json,
        FileKind::Yaml,
        FileKind::Yml,
        FileKind::Toml,
        FileKind::Xml,
        FileKind::Markdown,
        FileKind::Text,
        FileKind::Readme,
        FileKind::GitIgnore,
        FileKind::Dockerfile,
        FileKind::Makefile,
    ];

    /// Key used under `by_extension` in the sound mapping.
    fn name(&self) -> &'static str {
        match self {
            FileKind::Python => ".py",
            FileKind::JavaScript => ".js",
            FileKind::TypeScript => ".ts",
            FileKind::TypeScriptJsx => ".tsx",
            FileKind::Java => ".java",
            FileKind::Cpp => ".cpp",
            FileKind::C => ".c",
            FileKind::Rust => ".rs",
            FileKind::Go => ".go",
            FileKind::Html => ".html",
            FileKind::Css => ".css",
            FileKind::Scss => ".scss",
            FileKind::Json => ".json",
            FileKind::Yaml => ".yaml",
            FileKind::Yml => ".yml",
            FileKind::Toml => ".toml",
            FileKind::Xml => ".xml",
            FileKind::Markdown => ".md",
            FileKind::Text => ".txt",
            FileKind::Readme => "README.md",
            FileKind::GitIgnore => ".gitignore",
            FileKind::Dockerfile => "Dockerfile",
            FileKind::Makefile => "Makefile",
        }
    }
}

/// Last path component. Handles both separators since hook payloads may
/// come from any platform.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Suffix including the dot. A leading dot alone (`.env`) is not a suffix.
fn suffix(filename: &str) -> Option<&str> {
    let idx = filename.rfind('.')?;
    if idx == 0 || idx == filename.len() - 1 {
        return None;
    }
    Some(&filename[idx..])
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shell Commands
// ═══════════════════════════════════════════════════════════════════════════════

/// Git subcommands recognized by prefix, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitCommand {
    Status,
    Add,
    Commit,
    Push,
    Pull,
    Fetch,
    Diff,
    Log,
    Branch,
    Checkout,
    Merge,
    Rebase,
    Reset,
    Stash,
}

impl GitCommand {
    /// First subcommand whose prefix starts the trimmed command.
    pub fn detect(command: &str) -> Option<GitCommand> {
        let command = command.trim();
        if !command.starts_with("git ") {
            return None;
        }
        Self::ALL
            .iter()
            .find(|g| command.starts_with(g.name()))
            .copied()
    }
}

impl NamedSet for GitCommand {
    const ALL: &'static [Self] = &[
        GitCommand::Status,
        GitCommand::Add,
        GitCommand::Commit,
        GitCommand::Push,
        GitCommand::Pull,
        GitCommand::Fetch,
        GitCommand::Diff,
        GitCommand::Log,
        GitCommand::Branch,
        GitCommand::Checkout,
        GitCommand::Merge,
        GitCommand::Rebase,
        GitCommand::Reset,
        GitCommand::Stash,
    ];

    fn name(&self) -> &'static str {
        match self {
            GitCommand::Status => "git status",
            GitCommand::Add => "git add",
            GitCommand::Commit => "git commit",
            GitCommand::Push => "git push",
            GitCommand::Pull => "git pull",
            GitCommand::Fetch => "git fetch",
            GitCommand::Diff => "git diff",
            GitCommand::Log => "git log",
            GitCommand::Branch => "git branch",
            GitCommand::Checkout => "git checkout",
            GitCommand::Merge => "git merge",
            GitCommand::Rebase => "git rebase",
            GitCommand::Reset => "git reset",
            GitCommand::Stash => "git stash",
        }
    }
}

/// Leading program of a shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandFamily {
    Git,
    Npm,
    Uv,
    Python,
    Node,
    Docker,
    Make,
    Curl,
    Wget,
    Ssh,
    Scp,
}

impl CommandFamily {
    /// Matches when the trimmed command is the token itself or the token
    /// followed by a space, so `npx` is not `npm` and `uvx` is not `uv`.
    pub fn detect(command: &str) -> Option<CommandFamily> {
        let command = command.trim();
        Self::ALL
            .iter()
            .find(|f| {
                let token = f.name();
                command == token
                    || command
                        .strip_prefix(token)
                        .is_some_and(|rest| rest.starts_with(' '))
            })
            .copied()
    }
}

impl NamedSet for CommandFamily {
    const ALL: &'static [Self] = &[
        CommandFamily::Git,
        CommandFamily::Npm,
        CommandFamily::Uv,
        CommandFamily::Python,
        CommandFamily::Node,
        CommandFamily::Docker,
        CommandFamily::Make,
        CommandFamily::Curl,
        CommandFamily::Wget,
        CommandFamily::Ssh,
        CommandFamily::Scp,
    ];

    fn name(&self) -> &'static str {
        match self {
            CommandFamily::Git => "git",
            CommandFamily::Npm => "npm",
            CommandFamily::Uv => "uv",
            CommandFamily::Python => "python",
            CommandFamily::Node => "node",
            CommandFamily::Docker => "docker",
            CommandFamily::Make => "make",
            CommandFamily::Curl => "curl",
            CommandFamily::Wget => "wget",
            CommandFamily::Ssh => "ssh",
            CommandFamily::Scp => "scp",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Notifications
// ═══════════════════════════════════════════════════════════════════════════════

/// Semantic category of a Notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationCategory {
    PermissionRequest,
    IdleTimeout,
    Error,
    Warning,
    Info,
    #[default]
    General,
}

impl NamedSet for NotificationCategory {
    const ALL: &'static [Self] = &[
        NotificationCategory::PermissionRequest,
        NotificationCategory::IdleTimeout,
        NotificationCategory::Error,
        NotificationCategory::Warning,
        NotificationCategory::Info,
        NotificationCategory::General,
    ];

    /// Key used under `hook_events.Notification` in the sound mapping.
    fn name(&self) -> &'static str {
        match self {
            NotificationCategory::PermissionRequest => "permission_request",
            NotificationCategory::IdleTimeout => "idle_timeout",
            NotificationCategory::Error => "error",
            NotificationCategory::Warning => "warning",
            NotificationCategory::Info => "info",
            NotificationCategory::General => "general",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
