use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use voicecue_core::{
    EventContext, EventKind, FirstPicker, NamedSet, PatternCatalog, RandomPicker,
    ResolutionStage, ResolvedSound, Resolver,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_catalog() -> PatternCatalog {
    PatternCatalog::load_with_timeout(&fixture_path("sound_mapping.json"), Duration::from_secs(5))
        .expect("load fixture catalog")
}

fn resolve_first(catalog: &PatternCatalog, payload: Value) -> ResolvedSound {
    let ctx = EventContext::from_payload(&payload);
    Resolver::with_picker(catalog, FirstPicker).resolve(&ctx)
}

#[test]
fn test_fixture_loads_without_issues() {
    let catalog = fixture_catalog();
    assert!(catalog.issues().is_empty(), "{:?}", catalog.issues());
}

#[test]
fn test_git_status_end_to_end() {
    let catalog = fixture_catalog();
    let input = r#"{"hook_event_name":"PreToolUse","tool_name":"Bash","tool_input":{"command":"git status --porcelain"}}"#;
    let ctx = EventContext::from_json_str(input);
    let resolved = Resolver::new(&catalog).resolve(&ctx);

    assert_eq!(resolved.as_str(), "git_status_sound");
    assert_eq!(resolved.stage, ResolutionStage::Context);
}

#[test]
fn test_idle_notification_end_to_end() {
    let catalog = fixture_catalog();
    let resolved = resolve_first(
        &catalog,
        json!({ "hook_event_name": "Notification", "message": "Waiting for your input..." }),
    );
    assert_eq!(resolved.sound, "awaiting_instructions");
    assert_eq!(resolved.stage, ResolutionStage::Notification);
}

#[test]
fn test_permission_notification_outranks_error_keyword() {
    let catalog = fixture_catalog();
    let resolved = resolve_first(
        &catalog,
        json!({ "hook_event_name": "Notification", "message": "Error: permission denied to use tool" }),
    );
    assert_eq!(resolved.sound, "need_permission");
}

#[test]
fn test_specific_matches_win_over_general_ones() {
    let catalog = fixture_catalog();
    let cases = [
        // filename over extension
        (json!({"hook_event_name":"PreToolUse","tool_name":"Edit","tool_input":{"file_path":"/w/README.md"}}), "updating_readme"),
        // extension over tool default
        (json!({"hook_event_name":"PreToolUse","tool_name":"Edit","tool_input":{"file_path":"/w/src/lib.rs"}}), "rust_edit"),
        // special filename through extension table
        (json!({"hook_event_name":"PreToolUse","tool_name":"Edit","tool_input":{"file_path":"/w/Dockerfile"}}), "container_edit"),
        // git subcommand over git family fallback
        (json!({"hook_event_name":"PostToolUse","tool_name":"Bash","tool_input":{"command":"git commit -m 'msg'"}}), "git_commit"),
        // longer npm prefix over shorter
        (json!({"hook_event_name":"PostToolUse","tool_name":"Bash","tool_input":{"command":"npm run test"}}), "running_tests"),
        // context over flat tool mapping
        (json!({"hook_event_name":"PreToolUse","tool_name":"Read","tool_input":{"file_path":"package.json"}}), "reading_dependencies"),
        // flat tool mapping over hook event tool entry
        (json!({"hook_event_name":"PreToolUse","tool_name":"WebFetch","tool_input":{"url":"https://example.com"}}), "fetching"),
        // hook event tool entry over hook event default
        (json!({"hook_event_name":"PreToolUse","tool_name":"WebSearch","tool_input":{"query":"rust"}}), "searching_the_web"),
    ];

    for (payload, expected) in cases {
        let resolved = resolve_first(&catalog, payload.clone());
        assert_eq!(resolved.sound, expected, "payload: {payload}");
    }
}

#[test]
fn test_unknown_tool_uses_hook_event_default_not_global() {
    let catalog = fixture_catalog();
    let resolved = resolve_first(
        &catalog,
        json!({"hook_event_name":"PreToolUse","tool_name":"mcp__linear__create_issue"}),
    );
    assert_eq!(resolved.sound, "working");
    assert_eq!(resolved.stage, ResolutionStage::HookEvent);
}

#[test]
fn test_every_event_kind_resolves() {
    let catalog = fixture_catalog();
    for kind in EventKind::ALL {
        let resolved = Resolver::new(&catalog)
            .resolve(&EventContext::from_payload(&json!({ "hook_event_name": kind.name() })));
        assert!(!resolved.sound.is_empty(), "{kind}");
    }
}

#[test]
fn test_stop_variants_are_all_reachable() {
    let catalog = fixture_catalog();
    let ctx = EventContext::from_payload(&json!({ "hook_event_name": "Stop" }));
    let expected: HashSet<String> = ["task_complete", "all_done", "at_your_service"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut resolver = Resolver::with_picker(&catalog, RandomPicker);
    let mut seen = HashSet::new();
    for _ in 0..600 {
        let resolved = resolver.resolve(&ctx);
        assert!(expected.contains(&resolved.sound), "unexpected {}", resolved.sound);
        seen.insert(resolved.sound);
    }
    assert_eq!(seen, expected);
}

#[test]
fn test_garbage_input_resolves_like_stop() {
    let catalog = fixture_catalog();
    let ctx = EventContext::from_json_str("definitely not json");
    let resolved = Resolver::with_picker(&catalog, FirstPicker).resolve(&ctx);
    assert_eq!(resolved.sound, "task_complete");
    assert_eq!(resolved.stage, ResolutionStage::HookEvent);
}

#[test]
fn test_catalog_is_shareable_across_threads() {
    let catalog = std::sync::Arc::new(fixture_catalog());
    let handles: Vec<_> = ["git status", "make", "docker ps"]
        .into_iter()
        .map(|command| {
            let catalog = std::sync::Arc::clone(&catalog);
            std::thread::spawn(move || {
                let ctx = EventContext::from_payload(&json!({
                    "hook_event_name": "PreToolUse",
                    "tool_name": "Bash",
                    "tool_input": { "command": command }
                }));
                Resolver::new(&catalog).resolve(&ctx).sound
            })
        })
        .collect();

    let sounds: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().expect("resolver thread"))
        .collect();
    assert_eq!(sounds[0], "git_status_sound");
    assert_eq!(sounds[1], "building");
    assert!(sounds[2].starts_with("container_work"));
}
