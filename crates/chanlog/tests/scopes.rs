//! Scope guards: Start/End blocks, timers, indentation, metadata

use chanlog::test_support::CaptureSink;
use chanlog::{
    Level, LogRegistry, LogScope, MapData, ScopedIndent, ScopedMetadata, ScopedTimer,
    SharedMapData,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

fn text_registry() -> (LogRegistry, CaptureSink) {
    let registry = LogRegistry::new();
    registry.setup_filters("", "debug4").unwrap();
    let sink = CaptureSink::install(&registry);
    (registry, sink)
}

fn json_registry() -> (LogRegistry, CaptureSink) {
    let (registry, sink) = text_registry();
    registry.use_json_formatter();
    (registry, sink)
}

#[test]
fn block_brackets_interior_lines() {
    let (registry, sink) = text_registry();
    {
        let _scope = LogScope::new(&registry, "TEST", Level::Info, "doing work");
        registry.log("TEST", Level::Info, "interior", MapData::new());
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("Start: doing work"));
    assert!(lines[1].ends_with("interior"));
    assert!(lines[2].ends_with("End: doing work"));
}

#[test]
fn block_emits_nothing_when_disabled() {
    let (registry, sink) = text_registry();
    registry.setup_filters("", "off").unwrap();
    {
        let _scope = LogScope::new(&registry, "TEST", Level::Info, "quiet");
    }
    assert_eq!(sink.line_count(), 0);
}

#[test]
fn block_end_line_reflects_map_mutation() {
    let (registry, sink) = json_registry();
    let map: SharedMapData = Arc::new(Mutex::new(MapData::new()));
    map.lock().insert("phase".to_string(), json!("setup"));
    {
        let _scope = LogScope::with_map(
            &registry,
            "TEST",
            Level::Info,
            "work",
            Arc::clone(&map),
        );
        map.lock().insert("phase".to_string(), json!("done"));
    }

    let start: Value = serde_json::from_str(&sink.lines()[0]).unwrap();
    let end: Value = serde_json::from_str(&sink.lines()[1]).unwrap();
    assert_eq!(start["message"], json!("Start: work"));
    assert_eq!(start["phase"], json!("setup"));
    assert_eq!(end["message"], json!("End: work"));
    assert_eq!(end["phase"], json!("done"));
}

#[test]
fn timer_reports_duration_ms() {
    let (registry, sink) = json_registry();
    {
        let timer = ScopedTimer::new(&registry, "TEST", Level::Info, "compute ");
        let first = timer.elapsed();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = timer.elapsed();
        assert!(second >= first);
    }

    assert_eq!(sink.line_count(), 1);
    let parsed: Value = serde_json::from_str(&sink.lines()[0]).unwrap();
    let duration_ms = parsed["duration_ms"].as_u64().unwrap();
    assert!(duration_ms >= 2);
    let message = parsed["message"].as_str().unwrap();
    assert!(message.starts_with("compute "));
    let suffix = message.strip_prefix("compute ").unwrap();
    assert!(
        ["ns", "us", "ms", "s"].iter().any(|unit| suffix.ends_with(unit)),
        "message was {message:?}"
    );
}

#[test]
fn timer_with_map_keeps_caller_keys() {
    let (registry, sink) = json_registry();
    let map: SharedMapData = Arc::new(Mutex::new(MapData::new()));
    map.lock().insert("rows".to_string(), json!(10));
    {
        let _timer =
            ScopedTimer::with_map(&registry, "TEST", Level::Info, "scan ", Arc::clone(&map));
    }

    let parsed: Value = serde_json::from_str(&sink.lines()[0]).unwrap();
    assert_eq!(parsed["rows"], json!(10));
    assert!(parsed["duration_ms"].is_u64());
}

#[test]
fn timer_disabled_at_entry_emits_nothing() {
    let (registry, sink) = text_registry();
    registry.setup_filters("", "off").unwrap();
    {
        let timer = ScopedTimer::new(&registry, "TEST", Level::Info, "idle ");
        assert_eq!(timer.elapsed(), std::time::Duration::ZERO);
    }
    assert_eq!(sink.line_count(), 0);
}

#[test]
fn nested_indent_scopes_stack_and_unwind() {
    let (registry, sink) = text_registry();

    registry.log("TEST", Level::Info, "d0", MapData::new());
    {
        let _outer = ScopedIndent::new(&registry);
        registry.log("TEST", Level::Info, "d1", MapData::new());
        {
            let _inner = ScopedIndent::new(&registry);
            registry.log("TEST", Level::Info, "d2", MapData::new());
        }
        registry.log("TEST", Level::Info, "d1b", MapData::new());
    }
    registry.log("TEST", Level::Info, "d0b", MapData::new());

    let lines = sink.lines();
    let suffixes: Vec<&str> = lines
        .iter()
        .map(|line| line.split("] ").nth(1).unwrap())
        .collect();
    assert_eq!(
        suffixes,
        vec!["d0", "  d1", "    d2", "  d1b", "d0b"]
    );
    assert_eq!(registry.indent_depth(), 0);
}

#[test]
fn conditional_indent_skips_disabled_channels() {
    let (registry, sink) = text_registry();
    registry.setup_filters("LOUD:debug", "off").unwrap();
    {
        let _indent = ScopedIndent::new_if(&registry, "QUIET", Level::Debug);
        assert_eq!(registry.indent_depth(), 0);
        let _indent2 = ScopedIndent::new_if(&registry, "LOUD", Level::Debug);
        assert_eq!(registry.indent_depth(), 1);
        registry.log("LOUD", Level::Debug, "in", MapData::new());
    }
    assert_eq!(registry.indent_depth(), 0);
    assert!(sink.lines()[0].ends_with("]   in"));
}

#[test]
fn conditional_indent_decision_is_fixed_at_entry() {
    let (registry, _sink) = text_registry();
    {
        let _indent = ScopedIndent::new_if(&registry, "TEST", Level::Debug);
        assert_eq!(registry.indent_depth(), 1);
        // Disabling the channel mid-scope must not skew the unwind.
        registry.setup_filters("", "off").unwrap();
    }
    assert_eq!(registry.indent_depth(), 0);
}

#[test]
fn metadata_scopes_nest_and_remove_their_own_keys() {
    let (registry, _sink) = text_registry();
    registry.enable_metadata();

    assert!(registry.metadata().is_empty());
    {
        let _outer = ScopedMetadata::new(&registry, "outer", json!(1));
        assert_eq!(registry.metadata().len(), 1);
        {
            let mut map = MapData::new();
            map.insert("inner_a".to_string(), json!("a"));
            map.insert("inner_b".to_string(), json!("b"));
            let _inner = ScopedMetadata::with_map(&registry, map);
            let metadata = registry.metadata();
            assert_eq!(metadata.len(), 3);
            assert_eq!(metadata["inner_a"], json!("a"));
        }
        let metadata = registry.metadata();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["outer"], json!(1));
    }
    assert!(registry.metadata().is_empty());
}

#[test]
fn metadata_mutation_is_a_noop_while_disabled() {
    let (registry, _sink) = text_registry();
    {
        let _md = ScopedMetadata::new(&registry, "ignored", json!(true));
        assert!(registry.metadata().is_empty());
    }
    registry.add_metadata("also_ignored", json!(2));
    assert!(registry.metadata().is_empty());
}

#[test]
fn clear_metadata_drops_all_thread_keys() {
    let (registry, _sink) = text_registry();
    registry.enable_metadata();
    registry.add_metadata("a", json!(1));
    registry.add_metadata("b", json!(2));
    assert_eq!(registry.metadata().len(), 2);
    registry.clear_metadata();
    assert!(registry.metadata().is_empty());
}
