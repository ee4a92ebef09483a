//! The process-wide registry surface and its reset behavior
//!
//! Everything here shares the one global instance, so it all lives in a
//! single test function.

use chanlog::test_support::CaptureSink;
use chanlog::{registry, Error, Level, MapData};
use serde_json::json;
use std::cell::Cell;

#[test]
fn global_registry_lifecycle() {
    let instance = registry();
    instance.reset();
    instance.setup_filters("MAIN:debug", "info").unwrap();
    instance.set_service_name("svc");
    let sink = CaptureSink::install(instance);

    // Free functions route through the global instance.
    chanlog::log("MAIN", Level::Debug, "one").unwrap();
    assert_eq!(sink.line_count(), 1);
    assert!(sink.contains(" <svc> [MAIN :DBUG] one"));

    chanlog::log("MAIN", Level::Debug1, "filtered").unwrap();
    assert_eq!(sink.line_count(), 1);

    // Logging at off surfaces the error through the free functions too.
    assert!(matches!(
        chanlog::log("MAIN", Level::Off, "nope"),
        Err(Error::LogAtOff)
    ));
    assert_eq!(sink.line_count(), 1);

    // log_with builds the message only when the call is enabled.
    let built = Cell::new(false);
    chanlog::log_with("OTHER", Level::Debug, || {
        built.set(true);
        "expensive".to_string()
    })
    .unwrap();
    assert!(!built.get());
    assert_eq!(sink.line_count(), 1);
    chanlog::log_with("OTHER", Level::Info, || {
        built.set(true);
        "cheap enough".to_string()
    })
    .unwrap();
    assert!(built.get());
    assert_eq!(sink.line_count(), 2);

    // log_map emits map lines with an empty message position.
    let mut map = MapData::new();
    map.insert("k".to_string(), json!("v"));
    chanlog::log_map("MAIN", Level::Info, map).unwrap();
    assert_eq!(sink.line_count(), 3);
    assert!(sink.lines()[2].ends_with("] k: \"v\""));

    // Reset restores the unconfigured state: default off, no sinks,
    // service name cleared.
    instance.reset();
    assert!(!instance.should_log("MAIN", Level::Fatal).unwrap());
    assert_eq!(instance.service_name(), "");
    sink.clear();
    instance.setup_filters("", "debug4").unwrap();
    instance.log("MAIN", Level::Info, "unseen", MapData::new());
    assert_eq!(sink.line_count(), 0);
}
