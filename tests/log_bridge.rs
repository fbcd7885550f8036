//! Engine event forwarding through the lifecycle controller.

use proxy_runtime::LogEvent;

mod common;
use common::{controller, path_str, wait_for, CapturingLogger, FakeEngine};

#[test]
fn test_logger_receives_engine_events() {
    let root = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new();
    let runtime = controller(&engine);
    let logger = CapturingLogger::default();

    runtime.setup_logger(logger.clone());
    runtime.try_setup(path_str(root.path()), "mode: rule").unwrap();
    engine.hub.publish("warning", "dial tcp: i/o timeout");

    assert!(wait_for(|| logger.contains("dial tcp: i/o timeout")));
    let events = logger.events();
    assert_eq!(events[0], LogEvent::new("info", "applied 10 bytes"));
    assert!(events.contains(&LogEvent::new("warning", "dial tcp: i/o timeout")));

    runtime.shutdown_bridge();
}

#[test]
fn test_single_subscription() {
    let root = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new();
    let runtime = controller(&engine);

    runtime.try_setup(path_str(root.path()), "mode: rule").unwrap();
    runtime.setup_logger(CapturingLogger::default());
    runtime.try_setup(path_str(root.path()), "mode: global").unwrap();
    runtime.setup_logger(CapturingLogger::default());

    assert_eq!(engine.hub.subscriber_count(), 1);
    assert!(runtime.bridge_running());

    runtime.shutdown_bridge();
}

#[test]
fn test_bridge_outlives_stop() {
    let root = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new();
    let runtime = controller(&engine);
    let logger = CapturingLogger::default();
    runtime.setup_logger(logger.clone());
    runtime.try_setup(path_str(root.path()), "mode: rule").unwrap();

    runtime.stop();
    engine.hub.publish("info", "after stop");

    assert!(wait_for(|| logger.contains("after stop")));
    assert!(logger.contains("all services stopped"));
    assert!(runtime.bridge_running());

    runtime.shutdown_bridge();
}

#[test]
fn test_logger_swap() {
    let engine = FakeEngine::new();
    let runtime = controller(&engine);
    let first = CapturingLogger::default();
    let second = CapturingLogger::default();

    runtime.setup_logger(first.clone());
    engine.hub.publish("info", "one");
    assert!(wait_for(|| first.contains("one")));

    runtime.setup_logger(second.clone());
    engine.hub.publish("info", "two");
    assert!(wait_for(|| second.contains("two")));

    runtime.clear_logger();
    engine.hub.publish("info", "three");
    runtime.shutdown_bridge();

    assert!(!first.contains("two"));
    assert!(!first.contains("three"));
    assert!(!second.contains("three"));
}

#[test]
fn test_shutdown_bridge() {
    let engine = FakeEngine::new();
    let runtime = controller(&engine);
    runtime.setup_logger(CapturingLogger::default());
    assert!(runtime.bridge_running());

    runtime.shutdown_bridge();

    assert!(!runtime.bridge_running());
    assert_eq!(engine.hub.subscriber_count(), 0);

    // A later registration does not resubscribe.
    runtime.setup_logger(CapturingLogger::default());
    assert_eq!(engine.hub.subscriber_count(), 0);
}
