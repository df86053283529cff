//! Integration tests for the deprecation notice emitted on each call.

use decree::{CommandDescriptor, CommandPath, DispatchConfig, Engine, ParameterDescriptor, Value, Version};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Counts WARN events seen by the subscriber.
#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn engine(deprecation_warnings: bool) -> Engine {
    let engine = Engine::with_dispatch(DispatchConfig {
        deprecation_warnings,
        ..DispatchConfig::default()
    });
    engine
        .declare(
            CommandDescriptor::new("tile_id_at")
                .in_namespace("map")
                .deprecated_since(Version::new(2, 0, 0))
                .superseded_by("map::tile_id")
                .param(ParameterDescriptor::required("x", "Coordinate"))
                .body(|_, args| Ok(args[0].clone())),
        )
        .unwrap();
    engine
}

/// Runs `calls` valid invocations under a counting subscriber.
fn warnings_for(engine: &Engine, calls: usize) -> usize {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let path = CommandPath::new("map", "tile_id_at");

    tracing::subscriber::with_default(subscriber, || {
        for _ in 0..calls {
            assert_eq!(engine.invoke(&path, &[Value::Int(3)]).unwrap(), Value::Int(3));
        }
    });
    counter.count()
}

#[test]
fn test_deprecation_notice_once_per_call() {
    assert_eq!(warnings_for(&engine(true), 1), 1);
    assert_eq!(warnings_for(&engine(true), 3), 3);
}

#[test]
fn test_deprecation_notice_can_be_disabled() {
    assert_eq!(warnings_for(&engine(false), 3), 0);
}

#[test]
fn test_rejected_call_emits_no_notice() {
    let engine = engine(true);
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());

    tracing::subscriber::with_default(subscriber, || {
        assert!(engine.invoke(&CommandPath::new("map", "tile_id_at"), &[Value::Int(-1)]).is_err());
    });
    assert_eq!(counter.count(), 0);
}
