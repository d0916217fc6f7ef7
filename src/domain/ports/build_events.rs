//! Build Event Port
//!
//! Provides an observable interface for the package pipeline.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;

/// Event emitted while validating, resolving and assembling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Host artifact found
    HostArtifactFound { path: PathBuf },

    /// A POM or artifact is being fetched
    Fetching { artifact: String },

    /// Resolution finished
    Resolved { modules: usize, excluded: usize },

    /// A layer is being merged into the plan
    LayerStarted { origin: String },

    /// Two sources shipped different content for one path
    ConflictingDuplicate {
        path: String,
        kept_from: String,
        dropped_from: String,
    },

    /// Archive written
    Completed { output: PathBuf, entries: usize },
}

/// Trait for receiving build events
///
/// Implementations can be:
/// - a console sink printing progress
/// - a tracing sink for `-v` runs
/// - `NoopEventSink` for silent operation
pub trait BuildEventSink {
    fn on_event(&self, event: BuildEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Test event sink that records all events
    struct RecordingEventSink {
        events: RefCell<Vec<BuildEvent>>,
    }

    impl BuildEventSink for RecordingEventSink {
        fn on_event(&self, event: BuildEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingEventSink {
            events: RefCell::new(Vec::new()),
        };

        sink.on_event(BuildEvent::LayerStarted {
            origin: "assets".to_string(),
        });
        sink.on_event(BuildEvent::Completed {
            output: PathBuf::from("build/libs/plugin.jar"),
            entries: 3,
        });

        let events = sink.events.borrow();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], BuildEvent::Completed { entries: 3, .. }));
    }

    #[test]
    fn noop_sink_accepts_events() {
        NoopEventSink.on_event(BuildEvent::Resolved {
            modules: 2,
            excluded: 1,
        });
    }
}
