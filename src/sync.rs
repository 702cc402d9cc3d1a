//! Active-line tracking between playback ticks.
//!
//! The tracker remembers the last resolved line and only reports a change
//! when the resolved index differs, so a renderer scrolls once per line no
//! matter how often the clock ticks.

use log::debug;

use crate::lyrics::{TimedLine, Timeline};

/// A transition of the active line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLineChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
    /// Playback time that produced the transition.
    pub time: f64,
}

type Listener = Box<dyn FnMut(&ActiveLineChange)>;

#[derive(Default)]
pub struct LineTracker {
    timeline: Timeline,
    current: Option<usize>,
    listeners: Vec<Listener>,
}

impl LineTracker {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            current: None,
            listeners: Vec::new(),
        }
    }

    /// Register a callback fired once per active-line transition.
    pub fn on_active_line_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&ActiveLineChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Swap in the timeline of a new song. The last index is forgotten
    /// without notifying anyone.
    pub fn reset(&mut self, timeline: Timeline) {
        self.timeline = timeline;
        self.current = None;
    }

    /// Resolve `time` and notify listeners if the active line moved.
    /// Times must be fed in the order the clock reported them.
    pub fn update(&mut self, time: f64) -> Option<ActiveLineChange> {
        let resolved = self.timeline.active_index_from(self.current, time);
        if resolved == self.current {
            return None;
        }

        let change = ActiveLineChange {
            previous: self.current,
            current: resolved,
            time,
        };
        self.current = resolved;
        debug!(
            "Active lyric line {:?} -> {:?} at {:.2}s",
            change.previous, change.current, time
        );

        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
        Some(change)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_line(&self) -> Option<&TimedLine> {
        self.current.and_then(|i| self.timeline.get(i))
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

impl std::fmt::Debug for LineTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineTracker")
            .field("timeline", &self.timeline)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
