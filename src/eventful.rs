//! Eventful capability: named listener storage for scene nodes.
//!
//! Dispatch mechanics (bubbling, hit-testing) live in the event pipeline;
//! this module only stores listeners and invokes them on `trigger`.

use std::collections::HashMap;

use crate::element::ElementConfig;

/// An event delivered to listeners registered on a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    /// Event name, e.g. `"click"`.
    pub name: String,
    /// Scene-space x coordinate, for pointer-style events.
    pub x: f32,
    /// Scene-space y coordinate, for pointer-style events.
    pub y: f32,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// Handle for removing a previously registered listener.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Event)>;

/// Per-node listener registry.
pub struct Eventful {
    silent: bool,
    next_listener: u64,
    listeners: HashMap<String, Vec<(ListenerId, Listener)>>,
}

impl Eventful {
    /// Initialize from an element configuration.
    pub fn new(config: &ElementConfig) -> Self {
        Self {
            silent: config.silent,
            next_listener: 1,
            listeners: HashMap::new(),
        }
    }

    /// Whether this node ignores event triggering entirely.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Register a listener for the named event.
    pub fn on<F>(&mut self, name: impl Into<String>, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners
            .entry(name.into())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove one listener. Unknown IDs are ignored.
    pub fn off(&mut self, name: &str, id: ListenerId) {
        if let Some(entries) = self.listeners.get_mut(name) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                self.listeners.remove(name);
            }
        }
    }

    /// Remove every listener for the named event.
    pub fn off_all(&mut self, name: &str) {
        self.listeners.remove(name);
    }

    /// Invoke all listeners registered for `event.name`, in registration
    /// order. Silent nodes drop the event.
    pub fn trigger(&mut self, event: &Event) {
        if self.silent {
            return;
        }
        if let Some(entries) = self.listeners.get_mut(&event.name) {
            for (_, listener) in entries.iter_mut() {
                listener(event);
            }
        }
    }

    /// Number of listeners registered for the named event.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for Eventful {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eventful")
            .field("silent", &self.silent)
            .field("events", &self.listeners.len())
            .finish()
    }
}
