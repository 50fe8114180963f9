//! The renderer's animation scheduler.
//!
//! Holds the handles of every animator registered by attached elements and
//! advances them once per frame. Registration and removal are idempotent:
//! the attachment protocol may re-run its cascade (re-attaching a node, or
//! re-setting the same clip path) without duplicating entries.

use super::animator::{AnimatorHandle, AnimatorId};

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// At least one animator produced a new value this tick.
    pub changed: bool,
    /// At least one animator is still running after this tick.
    pub running: bool,
}

/// Ordered registry of running animators.
#[derive(Default)]
pub struct AnimationScheduler {
    animators: Vec<AnimatorHandle>,
}

impl AnimationScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animator. Duplicate registration is a no-op.
    pub fn add_animator(&mut self, handle: &AnimatorHandle) {
        let id = handle.borrow().id();
        if !self.contains(id) {
            self.animators.push(handle.clone());
        }
    }

    /// Remove an animator by ID. Removing an unknown ID is a no-op.
    pub fn remove_animator(&mut self, id: AnimatorId) {
        self.animators.retain(|a| a.borrow().id() != id);
    }

    /// Whether an animator with this ID is registered.
    pub fn contains(&self, id: AnimatorId) -> bool {
        self.animators.iter().any(|a| a.borrow().id() == id)
    }

    /// Number of registered animators.
    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Advance every animator by `dt_ms` and drop the finished ones.
    pub fn update(&mut self, dt_ms: f32) -> TickOutcome {
        let mut changed = false;
        for handle in &self.animators {
            if handle.borrow_mut().advance(dt_ms) {
                changed = true;
            }
        }
        self.animators.retain(|a| !a.borrow().is_done());
        TickOutcome {
            changed,
            running: !self.animators.is_empty(),
        }
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("animators", &self.animators.len())
            .finish()
    }
}
