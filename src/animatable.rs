//! Animatable capability: the ordered collection of animators on a node.
//!
//! The collection only tracks handles. Registering them with a renderer's
//! scheduler is the attachment protocol's job, so the set of registered
//! handles always mirrors the node's attachment state.

use crate::animation::{AnimatorHandle, AnimatorId};
use crate::element::ElementConfig;

/// Ordered animator handles owned by one element.
#[derive(Default)]
pub struct Animatable {
    animators: Vec<AnimatorHandle>,
}

impl Animatable {
    /// Initialize from an element configuration (always empty; animators
    /// are added after construction).
    pub fn new(_config: &ElementConfig) -> Self {
        Self::default()
    }

    /// The handles, in the order they were added.
    pub fn handles(&self) -> &[AnimatorHandle] {
        &self.animators
    }

    /// Add a handle. Duplicate IDs are ignored.
    pub fn push(&mut self, handle: AnimatorHandle) {
        let id = handle.borrow().id();
        if !self.contains(id) {
            self.animators.push(handle);
        }
    }

    /// Remove and return the handle with this ID, if present.
    pub fn remove(&mut self, id: AnimatorId) -> Option<AnimatorHandle> {
        let pos = self.animators.iter().position(|a| a.borrow().id() == id)?;
        Some(self.animators.remove(pos))
    }

    /// Remove and return every handle.
    pub fn drain(&mut self) -> Vec<AnimatorHandle> {
        std::mem::take(&mut self.animators)
    }

    pub fn contains(&self, id: AnimatorId) -> bool {
        self.animators.iter().any(|a| a.borrow().id() == id)
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }
}

impl std::fmt::Debug for Animatable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animatable")
            .field("animators", &self.animators.len())
            .finish()
    }
}
