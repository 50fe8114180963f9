//! The renderer instance elements attach to.
//!
//! A [`Renderer`] is a cheaply cloneable handle to shared host state: the
//! animation scheduler, the coalesced refresh flags, and the list of root
//! elements it draws. Elements keep one of these handles as their host
//! back-reference while attached; repaint requests and animator
//! registration flow through it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bitflags::bitflags;

use crate::animation::{AnimationScheduler, AnimatorHandle, AnimatorId, TickOutcome};
use crate::element::ElementRef;

bitflags! {
    /// Coalesced per-frame refresh state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RefreshFlags: u8 {
        /// A repaint has been requested since the last frame.
        const PAINT = 0b01;
        /// Animators are still running and will keep producing frames.
        const ANIMATION = 0b10;
    }
}

struct RendererCore {
    flags: Cell<RefreshFlags>,
    /// Monotonic count of repaint requests, for observing coalescing.
    repaint_requests: Cell<u64>,
    scheduler: RefCell<AnimationScheduler>,
    roots: RefCell<Vec<ElementRef>>,
}

/// Shared handle to one renderer instance.
///
/// Clones refer to the same instance; [`Renderer::same`] (and `==`)
/// compare instance identity, not state.
#[derive(Clone)]
pub struct Renderer {
    core: Rc<RendererCore>,
}

impl Renderer {
    /// Create a new renderer instance with an empty scene and scheduler.
    pub fn new() -> Self {
        Self {
            core: Rc::new(RendererCore {
                flags: Cell::new(RefreshFlags::empty()),
                repaint_requests: Cell::new(0),
                scheduler: RefCell::new(AnimationScheduler::new()),
                roots: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Whether `self` and `other` are handles to the same instance.
    pub fn same(&self, other: &Renderer) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    // -- Repaint requests --

    /// Request a repaint. Safe to call redundantly; requests coalesce into
    /// a single `PAINT` flag until [`take_repaint`](Self::take_repaint).
    pub fn request_repaint(&self) {
        self.core
            .repaint_requests
            .set(self.core.repaint_requests.get() + 1);
        self.core.flags.set(self.core.flags.get() | RefreshFlags::PAINT);
    }

    /// Consume the pending repaint flag. Returns whether one was pending.
    pub fn take_repaint(&self) -> bool {
        let flags = self.core.flags.get();
        let pending = flags.contains(RefreshFlags::PAINT);
        self.core.flags.set(flags - RefreshFlags::PAINT);
        pending
    }

    /// Current refresh flags.
    pub fn refresh_flags(&self) -> RefreshFlags {
        self.core.flags.get()
    }

    /// Total number of repaint requests ever made on this instance.
    pub fn repaint_requests(&self) -> u64 {
        self.core.repaint_requests.get()
    }

    // -- Animation scheduler --

    /// Register an animator with the scheduler. Idempotent.
    pub fn add_animator(&self, handle: &AnimatorHandle) {
        self.core.scheduler.borrow_mut().add_animator(handle);
    }

    /// Unregister an animator from the scheduler. Idempotent.
    pub fn remove_animator(&self, id: AnimatorId) {
        self.core.scheduler.borrow_mut().remove_animator(id);
    }

    /// Whether an animator is currently registered.
    pub fn has_animator(&self, id: AnimatorId) -> bool {
        self.core.scheduler.borrow().contains(id)
    }

    /// Number of registered animators.
    pub fn animator_count(&self) -> usize {
        self.core.scheduler.borrow().len()
    }

    /// Advance all registered animators by `dt_ms` milliseconds.
    ///
    /// Requests a repaint when any value changed and keeps the
    /// `ANIMATION` flag truthful about whether more frames are coming.
    pub fn update_animations(&self, dt_ms: f32) -> TickOutcome {
        let outcome = self.core.scheduler.borrow_mut().update(dt_ms);
        if outcome.changed {
            self.request_repaint();
        }
        let flags = self.core.flags.get();
        if outcome.running {
            self.core.flags.set(flags | RefreshFlags::ANIMATION);
        } else {
            self.core.flags.set(flags - RefreshFlags::ANIMATION);
        }
        outcome
    }

    // -- Scene membership --

    /// Add a root element to the scene and attach it to this instance.
    ///
    /// Adding a root that is already present is a no-op.
    pub fn add_root(&self, root: &ElementRef) {
        let present = self.core.roots.borrow().iter().any(|r| Rc::ptr_eq(r, root));
        if present {
            return;
        }
        root.borrow_mut().attach(self);
        self.core.roots.borrow_mut().push(root.clone());
        self.request_repaint();
    }

    /// Remove a root element from the scene and detach it.
    ///
    /// Removing an element that is not a root is a no-op.
    pub fn remove_root(&self, root: &ElementRef) {
        let pos = {
            let roots = self.core.roots.borrow();
            roots.iter().position(|r| Rc::ptr_eq(r, root))
        };
        if let Some(pos) = pos {
            self.core.roots.borrow_mut().remove(pos);
            root.borrow_mut().detach(self);
            self.request_repaint();
        }
    }

    /// Number of root elements in the scene.
    pub fn root_count(&self) -> usize {
        self.core.roots.borrow().len()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Renderer {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("flags", &self.core.flags.get())
            .field("animators", &self.core.scheduler.borrow().len())
            .field("roots", &self.core.roots.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;

    #[test]
    fn test_repaint_coalesces_but_counts() {
        let renderer = Renderer::new();
        renderer.request_repaint();
        renderer.request_repaint();
        assert_eq!(renderer.repaint_requests(), 2);
        assert!(renderer.take_repaint());
        assert!(!renderer.take_repaint());
    }

    #[test]
    fn test_clones_share_state() {
        let renderer = Renderer::new();
        let alias = renderer.clone();
        alias.request_repaint();
        assert!(renderer.take_repaint());
        assert!(renderer.same(&alias));
        assert_eq!(renderer, alias);
    }

    #[test]
    fn test_distinct_instances_differ() {
        assert_ne!(Renderer::new(), Renderer::new());
    }

    #[test]
    fn test_update_animations_sets_flags() {
        let renderer = Renderer::new();
        let handle = Animator::new("x", 0.0, 100.0, 200.0).into_handle();
        renderer.add_animator(&handle);

        let before = renderer.repaint_requests();
        let outcome = renderer.update_animations(100.0);
        assert!(outcome.changed);
        assert!(renderer.refresh_flags().contains(RefreshFlags::ANIMATION));
        assert_eq!(renderer.repaint_requests(), before + 1);

        renderer.update_animations(200.0);
        assert!(!renderer.refresh_flags().contains(RefreshFlags::ANIMATION));
        assert_eq!(renderer.animator_count(), 0);
    }
}
