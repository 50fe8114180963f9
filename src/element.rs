//! The base scene-graph node.
//!
//! Every drawable or grouping object in the scene derives its identity,
//! transform, event, animation and render-registration behavior from
//! [`Element`]. The element itself is a composite of three capability
//! bundles ([`Transformable`], [`Eventful`], [`Animatable`]) plus the
//! state this module owns: identity, visibility, the clip-path edge, and
//! the host back-reference maintained by the attachment protocol.
//!
//! ## Attachment protocol
//!
//! An element is either detached (no host) or attached to exactly one
//! [`Renderer`]. Attaching registers the element's animators with the
//! host's scheduler and cascades along the clip-path edge only; whatever
//! owns scene-tree membership (a group or the renderer's root list) calls
//! [`Element::attach`] once per node. Detaching reverses the exact same
//! sequence.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animatable::Animatable;
use crate::animation::{Animator, AnimatorHandle};
use crate::eventful::{Event, Eventful, ListenerId};
use crate::renderer::Renderer;
use crate::transformable::Transformable;

/// Unique identifier for an element.
///
/// Assigned at construction and stable for the node's lifetime; IDs are
/// never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ElementId(u64);

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

impl ElementId {
    /// Generate a new unique element ID.
    pub fn next() -> Self {
        ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric form, for external lookup tables.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Shared handle to an element.
///
/// Elements referenced by other nodes (clip paths, scene roots) live
/// behind this handle.
pub type ElementRef = Rc<RefCell<Element>>;

/// A value written through the attribute interface.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f32),
    Bool(bool),
    Text(String),
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Number(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

/// Sources of attribute writes accepted by [`Element::attr`]: a single
/// key/value pair or an ordered batch of pairs.
pub trait IntoAttrs {
    fn into_attrs(self) -> Vec<(&'static str, AttrValue)>;
}

impl<V: Into<AttrValue>> IntoAttrs for (&'static str, V) {
    fn into_attrs(self) -> Vec<(&'static str, AttrValue)> {
        vec![(self.0, self.1.into())]
    }
}

impl<const N: usize> IntoAttrs for [(&'static str, AttrValue); N] {
    fn into_attrs(self) -> Vec<(&'static str, AttrValue)> {
        self.into_iter().collect()
    }
}

impl IntoAttrs for Vec<(&'static str, AttrValue)> {
    fn into_attrs(self) -> Vec<(&'static str, AttrValue)> {
        self
    }
}

/// Configuration consumed by [`Element::new`] and by each capability
/// initializer.
#[derive(Clone, Debug)]
pub struct ElementConfig {
    /// Explicit identity; a fresh one is generated when absent.
    pub id: Option<ElementId>,
    /// Discriminator tag of the concrete node variant.
    pub kind: &'static str,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// Start excluded from drawing and event targeting.
    pub ignore: bool,
    /// Start with event triggering disabled.
    pub silent: bool,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            id: None,
            kind: "element",
            name: None,
            ignore: false,
            silent: false,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

/// Base scene-graph node.
pub struct Element {
    transform: Transformable,
    events: Eventful,
    animation: Animatable,
    id: ElementId,
    kind: &'static str,
    name: Option<String>,
    ignore: bool,
    clip_path: Option<ElementRef>,
    /// Set only while this node is acting as another node's clip path.
    clip_target: Option<ElementId>,
    /// Host back-reference; `None` iff detached.
    renderer: Option<Renderer>,
}

impl Element {
    /// Create an element from a configuration.
    ///
    /// Capability initializers run first, in a fixed order, against the
    /// same configuration; identity is assigned afterwards.
    pub fn new(config: ElementConfig) -> Self {
        let transform = Transformable::new(&config);
        let events = Eventful::new(&config);
        let animation = Animatable::new(&config);
        Self {
            transform,
            events,
            animation,
            id: config.id.unwrap_or_else(ElementId::next),
            kind: config.kind,
            name: config.name,
            ignore: config.ignore,
            clip_path: None,
            clip_target: None,
            renderer: None,
        }
    }

    /// Wrap into the shared handle form used for clip paths and roots.
    pub fn into_ref(self) -> ElementRef {
        Rc::new(RefCell::new(self))
    }

    // -- Identity & state access --

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Discriminator tag of the concrete node variant.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the node is excluded from drawing and event targeting.
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// The hosting renderer, while attached.
    pub fn renderer(&self) -> Option<Renderer> {
        self.renderer.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn clip_path(&self) -> Option<ElementRef> {
        self.clip_path.clone()
    }

    /// The node this element is clipping, while acting as a clip path.
    pub fn clip_target(&self) -> Option<ElementId> {
        self.clip_target
    }

    pub fn transform(&self) -> &Transformable {
        &self.transform
    }

    /// Direct transform access. Writes through here do not mark the node
    /// dirty; use [`attr`](Self::attr) or call
    /// [`mark_dirty`](Self::mark_dirty) afterwards.
    pub fn transform_mut(&mut self) -> &mut Transformable {
        &mut self.transform
    }

    pub fn animation(&self) -> &Animatable {
        &self.animation
    }

    // -- Attribute writes --

    /// Unchecked single-field write. Assignment only; marking dirty is the
    /// caller's responsibility.
    ///
    /// A key the element does not expose (or a value of the wrong type) is
    /// logged and skipped, never partially applied.
    pub fn set_attr(&mut self, key: &str, value: AttrValue) {
        match (key, value) {
            ("x", AttrValue::Number(v)) => self.transform.set_x(v),
            ("y", AttrValue::Number(v)) => self.transform.set_y(v),
            ("scale_x", AttrValue::Number(v)) => self.transform.set_scale_x(v),
            ("scale_y", AttrValue::Number(v)) => self.transform.set_scale_y(v),
            ("rotation", AttrValue::Number(v)) => self.transform.set_rotation(v),
            ("origin_x", AttrValue::Number(v)) => self.transform.set_origin_x(v),
            ("origin_y", AttrValue::Number(v)) => self.transform.set_origin_y(v),
            ("ignore", AttrValue::Bool(v)) => self.ignore = v,
            ("silent", AttrValue::Bool(v)) => self.events.set_silent(v),
            ("name", AttrValue::Text(v)) => self.name = Some(v),
            (key, value) => {
                log::warn!(
                    "ignoring attr write {:?} = {:?}: unknown key or mismatched type",
                    key,
                    value
                );
            }
        }
    }

    /// Apply one pair or an ordered batch of attribute writes, then signal
    /// dirty exactly once. Returns `&mut Self` for chaining.
    pub fn attr(&mut self, attrs: impl IntoAttrs) -> &mut Self {
        for (key, value) in attrs.into_attrs() {
            self.set_attr(key, value);
        }
        self.mark_dirty();
        self
    }

    // -- Dirtying & visibility --

    /// Request a repaint from the hosting renderer; no-op while detached.
    pub fn mark_dirty(&self) {
        if let Some(host) = &self.renderer {
            host.request_repaint();
        }
    }

    /// Exclude the node from drawing and event targeting. Idempotent.
    pub fn hide(&mut self) {
        self.ignore = true;
        self.mark_dirty();
    }

    /// Undo [`hide`](Self::hide). Idempotent.
    pub fn show(&mut self) {
        self.ignore = false;
        self.mark_dirty();
    }

    // -- Renderer attachment protocol --

    /// Attach this node to a renderer instance.
    ///
    /// Registers every animator with the host's scheduler and cascades
    /// along the clip-path edge. Does not recurse into scene-tree
    /// children; the structure owning tree membership invokes this once
    /// per node. Re-attaching to the same host is harmless.
    pub fn attach(&mut self, host: &Renderer) {
        self.renderer = Some(host.clone());
        for handle in self.animation.handles() {
            host.add_animator(handle);
        }
        if let Some(clip) = &self.clip_path {
            clip.borrow_mut().attach(host);
        }
    }

    /// Detach this node from the renderer instance it was attached to.
    ///
    /// Must be called with the same host that was passed to
    /// [`attach`](Self::attach); anything else is a caller error.
    pub fn detach(&mut self, host: &Renderer) {
        debug_assert!(
            self.renderer.as_ref().map_or(true, |r| r.same(host)),
            "detach host does not match the attached host"
        );
        self.renderer = None;
        for handle in self.animation.handles() {
            host.remove_animator(handle.borrow().id());
        }
        if let Some(clip) = &self.clip_path {
            clip.borrow_mut().detach(host);
        }
    }

    // -- Animation --

    /// Start an animation on this node.
    ///
    /// The handle joins the node's animator collection and, when the node
    /// is already attached, is registered with the host scheduler
    /// immediately.
    pub fn animate(&mut self, animator: Animator) -> AnimatorHandle {
        let handle = animator.into_handle();
        self.animation.push(handle.clone());
        if let Some(host) = &self.renderer {
            host.add_animator(&handle);
        }
        handle
    }

    /// Abort every animation on this node and unregister the handles.
    pub fn stop_animations(&mut self) {
        for handle in self.animation.drain() {
            handle.borrow_mut().abort();
            if let Some(host) = &self.renderer {
                host.remove_animator(handle.borrow().id());
            }
        }
    }

    // -- Events --

    /// Register an event listener on this node.
    pub fn on<F>(&mut self, name: impl Into<String>, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.events.on(name, listener)
    }

    /// Remove one event listener.
    pub fn off(&mut self, name: &str, id: ListenerId) {
        self.events.off(name, id);
    }

    /// Deliver an event to this node's listeners.
    pub fn trigger(&mut self, event: &Event) {
        self.events.trigger(event);
    }

    pub fn events(&self) -> &Eventful {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Eventful {
        &mut self.events
    }

    // -- Clip-path management --

    /// Install `clip` as this node's clipping region.
    ///
    /// A clip path referenced by an attached node is never itself
    /// detached: when this node is hosted, `clip` is attached to the same
    /// host before installation. A different previous clip path is fully
    /// detached and unlinked first. Re-setting the current clip path just
    /// re-runs the attach cascade and dirties.
    ///
    /// Setting a node as its own clip path, or closing a clip-path cycle,
    /// is rejected and leaves all state untouched.
    pub fn set_clip_path(&mut self, clip: ElementRef) {
        if self.creates_clip_cycle(&clip) {
            log::warn!(
                "rejected clip path on element {:?}: would form a clip cycle",
                self.id
            );
            return;
        }

        if let Some(host) = self.renderer.clone() {
            clip.borrow_mut().attach(&host);
        }

        let replacing_other = self
            .clip_path
            .as_ref()
            .map_or(false, |current| current.borrow().id != clip.borrow().id);
        if replacing_other {
            self.remove_clip_path();
        }

        {
            let mut node = clip.borrow_mut();
            node.renderer = self.renderer.clone();
            node.clip_target = Some(self.id);
        }
        self.clip_path = Some(clip);
        self.mark_dirty();
    }

    /// Remove and fully detach the current clip path. No-op when none is
    /// set.
    pub fn remove_clip_path(&mut self) {
        let clip = match self.clip_path.take() {
            Some(clip) => clip,
            None => return,
        };
        {
            let mut node = clip.borrow_mut();
            if let Some(host) = node.renderer.clone() {
                node.detach(&host);
            }
            node.renderer = None;
            node.clip_target = None;
        }
        self.mark_dirty();
    }

    /// Whether installing `clip` would make this node reachable from
    /// itself along clip-path edges.
    fn creates_clip_cycle(&self, clip: &ElementRef) -> bool {
        let mut current = Some(clip.clone());
        while let Some(node) = current {
            let node = match node.try_borrow() {
                Ok(node) => node,
                // The only node that can be mutably borrowed mid-call is
                // the one this method was invoked on, so the chain loops
                // back to us.
                Err(_) => return true,
            };
            if node.id == self.id {
                return true;
            }
            current = node.clip_path.clone();
        }
        false
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new(ElementConfig::default())
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("ignore", &self.ignore)
            .field("attached", &self.renderer.is_some())
            .field("has_clip_path", &self.clip_path.is_some())
            .field("clip_target", &self.clip_target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;

    fn element() -> Element {
        Element::new(ElementConfig::default())
    }

    #[test]
    fn test_constructed_state() {
        let el = element();
        assert!(el.renderer().is_none());
        assert!(el.clip_path().is_none());
        assert!(el.clip_target().is_none());
        assert!(!el.is_ignored());
        assert_eq!(el.kind(), "element");
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let a = element();
        let b = element();
        assert_ne!(a.id(), b.id());

        let id = ElementId::next();
        let supplied = Element::new(ElementConfig {
            id: Some(id),
            ..ElementConfig::default()
        });
        assert_eq!(supplied.id(), id);
    }

    #[test]
    fn test_attach_detach_round_trip() {
        let host = Renderer::new();
        let mut el = element();

        el.attach(&host);
        assert!(el.renderer().map_or(false, |r| r.same(&host)));

        el.detach(&host);
        assert!(el.renderer().is_none());
    }

    #[test]
    fn test_attach_registers_all_animators_once() {
        let host = Renderer::new();
        let mut el = element();
        el.animate(Animator::new("x", 0.0, 1.0, 100.0));
        el.animate(Animator::new("y", 0.0, 1.0, 100.0));
        el.animate(Animator::new("rotation", 0.0, 1.0, 100.0));

        el.attach(&host);
        assert_eq!(host.animator_count(), 3);

        // Re-attaching must not duplicate registrations.
        el.attach(&host);
        assert_eq!(host.animator_count(), 3);

        el.detach(&host);
        assert_eq!(host.animator_count(), 0);
    }

    #[test]
    fn test_animate_while_attached_registers_immediately() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let handle = el.animate(Animator::new("x", 0.0, 1.0, 100.0));
        assert!(host.has_animator(handle.borrow().id()));

        el.stop_animations();
        assert_eq!(host.animator_count(), 0);
        assert!(el.animation().is_empty());
        assert!(handle.borrow().is_done());
    }

    #[test]
    fn test_attr_batch_signals_dirty_once() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let before = host.repaint_requests();
        el.attr(vec![("x", AttrValue::from(1.0)), ("y", AttrValue::from(2.0))]);
        assert_eq!(host.repaint_requests(), before + 1);
        assert_eq!(el.transform().position(), (1.0, 2.0));
    }

    #[test]
    fn test_attr_single_pair_and_chaining() {
        let mut el = element();
        el.attr(("x", 5.0)).attr(("ignore", true));
        assert_eq!(el.transform().position().0, 5.0);
        assert!(el.is_ignored());
    }

    #[test]
    fn test_attr_applies_in_iteration_order() {
        let mut el = element();
        el.attr(vec![
            ("x", AttrValue::from(1.0)),
            ("x", AttrValue::from(2.0)),
            ("x", AttrValue::from(3.0)),
        ]);
        assert_eq!(el.transform().position().0, 3.0);
    }

    #[test]
    fn test_attr_rejects_bad_writes_without_corruption() {
        let mut el = element();
        el.attr(vec![
            ("x", AttrValue::from(4.0)),
            ("no_such_field", AttrValue::from(1.0)),
            ("ignore", AttrValue::from(7.0)), // wrong type
        ]);
        assert_eq!(el.transform().position().0, 4.0);
        assert!(!el.is_ignored());
    }

    #[test]
    fn test_hide_show_repaint_only_while_attached() {
        let host = Renderer::new();
        let mut el = element();

        el.hide();
        assert!(el.is_ignored());
        assert_eq!(host.repaint_requests(), 0);

        el.attach(&host);
        let before = host.repaint_requests();
        el.hide();
        el.show();
        assert!(!el.is_ignored());
        assert_eq!(host.repaint_requests(), before + 2);
    }

    #[test]
    fn test_set_clip_path_on_attached_node() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let clip = element().into_ref();
        el.set_clip_path(clip.clone());

        assert!(clip.borrow().renderer().map_or(false, |r| r.same(&host)));
        assert_eq!(clip.borrow().clip_target(), Some(el.id()));
        assert_eq!(
            el.clip_path().map(|c| c.borrow().id()),
            Some(clip.borrow().id())
        );
    }

    #[test]
    fn test_clip_path_set_while_detached_then_attach_cascades() {
        let mut el = element();
        let clip = element().into_ref();

        el.set_clip_path(clip.clone());
        assert_eq!(clip.borrow().clip_target(), Some(el.id()));
        assert!(clip.borrow().renderer().is_none());

        let host = Renderer::new();
        el.attach(&host);
        assert!(clip.borrow().renderer().map_or(false, |r| r.same(&host)));
    }

    #[test]
    fn test_detach_cascades_to_clip_path() {
        let host = Renderer::new();
        let mut el = element();
        let clip = element().into_ref();
        clip.borrow_mut()
            .animate(Animator::new("x", 0.0, 1.0, 100.0));

        el.set_clip_path(clip.clone());
        el.attach(&host);
        assert_eq!(host.animator_count(), 1);

        el.detach(&host);
        assert!(clip.borrow().renderer().is_none());
        assert_eq!(host.animator_count(), 0);
    }

    #[test]
    fn test_replacing_clip_path_detaches_old() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let first = element().into_ref();
        let second = element().into_ref();
        el.set_clip_path(first.clone());
        el.set_clip_path(second.clone());

        assert!(first.borrow().renderer().is_none());
        assert!(first.borrow().clip_target().is_none());
        assert!(second.borrow().renderer().map_or(false, |r| r.same(&host)));
        assert_eq!(second.borrow().clip_target(), Some(el.id()));
        assert_eq!(
            el.clip_path().map(|c| c.borrow().id()),
            Some(second.borrow().id())
        );
    }

    #[test]
    fn test_resetting_same_clip_path_redirties_only() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let clip = element().into_ref();
        el.set_clip_path(clip.clone());
        let before = host.repaint_requests();

        el.set_clip_path(clip.clone());
        assert_eq!(host.repaint_requests(), before + 1);
        assert_eq!(clip.borrow().clip_target(), Some(el.id()));
        assert!(clip.borrow().renderer().map_or(false, |r| r.same(&host)));
    }

    #[test]
    fn test_remove_clip_path() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let clip = element().into_ref();
        el.set_clip_path(clip.clone());
        el.remove_clip_path();

        assert!(el.clip_path().is_none());
        assert!(clip.borrow().renderer().is_none());
        assert!(clip.borrow().clip_target().is_none());
    }

    #[test]
    fn test_remove_clip_path_without_clip_is_silent() {
        let host = Renderer::new();
        let mut el = element();
        el.attach(&host);

        let before = host.repaint_requests();
        el.remove_clip_path();
        assert_eq!(host.repaint_requests(), before);
    }

    #[test]
    fn test_self_clip_is_rejected() {
        let el = element().into_ref();
        let el2 = el.clone();
        el.borrow_mut().set_clip_path(el2);
        assert!(el.borrow().clip_path().is_none());
    }

    #[test]
    fn test_clip_cycle_is_rejected() {
        let a = element().into_ref();
        let b = element().into_ref();

        a.borrow_mut().set_clip_path(b.clone());
        // Closing the cycle b -> a must be refused.
        b.borrow_mut().set_clip_path(a.clone());

        assert!(b.borrow().clip_path().is_none());
        assert_eq!(b.borrow().clip_target(), Some(a.borrow().id()));
    }

    #[test]
    fn test_clip_chain_attach_cascade() {
        // el -> clip -> inner_clip: the attach cascade follows the whole
        // chain of clip-path edges.
        let host = Renderer::new();
        let mut el = element();
        let clip = element().into_ref();
        let inner = element().into_ref();

        clip.borrow_mut().set_clip_path(inner.clone());
        el.set_clip_path(clip.clone());
        el.attach(&host);

        assert!(inner.borrow().renderer().map_or(false, |r| r.same(&host)));

        el.detach(&host);
        assert!(inner.borrow().renderer().is_none());
    }
}
