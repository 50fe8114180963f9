//! Retained-mode 2D scene graph core.
//!
//! `glaze` provides the base scene-graph node ([`element::Element`]) that
//! every drawable or grouping object in a retained-mode 2D engine builds
//! on, together with the [`renderer::Renderer`] host it attaches to.
//!
//! The heart of the crate is the attachment protocol: attaching a node to
//! a renderer registers its animators with the host's scheduler and
//! cascades along the node's clip-path edge, and detaching reverses the
//! exact same sequence. Property writes on an attached node request a
//! coalesced repaint from its host.
//!
//! Paint pipelines, hit-testing and tween value application are external
//! consumers; this crate only maintains the state they rely on.

pub mod animatable;
pub mod animation;
pub mod element;
pub mod eventful;
pub mod renderer;
pub mod transform;
pub mod transformable;

pub mod prelude {
    pub use crate::animatable::Animatable;
    pub use crate::animation::{
        AnimationScheduler, Animator, AnimatorHandle, AnimatorId, TickOutcome, TimingFunction,
    };
    pub use crate::element::{
        AttrValue, Element, ElementConfig, ElementId, ElementRef, IntoAttrs,
    };
    pub use crate::eventful::{Event, Eventful, ListenerId};
    pub use crate::renderer::{RefreshFlags, Renderer};
    pub use crate::transform::Matrix;
    pub use crate::transformable::Transformable;
}
