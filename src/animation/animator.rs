//! Tween animators: one running animation bound to a named property.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::timing::TimingFunction;

/// Unique identifier for an animator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AnimatorId(u64);

static NEXT_ANIMATOR_ID: AtomicU64 = AtomicU64::new(1);

impl AnimatorId {
    /// Generate a new unique animator ID.
    pub fn next() -> Self {
        AnimatorId(NEXT_ANIMATOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shared handle to a running animator.
///
/// The same handle is held by the element that owns the animation and by
/// the scheduler of the renderer the element is attached to.
pub type AnimatorHandle = Rc<RefCell<Animator>>;

/// A tween over a single scalar property.
///
/// The animator only produces interpolated values; applying them to a
/// target property is the consumer's job.
#[derive(Debug)]
pub struct Animator {
    id: AnimatorId,
    key: String,
    from: f32,
    to: f32,
    delay_ms: f32,
    duration_ms: f32,
    timing: TimingFunction,
    looping: bool,
    elapsed_ms: f32,
    value: f32,
    done: bool,
}

impl Animator {
    /// Create an animator tweening `key` from `from` to `to` over
    /// `duration_ms` milliseconds.
    pub fn new(key: impl Into<String>, from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            id: AnimatorId::next(),
            key: key.into(),
            from,
            to,
            delay_ms: 0.0,
            duration_ms,
            timing: TimingFunction::Linear,
            looping: false,
            elapsed_ms: 0.0,
            value: from,
            done: false,
        }
    }

    /// Set the delay before the animation starts.
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the timing function.
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    /// Make the animation repeat from the start when it completes.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Wrap into the shared handle form used by elements and schedulers.
    pub fn into_handle(self) -> AnimatorHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> AnimatorId {
        self.id
    }

    /// Name of the property this animator drives.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current interpolated value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the animation has completed (or was aborted).
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Stop the animation immediately, keeping the current value.
    pub fn abort(&mut self) {
        self.done = true;
    }

    /// Advance the animation by `dt_ms` milliseconds.
    ///
    /// Returns `true` when the interpolated value changed.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if self.done {
            return false;
        }
        self.elapsed_ms += dt_ms;

        let active = self.elapsed_ms - self.delay_ms;
        if active <= 0.0 {
            // Still in the delay window.
            return false;
        }

        let mut t = if self.duration_ms > 0.0 {
            active / self.duration_ms
        } else {
            1.0
        };
        if self.looping {
            t %= 1.0;
        } else if t >= 1.0 {
            t = 1.0;
            self.done = true;
        }

        let eased = self.timing.evaluate(t);
        let new_value = self.from + (self.to - self.from) * eased;
        let changed = new_value != self.value;
        self.value = new_value;
        changed
    }
}
