mod animator;
mod scheduler;
mod timing;

pub use animator::{Animator, AnimatorHandle, AnimatorId};
pub use scheduler::{AnimationScheduler, TickOutcome};
pub use timing::TimingFunction;
