//! Timing functions (easing curves) for animators.
//!
//! A timing function reshapes normalized animation time, turning linear
//! clock progress into accelerating, decelerating or fully custom motion.
//!
//! - [`TimingFunction::Linear`] - constant speed
//! - [`TimingFunction::EaseIn`] - starts slow, ends fast
//! - [`TimingFunction::EaseOut`] - starts fast, ends slow
//! - [`TimingFunction::EaseInOut`] - slow at both ends
//! - [`TimingFunction::CubicBezier`] - CSS-style cubic bezier curve
//! - [`TimingFunction::Custom`] - user-defined closure

use std::rc::Rc;

/// Easing curve applied to normalized animation progress.
#[derive(Clone)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed).
    Linear,
    /// Quadratic ease-in (accelerating).
    EaseIn,
    /// Quadratic ease-out (decelerating).
    EaseOut,
    /// Quadratic ease on both ends, fast in the middle.
    EaseInOut,
    /// CSS cubic-bezier curve with control points (x1, y1, x2, y2).
    CubicBezier(f32, f32, f32, f32),
    /// Custom timing function.
    Custom(Rc<dyn Fn(f32) -> f32>),
}

impl TimingFunction {
    /// Evaluate the curve at normalized time `t` in `[0, 1]`.
    ///
    /// The result is an interpolation factor; custom curves may return
    /// values outside `[0, 1]` for overshoot.
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseIn => t * t,
            TimingFunction::EaseOut => t * (2.0 - t),
            TimingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    (4.0 - 2.0 * t) * t - 1.0
                }
            }
            TimingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            TimingFunction::Custom(f) => f(t),
        }
    }

    /// Create a custom timing function from a closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + 'static,
    {
        TimingFunction::Custom(Rc::new(f))
    }
}

impl Default for TimingFunction {
    fn default() -> Self {
        TimingFunction::Linear
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::EaseIn => write!(f, "EaseIn"),
            TimingFunction::EaseOut => write!(f, "EaseOut"),
            TimingFunction::EaseInOut => write!(f, "EaseInOut"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Evaluate a CSS cubic-bezier curve at time `t`.
///
/// Solves x(s) = t for the curve parameter by bisection (the x polynomial
/// is monotonic for control points in [0, 1]), then evaluates y(s).
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut s = t;
    for _ in 0..24 {
        let x = bezier_component(s, x1, x2);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier_component(s, y1, y2)
}

/// One cubic bezier coordinate with implicit endpoints 0 and 1.
fn bezier_component(s: f32, p1: f32, p2: f32) -> f32 {
    let ms = 1.0 - s;
    3.0 * ms * ms * s * p1 + 3.0 * ms * s * s * p2 + s * s * s
}
