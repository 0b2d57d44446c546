//! Pure easing functions
//!
//! Every curve maps progress in [0, 1] to eased progress in [0, 1] and is
//! pinned to exactly 0.0 and 1.0 at the endpoints, so animations land on
//! their target values without rounding drift.

pub use crate::config::EasingType;

/// Angular frequency of the normalized spring. Higher settles sooner.
const SPRING_OMEGA: f64 = 8.0;

/// Newton iterations before falling back to bisection
const BEZIER_NEWTON_ITERATIONS: usize = 8;
const BEZIER_EPSILON: f64 = 1e-7;

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// Input outside [0, 1] (and NaN) is clamped first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            EasingType::None => 0.0,
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::EaseOutQuad => cubic_bezier(0.25, 0.46, 0.45, 0.94, t),
            EasingType::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            EasingType::Spring => spring(t),
            EasingType::CubicBezier([x1, y1, x2, y2]) => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Whether the curve never decreases (all built-in curves do; a custom
    /// bezier may overshoot when its control points leave [0, 1])
    pub fn is_monotonic(&self) -> bool {
        match self {
            EasingType::CubicBezier([_, y1, _, y2]) => {
                (0.0..=1.0).contains(y1) && (0.0..=1.0).contains(y2)
            }
            _ => true,
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    1.0 - 2.0_f64.powf(-10.0 * t)
}

/// Critically damped spring step response, rescaled so f(1) = 1
#[inline]
fn spring(t: f64) -> f64 {
    let response = |t: f64| 1.0 - (1.0 + SPRING_OMEGA * t) * (-SPRING_OMEGA * t).exp();
    response(t) / response(1.0)
}

/// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    // Solve bezier_x(s) = x for the curve parameter s
    let mut s = x;
    let mut solved = false;
    for _ in 0..BEZIER_NEWTON_ITERATIONS {
        let err = bezier_component(x1, x2, s) - x;
        if err.abs() < BEZIER_EPSILON {
            solved = true;
            break;
        }
        let slope = bezier_derivative(x1, x2, s);
        if slope.abs() < BEZIER_EPSILON {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..64 {
            let value = bezier_component(x1, x2, s);
            if (value - x).abs() < BEZIER_EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
    }

    bezier_component(y1, y2, s)
}

#[inline]
fn bezier_component(p1: f64, p2: f64, s: f64) -> f64 {
    let mt = 1.0 - s;
    3.0 * mt * mt * s * p1 + 3.0 * mt * s * s * p2 + s * s * s
}

#[inline]
fn bezier_derivative(p1: f64, p2: f64, s: f64) -> f64 {
    let mt = 1.0 - s;
    3.0 * mt * mt * p1 + 6.0 * mt * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}
