//! Easing curves.
//!
//! Every curve maps a linear fraction in `[0, 1]` to an eased fraction with
//! `f(0) = 0` and `f(1) = 1` exactly. Values in between are not clamped, so
//! back, elastic and bounce curves overshoot the way they are meant to.

use std::f64::consts::PI;

const BACK_OVERSHOOT: f64 = 1.70158;
const BACK_IN_OUT_OVERSHOOT: f64 = BACK_OVERSHOOT * 1.525;
const ELASTIC_PERIOD: f64 = (2.0 * PI) / 3.0;
const ELASTIC_IN_OUT_PERIOD: f64 = (2.0 * PI) / 4.5;

/// Named easing curves plus an arbitrary cubic bezier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Apply the curve to a linear fraction.
    pub fn transform(&self, fraction: f64) -> f64 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        let t = fraction;
        match *self {
            Easing::Linear => t,
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInExpo => 2f64.powf(10.0 * t - 10.0),
            Easing::EaseOutExpo => 1.0 - 2f64.powf(-10.0 * t),
            Easing::EaseInOutExpo => {
                if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Easing::EaseInBack => {
                (BACK_OVERSHOOT + 1.0) * t * t * t - BACK_OVERSHOOT * t * t
            }
            Easing::EaseOutBack => {
                let u = t - 1.0;
                1.0 + (BACK_OVERSHOOT + 1.0) * u.powi(3) + BACK_OVERSHOOT * u.powi(2)
            }
            Easing::EaseInOutBack => {
                let c = BACK_IN_OUT_OVERSHOOT;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c + 1.0) * 2.0 * t - c)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c + 1.0) * (t * 2.0 - 2.0) + c) + 2.0) / 2.0
                }
            }
            Easing::EaseInElastic => {
                -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_PERIOD).sin()
            }
            Easing::EaseOutElastic => {
                2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_PERIOD).sin() + 1.0
            }
            Easing::EaseInOutElastic => {
                let wave = ((20.0 * t - 11.125) * ELASTIC_IN_OUT_PERIOD).sin();
                if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * wave) / 2.0
                } else {
                    (2f64.powf(-20.0 * t + 10.0) * wave) / 2.0 + 1.0
                }
            }
            Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Whether the curve can leave the `[0, 1]` range between its endpoints.
    pub fn overshoots(&self) -> bool {
        match *self {
            Easing::EaseInBack
            | Easing::EaseOutBack
            | Easing::EaseInOutBack
            | Easing::EaseInElastic
            | Easing::EaseOutElastic
            | Easing::EaseInOutElastic => true,
            Easing::CubicBezier(_, y1, _, y2) => {
                !(0.0..=1.0).contains(&y1) || !(0.0..=1.0).contains(&y2)
            }
            _ => false,
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Solve a cubic bezier easing for the given x fraction.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, fraction: f64) -> f64 {
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f64, b: f64, c: f64, t: f64) -> f64 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f64, b: f64, c: f64, t: f64) -> f64 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson on x(t), falling back to bisection when the slope
    // vanishes.
    let mut t = fraction;
    let mut converged = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-9 {
            converged = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-9 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !converged {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..32 {
            let delta = sample_curve(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-9 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

#[cfg(test)]
#[path = "tests/easing_tests.rs"]
mod tests;
