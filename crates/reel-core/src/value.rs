//! Animatable value types.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::AnimationError;

/// Trait for types that can be interpolated by a tween.
///
/// `fraction` is the eased progress and is not clamped, so overshoot curves
/// can produce values below 0 and above 1.
pub trait Lerp: Clone + Unpin + 'static {
    fn lerp(&self, target: &Self, fraction: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f64) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f64) -> Self {
        self + (target - self) * fraction as f32
    }
}

/// Text morph: the target's prefix overwrites the source one character at a
/// time while the source's remaining tail shrinks.
impl Lerp for String {
    fn lerp(&self, target: &Self, fraction: f64) -> Self {
        let from: Vec<char> = self.chars().collect();
        let to: Vec<char> = target.chars().collect();
        let total = from.len().max(to.len());
        let replaced = (fraction.clamp(0.0, 1.0) * total as f64).floor() as usize;
        let replaced = replaced.min(total);
        to.iter()
            .take(replaced.min(to.len()))
            .chain(from.iter().skip(replaced))
            .collect()
    }
}

/// A 2D vector used for positions, sizes and camera pans.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    pub const ONE: Vector2 = Vector2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Lerp for Vector2 {
    fn lerp(&self, target: &Self, fraction: f64) -> Self {
        Vector2::new(
            self.x.lerp(&target.x, fraction),
            self.y.lerp(&target.y, fraction),
        )
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2::new(x, y)
    }
}

/// RGBA color with channels in `0.0..=1.0`.
///
/// Interpolation works on raw channels, so overshooting curves may push a
/// channel out of range; [`Color::to_hex`] clamps when formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> Result<Self, AnimationError> {
        let invalid = || AnimationError::InvalidColor {
            input: input.to_string(),
        };
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            3 => {
                let short = |index: usize| {
                    u8::from_str_radix(&digits[index..index + 1], 16)
                        .map(|value| value * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb8(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => {
                let mut color = Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?);
                color.a = channel(6..8)? as f32 / 255.0;
                Ok(color)
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(&self) -> String {
        let byte = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if byte(self.a) == 255 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Lerp for Color {
    fn lerp(&self, target: &Self, fraction: f64) -> Self {
        Color::rgba(
            self.r.lerp(&target.r, fraction),
            self.g.lerp(&target.g, fraction),
            self.b.lerp(&target.b, fraction),
            self.a.lerp(&target.a, fraction),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
#[path = "tests/value_tests.rs"]
mod tests;
