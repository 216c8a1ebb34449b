//! 2D vector helpers
//!
//! Thin, pure functions over `glam::DVec2`. Every function takes its
//! arguments by value and returns a fresh vector, so no two owners ever
//! alias the same storage.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::error::VectorError;

/// Position / velocity value type used by the simulation.
pub type Vector2D = DVec2;

/// Zero vector
#[inline]
pub fn zero() -> Vector2D {
    DVec2::ZERO
}

#[inline]
pub fn add(a: Vector2D, b: Vector2D) -> Vector2D {
    a + b
}

#[inline]
pub fn sub(a: Vector2D, b: Vector2D) -> Vector2D {
    a - b
}

/// Scale by a scalar
#[inline]
pub fn mult(v: Vector2D, scalar: f64) -> Vector2D {
    v * scalar
}

/// Component-wise division
///
/// Fails when either divisor component is zero.
pub fn div(v: Vector2D, divisor: Vector2D) -> Result<Vector2D, VectorError> {
    if divisor.x == 0.0 || divisor.y == 0.0 {
        return Err(VectorError::DivisionByZero);
    }
    Ok(v / divisor)
}

/// Division by a scalar
pub fn div_scalar(v: Vector2D, scalar: f64) -> Result<Vector2D, VectorError> {
    div(v, DVec2::splat(scalar))
}

#[inline]
pub fn dot(a: Vector2D, b: Vector2D) -> f64 {
    a.dot(b)
}

#[inline]
pub fn copy(v: Vector2D) -> Vector2D {
    v
}

/// Angle of the vector from the +x axis (radians, in [-π, π])
#[inline]
pub fn angle(v: Vector2D) -> f64 {
    v.y.atan2(v.x)
}

/// Alias of [`angle`], kept for callers that think in headings.
#[inline]
pub fn heading(v: Vector2D) -> f64 {
    angle(v)
}

#[inline]
pub fn magnitude(v: Vector2D) -> f64 {
    v.length()
}

/// Unit vector pointing the same way as `v`
///
/// A zero vector has no direction, so this returns `DivisionByZero`
/// rather than a NaN-bearing vector.
pub fn normalize(v: Vector2D) -> Result<Vector2D, VectorError> {
    v.try_normalize().ok_or(VectorError::DivisionByZero)
}

/// Euclidean distance between two points
#[inline]
pub fn dist(a: Vector2D, b: Vector2D) -> f64 {
    magnitude(sub(a, b))
}

/// Angle of the segment from `a` to `b`
#[inline]
pub fn angle_between(a: Vector2D, b: Vector2D) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Unit vector for an angle (radians)
#[inline]
pub fn from_angle(theta: f64) -> Vector2D {
    DVec2::new(theta.cos(), theta.sin())
}

/// Uniformly distributed random unit vector
pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Vector2D {
    from_angle(rng.random::<f64>() * TAU)
}

/// `"x,y"` string form, handy as a map key in logs
pub fn to_key(v: Vector2D) -> String {
    format!("{},{}", v.x, v.y)
}
