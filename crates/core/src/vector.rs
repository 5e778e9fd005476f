//! Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.

/// Alias for a 3D vector in metres or m/s depending on context.
pub type Vector3 = [f64; 3];

/// Unit vector along the x axis (vernal equinox direction).
pub const X_AXIS: Vector3 = [1.0, 0.0, 0.0];
/// Unit vector along the z axis (reference-plane normal).
pub const Z_AXIS: Vector3 = [0.0, 0.0, 1.0];
/// The zero vector.
pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

/// Euclidean norm of a vector.
#[inline]
pub fn norm(v: &Vector3) -> f64 {
    dot(v, v).sqrt()
}

/// Dot product of two vectors.
#[inline]
pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a × b`.
#[inline]
pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Vector addition.
#[inline]
pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Vector subtraction.
#[inline]
pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Scale a vector by a scalar.
#[inline]
pub fn scale(v: &Vector3, s: f64) -> Vector3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// Unit vector along `v`. The zero vector maps to NaN components.
#[inline]
pub fn normalize(v: &Vector3) -> Vector3 {
    scale(v, 1.0 / norm(v))
}

/// Distance between two points.
#[inline]
pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
    norm(&sub(a, b))
}

/// Unsigned angle between two vectors, in `[0, π]`.
pub fn angle(a: &Vector3, b: &Vector3) -> f64 {
    let c = dot(a, b) / norm(a) / norm(b);
    // rounding can push the cosine slightly outside [-1, 1]
    c.clamp(-1.0, 1.0).acos()
}

/// Angle from `a` to `b`, negative when `a × b` points against `normal`.
pub fn signed_angle(a: &Vector3, b: &Vector3, normal: &Vector3) -> f64 {
    let geometric = angle(a, b);
    if dot(normal, &cross(a, b)) < 0.0 {
        -geometric
    } else {
        geometric
    }
}
