//! Row-major 3×3 matrices and the rotations built from them.

use crate::vector::{self, Vector3};

/// Row-major 3×3 matrix.
pub type Matrix3 = [[f64; 3]; 3];

/// The identity matrix.
pub const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Matrix-vector product `m · v`.
#[inline]
pub fn mul_vec(m: &Matrix3, v: &Vector3) -> Vector3 {
    [
        vector::dot(&m[0], v),
        vector::dot(&m[1], v),
        vector::dot(&m[2], v),
    ]
}

/// Matrix product `a · b`.
pub fn mul(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Transpose (the inverse, for rotations).
pub fn transpose(m: &Matrix3) -> Matrix3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Active rotation by `angle` about the x axis.
pub fn rotation_x(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
}

/// Active rotation by `angle` about the z axis.
pub fn rotation_z(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

/// Proper z-x-z Euler rotation `Rz(alpha) · Rx(beta) · Rz(gamma)`.
///
/// With `(Ω, i, ω)` this maps perifocal coordinates into the reference frame.
pub fn from_euler_angles(alpha: f64, beta: f64, gamma: f64) -> Matrix3 {
    let (s1, c1) = alpha.sin_cos();
    let (s2, c2) = beta.sin_cos();
    let (s3, c3) = gamma.sin_cos();
    [
        [c1 * c3 - c2 * s1 * s3, -c1 * s3 - c2 * c3 * s1, s1 * s2],
        [c3 * s1 + c1 * c2 * s3, c1 * c2 * c3 - s1 * s3, -c1 * s2],
        [s2 * s3, c3 * s2, c2],
    ]
}
