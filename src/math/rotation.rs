use nalgebra::{Matrix3, Unit, Vector3};

use crate::error::{Error, Result};

/// Normalizes v, refusing to divide by a zero (or non-finite) magnitude.
pub fn normalize(v: &Vector3<f32>) -> Result<Unit<Vector3<f32>>> {
    let norm = v.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(Error::DegenerateVector);
    }
    Ok(Unit::new_unchecked(v / norm))
}

/// Builds the matrix rotating by `angle` radians around `axis`, via Rodrigues'
/// formula. The axis is assumed to be unit length; this is not checked, because
/// camera basis vectors are passed straight in.
#[rustfmt::skip]
pub fn rotation_matrix(axis: &Vector3<f32>, angle: f32) -> Matrix3<f32> {
    let (sin, cos) = angle.sin_cos();
    let one_minus_cos = 1.0 - cos;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    Matrix3::new(
        cos + x * x * one_minus_cos,     x * y * one_minus_cos - z * sin, x * z * one_minus_cos + y * sin,
        y * x * one_minus_cos + z * sin, cos + y * y * one_minus_cos,     y * z * one_minus_cos - x * sin,
        z * x * one_minus_cos - y * sin, z * y * one_minus_cos + x * sin, cos + z * z * one_minus_cos,
    )
}

/// Rotates v around the (unit) axis by angle radians.
pub fn rotate_around(v: &Vector3<f32>, axis: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    rotation_matrix(axis, angle) * v
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Rotation3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_normalize() {
        let n = normalize(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(n.into_inner(), Vector3::new(0.6, 0.0, 0.8));

        assert!(matches!(
            normalize(&Vector3::zeros()),
            Err(Error::DegenerateVector)
        ));
        assert!(matches!(
            normalize(&Vector3::new(f32::NAN, 0.0, 0.0)),
            Err(Error::DegenerateVector)
        ));
    }

    #[test]
    fn test_quarter_turns() {
        // Right-handed: x goes to y around z
        assert_relative_eq!(
            rotate_around(&Vector3::x(), &Vector3::z(), FRAC_PI_2),
            Vector3::y(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            rotate_around(&Vector3::y(), &Vector3::x(), FRAC_PI_2),
            Vector3::z(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            rotate_around(&Vector3::x(), &Vector3::z(), -FRAC_PI_2),
            -Vector3::y(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_matches_nalgebra() {
        let axis = Vector3::new(1.0, -2.0, 0.5).normalize();
        let v = Vector3::new(0.3, 4.0, -1.2);

        for &angle in &[0.0, 0.01, 1.0, -2.5, 3.1] {
            let expected = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle) * v;
            assert_relative_eq!(rotate_around(&v, &axis, angle), expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rotation_is_orthogonal() {
        let axis = Vector3::new(0.2, 0.3, -0.9).normalize();
        let m = rotation_matrix(&axis, 0.7);
        assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-6);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-6);
        // The axis itself is fixed
        assert_relative_eq!(m * axis, axis, epsilon = 1e-6);
    }
}
