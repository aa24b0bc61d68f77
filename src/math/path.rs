use std::f64::consts::TAU;

use nalgebra::Point3;

pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// A closed circle of the given radius in the orbital plane, centered at
/// `center`, sampled roughly every `step` radians. The angle is measured
/// from the y-axis, the same way orbital positions are, so the first and
/// last points are both (0, radius).
pub fn circle_path(
    center: Point3<f32>,
    radius: f64,
    step: f64,
) -> impl Iterator<Item = Point3<f32>> {
    let num_segments = ((TAU / step).ceil() as usize).max(1);
    path_iter_parametric(
        move |angle: f64| {
            let (sin, cos) = angle.sin_cos();
            center + nalgebra::Vector3::new((sin * radius) as f32, (cos * radius) as f32, 0.0)
        },
        0.0,
        TAU,
        num_segments,
    )
}
