use std::f32::consts::FRAC_PI_2;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::consts::{TRACKBALL_CENTER_X, TRACKBALL_CENTER_Y, TRACKBALL_RADIUS};
use crate::error::Result;
use crate::math::{normalize, rotate_around};

// Starting pose, picked by eye: looking at the inner planets from slightly
// above the orbital plane.
const DEFAULT_POSITION: [f32; 3] = [0.764331460, -1.66760659, 0.642456770];
const DEFAULT_FORWARD: [f32; 3] = [-0.398769796, 0.763009906, -0.508720219];
const DEFAULT_RIGHT: [f32; 3] = [0.886262059, 0.463184059, 0.0];
const DEFAULT_UP: [f32; 3] = [-0.235630989, 0.450859368, 0.860931039];
const DEFAULT_MOVEMENT_SPEED: f32 = 0.005;
const DEFAULT_TURN_SPEED: f32 = 0.01;

const MAX_MOVEMENT_SPEED: f32 = 1.0;
const MIN_MOVEMENT_SPEED: f32 = 0.000001;

const BASIS_TOLERANCE: f32 = 1e-3;

/// An orientation. Forward, right and up are unit length and mutually
/// perpendicular, with up = right x forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Basis {
    /// Unit length and mutually perpendicular, within `tolerance`.
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let Basis { forward, right, up } = self;
        let unit = [forward, right, up]
            .iter()
            .all(|v| (v.norm() - 1.0).abs() <= tolerance);
        let perpendicular = [forward.dot(right), forward.dot(up), right.dot(up)]
            .iter()
            .all(|d| d.abs() <= tolerance);
        unit && perpendicular && (right.cross(forward) - up).norm() <= tolerance
    }

    fn default_orientation() -> Self {
        Basis {
            forward: Vector3::from(DEFAULT_FORWARD),
            right: Vector3::from(DEFAULT_RIGHT),
            up: Vector3::from(DEFAULT_UP),
        }
    }

    /// Rotate yaw radians around up, then pitch radians around the new right.
    pub fn looking(&self, yaw: f32, pitch: f32) -> Basis {
        let yawed_forward = rotate_around(&self.forward, &self.up, yaw);
        let right = rotate_around(&self.right, &self.up, yaw);
        Basis {
            forward: rotate_around(&yawed_forward, &right, pitch),
            right,
            up: rotate_around(&self.up, &right, pitch),
        }
    }

    // Gram-Schmidt, keeping forward's direction fixed
    fn renormalize(&mut self) {
        let forward = self.forward.normalize();
        let right = (self.right - self.right.dot(&forward) * forward).normalize();
        self.forward = forward;
        self.right = right;
        self.up = right.cross(&forward);
    }
}

/// The spaceship: a free-flying camera.
///
/// The stored basis only changes through explicit yaws and [Camera::point_at].
/// Mouse look is layered on top at read time (see [Camera::oriented_basis]),
/// and movement follows where the mouse is looking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    position: Point3<f32>,
    basis: Basis,
    movement_speed: f32,
    turn_speed: f32,
    // -- mouse look --
    yaw_offset: f32,
    pitch_offset: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Camera {
            position: Point3::from(DEFAULT_POSITION),
            basis: Basis::default_orientation(),
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            turn_speed: DEFAULT_TURN_SPEED,
            yaw_offset: 0.0,
            pitch_offset: 0.0,
        }
    }

    /// Back to the starting pose and speeds. Mouse look is left alone: it's
    /// recomputed from the pointer on the next mouse event anyway.
    pub fn reset(&mut self) {
        self.position = Point3::from(DEFAULT_POSITION);
        self.basis = Basis::default_orientation();
        self.movement_speed = DEFAULT_MOVEMENT_SPEED;
        self.turn_speed = DEFAULT_TURN_SPEED;
    }

    /// A pose that movement can't turn into NaN: finite numbers, an
    /// orthonormal basis and a speed inside its limits.
    pub fn is_valid(&self) -> bool {
        let finite = self.position.coords.iter().all(|c| c.is_finite())
            && self.turn_speed.is_finite()
            && self.yaw_offset.is_finite()
            && self.pitch_offset.is_finite();
        finite
            && self.basis.is_orthonormal(BASIS_TOLERANCE)
            && self.movement_speed >= MIN_MOVEMENT_SPEED / 2.0
            && self.movement_speed <= MAX_MOVEMENT_SPEED * 2.0
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    pub fn look_offsets(&self) -> (f32, f32) {
        (self.yaw_offset, self.pitch_offset)
    }

    /// The stored basis with mouse look applied. This is what the viewer sees
    /// and what movement follows.
    pub fn oriented_basis(&self) -> Basis {
        self.basis.looking(self.yaw_offset, self.pitch_offset)
    }

    pub fn eye(&self) -> Point3<f32> {
        self.position
    }

    pub fn look_target(&self) -> Point3<f32> {
        self.position + self.oriented_basis().forward
    }

    /// Virtual trackball: the pointer is projected onto a hemisphere centered
    /// on the screen, and the look angles are read off that point. Pointers
    /// outside the trackball are pulled onto its rim.
    pub fn set_mouse(&mut self, screen_x: f32, screen_y: f32) {
        let mut x = -(screen_x - TRACKBALL_CENTER_X);
        let mut y = -(screen_y - TRACKBALL_CENTER_Y);

        let r = x.hypot(y);
        let depth = if r > TRACKBALL_RADIUS {
            x *= TRACKBALL_RADIUS / r;
            y *= TRACKBALL_RADIUS / r;
            0.0
        } else {
            (TRACKBALL_RADIUS * TRACKBALL_RADIUS - x * x - y * y).max(0.0).sqrt()
        };

        // On the rim depth is 0: +-pi/2 to the sides, 0 straight up or down
        self.yaw_offset = x.atan2(depth);
        self.pitch_offset = (y / TRACKBALL_RADIUS).clamp(-1.0, 1.0).asin();
    }

    pub fn speed_up(&mut self) {
        if self.movement_speed < MAX_MOVEMENT_SPEED {
            self.movement_speed *= 2.0;
        }
    }

    pub fn slow_down(&mut self) {
        if self.movement_speed > MIN_MOVEMENT_SPEED {
            self.movement_speed /= 2.0;
        }
    }

    pub fn forward(&mut self) {
        self.position += self.oriented_basis().forward * self.movement_speed;
    }

    pub fn backward(&mut self) {
        self.position -= self.oriented_basis().forward * self.movement_speed;
    }

    pub fn left(&mut self) {
        self.position -= self.oriented_basis().right * self.movement_speed;
    }

    pub fn right(&mut self) {
        self.position += self.oriented_basis().right * self.movement_speed;
    }

    pub fn yaw_left(&mut self) {
        self.yaw(self.turn_speed);
    }

    pub fn yaw_right(&mut self) {
        self.yaw(-self.turn_speed);
    }

    fn yaw(&mut self, angle: f32) {
        let up = self.basis.up;
        self.basis.forward = rotate_around(&self.basis.forward, &up, angle);
        self.basis.right = rotate_around(&self.basis.right, &up, angle);
        self.basis.renormalize();
    }

    /// Turns to face `target`, keeping right in the horizontal plane.
    ///
    /// Fails, leaving the camera untouched, if the target is where we are or
    /// straight above or below us.
    pub fn point_at(&mut self, target: &Point3<f32>) -> Result<()> {
        let forward = normalize(&(target - self.position))?.into_inner();

        let mut right = rotate_around(&forward, &Vector3::z(), -FRAC_PI_2);
        right.z = 0.0;
        let right = normalize(&right)?.into_inner();

        let up = rotate_around(&forward, &right, FRAC_PI_2);
        self.basis = Basis { forward, right, up };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::error::Error;

    fn assert_orthonormal(basis: &Basis) {
        let Basis { forward, right, up } = basis;
        assert_abs_diff_eq!(forward.norm(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(right.norm(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(up.norm(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.dot(right), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.dot(up), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(right.dot(up), 0.0, epsilon = 1e-5);
        assert_relative_eq!(right.cross(forward), *up, epsilon = 1e-5);
    }

    #[test]
    fn test_default_basis_is_orthonormal() {
        let camera = Camera::new();
        assert_orthonormal(&camera.basis());
        assert_orthonormal(&camera.oriented_basis());
        assert_eq!(camera.look_offsets(), (0.0, 0.0));
    }

    #[test]
    fn test_validity() {
        let mut camera = Camera::new();
        assert!(camera.is_valid());
        for _ in 0..20 {
            camera.speed_up();
            camera.yaw_left();
        }
        assert!(camera.is_valid());
        for _ in 0..40 {
            camera.slow_down();
        }
        assert!(camera.is_valid());

        let mut skewed = Camera::new();
        skewed.basis.right = skewed.basis.forward;
        assert!(!skewed.is_valid());

        let mut stretched = Camera::new();
        stretched.basis.up *= 2.0;
        assert!(!stretched.is_valid());

        let mut lost = Camera::new();
        lost.position.x = f32::NAN;
        assert!(!lost.is_valid());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut camera = Camera::new();
        camera.speed_up();
        camera.forward();
        camera.yaw_left();
        camera.left();
        camera.point_at(&Point3::new(5.0, 5.0, 1.0)).unwrap();

        camera.reset();
        assert_eq!(camera.position(), Point3::new(0.764331460, -1.66760659, 0.642456770));
        assert_eq!(camera.basis(), Basis::default_orientation());
        assert_eq!(camera.movement_speed(), 0.005);
        assert_eq!(camera.turn_speed(), 0.01);
    }

    #[test]
    fn test_reset_keeps_mouse_look() {
        // Look angles are pointer state, not pose; reset doesn't touch them.
        let mut camera = Camera::new();
        camera.set_mouse(400.0, 200.0);
        let look = camera.look_offsets();
        assert_ne!(look, (0.0, 0.0));

        camera.reset();
        assert_eq!(camera.look_offsets(), look);
    }

    #[test]
    fn test_trackball() {
        let mut camera = Camera::new();

        // Center of the trackball looks straight ahead
        camera.set_mouse(600.0, 350.0);
        assert_eq!(camera.look_offsets(), (0.0, 0.0));

        // Pointer to the left turns left (positive yaw), pointer up looks up
        camera.set_mouse(425.0, 350.0);
        let (yaw, pitch) = camera.look_offsets();
        let depth = (350.0f32 * 350.0 - 175.0 * 175.0).sqrt();
        assert_relative_eq!(yaw, (175.0 / depth).atan());
        assert_eq!(pitch, 0.0);

        camera.set_mouse(600.0, 175.0);
        let (yaw, pitch) = camera.look_offsets();
        assert_eq!(yaw, 0.0);
        assert_relative_eq!(pitch, 0.5f32.asin());

        // Way off to the right: pulled onto the rim, yaw is a right angle
        camera.set_mouse(1500.0, 350.0);
        let (yaw, pitch) = camera.look_offsets();
        assert_relative_eq!(yaw, -FRAC_PI_2);
        assert_abs_diff_eq!(pitch, 0.0);

        // Past the top corner: still well-defined
        camera.set_mouse(0.0, -2000.0);
        let (yaw, pitch) = camera.look_offsets();
        assert!(yaw.is_finite() && pitch.is_finite());
        assert!(pitch > 0.0 && pitch <= FRAC_PI_2);
    }

    #[test]
    fn test_trackball_rim_on_vertical_axis() {
        // Top and bottom centre of the window, and straight above it
        for &(x, y, up) in &[(600.0, 0.0, true), (600.0, 700.0, false), (600.0, -100.0, true)] {
            let mut camera = Camera::new();
            camera.set_mouse(x, y);
            let (yaw, pitch) = camera.look_offsets();
            assert_eq!(yaw, 0.0);
            assert_relative_eq!(pitch, if up { FRAC_PI_2 } else { -FRAC_PI_2 });
            assert_orthonormal(&camera.oriented_basis());

            camera.forward();
            assert!(camera.position().coords.iter().all(|c| c.is_finite()));

            // Re-centring recovers a straight-ahead view
            camera.set_mouse(600.0, 350.0);
            assert_relative_eq!(camera.oriented_basis().forward, camera.basis().forward);
        }
    }

    #[test]
    fn test_mouse_look_is_temporary() {
        let mut camera = Camera::new();
        let stored = camera.basis();

        camera.set_mouse(300.0, 100.0);
        let oriented = camera.oriented_basis();
        assert_ne!(oriented, stored);
        assert_eq!(camera.basis(), stored);
        assert_orthonormal(&oriented);

        // Yaw first about up, then pitch about the new right
        let (yaw, pitch) = camera.look_offsets();
        let right = rotate_around(&stored.right, &stored.up, yaw);
        assert_relative_eq!(oriented.right, right, epsilon = 1e-6);
        let forward = rotate_around(&rotate_around(&stored.forward, &stored.up, yaw), &right, pitch);
        assert_relative_eq!(oriented.forward, forward, epsilon = 1e-6);
    }

    #[test]
    fn test_movement_follows_mouse_look() {
        let mut camera = Camera::new();
        camera.set_mouse(200.0, 500.0);
        let start = camera.position();
        let look = camera.oriented_basis();

        camera.forward();
        assert_relative_eq!(camera.position(), start + look.forward * 0.005, epsilon = 1e-6);
        camera.backward();
        assert_relative_eq!(camera.position(), start, epsilon = 1e-6);

        camera.right();
        assert_relative_eq!(camera.position(), start + look.right * 0.005, epsilon = 1e-6);
        camera.left();
        assert_relative_eq!(camera.position(), start, epsilon = 1e-6);

        // Moving doesn't turn
        assert_eq!(camera.oriented_basis(), look);
    }

    #[test]
    fn test_yaw() {
        let mut camera = Camera::new();
        let before = camera.basis();

        camera.yaw_left();
        let after = camera.basis();
        assert_relative_eq!(after.up, before.up, epsilon = 1e-6);
        assert_relative_eq!(after.forward.dot(&before.forward), 0.01f32.cos(), epsilon = 1e-6);
        // Turning left swings forward towards -right
        assert!(after.forward.dot(&before.right) < 0.0);

        camera.yaw_right();
        assert_relative_eq!(camera.basis().forward, before.forward, epsilon = 1e-5);
        assert_eq!(camera.position(), Camera::new().position());
    }

    #[test]
    fn test_long_flight_stays_orthonormal() {
        let mut camera = Camera::new();
        for i in 0..5000 {
            match i % 7 {
                0 | 1 | 2 => camera.yaw_left(),
                3 => camera.yaw_right(),
                4 => camera.set_mouse((i % 1200) as f32, (i % 700) as f32),
                5 => camera.forward(),
                _ => {
                    if i % 500 == 6 {
                        let target = Point3::new((i as f32).sin() * 3.0, 2.0, 0.5);
                        camera.point_at(&target).unwrap();
                    }
                }
            }
            assert_orthonormal(&camera.basis());
        }
        assert_orthonormal(&camera.oriented_basis());
    }

    #[test]
    fn test_speed_limits() {
        let mut camera = Camera::new();
        camera.speed_up();
        camera.slow_down();
        assert_relative_eq!(camera.movement_speed(), 0.005);

        for _ in 0..100 {
            camera.speed_up();
            assert!(camera.movement_speed() <= 2.0 * MAX_MOVEMENT_SPEED);
        }
        // 0.005 * 2^8 = 1.28 is the first value past the cap; doubling stops there
        assert_relative_eq!(camera.movement_speed(), 1.28);

        for _ in 0..100 {
            camera.slow_down();
            assert!(camera.movement_speed() > 0.0);
        }
        assert!(camera.movement_speed() <= MIN_MOVEMENT_SPEED);
        assert!(camera.movement_speed() > MIN_MOVEMENT_SPEED / 2.0);
    }

    #[test]
    fn test_point_at() {
        let mut camera = Camera::new();
        let target = Point3::new(3.0, 1.0, -0.5);
        camera.point_at(&target).unwrap();

        let basis = camera.basis();
        let expected = (target - camera.position()).normalize();
        assert_relative_eq!(basis.forward, expected, epsilon = 1e-6);
        assert_eq!(basis.right.z, 0.0);
        assert!(basis.up.z > 0.0);
        assert_orthonormal(&basis);

        // Pointing where the default pose already points gives the default pose
        let mut camera = Camera::new();
        let ahead = camera.position() + Vector3::from(DEFAULT_FORWARD) * 2.0;
        camera.point_at(&ahead).unwrap();
        let default = Basis::default_orientation();
        assert_relative_eq!(camera.basis().right, default.right, epsilon = 1e-5);
        assert_relative_eq!(camera.basis().up, default.up, epsilon = 1e-5);
    }

    #[test]
    fn test_point_at_degenerate() {
        let mut camera = Camera::new();
        let before = camera.clone();

        let here = camera.position();
        assert!(matches!(camera.point_at(&here), Err(Error::DegenerateVector)));

        let overhead = camera.position() + Vector3::z() * 3.0;
        assert!(matches!(camera.point_at(&overhead), Err(Error::DegenerateVector)));

        assert_eq!(camera, before);
    }
}
