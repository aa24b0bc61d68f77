use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::consts::{
    DISTANCE_SCALE, MAX_DISPLAY_RADIUS, MOON_ORBIT_STEP, PI_APPROX, PLANET_ORBIT_STEP, SIZE_SCALE,
};
use crate::math::path::circle_path;

/// Opaque handle for the surface a body is drawn with. Resolving it into an
/// actual resource is the renderer's business.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Moon,
    Wormhole,
    AlternateSun(u8),
    AlternatePlanet(u8),
}

// All the immutable info about an orbit. Distances and radii are in km, times
// in simulated days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    pub distance: f64,
    pub orbit_period: f64,
    pub rotation_period: f64,
    pub radius: f64,
}

impl OrbitParams {
    pub fn new(distance: f64, orbit_period: f64, rotation_period: f64, radius: f64) -> Self {
        debug_assert!(distance >= 0.0 && radius >= 0.0);
        debug_assert!(orbit_period != 0.0 && rotation_period != 0.0);
        OrbitParams {
            distance,
            orbit_period,
            rotation_period,
            radius,
        }
    }

    /// Whether positions computed from these parameters stay finite. Checked
    /// for anything read from disk, where `new`'s assertions never ran.
    pub fn is_valid(&self) -> bool {
        let finite = [self.distance, self.orbit_period, self.rotation_period, self.radius]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.distance >= 0.0
            && self.radius >= 0.0
            && self.orbit_period != 0.0
            && self.rotation_period != 0.0
    }

    /// Offset from whatever this orbit is centered on. Orbits all lie in the
    /// z = 0 plane, and start on the +y axis.
    pub fn offset_at(&self, time: f64) -> Vector3<f64> {
        let angle = time * PI_APPROX / self.orbit_period;
        let (sin, cos) = angle.sin_cos();
        Vector3::new(sin * self.distance, cos * self.distance, 0.0)
    }

    /// Spin around the body's own axis, in degrees. Grows without bound.
    pub fn rotation_at(&self, time: f64) -> f64 {
        time * 360.0 / self.rotation_period
    }
}

/// The state every planet, moon and wormhole has in common.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitingBody {
    pub params: OrbitParams,
    pub texture: TextureId,
    // Derived from time; recomputed every tick and never saved.
    #[serde(skip, default = "Vector3::zeros")]
    offset: Vector3<f64>,
    #[serde(skip)]
    rotation: f64,
}

impl OrbitingBody {
    pub fn new(params: OrbitParams, texture: TextureId) -> Self {
        OrbitingBody {
            params,
            texture,
            offset: Vector3::zeros(),
            rotation: 0.0,
        }
    }

    pub fn calculate_position(&mut self, time: f64) {
        self.offset = self.params.offset_at(time);
        self.rotation = self.params.rotation_at(time);
    }

    /// Position relative to the parent, in km.
    pub fn offset(&self) -> Vector3<f64> {
        self.offset
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_central(&self) -> bool {
        self.params.distance < 0.001
    }

    pub fn display_radius(&self) -> f32 {
        (self.params.radius * SIZE_SCALE) as f32
    }

    pub fn clamped_display_radius(&self) -> f32 {
        self.display_radius().min(MAX_DISPLAY_RADIUS)
    }
}

/// Everything the renderer needs to draw one body this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderBody {
    pub position: Point3<f32>,
    pub radius: f32,
    /// Spin around the z-axis, in degrees, already reduced to [0, 360).
    pub spin_degrees: f32,
    pub texture: TextureId,
    /// The light source at the middle of the system.
    pub emissive: bool,
}

/// Shared behaviour of anything circling something else. Implementors only
/// decide what they circle and how they're drawn; the position math lives in
/// [OrbitingBody].
pub trait Orbiting {
    fn body(&self) -> &OrbitingBody;

    /// World position of the point this body circles, in km.
    fn parent_position(&self) -> Vector3<f64> {
        Vector3::zeros()
    }

    fn world_position(&self) -> Vector3<f64> {
        self.parent_position() + self.body().offset()
    }

    fn display_position(&self) -> Point3<f32> {
        let scaled: Vector3<f32> = nalgebra::convert(self.world_position() * DISTANCE_SCALE);
        Point3::from(scaled)
    }

    /// Radius used for both drawing and proximity tests.
    fn draw_radius(&self) -> f32 {
        self.body().clamped_display_radius()
    }

    fn spin_degrees(&self) -> f32 {
        wrap_degrees(self.body().rotation())
    }

    fn orbit_step(&self) -> f64 {
        PLANET_ORBIT_STEP
    }

    fn has_orbit_line(&self) -> bool {
        true
    }

    /// Signed distance from `point` to this body's surface; negative means
    /// `point` is inside.
    fn clearance(&self, point: &Point3<f32>) -> f32 {
        (*point - self.display_position()).norm() - self.draw_radius()
    }

    /// The orbit line, in display units. None for bodies that don't draw one.
    fn orbit_path(&self) -> Option<Vec<Point3<f32>>> {
        let body = self.body();
        if !self.has_orbit_line() || body.is_central() {
            return None;
        }
        let parent_scaled: Vector3<f32> =
            nalgebra::convert(self.parent_position() * DISTANCE_SCALE);
        let path = circle_path(
            Point3::from(parent_scaled),
            body.params.distance * DISTANCE_SCALE,
            self.orbit_step(),
        );
        Some(path.collect())
    }

    fn to_render_body(&self) -> RenderBody {
        RenderBody {
            position: self.display_position(),
            radius: self.draw_radius(),
            spin_degrees: self.spin_degrees(),
            texture: self.body().texture,
            emissive: self.body().is_central(),
        }
    }
}

fn wrap_degrees(degrees: f64) -> f32 {
    let wrapped = degrees.rem_euclid(360.0) as f32;
    // Rounding to f32 can land exactly on 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    body: OrbitingBody,
    moons: Vec<OrbitingBody>,
}

impl Planet {
    pub fn new(params: OrbitParams, texture: TextureId) -> Self {
        Planet {
            body: OrbitingBody::new(params, texture),
            moons: vec![],
        }
    }

    pub fn add_moon(&mut self, params: OrbitParams, texture: TextureId) {
        self.moons.push(OrbitingBody::new(params, texture));
    }

    pub fn calculate_position(&mut self, time: f64) {
        self.body.calculate_position(time);
        for moon in self.moons.iter_mut() {
            moon.calculate_position(time);
        }
    }

    pub fn params(&self) -> &OrbitParams {
        &self.body.params
    }

    pub fn num_moons(&self) -> usize {
        self.moons.len()
    }

    pub fn moons(&self) -> impl Iterator<Item = Moon<'_>> + '_ {
        self.moons.iter().map(move |body| Moon { planet: self, body })
    }

    pub fn get_moon(&self, index: usize) -> Option<Moon<'_>> {
        self.moons.get(index).map(|body| Moon { planet: self, body })
    }
}

impl Orbiting for Planet {
    fn body(&self) -> &OrbitingBody {
        &self.body
    }
}

/// A moon, seen together with the planet it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Moon<'a> {
    planet: &'a Planet,
    body: &'a OrbitingBody,
}

impl Orbiting for Moon<'_> {
    fn body(&self) -> &OrbitingBody {
        self.body
    }

    fn parent_position(&self) -> Vector3<f64> {
        self.planet.world_position()
    }

    // Moons spin the other way
    fn spin_degrees(&self) -> f32 {
        wrap_degrees(-self.body.rotation())
    }

    fn orbit_step(&self) -> f64 {
        MOON_ORBIT_STEP
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wormhole {
    body: OrbitingBody,
}

impl Wormhole {
    pub fn new(params: OrbitParams, texture: TextureId) -> Self {
        Wormhole {
            body: OrbitingBody::new(params, texture),
        }
    }

    pub fn calculate_position(&mut self, time: f64) {
        self.body.calculate_position(time);
    }

    pub fn params(&self) -> &OrbitParams {
        &self.body.params
    }
}

impl Orbiting for Wormhole {
    fn body(&self) -> &OrbitingBody {
        &self.body
    }

    // Wormholes are never clamped; they're small anyway.
    fn draw_radius(&self) -> f32 {
        self.body.display_radius()
    }

    fn has_orbit_line(&self) -> bool {
        false
    }
}
