use nalgebra::Point3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{OrbitParams, Orbiting, Planet, RenderBody, TextureId, Wormhole};
use crate::consts::{
    ALTERNATE_PLANET_TEXTURES, ALTERNATE_SUN_TEXTURES, NO_PROXIMITY, RANDOM_MAX_PLANETS,
    RANDOM_MIN_PLANETS, RANDOM_SHELL_MAX, RANDOM_SHELL_MIN, RAND_MAX,
};
use crate::error::{Error, Result};

// Distances in km, periods in days, radii in km. Taken from real data,
// except for the sun's orbit period, which only needs to be nonzero.
const SUN: OrbitParams = params(0.0, 1.0, 500.0, 695_500.0);
const WORMHOLE: OrbitParams = params(130_000_000.0, 13_000_000_000.0, 0.0130, 13000.0);
const EARTH_MOON: OrbitParams = params(7_000_000.0, 27.3, 27.3, 1738.0);
const EARTH_INDEX: usize = 3;

const CANONICAL_PLANETS: [(OrbitParams, TextureId); 10] = [
    (SUN, TextureId::Sun),
    (params(57_910_000.0, 88.0, 58.6, 2440.0), TextureId::Mercury),
    (params(108_200_000.0, 224.65, 243.0, 6052.0), TextureId::Venus),
    (params(149_600_000.0, 365.0, 1.0, 6371.0), TextureId::Earth),
    (params(227_939_100.0, 686.0, 1.03, 3389.0), TextureId::Mars),
    (params(778_500_000.0, 4332.0, 0.4139, 69911.0), TextureId::Jupiter),
    (params(1_433_000_000.0, 10759.0, 0.44375, 58232.0), TextureId::Saturn),
    (params(2_877_000_000.0, 30685.0, 0.718056, 25362.0), TextureId::Uranus),
    (params(4_503_000_000.0, 60188.0, 0.6713, 24622.0), TextureId::Neptune),
    (params(5_906_380_000.0, 90616.0, 6.39, 1137.0), TextureId::Pluto),
];

const fn params(distance: f64, orbit_period: f64, rotation_period: f64, radius: f64) -> OrbitParams {
    OrbitParams {
        distance,
        orbit_period,
        rotation_period,
        radius,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolarSystem {
    planets: Vec<Planet>,
    wormholes: Vec<Wormhole>,
}

impl SolarSystem {
    /// An empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Our own solar system: the sun, nine planets, the moon, and a wormhole
    /// between Earth and Mars.
    pub fn canonical() -> Self {
        let mut system = Self::new();
        for (params, texture) in CANONICAL_PLANETS.iter() {
            system.add_planet(*params, *texture);
        }
        system.planets[EARTH_INDEX].add_moon(EARTH_MOON, TextureId::Moon);
        system.add_wormhole(WORMHOLE, TextureId::Wormhole);
        system
    }

    /// A made-up system: a sun, then 5 to 9 planets in strictly increasing
    /// shells, each with its own texture, then the usual wormhole.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut system = Self::new();

        let sun_texture = rng.random_range(0..ALTERNATE_SUN_TEXTURES);
        system.add_planet(SUN, TextureId::AlternateSun(sun_texture));

        let num_planets = rng.random_range(RANDOM_MIN_PLANETS..=RANDOM_MAX_PLANETS);
        let mut unused_textures: Vec<u8> = (1..=ALTERNATE_PLANET_TEXTURES).collect();
        let mut distance = 0.0;
        for i in 0..num_planets {
            let pick = rng.random_range(0..unused_textures.len());
            let texture = unused_textures.swap_remove(pick);

            distance += sample_shell_width(rng);
            let orbit_period = rng.random_range(100..=1099) as f64;
            let rotation_period = (rng.random_range(0..=RAND_MAX) + 1000) as f64 / 8000.0;
            // The innermost planet is always a small one
            let radius: u32 = if i == 0 {
                rng.random_range(3000..=4499)
            } else {
                rng.random_range(5000..=24999)
            };

            system.add_planet(
                OrbitParams::new(distance, orbit_period, rotation_period, radius as f64),
                TextureId::AlternatePlanet(texture),
            );
        }

        system.add_wormhole(WORMHOLE, TextureId::Wormhole);
        system
    }

    /// Appends a planet, returning its index.
    pub fn add_planet(&mut self, params: OrbitParams, texture: TextureId) -> usize {
        self.planets.push(Planet::new(params, texture));
        self.planets.len() - 1
    }

    pub fn add_moon(
        &mut self,
        planet_index: usize,
        params: OrbitParams,
        texture: TextureId,
    ) -> Result<()> {
        let count = self.planets.len();
        let planet = self.planets.get_mut(planet_index).ok_or(Error::NoSuchPlanet {
            index: planet_index,
            count,
        })?;
        planet.add_moon(params, texture);
        Ok(())
    }

    pub fn add_wormhole(&mut self, params: OrbitParams, texture: TextureId) {
        self.wormholes.push(Wormhole::new(params, texture));
    }

    pub fn calculate_positions(&mut self, time: f64) {
        for planet in self.planets.iter_mut() {
            planet.calculate_position(time);
        }
        for wormhole in self.wormholes.iter_mut() {
            wormhole.calculate_position(time);
        }
    }

    /// True when every planet, moon and wormhole has usable parameters.
    pub fn is_valid(&self) -> bool {
        let planets_ok = self.planets.iter().all(|planet| {
            planet.params().is_valid() && planet.moons().all(|m| m.body().params.is_valid())
        });
        planets_ok && self.wormholes.iter().all(|w| w.body().params.is_valid())
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn wormholes(&self) -> &[Wormhole] {
        &self.wormholes
    }

    pub fn planet_position(&self, index: usize) -> Option<Point3<f32>> {
        self.planets.get(index).map(Orbiting::display_position)
    }

    /// The planet's physical radius, in km.
    pub fn planet_radius(&self, index: usize) -> Option<f64> {
        self.planets.get(index).map(|p| p.params().radius)
    }

    /// Smallest clearance between `point` and any planet's surface.
    pub fn nearest_planet_distance(&self, point: &Point3<f32>) -> f32 {
        nearest(self.planets.iter(), point)
    }

    /// Smallest clearance between `point` and any wormhole's surface.
    pub fn nearest_wormhole_distance(&self, point: &Point3<f32>) -> f32 {
        nearest(self.wormholes.iter(), point)
    }

    /// Maps a number key to a planet slot. Slot 0 is the central body, which
    /// has no key.
    pub fn planet_slot(&self, key: char) -> Option<usize> {
        let index = key.to_digit(10)? as usize;
        if index >= 1 && index < self.planets.len() {
            Some(index)
        } else {
            None
        }
    }

    pub fn has_planet(&self, key: char) -> bool {
        self.planet_slot(key).is_some()
    }

    /// Every body to draw this frame: wormholes, then each planet followed by
    /// its moons.
    pub fn render_bodies(&self) -> Vec<RenderBody> {
        let mut bodies: Vec<_> = self.wormholes.iter().map(|w| w.to_render_body()).collect();
        for planet in self.planets.iter() {
            bodies.push(planet.to_render_body());
            bodies.extend(planet.moons().map(|m| m.to_render_body()));
        }
        bodies
    }

    /// Orbit lines for planets and their moons. Wormholes don't get one.
    pub fn orbit_paths(&self) -> Vec<Vec<Point3<f32>>> {
        let mut paths = vec![];
        for planet in self.planets.iter() {
            paths.extend(planet.orbit_path());
            paths.extend(planet.moons().filter_map(|m| m.orbit_path()));
        }
        paths
    }
}

// A NaN clearance wins, so a lost position never reads as far from everything
fn nearest<'a, T: Orbiting + 'a>(bodies: impl Iterator<Item = &'a T>, point: &Point3<f32>) -> f32 {
    bodies
        .map(|body| body.clearance(point))
        .fold(NO_PROXIMITY, |acc, c| if c.is_nan() || c < acc { c } else { acc })
}

/// Rejection-samples the gap between two neighbouring orbits, as the product of
/// two shifted uniforms.
fn sample_shell_width<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let a = (rng.random_range(0..=RAND_MAX) + 1000) as f64;
        let b = (rng.random_range(0..=RAND_MAX) + 1000) as f64;
        let width = a * b;
        if (RANDOM_SHELL_MIN..=RANDOM_SHELL_MAX).contains(&width) {
            return width;
        }
    }
}
