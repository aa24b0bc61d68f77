// Behavioural constants of the flythrough.

/// Approximation of pi used for orbital angles. Not a typo: every orbit
/// position depends on this exact value.
pub const PI_APPROX: f64 = 3.1419;

/// Physical units (km) to display units.
pub const DISTANCE_SCALE: f64 = 1.0e-8;
/// Physical radius (km) to display units.
pub const SIZE_SCALE: f64 = 5.0e-6;
/// Largest radius a planet or moon is ever drawn (or collided) with.
pub const MAX_DISPLAY_RADIUS: f32 = 0.5;

// Proximity decisions, in display units
pub const CRASH_THRESHOLD: f32 = 0.001;
pub const WORMHOLE_THRESHOLD: f32 = 0.001;
pub const DANGER_DISTANCE: f32 = 0.08;
/// Returned by the proximity tests when there is nothing to be close to.
pub const NO_PROXIMITY: f32 = 10000.0;

// Virtual trackball, in screen pixels
pub const TRACKBALL_CENTER_X: f32 = 600.0;
pub const TRACKBALL_CENTER_Y: f32 = 350.0;
pub const TRACKBALL_RADIUS: f32 = 350.0;

// Orbit line sampling, in radians
pub const PLANET_ORBIT_STEP: f64 = 0.05;
pub const MOON_ORBIT_STEP: f64 = 0.1;

// Simulated clock
pub const START_TIME: f64 = 2.552;
pub const START_TIME_SPEED: f64 = 0.1;

// Random system generation
pub const RANDOM_MIN_PLANETS: u32 = 5;
pub const RANDOM_MAX_PLANETS: u32 = 9;
pub const RANDOM_SHELL_MIN: f64 = 57_910_000.0;
pub const RANDOM_SHELL_MAX: f64 = 120_000_000.0;
/// Largest value of the classic `rand()`; the distance sampler is built around it.
pub const RAND_MAX: u32 = 32767;
pub const ALTERNATE_PLANET_TEXTURES: u8 = 11;
pub const ALTERNATE_SUN_TEXTURES: u8 = 3;
/// A warp lands in the canonical system one time in this many.
pub const CANONICAL_WARP_ODDS: u32 = 6;
