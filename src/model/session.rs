use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::camera::Camera;
use super::clock::SimClock;
use super::system::SolarSystem;
use crate::consts::{
    CANONICAL_WARP_ODDS, CRASH_THRESHOLD, DANGER_DISTANCE, NO_PROXIMITY, START_TIME,
    START_TIME_SPEED, WORMHOLE_THRESHOLD,
};

/// Movement the player can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    YawLeft,
    YawRight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

impl ControlState {
    pub fn set(&mut self, control: Control, held: bool) {
        let flag = match control {
            Control::Forward => &mut self.forward,
            Control::Backward => &mut self.backward,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::YawLeft => &mut self.yaw_left,
            Control::YawRight => &mut self.yaw_right,
        };
        *flag = held;
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::Left => self.left,
            Control::Right => self.right,
            Control::YawLeft => self.yaw_left,
            Control::YawRight => self.yaw_right,
        }
    }
}

/// Everything the player can ask for, already decoupled from the keys that
/// produce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Press(Control),
    Release(Control),
    SpeedUp,
    SlowDown,
    TimeFaster,
    TimeSlower,
    ToggleOrbits,
    ToggleView,
    Reset,
    SelectPlanet(char),
    Mouse(f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Flying,
    Crashed,
    Warped,
}

/// Distance from the camera to the nearest surface of each kind of body, as of
/// the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearance {
    pub planet: f32,
    pub wormhole: f32,
}

impl Default for Clearance {
    fn default() -> Self {
        Clearance {
            planet: NO_PROXIMITY,
            wormhole: NO_PROXIMITY,
        }
    }
}

/// What gets written to disk: the system's parameters and the camera pose.
/// Body positions are derived, and get recomputed after a restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState {
    pub system: SolarSystem,
    pub camera: Camera,
}

impl SavedState {
    /// Checks what deserializing can't: that the state is one the simulation
    /// could have produced.
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if !self.system.is_valid() {
            return Err("a body has a zero or non-finite period, or a negative size");
        }
        if !self.camera.is_valid() {
            return Err("the camera pose is not finite and orthonormal");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Seed for system generation; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Start in a randomized system instead of the canonical one.
    pub random_start: bool,
    pub start_time: f64,
    pub time_speed: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            seed: None,
            random_start: false,
            start_time: START_TIME,
            time_speed: START_TIME_SPEED,
        }
    }
}

pub struct Session {
    system: SolarSystem,
    camera: Camera,
    clock: SimClock,
    controls: ControlState,
    crashed: bool,
    show_orbits: bool,
    starship_view: bool,
    selected_planet: usize,
    last_clearance: Clearance,
    rng: StdRng,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let system = if config.random_start {
            SolarSystem::random(&mut rng)
        } else {
            SolarSystem::canonical()
        };
        Self::build(system, config, rng)
    }

    /// A session flying around a hand-built system.
    pub fn with_system(system: SolarSystem, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::build(system, config, rng)
    }

    fn build(mut system: SolarSystem, config: SessionConfig, rng: StdRng) -> Self {
        let clock = SimClock::new(config.start_time, config.time_speed);
        system.calculate_positions(clock.time());
        info!(
            "Starting with {} bodies and {} wormholes",
            system.planets().len(),
            system.wormholes().len()
        );

        let mut session = Session {
            system,
            camera: Camera::new(),
            clock,
            controls: ControlState::default(),
            crashed: false,
            show_orbits: true,
            starship_view: true,
            selected_planet: 1,
            last_clearance: Clearance::default(),
            rng,
        };
        session.update_clearance();
        session
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub fn show_orbits(&self) -> bool {
        self.show_orbits
    }

    pub fn starship_view(&self) -> bool {
        self.starship_view
    }

    pub fn selected_planet(&self) -> usize {
        self.selected_planet
    }

    pub fn last_clearance(&self) -> Clearance {
        self.last_clearance
    }

    /// The cockpit warning light.
    pub fn is_in_danger(&self) -> bool {
        let clearance = self.last_clearance.planet;
        clearance.is_nan() || clearance < DANGER_DISTANCE
    }

    /// One frame of simulation.
    pub fn step(&mut self) -> StepOutcome {
        let time = self.clock.advance();
        self.system.calculate_positions(time);
        self.update_clearance();

        // NaN clearance means the ship is nowhere, which counts as a crash
        let clearance = self.last_clearance.planet;
        if (clearance.is_nan() || clearance < CRASH_THRESHOLD) && !self.crashed {
            info!(
                "Crashed at t = {:.3}, clearance {}",
                time, self.last_clearance.planet
            );
            self.crashed = true;
        }
        if self.crashed {
            return StepOutcome::Crashed;
        }

        if self.last_clearance.wormhole < WORMHOLE_THRESHOLD {
            self.warp();
            self.apply_controls();
            return StepOutcome::Warped;
        }

        self.apply_controls();
        StepOutcome::Flying
    }

    fn update_clearance(&mut self) {
        let eye = self.camera.position();
        self.last_clearance = Clearance {
            planet: self.system.nearest_planet_distance(&eye),
            wormhole: self.system.nearest_wormhole_distance(&eye),
        };
    }

    fn warp(&mut self) {
        let canonical = self.rng.random_range(0..CANONICAL_WARP_ODDS) == 0;
        let system = if canonical {
            SolarSystem::canonical()
        } else {
            SolarSystem::random(&mut self.rng)
        };
        info!(
            canonical = canonical,
            "Warped into a system with {} bodies",
            system.planets().len()
        );

        self.system = system;
        self.system.calculate_positions(self.clock.time());
        self.selected_planet = 1;
        self.camera.reset();
        self.update_clearance();
    }

    fn apply_controls(&mut self) {
        let controls = self.controls;
        if controls.forward {
            self.camera.forward();
        }
        if controls.backward {
            self.camera.backward();
        }
        if controls.left {
            self.camera.left();
        }
        if controls.right {
            self.camera.right();
        }
        if controls.yaw_left {
            self.camera.yaw_left();
        }
        if controls.yaw_right {
            self.camera.yaw_right();
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Press(control) => self.controls.set(control, true),
            Command::Release(control) => self.controls.set(control, false),
            Command::SpeedUp => {
                self.camera.speed_up();
                debug!("Movement speed is {}", self.camera.movement_speed());
            }
            Command::SlowDown => {
                self.camera.slow_down();
                debug!("Movement speed is {}", self.camera.movement_speed());
            }
            Command::TimeFaster => {
                self.clock.faster();
                info!("Time speed is {}", self.clock.time_speed());
            }
            Command::TimeSlower => {
                self.clock.slower();
                info!("Time speed is {}", self.clock.time_speed());
            }
            Command::ToggleOrbits => self.show_orbits = !self.show_orbits,
            Command::ToggleView => self.starship_view = !self.starship_view,
            Command::Reset => {
                if self.crashed {
                    info!("Back to the start after a crash");
                }
                self.crashed = false;
                self.camera.reset();
            }
            Command::SelectPlanet(key) => self.select_planet(key),
            Command::Mouse(x, y) => self.camera.set_mouse(x, y),
        }
    }

    fn select_planet(&mut self, key: char) {
        let Some(slot) = self.system.planet_slot(key) else {
            debug!("No planet for key {:?}", key);
            return;
        };
        let Some(target) = self.system.planet_position(slot) else {
            return;
        };
        match self.camera.point_at(&target) {
            Ok(()) => self.selected_planet = slot,
            Err(e) => warn!("Can't turn towards planet {}: {}", slot, e),
        }
    }

    pub fn snapshot(&self) -> SavedState {
        SavedState {
            system: self.system.clone(),
            camera: self.camera.clone(),
        }
    }

    /// Replaces the system and camera with saved ones. The crash flag is
    /// cleared, since the saved pose is one the player was flying in.
    pub fn restore(&mut self, state: SavedState) {
        self.system = state.system;
        self.camera = state.camera;
        self.system.calculate_positions(self.clock.time());
        self.crashed = false;
        self.selected_planet = 1;
        self.update_clearance();
    }
}
