use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use space_wander::consts::{START_TIME, START_TIME_SPEED, TRACKBALL_CENTER_X, TRACKBALL_CENTER_Y};
use space_wander::gui::Simulation;
use space_wander::model::{Session, SessionConfig};

/// Fly a spaceship around the solar system.
///
/// W/S: forward/back, A/D: turn, Q/E: strafe, mouse: look around,
/// ./,: ship speed, =/-: time speed, 1-9: face a planet, O: orbits,
/// U: cockpit, T: restart, B/N: save/load.
#[derive(Debug, Parser)]
struct Args {
    /// Seed for generating systems beyond the wormhole
    #[arg(long)]
    seed: Option<u64>,
    /// Start in a randomly generated system
    #[arg(long)]
    random: bool,
    /// Simulated days per frame
    #[arg(long, default_value_t = START_TIME_SPEED)]
    time_speed: f64,
    /// Where B saves to and N loads from
    #[arg(long, default_value = "status.json")]
    save_file: PathBuf,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // The trackball is centered on the window
    let width = 2.0 * TRACKBALL_CENTER_X;
    let height = 2.0 * TRACKBALL_CENTER_Y;
    let mut window = Window::new_with_size("Space Wander", width as u32, height as u32);
    window.set_light(Light::StickToCamera);
    window.set_background_color(0.0, 0.0, 0.0);
    window.set_framerate_limit(Some(100));

    let session = Session::new(SessionConfig {
        seed: args.seed,
        random_start: args.random,
        start_time: START_TIME,
        time_speed: args.time_speed,
    });

    let simulation = Simulation::new(session, args.save_file, &mut window);
    window.render_loop(simulation);
}
