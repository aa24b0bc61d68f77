use std::path::PathBuf;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use tracing::warn;

use self::controller::{Controller, Request};
use self::view::View;
use crate::file::{load_state, save_state};
use crate::model::{Session, StepOutcome};

mod camera;
mod controller;
mod view;

pub use self::view::texture_color;

pub struct Simulation {
    session: Session,
    view: View,
    controller: Controller,
    save_file: PathBuf,
}

impl Simulation {
    pub fn new(session: Session, save_file: PathBuf, window: &mut Window) -> Self {
        Self {
            view: View::new(window, &session),
            session,
            controller: Controller::new(),
            save_file,
        }
    }

    fn process_user_input(&mut self, mut events: EventManager, window: &mut Window) {
        // Translate everything first; loading needs the window back
        let requests: Vec<_> = events
            .iter()
            .filter_map(|event| self.controller.translate(&event.value))
            .collect();

        for request in requests {
            match request {
                Request::Session(command) => self.session.apply(command),
                Request::Save => {
                    if let Err(e) = save_state(&self.save_file, &self.session.snapshot()) {
                        warn!("Couldn't save: {}", e);
                    }
                }
                Request::Load => match load_state(&self.save_file) {
                    Ok(state) => {
                        self.session.restore(state);
                        self.view.rebuild(window, self.session.system());
                    }
                    Err(e) => warn!("Couldn't load: {}", e),
                },
            }
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events(), window);
        if self.session.step() == StepOutcome::Warped {
            self.view.rebuild(window, self.session.system());
        }
        self.view.update(window, &self.session, self.controller.fps());
        self.controller.increment_frame_counter();
    }
}
