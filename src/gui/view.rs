use std::f32::consts::TAU;
use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::camera::CockpitCamera;
use crate::consts::{ALTERNATE_PLANET_TEXTURES, ALTERNATE_SUN_TEXTURES};
use crate::model::{Orbiting, RenderBody, Session, SolarSystem, TextureId};

const NUM_STARS: usize = 600;
const STAR_SEED: u64 = 0x5747_4152;
// Inside the far clip plane, outside anything that gets drawn
const STAR_DISTANCE: f32 = 400.0;

const ORBIT_COLOR: [f32; 3] = [0.35, 0.35, 0.45];
const FRAME_COLOR: [f32; 3] = [0.55, 0.6, 0.65];
const TEXT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const SAFE_COLOR: [f32; 3] = [0.2, 0.9, 0.3];
const DANGER_COLOR: [f32; 3] = [1.0, 0.15, 0.1];

/// Flat color standing in for each texture.
pub fn texture_color(texture: TextureId) -> [f32; 3] {
    match texture {
        TextureId::Sun => [1.0, 0.85, 0.3],
        TextureId::Mercury => [0.6, 0.58, 0.55],
        TextureId::Venus => [0.9, 0.75, 0.45],
        TextureId::Earth => [0.25, 0.45, 0.9],
        TextureId::Mars => [0.8, 0.35, 0.2],
        TextureId::Jupiter => [0.85, 0.7, 0.55],
        TextureId::Saturn => [0.9, 0.8, 0.55],
        TextureId::Uranus => [0.6, 0.85, 0.9],
        TextureId::Neptune => [0.3, 0.4, 0.95],
        TextureId::Pluto => [0.75, 0.65, 0.6],
        TextureId::Moon => [0.8, 0.8, 0.8],
        TextureId::Wormhole => [0.55, 0.1, 0.8],
        TextureId::AlternateSun(i) => {
            let t = f32::from(i % ALTERNATE_SUN_TEXTURES) / f32::from(ALTERNATE_SUN_TEXTURES);
            [1.0, 0.5 + 0.4 * t, 0.2 + 0.5 * t]
        }
        TextureId::AlternatePlanet(i) => {
            let hue = f32::from(i % ALTERNATE_PLANET_TEXTURES) / f32::from(ALTERNATE_PLANET_TEXTURES);
            hue_to_rgb(hue)
        }
    }
}

// Fully saturated, slightly dimmed
fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let channel = |offset: f32| {
        let h = (hue + offset).rem_euclid(1.0) * 6.0;
        let v = (h - 3.0).abs() - 1.0;
        0.2 + 0.7 * v.clamp(0.0, 1.0)
    };
    [channel(0.0), channel(2.0 / 3.0), channel(1.0 / 3.0)]
}

pub struct View {
    camera: CockpitCamera,
    body_nodes: Vec<SceneNode>,
    stars: Vec<Vector3<f32>>,
    font: Rc<Font>,
}

impl View {
    pub fn new(window: &mut Window, session: &Session) -> Self {
        let mut rng = StdRng::seed_from_u64(STAR_SEED);
        let stars = (0..NUM_STARS)
            .map(|_| {
                // Uniform on the sphere
                let z: f32 = rng.random_range(-1.0..=1.0);
                let phi: f32 = rng.random_range(0.0..TAU);
                let r = (1.0 - z * z).sqrt();
                Vector3::new(r * phi.cos(), r * phi.sin(), z)
            })
            .collect();

        let mut view = View {
            camera: CockpitCamera::new(window.width(), window.height()),
            body_nodes: vec![],
            stars,
            font: Font::default(),
        };
        view.rebuild(window, session.system());
        view.camera.sync(session.camera());
        view
    }

    /// Throws away all the scene nodes and makes new ones. Needed whenever the
    /// session swaps in a different system.
    pub fn rebuild(&mut self, window: &mut Window, system: &SolarSystem) {
        for mut node in self.body_nodes.drain(..) {
            node.unlink();
        }
        self.body_nodes = system
            .render_bodies()
            .iter()
            .map(|body| Self::create_body_object(window, body))
            .collect();
    }

    fn create_body_object(window: &mut Window, body: &RenderBody) -> SceneNode {
        let mut sphere = window.add_sphere(1.0);
        let [r, g, b] = texture_color(body.texture);
        sphere.set_color(r, g, b);
        sphere
    }

    pub fn update(&mut self, window: &mut Window, session: &Session, fps: f64) {
        let bodies = session.system().render_bodies();
        if bodies.len() != self.body_nodes.len() {
            self.rebuild(window, session.system());
        }
        self.camera.sync(session.camera());

        let visible = !session.is_crashed();
        for (node, body) in self.body_nodes.iter_mut().zip(bodies.iter()) {
            node.set_visible(visible);
            node.set_local_translation(Translation3::from(body.position.coords));
            node.set_local_scale(body.radius, body.radius, body.radius);
            node.set_local_rotation(UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                body.spin_degrees.to_radians(),
            ));
        }

        if session.is_crashed() {
            self.draw_crash_screen(window);
            return;
        }

        self.draw_stars(window);
        if session.show_orbits() {
            draw_orbits(window, session.system());
        }
        if session.starship_view() {
            draw_cockpit_frame(window);
            self.draw_warning_light(window, session.is_in_danger());
        }
        window.draw_text(
            &self.hud_text(session, fps),
            &Point2::new(0.0, 80.0),
            48.0,
            &self.font,
            &Point3::from(TEXT_COLOR),
        );
    }

    fn draw_stars(&self, window: &mut Window) {
        // Stars are glued to the camera, so they never get any closer
        let eye = self.camera.eye();
        let color = Point3::from(TEXT_COLOR);
        for direction in self.stars.iter() {
            window.draw_point(&(eye + direction * STAR_DISTANCE), &color);
        }
    }

    fn draw_warning_light(&self, window: &mut Window, in_danger: bool) {
        let (label, color) = if in_danger {
            ("DANGER", DANGER_COLOR)
        } else {
            ("SAFE", SAFE_COLOR)
        };
        // Text coordinates are in physical pixels, which is twice the window
        // size on the displays this gets used on.
        window.draw_text(
            label,
            &Point2::new(window.width() as f32 - 90.0, 10.0),
            60.0,
            &self.font,
            &Point3::from(color),
        );
    }

    fn draw_crash_screen(&self, window: &mut Window) {
        let center_x = window.width() as f32;
        let center_y = window.height() as f32;
        window.draw_text(
            "CRASHED",
            &Point2::new(center_x - 220.0, center_y - 120.0),
            160.0,
            &self.font,
            &Point3::from(DANGER_COLOR),
        );
        window.draw_text(
            "Press T to start over",
            &Point2::new(center_x - 260.0, center_y + 60.0),
            60.0,
            &self.font,
            &Point3::from(TEXT_COLOR),
        );
    }

    fn hud_text(&self, session: &Session, fps: f64) -> String {
        let clock = session.clock();
        let camera = session.camera();
        let clearance = session.last_clearance();
        let target = session
            .system()
            .planets()
            .get(session.selected_planet())
            .map(|p| format!("{} ({:?})", session.selected_planet(), p.body().texture))
            .unwrap_or_else(|| String::from("none"));

        format!(
            "Time: {:.2}
Time speed: {}
Ship speed: {}
Clearance: {:.4}
Wormhole: {:.4}
Target: {}
FPS: {:.0}",
            clock.time(),
            clock.time_speed(),
            camera.movement_speed(),
            clearance.planet,
            clearance.wormhole,
            target,
            fps,
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, None, None)
    }
}

fn draw_orbits(window: &mut Window, system: &SolarSystem) {
    let color = Point3::from(ORBIT_COLOR);
    for path in system.orbit_paths() {
        for segment in path.windows(2) {
            window.draw_line(&segment[0], &segment[1], &color);
        }
    }
}

// Struts and dashboard of the cockpit, in window coordinates (origin top left,
// y down), converted to the planar camera's centered coordinates.
fn draw_cockpit_frame(window: &mut Window) {
    let width = window.width() as f32;
    let height = window.height() as f32;
    let color = Point3::from(FRAME_COLOR);
    let to_planar = |x: f32, y: f32| Point2::new(x - width / 2.0, height / 2.0 - y);
    let mut line = |x0: f32, y0: f32, x1: f32, y1: f32| {
        window.draw_planar_line(&to_planar(x0, y0), &to_planar(x1, y1), &color);
    };

    let fifth = width / 5.0;
    let dash = 100.0;

    // Window struts; the outer two stop short of the roof
    for k in 1..5 {
        let top = if k == 1 || k == 4 { 200.0 } else { 0.0 };
        let x = fifth * k as f32;
        line(x, top, x, height - dash);
    }
    line(fifth, 200.0, fifth + dash, 0.0);
    line(fifth * 4.0, 200.0, fifth * 4.0 - dash, 0.0);

    // Roof
    line(0.0, 35.6, width, 35.6);

    // Dashboard
    line(0.0, height, fifth, height - dash);
    line(fifth, height - dash, fifth * 2.0, height - 1.5 * dash);
    line(fifth * 2.0, height - 1.5 * dash, fifth * 3.0, height - 1.5 * dash);
    line(fifth * 3.0, height - 1.5 * dash, fifth * 4.0, height - dash);
    line(fifth * 4.0, height - dash, width, height);
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    #[test]
    fn test_texture_colors() {
        let named = [
            TextureId::Sun,
            TextureId::Mercury,
            TextureId::Venus,
            TextureId::Earth,
            TextureId::Mars,
            TextureId::Jupiter,
            TextureId::Saturn,
            TextureId::Uranus,
            TextureId::Neptune,
            TextureId::Pluto,
            TextureId::Moon,
            TextureId::Wormhole,
        ];
        let alternates = (1..=ALTERNATE_PLANET_TEXTURES).map(TextureId::AlternatePlanet);
        let textures: Vec<_> = named.iter().copied().chain(alternates).collect();

        for texture in textures.iter() {
            for channel in texture_color(*texture) {
                assert!((0.0..=1.0).contains(&channel), "{:?}", texture);
            }
        }

        // Alternates should be told apart from each other
        let distinct = (1..=ALTERNATE_PLANET_TEXTURES)
            .map(|i| texture_color(TextureId::AlternatePlanet(i)))
            .map(|c| c.map(|x| (x * 1000.0).round() as i32))
            .unique()
            .count();
        assert_eq!(distinct, ALTERNATE_PLANET_TEXTURES as usize);
    }
}
