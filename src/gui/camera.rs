use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

use crate::model;

// The projection the cockpit has always used: 70 degree field of view, and a
// depth range wide enough for the whole system at display scale.
const FOVY_DEGREES: f32 = 70.0;
const Z_NEAR: f32 = 0.001;
const Z_FAR: f32 = 500.0;

// Unlike the usual kiss3d cameras, this one doesn't move by itself. It mirrors
// the simulation's camera, which gets copied in once per frame by `sync`. The
// only event it cares about is the window changing size.
pub struct CockpitCamera {
    // -- pose --
    eye: Point3<f32>,
    target: Point3<f32>,
    up: Vector3<f32>,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
}

impl CockpitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = CockpitCamera {
            eye: Point3::origin(),
            target: Point3::origin(),
            up: Vector3::z(),
            width,
            height,
            fovy: FOVY_DEGREES.to_radians(),
        };
        camera.sync(&model::Camera::new());
        camera
    }

    pub fn sync(&mut self, camera: &model::Camera) {
        let basis = camera.oriented_basis();
        self.eye = camera.eye();
        self.target = camera.look_target();
        self.up = basis.up;
    }

    fn projection(&self) -> Perspective3<f32> {
        // Minimized windows report 0x0
        let aspect = self.width.max(1) as f32 / self.height.max(1) as f32;
        Perspective3::new(aspect, self.fovy, Z_NEAR, Z_FAR)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }
}

impl Camera for CockpitCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.width = w;
            self.height = h;
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.eye
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye, &self.target, &self.up)
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.view_transform().inverse().to_homogeneous() * self.projection().inverse()
    }

    fn clip_planes(&self) -> (f32, f32) {
        (Z_NEAR, Z_FAR)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_follows_model_camera() {
        let mut model_camera = model::Camera::new();
        model_camera.set_mouse(500.0, 300.0);
        model_camera.forward();

        let mut camera = CockpitCamera::new(1200, 700);
        camera.sync(&model_camera);
        assert_eq!(camera.eye(), model_camera.position());

        // The look target ends up straight ahead, on the view axis
        let target = camera.view_transform() * model_camera.look_target();
        assert_relative_eq!(target, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }
}
