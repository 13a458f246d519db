use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{
    Isometry3, Matrix4, Perspective3, Point3, Translation3, UnitQuaternion, Vector2, Vector3,
};

use crate::math::ray::Ray;

const DEFAULT_CAMERA_Z: f32 = 6000.0;
const FOLLOW_ZOOM_FACTOR: f32 = 2.0;
const FOVY: f32 = 75.0 * PI / 180.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 10000.0;

// Unlike an arcball, this camera never orbits or zooms on its own: its
// position is assigned outright every frame, either a close-up behind the
// followed body or the fixed far-back framing of the whole system. The
// orientation starts out as the identity (looking down -z) and is only ever
// changed by an explicit reset, so a followed body lands dead center simply
// because the camera sits directly in front of it.
pub struct FollowCamera {
    position: Point3<f32>,
    rotation: Vector3<f32>, // euler angles
    width: u32,
    height: u32,
    fovy: f32,
}

impl FollowCamera {
    pub fn new() -> Self {
        FollowCamera {
            position: Point3::new(0.0, 0.0, DEFAULT_CAMERA_Z),
            rotation: Vector3::zeros(),
            width: 800,
            height: 600,
            fovy: FOVY,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.width as f32 / self.height as f32, self.fovy, Z_NEAR, Z_FAR)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    fn orientation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Places the camera a fixed multiple of the body's radius back from it
    /// along the view axis, so every body gets the same close-up framing
    /// regardless of its size. Rotation is left untouched.
    pub fn follow(&mut self, target: Point3<f32>, radius: f32) {
        self.position = Point3::new(
            target.x,
            target.y,
            target.z + FOLLOW_ZOOM_FACTOR * radius,
        );
    }

    /// The default far-back framing of the whole system. Rotation is left
    /// untouched here too.
    pub fn release(&mut self) {
        self.position = Point3::new(0.0, 0.0, DEFAULT_CAMERA_Z);
    }

    /// Full reset: default framing and zeroed rotation.
    pub fn reset(&mut self) {
        self.release();
        self.rotation = Vector3::zeros();
    }

    /// Converts a cursor position in window coordinates to normalized device
    /// coordinates: [-1, 1] on both axes, with y pointing up.
    pub fn pointer_ndc(&self, x: f32, y: f32) -> Vector2<f32> {
        Vector2::new(
            2.0 * x / self.width as f32 - 1.0,
            1.0 - 2.0 * y / self.height as f32,
        )
    }

    /// A world-space ray from the camera through the pointer.
    pub fn pick_ray(&self, pointer: &Vector2<f32>) -> Option<Ray> {
        let inverse = self.transformation().try_inverse()?;
        Ray::through_pointer(&inverse, pointer)
    }
}

impl Camera for FollowCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        // Resize is a pass-through: only the aspect ratio changes. We track
        // the window size rather than the framebuffer size so that these
        // dimensions stay in the same units as cursor positions; on a hidpi
        // display the two differ by the device pixel ratio.
        if let WindowEvent::Size(w, h) = *event {
            self.width = w;
            self.height = h;
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.position
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation())
            .inverse()
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation().try_inverse().unwrap()
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

    #[test]
    fn test_follow_framing() {
        let mut camera = FollowCamera::new();

        camera.follow(Point3::origin(), 127.0);
        approx::assert_relative_eq!(camera.position(), Point3::new(0.0, 0.0, 254.0));

        camera.follow(Point3::new(10.0, -20.0, 30.0), 34.0);
        approx::assert_relative_eq!(camera.position(), Point3::new(10.0, -20.0, 98.0));

        camera.release();
        approx::assert_relative_eq!(camera.position(), Point3::new(0.0, 0.0, 6000.0));
    }

    #[test]
    fn test_pointer_ndc_flips_y() {
        let mut camera = FollowCamera::new();
        camera.set_dimensions(800, 600);

        approx::assert_relative_eq!(camera.pointer_ndc(0.0, 0.0), Vector2::new(-1.0, 1.0));
        approx::assert_relative_eq!(camera.pointer_ndc(400.0, 300.0), Vector2::new(0.0, 0.0));
        approx::assert_relative_eq!(camera.pointer_ndc(800.0, 600.0), Vector2::new(1.0, -1.0));
    }

    #[test]
    fn test_pointer_and_projection_share_dimensions() {
        let mut camera = FollowCamera::new();
        camera.set_dimensions(1600, 1200);

        // The same width/height pair feeds both the NDC conversion and the
        // projection's aspect ratio
        approx::assert_relative_eq!(camera.pointer_ndc(800.0, 600.0), Vector2::zeros());

        let ray = camera.pick_ray(&Vector2::new(1.0, 0.0)).unwrap();
        let expected_slope = (1600.0 / 1200.0) * (FOVY / 2.0).tan();
        approx::assert_relative_eq!(
            ray.direction.x / -ray.direction.z,
            expected_slope,
            epsilon = 1e-4,
        );
    }

    #[test]
    fn test_pick_ray_through_center_looks_down_z() {
        let mut camera = FollowCamera::new();
        camera.reset();

        let ray = camera.pick_ray(&Vector2::zeros()).unwrap();
        approx::assert_relative_eq!(ray.direction.into_inner(), -Vector3::z(), epsilon = 1e-4);
        approx::assert_relative_eq!(ray.origin.x, 0.0, epsilon = 1e-2);
        approx::assert_relative_eq!(ray.origin.y, 0.0, epsilon = 1e-2);
    }
}
