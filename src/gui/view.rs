use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Isometry3, Point2, Point3, Vector2};

use super::camera::FollowCamera;
use super::controller::{hovered_bodies, Controller};
use super::path_renderer::PathRenderer;
use crate::model::{BodyID, World};

// Material colors, straight out of the original diagram
const NEUTRAL_COLOR: (f32, f32, f32) = (1.0, 1.0, 1.0);
const HOVER_COLOR: (f32, f32, f32) = (0.980, 0.835, 0.471);
const ORBIT_PATH_COLOR: (f32, f32, f32) = (0.133, 0.133, 0.133);

pub struct View {
    world: World,
    body_nodes: HashMap<BodyID, SceneNode>,
    camera: FollowCamera,
    renderer: PathRenderer,
}

impl View {
    pub fn new(world: World, window: &mut Window) -> Self {
        let mut camera = FollowCamera::new();
        camera.set_dimensions(window.width(), window.height());
        camera.reset();

        // Only bodies with actual extent get a mesh; reference frames and
        // the sun (a bare light source) stay invisible.
        let mut body_nodes = HashMap::new();
        for body in world.bodies() {
            if body.info.radius > 0.0 {
                let mut sphere = window.add_sphere(body.info.radius);
                let color = &body.info.color;
                sphere.set_color(color.x, color.y, color.z);
                body_nodes.insert(body.id, sphere);
            }
        }

        let mut view = Self {
            world,
            body_nodes,
            camera,
            renderer: PathRenderer::new(),
        };
        view.sync_scene_nodes();
        view
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn update_world(&mut self) {
        self.world.step();
    }

    /// Unconditionally drops the follow target and restores the default
    /// camera pose, rotation included.
    pub fn cancel_follow(&mut self) {
        self.world.clear_follow_target();
        self.camera.reset();
    }

    fn sync_scene_nodes(&mut self) {
        for (id, node) in self.body_nodes.iter_mut() {
            let transform: Isometry3<f32> = nalgebra::convert(self.world.world_transform(*id));
            node.set_local_transformation(transform);
        }
    }

    // Reset everything to neutral, then recolor whatever the pointer is
    // over. Doing the full sweep every frame keeps this idempotent.
    fn refresh_highlights(&mut self, pointer: &Vector2<f32>) {
        for node in self.body_nodes.values_mut() {
            let (r, g, b) = NEUTRAL_COLOR;
            node.set_color(r, g, b);
        }
        for id in hovered_bodies(&self.world, &self.camera, pointer) {
            if let Some(node) = self.body_nodes.get_mut(&id) {
                let (r, g, b) = HOVER_COLOR;
                node.set_color(r, g, b);
            }
        }
    }

    fn update_camera(&mut self) {
        match self.world.follow_target() {
            Some(id) => {
                let target: Point3<f32> = nalgebra::convert(self.world.world_position(id));
                self.camera.follow(target, self.world.get_body(id).info.radius);
            }
            None => self.camera.release(),
        }
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        let pointer = controller.pointer();

        self.sync_scene_nodes();
        self.refresh_highlights(&pointer);
        self.update_camera();

        // The orbit path lives in the inclined moon frame
        self.renderer.draw_ellipse(
            self.world.orbit(),
            nalgebra::convert(self.world.world_transform(self.world.moon_frame())),
            Point3::new(ORBIT_PATH_COLOR.0, ORBIT_PATH_COLOR.1, ORBIT_PATH_COLOR.2),
        );

        // Draw text
        let default_font = Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.status_text(&pointer),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.roster_text(controller.fps()),
            // draw_text works in framebuffer pixels, hence the 2.0
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn status_text(&self, pointer: &Vector2<f32>) -> String {
        let camera_position = self.camera.position();
        let camera_rotation = self.camera.rotation();
        let earth = self.world.world_position(self.world.earth());
        let moon_local = self.world.local_position(self.world.moon());
        let moon_world = self.world.world_position(self.world.moon());

        format!(
            "Pointer: {:.3} | {:.3}
Camera: {:.1} | {:.1} | {:.1}
Camera angle: {:.1} | {:.1} | {:.1}
Earth: {:.1} | {:.1} | {:.1}
Moon: {:.1} | {:.1} | {:.1}",
            pointer.x,
            pointer.y,
            camera_position.x,
            camera_position.y,
            camera_position.z,
            camera_rotation.x,
            camera_rotation.y,
            camera_rotation.z,
            earth.x,
            earth.y,
            earth.z,
            moon_local.x,
            moon_local.y,
            moon_world.z,
        )
    }

    fn roster_text(&self, fps: f64) -> String {
        let mut bodies: Vec<_> = self.world.bodies().collect();
        bodies.sort_by_key(|b| b.id);

        let mut text = String::from("Scene objects:\n");
        for body in bodies {
            text.push_str(&format!("{} : {}\n", body.info.name, body.id.0));
        }
        text.push_str(&format!("FPS: {:.0}", fps));
        text
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}
