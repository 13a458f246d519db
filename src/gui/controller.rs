use std::time::{Duration, Instant};

use kiss3d::event::{Action, Event, Key, MouseButton, WindowEvent};
use nalgebra::{Point3, Vector2};

use super::camera::FollowCamera;
use super::view::View;
use crate::math::ray::Ray;
use crate::model::{BodyID, BodyKind, World};

// Input bindings, all in one place
const KEY_CANCEL_FOLLOW: Key = Key::Escape;
const MOUSE_SELECT: MouseButton = MouseButton::Button1;

pub struct Controller {
    pointer: Vector2<f32>,
    fps_counter: FpsCounter,
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            pointer: Vector2::zeros(),
            fps_counter: FpsCounter::new(Duration::from_secs(1)),
        }
    }

    pub fn pointer(&self) -> Vector2<f32> {
        self.pointer
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::CursorPos(x, y, _) => {
                self.pointer = view.camera().pointer_ndc(x as f32, y as f32);
            }
            WindowEvent::MouseButton(MOUSE_SELECT, Action::Press, _) => {
                // Clicks on empty space or on decorations change nothing
                let picked = view
                    .camera()
                    .pick_ray(&self.pointer)
                    .and_then(|ray| nearest_followable(view.world(), &ray));
                if let Some(id) = picked {
                    view.world_mut().set_follow_target(id);
                }
            }
            WindowEvent::Key(KEY_CANCEL_FOLLOW, Action::Press, _) => {
                view.cancel_follow();
            }
            _ => {}
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.tick()
    }
}

/// Every followable body the ray passes through, nearest first. Decorative
/// nodes are skipped no matter how squarely they are hit.
pub fn cast_at_followables(world: &World, ray: &Ray) -> Vec<(BodyID, f32)> {
    let mut hits: Vec<_> = world
        .bodies()
        .filter(|body| body.info.kind == BodyKind::Followable)
        .filter_map(|body| {
            let center: Point3<f32> = nalgebra::convert(world.world_position(body.id));
            ray.intersect_sphere(&center, body.info.radius)
                .map(|t| (body.id, t))
        })
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

pub fn nearest_followable(world: &World, ray: &Ray) -> Option<BodyID> {
    cast_at_followables(world, ray).first().map(|(id, _)| *id)
}

/// The bodies the pointer is currently over, nearest first. Recomputed from
/// scratch every frame; calling this again with unchanged inputs yields the
/// same set.
pub fn hovered_bodies(world: &World, camera: &FollowCamera, pointer: &Vector2<f32>) -> Vec<BodyID> {
    match camera.pick_ray(pointer) {
        Some(ray) => cast_at_followables(world, &ray)
            .into_iter()
            .map(|(id, _)| id)
            .collect(),
        None => Vec::new(),
    }
}

/// Averages the frame rate over a fixed measurement window, reporting the
/// value from the last completed window.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    window: Duration,
    current: f64,
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        FpsCounter {
            window_start: Instant::now(),
            frames: 0,
            window,
            current: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn tick(&mut self) {
        self.frames += 1;

        let elapsed = self.window_start.elapsed();
        if elapsed >= self.window && elapsed > Duration::ZERO {
            self.current = f64::from(self.frames) / elapsed.as_secs_f64();
            self.window_start = Instant::now();
            self.frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_counter_reports_after_a_window() {
        let mut counter = FpsCounter::new(Duration::ZERO);
        assert_eq!(counter.value(), 0.0);

        // A zero-length window closes as soon as any time has passed at all
        for _ in 0..1000 {
            counter.tick();
        }
        assert!(counter.value() > 0.0);
    }
}
