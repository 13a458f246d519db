use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Isometry3, Point3};

use crate::model::OrbitParameters;

const ELLIPSE_SEGMENTS: usize = 500;

struct PathData {
    points: Vec<Point3<f32>>,
    color: Point3<f32>,
}

/// Queues polylines to be drawn on top of the scene. Paths are cleared after
/// every render, so callers re-submit what they want each frame.
pub struct PathRenderer {
    line_renderer: LineRenderer,
    paths: Vec<PathData>,
}

impl PathRenderer {
    pub fn new() -> Self {
        PathRenderer {
            line_renderer: LineRenderer::new(),
            paths: vec![],
        }
    }

    /// Traces the whole orbit ellipse in its own plane, then moves it into
    /// place with `transform` (the orbit frame's world transform).
    pub fn draw_ellipse(
        &mut self,
        orbit: &OrbitParameters,
        transform: Isometry3<f32>,
        color: Point3<f32>,
    ) {
        let a = orbit.semi_major_axis() as f32;
        let b = orbit.semi_minor_axis as f32;
        let center_x = orbit.center_offset() as f32;

        let f = |theta: f32| {
            transform * Point3::new(center_x + a * theta.cos(), b * theta.sin(), 0.0)
        };
        let points: Vec<_> =
            path_iter_parametric(f, 0.0, std::f32::consts::TAU, ELLIPSE_SEGMENTS).collect();
        self.paths.push(PathData { points, color });
    }
}

impl Renderer for PathRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        for path in &self.paths {
            for segment in path.points.windows(2) {
                self.line_renderer.draw_line(segment[0], segment[1], path.color);
            }
        }
        self.line_renderer.render(pass, camera);
        self.paths.clear();
    }
}

/// Samples a parametric curve at evenly spaced parameter values, endpoints
/// included.
pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}
