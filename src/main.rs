use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use nalgebra::Point3;

use lunar_orrery::gui::Simulation;
use lunar_orrery::model::{World, DEFAULT_PHASE_STEP};

/// Animated sun/earth/moon diagram. Hover a body to highlight it, click it
/// to make the camera follow it, press Escape to jump back out.
#[derive(Debug, Parser)]
struct Args {
    /// Orbit phase advance per frame, in radians
    #[arg(long, default_value_t = DEFAULT_PHASE_STEP)]
    phase_step: f64,
    /// Cap on frames per second
    #[arg(long, default_value_t = 60)]
    framerate_limit: u64,
    /// Window title
    #[arg(long, default_value = "Earth-Moon Orrery")]
    title: String,
}

fn main() {
    let args = Args::parse();

    let world = World::new(args.phase_step);
    let sunlight: Point3<f32> = nalgebra::convert(world.world_position(world.sun()));

    let mut window = Window::new(&args.title);
    window.set_light(Light::Absolute(sunlight));
    window.set_framerate_limit(Some(args.framerate_limit));

    let simulation = Simulation::new(world, &mut window);
    window.render_loop(simulation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_accept_overrides() {
        let args = Args::try_parse_from([
            "lunar-orrery",
            "--phase-step",
            "0.01",
            "--title",
            "Moonwatch",
        ])
        .unwrap();
        assert_eq!(args.phase_step, 0.01);
        assert_eq!(args.title, "Moonwatch");
        assert_eq!(args.framerate_limit, 60);
    }
}
