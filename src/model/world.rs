use std::collections::HashMap;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use super::orbit::OrbitParameters;

// The stock scene, matching the proportions of the original diagram
const EARTH_RADIUS: f32 = 127.0;
const MOON_RADIUS: f32 = 34.0;
const MOON_APOGEE: f64 = 4054.0;
const MOON_PERIGEE: f64 = 3632.0;
const MOON_SEMI_MINOR_AXIS: f64 = 3842.0;
const MOON_INCLINATION_DEG: f64 = 5.14;
const SUN_DISTANCE: f64 = 10000.0;

pub const DEFAULT_PHASE_STEP: f64 = 1e-3;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// What a body is for, decided once at construction time. Hit-testing and
/// camera following only ever consider `Followable` bodies; reference frames
/// and other decorations stay inert no matter what shape they render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Followable,
    Decorative,
}

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub radius: f32,
    pub kind: BodyKind,
    pub color: Point3<f32>,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
}

#[derive(Debug, Clone)]
struct Node {
    body: Body,
    parent: Option<BodyID>,
    translation: Vector3<f64>,
    rotation: UnitQuaternion<f64>,
}

/// The whole mutable state of the diagram: the body tree, the moon's orbit,
/// the accumulated orbit phase, and the current camera-follow target. All of
/// it is mutated from the frame callback or the input handlers that run
/// between frames; there are no other writers.
///
/// Bodies are created once at startup and never removed, so a stored BodyID
/// can't dangle.
#[derive(Debug, Clone)]
pub struct World {
    nodes: HashMap<BodyID, Node>,
    next_id: usize,
    orbit: OrbitParameters,
    phase: f64,
    phase_step: f64,
    follow_target: Option<BodyID>,
    sun: BodyID,
    earth: BodyID,
    moon_frame: BodyID,
    moon: BodyID,
}

impl World {
    pub fn new(phase_step: f64) -> Self {
        let orbit = OrbitParameters {
            apogee: MOON_APOGEE,
            perigee: MOON_PERIGEE,
            semi_minor_axis: MOON_SEMI_MINOR_AXIS,
        };

        let mut world = World {
            nodes: HashMap::new(),
            next_id: 0,
            orbit,
            phase: 0.0,
            phase_step,
            follow_target: None,
            sun: BodyID(0),
            earth: BodyID(0),
            moon_frame: BodyID(0),
            moon: BodyID(0),
        };

        // The sun is only a light source; it has no extent of its own.
        world.sun = world.add_body(
            BodyInfo {
                name: "Sun".to_owned(),
                radius: 0.0,
                kind: BodyKind::Decorative,
                color: Point3::new(1.0, 1.0, 1.0),
            },
            None,
            Vector3::new(-SUN_DISTANCE, 0.0, 0.0),
            UnitQuaternion::identity(),
        );

        world.earth = world.add_body(
            BodyInfo {
                name: "Earth".to_owned(),
                radius: EARTH_RADIUS,
                kind: BodyKind::Followable,
                color: Point3::new(1.0, 1.0, 1.0),
            },
            None,
            Vector3::zeros(),
            UnitQuaternion::identity(),
        );

        // An invisible frame tilted by the moon's orbital inclination; the
        // moon orbits inside it, independent of its own spin.
        world.moon_frame = world.add_body(
            BodyInfo {
                name: "Moon frame".to_owned(),
                radius: 0.0,
                kind: BodyKind::Decorative,
                color: Point3::new(1.0, 1.0, 1.0),
            },
            None,
            Vector3::zeros(),
            UnitQuaternion::from_euler_angles(0.0, MOON_INCLINATION_DEG.to_radians(), 0.0),
        );

        world.moon = world.add_body(
            BodyInfo {
                name: "Moon".to_owned(),
                radius: MOON_RADIUS,
                kind: BodyKind::Followable,
                color: Point3::new(1.0, 1.0, 1.0),
            },
            Some(world.moon_frame),
            orbit.position(0.0).coords,
            UnitQuaternion::identity(),
        );

        world
    }

    pub fn add_body(
        &mut self,
        info: BodyInfo,
        parent: Option<BodyID>,
        translation: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> BodyID {
        if let Some(parent) = parent {
            assert!(self.nodes.contains_key(&parent), "unknown parent body");
        }

        let id = BodyID(self.next_id);
        self.next_id += 1;

        let node = Node {
            body: Body { id, info },
            parent,
            translation,
            rotation,
        };
        self.nodes.insert(id, node);
        id
    }

    /// Advances the orbit phase by one step and recomputes the moon's local
    /// position from it. This is the only place the moon's translation is
    /// ever written.
    pub fn step(&mut self) {
        self.phase += self.phase_step;
        let position = self.orbit.position(self.phase);
        self.nodes.get_mut(&self.moon).unwrap().translation = position.coords;
    }

    fn local_isometry(&self, id: BodyID) -> Isometry3<f64> {
        let node = &self.nodes[&id];
        Isometry3::from_parts(Translation3::from(node.translation), node.rotation)
    }

    /// Composes transforms from the root down to this node. Resolved on
    /// demand from the tree, so it can never go stale.
    pub fn world_transform(&self, id: BodyID) -> Isometry3<f64> {
        match self.nodes[&id].parent {
            None => self.local_isometry(id),
            Some(parent) => self.world_transform(parent) * self.local_isometry(id),
        }
    }

    pub fn world_position(&self, id: BodyID) -> Point3<f64> {
        self.world_transform(id) * Point3::origin()
    }

    pub fn local_position(&self, id: BodyID) -> Point3<f64> {
        Point3::from(self.nodes[&id].translation)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.nodes.values().map(|node| &node.body)
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.nodes[&id].body
    }

    pub fn follow_target(&self) -> Option<BodyID> {
        self.follow_target
    }

    /// Sets the follow target. Requests for bodies not tagged `Followable`
    /// are ignored; there is no way to follow a decoration.
    pub fn set_follow_target(&mut self, id: BodyID) {
        if self.nodes[&id].body.info.kind == BodyKind::Followable {
            self.follow_target = Some(id);
        }
    }

    pub fn clear_follow_target(&mut self) {
        self.follow_target = None;
    }

    pub fn orbit(&self) -> &OrbitParameters {
        &self.orbit
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn sun(&self) -> BodyID {
        self.sun
    }

    pub fn earth(&self) -> BodyID {
        self.earth
    }

    pub fn moon_frame(&self) -> BodyID {
        self.moon_frame
    }

    pub fn moon(&self) -> BodyID {
        self.moon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_PI_2;

    fn frame_info(name: &str) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            radius: 0.0,
            kind: BodyKind::Decorative,
            color: Point3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_world_transform_composes_down_the_chain() {
        let mut world = World::new(DEFAULT_PHASE_STEP);

        let a = world.add_body(
            frame_info("A"),
            None,
            Vector3::new(1.0, 2.0, 3.0),
            UnitQuaternion::identity(),
        );
        let b = world.add_body(
            frame_info("B"),
            Some(a),
            Vector3::new(10.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, FRAC_PI_2, 0.0),
        );
        let c = world.add_body(
            frame_info("C"),
            Some(b),
            Vector3::new(0.0, 0.0, 5.0),
            UnitQuaternion::identity(),
        );

        // B's quarter-turn about y swings C's z-offset onto the x-axis
        approx::assert_relative_eq!(
            world.world_position(c),
            Point3::new(16.0, 2.0, 3.0),
            epsilon = 1e-12,
        );
    }

    #[test]
    fn test_step_only_moves_the_moon() {
        let mut world = World::new(0.25);
        let earth_before = world.local_position(world.earth());

        world.step();

        assert_eq!(world.local_position(world.earth()), earth_before);
        approx::assert_relative_eq!(
            world.local_position(world.moon()),
            world.orbit().position(0.25),
        );
    }
}
