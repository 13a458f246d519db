mod orbit;
mod world;

pub use orbit::OrbitParameters;
pub use world::{Body, BodyID, BodyInfo, BodyKind, World, DEFAULT_PHASE_STEP};
