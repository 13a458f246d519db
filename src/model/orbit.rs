use nalgebra::Point3;

/// A planar elliptical orbit, described by its extremal distances instead of
/// by eccentricity. The primary sits at a focus, so the ellipse's center is
/// offset from it along the major axis.
#[derive(Debug, Clone, Copy)]
pub struct OrbitParameters {
    pub apogee: f64,
    pub perigee: f64,
    pub semi_minor_axis: f64,
}

impl OrbitParameters {
    pub fn semi_major_axis(&self) -> f64 {
        (self.apogee + self.perigee) / 2.0
    }

    /// Offset of the ellipse's center from the primary, along the major axis.
    pub fn center_offset(&self) -> f64 {
        self.perigee - self.apogee
    }

    /// Evaluates the orbit at the given phase angle. The orbit lies in the
    /// xy plane, so z is always zero.
    ///
    /// The phase is free to grow without bound; cosine and sine keep the
    /// result periodic. A caller that accumulates phase over a very long run
    /// will see some precision degradation, which we accept rather than
    /// wrapping modulo 2pi.
    pub fn position(&self, phase: f64) -> Point3<f64> {
        Point3::new(
            self.semi_major_axis() * phase.cos() + self.center_offset(),
            self.semi_minor_axis * phase.sin(),
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn moon_orbit() -> OrbitParameters {
        OrbitParameters {
            apogee: 4054.0,
            perigee: 3632.0,
            semi_minor_axis: 3842.0,
        }
    }

    #[test]
    fn test_position_at_cardinal_phases() {
        let orbit = moon_orbit();

        // At phase zero we sit on the major axis: center offset plus the
        // semi-major axis.
        approx::assert_relative_eq!(orbit.position(0.0), Point3::new(3421.0, 0.0, 0.0));

        // A quarter turn later the x-term collapses to the center offset.
        approx::assert_relative_eq!(
            orbit.position(FRAC_PI_2),
            Point3::new(-422.0, 3842.0, 0.0),
            epsilon = 1e-9,
        );

        approx::assert_relative_eq!(
            orbit.position(PI),
            Point3::new(-4265.0, 0.0, 0.0),
            epsilon = 1e-9,
        );
    }

    #[test]
    fn test_periodicity() {
        let orbit = moon_orbit();
        for i in 0..12 {
            let phase = 0.37 * i as f64;
            approx::assert_relative_eq!(
                orbit.position(phase),
                orbit.position(phase + TAU),
                epsilon = 1e-8,
            );
        }
    }
}
