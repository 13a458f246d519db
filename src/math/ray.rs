use nalgebra::{Matrix4, Point3, Unit, Vector2, Vector3};

/// A world-space ray with a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Casts a ray through a pointer position given in normalized device
    /// coordinates ([-1, 1] on both axes, y pointing up). `inv_transform` is
    /// the inverse of the camera's projection * view matrix. Returns None if
    /// the transform is degenerate.
    pub fn through_pointer(inv_transform: &Matrix4<f32>, pointer: &Vector2<f32>) -> Option<Ray> {
        let near = unproject(inv_transform, &Point3::new(pointer.x, pointer.y, -1.0))?;
        let far = unproject(inv_transform, &Point3::new(pointer.x, pointer.y, 1.0))?;
        let direction = Unit::try_new(far - near, 1.0e-9)?;
        Some(Ray {
            origin: near,
            direction,
        })
    }

    /// Returns the distance along the ray to its nearest intersection with
    /// the sphere, or None when the ray misses or the sphere lies entirely
    /// behind the origin.
    pub fn intersect_sphere(&self, center: &Point3<f32>, radius: f32) -> Option<f32> {
        // Solve |origin + t * direction - center|^2 = radius^2 for t.
        // The direction is unit length, so the quadratic is t^2 + 2bt + c.
        let offset = self.origin - center;
        let b = offset.dot(&self.direction);
        let c = offset.norm_squared() - radius * radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        // Prefer the near root; from inside the sphere only the far root is
        // ahead of us.
        let near_t = -b - discriminant.sqrt();
        let far_t = -b + discriminant.sqrt();
        let t = if near_t > 0.0 { near_t } else { far_t };
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

fn unproject(inv_transform: &Matrix4<f32>, ndc: &Point3<f32>) -> Option<Point3<f32>> {
    Point3::from_homogeneous(inv_transform * ndc.to_homogeneous())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_through_pointer_identity_transform() {
        let ray = Ray::through_pointer(&Matrix4::identity(), &Vector2::new(0.2, -0.4)).unwrap();

        approx::assert_relative_eq!(ray.origin, Point3::new(0.2, -0.4, -1.0));
        approx::assert_relative_eq!(ray.direction.into_inner(), Vector3::z());
    }

    #[test]
    fn test_sphere_direct_hit() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 10.0),
            direction: -Vector3::z_axis(),
        };

        let t = ray.intersect_sphere(&Point3::origin(), 1.0).unwrap();
        approx::assert_relative_eq!(t, 9.0);
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 10.0),
            direction: -Vector3::z_axis(),
        };

        assert!(ray.intersect_sphere(&Point3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_sphere_behind_origin() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 10.0),
            direction: -Vector3::z_axis(),
        };

        assert!(ray.intersect_sphere(&Point3::new(0.0, 0.0, 20.0), 1.0).is_none());
    }

    #[test]
    fn test_sphere_from_inside() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 10.0),
            direction: -Vector3::z_axis(),
        };

        // Starting at the center, we exit through the far side
        let t = ray.intersect_sphere(&Point3::new(0.0, 0.0, 10.0), 2.0).unwrap();
        approx::assert_relative_eq!(t, 2.0);
    }
}
