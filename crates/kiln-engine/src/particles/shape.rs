use rand::Rng;

use crate::coords::Vec3;

/// Spawn direction distribution.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum EmitterShape {
    /// Uniform over all directions.
    #[default]
    Point,
    /// Within `radius_degrees` of +Y.
    Cone { radius_degrees: f32 },
}

impl EmitterShape {
    pub const DEFAULT_CONE_RADIUS: f32 = 45.0;

    /// Cone with its half-angle clamped to `[1, 89]` degrees.
    pub fn cone(radius_degrees: f32) -> Self {
        let r = if radius_degrees.is_nan() { Self::DEFAULT_CONE_RADIUS } else { radius_degrees };
        EmitterShape::Cone {
            radius_degrees: r.clamp(1.0, 89.0),
        }
    }

    /// Unit direction for a new particle.
    pub fn direction<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        match *self {
            EmitterShape::Point => loop {
                let v = Vec3::new(
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                );
                let len_sq = v.length_squared();
                if len_sq > 1e-6 && len_sq <= 1.0 {
                    return v.normalized();
                }
            },
            EmitterShape::Cone { radius_degrees } => {
                let radians = radius_degrees.clamp(1.0, 89.0).to_radians();
                let area = radians.sin();
                let height = radians.cos();
                let area_sq = area * area;
                // Rejection-sample a disc of radius sin(r) at height cos(r).
                let (x, z) = loop {
                    let x: f32 = rng.gen_range(-area..=area);
                    let z: f32 = rng.gen_range(-area..=area);
                    if x * x + z * z <= area_sq {
                        break (x, z);
                    }
                };
                Vec3::new(x, height, z).normalized()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn cone_radius_is_clamped() {
        assert_eq!(EmitterShape::cone(0.0), EmitterShape::Cone { radius_degrees: 1.0 });
        assert_eq!(EmitterShape::cone(120.0), EmitterShape::Cone { radius_degrees: 89.0 });
    }

    #[test]
    fn cone_directions_stay_inside_cone() {
        let mut rng = StdRng::seed_from_u64(7);
        let shape = EmitterShape::cone(30.0);
        let min_y = 30.0f32.to_radians().cos();
        for _ in 0..500 {
            let d = shape.direction(&mut rng);
            assert!((d.length_squared() - 1.0).abs() < 1e-4);
            assert!(d.y >= min_y - 1e-4, "direction {d:?} escapes the cone");
        }
    }

    #[test]
    fn point_directions_are_unit() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let d = EmitterShape::Point.direction(&mut rng);
            assert!((d.length_squared() - 1.0).abs() < 1e-4);
        }
    }
}
