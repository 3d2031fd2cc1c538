use crate::coords::{ColorRgba, Vec2, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub translation: Vec3,
    pub colour: ColorRgba,
    pub velocity: Vec3,
    pub scale: Vec2,
    /// 1 at birth, 0 at death. Never negative.
    pub energy: f32,
    pub angular_rotation: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            translation: Vec3::zero(),
            colour: ColorRgba::white(),
            velocity: Vec3::zero(),
            scale: Vec2::one(),
            energy: 0.0,
            angular_rotation: 0.0,
        }
    }
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }
}
