use crate::config::{ConfigError, ParamDictionary, parse_colour, parse_vec2, parse_vec3};
use crate::coords::{ColorRgba, Vec2, Vec3};

use super::Particle;

/// Per-frame modifier applied to every live particle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Affector {
    /// Constant acceleration, e.g. gravity or wind.
    LinearForce { force: Vec3 },
    /// Colour moves from `from` at birth to `to` at death.
    ColourFade { from: ColorRgba, to: ColorRgba },
    /// Scale moves from `from` at birth to `to` at death.
    ScaleOverLife { from: Vec2, to: Vec2 },
}

impl Affector {
    pub fn apply(&self, particle: &mut Particle, dt: f32) {
        let age = 1.0 - particle.energy.clamp(0.0, 1.0);
        match *self {
            Affector::LinearForce { force } => {
                particle.velocity += force * dt;
            }
            Affector::ColourFade { from, to } => {
                particle.colour = from.lerp(to, age);
            }
            Affector::ScaleOverLife { from, to } => {
                particle.scale = from + (to - from) * age;
            }
        }
    }

    /// Builds from a dictionary whose `Type` names the affector.
    ///
    /// `LinearForce` reads `Force`; `ColourFade` reads `FromColour`/`ToColour`;
    /// `ScaleOverLife` reads `FromScale`/`ToScale`.
    pub fn from_params(params: &ParamDictionary) -> Result<Self, ConfigError> {
        let kind = params
            .get("Type")
            .ok_or_else(|| ConfigError::Missing("Type".into()))?;
        match kind {
            "LinearForce" => Ok(Affector::LinearForce {
                force: params.require("Force", parse_vec3)?,
            }),
            "ColourFade" => Ok(Affector::ColourFade {
                from: params.try_parse("FromColour", parse_colour)?.unwrap_or_default(),
                to: params.require("ToColour", parse_colour)?,
            }),
            "ScaleOverLife" => Ok(Affector::ScaleOverLife {
                from: params.try_parse("FromScale", parse_vec2)?.unwrap_or(Vec2::one()),
                to: params.require("ToScale", parse_vec2)?,
            }),
            other => Err(ConfigError::UnknownVariant {
                key: "Type".into(),
                value: other.to_string(),
            }),
        }
    }
}
