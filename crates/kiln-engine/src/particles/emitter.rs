use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{
    ConfigError, ParamDictionary, parse_bool, parse_colour, parse_f32, parse_finite_f32, parse_u32, parse_vec2,
    parse_vec3,
};
use crate::coords::{ColorRgba, Vec2, Vec3};

use super::{Affector, EmitterShape, Particle};

/// Static description of an emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterSettings {
    pub max_particles: u32,
    pub particles_per_emission: u32,
    /// Seconds between emissions.
    pub emission_frequency: f32,
    /// Seconds a particle lives.
    pub lifetime: f32,
    pub initial_speed: f32,
    pub min_initial_speed: f32,
    pub initial_colour: ColorRgba,
    pub initial_scale: Vec2,
    pub looping: bool,
    pub origin: Vec3,
    pub shape: EmitterShape,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            max_particles: 100,
            particles_per_emission: 10,
            emission_frequency: 0.5,
            lifetime: 1.0,
            initial_speed: 1.0,
            min_initial_speed: 1.0,
            initial_colour: ColorRgba::white(),
            initial_scale: Vec2::one(),
            looping: true,
            origin: Vec3::zero(),
            shape: EmitterShape::Point,
        }
    }
}

impl EmitterSettings {
    /// Reads `MaxParticles`, `ParticlesPerEmission`, `EmissionFreq`,
    /// `Lifetime`, `Velocity`, `MinVelocity`, `InitialColour`,
    /// `InitialScale`, `Looping`, `Origin`, `Shape` (`Point`|`Cone`) and
    /// `Radius` (cone half-angle in degrees). Absent keys keep defaults.
    pub fn from_params(params: &ParamDictionary) -> Result<Self, ConfigError> {
        let mut s = Self::default();

        if let Some(v) = params.try_parse("MaxParticles", parse_u32)? {
            s.max_particles = v;
        }
        if let Some(v) = params.try_parse("ParticlesPerEmission", parse_u32)? {
            s.particles_per_emission = v;
        }
        if let Some(v) = params.try_parse("EmissionFreq", parse_f32)? {
            s.emission_frequency = v;
        }
        if let Some(v) = params.try_parse("Lifetime", parse_f32)? {
            s.lifetime = v;
        }
        if let Some(v) = params.try_parse("Velocity", parse_finite_f32)? {
            s.initial_speed = v;
            s.min_initial_speed = v;
        }
        if let Some(v) = params.try_parse("MinVelocity", parse_finite_f32)? {
            s.min_initial_speed = v;
        }
        if let Some(v) = params.try_parse("InitialColour", parse_colour)? {
            s.initial_colour = v;
        }
        if let Some(v) = params.try_parse("InitialScale", parse_vec2)? {
            s.initial_scale = v;
        }
        if let Some(v) = params.try_parse("Looping", parse_bool)? {
            s.looping = v;
        }
        if let Some(v) = params.try_parse("Origin", parse_vec3)? {
            s.origin = v;
        }

        let radius = params
            .try_parse("Radius", parse_f32)?
            .unwrap_or(EmitterShape::DEFAULT_CONE_RADIUS);
        s.shape = match params.get("Shape").unwrap_or("Point") {
            "Point" => EmitterShape::Point,
            "Cone" => EmitterShape::cone(radius),
            other => {
                return Err(ConfigError::UnknownVariant {
                    key: "Shape".into(),
                    value: other.to_string(),
                });
            }
        };

        Ok(s)
    }
}

/// Fixed-pool particle emitter.
#[derive(Debug)]
pub struct ParticleEmitter {
    settings: EmitterSettings,
    pool: Vec<Particle>,
    affectors: Vec<Affector>,
    emitting: bool,
    time_since_emission: f32,
    rng: StdRng,
}

impl ParticleEmitter {
    pub fn new(settings: EmitterSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic emitter for reproducible effects and tests.
    pub fn with_seed(settings: EmitterSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: EmitterSettings, rng: StdRng) -> Self {
        let pool = vec![Particle::default(); settings.max_particles as usize];
        Self {
            // Emit on the first update.
            time_since_emission: settings.emission_frequency,
            settings,
            pool,
            affectors: Vec::new(),
            emitting: true,
            rng,
        }
    }

    pub fn from_params(params: &ParamDictionary) -> Result<Self, ConfigError> {
        Ok(Self::new(EmitterSettings::from_params(params)?))
    }

    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.settings.origin = origin;
    }

    pub fn add_affector(&mut self, affector: Affector) {
        self.affectors.push(affector);
    }

    pub fn remove_affector(&mut self, affector: &Affector) {
        self.affectors.retain(|a| a != affector);
    }

    pub fn start_emitting(&mut self) {
        self.emitting = true;
        self.time_since_emission = self.settings.emission_frequency;
    }

    /// No new particles spawn; live ones play out.
    pub fn stop_emitting(&mut self) {
        self.emitting = false;
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Not emitting and no particle left alive.
    pub fn is_finished(&self) -> bool {
        !self.emitting && self.live_count() == 0
    }

    pub fn live_particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter().filter(|p| p.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live_particles().count()
    }

    /// Spawns one emission immediately, independent of the emission timer.
    pub fn emit_burst(&mut self) {
        let mut budget = self.settings.particles_per_emission;
        for i in 0..self.pool.len() {
            if budget == 0 {
                break;
            }
            if !self.pool[i].is_alive() {
                let particle = self.spawn();
                self.pool[i] = particle;
                budget -= 1;
            }
        }
        if budget > 0 {
            log::trace!("particle pool exhausted; {budget} particles not emitted");
        }
    }

    fn spawn(&mut self) -> Particle {
        let s = &self.settings;
        let (lo, hi) = if s.min_initial_speed < s.initial_speed {
            (s.min_initial_speed, s.initial_speed)
        } else {
            (s.initial_speed, s.initial_speed)
        };
        // `gen_range` panics on a range whose width overflows.
        let speed = if lo < hi && (hi - lo).is_finite() {
            self.rng.gen_range(lo..=hi)
        } else {
            hi
        };
        let direction = s.shape.direction(&mut self.rng);

        Particle {
            translation: s.origin,
            colour: s.initial_colour,
            velocity: direction * speed,
            scale: s.initial_scale,
            energy: 1.0,
            angular_rotation: 0.0,
        }
    }

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }

        if self.emitting {
            self.time_since_emission += dt;
            if self.time_since_emission >= self.settings.emission_frequency {
                self.time_since_emission = 0.0;
                self.emit_burst();
                if !self.settings.looping {
                    self.emitting = false;
                }
            }
        }

        let energy_loss = if self.settings.lifetime > 0.0 {
            1.0 / self.settings.lifetime
        } else {
            f32::INFINITY
        };

        for p in self.pool.iter_mut().filter(|p| p.is_alive()) {
            p.energy = (p.energy - energy_loss * dt).max(0.0);
            if !p.is_alive() {
                continue;
            }
            p.translation += p.velocity * dt;
            for a in &self.affectors {
                a.apply(p, dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmitterSettings {
        EmitterSettings {
            max_particles: 8,
            particles_per_emission: 3,
            emission_frequency: 0.1,
            lifetime: 1.0,
            ..EmitterSettings::default()
        }
    }

    // ── emission ──────────────────────────────────────────────────────────

    #[test]
    fn first_update_emits() {
        let mut e = ParticleEmitter::with_seed(settings(), 1);
        e.update(0.016);
        assert_eq!(e.live_count(), 3);
    }

    #[test]
    fn pool_caps_live_particles() {
        let mut e = ParticleEmitter::with_seed(settings(), 1);
        for _ in 0..20 {
            e.emit_burst();
        }
        assert_eq!(e.live_count(), 8);
    }

    #[test]
    fn spawned_speed_within_range() {
        let s = EmitterSettings {
            initial_speed: 5.0,
            min_initial_speed: 2.0,
            ..settings()
        };
        let mut e = ParticleEmitter::with_seed(s, 3);
        e.emit_burst();
        for p in e.live_particles() {
            let speed = p.velocity.length_squared().sqrt();
            assert!((2.0 - 1e-3..=5.0 + 1e-3).contains(&speed), "speed {speed}");
        }
    }

    // ── lifetime ──────────────────────────────────────────────────────────

    #[test]
    fn energy_never_negative() {
        let mut e = ParticleEmitter::with_seed(settings(), 2);
        e.emit_burst();
        e.stop_emitting();
        for _ in 0..10 {
            e.update(0.37);
            assert!(e.pool.iter().all(|p| p.energy >= 0.0));
        }
        assert_eq!(e.live_count(), 0);
    }

    #[test]
    fn non_looping_emitter_finishes() {
        let s = EmitterSettings { looping: false, ..settings() };
        let mut e = ParticleEmitter::with_seed(s, 4);

        e.update(0.05);
        assert!(!e.is_emitting());
        assert!(!e.is_finished());

        for _ in 0..30 {
            e.update(0.05);
        }
        assert!(e.is_finished());
    }

    #[test]
    fn looping_emitter_keeps_emitting() {
        let mut e = ParticleEmitter::with_seed(settings(), 5);
        for _ in 0..50 {
            e.update(0.05);
        }
        assert!(e.is_emitting());
        assert!(e.live_count() > 0);
    }

    #[test]
    fn affectors_run_on_live_particles() {
        let mut e = ParticleEmitter::with_seed(EmitterSettings { initial_speed: 0.0, min_initial_speed: 0.0, ..settings() }, 6);
        e.add_affector(Affector::LinearForce { force: Vec3::new(0.0, -10.0, 0.0) });
        e.emit_burst();
        e.stop_emitting();
        e.update(0.1);
        for p in e.live_particles() {
            assert!(p.velocity.y < 0.0);
        }
    }

    // ── params ────────────────────────────────────────────────────────────

    #[test]
    fn settings_from_params() {
        let params = ParamDictionary::new()
            .with("MaxParticles", "50")
            .with("Lifetime", "2.5")
            .with("Looping", "false")
            .with("Shape", "Cone")
            .with("Radius", "120");
        let s = EmitterSettings::from_params(&params).unwrap();
        assert_eq!(s.max_particles, 50);
        assert_eq!(s.lifetime, 2.5);
        assert!(!s.looping);
        assert_eq!(s.shape, EmitterShape::Cone { radius_degrees: 89.0 });
    }

    #[test]
    fn non_finite_speeds_are_rejected() {
        for key in ["Velocity", "MinVelocity"] {
            let params = ParamDictionary::new().with(key, "inf");
            assert!(EmitterSettings::from_params(&params).is_err(), "{key}");
        }
    }

    #[test]
    fn unbounded_speed_range_does_not_panic() {
        let s = EmitterSettings {
            initial_speed: f32::INFINITY,
            min_initial_speed: 1.0,
            ..settings()
        };
        let mut e = ParticleEmitter::with_seed(s, 7);
        e.emit_burst();
        assert_eq!(e.live_count(), 3);
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let params = ParamDictionary::new().with("Shape", "Torus");
        assert!(EmitterSettings::from_params(&params).is_err());
    }
}
