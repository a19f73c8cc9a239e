use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// 8-bit sRGB color as authored in the palette. Serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (leading `#` optional).
    pub fn from_hex(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::new(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }

    /// Channels normalized to `[0, 1]`.
    pub fn to_f32_array(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::from_hex(&raw).ok_or_else(|| format!("invalid color '{raw}', expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

pub const EMERALD: Rgb = Rgb::new(0x00, 0x42, 0x25);
pub const LIGHT_GREEN: Rgb = Rgb::new(0x2E, 0x8B, 0x57);
pub const GOLD: Rgb = Rgb::new(0xFF, 0xD7, 0x00);
pub const DEEP_GOLD: Rgb = Rgb::new(0xB8, 0x86, 0x0B);

/// Palette in a stable order, handy for per-color material caches.
pub const PALETTE: [Rgb; 4] = [EMERALD, LIGHT_GREEN, GOLD, DEEP_GOLD];

const INNER_PROBABILITY: f64 = 0.6;
const EMERALD_PROBABILITY: f64 = 0.5;
const GOLD_PROBABILITY: f64 = 0.7;

// Cone spans y in [-3, 2.5].
const CONE_BASE_Y: f32 = -3.0;
const CONE_HEIGHT: f32 = 5.5;
const CONE_APEX_Y: f32 = 2.5;
const CONE_TAPER: f32 = 0.45;
const RADIUS_JITTER: f32 = 0.25;
const SPIRAL_TURNS: f32 = 50.0 * PI;
const ANGLE_JITTER: f32 = 0.5;

const SHELL_MIN_RADIUS: f32 = 4.0;
const SHELL_MAX_RADIUS: f32 = 8.0;

/// One particle: both target positions plus its static look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub scattered_position: Vec3,
    pub formed_position: Vec3,
    pub color: Rgb,
    pub base_scale: f32,
    pub speed: f32,
    pub phase: f32,
}

impl Particle {
    pub fn is_inner(&self) -> bool {
        self.color == EMERALD || self.color == LIGHT_GREEN
    }
}

/// Immutable particle set, generated once.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Generates `count` particles from the thread RNG.
    pub fn generate(count: usize) -> Self {
        Self::generate_with(count, &mut rand::thread_rng())
    }

    /// Same layout for the same `seed`.
    pub fn generate_seeded(count: usize, seed: u64) -> Self {
        Self::generate_with(count, &mut StdRng::seed_from_u64(seed))
    }

    pub fn generate_with<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|index| generate_particle(index, count, rng))
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

fn generate_particle<R: Rng + ?Sized>(index: usize, count: usize, rng: &mut R) -> Particle {
    let formed_position = formed_position(index, count, rng);
    let scattered_position = scattered_position(rng);
    let color = pick_color(rng);

    Particle {
        scattered_position,
        formed_position,
        color,
        base_scale: rng.gen_range(0.03..0.15),
        speed: rng.gen_range(0.1..0.3),
        phase: rng.gen_range(0.0..TAU),
    }
}

/// Dense helix wound around a cone.
fn formed_position<R: Rng + ?Sized>(index: usize, count: usize, rng: &mut R) -> Vec3 {
    let t = index as f32 / count.max(1) as f32;
    let y = CONE_BASE_Y + t * CONE_HEIGHT;
    let base_radius = (CONE_APEX_Y - y) * CONE_TAPER;
    let radius = base_radius + rng.gen_range(-RADIUS_JITTER..RADIUS_JITTER);
    let angle = t * SPIRAL_TURNS + rng.gen_range(0.0..ANGLE_JITTER);

    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Uniform direction by inverse transform sampling, uniform radius in the shell.
fn scattered_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let u: f32 = rng.r#gen();
    let v: f32 = rng.r#gen();
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let distance = rng.gen_range(SHELL_MIN_RADIUS..SHELL_MAX_RADIUS);

    Vec3::new(
        distance * phi.sin() * theta.cos(),
        distance * phi.sin() * theta.sin(),
        distance * phi.cos(),
    )
}

fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    if rng.gen_bool(INNER_PROBABILITY) {
        if rng.gen_bool(EMERALD_PROBABILITY) {
            EMERALD
        } else {
            LIGHT_GREEN
        }
    } else if rng.gen_bool(GOLD_PROBABILITY) {
        GOLD
    } else {
        DEEP_GOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNT: usize = 2000;

    #[test]
    fn generates_requested_count() {
        assert_eq!(ParticleField::generate(COUNT).len(), COUNT);
        assert!(ParticleField::generate(0).is_empty());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = ParticleField::generate_seeded(64, 7);
        let b = ParticleField::generate_seeded(64, 7);
        let c = ParticleField::generate_seeded(64, 8);
        assert_eq!(a.particles(), b.particles());
        assert_ne!(a.particles(), c.particles());
    }

    #[test]
    fn formed_positions_follow_the_cone() {
        let field = ParticleField::generate_seeded(COUNT, 1);
        for (index, particle) in field.iter().enumerate() {
            let t = index as f32 / COUNT as f32;
            let expected_y = -3.0 + t * 5.5;
            assert!((particle.formed_position.y - expected_y).abs() < 1e-4);

            let planar = Vec3::new(particle.formed_position.x, 0.0, particle.formed_position.z)
                .length();
            let base_radius = (2.5 - expected_y) * 0.45;
            assert!(
                (planar - base_radius).abs() <= 0.25 + 1e-4,
                "index {index}: radius {planar} vs base {base_radius}"
            );
        }
    }

    #[test]
    fn scattered_positions_lie_in_the_shell() {
        let field = ParticleField::generate_seeded(COUNT, 2);
        for particle in field.iter() {
            let distance = particle.scattered_position.length();
            assert!((4.0 - 1e-4..8.0 + 1e-4).contains(&distance), "{distance}");
        }
    }

    #[test]
    fn static_attributes_stay_in_range() {
        let field = ParticleField::generate_seeded(COUNT, 3);
        for particle in field.iter() {
            assert!((0.03..0.15).contains(&particle.base_scale));
            assert!((0.1..0.3).contains(&particle.speed));
            assert!((0.0..TAU).contains(&particle.phase));
            assert!(PALETTE.contains(&particle.color));
        }
    }

    #[test]
    fn color_split_matches_palette_weights() {
        let field = ParticleField::generate_seeded(COUNT, 4);
        let inner: Vec<&Particle> = field.iter().filter(|p| p.is_inner()).collect();
        let inner_ratio = inner.len() as f32 / COUNT as f32;
        assert!((inner_ratio - 0.6).abs() < 0.05, "inner ratio {inner_ratio}");

        let emerald = inner.iter().filter(|p| p.color == EMERALD).count();
        let emerald_ratio = emerald as f32 / inner.len() as f32;
        assert!((emerald_ratio - 0.5).abs() < 0.06, "emerald ratio {emerald_ratio}");

        let outer = COUNT - inner.len();
        let gold = field.iter().filter(|p| p.color == GOLD).count();
        let gold_ratio = gold as f32 / outer as f32;
        assert!((gold_ratio - 0.7).abs() < 0.07, "gold ratio {gold_ratio}");
    }

    #[test]
    fn hex_parsing_and_display_agree() {
        let gold = Rgb::from_hex("#FFD700").unwrap();
        assert_eq!(gold, GOLD);
        assert_eq!(gold.to_string(), "#FFD700");
        assert_eq!(Rgb::from_hex("2E8B57"), Some(LIGHT_GREEN));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn hex_parsing_rejects_signs_and_repeated_hashes() {
        assert_eq!(Rgb::from_hex("#+FFFFF"), None);
        assert_eq!(Rgb::from_hex("-FFFFF"), None);
        assert_eq!(Rgb::from_hex("###FFD700"), None);
        assert_eq!(Rgb::from_hex("##FFD70"), None);
        assert_eq!(Rgb::from_hex(" #FFD700 "), Some(GOLD));
    }

    #[test]
    fn colors_serialize_as_hex_strings() {
        let encoded = serde_yaml::to_string(&DEEP_GOLD).unwrap();
        assert!(encoded.contains("#B8860B"), "{encoded}");
        assert_eq!(serde_yaml::from_str::<Rgb>(&encoded).unwrap(), DEEP_GOLD);
        let decoded: Rgb = serde_yaml::from_str("'#004225'").unwrap();
        assert_eq!(decoded, EMERALD);
        assert!(serde_yaml::from_str::<Rgb>("not-a-color").is_err());
    }
}
