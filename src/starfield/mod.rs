//! Decorative starfield animation.
//!
//! The field owns all of its state (no module globals): a fixed, recycled
//! population of ambient stars and a self-limiting population of shooting
//! stars. It runs independently of the page pipeline and keeps animating
//! whether or not the configuration ever loads.

pub mod paint;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed palette: white, pink, ice blue, rose.
pub const PALETTE: [[u8; 3]; 4] = [
    [0xFF, 0xFF, 0xFF],
    [0xFF, 0xCC, 0xFF],
    [0xCC, 0xFF, 0xFF],
    [0xFF, 0x99, 0xCC],
];

pub const NUM_STARS: usize = 150;
pub const SHOOTING_STAR_LIFE: u32 = 60;
const DEFAULT_SPAWN_CHANCE: f32 = 0.02;

/// Ambient star. Never destroyed: on leaving the left edge it is recycled
/// to the right edge with a fresh vertical position and arc phase.
#[derive(Debug, Clone)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub color: [u8; 3],
    /// Twinkle rate; opacity oscillates with wall-clock time.
    pub twinkle: f32,
    /// Vertical arc amplitude.
    pub arc_offset: f32,
    pub arc_phase: f32,
}

impl Star {
    /// Vertical position including the sine arc drift.
    pub fn arc_y(&self) -> f32 {
        self.y + (self.x * 0.005 + self.arc_phase).sin() * self.arc_offset
    }

    /// Twinkle opacity at wall-clock time `now` (seconds).
    pub fn alpha(&self, now: f64) -> f32 {
        ((now as f32) * self.twinkle).sin() * 0.5 + 0.5
    }
}

/// Ephemeral streak moving left and downward, removed when its life runs
/// out or it exits past the left or bottom edge.
#[derive(Debug, Clone)]
pub struct ShootingStar {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub length: f32,
    pub radius: f32,
    pub color: [u8; 3],
    pub life: u32,
}

impl ShootingStar {
    /// Opacity proportional to remaining life.
    pub fn alpha(&self) -> f32 {
        self.life as f32 / SHOOTING_STAR_LIFE as f32
    }

    /// Trail end point, opposite to the velocity.
    pub fn tail(&self) -> (f32, f32) {
        (
            self.x - self.vx * self.length / 10.0,
            self.y - self.vy * self.length / 10.0,
        )
    }
}

/// The animator: canvas-sized field with start/stop/resize lifecycle.
pub struct Starfield {
    width: f32,
    height: f32,
    stars: Vec<Star>,
    shooting: Vec<ShootingStar>,
    rng: StdRng,
    spawn_chance: f32,
    running: bool,
}

impl Starfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self::seeded(width, height, rand::thread_rng().gen())
    }

    /// Deterministic field for tests.
    pub fn seeded(width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..NUM_STARS).map(|_| random_star(&mut rng, width, height)).collect();
        Self {
            width,
            height,
            stars,
            shooting: Vec::new(),
            rng,
            spawn_chance: DEFAULT_SPAWN_CHANCE,
            running: true,
        }
    }

    /// Override the per-frame spawn probability (0 disables spawning).
    pub fn with_spawn_chance(mut self, chance: f32) -> Self {
        self.spawn_chance = chance;
        self
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop advancing; the frame callback can be dropped without leaking.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting
    }

    /// Reset to the new viewport size. Existing positions are not
    /// renormalized; out-of-bounds stars wrap naturally on later frames.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Advance one animation frame. No-op while stopped.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        for star in &mut self.stars {
            star.x -= star.speed;
            if star.x < 0.0 {
                star.x = self.width;
                star.y = self.rng.gen::<f32>() * self.height;
                star.arc_phase = self.rng.gen::<f32>() * std::f32::consts::TAU;
            }
        }

        if self.rng.gen::<f32>() < self.spawn_chance {
            self.spawn_shooting_star();
        }

        let height = self.height;
        self.shooting.retain_mut(|s| {
            s.x += s.vx;
            s.y += s.vy;
            s.life -= 1;
            s.life > 0 && s.x >= 0.0 && s.y <= height
        });
    }

    /// Spawn one shooting star at a random height in the upper third,
    /// moving left and downward within the fixed cone.
    pub fn spawn_shooting_star(&mut self) {
        use std::f32::consts::PI;
        let angle = self.rng.gen::<f32>() * PI / 4.0 + PI / 8.0;
        let speed = self.rng.gen::<f32>() * 10.0 + 10.0;
        self.shooting.push(ShootingStar {
            x: self.width,
            y: self.rng.gen::<f32>() * self.height * 0.3,
            vx: -angle.cos() * speed,
            vy: angle.sin() * speed,
            length: self.rng.gen::<f32>() * 20.0 + 10.0,
            radius: self.rng.gen::<f32>() * 2.0 + 1.0,
            color: PALETTE[self.rng.gen_range(0..PALETTE.len())],
            life: SHOOTING_STAR_LIFE,
        });
    }
}

fn random_star(rng: &mut StdRng, width: f32, height: f32) -> Star {
    Star {
        x: rng.gen::<f32>() * width,
        y: rng.gen::<f32>() * height,
        radius: rng.gen::<f32>() * 1.5 + 0.5,
        speed: rng.gen::<f32>() * 0.4 + 0.1,
        color: PALETTE[rng.gen_range(0..PALETTE.len())],
        twinkle: rng.gen::<f32>() * 0.5 + 0.5,
        arc_offset: rng.gen::<f32>() * height * 0.2,
        arc_phase: rng.gen::<f32>() * std::f32::consts::TAU,
    }
}
