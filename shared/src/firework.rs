use itertools::Itertools;
use std::f64::consts::TAU;

use crate::{
    AudioSink, Canvas, Color, Dice, Particle, ParticleConfig, Pattern, Point, Variant,
};

/// Recent positions kept for the ascent trail.
pub const FIREWORK_TRAIL: usize = 5;

/// Smallest ascent step, so the approach to the apex always terminates.
const MIN_ASCENT_STEP: f64 = 0.5;

const RANDOM_HUES: [f64; 8] = [0.0, 30.0, 60.0, 120.0, 180.0, 240.0, 300.0, 330.0];

const RING_COUNT: usize = 3;
const RING_SPACING: f64 = 30.0;
const CRACKLE_SPREAD: f64 = 40.0;
const CRACKLE_SPARKS: usize = 20;
const CROSSETTE_TRAVEL: f64 = 20.0;
const CROSSETTE_SPARKS: usize = 15;

/// `base × size`, rounded to a whole particle count.
fn scaled(base: usize, size: f64) -> usize {
    (base as f64 * size).round().max(0.0) as usize
}

/// Construction parameters for a [`Firework`].
#[derive(Debug, Clone, Default)]
pub struct FireworkConfig {
    pub x: f64,
    pub start_y: f64,
    pub target_y: f64,
    pub color: Option<Color>,
    pub pattern: Option<Pattern>,
    pub size: Option<f64>,
}

/// The kind of a deferred secondary burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    /// Twenty sparkles at a cluster point.
    Crackle,
    /// Fifteen sparks where a crossette star split.
    Crossette,
}

/// A batch of particles scheduled to appear after the explosion.
#[derive(Debug, Clone)]
pub struct PendingBurst {
    pub at_ms: f64,
    pub position: Point,
    pub hue: f64,
    pub kind: BurstKind,
}

/// A shell that rises to its apex and detonates into one of the six [`Pattern`]s.
#[derive(Debug, Clone)]
pub struct Firework {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub start_y: f64,
    pub target_y: f64,
    pub speed: f64,
    pub color: Color,
    pub pattern: Pattern,
    pub size: f64,
    exploded: bool,
    whooshed: bool,
    trail: Vec<Point>,
    particles: Vec<Particle>,
    pending: Vec<PendingBurst>,
}

impl Firework {
    pub fn new(id: u64, config: FireworkConfig, dice: &mut Dice) -> Firework {
        let speed = dice.range(4.0, 7.0);
        let color = config
            .color
            .unwrap_or_else(|| Color::hsl(*dice.pick(&RANDOM_HUES), 100.0, 70.0));
        let pattern = config.pattern.unwrap_or_else(|| Pattern::random(dice));

        Firework {
            id,
            x: config.x,
            y: config.start_y,
            start_y: config.start_y,
            target_y: config.target_y,
            speed,
            color,
            pattern,
            size: config.size.unwrap_or(1.0),
            exploded: false,
            whooshed: false,
            trail: Vec::with_capacity(FIREWORK_TRAIL + 1),
            particles: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Advances the shell by one tick at time `now_ms`.
    ///
    /// Ascends (or explodes), then injects every due pending burst, culls dead particles and updates the rest.
    pub fn update<A: AudioSink + ?Sized>(&mut self, now_ms: f64, dice: &mut Dice, audio: &A) {
        if !self.exploded {
            if !self.whooshed {
                audio.whoosh(1.0, 0.2 * self.size);
                self.whooshed = true;
            }

            self.trail.push((self.x, self.y));
            if self.trail.len() > FIREWORK_TRAIL {
                self.trail.remove(0);
            }

            if self.y > self.target_y {
                let remaining = self.target_y - self.y;
                let step = self
                    .speed
                    .min((remaining.abs() * 0.1).max(MIN_ASCENT_STEP));
                self.y = (self.y - step).max(self.target_y);
            }

            if self.y <= self.target_y {
                self.explode(now_ms, dice, audio);
            }
        }

        self.inject_due(now_ms, dice, audio);

        self.particles.retain(|particle| !particle.is_dead());
        for particle in self.particles.iter_mut() {
            particle.update();
        }
    }

    fn explode<A: AudioSink + ?Sized>(&mut self, now_ms: f64, dice: &mut Dice, audio: &A) {
        self.exploded = true;
        audio.bang(self.size, 0.3 * self.size);

        log::debug!(
            "firework {} exploded as {} at ({:.0}, {:.0})",
            self.id,
            self.pattern,
            self.x,
            self.y
        );

        match self.pattern {
            Pattern::Peony => self.create_peony(dice),
            Pattern::Willow => self.create_willow(dice),
            Pattern::Ring => self.create_ring(dice),
            Pattern::Crackle => self.create_crackle(now_ms, dice),
            Pattern::Palm => self.create_palm(dice),
            Pattern::Crossette => self.create_crossette(now_ms, dice),
        }
    }

    fn center(&self) -> Point {
        (self.x, self.y)
    }

    fn create_peony(&mut self, dice: &mut Dice) {
        let hue = self.color.hue;

        for _ in 0..scaled(150, self.size) {
            let color = Color::hsl(hue + dice.range(0.0, 30.0), 100.0, dice.range(70.0, 100.0));
            let config = ParticleConfig::new(self.center(), color, Variant::Default);
            self.particles.push(Particle::new(config, dice));
        }
    }

    fn create_willow(&mut self, dice: &mut Dice) {
        let hue = self.color.hue;

        for _ in 0..scaled(80, self.size) {
            let color = Color::hsl(hue, 100.0, dice.range(60.0, 80.0));
            let config = ParticleConfig::new(self.center(), color, Variant::Willow)
                .gravity(0.02)
                .decay(0.005);
            self.particles.push(Particle::new(config, dice));
        }
    }

    fn create_ring(&mut self, dice: &mut Dice) {
        let hue = self.color.hue;
        let per_ring = scaled(60, self.size);

        for (ring, i) in (0..RING_COUNT).cartesian_product(0..per_ring) {
            let angle = i as f64 / per_ring as f64 * TAU;
            let radius = (ring + 1) as f64 * RING_SPACING;
            let position = (
                self.x + angle.cos() * radius,
                self.y + angle.sin() * radius,
            );
            let color = Color::hsl(hue + ring as f64 * 60.0, 100.0, 70.0);
            let config = ParticleConfig::new(position, color, Variant::Ring).gravity(0.0);
            self.particles.push(Particle::new(config, dice));
        }
    }

    fn create_crackle(&mut self, now_ms: f64, dice: &mut Dice) {
        for _ in 0..scaled(8, self.size) {
            let angle = dice.angle();
            let distance = dice.range(0.0, CRACKLE_SPREAD);

            self.pending.push(PendingBurst {
                at_ms: now_ms + dice.range(100.0, 300.0),
                position: (
                    self.x + angle.cos() * distance,
                    self.y + angle.sin() * distance,
                ),
                hue: self.color.hue,
                kind: BurstKind::Crackle,
            });
        }
    }

    fn create_palm(&mut self, dice: &mut Dice) {
        let hue = self.color.hue;

        for _ in 0..scaled(5, self.size) * 30 {
            let color = Color::hsl(hue, 100.0, dice.range(50.0, 70.0));
            let config = ParticleConfig::new(self.center(), color, Variant::Willow)
                .gravity(0.01)
                .decay(0.003);
            self.particles.push(Particle::new(config, dice));
        }
    }

    fn create_crossette(&mut self, now_ms: f64, dice: &mut Dice) {
        for _ in 0..scaled(12, self.size) {
            let angle = dice.angle();
            let speed = dice.range(2.0, 6.0);
            let (vx, vy) = (angle.cos() * speed, angle.sin() * speed);

            self.pending.push(PendingBurst {
                at_ms: now_ms + dice.range(300.0, 500.0),
                position: (
                    self.x + vx * CROSSETTE_TRAVEL,
                    self.y + vy * CROSSETTE_TRAVEL,
                ),
                hue: self.color.hue,
                kind: BurstKind::Crossette,
            });
        }
    }

    /// Moves every pending burst due at `now_ms` into the live particle set.
    fn inject_due<A: AudioSink + ?Sized>(&mut self, now_ms: f64, dice: &mut Dice, audio: &A) {
        if self.pending.is_empty() {
            return;
        }

        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|burst| burst.at_ms <= now_ms);
        self.pending = pending;

        for burst in due {
            match burst.kind {
                BurstKind::Crackle => {
                    for _ in 0..CRACKLE_SPARKS {
                        let color = Color::hsl(burst.hue, 100.0, dice.range(70.0, 100.0));
                        let config = ParticleConfig::new(burst.position, color, Variant::Sparkle)
                            .size(1.0);
                        self.particles.push(Particle::new(config, dice));
                    }
                    audio.sparkle();
                }
                BurstKind::Crossette => {
                    let color = Color::hsl(burst.hue + 60.0, 100.0, 70.0);
                    for _ in 0..CROSSETTE_SPARKS {
                        let config = ParticleConfig::new(burst.position, color, Variant::Default)
                            .size(0.8);
                        self.particles.push(Particle::new(config, dice));
                    }
                    audio.bang(1.5, 0.1);
                }
            }

            log::trace!(
                "firework {} injected a {:?} burst at {:.0}ms",
                self.id,
                burst.kind,
                burst.at_ms
            );
        }
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        if !self.exploded {
            let len = self.trail.len() as f64;

            for (i, point) in self.trail.iter().enumerate() {
                let alpha = i as f64 / len;
                canvas.fill_circle(*point, 2.0 * alpha, &self.color.with_alpha(alpha * 0.5))?;
            }

            canvas.fill_circle(self.center(), 3.0 * self.size, &self.color)?;
            canvas.fill_radial_gradient(
                self.center(),
                8.0 * self.size,
                &self.color.with_alpha(0.8),
                &Color::TRANSPARENT,
            )?;
        }

        for particle in self.particles.iter() {
            particle.draw(canvas)?;
        }

        Ok(())
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pending(&self) -> &[PendingBurst] {
        &self.pending
    }

    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    /// Dead once exploded with no live particles and nothing left to inject.
    pub fn is_dead(&self) -> bool {
        self.exploded && self.particles.is_empty() && self.pending.is_empty()
    }
}
