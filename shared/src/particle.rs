use std::f64::consts::FRAC_PI_2;

use crate::{Canvas, Color, Dice, LineCap, Point};

/// Number of ticks a [`Particle`] lives at most.
pub const PARTICLE_LIFE: i32 = 100;
/// Recent positions kept for the trail stroke.
pub const PARTICLE_TRAIL: usize = 3;

const DEFAULT_GRAVITY: f64 = 0.05;
const DEFAULT_FRICTION: f64 = 0.99;
const WILLOW_GRAVITY: f64 = 0.02;
const RING_SPEED: f64 = 3.0;
const RING_STEP: f64 = 0.05;

/// Motion and draw rule family of a [`Particle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Ballistic spark with a soft glow and white core.
    #[default]
    Default,
    /// Spinning four-pointed star.
    Sparkle,
    /// Slow-falling streak.
    Willow,
    /// Orbits on a circular locus instead of falling.
    Ring,
}

/// Construction parameters for a [`Particle`]. Unset fields are rolled or defaulted.
#[derive(Debug, Clone, Default)]
pub struct ParticleConfig {
    pub position: Point,
    pub color: Color,
    pub variant: Variant,
    pub size: Option<f64>,
    pub gravity: Option<f64>,
    pub decay: Option<f64>,
    pub friction: Option<f64>,
}

impl ParticleConfig {
    pub fn new(position: Point, color: Color, variant: Variant) -> ParticleConfig {
        ParticleConfig {
            position,
            color,
            variant,
            ..Default::default()
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn gravity(mut self, gravity: f64) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn decay(mut self, decay: f64) -> Self {
        self.decay = Some(decay);
        self
    }
}

/// A single point mass of an explosion.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub color: Color,
    pub size: f64,
    pub gravity: f64,
    pub friction: f64,
    pub decay: f64,
    pub life: i32,
    pub alpha: f64,
    pub variant: Variant,
    angle: f64,
    spin: f64,
    trail: Vec<Point>,
}

impl Particle {
    pub fn new(config: ParticleConfig, dice: &mut Dice) -> Particle {
        let size = config.size.unwrap_or_else(|| dice.range(1.0, 4.0));
        let decay = config.decay.unwrap_or_else(|| dice.range(0.01, 0.03));
        let angle = dice.angle();
        let spin = dice.range(-0.05, 0.05);

        let (velocity, gravity) = match config.variant {
            Variant::Willow => {
                let speed = dice.range(1.0, 3.0);
                (polar(angle, speed), WILLOW_GRAVITY)
            }
            Variant::Ring => (polar(dice.angle(), RING_SPEED), 0.0),
            Variant::Default | Variant::Sparkle => {
                let speed = dice.range(2.0, 7.0);
                (
                    polar(angle, speed),
                    config.gravity.unwrap_or(DEFAULT_GRAVITY),
                )
            }
        };

        Particle {
            position: config.position,
            velocity,
            color: config.color,
            size,
            gravity,
            friction: config.friction.unwrap_or(DEFAULT_FRICTION),
            decay,
            life: PARTICLE_LIFE,
            alpha: 1.0,
            variant: config.variant,
            angle,
            spin,
            trail: Vec::with_capacity(PARTICLE_TRAIL + 1),
        }
    }

    /// Advances the particle by one tick.
    pub fn update(&mut self) {
        self.trail.push(self.position);
        if self.trail.len() > PARTICLE_TRAIL {
            self.trail.remove(0);
        }

        self.velocity.1 += self.gravity;
        self.velocity.0 *= self.friction;
        self.velocity.1 *= self.friction;

        if self.variant == Variant::Ring {
            self.angle += RING_STEP;
            self.velocity = polar(self.angle, RING_SPEED);
        }

        self.position.0 += self.velocity.0;
        self.position.1 += self.velocity.1;
        self.life -= 1;
        self.alpha -= self.decay;

        if self.variant == Variant::Sparkle {
            self.angle += self.spin;
        }
    }

    /// Draws the particle. A dead particle draws nothing, even if it is still visible.
    pub fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        if self.is_dead() {
            return Ok(());
        }

        canvas.set_global_alpha(self.alpha)?;

        if self.trail.len() >= 2 && self.alpha > 0.1 {
            canvas.stroke_polyline(&self.trail, self.size * 0.5, &self.color, LineCap::Butt)?;
        }

        match self.variant {
            Variant::Sparkle => self.draw_sparkle(canvas)?,
            Variant::Willow => self.draw_willow(canvas)?,
            Variant::Default | Variant::Ring => self.draw_default(canvas)?,
        }

        canvas.set_global_alpha(1.0)
    }

    fn draw_default<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        canvas.fill_radial_gradient(
            self.position,
            self.size * 2.0,
            &self.color,
            &Color::TRANSPARENT,
        )?;
        canvas.fill_circle(self.position, self.size * 0.5, &Color::WHITE)
    }

    fn draw_sparkle<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        for wedge in self.star() {
            canvas.fill_polygon(&wedge, &self.color)?;
        }

        Ok(())
    }

    fn draw_willow<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        let tail = (
            self.position.0 - self.velocity.0,
            self.position.1 - self.velocity.1,
        );

        canvas.stroke_polyline(&[self.position, tail], self.size, &self.color, LineCap::Round)
    }

    /// The four triangular wedges of the sparkle star, in viewport coordinates.
    pub fn star(&self) -> [[Point; 3]; 4] {
        let s = self.size;
        let (x, y) = self.position;

        [1.0, 2.0, 3.0, 4.0].map(|k| {
            let (sin, cos) = (self.angle + k * FRAC_PI_2).sin_cos();
            let place = |(px, py): Point| (x + px * cos - py * sin, y + px * sin + py * cos);

            [place((0.0, 0.0)), place((s * 3.0, 0.0)), place((s * 2.0, s))]
        })
    }

    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0 || self.alpha <= 0.0
    }
}

fn polar(angle: f64, speed: f64) -> Point {
    (angle.cos() * speed, angle.sin() * speed)
}
