use crate::Dice;

const DAMP_AFTER_MS: f64 = 50.0;
const DAMP_FACTOR: f64 = 0.7;
const SETTLE_AFTER_MS: f64 = 200.0;
const AMPLITUDE: f64 = 10.0;

/// Transient positional jitter applied to the draw origin after large explosions.
#[derive(Debug, Clone, Default)]
pub struct ScreenShake {
    intensity: f64,
    kicked_at: Option<f64>,
    damped: bool,
}

impl ScreenShake {
    /// Starts a new shake of `intensity` at `now_ms`, replacing any running one.
    pub fn kick(&mut self, intensity: f64, now_ms: f64) {
        self.intensity = intensity;
        self.kicked_at = Some(now_ms);
        self.damped = false;
    }

    /// Applies the decay schedule: damped once after 50ms, gone after 200ms.
    pub fn settle(&mut self, now_ms: f64) {
        if let Some(kicked_at) = self.kicked_at {
            let elapsed = now_ms - kicked_at;

            if elapsed >= SETTLE_AFTER_MS {
                self.stop();
            } else if elapsed >= DAMP_AFTER_MS && !self.damped {
                self.intensity *= DAMP_FACTOR;
                self.damped = true;
            }
        }
    }

    pub fn stop(&mut self) {
        self.intensity = 0.0;
        self.kicked_at = None;
        self.damped = false;
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn is_shaking(&self) -> bool {
        self.intensity > 0.0
    }

    /// Random origin offset for this frame.
    pub fn offset(&self, dice: &mut Dice) -> (f64, f64) {
        (
            dice.range(-0.5, 0.5) * self.intensity * AMPLITUDE,
            dice.range(-0.5, 0.5) * self.intensity * AMPLITUDE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_on_schedule() {
        let mut shake = ScreenShake::default();
        shake.kick(1.5, 1000.0);

        shake.settle(1040.0);
        assert_eq!(shake.intensity(), 1.5);

        shake.settle(1050.0);
        assert!((shake.intensity() - 1.05).abs() < 1e-12);

        shake.settle(1100.0);
        assert!((shake.intensity() - 1.05).abs() < 1e-12);

        shake.settle(1200.0);
        assert!(!shake.is_shaking());
    }

    #[test]
    fn kick_restarts_schedule() {
        let mut shake = ScreenShake::default();
        shake.kick(1.0, 0.0);
        shake.settle(150.0);
        shake.kick(0.36, 150.0);
        shake.settle(210.0);

        assert!((shake.intensity() - 0.36 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn offset_is_bounded() {
        let mut shake = ScreenShake::default();
        let mut dice = Dice::new(0);
        assert_eq!(shake.offset(&mut dice), (0.0, 0.0));

        shake.kick(2.0, 0.0);
        for _ in 0..100 {
            let (dx, dy) = shake.offset(&mut dice);
            assert!(dx.abs() <= 10.0 && dy.abs() <= 10.0);
        }
    }
}
