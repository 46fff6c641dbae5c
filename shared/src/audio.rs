/// Fire-and-forget sound effects triggered by the simulation.
///
/// Implementations must never block and never fail loudly. A sink that cannot play anything simply stays
/// quiet, and the show behaves identically either way.
pub trait AudioSink {
    /// Rising rocket, played once per firework on its first ascent tick.
    fn whoosh(&self, pitch: f64, volume: f64);

    /// Explosion, played when a firework detonates and for every crossette sub-burst.
    fn bang(&self, pitch: f64, volume: f64);

    /// Short high chime, played for every crackle cluster.
    fn sparkle(&self);

    /// Celebration fanfare.
    fn celebration(&self);

    /// Globally silences or unsilences the sink.
    fn set_muted(&self, _muted: bool) {}
}

/// An [`AudioSink`] that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl AudioSink for Silence {
    fn whoosh(&self, _pitch: f64, _volume: f64) {}

    fn bang(&self, _pitch: f64, _volume: f64) {}

    fn sparkle(&self) {}

    fn celebration(&self) {}
}

impl<A: AudioSink + ?Sized> AudioSink for &A {
    fn whoosh(&self, pitch: f64, volume: f64) {
        (**self).whoosh(pitch, volume)
    }

    fn bang(&self, pitch: f64, volume: f64) {
        (**self).bang(pitch, volume)
    }

    fn sparkle(&self) {
        (**self).sparkle()
    }

    fn celebration(&self) {
        (**self).celebration()
    }

    fn set_muted(&self, muted: bool) {
        (**self).set_muted(muted)
    }
}
