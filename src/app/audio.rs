use std::cell::{Cell, RefCell};

use js_sys::Math;
use shared::AudioSink;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

const FANFARE: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];

/// A single enveloped oscillator note.
struct Tone {
    kind: OscillatorType,
    /// Start frequency, with an optional exponential glide to a target over so many seconds.
    frequency: (f32, Option<(f32, f64)>),
    peak: f32,
    attack: f64,
    release: f64,
}

/// Synthesizes the show's sound effects with Web Audio oscillators.
///
/// Browsers only allow an [`AudioContext`] after a user gesture, so the context is created by [`WebAudio::unlock`].
/// Until then, and for good if creation fails, every effect is silently dropped.
#[derive(Default)]
pub struct WebAudio {
    context: RefCell<Option<AudioContext>>,
    muted: Cell<bool>,
    unsupported: Cell<bool>,
}

impl WebAudio {
    /// Creates the audio context. Call from within a user gesture.
    pub fn unlock(&self) {
        if self.context.borrow().is_some() || self.unsupported.get() {
            return;
        }

        match AudioContext::new() {
            Ok(context) => {
                log::info!("audio unlocked");
                self.context.replace(Some(context));
            }
            Err(err) => {
                log::warn!("Web Audio unavailable: {:?}", err);
                self.unsupported.set(true);
            }
        }
    }

    /// The context to schedule on, resumed if the browser suspended it.
    fn context(&self) -> Option<AudioContext> {
        if self.muted.get() {
            return None;
        }

        let context = self.context.borrow().clone()?;

        if context.state() == AudioContextState::Suspended {
            let _ = context.resume();
        }

        Some(context)
    }

    fn play(&self, context: &AudioContext, at: f64, tone: Tone) -> Result<(), JsValue> {
        let oscillator = context.create_oscillator()?;
        let gain = context.create_gain()?;

        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&context.destination())?;

        oscillator.set_type(tone.kind);

        let (from, glide) = tone.frequency;
        oscillator.frequency().set_value_at_time(from, at)?;
        if let Some((to, by)) = glide {
            oscillator
                .frequency()
                .exponential_ramp_to_value_at_time(to, at + by)?;
        }

        gain.gain().set_value_at_time(0.0, at)?;
        gain.gain()
            .linear_ramp_to_value_at_time(tone.peak, at + tone.attack)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, at + tone.release)?;

        oscillator.start_with_when(at)?;
        oscillator.stop_with_when(at + tone.release)?;

        Ok(())
    }

    fn schedule(&self, tones: impl FnOnce(&AudioContext, f64) -> Result<(), JsValue>) {
        if let Some(context) = self.context() {
            if let Err(err) = tones(&context, context.current_time()) {
                log::warn!("failed to schedule sound: {:?}", err);
            }
        }
    }
}

impl AudioSink for WebAudio {
    fn whoosh(&self, pitch: f64, volume: f64) {
        let pitch = pitch as f32;

        self.schedule(|context, now| {
            self.play(
                context,
                now,
                Tone {
                    kind: OscillatorType::Sawtooth,
                    frequency: (300.0 * pitch, Some((80.0 * pitch, 0.6))),
                    peak: volume as f32,
                    attack: 0.05,
                    release: 0.8,
                },
            )
        });
    }

    fn bang(&self, pitch: f64, volume: f64) {
        let volume = volume as f32;

        self.schedule(|context, now| {
            for i in 0..3 {
                let frequency = ((80.0 + Math::random() * 40.0) * pitch * (i + 1) as f64) as f32;

                self.play(
                    context,
                    now,
                    Tone {
                        kind: if i == 0 {
                            OscillatorType::Sine
                        } else {
                            OscillatorType::Triangle
                        },
                        frequency: (frequency, Some((frequency * 0.3, 0.4))),
                        peak: volume * (1.0 - i as f32 * 0.3),
                        attack: 0.02,
                        release: 0.5,
                    },
                )?;
            }

            // Crackle tail.
            for i in 0..5 {
                self.play(
                    context,
                    now + 0.1 + i as f64 * 0.05,
                    Tone {
                        kind: OscillatorType::Square,
                        frequency: ((1000.0 + Math::random() * 500.0) as f32, Some((200.0, 0.1))),
                        peak: volume * 0.2,
                        attack: 0.01,
                        release: 0.15,
                    },
                )?;
            }

            Ok(())
        });
    }

    fn sparkle(&self) {
        self.schedule(|context, now| {
            self.play(
                context,
                now,
                Tone {
                    kind: OscillatorType::Sine,
                    frequency: (1500.0, Some((600.0, 0.2))),
                    peak: 0.15,
                    attack: 0.01,
                    release: 0.25,
                },
            )
        });
    }

    fn celebration(&self) {
        self.schedule(|context, now| {
            for (index, frequency) in FANFARE.into_iter().enumerate() {
                self.play(
                    context,
                    now + index as f64 * 0.15,
                    Tone {
                        kind: OscillatorType::Sine,
                        frequency: (frequency, None),
                        peak: 0.3,
                        attack: 0.05,
                        release: 0.5,
                    },
                )?;
            }

            Ok(())
        });
    }

    fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }
}
