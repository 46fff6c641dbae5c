use std::{cell::RefCell, convert::Infallible};

use crate::{AudioSink, Canvas, Color, LineCap, Point};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Alpha(f64),
    Rect {
        width: f64,
        height: f64,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    RadialGradient {
        center: Point,
        radius: f64,
    },
    Polyline {
        points: Vec<Point>,
        cap: LineCap,
    },
    Polygon {
        points: Vec<Point>,
    },
    Translate(f64, f64),
    ResetTransform,
}

/// Records every draw call.
#[derive(Debug, Default)]
pub struct Sketch {
    pub calls: Vec<Call>,
}

impl Sketch {
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl Canvas for Sketch {
    type Error = Infallible;

    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), Self::Error> {
        self.calls.push(Call::Alpha(alpha));
        Ok(())
    }

    fn fill_rect(
        &mut self,
        _x: f64,
        _y: f64,
        width: f64,
        height: f64,
        color: &Color,
    ) -> Result<(), Self::Error> {
        self.calls.push(Call::Rect {
            width,
            height,
            color: *color,
        });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: &Color,
    ) -> Result<(), Self::Error> {
        self.calls.push(Call::Circle {
            center,
            radius,
            color: *color,
        });
        Ok(())
    }

    fn fill_radial_gradient(
        &mut self,
        center: Point,
        radius: f64,
        _inner: &Color,
        _outer: &Color,
    ) -> Result<(), Self::Error> {
        self.calls.push(Call::RadialGradient { center, radius });
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        _width: f64,
        _color: &Color,
        cap: LineCap,
    ) -> Result<(), Self::Error> {
        self.calls.push(Call::Polyline {
            points: points.to_vec(),
            cap,
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], _color: &Color) -> Result<(), Self::Error> {
        self.calls.push(Call::Polygon {
            points: points.to_vec(),
        });
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), Self::Error> {
        self.calls.push(Call::Translate(dx, dy));
        Ok(())
    }

    fn reset_transform(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::ResetTransform);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sound {
    Whoosh(f64, f64),
    Bang(f64, f64),
    Sparkle,
    Celebration,
    Muted(bool),
}

/// Records every sound trigger.
#[derive(Debug, Default)]
pub struct Tape {
    pub sounds: RefCell<Vec<Sound>>,
}

impl Tape {
    pub fn count(&self, predicate: impl Fn(&Sound) -> bool) -> usize {
        self.sounds.borrow().iter().filter(|s| predicate(s)).count()
    }
}

impl AudioSink for Tape {
    fn whoosh(&self, pitch: f64, volume: f64) {
        self.sounds.borrow_mut().push(Sound::Whoosh(pitch, volume));
    }

    fn bang(&self, pitch: f64, volume: f64) {
        self.sounds.borrow_mut().push(Sound::Bang(pitch, volume));
    }

    fn sparkle(&self) {
        self.sounds.borrow_mut().push(Sound::Sparkle);
    }

    fn celebration(&self) {
        self.sounds.borrow_mut().push(Sound::Celebration);
    }

    fn set_muted(&self, muted: bool) {
        self.sounds.borrow_mut().push(Sound::Muted(muted));
    }
}
