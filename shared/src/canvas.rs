use crate::Color;

/// A point on the viewport, in pixels.
pub type Point = (f64, f64);

/// Line cap used when stroking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// An immediate-mode 2D drawing surface.
///
/// Every live entity issues its draw calls against a [`Canvas`] once per frame. Implementors decide what an
/// error is; the show never inspects it beyond propagating it to whoever asked for the frame.
pub trait Canvas {
    /// Error raised by the underlying surface.
    type Error;

    /// Sets the compositing alpha applied to every following call.
    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), Self::Error>;

    /// Fills an axis-aligned rectangle.
    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &Color,
    ) -> Result<(), Self::Error>;

    /// Fills a solid disc.
    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color)
        -> Result<(), Self::Error>;

    /// Fills a disc with a radial gradient running from `inner` at the center to `outer` at the rim.
    fn fill_radial_gradient(
        &mut self,
        center: Point,
        radius: f64,
        inner: &Color,
        outer: &Color,
    ) -> Result<(), Self::Error>;

    /// Strokes an open polyline through `points`.
    fn stroke_polyline(
        &mut self,
        points: &[Point],
        width: f64,
        color: &Color,
        cap: LineCap,
    ) -> Result<(), Self::Error>;

    /// Fills a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: &Color) -> Result<(), Self::Error>;

    /// Moves the drawing origin.
    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), Self::Error>;

    /// Restores the identity transform.
    fn reset_transform(&mut self) -> Result<(), Self::Error>;
}
