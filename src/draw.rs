use std::f64::consts::TAU;

use shared::{Canvas, Color, LineCap, Point};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Draws the show onto a 2D canvas context.
pub struct CanvasTarget<'a> {
    context: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasTarget<'a> {
    pub fn new(context: &'a CanvasRenderingContext2d) -> CanvasTarget<'a> {
        CanvasTarget { context }
    }

    fn trace(&self, points: &[Point]) {
        self.context.begin_path();

        if let Some((first, rest)) = points.split_first() {
            self.context.move_to(first.0, first.1);

            for point in rest {
                self.context.line_to(point.0, point.1);
            }
        }
    }
}

impl Canvas for CanvasTarget<'_> {
    type Error = JsValue;

    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), JsValue> {
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0));

        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &Color,
    ) -> Result<(), JsValue> {
        self.context.set_fill_style(&color.css().into());
        self.context.fill_rect(x, y, width, height);

        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color) -> Result<(), JsValue> {
        // `arc` throws on negative radii.
        let radius = radius.max(0.0);

        self.context.begin_path();
        self.context.arc(center.0, center.1, radius, 0.0, TAU)?;
        self.context.set_fill_style(&color.css().into());
        self.context.fill();

        Ok(())
    }

    fn fill_radial_gradient(
        &mut self,
        center: Point,
        radius: f64,
        inner: &Color,
        outer: &Color,
    ) -> Result<(), JsValue> {
        let radius = radius.max(0.0);
        let gradient = self
            .context
            .create_radial_gradient(center.0, center.1, 0.0, center.0, center.1, radius)?;

        gradient.add_color_stop(0.0, &inner.css())?;
        gradient.add_color_stop(1.0, &outer.css())?;

        self.context.begin_path();
        self.context.arc(center.0, center.1, radius, 0.0, TAU)?;
        self.context.set_fill_style(&gradient);
        self.context.fill();

        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        width: f64,
        color: &Color,
        cap: LineCap,
    ) -> Result<(), JsValue> {
        self.trace(points);

        self.context.set_stroke_style(&color.css().into());
        self.context.set_line_width(width);
        self.context.set_line_cap(match cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        });
        self.context.stroke();

        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: &Color) -> Result<(), JsValue> {
        self.trace(points);

        self.context.close_path();
        self.context.set_fill_style(&color.css().into());
        self.context.fill();

        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.context.translate(dx, dy)
    }

    fn reset_transform(&mut self) -> Result<(), JsValue> {
        self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}
