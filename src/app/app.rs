use std::fmt;

use shared::{Command, ParseError, Show, ShowConfig};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, DomRectReadOnly, KeyboardEvent, MouseEvent, TouchEvent};

use super::WebAudio;
use crate::draw::CanvasTarget;

/// Errors concerning the [`App`].
#[derive(Debug)]
pub struct AppError(String);

impl From<ParseError> for AppError {
    fn from(parse_error: ParseError) -> Self {
        AppError(format!("ParseError: {parse_error}"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Glue between the browser and the [`Show`]: maps input onto commands and drives frames.
pub struct App {
    show: Show<WebAudio>,
    /// Canvas size in canvas pixels, for mapping client coordinates.
    size: (f64, f64),
}

impl App {
    pub fn new(config: ShowConfig, width: f64, height: f64) -> App {
        App {
            show: Show::new(config, width, height, WebAudio::default()),
            size: (width, height),
        }
    }

    /// Draws one frame if the clock admits it.
    pub fn frame(&mut self, now: f64, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let mut target = CanvasTarget::new(context);
        self.show.tick(now, &mut target)?;

        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = (width, height);
        self.show.resize(width, height);
    }

    /// Maps client coordinates onto the canvas.
    fn locate(&self, bound: &DomRectReadOnly, client_x: i32, client_y: i32) -> (f64, f64) {
        let x = client_x as f64 - bound.left();
        let y = client_y as f64 - bound.top();

        if bound.width() > 0.0 && bound.height() > 0.0 {
            (
                x * self.size.0 / bound.width(),
                y * self.size.1 / bound.height(),
            )
        } else {
            (x, y)
        }
    }

    pub fn on_mouse_down(&mut self, bound: &DomRectReadOnly, event: MouseEvent) {
        self.show.audio().unlock();

        if event.button() == 0 {
            let (x, y) = self.locate(bound, event.client_x(), event.client_y());
            self.show.launch_at(x, y);
        }
    }

    pub fn on_touch_start(&mut self, bound: &DomRectReadOnly, event: TouchEvent) {
        self.show.audio().unlock();

        if let Some(touch) = event.target_touches().item(0) {
            let (x, y) = self.locate(bound, touch.client_x(), touch.client_y());
            self.show.launch_at(x, y);
        }

        event.prevent_default();
    }

    pub fn on_key_down(&mut self, event: KeyboardEvent) {
        if event.repeat() || event.ctrl_key() || event.meta_key() || event.alt_key() {
            return;
        }

        self.show.audio().unlock();

        let code = event.code();

        if let Some(command) = Command::from_key_code(&code, self.show.config().burst_size) {
            if code == "Space" {
                event.prevent_default();
            }

            self.show.apply(command);
        }
    }

    /// Runs a `data-command` attribute value.
    pub fn on_command(&mut self, command: &str) -> Result<(), AppError> {
        self.show.audio().unlock();
        self.show.apply(command.parse()?);

        Ok(())
    }
}
