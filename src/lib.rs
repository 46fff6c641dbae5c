mod app;
mod draw;

use std::{cell::RefCell, rc::Rc};

use app::App;
use shared::{Command, ShowConfig};
use wasm_bindgen::{prelude::*, JsCast};

const CANVAS_ID: &str = "fireworks";
const CONFIG_ID: &str = "fireworks-config";

fn window() -> web_sys::Window {
    web_sys::window().expect("no global `window` exists")
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
    window()
        .request_animation_frame(f.as_ref().unchecked_ref())
        .expect("should register `requestAnimationFrame` OK");
}

fn document() -> web_sys::Document {
    window()
        .document()
        .expect("should have a document on window")
}

fn viewport() -> Result<(f64, f64), JsValue> {
    let width = window().inner_width()?.as_f64().unwrap_or_default();
    let height = window().inner_height()?.as_f64().unwrap_or_default();

    Ok((width, height))
}

/// Reads the optional inline JSON config, falling back to defaults.
fn read_config() -> ShowConfig {
    let mut config = match document()
        .get_element_by_id(CONFIG_ID)
        .and_then(|element| element.text_content())
    {
        Some(json) => ShowConfig::from_json(&json).unwrap_or_else(|err| {
            log::warn!("ignoring #{CONFIG_ID}: {err}");
            ShowConfig::default()
        }),
        None => ShowConfig::default(),
    };

    if config.seed.is_none() {
        let now = window()
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_default();

        config.seed = Some(js_sys::Date::now().to_bits() ^ now.to_bits());
    }

    log::info!("{config:?}");

    config
}

/// Gives every pattern button its description as a tooltip.
fn describe_buttons() -> Result<(), JsValue> {
    let buttons = document().query_selector_all("[data-command^='select:']")?;

    for i in 0..buttons.length() {
        let Some(button) = buttons
            .item(i)
            .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };

        let pattern = button
            .get_attribute("data-command")
            .and_then(|command| command.parse::<Command>().ok())
            .and_then(|command| match command {
                Command::Select(selection) => selection.pattern(),
                _ => None,
            });

        if let Some(pattern) = pattern {
            button.set_attribute("title", pattern.description())?;
        }
    }

    Ok(())
}

fn canvas() -> Result<web_sys::HtmlCanvasElement, JsValue> {
    match document().get_element_by_id(CANVAS_ID) {
        Some(element) => Ok(element.dyn_into::<web_sys::HtmlCanvasElement>()?),
        None => {
            let canvas = document()
                .create_element("canvas")?
                .dyn_into::<web_sys::HtmlCanvasElement>()?;
            canvas.set_id(CANVAS_ID);

            let body = document().body().ok_or("document has no body")?;
            body.insert_before(&canvas, body.first_child().as_ref())?;

            Ok(canvas)
        }
    }
}

#[wasm_bindgen(start)]
fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let canvas = canvas()?;
    let (width, height) = viewport()?;

    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let context = canvas
        .get_context("2d")?
        .ok_or("canvas has no 2d context")?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()?;

    describe_buttons()?;

    let app = App::new(read_config(), width, height);
    let app = Rc::new(RefCell::new(app));

    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    {
        let app = app.clone();

        *g.borrow_mut() = Some(Closure::new(move |now: f64| {
            if let Err(err) = app.borrow_mut().frame(now, &context) {
                log::error!("frame failed: {:?}", err);
            }

            request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        request_animation_frame(g.borrow().as_ref().unwrap());
    }

    let canvas = Rc::new(canvas);

    {
        let app = app.clone();
        let element = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let bound = element.get_bounding_client_rect();
            app.borrow_mut().on_mouse_down(&bound, event);
        });
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let app = app.clone();
        let element = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
            let bound = element.get_bounding_client_rect();
            app.borrow_mut().on_touch_start(&bound, event);
        });
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            app.borrow_mut().on_key_down(event);
        });
        document().add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let command = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                .and_then(|element| element.closest("[data-command]").ok().flatten())
                .and_then(|element| element.get_attribute("data-command"));

            if let Some(command) = command {
                if let Err(err) = app.borrow_mut().on_command(&command) {
                    log::warn!("{err}");
                }
            }
        });
        document().add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let app = app.clone();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: JsValue| match viewport() {
            Ok((width, height)) => {
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);
                app.borrow_mut().resize(width, height);
            }
            Err(err) => log::error!("resize failed: {:?}", err),
        });
        window().add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("fireworks started at {width}x{height}");

    Ok(())
}
