use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, WheelEvent, Window};
use yew::prelude::*;

use super::{movement_panel::MovementPanel, reset_button::ResetButton};
use crate::config::ViewerConfig;
use crate::model::Direction;
use crate::scene::canvas::CanvasSurface;
use crate::scene::loader::load_model;
use crate::scene::SceneController;
use crate::state::{IntervalTicker, PanDriver};
use crate::theme;

type Controller = Rc<RefCell<SceneController<CanvasSurface>>>;
type Driver = Rc<RefCell<PanDriver<IntervalTicker>>>;

/// Live per-mount objects the overlay buttons talk to.
struct ViewerHandles {
    controller: Controller,
    driver: Driver,
}

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub config: ViewerConfig,
}

fn viewport_size(window: &Window) -> (u32, u32) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (width.max(0.0) as u32, height.max(0.0) as u32)
}

/// Builds scene, camera and renderer for one mount and wires every listener.
/// The returned closure undoes all of it.
fn mount_viewer(
    canvas: HtmlCanvasElement,
    config: &ViewerConfig,
    handles: Rc<RefCell<Option<ViewerHandles>>>,
) -> Option<Box<dyn FnOnce()>> {
    let window = web_sys::window()?;
    let document = window.document()?;

    let mut surface = CanvasSurface::new(canvas.clone());
    let (w, h) = viewport_size(&window);
    surface.resize(w, h);
    let aspect = surface.aspect();
    let controller: Controller = Rc::new(RefCell::new(SceneController::new(
        config.camera,
        config.placement,
        surface,
    )));
    controller.borrow_mut().set_aspect(aspect);

    let driver: Driver = Rc::new(RefCell::new(PanDriver::new(IntervalTicker::new(
        window.clone(),
    ))));
    // Interval callback holds weak handles; the ticker lives inside the driver.
    {
        let driver_weak = Rc::downgrade(&driver);
        let controller_weak = Rc::downgrade(&controller);
        let tick = Closure::wrap(Box::new(move || {
            let (Some(driver), Some(controller)) = (driver_weak.upgrade(), controller_weak.upgrade())
            else {
                return;
            };
            driver
                .borrow_mut()
                .tick(|dir| controller.borrow_mut().pan(dir));
        }) as Box<dyn FnMut()>);
        driver.borrow_mut().ticker_mut().bind(tick);
    }

    // Model load (one shot)
    {
        let controller_weak = Rc::downgrade(&controller);
        let url = config.model_url.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = load_model(&url).await;
            let Some(controller) = controller_weak.upgrade() else {
                tracing::debug!(url = %url, "view unmounted before model finished loading");
                return;
            };
            let mut c = controller.borrow_mut();
            match result {
                Ok(geometry) => c.on_model_loaded(geometry),
                Err(e) => c.on_model_failed(&e),
            }
        });
    }

    let keydown_cb = {
        let driver = driver.clone();
        let controller = controller.clone();
        Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let key = e.key();
            if Direction::from_key(&key).is_some() {
                e.prevent_default();
            }
            let outcome = driver
                .borrow_mut()
                .key_down(&key, e.repeat(), |dir| controller.borrow_mut().pan(dir));
            tracing::trace!(key = %key, ?outcome, "keydown");
        }) as Box<dyn FnMut(_)>)
    };
    let keyup_cb = {
        let driver = driver.clone();
        Closure::wrap(Box::new(move |_e: KeyboardEvent| {
            let mut d = driver.borrow_mut();
            if let Some(dir) = d.active() {
                tracing::trace!(?dir, "pan stopped on key-up");
            }
            d.key_up();
        }) as Box<dyn FnMut(_)>)
    };
    // Key-ups are never delivered once focus leaves the page.
    let blur_cb = {
        let driver = driver.clone();
        Closure::wrap(Box::new(move || {
            driver.borrow_mut().key_up();
        }) as Box<dyn FnMut()>)
    };
    let wheel_cb = {
        let controller = controller.clone();
        Closure::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            controller.borrow_mut().zoom(e.delta_y());
        }) as Box<dyn FnMut(_)>)
    };
    let resize_cb = {
        let controller = controller.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            let (w, h) = viewport_size(&window);
            let mut c = controller.borrow_mut();
            c.surface_mut().resize(w, h);
            let aspect = c.surface_mut().aspect();
            c.set_aspect(aspect);
        }) as Box<dyn FnMut()>)
    };

    let _ = document.add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref());
    let _ = document.add_event_listener_with_callback("keyup", keyup_cb.as_ref().unchecked_ref());
    let _ = window.add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
    let _ = window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
    let _ = canvas.add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());

    *handles.borrow_mut() = Some(ViewerHandles {
        controller: controller.clone(),
        driver: driver.clone(),
    });
    tracing::debug!(width = w, height = h, "map view mounted");

    Some(Box::new(move || {
        let _ = document
            .remove_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref());
        let _ =
            document.remove_event_listener_with_callback("keyup", keyup_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
        let _ =
            window.remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
        let _ = canvas.remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
        driver.borrow_mut().stop();
        handles.borrow_mut().take();
        drop(controller);
        tracing::debug!("map view unmounted");
        let _keep_alive = (&keydown_cb, &keyup_cb, &blur_cb, &wheel_cb, &resize_cb);
    }))
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let handles = use_mut_ref(|| None::<ViewerHandles>);

    // Mount effect: scene, listeners, model load
    {
        let canvas_ref = canvas_ref.clone();
        let handles = handles.clone();
        use_effect_with(props.config.clone(), move |config| {
            let teardown = match canvas_ref.cast::<HtmlCanvasElement>() {
                Some(canvas) => mount_viewer(canvas, config, handles),
                None => None,
            };
            teardown.unwrap_or_else(|| {
                tracing::error!("map view could not attach to the page");
                Box::new(|| ()) as Box<dyn FnOnce()>
            })
        });
    }

    let on_reset = {
        let handles = handles.clone();
        Callback::from(move |_| {
            if let Some(h) = &*handles.borrow() {
                h.driver.borrow_mut().stop();
                h.controller.borrow_mut().reset();
            }
        })
    };
    let on_arrow = {
        let handles = handles.clone();
        Callback::from(move |dir: Direction| {
            if let Some(h) = &*handles.borrow() {
                let outcome = h
                    .driver
                    .borrow_mut()
                    .click(dir, |d| h.controller.borrow_mut().pan(d));
                tracing::trace!(?dir, ?outcome, "arrow clicked");
            }
        })
    };

    html! {<div style="position:relative; min-width:1000px; background:#000; overflow:hidden;">
        <canvas ref={canvas_ref} style="display:block;"></canvas>
        <ResetButton {on_reset} />
        <div style={format!("{} top:50px; right:80px; width:11vh;", theme::PANEL)}>
            <MovementPanel {on_arrow} initial_help={props.config.show_help} />
        </div>
    </div>}
}
