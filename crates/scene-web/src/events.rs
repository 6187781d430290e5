//! Pointer/wheel wiring. Every closure is retained here rather than
//! forgotten so `remove` can detach and drop it at unmount.

use glam::Vec2;
use scene_core::{PointerInput, SceneEngine};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct Listeners {
    canvas: web::HtmlCanvasElement,
    pointer: Vec<(&'static str, Closure<dyn FnMut(web::PointerEvent)>)>,
    wheel: Option<Closure<dyn FnMut(web::WheelEvent)>>,
}

impl Listeners {
    /// Detach everything wired by `wire`. Safe to call once only because
    /// the owning mount drops the struct right after.
    pub fn remove(self) {
        for (name, closure) in &self.pointer {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = &self.wheel {
            let _ = self
                .canvas
                .remove_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        }
    }
}

/// Pointer position in canvas backing-store pixels.
#[inline]
fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w > 0.0 && h > 0.0 {
        Vec2::new(
            x_css / w * canvas.width() as f32,
            y_css / h * canvas.height() as f32,
        )
    } else {
        Vec2::ZERO
    }
}

pub fn wire(
    canvas: &web::HtmlCanvasElement,
    engine: Rc<RefCell<SceneEngine>>,
    alive: Rc<Cell<bool>>,
) -> Listeners {
    let mut pointer = Vec::new();

    {
        let engine = engine.clone();
        let alive = alive.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            if alive.get() {
                engine.borrow_mut().pointer(PointerInput::Enter);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointerenter", closure.as_ref().unchecked_ref());
        pointer.push(("pointerenter", closure));
    }
    {
        let engine = engine.clone();
        let alive = alive.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            if alive.get() {
                engine.borrow_mut().pointer(PointerInput::Leave);
            }
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
        pointer.push(("pointerleave", closure));
    }
    {
        let engine = engine.clone();
        let alive = alive.clone();
        let canvas_down = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if !alive.get() {
                return;
            }
            let pos = pointer_canvas_px(&ev, &canvas_down);
            engine
                .borrow_mut()
                .pointer(PointerInput::Down { x: pos.x, y: pos.y });
            let _ = canvas_down.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        pointer.push(("pointerdown", closure));
    }
    {
        let engine = engine.clone();
        let alive = alive.clone();
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if !alive.get() {
                return;
            }
            let pos = pointer_canvas_px(&ev, &canvas_move);
            engine
                .borrow_mut()
                .pointer(PointerInput::Move { x: pos.x, y: pos.y });
        }) as Box<dyn FnMut(_)>);
        let _ = canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        pointer.push(("pointermove", closure));
    }
    {
        let engine = engine.clone();
        let alive = alive.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if !alive.get() {
                return;
            }
            engine.borrow_mut().pointer(PointerInput::Up);
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        let _ =
            canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        pointer.push(("pointerup", closure));
    }

    let wheel = {
        let engine = engine.clone();
        let alive = alive.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
            if !alive.get() {
                return;
            }
            let mut eng = engine.borrow_mut();
            // only claim the event while hovering; page scroll is untouched
            // otherwise
            if eng.input.hovering() {
                ev.prevent_default();
            }
            eng.pointer(PointerInput::Wheel {
                delta_y: ev.delta_y() as f32,
            });
        }) as Box<dyn FnMut(_)>);
        let _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        Some(closure)
    };

    Listeners {
        canvas: canvas.clone(),
        pointer,
        wheel,
    }
}
