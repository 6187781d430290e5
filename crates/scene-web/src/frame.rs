use crate::dom;
use crate::render;
use instant::Instant;
use scene_core::SceneEngine;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Clamp on a single frame's dt so a backgrounded tab does not replay a
/// long stall as one giant step.
const MAX_FRAME_DT: f32 = 0.1;

pub type TickClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct FrameContext {
    pub engine: Rc<RefCell<SceneEngine>>,
    pub gpu: Rc<RefCell<Option<render::GpuState>>>,
    pub canvas: web::HtmlCanvasElement,
    pub hint: Option<web::HtmlElement>,
    pub alive: Rc<Cell<bool>>,
    pub raf_id: Rc<Cell<Option<i32>>>,
    pub last_instant: Instant,
    pub hint_shown: bool,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT);
        self.last_instant = now;

        let (w, h) = (self.canvas.width(), self.canvas.height());
        let hint_visible;
        {
            let mut engine = self.engine.borrow_mut();
            // surface and projection follow the container before drawing
            engine.set_viewport(w as f32, h as f32);
            let delta = engine.advance(dt);
            if let Some(g) = self.gpu.borrow_mut().as_mut() {
                g.resize_if_needed(w, h);
                g.sync(&engine.scene, &delta);
                if let Err(e) = g.render(&engine.scene) {
                    log::error!("render error: {:?}", e);
                }
            }
            hint_visible = engine.hint_visible();
        }
        if hint_visible != self.hint_shown {
            self.hint_shown = hint_visible;
            if let Some(el) = &self.hint {
                dom::set_hidden(el, !hint_visible);
            }
        }
    }
}

/// Drive the context with requestAnimationFrame until the alive flag goes
/// false. The returned closure cell is cleared by the unmount path, which
/// breaks the self-referencing cycle.
pub fn start_loop(ctx: Rc<RefCell<FrameContext>>) -> TickClosure {
    let tick: TickClosure = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let ctx_tick = ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let (alive, raf_cell) = {
            let c = ctx_tick.borrow();
            (c.alive.clone(), c.raf_id.clone())
        };
        if !alive.get() {
            return;
        }
        ctx_tick.borrow_mut().frame();
        if !alive.get() {
            return;
        }
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    raf_cell.set(Some(id));
                }
            }
        }
    }) as Box<dyn FnMut()>));

    let raf_cell = ctx.borrow().raf_id.clone();
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                raf_cell.set(Some(id));
            }
        }
    }
    tick
}
