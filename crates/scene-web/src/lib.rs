#![cfg(target_arch = "wasm32")]
//! Web front end: mounts a procedural hero scene into a host container,
//! drives the frame loop and tears everything down on unmount.

use instant::Instant;
use scene_core::{EngineConfig, RecipeError, SceneEngine, SceneVariant, HINT_TIMEOUT_SEC};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod dom;
mod events;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scene-web starting");
    Ok(())
}

struct Mounted {
    engine: Rc<RefCell<SceneEngine>>,
    alive: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: frame::TickClosure,
    gpu: Rc<RefCell<Option<render::GpuState>>>,
    listeners: events::Listeners,
    observer: web::ResizeObserver,
    #[allow(dead_code)]
    observer_cb: Closure<dyn FnMut(js_sys::Array, web::ResizeObserver)>,
    canvas: web::HtmlCanvasElement,
    hint: Option<web::HtmlElement>,
}

/// Handle for one mount cycle. Everything the mount created is released by
/// `unmount`; overlapping mounts share nothing.
#[wasm_bindgen]
pub struct SceneHandle {
    mounted: Rc<RefCell<Option<Mounted>>>,
    fallback: RefCell<Option<web::HtmlElement>>,
}

/// Mount the scene `variant` ("core-knot", "network-globe", "chain",
/// "ringed-planet") into `container`. When the rendering backend is
/// unavailable a static textual fallback is installed instead and no scene
/// is constructed.
#[wasm_bindgen]
pub async fn mount(
    container: web::HtmlElement,
    variant: String,
    reduced_motion: bool,
) -> Result<SceneHandle, JsValue> {
    mount_inner(container, &variant, reduced_motion)
        .await
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

async fn mount_inner(
    container: web::HtmlElement,
    variant: &str,
    reduced_motion: bool,
) -> anyhow::Result<SceneHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let variant: SceneVariant = variant
        .parse()
        .map_err(|e: RecipeError| anyhow::anyhow!(e))?;

    let canvas = dom::create_canvas(&document, &container)?;

    let gpu = match render::GpuState::new(&canvas).await {
        Ok(g) => g,
        Err(e) => {
            log::warn!("rendering backend unavailable: {e:#}");
            canvas.remove();
            let fallback = dom::create_fallback(&document, &container);
            return Ok(SceneHandle {
                mounted: Rc::new(RefCell::new(None)),
                fallback: RefCell::new(fallback),
            });
        }
    };

    let config = EngineConfig {
        reduced_motion,
        hint_timeout_sec: HINT_TIMEOUT_SEC,
        seed: js_sys::Date::now() as u64,
    };
    let aspect = canvas.width() as f32 / canvas.height().max(1) as f32;
    let mut engine = SceneEngine::new(&variant.recipe(), aspect, config)?;
    engine.set_viewport(canvas.width() as f32, canvas.height() as f32);

    let mut gpu = gpu;
    gpu.sync_all(&engine.scene);

    let engine = Rc::new(RefCell::new(engine));
    let gpu = Rc::new(RefCell::new(Some(gpu)));
    let alive = Rc::new(Cell::new(true));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let hint = dom::create_hint(&document, &container);
    let listeners = events::wire(&canvas, engine.clone(), alive.clone());

    // keep surface and projection in step with the container's size
    let observer_cb = {
        let canvas = canvas.clone();
        let engine = engine.clone();
        let alive = alive.clone();
        Closure::wrap(Box::new(
            move |_entries: js_sys::Array, _obs: web::ResizeObserver| {
                if !alive.get() {
                    return;
                }
                dom::sync_canvas_backing_size(&canvas);
                engine
                    .borrow_mut()
                    .set_viewport(canvas.width() as f32, canvas.height() as f32);
            },
        ) as Box<dyn FnMut(js_sys::Array, web::ResizeObserver)>)
    };
    let observer = web::ResizeObserver::new(observer_cb.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    observer.observe(&container);

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        engine: engine.clone(),
        gpu: gpu.clone(),
        canvas: canvas.clone(),
        hint: hint.clone(),
        alive: alive.clone(),
        raf_id: raf_id.clone(),
        last_instant: Instant::now(),
        hint_shown: true,
    }));
    let tick = frame::start_loop(ctx);

    log::info!("scene mounted: {variant:?}");
    Ok(SceneHandle {
        mounted: Rc::new(RefCell::new(Some(Mounted {
            engine,
            alive,
            raf_id,
            tick,
            gpu,
            listeners,
            observer,
            observer_cb,
            canvas,
            hint,
        }))),
        fallback: RefCell::new(None),
    })
}

#[wasm_bindgen]
impl SceneHandle {
    /// Tear down this mount: stop the frame loop, detach every listener,
    /// release every GPU resource and remove the surface from the
    /// container. Safe to call any number of times.
    pub fn unmount(&self) {
        if let Some(el) = self.fallback.borrow_mut().take() {
            el.remove();
        }
        let Some(m) = self.mounted.borrow_mut().take() else {
            return;
        };
        m.alive.set(false);
        if let Some(id) = m.raf_id.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        // dropping the tick closure breaks its self-referencing cycle
        m.tick.borrow_mut().take();
        m.engine.borrow_mut().cancel();
        m.observer.disconnect();
        m.listeners.remove();
        if let Some(mut g) = m.gpu.borrow_mut().take() {
            g.dispose();
        }
        if let Some(h) = &m.hint {
            h.remove();
        }
        m.canvas.remove();
        log::info!("scene unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.borrow().is_some() || self.fallback.borrow().is_some()
    }
}
