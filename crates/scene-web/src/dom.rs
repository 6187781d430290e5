use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Create the render canvas filling `container` and size its backing
/// store to the container's current pixel size.
pub fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let _ = canvas.set_attribute("style", "display:block;width:100%;height:100%");
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    sync_canvas_backing_size(&canvas);
    Ok(canvas)
}

/// Match the canvas backing store to CSS size * devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Static text shown instead of the scene when no 3D backend is available.
pub fn create_fallback(document: &web::Document, container: &web::HtmlElement) -> Option<web::HtmlElement> {
    let el: web::HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
    el.set_class_name("scene-fallback");
    el.set_text_content(Some("3D preview unavailable on this device"));
    container.append_child(&el).ok()?;
    Some(el)
}

/// Transient interaction hint, shown on mount.
pub fn create_hint(document: &web::Document, container: &web::HtmlElement) -> Option<web::HtmlElement> {
    let el: web::HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
    el.set_class_name("scene-hint");
    el.set_text_content(Some("drag to rotate \u{b7} scroll to zoom"));
    container.append_child(&el).ok()?;
    Some(el)
}

#[inline]
pub fn set_hidden(el: &web::HtmlElement, hidden: bool) {
    if hidden {
        let _ = el.set_attribute("style", "display:none");
    } else {
        let _ = el.set_attribute("style", "");
    }
}
