//! Canvas2D render surface.
//!
//! Paints the scene document onto an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. The editor pushes scene events, viewport
//! changes and draw-mode changes; the host calls `paint` from its
//! animation frame whenever `needs_paint` is set.

use cs_core::{
    Color, DrawableObject, FontStyle, ObjectId, ObjectKind, PathCmd, Point, Rect, SceneDocument,
    TEXT_LINE_HEIGHT, TextAlign, Viewport, points_bounds,
};
use cs_editor::{Brush, CaptureOptions, RenderSurface, SceneEvent};
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// Color of the area around the workspace.
const PASTEBOARD: &str = "#F3F4F6";
const SELECTION: &str = "#4FC3F7";

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
    brush: Option<Brush>,
    /// Points of the freehand stroke being captured, in document space.
    live_stroke: Vec<Point>,
    /// Decoded images keyed by `src`. Entries are created on first paint
    /// and drawn once the browser reports them complete.
    images: HashMap<String, HtmlImageElement>,
    needs_paint: bool,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            viewport: Viewport::IDENTITY,
            brush: None,
            live_stroke: Vec::new(),
            images: HashMap::new(),
            needs_paint: true,
        })
    }

    pub fn needs_paint(&self) -> bool {
        self.needs_paint
    }

    pub fn invalidate(&mut self) {
        self.needs_paint = true;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(1.0) as u32);
        self.canvas.set_height(height.max(1.0) as u32);
        self.needs_paint = true;
    }

    pub fn is_capturing_stroke(&self) -> bool {
        self.brush.is_some()
    }

    pub fn push_stroke_point(&mut self, p: Point) {
        self.live_stroke.push(p);
        self.needs_paint = true;
    }

    /// Hand back the captured stroke as path commands and reset it.
    pub fn take_stroke(&mut self) -> Vec<PathCmd> {
        let points = std::mem::take(&mut self.live_stroke);
        self.needs_paint = true;
        stroke_to_path(&points)
    }

    /// Repaint the whole canvas.
    pub fn paint(&mut self, doc: &SceneDocument, selected: &[ObjectId]) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        let ctx = &self.ctx;

        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.set_fill_style_str(PASTEBOARD);
        ctx.fill_rect(0.0, 0.0, w, h);

        let vp = self.viewport;
        let _ = ctx.set_transform(vp.zoom, 0.0, 0.0, vp.zoom, vp.pan.x, vp.pan.y);
        draw_workspace(ctx, doc);

        ctx.save();
        let ws = doc.workspace_rect();
        ctx.begin_path();
        ctx.rect(ws.x0, ws.y0, ws.width(), ws.height());
        ctx.clip();
        for obj in doc.objects() {
            let image = match &obj.kind {
                ObjectKind::Image { src, .. } => image_for(&mut self.images, src),
                _ => None,
            };
            draw_object(ctx, obj, image.as_ref());
        }
        ctx.restore();

        for id in selected {
            if let Some(obj) = doc.get(*id) {
                draw_selection(ctx, obj.bounds(), vp.zoom);
            }
        }
        if let Some(brush) = &self.brush {
            draw_live_stroke(ctx, &self.live_stroke, brush);
        }
        self.needs_paint = false;
    }
}

impl RenderSurface for Canvas2dSurface {
    fn scene_changed(&mut self, _doc: &SceneDocument, event: &SceneEvent) {
        if let SceneEvent::Removed(id) = event {
            log::trace!("canvas: removed {id}");
        }
        self.needs_paint = true;
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        self.needs_paint = true;
    }

    fn set_drawing_mode(&mut self, brush: Option<&Brush>) {
        self.brush = brush.copied();
        if self.brush.is_none() {
            self.live_stroke.clear();
        }
        self.needs_paint = true;
    }

    fn request_render(&mut self) {
        self.needs_paint = true;
    }

    /// Draw the region onto an offscreen canvas at scale 1 and encode it.
    fn capture(&mut self, doc: &SceneDocument, options: &CaptureOptions) -> Result<String, String> {
        let region = options.region;
        let offscreen = offscreen_canvas(region.width(), region.height()).map_err(js_message)?;
        let ctx = context_2d(&offscreen).map_err(js_message)?;

        let _ = ctx.translate(-region.x0, -region.y0);
        draw_workspace(&ctx, doc);
        for obj in doc.objects() {
            let image = match &obj.kind {
                ObjectKind::Image { src, .. } => image_for(&mut self.images, src),
                _ => None,
            };
            draw_object(&ctx, obj, image.as_ref());
        }

        offscreen
            .to_data_url_with_type_and_encoder_options(
                options.format.mime(),
                &JsValue::from_f64(options.quality),
            )
            .map_err(js_message)
    }
}

// ─── Setup helpers ──────────────────────────────────────────────────────

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("2d context has an unexpected type"))
}

fn offscreen_canvas(width: f64, height: f64) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("not a canvas element"))?;
    canvas.set_width(width.max(1.0).round() as u32);
    canvas.set_height(height.max(1.0).round() as u32);
    Ok(canvas)
}

fn js_message(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Look up (or start loading) the element for `src`. Returns it once it
/// has decoded pixels.
fn image_for(images: &mut HashMap<String, HtmlImageElement>, src: &str) -> Option<HtmlImageElement> {
    if !images.contains_key(src) {
        let img = HtmlImageElement::new().ok()?;
        img.set_cross_origin(Some("anonymous"));
        img.set_src(src);
        images.insert(src.to_string(), img);
    }
    images
        .get(src)
        .filter(|img| img.complete() && img.natural_width() > 0)
        .cloned()
}

// ─── Drawing ────────────────────────────────────────────────────────────

fn css(c: Color) -> String {
    if c.a >= 1.0 { c.to_hex() } else { c.to_css() }
}

fn draw_workspace(ctx: &CanvasRenderingContext2d, doc: &SceneDocument) {
    let ws = doc.workspace();
    let r = doc.workspace_rect();
    ctx.save();
    if let Some(shadow) = &ws.shadow {
        ctx.set_shadow_blur(shadow.blur);
        ctx.set_shadow_offset_x(shadow.offset_x);
        ctx.set_shadow_offset_y(shadow.offset_y);
        ctx.set_shadow_color(&css(shadow.color));
    }
    ctx.set_fill_style_str(&ws.fill.map_or_else(|| "#FFFFFF".to_string(), css));
    ctx.fill_rect(r.x0, r.y0, r.width(), r.height());
    ctx.restore();
}

fn draw_object(ctx: &CanvasRenderingContext2d, obj: &DrawableObject, image: Option<&HtmlImageElement>) {
    let inset = if obj.stroke.is_some() {
        obj.stroke_width / 2.0
    } else {
        0.0
    };

    ctx.save();
    let _ = ctx.translate(obj.left, obj.top);
    let _ = ctx.rotate(obj.angle.to_radians());
    let _ = ctx.scale(obj.scale_x, obj.scale_y);
    ctx.set_global_alpha(obj.opacity);
    if let Some(shadow) = &obj.shadow {
        ctx.set_shadow_blur(shadow.blur);
        ctx.set_shadow_offset_x(shadow.offset_x);
        ctx.set_shadow_offset_y(shadow.offset_y);
        ctx.set_shadow_color(&css(shadow.color));
    }
    if !obj.stroke_dash_array.is_empty() {
        let dashes: js_sys::Array = obj
            .stroke_dash_array
            .iter()
            .map(|d| JsValue::from_f64(*d))
            .collect();
        let _ = ctx.set_line_dash(&dashes);
    }

    match &obj.kind {
        ObjectKind::Rect { width, height } => {
            ctx.begin_path();
            ctx.rect(inset, inset, *width, *height);
            fill_and_stroke(ctx, obj);
        }
        ObjectKind::Circle { radius } => {
            ctx.begin_path();
            let c = radius + inset;
            let _ = ctx.arc(c, c, *radius, 0.0, std::f64::consts::TAU);
            fill_and_stroke(ctx, obj);
        }
        ObjectKind::Triangle { width, height } => {
            ctx.begin_path();
            ctx.move_to(inset + width / 2.0, inset);
            ctx.line_to(inset + width, inset + height);
            ctx.line_to(inset, inset + height);
            ctx.close_path();
            fill_and_stroke(ctx, obj);
        }
        ObjectKind::Polygon { points } => {
            let origin = points_bounds(points.iter().copied()).origin();
            ctx.begin_path();
            for (i, p) in points.iter().enumerate() {
                let (x, y) = (p.x - origin.x + inset, p.y - origin.y + inset);
                if i == 0 {
                    ctx.move_to(x, y);
                } else {
                    ctx.line_to(x, y);
                }
            }
            ctx.close_path();
            fill_and_stroke(ctx, obj);
        }
        ObjectKind::Textbox { text, width, style } => {
            let italic = match style.font_style {
                FontStyle::Normal => "",
                FontStyle::Italic => "italic ",
                FontStyle::Oblique => "oblique ",
            };
            ctx.set_font(&format!(
                "{italic}{} {}px {}",
                style.font_weight.0, style.font_size, style.font_family
            ));
            let (align, x) = match style.text_align {
                TextAlign::Center => ("center", width / 2.0),
                TextAlign::Right => ("right", *width),
                TextAlign::Left | TextAlign::Justify => ("left", 0.0),
            };
            ctx.set_text_align(align);
            ctx.set_text_baseline("alphabetic");
            ctx.set_fill_style_str(&obj.fill.map_or_else(|| "#000000".to_string(), css));
            let line_height = style.font_size * TEXT_LINE_HEIGHT;
            for (i, line) in text.lines().enumerate() {
                let y = line_height * i as f64 + style.font_size;
                let _ = ctx.fill_text(line, x, y);
                if style.underline || style.linethrough {
                    let measured = ctx.measure_text(line).map(|m| m.width()).unwrap_or(0.0);
                    let start = match style.text_align {
                        TextAlign::Center => x - measured / 2.0,
                        TextAlign::Right => x - measured,
                        TextAlign::Left | TextAlign::Justify => x,
                    };
                    let thickness = (style.font_size / 15.0).max(1.0);
                    if style.underline {
                        ctx.fill_rect(start, y + thickness, measured, thickness);
                    }
                    if style.linethrough {
                        ctx.fill_rect(start, y - style.font_size * 0.3, measured, thickness);
                    }
                }
            }
        }
        ObjectKind::Image {
            width,
            height,
            filters,
            ..
        } => {
            let css_filters: Vec<String> = filters.iter().filter_map(|f| f.css()).collect();
            if !css_filters.is_empty() {
                ctx.set_filter(&css_filters.join(" "));
            }
            match image {
                Some(img) => {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img, 0.0, 0.0, *width, *height,
                    );
                }
                None => {
                    ctx.set_fill_style_str("rgba(0, 0, 0, 0.06)");
                    ctx.fill_rect(0.0, 0.0, *width, *height);
                }
            }
        }
        ObjectKind::Path { commands } => {
            let origin = points_bounds(commands.iter().flat_map(|c| c.points())).origin();
            let (dx, dy) = (inset - origin.x, inset - origin.y);
            ctx.begin_path();
            for cmd in commands {
                match *cmd {
                    PathCmd::MoveTo(x, y) => ctx.move_to(dx + x, dy + y),
                    PathCmd::LineTo(x, y) => ctx.line_to(dx + x, dy + y),
                    PathCmd::QuadTo(cx, cy, ex, ey) => {
                        ctx.quadratic_curve_to(dx + cx, dy + cy, dx + ex, dy + ey)
                    }
                    PathCmd::CubicTo(c1x, c1y, c2x, c2y, ex, ey) => ctx.bezier_curve_to(
                        dx + c1x,
                        dy + c1y,
                        dx + c2x,
                        dy + c2y,
                        dx + ex,
                        dy + ey,
                    ),
                    PathCmd::Close => ctx.close_path(),
                }
            }
            ctx.set_line_cap("round");
            ctx.set_line_join("round");
            fill_and_stroke(ctx, obj);
        }
    }

    ctx.restore();
}

fn fill_and_stroke(ctx: &CanvasRenderingContext2d, obj: &DrawableObject) {
    if let Some(fill) = obj.fill {
        ctx.set_fill_style_str(&css(fill));
        ctx.fill();
    }
    if let Some(stroke) = obj.stroke
        && obj.stroke_width > 0.0
    {
        // Shadow applies to the fill only.
        ctx.set_shadow_color("transparent");
        ctx.set_stroke_style_str(&css(stroke));
        ctx.set_line_width(obj.stroke_width);
        ctx.stroke();
    }
}

fn draw_selection(ctx: &CanvasRenderingContext2d, bounds: Rect, zoom: f64) {
    ctx.save();
    ctx.set_stroke_style_str(SELECTION);
    ctx.set_line_width(1.5 / zoom);
    ctx.stroke_rect(bounds.x0, bounds.y0, bounds.width(), bounds.height());

    let size = 8.0 / zoom;
    ctx.set_fill_style_str("#FFFFFF");
    for (x, y) in [
        (bounds.x0, bounds.y0),
        (bounds.x1, bounds.y0),
        (bounds.x0, bounds.y1),
        (bounds.x1, bounds.y1),
    ] {
        ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);
        ctx.stroke_rect(x - size / 2.0, y - size / 2.0, size, size);
    }
    ctx.restore();
}

fn draw_live_stroke(ctx: &CanvasRenderingContext2d, points: &[Point], brush: &Brush) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.save();
    ctx.set_stroke_style_str(&css(brush.color));
    ctx.set_line_width(brush.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
    ctx.restore();
}

/// Smooth a captured polyline into quadratic segments through the
/// midpoints of consecutive samples.
pub fn stroke_to_path(points: &[Point]) -> Vec<PathCmd> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut cmds = vec![PathCmd::MoveTo(first.x, first.y)];
    if rest.is_empty() {
        cmds.push(PathCmd::LineTo(first.x, first.y));
        return cmds;
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let mid = a.midpoint(b);
        cmds.push(PathCmd::QuadTo(a.x, a.y, mid.x, mid.y));
    }
    if let Some(last) = points.last() {
        cmds.push(PathCmd::LineTo(last.x, last.y));
    }
    cmds
}
