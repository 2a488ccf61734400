//! SVG writer for the workspace region of a document.
//!
//! The output covers exactly the workspace rectangle: the view box is the
//! workspace bounds, the workspace fill is painted first, and everything
//! outside is clipped.

use crate::model::{Color, DrawableObject, ObjectKind, SceneDocument, TEXT_LINE_HEIGHT, TextAlign};
use crate::model::{FontStyle, points_bounds};
use std::fmt::Write;

fn svg_color(c: Option<Color>) -> String {
    match c {
        Some(c) if c.a >= 1.0 => c.to_hex(),
        Some(c) => c.to_css(),
        None => "none".to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the workspace region of `doc` as a standalone SVG document.
pub fn render_svg(doc: &SceneDocument) -> String {
    let ws = doc.workspace_rect();
    let (w, h) = (ws.width(), ws.height());
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"{} {} {w} {h}\">",
        ws.x0, ws.y0
    );
    let _ = writeln!(
        svg,
        "<defs><clipPath id=\"workspace\"><rect x=\"{}\" y=\"{}\" width=\"{w}\" height=\"{h}\" /></clipPath></defs>",
        ws.x0, ws.y0
    );
    let _ = writeln!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{w}\" height=\"{h}\" fill=\"{}\" />",
        ws.x0,
        ws.y0,
        svg_color(doc.workspace().fill)
    );

    svg.push_str("<g clip-path=\"url(#workspace)\">\n");
    for obj in doc.objects() {
        render_object(&mut svg, obj);
    }
    svg.push_str("</g>\n</svg>");
    svg
}

fn render_object(out: &mut String, obj: &DrawableObject) {
    let fill = svg_color(obj.fill);
    let stroke = svg_color(obj.stroke);
    let inset = if obj.stroke.is_some() {
        obj.stroke_width / 2.0
    } else {
        0.0
    };

    let mut paint = format!(
        "fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{}\"",
        obj.stroke_width
    );
    if !obj.stroke_dash_array.is_empty() {
        let dashes: Vec<String> = obj.stroke_dash_array.iter().map(f64::to_string).collect();
        let _ = write!(paint, " stroke-dasharray=\"{}\"", dashes.join(" "));
    }

    let _ = write!(
        out,
        "  <g transform=\"translate({} {}) rotate({}) scale({} {})\"",
        obj.left, obj.top, obj.angle, obj.scale_x, obj.scale_y
    );
    if obj.opacity < 1.0 {
        let _ = write!(out, " opacity=\"{}\"", obj.opacity);
    }
    out.push_str(">\n");

    match &obj.kind {
        ObjectKind::Rect { width, height } => {
            let _ = writeln!(
                out,
                "    <rect x=\"{inset}\" y=\"{inset}\" width=\"{width}\" height=\"{height}\" {paint} />"
            );
        }
        ObjectKind::Circle { radius } => {
            let c = radius + inset;
            let _ = writeln!(out, "    <circle cx=\"{c}\" cy=\"{c}\" r=\"{radius}\" {paint} />");
        }
        ObjectKind::Triangle { width, height } => {
            let _ = writeln!(
                out,
                "    <polygon points=\"{},{} {},{} {},{}\" {paint} />",
                inset + width / 2.0,
                inset,
                inset + width,
                inset + height,
                inset,
                inset + height
            );
        }
        ObjectKind::Polygon { points } => {
            let origin = points_bounds(points.iter().copied()).origin();
            let pts: Vec<String> = points
                .iter()
                .map(|p| format!("{},{}", p.x - origin.x + inset, p.y - origin.y + inset))
                .collect();
            let _ = writeln!(out, "    <polygon points=\"{}\" {paint} />", pts.join(" "));
        }
        ObjectKind::Textbox { text, width, style } => {
            let (anchor, x) = match style.text_align {
                TextAlign::Center => ("middle", width / 2.0),
                TextAlign::Right => ("end", *width),
                TextAlign::Left | TextAlign::Justify => ("start", 0.0),
            };
            let font_style = match style.font_style {
                FontStyle::Normal => "normal",
                FontStyle::Italic => "italic",
                FontStyle::Oblique => "oblique",
            };
            let mut decoration = Vec::new();
            if style.underline {
                decoration.push("underline");
            }
            if style.linethrough {
                decoration.push("line-through");
            }
            let line_height = style.font_size * TEXT_LINE_HEIGHT;
            for (i, line) in text.lines().enumerate() {
                let y = line_height * i as f64 + style.font_size;
                let _ = write!(
                    out,
                    "    <text x=\"{x}\" y=\"{y}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" \
                     font-style=\"{font_style}\" text-anchor=\"{anchor}\" fill=\"{fill}\"",
                    escape(&style.font_family),
                    style.font_size,
                    style.font_weight.0
                );
                if !decoration.is_empty() {
                    let _ = write!(out, " text-decoration=\"{}\"", decoration.join(" "));
                }
                let _ = writeln!(out, ">{}</text>", escape(line));
            }
        }
        ObjectKind::Image {
            src,
            width,
            height,
            filters,
        } => {
            let css: Vec<String> = filters.iter().filter_map(|f| f.css()).collect();
            let _ = write!(
                out,
                "    <image href=\"{}\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"none\"",
                escape(src)
            );
            if !css.is_empty() {
                let _ = write!(out, " style=\"filter: {}\"", css.join(" "));
            }
            out.push_str(" />\n");
        }
        ObjectKind::Path { commands } => {
            let origin = points_bounds(commands.iter().flat_map(|c| c.points())).origin();
            let d: Vec<String> = commands
                .iter()
                .map(|c| c.to_svg())
                .collect();
            let _ = writeln!(
                out,
                "    <path transform=\"translate({} {})\" d=\"{}\" {paint} />",
                inset - origin.x,
                inset - origin.y,
                d.join(" ")
            );
        }
    }
    out.push_str("  </g>\n");
}
