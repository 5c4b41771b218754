//! Retained-mode SVG surface.
//!
//! Keeps every drawing instruction as plain data and serializes the
//! whole scene on demand.

use std::fmt::Write;

use crate::geometry::Point;
use crate::render::{LocationMarker, RenderSurface, ShapeId};

#[derive(Debug, Clone, PartialEq)]
pub struct SvgShape {
    pub name: String,
    pub path: String,
    pub fill: String,
    pub stroke: String,
    pub opacity: f64,
    pub label: Option<(Point, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    shapes: Vec<SvgShape>,
    tooltip: Option<(Point, String)>,
    marker: Option<LocationMarker>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[SvgShape] {
        &self.shapes
    }

    pub fn shape_named(&self, name: &str) -> Option<&SvgShape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    /// Number of `add_shape` calls so far.
    pub fn adds(&self) -> usize {
        self.shapes.len()
    }

    pub fn tooltip(&self) -> Option<&(Point, String)> {
        self.tooltip.as_ref()
    }

    pub fn marker(&self) -> Option<&LocationMarker> {
        self.marker.as_ref()
    }

    /// Serialize the scene into a standalone SVG document.
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
        );
        for s in &self.shapes {
            let _ = write!(
                out,
                r#"<path class="neighb" data-name="{}" d="{}" fill="{}" stroke="{}""#,
                escape(&s.name),
                s.path,
                escape(&s.fill),
                escape(&s.stroke),
            );
            if s.opacity != 1.0 {
                let _ = write!(out, r#" opacity="{}""#, s.opacity);
            }
            out.push_str("/>\n");
        }
        for s in &self.shapes {
            if let Some(((x, y), text)) = &s.label {
                let _ = writeln!(
                    out,
                    r#"<text x="{x:.3}" y="{y:.3}" dy="0.5em" text-anchor="middle" pointer-events="none">{}</text>"#,
                    escape(text)
                );
            }
        }
        if let Some(m) = &self.marker {
            let _ = writeln!(
                out,
                r#"<path class="location" d="{}" fill="{}"/>"#,
                m.path,
                escape(&m.fill)
            );
        }
        if let Some(((x, y), text)) = &self.tooltip {
            let _ = writeln!(
                out,
                r#"<text class="tooltip" x="{x:.3}" y="{y:.3}" text-anchor="middle" pointer-events="none">{}</text>"#,
                escape(text)
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

impl RenderSurface for SvgSurface {
    fn add_shape(&mut self, name: &str, path: &str, fill: &str, stroke: &str) -> ShapeId {
        self.shapes.push(SvgShape {
            name: name.to_string(),
            path: path.to_string(),
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            opacity: 1.0,
            label: None,
        });
        self.shapes.len() - 1
    }

    fn set_fill(&mut self, shape: ShapeId, fill: &str) {
        if let Some(s) = self.shapes.get_mut(shape) {
            s.fill = fill.to_string();
        }
    }

    fn set_opacity(&mut self, shape: ShapeId, opacity: f64) {
        if let Some(s) = self.shapes.get_mut(shape) {
            s.opacity = opacity;
        }
    }

    fn set_label(&mut self, shape: ShapeId, label: Option<(Point, &str)>) {
        if let Some(s) = self.shapes.get_mut(shape) {
            s.label = label.map(|(at, text)| (at, text.to_string()));
        }
    }

    fn show_tooltip(&mut self, at: Point, text: &str) {
        self.tooltip = Some((at, text.to_string()));
    }

    fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    fn set_location_marker(&mut self, marker: Option<&LocationMarker>) {
        self.marker = marker.cloned();
    }
}
