//! Map projection fitted to a fixed viewport.
//!
//! Raw projections map `(lon, lat)` degrees to unitless plane
//! coordinates with y growing southward (screen orientation). `fit`
//! then picks the scale of whichever axis is the tighter fit and
//! centres the data's bounding box in the viewport.

use std::f64::consts::FRAC_PI_4;
use std::fmt::Write;

use crate::geometry::{Bounds, Point, Ring};
use crate::types::ProjectionKind;

/// Mercator is undefined at the poles; clamp like web maps do.
const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

fn raw(kind: ProjectionKind, (lon, lat): Point) -> Point {
    let lambda = lon.to_radians();
    match kind {
        ProjectionKind::EqualArea => (lambda, -lat.to_radians().sin()),
        ProjectionKind::Mercator => {
            let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
            (lambda, -(FRAC_PI_4 + phi / 2.0).tan().ln())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub kind: ProjectionKind,
    pub scale: f64,
    pub translate: Point,
}

impl Projection {
    /// Fit every vertex of `rings` into a `width` x `height` viewport.
    ///
    /// With no vertices the projection is centred on the origin at
    /// unit scale; with a single point it keeps unit scale and centres
    /// that point.
    pub fn fit<'a>(
        kind: ProjectionKind,
        rings: impl IntoIterator<Item = &'a Ring>,
        width: f64,
        height: f64,
    ) -> Projection {
        let mut bounds = Bounds::EMPTY;
        for ring in rings {
            for &p in ring {
                bounds.extend(raw(kind, p));
            }
        }
        if bounds.is_empty() {
            return Projection {
                kind,
                scale: 1.0,
                translate: (width / 2.0, height / 2.0),
            };
        }

        let x_scale = width / bounds.width().abs();
        let y_scale = height / bounds.height().abs();
        let mut scale = x_scale.min(y_scale);
        if !scale.is_finite() {
            scale = 1.0;
        }
        let translate = (
            (width - scale * (bounds.max_x + bounds.min_x)) / 2.0,
            (height - scale * (bounds.max_y + bounds.min_y)) / 2.0,
        );
        Projection {
            kind,
            scale,
            translate,
        }
    }

    pub fn project(&self, p: Point) -> Point {
        let (x, y) = raw(self.kind, p);
        (
            x * self.scale + self.translate.0,
            y * self.scale + self.translate.1,
        )
    }

    pub fn project_rings(&self, rings: &[Ring]) -> Vec<Ring> {
        rings
            .iter()
            .map(|ring| ring.iter().map(|&p| self.project(p)).collect())
            .collect()
    }
}

/// SVG path data for already projected rings: one `M ... Z` subpath
/// per ring, closing vertex dropped.
pub fn path_data(rings: &[Ring]) -> String {
    let mut d = String::new();
    for ring in rings {
        let open = match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
            _ => &ring[..],
        };
        for (i, (x, y)) in open.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{x:.3},{y:.3}");
        }
        if !open.is_empty() {
            d.push('Z');
        }
    }
    d
}
