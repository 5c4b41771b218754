//! Planar polygon tests and spherical helpers for accuracy circles.
//!
//! Points are `(x, y)` tuples. For geographic data that is
//! `(lon, lat)` in degrees; for projected data it is screen space.
//! Polygons are lists of rings evaluated with the even-odd rule, so
//! holes and multi-part boundaries need no special casing.

use std::f64::consts::PI;

pub type Point = (f64, f64);
pub type Ring = Vec<Point>;

/// Mean earth radius used for metres -> degrees conversion.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Upper bound on vertices per circle ring (one per 0.1 degree).
pub const MAX_CIRCLE_VERTICES: usize = 3600;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn of_rings(rings: &[Ring]) -> Bounds {
        let mut b = Bounds::EMPTY;
        for ring in rings {
            for &p in ring {
                b.extend(p);
            }
        }
        b
    }

    pub fn extend(&mut self, (x, y): Point) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True if the boxes share any point (touching counts).
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Signed shoelace area. Positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].0 * ring[j].1;
        area -= ring[j].0 * ring[i].1;
    }
    area / 2.0
}

/// Ray-casting point-in-polygon test for a single ring.
pub fn point_in_ring(px: f64, py: f64, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > py) != (yj > py) {
            let intersect_x = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Even-odd containment over every ring of a boundary.
pub fn point_in_rings(px: f64, py: f64, rings: &[Ring]) -> bool {
    rings
        .iter()
        .filter(|ring| point_in_ring(px, py, ring))
        .count()
        % 2
        == 1
}

/// Area-weighted centroid of a boundary.
///
/// Rings contribute with their signed area, so a hole wound opposite
/// to its exterior is subtracted. Falls back to the vertex mean when
/// the total area vanishes; `None` when there are no vertices at all.
///
/// Sums run relative to the first vertex; raw lon/lat cross products
/// cancel badly for city-sized polygons.
pub fn centroid(rings: &[Ring]) -> Option<Point> {
    let (ox, oy) = *rings.iter().flatten().next()?;
    let mut area_sum = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let (x0, y0) = (ring[i].0 - ox, ring[i].1 - oy);
            let (x1, y1) = (ring[(i + 1) % n].0 - ox, ring[(i + 1) % n].1 - oy);
            let cross = x0 * y1 - x1 * y0;
            area_sum += cross;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }
    }
    if area_sum.abs() > 1e-18 {
        let a3 = area_sum * 3.0;
        return Some((ox + cx / a3, oy + cy / a3));
    }

    let mut count = 0usize;
    let (mut sx, mut sy) = (0.0, 0.0);
    for &(x, y) in rings.iter().flatten() {
        sx += x;
        sy += y;
        count += 1;
    }
    (count > 0).then(|| (sx / count as f64, sy / count as f64))
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.0 >= a.0.min(b.0)
        && p.0 <= a.0.max(b.0)
        && p.1 >= a.1.min(b.1)
        && p.1 <= a.1.max(b.1)
}

/// True if closed segments `a1-a2` and `b1-b2` share any point.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

fn edges(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

fn any_edges_cross(a: &[Ring], b: &[Ring]) -> bool {
    for ra in a {
        for (a1, a2) in edges(ra) {
            for rb in b {
                for (b1, b2) in edges(rb) {
                    if segments_intersect(a1, a2, b1, b2) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// True if two boundaries share any area or boundary point.
///
/// Edges crossing settles it; otherwise the boundaries are either
/// disjoint or one lies wholly inside the other, which a single
/// vertex per ring decides.
pub fn boundaries_intersect(a: &[Ring], b: &[Ring]) -> bool {
    if !Bounds::of_rings(a).overlaps(&Bounds::of_rings(b)) {
        return false;
    }
    if any_edges_cross(a, b) {
        return true;
    }
    let a_in_b = a
        .iter()
        .filter_map(|r| r.first())
        .any(|&(x, y)| point_in_rings(x, y, b));
    let b_in_a = b
        .iter()
        .filter_map(|r| r.first())
        .any(|&(x, y)| point_in_rings(x, y, a));
    a_in_b || b_in_a
}

/// Convert a ground distance to the angle it subtends at the earth's
/// centre, in degrees.
pub fn metres_to_degrees(metres: f64) -> f64 {
    let circumference = EARTH_RADIUS_M * PI * 2.0;
    metres / circumference * 360.0
}

/// Closed ring approximating a small circle on the sphere.
///
/// Vertices are the great-circle destinations at `radius_deg` from
/// the centre for bearings `0, step, 2*step, ...`; the first vertex is
/// repeated at the end. A non-positive or non-finite step falls back
/// to 6 degrees. The vertex count is held to `3..=MAX_CIRCLE_VERTICES`;
/// a step outside that range is spread evenly over the clamped count.
pub fn circle_ring(center_lon: f64, center_lat: f64, radius_deg: f64, step_deg: f64) -> Ring {
    let step = if step_deg.is_finite() && step_deg > 0.0 {
        step_deg
    } else {
        6.0
    };
    let wanted = (360.0 / step).ceil();
    let count = wanted.clamp(3.0, MAX_CIRCLE_VERTICES as f64) as usize;
    let step = if wanted == count as f64 {
        step
    } else {
        360.0 / count as f64
    };

    let lat1 = center_lat.to_radians();
    let lon1 = center_lon.to_radians();
    let delta = radius_deg.to_radians();
    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = delta.sin_cos();

    let mut ring = Vec::with_capacity(count + 1);
    for i in 0..count {
        let bearing = (i as f64 * step).to_radians();
        let sin_lat2 = sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos();
        let lat2 = sin_lat2.asin();
        let lon2 = lon1
            + (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * sin_lat2);
        ring.push((lon2.to_degrees(), lat2.to_degrees()));
    }
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}
