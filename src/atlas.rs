//! Neighborhood dataset and geolocation lookups.
//!
//! An `Atlas` is loaded once and never mutated. Lookups scan it in
//! dataset order, so when boundaries overlap the earlier neighborhood
//! wins.

use std::collections::HashSet;

use crate::error::AtlasError;
use crate::geometry::{
    boundaries_intersect, centroid, circle_ring, metres_to_degrees, point_in_rings, Bounds,
    Point, Ring,
};
use crate::types::{FeatureCollection, Geometry, LegacyRecord, Position};

/// Vertex spacing of the accuracy circle, in degrees of bearing.
pub const CIRCLE_STEP_DEG: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct Neighborhood {
    name: String,
    rings: Vec<Ring>,
    centroid: Point,
    bounds: Bounds,
}

fn distinct_vertices(ring: &[Point]) -> usize {
    let mut v: Vec<Point> = ring.to_vec();
    v.dedup();
    if v.len() > 1 && v.first() == v.last() {
        v.pop();
    }
    v.len()
}

impl Neighborhood {
    /// Build from `(lon, lat)` rings. Every ring needs three distinct
    /// vertices.
    pub fn new(name: impl Into<String>, rings: Vec<Ring>) -> Result<Self, AtlasError> {
        let name = name.into();
        if rings.is_empty() {
            return Err(AtlasError::EmptyBoundary { name });
        }
        for ring in &rings {
            let vertices = distinct_vertices(ring);
            if vertices < 3 {
                return Err(AtlasError::DegenerateRing { name, vertices });
            }
        }
        let centroid = centroid(&rings).ok_or_else(|| AtlasError::EmptyBoundary {
            name: name.clone(),
        })?;
        let bounds = Bounds::of_rings(&rings);
        Ok(Self {
            name,
            rings,
            centroid,
            bounds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// `(lon, lat)` of the area-weighted centroid.
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let (x, y) = (lon, lat);
        if x < self.bounds.min_x
            || x > self.bounds.max_x
            || y < self.bounds.min_y
            || y > self.bounds.max_y
        {
            return false;
        }
        point_in_rings(x, y, &self.rings)
    }
}

fn to_point(name: &str, pos: &Position, lat_first: bool) -> Result<Point, AtlasError> {
    match pos.as_slice() {
        [a, b, ..] if lat_first => Ok((*b, *a)),
        [a, b, ..] => Ok((*a, *b)),
        _ => Err(AtlasError::ShortPosition {
            name: name.to_string(),
            len: pos.len(),
        }),
    }
}

fn to_ring(name: &str, positions: &[Position], lat_first: bool) -> Result<Ring, AtlasError> {
    positions
        .iter()
        .map(|p| to_point(name, p, lat_first))
        .collect()
}

/// Immutable, ordered collection of uniquely named neighborhoods.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    neighborhoods: Vec<Neighborhood>,
}

impl Atlas {
    pub fn new(neighborhoods: Vec<Neighborhood>) -> Result<Self, AtlasError> {
        let mut seen = HashSet::new();
        for n in &neighborhoods {
            if !seen.insert(n.name()) {
                return Err(AtlasError::DuplicateName {
                    name: n.name().to_string(),
                });
            }
        }
        tracing::info!(neighborhoods = neighborhoods.len(), "loaded atlas");
        Ok(Self { neighborhoods })
    }

    pub fn from_feature_collection(fc: &FeatureCollection) -> Result<Self, AtlasError> {
        let mut out = Vec::with_capacity(fc.features.len());
        for (index, feature) in fc.features.iter().enumerate() {
            let name = match feature.properties.name.as_deref() {
                Some(n) if !n.trim().is_empty() => n,
                _ => return Err(AtlasError::MissingName { index }),
            };
            let rings = match &feature.geometry {
                Geometry::Polygon { coordinates } => coordinates
                    .iter()
                    .map(|r| to_ring(name, r, false))
                    .collect::<Result<Vec<_>, _>>()?,
                Geometry::MultiPolygon { coordinates } => coordinates
                    .iter()
                    .flatten()
                    .map(|r| to_ring(name, r, false))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            out.push(Neighborhood::new(name, rings)?);
        }
        Self::new(out)
    }

    pub fn from_geojson_str(json: &str) -> Result<Self, AtlasError> {
        let fc: FeatureCollection =
            serde_json::from_str(json).map_err(|source| AtlasError::Deserialize {
                context: "boundary feature collection".into(),
                source,
            })?;
        Self::from_feature_collection(&fc)
    }

    pub fn from_legacy_records(records: &[LegacyRecord]) -> Result<Self, AtlasError> {
        let mut out = Vec::with_capacity(records.len());
        for (index, rec) in records.iter().enumerate() {
            if rec.name.trim().is_empty() {
                return Err(AtlasError::MissingName { index });
            }
            let ring = to_ring(&rec.name, &rec.the_geom, true)?;
            out.push(Neighborhood::new(rec.name.clone(), vec![ring])?);
        }
        Self::new(out)
    }

    pub fn from_legacy_str(json: &str) -> Result<Self, AtlasError> {
        let records: Vec<LegacyRecord> =
            serde_json::from_str(json).map_err(|source| AtlasError::Deserialize {
                context: "legacy boundary records".into(),
                source,
            })?;
        Self::from_legacy_records(&records)
    }

    pub fn len(&self) -> usize {
        self.neighborhoods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighborhoods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighborhood> {
        self.neighborhoods.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.name == name)
    }

    /// Names in dataset order.
    pub fn names(&self) -> Vec<String> {
        self.neighborhoods.iter().map(|n| n.name.clone()).collect()
    }

    /// First neighborhood (dataset order) whose boundary contains the
    /// point.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<&Neighborhood> {
        let found = self.neighborhoods.iter().find(|n| n.contains(lat, lon));
        tracing::debug!(lat, lon, found = found.map(|n| n.name()), "locate");
        found
    }

    /// Neighborhoods whose boundary touches the accuracy circle around
    /// the fix, minus the one `locate` reports.
    pub fn intersecting_with_accuracy(
        &self,
        lat: f64,
        lon: f64,
        accuracy_m: f64,
    ) -> Vec<&Neighborhood> {
        let circle = accuracy_circle(lat, lon, accuracy_m, CIRCLE_STEP_DEG);
        let located = self.locate(lat, lon).map(|n| n.name());
        self.intersecting_circle(&circle, located)
    }

    /// Neighborhoods whose boundary intersects `circle`, in dataset
    /// order, skipping `exclude`.
    pub fn intersecting_circle(
        &self,
        circle: &Ring,
        exclude: Option<&str>,
    ) -> Vec<&Neighborhood> {
        let circle_rings = std::slice::from_ref(circle);
        let hits: Vec<&Neighborhood> = self
            .neighborhoods
            .iter()
            .filter(|n| Some(n.name()) != exclude)
            .filter(|n| boundaries_intersect(&n.rings, circle_rings))
            .collect();
        tracing::debug!(count = hits.len(), ?exclude, "accuracy circle intersections");
        hits
    }
}

/// Ring in `(lon, lat)` approximating the accuracy circle of a fix.
pub fn accuracy_circle(lat: f64, lon: f64, accuracy_m: f64, step_deg: f64) -> Ring {
    circle_ring(lon, lat, metres_to_degrees(accuracy_m.max(0.0)), step_deg)
}
