//! Data types for the boundary dataset, location fixes and map config.
//!
//! Everything read from or written to JSON derives Serialize +
//! Deserialize; field defaults live in the `default_*` helpers so the
//! serde path and the `Default` impls agree.

use serde::{Deserialize, Serialize};

// -- Boundary dataset (GeoJSON subset) -----------------------------

/// A GeoJSON position: `[lon, lat]`, optionally followed by altitude.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeatureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

/// Flat record format used by the geolocation page: a single ring
/// with `[lat, lon]` vertex order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub name: String,
    pub the_geom: Vec<Position>,
}

// -- Geolocation ---------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy radius in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoStatus {
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for GeoStatus {
    fn default() -> Self {
        Self {
            available: true,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nearby: Vec<String>,
}

// -- Quiz ----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub total: usize,
    pub correct: usize,
    #[serde(default)]
    pub missed: Vec<String>,
    /// Percentage correct, rounded to two decimals.
    pub score: f64,
}

// -- Map config ----------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Lambert cylindrical equal-area.
    #[default]
    EqualArea,
    Mercator,
}

fn default_default_fill() -> String {
    "rgb(175, 157, 150)".into()
}
fn default_selected_fill() -> String {
    "#FB5B1F".into()
}
fn default_correct_fill() -> String {
    "green".into()
}
fn default_missed_fill() -> String {
    "red".into()
}
fn default_located_fill() -> String {
    "rgb(95, 158, 160)".into()
}
fn default_nearby_fill() -> String {
    "rgb(176, 224, 230)".into()
}
fn default_stroke() -> String {
    "#ffffff".into()
}
fn default_location_fill() -> String {
    "red".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_default_fill")]
    pub default_fill: String,
    #[serde(default = "default_selected_fill")]
    pub selected_fill: String,
    #[serde(default = "default_correct_fill")]
    pub correct_fill: String,
    #[serde(default = "default_missed_fill")]
    pub missed_fill: String,
    #[serde(default = "default_located_fill")]
    pub located_fill: String,
    #[serde(default = "default_nearby_fill")]
    pub nearby_fill: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_location_fill")]
    pub location_fill: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default_fill: default_default_fill(),
            selected_fill: default_selected_fill(),
            correct_fill: default_correct_fill(),
            missed_fill: default_missed_fill(),
            located_fill: default_located_fill(),
            nearby_fill: default_nearby_fill(),
            stroke: default_stroke(),
            location_fill: default_location_fill(),
        }
    }
}

fn default_viewport() -> f64 {
    600.0
}
fn default_circle_step_deg() -> f64 {
    crate::atlas::CIRCLE_STEP_DEG
}
fn default_marker_radius_m() -> f64 {
    25.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapParams {
    #[serde(default = "default_viewport")]
    pub width: f64,
    #[serde(default = "default_viewport")]
    pub height: f64,
    #[serde(default)]
    pub projection: ProjectionKind,
    #[serde(default)]
    pub palette: Palette,
    /// Angular step between accuracy-circle vertices, in degrees.
    #[serde(default = "default_circle_step_deg")]
    pub circle_step_deg: f64,
    /// Radius drawn for a fix that reports no accuracy.
    #[serde(default = "default_marker_radius_m")]
    pub marker_radius_m: f64,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            width: default_viewport(),
            height: default_viewport(),
            projection: ProjectionKind::default(),
            palette: Palette::default(),
            circle_step_deg: default_circle_step_deg(),
            marker_radius_m: default_marker_radius_m(),
        }
    }
}

// -- Tests ---------------------------------------------------------
