//! JSON-in / JSON-out entry points.
//!
//! Boundary datasets are accepted in either shape: a GeoJSON
//! `FeatureCollection` object, or the legacy array of
//! `{name, the_geom}` records with `[lat, lon]` positions.

use serde::{Deserialize, Serialize};

use crate::atlas::Atlas;
use crate::error::AtlasError;
use crate::location::report_for;
use crate::prng::Pcg32;
use crate::render::MapView;
use crate::svg::SvgSurface;
use crate::types::{LocationFix, LocationReport, MapParams};

/// Parse a dataset, picking the format from its top-level JSON type.
pub fn load_atlas(dataset_json: &str) -> Result<Atlas, AtlasError> {
    if dataset_json.trim_start().starts_with('[') {
        Atlas::from_legacy_str(dataset_json)
    } else {
        Atlas::from_geojson_str(dataset_json)
    }
}

/// Render request: map parameters plus an optional fix to overlay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(flatten)]
    pub params: MapParams,
    #[serde(default)]
    pub location: Option<LocationFix>,
}

fn default_circle_step_deg() -> f64 {
    MapParams::default().circle_step_deg
}

/// Locate request: a fix plus the accuracy-circle step, which defaults
/// to the one `MapParams` uses so both entry points agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocateRequest {
    #[serde(flatten)]
    pub fix: LocationFix,
    #[serde(default = "default_circle_step_deg")]
    pub circle_step_deg: f64,
}

/// Look up `fix_json` (a `LocateRequest`) against the dataset and
/// return a `LocationReport` as JSON.
pub fn locate_json(dataset_json: &str, fix_json: &str) -> Result<String, AtlasError> {
    let atlas = load_atlas(dataset_json)?;
    let request: LocateRequest =
        serde_json::from_str(fix_json).map_err(|source| AtlasError::Deserialize {
            context: "location fix".into(),
            source,
        })?;
    let report: LocationReport = report_for(&atlas, &request.fix, request.circle_step_deg);
    serde_json::to_string(&report).map_err(|source| AtlasError::Serialize {
        context: "location report".into(),
        source,
    })
}

/// Draw the whole dataset as an SVG document. An empty `params_json`
/// uses the default `MapParams`.
pub fn render_svg_json(dataset_json: &str, params_json: &str) -> Result<String, AtlasError> {
    let atlas = load_atlas(dataset_json)?;
    let request: RenderRequest = if params_json.trim().is_empty() {
        RenderRequest::default()
    } else {
        serde_json::from_str(params_json).map_err(|source| AtlasError::Deserialize {
            context: "render parameters".into(),
            source,
        })?
    };
    let (width, height) = (request.params.width, request.params.height);
    // No round is started, so the shuffle seed never matters.
    let mut view = MapView::mount(atlas, SvgSurface::new(), request.params, Pcg32::new(0, 0));
    if let Some(fix) = request.location {
        view.show_location(fix);
    }
    Ok(view.surface().to_svg(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "West"},
             "geometry": {"type": "Polygon", "coordinates":
                [[[-122.45, 37.75], [-122.44, 37.75], [-122.44, 37.76], [-122.45, 37.76], [-122.45, 37.75]]]}},
            {"type": "Feature", "properties": {"name": "East"},
             "geometry": {"type": "Polygon", "coordinates":
                [[[-122.44, 37.75], [-122.43, 37.75], [-122.43, 37.76], [-122.44, 37.76], [-122.44, 37.75]]]}}
        ]
    }"#;

    const LEGACY: &str = r#"[
        {"name": "West", "the_geom": [[37.75, -122.45], [37.75, -122.44], [37.76, -122.44], [37.76, -122.45]]}
    ]"#;

    #[test]
    fn locate_reports_container_and_neighbours() {
        let out = locate_json(
            GEOJSON,
            r#"{"latitude": 37.755, "longitude": -122.441, "accuracy": 300}"#,
        )
        .unwrap();
        let report: LocationReport = serde_json::from_str(&out).unwrap();
        assert_eq!(report.current.as_deref(), Some("West"));
        assert_eq!(report.nearby, vec!["East".to_string()]);
    }

    #[test]
    fn locate_in_the_ocean_is_empty() {
        let out = locate_json(GEOJSON, r#"{"latitude": 37.7, "longitude": -122.6}"#).unwrap();
        assert_eq!(out, "{}");
    }

    #[test]
    fn legacy_dataset_is_detected() {
        let out = locate_json(LEGACY, r#"{"latitude": 37.755, "longitude": -122.445}"#).unwrap();
        assert_eq!(out, r#"{"current":"West"}"#);
    }

    #[test]
    fn bad_fix_is_a_deserialize_error() {
        let err = locate_json(GEOJSON, r#"{"lat": 1}"#).unwrap_err();
        assert!(matches!(err, AtlasError::Deserialize { ref context, .. } if context == "location fix"));
    }

    #[test]
    fn svg_has_one_path_per_neighborhood() {
        let svg = render_svg_json(GEOJSON, "").unwrap();
        assert_eq!(svg.matches("class=\"neighb\"").count(), 2);
        assert!(svg.contains("width=\"600\""));
        assert!(!svg.contains("class=\"location\""));
    }

    #[test]
    fn svg_with_location_overlay() {
        let svg = render_svg_json(
            GEOJSON,
            r#"{"width": 300, "height": 200, "projection": "mercator",
                "location": {"latitude": 37.755, "longitude": -122.445}}"#,
        )
        .unwrap();
        assert!(svg.contains("width=\"300\""));
        assert!(svg.contains("class=\"location\""));
        assert!(svg.contains("rgb(95, 158, 160)"));
    }

    #[test]
    fn tiny_circle_step_is_bounded() {
        let svg = render_svg_json(
            GEOJSON,
            r#"{"circle_step_deg": 1e-300,
                "location": {"latitude": 37.755, "longitude": -122.445, "accuracy": 50}}"#,
        )
        .unwrap();
        assert!(svg.contains("class=\"location\""));

        let out = locate_json(
            GEOJSON,
            r#"{"latitude": 37.755, "longitude": -122.441, "accuracy": 300, "circle_step_deg": 1e-300}"#,
        )
        .unwrap();
        assert_eq!(out, r#"{"current":"West","nearby":["East"]}"#);
    }

    #[test]
    fn locate_and_render_share_the_step() {
        let fix = LocationFix {
            latitude: 37.7605,
            longitude: -122.44,
            accuracy: Some(400.0),
        };
        let atlas = load_atlas(GEOJSON).unwrap();
        let params = MapParams {
            circle_step_deg: 45.0,
            ..MapParams::default()
        };
        let expected = report_for(&atlas, &fix, params.circle_step_deg);

        let out = locate_json(
            GEOJSON,
            r#"{"latitude": 37.7605, "longitude": -122.44, "accuracy": 400, "circle_step_deg": 45}"#,
        )
        .unwrap();
        let from_json: LocationReport = serde_json::from_str(&out).unwrap();
        assert_eq!(from_json, expected);

        let mut view = MapView::mount(atlas, SvgSurface::new(), params, Pcg32::new(0, 0));
        assert_eq!(view.show_location(fix), expected);
    }

    #[test]
    fn bad_dataset_surfaces_error() {
        assert!(render_svg_json("{\"features\": 3}", "").is_err());
    }
}
