//! Tracks the geolocation stream and turns fixes into reports.

use crate::atlas::{accuracy_circle, Atlas, CIRCLE_STEP_DEG};
use crate::types::{GeoStatus, LocationFix, LocationReport};

pub const ENABLE_GEOLOCATION: &str =
    "Please enable geolocation to find your location in the city.";
pub const GEOLOCATION_UNAVAILABLE: &str = "Geolocation is not available.";

/// Containing neighborhood plus the others the accuracy circle
/// touches. A fix without a positive accuracy reports no nearby
/// neighborhoods.
pub fn report_for(atlas: &Atlas, fix: &LocationFix, step_deg: f64) -> LocationReport {
    let current = atlas.locate(fix.latitude, fix.longitude).map(|n| n.name());
    let nearby = match fix.accuracy {
        Some(accuracy) if accuracy > 0.0 => {
            let circle = accuracy_circle(fix.latitude, fix.longitude, accuracy, step_deg);
            atlas
                .intersecting_circle(&circle, current)
                .into_iter()
                .map(|n| n.name().to_string())
                .collect()
        }
        _ => Vec::new(),
    };
    LocationReport {
        current: current.map(str::to_string),
        nearby,
    }
}

/// "Given GPS accuracy, you may also be within A, B or C".
pub fn nearby_sentence(nearby: &[String]) -> Option<String> {
    let list = match nearby {
        [] => return None,
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    };
    Some(format!("Given GPS accuracy, you may also be within {list}"))
}

/// Latest status and fix from the geolocation collaborator.
#[derive(Debug, Clone)]
pub struct LocationTracker {
    status: GeoStatus,
    fix: Option<LocationFix>,
    report: LocationReport,
    circle_step_deg: f64,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::with_circle_step(CIRCLE_STEP_DEG)
    }
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker whose accuracy circles use `step_deg` between vertices,
    /// normally `MapParams::circle_step_deg` so it agrees with the map.
    pub fn with_circle_step(step_deg: f64) -> Self {
        Self {
            status: GeoStatus::default(),
            fix: None,
            report: LocationReport::default(),
            circle_step_deg: step_deg,
        }
    }

    pub fn status(&self) -> GeoStatus {
        self.status
    }

    /// Record availability/permission. Losing either drops the last
    /// fix and its report.
    pub fn set_status(&mut self, status: GeoStatus) {
        if !(status.available && status.enabled) {
            self.fix = None;
            self.report = LocationReport::default();
        }
        tracing::debug!(available = status.available, enabled = status.enabled, "geolocation status");
        self.status = status;
    }

    /// Consume a fix. Ignored while geolocation is unavailable or
    /// disabled.
    pub fn update(&mut self, atlas: &Atlas, fix: LocationFix) -> &LocationReport {
        if self.status.available && self.status.enabled {
            self.report = report_for(atlas, &fix, self.circle_step_deg);
            self.fix = Some(fix);
        }
        &self.report
    }

    pub fn fix(&self) -> Option<&LocationFix> {
        self.fix.as_ref()
    }

    pub fn report(&self) -> &LocationReport {
        &self.report
    }

    pub fn status_messages(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.status.enabled {
            out.push(ENABLE_GEOLOCATION);
        }
        if !self.status.available {
            out.push(GEOLOCATION_UNAVAILABLE);
        }
        out
    }

    pub fn current_message(&self) -> Option<String> {
        self.report
            .current
            .as_ref()
            .map(|name| format!("Current Neighbourhood {name}"))
    }

    pub fn nearby_message(&self) -> Option<String> {
        nearby_sentence(&self.report.nearby)
    }
}
