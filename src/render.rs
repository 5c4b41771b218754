//! Map render / interaction adapter.
//!
//! `MapView` draws one shape per neighborhood on a [`RenderSurface`]
//! when mounted and keeps those shapes for its whole life. Pointer
//! events are plain method calls from the host; every quiz transition
//! is followed by deriving a fresh [`RenderState`] and applying it
//! with [`MapView::repaint`].

use std::collections::HashMap;

use crate::atlas::{accuracy_circle, Atlas};
use crate::geometry::Point;
use crate::location::report_for;
use crate::prng::Pcg32;
use crate::projection::{path_data, Projection};
use crate::quiz::{Paint, Quiz, QuizEvent};
use crate::types::{LocationFix, LocationReport, MapParams, Palette};

/// Handle returned by the surface for a drawn shape.
pub type ShapeId = usize;

/// Opacity applied while the pointer is over a shape.
const HOVER_OPACITY: f64 = 0.5;

/// Accuracy circle (or plain marker) drawn around a fix.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMarker {
    pub path: String,
    pub fill: String,
}

/// Abstract 2-D vector drawing surface.
pub trait RenderSurface {
    fn add_shape(&mut self, name: &str, path: &str, fill: &str, stroke: &str) -> ShapeId;

    fn set_fill(&mut self, shape: ShapeId, fill: &str);

    fn set_opacity(&mut self, shape: ShapeId, opacity: f64);

    /// Place (`Some`) or remove (`None`) a text label on a shape.
    fn set_label(&mut self, shape: ShapeId, label: Option<(Point, &str)>);

    fn show_tooltip(&mut self, at: Point, text: &str);

    fn hide_tooltip(&mut self);

    fn set_location_marker(&mut self, marker: Option<&LocationMarker>);
}

/// Quiz mode gates clicks into the quiz and keeps names hidden;
/// inspect mode shows names on hover and ignores clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Quiz,
    Inspect,
}

/// Location-derived emphasis, shown only on quiz-untouched shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Located,
    Nearby,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeState {
    pub paint: Paint,
    pub highlight: Highlight,
    /// Name the shape at its centroid (missed answers).
    pub label: bool,
}

impl ShapeState {
    pub fn fill<'a>(&self, palette: &'a Palette) -> &'a str {
        match (self.paint, self.highlight) {
            (Paint::Selected, _) => &palette.selected_fill,
            (Paint::Missed, _) => &palette.missed_fill,
            (Paint::Correct, _) => &palette.correct_fill,
            (Paint::Default, Highlight::Located) => &palette.located_fill,
            (Paint::Default, Highlight::Nearby) => &palette.nearby_fill,
            (Paint::Default, Highlight::None) => &palette.default_fill,
        }
    }
}

/// Paint for every neighborhood, in atlas order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub shapes: Vec<ShapeState>,
    pub tooltips: bool,
}

/// Derive what the map should look like right now.
pub fn derive_render_state(
    atlas: &Atlas,
    quiz: &Quiz,
    location: Option<&LocationReport>,
    mode: Mode,
) -> RenderState {
    let shapes = atlas
        .iter()
        .map(|n| {
            let name = n.name();
            let paint = quiz.paint(name);
            let highlight = match location {
                Some(r) if r.current.as_deref() == Some(name) => Highlight::Located,
                Some(r) if r.nearby.iter().any(|x| x == name) => Highlight::Nearby,
                _ => Highlight::None,
            };
            ShapeState {
                paint,
                highlight,
                label: paint == Paint::Missed,
            }
        })
        .collect();
    RenderState {
        shapes,
        tooltips: mode == Mode::Inspect,
    }
}

#[derive(Debug, Clone)]
struct DrawnShape {
    id: ShapeId,
    centroid: Point,
    fill: String,
    labelled: bool,
}

pub struct MapView<S: RenderSurface> {
    atlas: Atlas,
    params: MapParams,
    projection: Projection,
    surface: S,
    shapes: Vec<DrawnShape>,
    by_name: HashMap<String, usize>,
    quiz: Quiz,
    mode: Mode,
    location: Option<(LocationFix, LocationReport)>,
}

impl<S: RenderSurface> MapView<S> {
    /// Project the atlas once and draw one shape per neighborhood. The
    /// quiz is built over exactly those neighborhoods, shuffled by `rng`.
    pub fn mount(atlas: Atlas, mut surface: S, params: MapParams, rng: Pcg32) -> Self {
        let quiz = Quiz::with_rng(atlas.names(), rng);
        let projection = Projection::fit(
            params.projection,
            atlas.iter().flat_map(|n| n.rings()),
            params.width,
            params.height,
        );
        let mut shapes = Vec::with_capacity(atlas.len());
        let mut by_name = HashMap::with_capacity(atlas.len());
        for (i, n) in atlas.iter().enumerate() {
            let path = path_data(&projection.project_rings(n.rings()));
            let fill = params.palette.default_fill.clone();
            let id = surface.add_shape(n.name(), &path, &fill, &params.palette.stroke);
            shapes.push(DrawnShape {
                id,
                centroid: projection.project(n.centroid()),
                fill,
                labelled: false,
            });
            by_name.insert(n.name().to_string(), i);
        }
        tracing::debug!(shapes = shapes.len(), scale = projection.scale, "map mounted");
        Self {
            atlas,
            params,
            projection,
            surface,
            shapes,
            by_name,
            quiz,
            mode: Mode::default(),
            location: None,
        }
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            self.mode = mode;
            self.surface.hide_tooltip();
            tracing::debug!(?mode, "mode changed");
        }
    }

    pub fn location(&self) -> Option<&LocationReport> {
        self.location.as_ref().map(|(_, r)| r)
    }

    pub fn fix(&self) -> Option<&LocationFix> {
        self.location.as_ref().map(|(f, _)| f)
    }

    pub fn start(&mut self) -> QuizEvent {
        let ev = self.quiz.start();
        self.refresh();
        ev
    }

    pub fn skip(&mut self) -> QuizEvent {
        let ev = self.quiz.skip();
        self.refresh();
        ev
    }

    pub fn end(&mut self) -> QuizEvent {
        let ev = self.quiz.end();
        self.refresh();
        ev
    }

    /// Pointer click on a shape.
    pub fn click(&mut self, name: &str) -> QuizEvent {
        if self.mode != Mode::Quiz || !self.quiz.is_active() {
            return QuizEvent::Ignored;
        }
        let ev = self.quiz.guess(name);
        if ev != QuizEvent::Ignored {
            self.refresh();
        }
        ev
    }

    /// Pointer entered or moved over a shape.
    pub fn hover(&mut self, name: &str, pointer: Point) {
        let Some(&i) = self.by_name.get(name) else {
            return;
        };
        self.surface.set_opacity(self.shapes[i].id, HOVER_OPACITY);
        if self.mode == Mode::Inspect {
            self.surface.show_tooltip(pointer, name);
        }
    }

    /// Pointer left a shape.
    pub fn leave(&mut self, name: &str) {
        let Some(&i) = self.by_name.get(name) else {
            return;
        };
        self.surface.set_opacity(self.shapes[i].id, 1.0);
        self.surface.hide_tooltip();
    }

    /// Draw the fix and highlight the neighborhoods it falls in or
    /// near.
    pub fn show_location(&mut self, fix: LocationFix) -> LocationReport {
        let report = report_for(&self.atlas, &fix, self.params.circle_step_deg);
        let radius = fix
            .accuracy
            .filter(|a| *a > 0.0)
            .unwrap_or(self.params.marker_radius_m);
        let circle = accuracy_circle(fix.latitude, fix.longitude, radius, self.params.circle_step_deg);
        let projected = self.projection.project_rings(std::slice::from_ref(&circle));
        let marker = LocationMarker {
            path: path_data(&projected),
            fill: self.params.palette.location_fill.clone(),
        };
        self.surface.set_location_marker(Some(&marker));
        self.location = Some((fix, report.clone()));
        self.refresh();
        report
    }

    pub fn clear_location(&mut self) {
        if self.location.take().is_some() {
            self.surface.set_location_marker(None);
            self.refresh();
        }
    }

    pub fn render_state(&self) -> RenderState {
        derive_render_state(&self.atlas, &self.quiz, self.location(), self.mode)
    }

    /// Derive the current state and apply it.
    pub fn refresh(&mut self) {
        let state = self.render_state();
        self.repaint(&state);
    }

    /// Apply `state` to the existing shapes. Shapes are never
    /// recreated; only fills and labels that changed are touched.
    pub fn repaint(&mut self, state: &RenderState) {
        for ((shape, wanted), hood) in self
            .shapes
            .iter_mut()
            .zip(&state.shapes)
            .zip(self.atlas.iter())
        {
            let fill = wanted.fill(&self.params.palette);
            if shape.fill != fill {
                self.surface.set_fill(shape.id, fill);
                shape.fill = fill.to_string();
            }
            if shape.labelled != wanted.label {
                let label = wanted.label.then_some((shape.centroid, hood.name()));
                self.surface.set_label(shape.id, label);
                shape.labelled = wanted.label;
            }
        }
        if !state.tooltips {
            self.surface.hide_tooltip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::tests::{cell, strip};
    use crate::quiz::Next;
    use crate::svg::SvgSurface;

    fn view() -> MapView<SvgSurface> {
        MapView::mount(strip(), SvgSurface::new(), MapParams::default(), Pcg32::new(5, 5))
    }

    fn fill_of(v: &MapView<SvgSurface>, name: &str) -> String {
        v.surface()
            .shape_named(name)
            .expect("shape")
            .fill
            .clone()
    }

    #[test]
    fn mount_draws_one_shape_each_in_default_fill() {
        let v = view();
        let palette = Palette::default();
        assert_eq!(v.surface().shapes().len(), 3);
        for name in ["Sunset", "Haight", "Mission"] {
            assert_eq!(fill_of(&v, name), palette.default_fill);
            let shape = v.surface().shape_named(name).expect("shape");
            assert!(shape.path.starts_with('M'));
            assert_eq!(shape.stroke, palette.stroke);
        }
    }

    #[test]
    fn quiz_covers_exactly_the_drawn_shapes() {
        let mut v = view();
        let drawn: Vec<&str> = v.surface().shapes().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(v.quiz().universe(), drawn.as_slice());

        v.start();
        let mut asked = 0;
        while let Some(t) = v.quiz().current().map(str::to_string) {
            assert!(v.surface().shape_named(&t).is_some());
            v.click(&t);
            v.click(&t);
            asked += 1;
        }
        assert_eq!(asked, 3);
    }

    #[test]
    fn clicks_before_start_are_inert() {
        let mut v = view();
        assert_eq!(v.click("Sunset"), QuizEvent::Ignored);
        assert_eq!(v.quiz().selected(), None);
    }

    #[test]
    fn click_flow_repaints_without_new_shapes() {
        let mut v = view();
        let palette = Palette::default();
        v.start();
        let target = v.quiz().current().expect("target").to_string();

        v.click(&target);
        assert_eq!(fill_of(&v, &target), palette.selected_fill);

        let ev = v.click(&target);
        assert!(matches!(ev, QuizEvent::Judged { correct: true, .. }));
        assert_eq!(fill_of(&v, &target), palette.correct_fill);
        assert_eq!(v.surface().shapes().len(), 3);
        assert_eq!(v.surface().adds(), 3);
    }

    #[test]
    fn missed_target_gets_label_at_centroid() {
        let mut v = view();
        let palette = Palette::default();
        v.start();
        let target = v.quiz().current().expect("target").to_string();
        let wrong = v
            .quiz()
            .remaining()
            .next()
            .expect("other")
            .to_string();
        v.click(&wrong);
        v.click(&wrong);

        let shape = v.surface().shape_named(&target).expect("shape");
        assert_eq!(shape.fill, palette.missed_fill);
        let (at, text) = shape.label.clone().expect("label");
        assert_eq!(text, target);
        let expected = v
            .projection()
            .project(v.atlas().get(&target).expect("hood").centroid());
        assert_eq!(at, expected);

        // A new round clears the board and its labels.
        v.start();
        let shape = v.surface().shape_named(&target).expect("shape");
        assert!(shape.label.is_none());
        assert_ne!(shape.fill, palette.missed_fill);
    }

    #[test]
    fn round_completion_through_view() {
        let mut v = view();
        let mut complete = None;
        if let QuizEvent::Started(Next::Target(_)) = v.start() {
            while let Some(t) = v.quiz().current().map(str::to_string) {
                v.click(&t);
                if let QuizEvent::Judged {
                    next: Next::Complete(s),
                    ..
                } = v.click(&t)
                {
                    complete = Some(s);
                }
            }
        }
        let summary = complete.expect("summary");
        assert_eq!(summary.score, 100.0);
        assert_eq!(v.click("Sunset"), QuizEvent::Ignored);
    }

    #[test]
    fn quiz_mode_hover_hides_names() {
        let mut v = view();
        v.start();
        v.hover("Haight", (10.0, 20.0));
        let shape = v.surface().shape_named("Haight").expect("shape");
        assert_eq!(shape.opacity, HOVER_OPACITY);
        assert!(v.surface().tooltip().is_none());
        v.leave("Haight");
        assert_eq!(v.surface().shape_named("Haight").expect("shape").opacity, 1.0);
    }

    #[test]
    fn inspect_mode_shows_tooltip_and_ignores_clicks() {
        let mut v = view();
        v.start();
        v.set_mode(Mode::Inspect);
        let target = v.quiz().current().expect("target").to_string();
        assert_eq!(v.click(&target), QuizEvent::Ignored);
        assert_eq!(v.quiz().selected(), None);

        v.hover("Mission", (42.0, 7.0));
        assert_eq!(
            v.surface().tooltip(),
            Some(&((42.0, 7.0), "Mission".to_string()))
        );
        v.leave("Mission");
        assert!(v.surface().tooltip().is_none());

        v.hover("Mission", (42.0, 7.0));
        v.set_mode(Mode::Quiz);
        assert!(v.surface().tooltip().is_none());
    }

    #[test]
    fn hover_unknown_name_is_ignored() {
        let mut v = view();
        v.hover("Atlantis", (0.0, 0.0));
        v.leave("Atlantis");
        assert!(v.surface().shapes().iter().all(|s| s.opacity == 1.0));
    }

    #[test]
    fn location_highlights_and_marker() {
        let mut v = view();
        let palette = Palette::default();
        let report = v.show_location(LocationFix {
            latitude: 37.755,
            longitude: -122.439,
            accuracy: Some(200.0),
        });
        assert_eq!(report.current.as_deref(), Some("Haight"));
        assert_eq!(report.nearby, vec!["Sunset".to_string()]);
        assert_eq!(fill_of(&v, "Haight"), palette.located_fill);
        assert_eq!(fill_of(&v, "Sunset"), palette.nearby_fill);
        assert_eq!(fill_of(&v, "Mission"), palette.default_fill);
        let marker = v.surface().marker().expect("marker");
        assert_eq!(marker.fill, palette.location_fill);
        assert!(marker.path.starts_with('M'));

        assert_eq!(v.fix().and_then(|f| f.accuracy), Some(200.0));
        v.clear_location();
        assert!(v.fix().is_none());
        assert!(v.surface().marker().is_none());
        assert_eq!(fill_of(&v, "Haight"), palette.default_fill);
    }

    #[test]
    fn quiz_paint_wins_over_location_highlight() {
        let mut v = view();
        let palette = Palette::default();
        v.start();
        let target = v.quiz().current().expect("target").to_string();
        v.click(&target);
        let c = v.atlas().get(&target).expect("hood").centroid();
        v.show_location(LocationFix {
            latitude: c.1,
            longitude: c.0,
            accuracy: None,
        });
        assert_eq!(fill_of(&v, &target), palette.selected_fill);
    }

    #[test]
    fn empty_atlas_draws_nothing_and_completes() {
        let mut v = MapView::mount(
            Atlas::default(),
            SvgSurface::new(),
            MapParams::default(),
            Pcg32::new(1, 1),
        );
        assert!(v.surface().shapes().is_empty());
        match v.start() {
            QuizEvent::Started(Next::Complete(s)) => assert_eq!(s.score, 100.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn derived_state_is_pure() {
        let atlas = Atlas::new(vec![cell("A", 0.0, 0.0, 1.0), cell("B", 1.0, 0.0, 1.0)])
            .expect("atlas");
        let quiz = Quiz::with_rng(atlas.names(), Pcg32::new(3, 3));
        let a = derive_render_state(&atlas, &quiz, None, Mode::Inspect);
        let b = derive_render_state(&atlas, &quiz, None, Mode::Inspect);
        assert_eq!(a, b);
        assert!(a.tooltips);
        assert!(a
            .shapes
            .iter()
            .all(|s| s.paint == Paint::Default && s.highlight == Highlight::None && !s.label));
    }
}
