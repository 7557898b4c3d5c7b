//! Marker descriptors, picking, and single-selection state.

use glam::{Vec2, Vec3};
use terra_camera::{Camera, GLOBE_RADIUS, polar_to_cartesian};
use tracing::{debug, info};

use crate::event::{EventKind, EventRecord};
use crate::panel::{DetailPanel, PanelBounds};

/// Base height of every marker above the surface, in globe radii.
pub const BASE_ALTITUDE: f64 = 0.05;
/// Extra height per severity level, in globe radii.
pub const ALTITUDE_PER_SEVERITY: f64 = 0.05;

/// Linear RGBA colors per event category. The surface is sRGB, so these are
/// the CSS named colors decoded to linear light.
pub mod colors {
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    /// CSS `green` (0, 128, 0).
    pub const GREEN: [f32; 4] = [0.0, 0.216, 0.0, 1.0];
    /// CSS `orange` (255, 165, 0).
    pub const ORANGE: [f32; 4] = [1.0, 0.376, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

impl EventKind {
    /// Marker color for this category.
    pub fn color(self) -> [f32; 4] {
        match self {
            Self::Wildfire => colors::RED,
            Self::Flood => colors::BLUE,
            Self::Hurricane => colors::GREEN,
            Self::Earthquake => colors::ORANGE,
            Self::Other => colors::WHITE,
        }
    }
}

/// Marker height above the surface for a severity level.
pub fn marker_altitude(severity: u8) -> f64 {
    BASE_ALTITUDE + f64::from(severity) * ALTITUDE_PER_SEVERITY
}

/// Render-ready description of one marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerDescriptor {
    pub lat: f64,
    pub lng: f64,
    pub color: [f32; 4],
    /// Height above the surface in globe radii.
    pub altitude: f64,
}

impl MarkerDescriptor {
    /// Derive the descriptor for `record`.
    pub fn from_record(record: &EventRecord) -> Self {
        Self {
            lat: record.lat,
            lng: record.lon,
            color: record.kind.color(),
            altitude: marker_altitude(record.severity),
        }
    }

    /// Unit surface normal under the marker.
    pub fn surface_normal(&self) -> Vec3 {
        polar_to_cartesian(self.lng, self.lat).as_vec3()
    }

    /// World-space position of the marker tip.
    pub fn tip(&self) -> Vec3 {
        self.surface_normal() * GLOBE_RADIUS * (1.0 + self.altitude as f32)
    }
}

/// Outcome of an input event for the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Selected,
    Cleared,
}

impl SelectionChange {
    /// Whether observers should be notified.
    pub fn changed(self) -> bool {
        self != Self::Unchanged
    }
}

/// Event markers plus the at-most-one selected record.
#[derive(Debug, Default)]
pub struct MarkerOverlay {
    records: Vec<EventRecord>,
    markers: Vec<MarkerDescriptor>,
    selected: Option<usize>,
    panel: Option<DetailPanel>,
    rendered_bounds: Option<PanelBounds>,
    generation: u64,
}

impl MarkerOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the event list and re-derive every marker from scratch.
    ///
    /// A selection survives only if a record with the same id is still
    /// present; otherwise it is cleared.
    pub fn replace_events(&mut self, records: Vec<EventRecord>) -> SelectionChange {
        let previous_id = self.selected().map(|r| r.id.clone());
        self.markers = records.iter().map(MarkerDescriptor::from_record).collect();
        self.records = records;
        self.generation += 1;
        info!(
            count = self.records.len(),
            generation = self.generation,
            "event markers rebuilt"
        );

        let Some(id) = previous_id else {
            return SelectionChange::Unchanged;
        };
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => {
                self.selected = Some(index);
                self.panel = Some(DetailPanel::for_record(&self.records[index]));
                SelectionChange::Unchanged
            }
            None => {
                debug!(%id, "selected event no longer present");
                self.clear_selection()
            }
        }
    }

    /// Select the marker at `index`, replacing any previous selection.
    pub fn select(&mut self, index: usize) -> SelectionChange {
        let Some(record) = self.records.get(index) else {
            return SelectionChange::Unchanged;
        };
        let panel = DetailPanel::for_record(record);
        info!(id = %record.id, "{}", panel.summary_line());
        self.selected = Some(index);
        self.panel = Some(panel);
        self.rendered_bounds = None;
        SelectionChange::Selected
    }

    /// Drop the selection, if any.
    pub fn clear_selection(&mut self) -> SelectionChange {
        self.rendered_bounds = None;
        self.panel = None;
        match self.selected.take() {
            Some(_) => SelectionChange::Cleared,
            None => SelectionChange::Unchanged,
        }
    }

    /// Pointer pressed at `point` (window pixels). Clears the selection
    /// unless the press lands inside the last rendered panel.
    pub fn pointer_down(&mut self, point: Vec2) -> SelectionChange {
        if self.selected.is_none() {
            return SelectionChange::Unchanged;
        }
        if self.rendered_bounds.is_some_and(|b| b.contains(point)) {
            return SelectionChange::Unchanged;
        }
        self.clear_selection()
    }

    /// Record where the panel was last drawn.
    pub fn set_rendered_bounds(&mut self, bounds: PanelBounds) {
        if self.panel.is_some() {
            self.rendered_bounds = Some(bounds);
        }
    }

    /// Index of the marker whose tip is closest to `cursor` within
    /// `radius_px`, ignoring markers on the far side of the globe.
    pub fn pick(
        &self,
        camera: &Camera,
        viewport: Vec2,
        cursor: Vec2,
        radius_px: f32,
    ) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| camera.sees_surface_point(m.surface_normal()))
            .filter_map(|(i, m)| {
                let screen = camera.project_to_screen(m.tip(), viewport.x, viewport.y)?;
                let distance = screen.distance(cursor);
                (distance <= radius_px).then_some((i, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Short label shown while hovering a marker.
    pub fn hover_label(&self, index: usize) -> Option<String> {
        self.records
            .get(index)
            .map(|r| format!("{}: {} / Severity: {}", r.name, r.kind, r.severity))
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn markers(&self) -> &[MarkerDescriptor] {
        &self.markers
    }

    /// Incremented on every replacement so renderers know when to re-upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The selected record.
    pub fn selected(&self) -> Option<&EventRecord> {
        self.selected.and_then(|i| self.records.get(i))
    }

    /// Panel for the selected record.
    pub fn panel(&self) -> Option<&DetailPanel> {
        self.panel.as_ref()
    }

    /// Bounds recorded by the last panel draw.
    pub fn rendered_bounds(&self) -> Option<PanelBounds> {
        self.rendered_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_camera::GlobeOrientation;

    fn event(id: &str, kind: EventKind, severity: u8, lat: f64, lon: f64) -> EventRecord {
        EventRecord {
            id: id.into(),
            lat,
            lon,
            name: format!("place {id}"),
            kind,
            severity,
            contacts: vec!["911".into()],
            timestamp: String::new(),
            people_affected: 10,
        }
    }

    fn panel_bounds() -> PanelBounds {
        PanelBounds {
            x: 20.0,
            y: 20.0,
            width: 240.0,
            height: 132.0,
        }
    }

    #[test]
    fn test_color_by_kind() {
        assert_eq!(EventKind::Wildfire.color(), colors::RED);
        assert_eq!(EventKind::Flood.color(), colors::BLUE);
        assert_eq!(EventKind::Hurricane.color(), colors::GREEN);
        assert_eq!(EventKind::Earthquake.color(), colors::ORANGE);
        assert_eq!(EventKind::Other.color(), colors::WHITE);
    }

    fn encode_srgb(color: [f32; 4]) -> [u8; 3] {
        let encode = |c: f32| {
            let s = if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            };
            (s * 255.0).round() as u8
        };
        [encode(color[0]), encode(color[1]), encode(color[2])]
    }

    #[test]
    fn test_colors_encode_to_css_names() {
        assert_eq!(encode_srgb(colors::RED), [255, 0, 0]);
        assert_eq!(encode_srgb(colors::BLUE), [0, 0, 255]);
        assert_eq!(encode_srgb(colors::GREEN), [0, 128, 0]);
        assert_eq!(encode_srgb(colors::ORANGE), [255, 165, 0]);
        assert_eq!(encode_srgb(colors::WHITE), [255, 255, 255]);
    }

    #[test]
    fn test_altitude_by_severity() {
        assert!((marker_altitude(1) - 0.10).abs() < 1e-12);
        assert!((marker_altitude(5) - 0.30).abs() < 1e-12);
    }

    #[test]
    fn test_one_marker_per_record() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![
            event("a", EventKind::Flood, 2, 0.0, 0.0),
            event("b", EventKind::Wildfire, 3, 10.0, 10.0),
        ]);
        assert_eq!(overlay.markers().len(), 2);
        assert_eq!(overlay.markers()[1].color, colors::RED);
        assert_eq!(overlay.generation(), 1);

        overlay.replace_events(Vec::new());
        assert!(overlay.markers().is_empty());
        assert_eq!(overlay.generation(), 2);
    }

    #[test]
    fn test_click_replaces_selection() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![
            event("a", EventKind::Flood, 2, 0.0, 0.0),
            event("b", EventKind::Wildfire, 3, 10.0, 10.0),
        ]);
        assert_eq!(overlay.select(0), SelectionChange::Selected);
        assert_eq!(overlay.select(1), SelectionChange::Selected);
        assert_eq!(overlay.selected().unwrap().id, "b");
        assert_eq!(overlay.panel().unwrap().title, "place b");
    }

    #[test]
    fn test_select_out_of_range_is_noop() {
        let mut overlay = MarkerOverlay::new();
        assert_eq!(overlay.select(3), SelectionChange::Unchanged);
        assert!(overlay.selected().is_none());
    }

    #[test]
    fn test_pointer_down_outside_panel_clears() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![event("a", EventKind::Flood, 2, 0.0, 0.0)]);
        overlay.select(0);
        overlay.set_rendered_bounds(panel_bounds());

        assert_eq!(
            overlay.pointer_down(Vec2::new(100.0, 100.0)),
            SelectionChange::Unchanged
        );
        assert!(overlay.selected().is_some());

        assert_eq!(
            overlay.pointer_down(Vec2::new(600.0, 400.0)),
            SelectionChange::Cleared
        );
        assert!(overlay.selected().is_none());
        assert!(overlay.panel().is_none());
        assert_eq!(
            overlay.pointer_down(Vec2::new(600.0, 400.0)),
            SelectionChange::Unchanged
        );
    }

    #[test]
    fn test_replacement_keeps_selection_by_id() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![
            event("a", EventKind::Flood, 2, 0.0, 0.0),
            event("b", EventKind::Wildfire, 3, 10.0, 10.0),
        ]);
        overlay.select(1);
        let change = overlay.replace_events(vec![event("b", EventKind::Wildfire, 4, 10.0, 10.0)]);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(overlay.selected().unwrap().severity, 4);
        assert_eq!(overlay.panel().unwrap().severity, "4");
    }

    #[test]
    fn test_replacement_drops_missing_selection() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![event("a", EventKind::Flood, 2, 0.0, 0.0)]);
        overlay.select(0);
        let change = overlay.replace_events(vec![event("z", EventKind::Flood, 2, 0.0, 0.0)]);
        assert_eq!(change, SelectionChange::Cleared);
        assert!(overlay.selected().is_none());
    }

    #[test]
    fn test_pick_nearest_front_marker() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![
            event("front", EventKind::Earthquake, 5, 0.0, 0.0),
            event("back", EventKind::Flood, 5, 0.0, 180.0),
            event("side", EventKind::Flood, 1, 0.0, 20.0),
        ]);
        let mut camera = Camera::default();
        camera.look_at_globe(GlobeOrientation::new(0.0, 0.0), 2.5);
        let viewport = Vec2::new(800.0, 600.0);
        let center = Vec2::new(400.0, 300.0);

        assert_eq!(overlay.pick(&camera, viewport, center, 8.0), Some(0));
        // The far-side marker projects to the same pixel but is hidden.
        overlay.replace_events(vec![event("back", EventKind::Flood, 5, 0.0, 180.0)]);
        assert_eq!(overlay.pick(&camera, viewport, center, 8.0), None);
    }

    #[test]
    fn test_pick_respects_radius() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![event("a", EventKind::Flood, 1, 0.0, 0.0)]);
        let camera = Camera::default();
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(
            overlay.pick(&camera, viewport, Vec2::new(450.0, 300.0), 8.0),
            None
        );
    }

    #[test]
    fn test_hover_label() {
        let mut overlay = MarkerOverlay::new();
        overlay.replace_events(vec![event("a", EventKind::Hurricane, 4, 0.0, 0.0)]);
        assert_eq!(
            overlay.hover_label(0).unwrap(),
            "place a: hurricane / Severity: 4"
        );
        assert!(overlay.hover_label(1).is_none());
    }
}
