//! Fixed-position detail panel for the selected event.

use glam::Vec2;

use crate::event::EventRecord;

/// Distance of the panel from the top-left window corner in pixels.
pub const PANEL_MARGIN_PX: f32 = 20.0;
/// Maximum panel width in pixels.
pub const PANEL_MAX_WIDTH_PX: f32 = 240.0;
/// Inner padding in pixels.
pub const PANEL_PADDING_PX: f32 = 12.0;
/// Height of one text line in pixels.
pub const PANEL_LINE_HEIGHT_PX: f32 = 18.0;

/// Axis-aligned screen rectangle in window pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelBounds {
    /// Whether `point` lies inside the rectangle, edges included.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Text content of the detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub title: String,
    pub coordinates: String,
    pub kind: String,
    pub severity: String,
    pub people_affected: String,
    pub contacts: String,
}

impl DetailPanel {
    /// Build the panel for `record`.
    pub fn for_record(record: &EventRecord) -> Self {
        let title = if record.name.is_empty() {
            "Unknown Location".to_string()
        } else {
            record.name.clone()
        };
        Self {
            title,
            coordinates: format!("{:.2}, {:.2}", record.lat, record.lon),
            kind: record.kind.to_string(),
            severity: record.severity.to_string(),
            people_affected: record.people_affected.to_string(),
            contacts: record.contacts.join(", "),
        }
    }

    /// Labelled lines in display order, title first.
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            format!("Coordinates: {}", self.coordinates),
            format!("Type: {}", self.kind),
            format!("Severity: {}", self.severity),
            format!("People Affected: {}", self.people_affected),
            format!("Contacts: {}", self.contacts),
        ]
    }

    /// Single-line form for the window title and logs.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} | Severity: {} | People Affected: {}",
            self.title, self.coordinates, self.kind, self.severity, self.people_affected
        )
    }

    /// Screen rectangle the panel occupies in a `window_width` wide window.
    pub fn layout(&self, window_width: f32) -> PanelBounds {
        let available = (window_width - 2.0 * PANEL_MARGIN_PX).max(0.0);
        let lines = self.lines().len() as f32;
        PanelBounds {
            x: PANEL_MARGIN_PX,
            y: PANEL_MARGIN_PX,
            width: PANEL_MAX_WIDTH_PX.min(available),
            height: lines * PANEL_LINE_HEIGHT_PX + 2.0 * PANEL_PADDING_PX,
        }
    }
}
