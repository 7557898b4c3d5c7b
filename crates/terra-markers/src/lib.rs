//! Geolocated event markers: parsing, render descriptors, selection, and the
//! detail panel shown for the selected event.

pub mod event;
pub mod feed;
pub mod overlay;
pub mod panel;
pub mod summary;

pub use event::{EventError, EventKind, EventRecord, load_events_file, parse_events};
pub use feed::{EventFeed, EventPublisher, spawn_file_source};
pub use overlay::{MarkerDescriptor, MarkerOverlay, SelectionChange, colors, marker_altitude};
pub use panel::{DetailPanel, PanelBounds};
pub use summary::{EventSummary, format_count};
