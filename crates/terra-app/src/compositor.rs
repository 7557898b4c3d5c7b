//! Per-frame orchestration of the globe scene.
//!
//! Each frame runs in a fixed order: advance the simulated clock, recompute
//! the sub-solar point, advance the camera motion, write the shader uniforms
//! and camera, pick up new imagery or a replaced event list, then draw.
//! Pointer input arrives between frames and is applied immediately.

use glam::Vec2;
use terra_camera::{Camera, CameraMotionController, GlobeOrientation, MotionConfig};
use terra_config::Config;
use terra_markers::{
    EventFeed, EventRecord, EventSummary, MarkerDescriptor, MarkerOverlay, SelectionChange,
};
use terra_render::{
    SceneFrame, SceneRenderer, ShaderUniforms, SurfaceError, TextureLoader, TextureSet,
};
use terra_sun::{SimulatedClock, SolarError, SubSolarPoint};
use tracing::{debug, info, warn};

/// Where a finished frame goes. The window uses the GPU renderer.
pub trait FrameSink {
    /// Replace the placeholder imagery.
    fn set_textures(&mut self, textures: &TextureSet);
    /// Replace every marker.
    fn upload_markers(&mut self, markers: &[MarkerDescriptor]);
    /// Draw one frame.
    fn draw(&mut self, frame: &SceneFrame) -> Result<(), SurfaceError>;
}

impl FrameSink for SceneRenderer {
    fn set_textures(&mut self, textures: &TextureSet) {
        SceneRenderer::set_textures(self, textures);
    }

    fn upload_markers(&mut self, markers: &[MarkerDescriptor]) {
        SceneRenderer::upload_markers(self, markers);
    }

    fn draw(&mut self, frame: &SceneFrame) -> Result<(), SurfaceError> {
        self.render(frame)
    }
}

/// Invoked with the new selection, or `None` when it is cleared.
pub type SelectionCallback = Box<dyn FnMut(Option<&EventRecord>)>;

/// Tunables taken from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorSettings {
    pub motion: MotionConfig,
    pub initial_orientation: GlobeOrientation,
    pub altitude: f64,
    /// `None` starts the clock at the wall-clock time.
    pub start_ms: Option<i64>,
    pub time_step_ms: i64,
    pub pick_radius_px: f32,
    /// Degrees per dragged pixel.
    pub pan_sensitivity: f64,
    /// Fractional altitude change per wheel line.
    pub zoom_sensitivity: f64,
    /// Initial surface size in pixels.
    pub viewport: (u32, u32),
}

impl CompositorSettings {
    pub fn from_config(config: &Config) -> Self {
        let m = &config.motion;
        Self {
            motion: MotionConfig {
                rotate_speed: m.rotate_speed,
                return_speed: m.return_speed,
                min_altitude: m.min_altitude,
                max_altitude: m.max_altitude,
            },
            initial_orientation: GlobeOrientation::new(m.initial_lng, m.initial_lat),
            altitude: m.altitude,
            start_ms: config.clock.start_ms,
            time_step_ms: config.clock.time_step_ms,
            pick_radius_px: config.markers.pick_radius_px,
            pan_sensitivity: m.pan_sensitivity,
            zoom_sensitivity: m.zoom_sensitivity,
            viewport: (config.window.width, config.window.height),
        }
    }
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Owns every piece of per-frame state. Each field has exactly one writer.
pub struct Compositor {
    clock: SimulatedClock,
    sun: SubSolarPoint,
    motion: CameraMotionController,
    camera: Camera,
    uniforms: ShaderUniforms,
    overlay: MarkerOverlay,
    summary: EventSummary,
    feed: EventFeed,
    textures: TextureLoader,
    viewport: Vec2,
    hovered_marker: Option<usize>,
    on_selection: Option<SelectionCallback>,
    pick_radius_px: f32,
    pan_sensitivity: f64,
    zoom_sensitivity: f64,
}

impl Compositor {
    pub fn new(settings: CompositorSettings, feed: EventFeed, textures: TextureLoader) -> Self {
        let clock = match settings.start_ms {
            Some(start) => SimulatedClock::new(start, settings.time_step_ms),
            None => SimulatedClock::starting_now(settings.time_step_ms),
        };
        let sun = clock.sub_solar_point().unwrap_or(SubSolarPoint {
            longitude: 0.0,
            latitude: 0.0,
        });
        let motion = CameraMotionController::new(
            settings.motion,
            settings.initial_orientation,
            settings.altitude,
        );

        let mut compositor = Self {
            clock,
            sun,
            motion,
            camera: Camera::default(),
            uniforms: ShaderUniforms::default(),
            overlay: MarkerOverlay::new(),
            summary: EventSummary::default(),
            feed,
            textures,
            viewport: Vec2::ONE,
            hovered_marker: None,
            on_selection: None,
            pick_radius_px: settings.pick_radius_px,
            pan_sensitivity: settings.pan_sensitivity,
            zoom_sensitivity: settings.zoom_sensitivity,
        };
        compositor.resize(settings.viewport.0, settings.viewport.1);
        compositor.apply_view();
        info!(
            start_ms = compositor.clock.now_ms(),
            step_ms = compositor.clock.step_ms(),
            "compositor ready"
        );
        compositor
    }

    /// Apply tunables that may change while running. Orientation, clock and
    /// viewport keep their current values.
    pub fn apply_settings(&mut self, settings: &CompositorSettings) {
        self.motion.set_config(settings.motion);
        self.pick_radius_px = settings.pick_radius_px;
        self.pan_sensitivity = settings.pan_sensitivity;
        self.zoom_sensitivity = settings.zoom_sensitivity;
        self.apply_view();
        info!(
            rotate_speed = settings.motion.rotate_speed,
            return_speed = settings.motion.return_speed,
            "motion settings applied"
        );
    }

    /// Register the selection observer, replacing any previous one.
    pub fn on_selection_changed(&mut self, callback: SelectionCallback) {
        self.on_selection = Some(callback);
    }

    /// Run one frame and hand it to `sink`.
    pub fn frame<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), SurfaceError> {
        self.clock.advance();
        self.update_sun(self.clock.sub_solar_point());
        self.motion.update();
        self.apply_view();

        if let Some(Ok(textures)) = self.textures.poll() {
            sink.set_textures(&textures);
        }
        if let Some(records) = self.feed.drain_latest() {
            self.replace_events(records);
            sink.upload_markers(self.overlay.markers());
        }

        let panel = self.overlay.panel().map(|p| p.layout(self.viewport.x));
        let frame = SceneFrame {
            view_proj: self.camera.view_projection_matrix(),
            view: self.camera.view_matrix(),
            shader: self.uniforms,
            panel,
        };
        sink.draw(&frame)?;
        if let Some(bounds) = panel {
            self.overlay.set_rendered_bounds(bounds);
        }
        Ok(())
    }

    /// A failed solar computation keeps the last valid sun position.
    fn update_sun(&mut self, result: Result<SubSolarPoint, SolarError>) {
        match result {
            Ok(point) => self.sun = point,
            Err(e) => warn!("keeping previous sun position: {e}"),
        }
    }

    fn replace_events(&mut self, records: Vec<EventRecord>) {
        self.hovered_marker = None;
        let change = self.overlay.replace_events(records);
        self.summary = EventSummary::from_records(self.overlay.records());
        debug!("{}", self.summary.format());
        self.notify(change);
    }

    /// Write uniforms and camera for the current orientation and altitude.
    fn apply_view(&mut self) {
        let orientation = self.motion.orientation();
        self.camera.look_at_globe(orientation, self.motion.altitude());
        self.uniforms = ShaderUniforms {
            sun_position: Vec2::new(
                self.sun.normalized_longitude() as f32,
                self.sun.latitude as f32,
            ),
            globe_rotation: Vec2::new(orientation.lng as f32, orientation.lat as f32),
        };
    }

    fn notify(&mut self, change: SelectionChange) {
        if !change.changed() {
            return;
        }
        if let Some(callback) = &mut self.on_selection {
            callback(self.overlay.selected());
        }
    }

    fn pick_at(&self, position: Vec2) -> Option<usize> {
        self.overlay
            .pick(&self.camera, self.viewport, position, self.pick_radius_px)
    }

    /// Surface resized. Zero extents are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        self.camera.set_aspect_ratio(width as f32, height as f32);
    }

    /// Pointer entered the globe view: rotation pauses.
    pub fn pointer_entered(&mut self) {
        self.motion.on_hover_enter();
    }

    /// Pointer left the globe view: rotation resumes.
    pub fn pointer_left(&mut self) {
        self.motion.on_hover_leave();
        self.hovered_marker = None;
    }

    /// Update the hovered marker. Returns `true` when it changed.
    pub fn pointer_moved(&mut self, position: Vec2) -> bool {
        let hovered = self.pick_at(position);
        let changed = hovered != self.hovered_marker;
        self.hovered_marker = hovered;
        changed
    }

    /// Button pressed. Clears the selection unless the press lands on the
    /// panel or on a marker, which the following click will select.
    pub fn pointer_down(&mut self, position: Vec2) {
        if self.pick_at(position).is_some() {
            return;
        }
        let change = self.overlay.pointer_down(position);
        self.notify(change);
    }

    /// Button released in place. Selects the marker under the pointer; a
    /// click on empty globe does nothing.
    pub fn click(&mut self, position: Vec2) {
        if let Some(index) = self.pick_at(position) {
            let change = self.overlay.select(index);
            self.notify(change);
        }
    }

    /// Drag by `delta` pixels. Uniforms update immediately.
    pub fn pan(&mut self, delta: Vec2) {
        let d_lng = -f64::from(delta.x) * self.pan_sensitivity;
        let d_lat = f64::from(delta.y) * self.pan_sensitivity;
        self.motion.pan_by(d_lng, d_lat);
        self.apply_view();
    }

    /// Zoom by wheel `lines`, positive towards the globe.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - self.zoom_sensitivity).powf(f64::from(lines));
        self.motion.zoom_by(factor);
        self.apply_view();
    }

    /// Point the camera at `orientation`. Uniforms update immediately.
    pub fn set_orientation(&mut self, orientation: GlobeOrientation) {
        self.motion.set_orientation(orientation);
        self.apply_view();
    }

    /// Window title text: base, event summary, hover label, selection.
    pub fn hud_title(&self, base: &str) -> String {
        let mut parts = vec![base.to_string(), self.summary.format()];
        if let Some(label) = self.hovered_marker.and_then(|i| self.overlay.hover_label(i)) {
            parts.push(label);
        }
        if let Some(panel) = self.overlay.panel() {
            parts.push(panel.summary_line());
        }
        parts.join(" | ")
    }

    pub fn uniforms(&self) -> ShaderUniforms {
        self.uniforms
    }

    pub fn sun(&self) -> SubSolarPoint {
        self.sun
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn motion(&self) -> &CameraMotionController {
        &self.motion
    }

    pub fn overlay(&self) -> &MarkerOverlay {
        &self.overlay
    }

    pub fn summary(&self) -> EventSummary {
        self.summary
    }

    pub fn hovered_marker(&self) -> Option<usize> {
        self.hovered_marker
    }

    /// Whether imagery is still being decoded.
    pub fn textures_pending(&self) -> bool {
        self.textures.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use terra_markers::{EventKind, EventPublisher, colors};
    use terra_sun::compute_sub_solar_point;

    const START_MS: i64 = 1_718_900_000_000;

    #[derive(Default)]
    struct RecordingSink {
        textures: u32,
        uploads: Vec<Vec<MarkerDescriptor>>,
        frames: Vec<SceneFrame>,
    }

    impl FrameSink for RecordingSink {
        fn set_textures(&mut self, _textures: &TextureSet) {
            self.textures += 1;
        }

        fn upload_markers(&mut self, markers: &[MarkerDescriptor]) {
            self.uploads.push(markers.to_vec());
        }

        fn draw(&mut self, frame: &SceneFrame) -> Result<(), SurfaceError> {
            self.frames.push(*frame);
            Ok(())
        }
    }

    fn settings() -> CompositorSettings {
        CompositorSettings {
            start_ms: Some(START_MS),
            ..CompositorSettings::default()
        }
    }

    fn compositor() -> (Compositor, EventPublisher) {
        let (feed, publisher) = EventFeed::new();
        let compositor = Compositor::new(settings(), feed, TextureLoader::disabled());
        (compositor, publisher)
    }

    fn record(id: &str, kind: EventKind, severity: u8, lat: f64, lon: f64) -> EventRecord {
        EventRecord {
            id: id.into(),
            lat,
            lon,
            name: format!("Event {id}"),
            kind,
            severity,
            contacts: vec!["911".into()],
            timestamp: String::new(),
            people_affected: 1_500,
        }
    }

    fn recorded_selection(compositor: &mut Compositor) -> Rc<RefCell<Vec<Option<String>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        compositor.on_selection_changed(Box::new(move |record| {
            sink.borrow_mut().push(record.map(|r| r.id.clone()));
        }));
        log
    }

    fn screen_position(compositor: &Compositor, index: usize) -> Vec2 {
        let marker = compositor.overlay().markers()[index];
        let (w, h) = settings().viewport;
        compositor
            .camera()
            .project_to_screen(marker.tip(), w as f32, h as f32)
            .unwrap()
    }

    #[test]
    fn test_frame_advances_clock_then_sun() {
        let (mut compositor, _publisher) = compositor();
        let mut sink = RecordingSink::default();
        compositor.frame(&mut sink).unwrap();

        let expected_ms = START_MS + 60_000;
        assert_eq!(compositor.clock().now_ms(), expected_ms);
        let expected = compute_sub_solar_point(expected_ms as f64).unwrap();
        assert_eq!(compositor.sun(), expected);

        let drawn = sink.frames[0].shader;
        assert_eq!(drawn.sun_position.y, expected.latitude as f32);
        assert_eq!(drawn.sun_position.x, expected.normalized_longitude() as f32);
    }

    #[test]
    fn test_failed_sun_update_keeps_previous_position() {
        let (mut c, _publisher) = compositor();
        let mut sink = RecordingSink::default();
        c.frame(&mut sink).unwrap();
        let before = c.sun();

        c.update_sun(Err(SolarError::InvalidTimestamp(f64::NAN)));
        assert_eq!(c.sun(), before);
        assert_eq!(c.uniforms(), sink.frames[0].shader);

        let later = compute_sub_solar_point((START_MS + 3_600_000) as f64).unwrap();
        c.update_sun(Ok(later));
        assert_eq!(c.sun(), later);
    }

    #[test]
    fn test_apply_settings_keeps_orientation() {
        let (mut c, _publisher) = compositor();
        let before = c.motion().orientation();
        let mut tuned = settings();
        tuned.motion.rotate_speed = 1.0;
        tuned.zoom_sensitivity = 0.5;
        c.apply_settings(&tuned);
        assert_eq!(c.motion().orientation(), before);

        let altitude = c.motion().altitude();
        c.zoom(1.0);
        assert!((c.motion().altitude() - altitude * 0.5).abs() < 1e-9);

        let mut sink = RecordingSink::default();
        c.frame(&mut sink).unwrap();
        assert!((c.motion().orientation().lng - (before.lng + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_frame_writes_orientation_uniform() {
        let (mut compositor, _publisher) = compositor();
        let mut sink = RecordingSink::default();
        compositor.frame(&mut sink).unwrap();

        let o = compositor.motion().orientation();
        assert_eq!(
            sink.frames[0].shader.globe_rotation,
            Vec2::new(o.lng as f32, o.lat as f32)
        );
        // Idle rotation moved the globe from its start.
        assert!((o.lng - 359.9).abs() < 1e-9);
        assert!(o.lat < 30.0);
    }

    #[test]
    fn test_hover_freezes_rotation() {
        let (mut compositor, _publisher) = compositor();
        let mut sink = RecordingSink::default();
        compositor.pointer_entered();
        for _ in 0..10 {
            compositor.frame(&mut sink).unwrap();
        }
        let first = sink.frames[0].shader.globe_rotation;
        assert!(sink.frames.iter().all(|f| f.shader.globe_rotation == first));
        assert_eq!(first, Vec2::new(0.0, 30.0));

        compositor.pointer_left();
        compositor.frame(&mut sink).unwrap();
        assert_ne!(sink.frames.last().unwrap().shader.globe_rotation, first);
    }

    #[test]
    fn test_replaced_list_uploads_once() {
        let (mut compositor, publisher) = compositor();
        let mut sink = RecordingSink::default();
        publisher.publish(vec![
            record("1", EventKind::Wildfire, 3, 10.0, 20.0),
            record("2", EventKind::Flood, 1, -5.0, 40.0),
        ]);
        compositor.frame(&mut sink).unwrap();
        compositor.frame(&mut sink).unwrap();

        assert_eq!(sink.uploads.len(), 1);
        assert_eq!(sink.uploads[0].len(), 2);
        assert_eq!(sink.uploads[0][0].color, colors::RED);
        assert_eq!(compositor.summary().active_events, 2);
        assert_eq!(compositor.summary().people_affected, 3_000);
    }

    #[test]
    fn test_empty_list_renders_no_markers() {
        let (mut compositor, publisher) = compositor();
        let mut sink = RecordingSink::default();
        publisher.publish(vec![record("1", EventKind::Other, 1, 0.0, 0.0)]);
        compositor.frame(&mut sink).unwrap();
        publisher.publish(Vec::new());
        compositor.frame(&mut sink).unwrap();
        assert!(sink.uploads.last().unwrap().is_empty());
        assert!(compositor.overlay().markers().is_empty());
    }

    #[test]
    fn test_earthquake_end_to_end() {
        let (mut compositor, publisher) = compositor();
        let selections = recorded_selection(&mut compositor);
        let mut sink = RecordingSink::default();

        compositor.pointer_entered();
        compositor.set_orientation(GlobeOrientation::new(-122.42, 37.77));
        publisher.publish(vec![record("4", EventKind::Earthquake, 5, 37.77, -122.42)]);
        compositor.frame(&mut sink).unwrap();

        let marker = sink.uploads[0][0];
        assert_eq!(marker.color, colors::ORANGE);
        assert!((marker.altitude - 0.30).abs() < 1e-12);

        // The camera looks straight down on the marker.
        let center = Vec2::new(640.0, 360.0);
        compositor.pointer_down(center);
        compositor.click(center);

        let panel = compositor.overlay().panel().unwrap();
        assert_eq!(panel.coordinates, "37.77, -122.42");
        assert_eq!(panel.severity, "5");
        assert_eq!(*selections.borrow(), vec![Some("4".to_string())]);

        compositor.frame(&mut sink).unwrap();
        let bounds = sink.frames.last().unwrap().panel.unwrap();
        assert_eq!((bounds.x, bounds.y, bounds.width), (20.0, 20.0, 240.0));
    }

    #[test]
    fn test_click_a_then_b_selects_only_b() {
        let (mut compositor, publisher) = compositor();
        let selections = recorded_selection(&mut compositor);
        let mut sink = RecordingSink::default();

        compositor.pointer_entered();
        compositor.set_orientation(GlobeOrientation::new(0.0, 0.0));
        publisher.publish(vec![
            record("a", EventKind::Flood, 2, 0.0, 0.0),
            record("b", EventKind::Hurricane, 4, 20.0, 0.0),
        ]);
        compositor.frame(&mut sink).unwrap();

        let a = screen_position(&compositor, 0);
        let b = screen_position(&compositor, 1);
        compositor.pointer_down(a);
        compositor.click(a);
        compositor.frame(&mut sink).unwrap();
        compositor.pointer_down(b);
        compositor.click(b);

        assert_eq!(compositor.overlay().selected().unwrap().id, "b");
        assert_eq!(
            *selections.borrow(),
            vec![Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn test_pointer_down_outside_panel_clears() {
        let (mut compositor, publisher) = compositor();
        let selections = recorded_selection(&mut compositor);
        let mut sink = RecordingSink::default();

        compositor.pointer_entered();
        compositor.set_orientation(GlobeOrientation::new(0.0, 0.0));
        publisher.publish(vec![record("a", EventKind::Flood, 2, 0.0, 0.0)]);
        compositor.frame(&mut sink).unwrap();
        let a = screen_position(&compositor, 0);
        compositor.pointer_down(a);
        compositor.click(a);
        compositor.frame(&mut sink).unwrap();

        // Inside the drawn panel keeps the selection.
        compositor.pointer_down(Vec2::new(30.0, 30.0));
        assert!(compositor.overlay().selected().is_some());

        // Empty space clears it.
        compositor.pointer_down(Vec2::new(1200.0, 700.0));
        assert!(compositor.overlay().selected().is_none());
        assert_eq!(*selections.borrow(), vec![Some("a".to_string()), None]);
    }

    #[test]
    fn test_click_on_empty_globe_is_noop() {
        let (mut compositor, publisher) = compositor();
        let selections = recorded_selection(&mut compositor);
        let mut sink = RecordingSink::default();
        publisher.publish(vec![record("a", EventKind::Flood, 2, -60.0, 170.0)]);
        compositor.frame(&mut sink).unwrap();

        compositor.pointer_down(Vec2::new(640.0, 360.0));
        compositor.click(Vec2::new(640.0, 360.0));
        assert!(compositor.overlay().selected().is_none());
        assert!(selections.borrow().is_empty());
    }

    #[test]
    fn test_selection_survives_replacement_with_same_id() {
        let (mut compositor, publisher) = compositor();
        let selections = recorded_selection(&mut compositor);
        let mut sink = RecordingSink::default();

        compositor.pointer_entered();
        compositor.set_orientation(GlobeOrientation::new(0.0, 0.0));
        publisher.publish(vec![record("a", EventKind::Flood, 2, 0.0, 0.0)]);
        compositor.frame(&mut sink).unwrap();
        let a = screen_position(&compositor, 0);
        compositor.click(a);

        let mut updated = record("a", EventKind::Flood, 4, 0.0, 0.0);
        updated.people_affected = 9_000;
        publisher.publish(vec![record("z", EventKind::Other, 1, 50.0, 50.0), updated]);
        compositor.frame(&mut sink).unwrap();
        assert_eq!(compositor.overlay().panel().unwrap().severity, "4");
        assert_eq!(selections.borrow().len(), 1);

        publisher.publish(vec![record("z", EventKind::Other, 1, 50.0, 50.0)]);
        compositor.frame(&mut sink).unwrap();
        assert!(compositor.overlay().selected().is_none());
        assert_eq!(selections.borrow().last(), Some(&None));
    }

    #[test]
    fn test_pan_and_zoom_apply_immediately() {
        let (mut compositor, _publisher) = compositor();
        compositor.pointer_entered();
        compositor.set_orientation(GlobeOrientation::new(10.0, 0.0));

        compositor.pan(Vec2::new(40.0, -20.0));
        let rotation = compositor.uniforms().globe_rotation;
        assert!((rotation.x - 0.0).abs() < 1e-4);
        assert!((rotation.y - -5.0).abs() < 1e-4);

        let before = compositor.motion().altitude();
        compositor.zoom(1.0);
        assert!((compositor.motion().altitude() - before * 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_hover_label_in_title() {
        let (mut compositor, publisher) = compositor();
        let mut sink = RecordingSink::default();
        compositor.pointer_entered();
        compositor.set_orientation(GlobeOrientation::new(0.0, 0.0));
        publisher.publish(vec![record("a", EventKind::Wildfire, 3, 0.0, 0.0)]);
        compositor.frame(&mut sink).unwrap();

        assert!(compositor.pointer_moved(screen_position(&compositor, 0)));
        assert_eq!(compositor.hovered_marker(), Some(0));
        assert_eq!(
            compositor.hud_title("Terra"),
            "Terra | Events: 1 | Affected: 1.5K | Event a: wildfire / Severity: 3"
        );
        assert!(!compositor.pointer_moved(screen_position(&compositor, 0)));
    }

    #[test]
    fn test_missing_textures_keep_placeholder() {
        let (feed, _publisher) = EventFeed::new();
        let loader = TextureLoader::spawn(
            std::path::PathBuf::from("/nonexistent/day.png"),
            std::path::PathBuf::from("/nonexistent/night.png"),
        );
        let mut compositor = Compositor::new(settings(), feed, loader);
        let mut sink = RecordingSink::default();
        for _ in 0..500 {
            compositor.frame(&mut sink).unwrap();
            if !compositor.textures_pending() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(!compositor.textures_pending());
        assert_eq!(sink.textures, 0);
    }
}
