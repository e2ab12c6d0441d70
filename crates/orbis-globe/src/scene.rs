//! Per-frame glue between pointer input, the orbit camera and the globe.

use glam::{Vec2, Vec3};
use orbis_camera::{OrbitController, OrbitSettings, intersect_sphere};
use orbis_config::Config;
use orbis_geo::{GeoCoordinate, unproject};
use orbis_input::PointerFrame;
use orbis_shading::{ShadingParams, ShadingState};

use crate::collab::{Category, CursorSink, ItemCatalog, ItemId, LoadingSink, SelectionSink};
use crate::globe::Globe;
use crate::marker::MarkerStyle;

/// Globe, camera and shading state for one view.
#[derive(Debug)]
pub struct Scene {
    pub globe: Globe,
    pub camera: OrbitController,
    pub shading: ShadingState,
    viewport: Vec2,
}

impl Scene {
    pub fn new(config: &Config) -> Self {
        let mut camera = OrbitController::new(OrbitSettings::from(&config.camera));
        let viewport = Vec2::new(config.window.width as f32, config.window.height as f32);
        camera.set_viewport(viewport.x, viewport.y);
        Self {
            globe: Globe::new(&config.globe, MarkerStyle::from(&config.markers)),
            camera,
            shading: ShadingState::from_config(&config.shading, config.globe.sun_position),
            viewport,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Track a surface resize in physical pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        self.camera.set_viewport(self.viewport.x, self.viewport.y);
    }

    /// Apply one frame of pointer input: orbit, zoom, hover and click.
    ///
    /// A click on a marker selects it through `selection` and flies the
    /// camera above it. Other clicks leave the selection alone; a click on
    /// the bare globe is logged with the coordinate under it.
    pub fn handle_pointer(
        &mut self,
        frame: &PointerFrame,
        selection: &mut impl SelectionSink,
        cursor: &mut impl CursorSink,
    ) {
        if frame.drag_delta != Vec2::ZERO {
            self.camera.orbit(frame.drag_delta, self.viewport.y);
        }
        if frame.zoom != 0.0 {
            self.camera.zoom(frame.zoom);
        }

        let hovered = match frame.position {
            Some(pos) if !frame.dragging => self.pick_at(pos),
            _ => None,
        };
        self.globe.set_hovered(hovered.as_ref(), cursor);

        let Some(click) = frame.click else {
            return;
        };
        if let Some(id) = self.pick_at(click) {
            self.select(id, selection);
        } else if let Some(coordinate) = self.coordinate_at(click) {
            tracing::debug!(lat = coordinate.latitude, lng = coordinate.longitude, "globe clicked");
        }
    }

    /// Select a marker and fly to it.
    pub fn select(&mut self, id: ItemId, selection: &mut impl SelectionSink) {
        let Some(marker) = self.globe.markers().get_by_id(&id) else {
            return;
        };
        let coordinate = marker.coordinate();
        tracing::info!(item = %id, lat = coordinate.latitude, lng = coordinate.longitude, "marker selected");
        self.camera.fly_to(coordinate, self.globe.rotation());
        selection.select(id);
    }

    fn pick_at(&self, cursor: Vec2) -> Option<ItemId> {
        if self.globe.markers().is_empty() {
            return None;
        }
        let ray = self.camera.pick_ray(cursor, self.viewport);
        self.globe.pick(&ray)
    }

    /// Coordinate of the globe surface under `cursor`, following the spin.
    pub fn coordinate_at(&self, cursor: Vec2) -> Option<GeoCoordinate> {
        let ray = self.camera.pick_ray(cursor, self.viewport);
        let t = intersect_sphere(&ray, Vec3::ZERO, self.globe.radius())?;
        let hit = self.globe.rotation_matrix().inverse().transform_point3(ray.at(t));
        Some(unproject(hit))
    }

    /// Take new shading constants and sun position from a reloaded config.
    pub fn apply_shading(&mut self, config: &Config) {
        self.shading.params = ShadingParams::from(&config.shading);
        self.shading
            .set_sun_direction(Vec3::from_array(config.globe.sun_position));
    }

    /// Advance camera, globe and shading by `dt` seconds.
    pub fn update(&mut self, dt: f32, loading: &mut impl LoadingSink) {
        self.camera.update(dt);
        self.globe.update(dt, &mut self.shading, loading);
    }

    /// Bring markers in line with the collaborators' current state.
    pub fn sync(&mut self, catalog: &ItemCatalog, category: Category, selected: Option<&ItemId>) {
        self.globe.sync_markers(catalog, category);
        self.globe.apply_selection(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{CursorHint, Item};

    #[derive(Default)]
    struct Store {
        selected: Option<ItemId>,
        cursor: CursorHint,
        loaded: bool,
    }

    impl SelectionSink for Store {
        fn select(&mut self, id: ItemId) {
            self.selected = Some(id);
        }
    }

    impl CursorSink for Store {
        fn set_cursor(&mut self, hint: CursorHint) {
            self.cursor = hint;
        }
    }

    impl LoadingSink for Store {
        fn set_globe_loaded(&mut self, loaded: bool) {
            self.loaded = loaded;
        }
    }

    fn scene_with_center_marker() -> Scene {
        let mut scene = Scene::new(&Config::default());
        // (0, -90) projects onto +Z, straight in front of the start camera.
        let items = ItemCatalog::new(vec![Item {
            id: ItemId::from("front"),
            name: "Front".into(),
            country: String::new(),
            coordinate: GeoCoordinate::new(0.0, -90.0),
            category: Category::Instruments,
        }]);
        scene.sync(&items, Category::Instruments, None);
        scene
    }

    fn center(scene: &Scene) -> Vec2 {
        scene.viewport() * 0.5
    }

    #[test]
    fn test_hover_sets_pointer_cursor() {
        let mut scene = scene_with_center_marker();
        let mut store = Store::default();
        let frame = PointerFrame {
            position: Some(center(&scene)),
            ..Default::default()
        };
        scene.handle_pointer(&frame, &mut Store::default(), &mut store);
        assert_eq!(store.cursor, CursorHint::Pointer);
        assert_eq!(scene.globe.hovered(), Some(&ItemId::from("front")));

        let away = PointerFrame {
            position: Some(Vec2::new(5.0, 5.0)),
            ..Default::default()
        };
        scene.handle_pointer(&away, &mut Store::default(), &mut store);
        assert_eq!(store.cursor, CursorHint::Default);
    }

    #[test]
    fn test_click_selects_and_flies() {
        let mut scene = scene_with_center_marker();
        let mut store = Store::default();
        let frame = PointerFrame {
            position: Some(center(&scene)),
            click: Some(center(&scene)),
            ..Default::default()
        };
        let mut cursor = Store::default();
        scene.handle_pointer(&frame, &mut store, &mut cursor);
        assert_eq!(store.selected, Some(ItemId::from("front")));
        assert!(scene.camera.state().animating);

        scene.sync(&ItemCatalog::default(), Category::Instruments, store.selected.as_ref());
        assert!(scene.globe.markers().is_empty());
    }

    #[test]
    fn test_click_on_empty_space_is_noop() {
        let mut scene = scene_with_center_marker();
        let mut store = Store::default();
        let frame = PointerFrame {
            position: Some(Vec2::new(5.0, 5.0)),
            click: Some(Vec2::new(5.0, 5.0)),
            ..Default::default()
        };
        scene.handle_pointer(&frame, &mut store, &mut Store::default());
        assert!(store.selected.is_none());
        assert!(!scene.camera.state().animating);
    }

    #[test]
    fn test_coordinate_under_cursor_follows_spin() {
        let mut scene = scene_with_center_marker();
        let c = scene.coordinate_at(center(&scene)).unwrap();
        assert!(c.latitude.abs() < 0.01, "got {c:?}");
        assert!((c.longitude + 90.0).abs() < 0.01, "got {c:?}");
        assert!(scene.coordinate_at(Vec2::new(5.0, 5.0)).is_none(), "corner misses the globe");

        // A quarter turn of spin brings (0, 180) in front of the camera.
        let quarter_turn = std::f32::consts::FRAC_PI_2 / Config::default().globe.rotation_rate;
        scene
            .globe
            .update(quarter_turn, &mut ShadingState::default(), &mut Store::default());
        let c = scene.coordinate_at(center(&scene)).unwrap();
        assert!((c.longitude.abs() - 180.0).abs() < 0.05, "got {c:?}");
    }

    #[test]
    fn test_apply_shading_takes_new_constants() {
        let mut scene = Scene::new(&Config::default());
        let mut config = Config::default();
        config.shading.exposure = 1.4;
        config.globe.sun_position = [0.0, 5.0, 0.0];
        scene.apply_shading(&config);
        assert_eq!(scene.shading.params.exposure, 1.4);
        assert!((scene.shading.sun_direction() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_drag_orbits_and_suppresses_hover() {
        let mut scene = scene_with_center_marker();
        let mut cursor = Store::default();
        let frame = PointerFrame {
            position: Some(center(&scene)),
            drag_delta: Vec2::new(40.0, 0.0),
            dragging: true,
            ..Default::default()
        };
        let before = scene.camera.goal().azimuth;
        scene.handle_pointer(&frame, &mut Store::default(), &mut cursor);
        assert!(scene.camera.goal().azimuth < before);
        assert!(scene.globe.hovered().is_none());
    }

    #[test]
    fn test_update_reports_loaded_after_settle() {
        let mut scene = scene_with_center_marker();
        let mut store = Store::default();
        scene.globe.textures_resolved();
        for _ in 0..90 {
            scene.update(1.0 / 60.0, &mut store);
        }
        assert!(store.loaded);
        assert!(scene.shading.elapsed_time() > 1.4);
    }
}
